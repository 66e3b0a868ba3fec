use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

/// A list that serializes a single element as a bare value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listable<T>(pub Vec<T>);

impl<T> From<Vec<T>> for Listable<T> {
    fn from(value: Vec<T>) -> Self {
        Self(value)
    }
}

impl<T: Serialize> Serialize for Listable<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0.as_slice() {
            [single] => single.serialize(serializer),
            items => items.serialize(serializer),
        }
    }
}

pub type Headers = BTreeMap<String, Listable<String>>;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum V2RayTransportOptions {
    #[serde(rename = "ws")]
    Websocket(WebsocketOptions),
    #[serde(rename = "grpc")]
    Grpc(GrpcOptions),
    #[serde(rename = "http")]
    Http(HttpTransportOptions),
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct WebsocketOptions {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: Headers,
    #[serde(skip_serializing_if = "is_zero")]
    pub max_early_data: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub early_data_header_name: String,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct GrpcOptions {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service_name: String,
}

/// HTTP/2 when TLS is on, plain HTTP/1.1 otherwise.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct HttpTransportOptions {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub host: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub method: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: Headers,
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listable_serialize() {
        let one = Listable(vec!["a.com".to_owned()]);
        assert_eq!(serde_json::to_value(&one).unwrap(), "a.com");

        let many = Listable(vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(
            serde_json::to_value(&many).unwrap(),
            serde_json::json!(["a", "b"])
        );
    }

    #[test]
    fn test_transport_tag() {
        let grpc = V2RayTransportOptions::Grpc(GrpcOptions {
            service_name: "svc".to_owned(),
        });
        assert_eq!(
            serde_json::to_value(&grpc).unwrap(),
            serde_json::json!({"type": "grpc", "service_name": "svc"})
        );
    }
}
