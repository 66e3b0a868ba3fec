use serde::Serialize;

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct OutboundTlsOptions {
    pub enabled: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub server_name: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub insecure: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alpn: Vec<String>,
    /// Client-hello impersonation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utls: Option<OutboundUtlsOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reality: Option<OutboundRealityOptions>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct OutboundUtlsOptions {
    pub enabled: bool,
    pub fingerprint: String,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct OutboundRealityOptions {
    pub enabled: bool,
    pub public_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub short_id: String,
}
