use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::Error;

pub const PROXY_TYPE_TROJAN: &str = "trojan";
pub const PROXY_TYPE_SHADOWSOCKS: &str = "shadowsocks";
pub const PROXY_TYPE_VMESS: &str = "vmess";
pub const PROXY_TYPE_VLESS: &str = "vless";
pub const PROXY_TYPE_HTTP: &str = "http";
pub const PROXY_TYPE_SOCKS: &str = "socks";

/// Any YAML scalar read as text, so `password: 123456` keeps its digits.
struct ScalarString(String);

impl<'de> Deserialize<'de> for ScalarString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_yaml::Value::deserialize(deserializer)? {
            serde_yaml::Value::String(s) => Ok(ScalarString(s)),
            serde_yaml::Value::Number(n) => Ok(ScalarString(n.to_string())),
            serde_yaml::Value::Bool(b) => Ok(ScalarString(b.to_string())),
            serde_yaml::Value::Null => Ok(ScalarString(String::new())),
            _ => Err(de::Error::invalid_type(
                de::Unexpected::Other("sequence or mapping"),
                &"a string, number or bool",
            )),
        }
    }
}

fn deserialize_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(ScalarString::deserialize(deserializer)?.0)
}

fn deserialize_opt_scalar<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ScalarString>::deserialize(deserializer)?.map(|x| x.0))
}

fn deserialize_scalar_headers<'de, D>(
    deserializer: D,
) -> Result<Option<HashMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let headers =
        Option::<HashMap<String, ScalarString>>::deserialize(deserializer)?;
    Ok(headers.map(|h| h.into_iter().map(|(k, v)| (k, v.0)).collect()))
}

fn deserialize_scalar_multi_headers<'de, D>(
    deserializer: D,
) -> Result<Option<HashMap<String, Vec<String>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let headers =
        Option::<HashMap<String, Vec<ScalarString>>>::deserialize(deserializer)?;
    Ok(headers.map(|h| {
        h.into_iter()
            .map(|(k, v)| (k, v.into_iter().map(|x| x.0).collect()))
            .collect()
    }))
}

/// Reads a scalar entry of a raw mapping as text, for diagnostics.
fn scalar_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.to_owned()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct CommonConfigOptions {
    #[serde(default, deserialize_with = "deserialize_scalar")]
    pub name: String,
    /// The protocol as spelled by the provider, e.g. `ss`.
    #[serde(rename = "type", default)]
    pub proxy_type: String,
    pub server: String,
    pub port: u16,
    /// `dual`, `ipv4`, `ipv6`, `ipv4-prefer` or `ipv6-prefer`
    pub ip_version: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct WsOpt {
    pub path: Option<String>,
    #[serde(default, deserialize_with = "deserialize_scalar_headers")]
    pub headers: Option<HashMap<String, String>>,
    pub max_early_data: Option<u32>,
    pub early_data_header_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct GrpcOpt {
    pub grpc_service_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct H2Opt {
    pub host: Option<Vec<String>>,
    pub path: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct HttpOpt {
    pub method: Option<String>,
    pub path: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_scalar_multi_headers")]
    pub headers: Option<HashMap<String, Vec<String>>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct RealityOpt {
    pub public_key: String,
    pub short_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct OutboundTrojan {
    #[serde(flatten)]
    pub common_opts: CommonConfigOptions,
    #[serde(default, deserialize_with = "deserialize_scalar")]
    pub password: String,
    pub alpn: Option<Vec<String>>,
    pub sni: Option<String>,
    pub skip_cert_verify: Option<bool>,
    /// Certificate pin, not consumed by the translation.
    pub fingerprint: Option<String>,
    pub client_fingerprint: Option<String>,
    pub udp: Option<bool>,
    pub network: Option<String>,
    pub flow: Option<String>,
    pub flow_show: Option<bool>,
    pub grpc_opts: Option<GrpcOpt>,
    pub ws_opts: Option<WsOpt>,
    /// Accepted for parity with vless, trojan ignores it.
    pub reality_opts: Option<RealityOpt>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct OutboundShadowsocks {
    #[serde(flatten)]
    pub common_opts: CommonConfigOptions,
    pub cipher: String,
    #[serde(default, deserialize_with = "deserialize_scalar")]
    pub password: String,
    pub udp: Option<bool>,
    pub udp_over_tcp: Option<bool>,
    pub udp_over_tcp_version: Option<u8>,
    pub plugin: Option<String>,
    pub plugin_opts: Option<HashMap<String, serde_yaml::Value>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct OutboundVmess {
    #[serde(flatten)]
    pub common_opts: CommonConfigOptions,
    pub uuid: String,
    #[serde(alias = "alterId")]
    pub alter_id: Option<u16>,
    pub cipher: Option<String>,
    pub udp: Option<bool>,
    pub tls: Option<bool>,
    #[serde(alias = "servername")]
    pub server_name: Option<String>,
    pub skip_cert_verify: Option<bool>,
    pub alpn: Option<Vec<String>>,
    pub client_fingerprint: Option<String>,
    pub network: Option<String>,
    pub ws_opts: Option<WsOpt>,
    pub h2_opts: Option<H2Opt>,
    pub http_opts: Option<HttpOpt>,
    pub grpc_opts: Option<GrpcOpt>,
    pub global_padding: Option<bool>,
    pub authenticated_length: Option<bool>,
    pub packet_encoding: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct OutboundVless {
    #[serde(flatten)]
    pub common_opts: CommonConfigOptions,
    pub uuid: String,
    pub flow: Option<String>,
    pub udp: Option<bool>,
    pub tls: Option<bool>,
    #[serde(alias = "servername")]
    pub server_name: Option<String>,
    pub skip_cert_verify: Option<bool>,
    pub alpn: Option<Vec<String>>,
    pub client_fingerprint: Option<String>,
    pub network: Option<String>,
    pub ws_opts: Option<WsOpt>,
    pub h2_opts: Option<H2Opt>,
    pub http_opts: Option<HttpOpt>,
    pub grpc_opts: Option<GrpcOpt>,
    pub reality_opts: Option<RealityOpt>,
    pub packet_encoding: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct OutboundHttp {
    #[serde(flatten)]
    pub common_opts: CommonConfigOptions,
    #[serde(default, deserialize_with = "deserialize_opt_scalar")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_scalar")]
    pub password: Option<String>,
    pub tls: Option<bool>,
    pub sni: Option<String>,
    pub skip_cert_verify: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_scalar_headers")]
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct OutboundSocks5 {
    #[serde(flatten)]
    pub common_opts: CommonConfigOptions,
    #[serde(default, deserialize_with = "deserialize_opt_scalar")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_scalar")]
    pub password: Option<String>,
    pub tls: Option<bool>,
    pub skip_cert_verify: Option<bool>,
    pub udp: Option<bool>,
}

/// Raw options of one provider entry, one variant per supported protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundProxyProtocol {
    Trojan(OutboundTrojan),
    Shadowsocks(OutboundShadowsocks),
    Vmess(OutboundVmess),
    Vless(OutboundVless),
    Http(OutboundHttp),
    Socks5(OutboundSocks5),
}

impl OutboundProxyProtocol {
    pub fn common_opts(&self) -> &CommonConfigOptions {
        match self {
            OutboundProxyProtocol::Trojan(x) => &x.common_opts,
            OutboundProxyProtocol::Shadowsocks(x) => &x.common_opts,
            OutboundProxyProtocol::Vmess(x) => &x.common_opts,
            OutboundProxyProtocol::Vless(x) => &x.common_opts,
            OutboundProxyProtocol::Http(x) => &x.common_opts,
            OutboundProxyProtocol::Socks5(x) => &x.common_opts,
        }
    }

    /// The engine's name for the protocol.
    pub fn protocol_type(&self) -> &'static str {
        match self {
            OutboundProxyProtocol::Trojan(_) => PROXY_TYPE_TROJAN,
            OutboundProxyProtocol::Shadowsocks(_) => PROXY_TYPE_SHADOWSOCKS,
            OutboundProxyProtocol::Vmess(_) => PROXY_TYPE_VMESS,
            OutboundProxyProtocol::Vless(_) => PROXY_TYPE_VLESS,
            OutboundProxyProtocol::Http(_) => PROXY_TYPE_HTTP,
            OutboundProxyProtocol::Socks5(_) => PROXY_TYPE_SOCKS,
        }
    }
}

impl TryFrom<HashMap<String, serde_yaml::Value>> for OutboundProxyProtocol {
    type Error = crate::Error;

    fn try_from(
        mapping: HashMap<String, serde_yaml::Value>,
    ) -> Result<Self, Self::Error> {
        let name = mapping
            .get("name")
            .and_then(scalar_text)
            .unwrap_or_default();
        let proxy_type = mapping
            .get("type")
            .and_then(|x| x.as_str())
            .ok_or(Error::InvalidConfig(format!(
                "missing field `type` in proxy `{name}`"
            )))?
            .to_owned();

        let value = serde_yaml::Value::Mapping(
            mapping
                .into_iter()
                .map(|(k, v)| (serde_yaml::Value::String(k), v))
                .collect(),
        );
        let map_err = |e: serde_yaml::Error| {
            Error::InvalidConfig(format!(
                "invalid {proxy_type} proxy `{name}`: {e}"
            ))
        };

        let proto = match proxy_type.as_str() {
            "trojan" => OutboundProxyProtocol::Trojan(
                serde_yaml::from_value(value).map_err(map_err)?,
            ),
            "ss" | "shadowsocks" => OutboundProxyProtocol::Shadowsocks(
                serde_yaml::from_value(value).map_err(map_err)?,
            ),
            "vmess" => OutboundProxyProtocol::Vmess(
                serde_yaml::from_value(value).map_err(map_err)?,
            ),
            "vless" => OutboundProxyProtocol::Vless(
                serde_yaml::from_value(value).map_err(map_err)?,
            ),
            "http" => OutboundProxyProtocol::Http(
                serde_yaml::from_value(value).map_err(map_err)?,
            ),
            "socks5" | "socks" => OutboundProxyProtocol::Socks5(
                serde_yaml::from_value(value).map_err(map_err)?,
            ),
            other => {
                return Err(Error::InvalidConfig(format!(
                    "unsupported proxy type: {other}"
                )));
            }
        };
        Ok(proto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> HashMap<String, serde_yaml::Value> {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_parse_trojan() {
        let proto = OutboundProxyProtocol::try_from(mapping(
            r#"
name: trojan-ws
type: trojan
server: a.com
port: 443
password: secret
sni: b.com
skip-cert-verify: true
client-fingerprint: chrome
network: ws
ws-opts:
  path: /ws
  headers:
    Host: c.com
  max-early-data: 2048
  early-data-header-name: Sec-WebSocket-Protocol
reality-opts:
  public-key: pk
  short-id: sid
"#,
        ))
        .unwrap();

        let OutboundProxyProtocol::Trojan(trojan) = proto else {
            panic!("expected trojan");
        };
        assert_eq!(trojan.common_opts.name, "trojan-ws");
        assert_eq!(trojan.common_opts.proxy_type, "trojan");
        assert_eq!(trojan.common_opts.port, 443);
        assert_eq!(trojan.password, "secret");
        assert_eq!(trojan.sni.as_deref(), Some("b.com"));
        assert_eq!(trojan.skip_cert_verify, Some(true));
        assert_eq!(trojan.client_fingerprint.as_deref(), Some("chrome"));
        let ws = trojan.ws_opts.unwrap();
        assert_eq!(ws.path.as_deref(), Some("/ws"));
        assert_eq!(ws.max_early_data, Some(2048));
        assert_eq!(ws.headers.unwrap()["Host"], "c.com");
        assert_eq!(trojan.reality_opts.unwrap().public_key, "pk");
    }

    #[test]
    fn test_parse_aliases() {
        let proto = OutboundProxyProtocol::try_from(mapping(
            "{name: s, type: ss, server: a.com, port: 8388, cipher: \
             aes-128-gcm, password: p}",
        ))
        .unwrap();
        assert_eq!(proto.protocol_type(), PROXY_TYPE_SHADOWSOCKS);
        assert_eq!(proto.common_opts().proxy_type, "ss");

        let proto = OutboundProxyProtocol::try_from(mapping(
            "{type: vmess, server: a.com, port: 443, uuid: u, alterId: 2, \
             servername: b.com}",
        ))
        .unwrap();
        let OutboundProxyProtocol::Vmess(vmess) = proto else {
            panic!("expected vmess");
        };
        assert_eq!(vmess.alter_id, Some(2));
        assert_eq!(vmess.server_name.as_deref(), Some("b.com"));

        let proto = OutboundProxyProtocol::try_from(mapping(
            "{type: socks5, server: a.com, port: 1080}",
        ))
        .unwrap();
        assert_eq!(proto.protocol_type(), PROXY_TYPE_SOCKS);
    }

    #[test]
    fn test_parse_errors() {
        let err = OutboundProxyProtocol::try_from(mapping(
            "{name: x, server: a.com, port: 1}",
        ))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(err.to_string().contains("`type`"));

        let err = OutboundProxyProtocol::try_from(mapping(
            "{name: x, type: wireguard, server: a.com, port: 1}",
        ))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid config: unsupported proxy type: wireguard"
        );

        let err = OutboundProxyProtocol::try_from(mapping(
            "{name: x, type: trojan, server: a.com}",
        ))
        .unwrap_err();
        assert!(err.to_string().contains("invalid trojan proxy `x`"));

        let err = OutboundProxyProtocol::try_from(mapping(
            "{name: 7, type: trojan, server: a.com, port: 1, password: [a]}",
        ))
        .unwrap_err();
        assert!(err.to_string().contains("invalid trojan proxy `7`"));
    }

    #[test]
    fn test_parse_numeric_scalars_as_text() {
        let proto = OutboundProxyProtocol::try_from(mapping(
            r#"
name: 12
type: trojan
server: a.com
port: 443
password: 123456
network: ws
ws-opts:
  path: /ws
  headers:
    X-N: 1
    X-Flag: true
"#,
        ))
        .unwrap();
        let OutboundProxyProtocol::Trojan(trojan) = proto else {
            panic!("expected trojan");
        };
        assert_eq!(trojan.common_opts.name, "12");
        assert_eq!(trojan.password, "123456");
        let headers = trojan.ws_opts.unwrap().headers.unwrap();
        assert_eq!(headers["X-N"], "1");
        assert_eq!(headers["X-Flag"], "true");

        let proto = OutboundProxyProtocol::try_from(mapping(
            "{type: ss, server: a.com, port: 1, cipher: none, password: 8388}",
        ))
        .unwrap();
        let OutboundProxyProtocol::Shadowsocks(ss) = proto else {
            panic!("expected shadowsocks");
        };
        assert_eq!(ss.password, "8388");

        let proto = OutboundProxyProtocol::try_from(mapping(
            "{type: http, server: a.com, port: 1, username: 1001, \
             password: 42, headers: {X-Id: 5}}",
        ))
        .unwrap();
        let OutboundProxyProtocol::Http(http) = proto else {
            panic!("expected http");
        };
        assert_eq!(http.username.as_deref(), Some("1001"));
        assert_eq!(http.password.as_deref(), Some("42"));
        assert_eq!(http.headers.unwrap()["X-Id"], "5");

        let proto = OutboundProxyProtocol::try_from(mapping(
            "{type: socks5, server: a.com, port: 1, password: ~}",
        ))
        .unwrap();
        let OutboundProxyProtocol::Socks5(socks) = proto else {
            panic!("expected socks5");
        };
        assert_eq!(socks.password, None);
    }
}
