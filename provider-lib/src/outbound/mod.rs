//! Engine-side outbound descriptors.
//!
//! These serialize to the routing engine's JSON outbound format: a `tag`, a
//! `type` discriminator, and the protocol's options flattened alongside the
//! dialer policy.

mod dialer;
mod tls;
mod transport;

use serde::Serialize;

pub use dialer::{DialerOptions, DomainStrategy, Network};
pub use tls::{OutboundRealityOptions, OutboundTlsOptions, OutboundUtlsOptions};
pub use transport::{
    GrpcOptions, Headers, HttpTransportOptions, Listable, V2RayTransportOptions,
    WebsocketOptions,
};

use crate::config::proxy::{
    CommonConfigOptions, PROXY_TYPE_HTTP, PROXY_TYPE_SHADOWSOCKS,
    PROXY_TYPE_SOCKS, PROXY_TYPE_TROJAN, PROXY_TYPE_VLESS, PROXY_TYPE_VMESS,
};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Outbound {
    pub tag: String,
    #[serde(flatten)]
    pub options: OutboundOptions,
}

impl Outbound {
    pub fn protocol_type(&self) -> &'static str {
        self.options.protocol_type()
    }

    pub fn dialer_options(&self) -> &DialerOptions {
        match &self.options {
            OutboundOptions::Trojan(x) => &x.dialer,
            OutboundOptions::Shadowsocks(x) => &x.dialer,
            OutboundOptions::Vmess(x) => &x.dialer,
            OutboundOptions::Vless(x) => &x.dialer,
            OutboundOptions::Http(x) => &x.dialer,
            OutboundOptions::Socks(x) => &x.dialer,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundOptions {
    Trojan(TrojanOutboundOptions),
    Shadowsocks(ShadowsocksOutboundOptions),
    Vmess(VmessOutboundOptions),
    Vless(VlessOutboundOptions),
    Http(HttpOutboundOptions),
    Socks(SocksOutboundOptions),
}

impl OutboundOptions {
    pub fn protocol_type(&self) -> &'static str {
        match self {
            OutboundOptions::Trojan(_) => PROXY_TYPE_TROJAN,
            OutboundOptions::Shadowsocks(_) => PROXY_TYPE_SHADOWSOCKS,
            OutboundOptions::Vmess(_) => PROXY_TYPE_VMESS,
            OutboundOptions::Vless(_) => PROXY_TYPE_VLESS,
            OutboundOptions::Http(_) => PROXY_TYPE_HTTP,
            OutboundOptions::Socks(_) => PROXY_TYPE_SOCKS,
        }
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ServerOptions {
    pub server: String,
    pub server_port: u16,
}

impl From<&CommonConfigOptions> for ServerOptions {
    fn from(common: &CommonConfigOptions) -> Self {
        Self {
            server: common.server.to_owned(),
            server_port: common.port,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TrojanOutboundOptions {
    #[serde(flatten)]
    pub server: ServerOptions,
    pub password: String,
    /// `None` relays both TCP and UDP.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<Network>,
    pub tls: OutboundTlsOptions,
    /// `None` is a raw TLS stream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<V2RayTransportOptions>,
    #[serde(flatten)]
    pub dialer: DialerOptions,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ShadowsocksOutboundOptions {
    #[serde(flatten)]
    pub server: ServerOptions,
    pub method: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin_opts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<Network>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udp_over_tcp: Option<UdpOverTcpOptions>,
    #[serde(flatten)]
    pub dialer: DialerOptions,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UdpOverTcpOptions {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u8>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct VmessOutboundOptions {
    #[serde(flatten)]
    pub server: ServerOptions,
    pub uuid: String,
    pub security: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub alter_id: u16,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub global_padding: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub authenticated_length: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<Network>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<OutboundTlsOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packet_encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<V2RayTransportOptions>,
    #[serde(flatten)]
    pub dialer: DialerOptions,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct VlessOutboundOptions {
    #[serde(flatten)]
    pub server: ServerOptions,
    pub uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<Network>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<OutboundTlsOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packet_encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<V2RayTransportOptions>,
    #[serde(flatten)]
    pub dialer: DialerOptions,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HttpOutboundOptions {
    #[serde(flatten)]
    pub server: ServerOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Headers::is_empty")]
    pub headers: Headers,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<OutboundTlsOptions>,
    #[serde(flatten)]
    pub dialer: DialerOptions,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SocksOutboundOptions {
    #[serde(flatten)]
    pub server: ServerOptions,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<Network>,
    #[serde(flatten)]
    pub dialer: DialerOptions,
}

fn is_zero(v: &u16) -> bool {
    *v == 0
}
