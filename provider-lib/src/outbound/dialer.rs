use serde::{Deserialize, Serialize};

/// Which address family wins when the server host is resolved.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainStrategy {
    #[serde(rename = "prefer_ipv4")]
    PreferIpv4,
    #[serde(rename = "prefer_ipv6")]
    PreferIpv6,
    #[serde(rename = "ipv4_only")]
    Ipv4Only,
    #[serde(rename = "ipv6_only")]
    Ipv6Only,
}

impl DomainStrategy {
    /// Maps a provider `ip-version`. `dual` and unknown values have no
    /// strategy of their own.
    pub fn from_ip_version(ip_version: &str) -> Option<Self> {
        match ip_version {
            "ipv4" => Some(DomainStrategy::Ipv4Only),
            "ipv6" => Some(DomainStrategy::Ipv6Only),
            "ipv4-prefer" => Some(DomainStrategy::PreferIpv4),
            "ipv6-prefer" => Some(DomainStrategy::PreferIpv6),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Tcp,
    Udp,
}

/// Dialer policy shared by every outbound built from one provider.
///
/// The translator passes it through untouched, except for
/// `domain_strategy` which an entry's `ip-version` may override.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct DialerOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detour: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inet4_bind_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inet6_bind_address: Option<String>,
    /// Linux routing mark
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_mark: Option<u32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub reuse_addr: bool,
    /// Duration string, e.g. `5s`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub tcp_fast_open: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub tcp_multi_path: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udp_fragment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_strategy: Option<DomainStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_delay: Option<String>,
}
