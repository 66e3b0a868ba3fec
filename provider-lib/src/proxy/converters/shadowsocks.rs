use std::collections::HashMap;

use tracing::warn;

use crate::{
    Error,
    config::proxy::OutboundShadowsocks,
    outbound::{OutboundOptions, ShadowsocksOutboundOptions, UdpOverTcpOptions},
    proxy::Handler,
};

use super::utils::{apply_ip_version, network_restriction};

/// A SIP003 plugin in the engine's `name` + `k=v;k=v` form.
struct Sip003Plugin {
    name: &'static str,
    opts: String,
}

impl TryFrom<&Handler<OutboundShadowsocks>> for OutboundOptions {
    type Error = crate::Error;

    fn try_from(h: &Handler<OutboundShadowsocks>) -> Result<Self, Self::Error> {
        let s = h.raw_options();

        let plugin = match s.plugin.as_deref() {
            None | Some("") => None,
            Some("obfs") => {
                warn!("simple-obfs is deprecated, please use v2ray-plugin instead");
                Some(obfs_plugin(required_plugin_opts(s, "obfs")?)?)
            }
            Some("v2ray-plugin") => {
                Some(v2ray_plugin(required_plugin_opts(s, "v2ray-plugin")?)?)
            }
            Some(plugin) => {
                return Err(Error::UnsupportedFeature(format!(
                    "shadowsocks plugin {plugin}"
                )));
            }
        };

        let method = match s.cipher.as_str() {
            "dummy" => "none".to_owned(),
            cipher => cipher.to_owned(),
        };

        let udp_over_tcp = s.udp_over_tcp.unwrap_or_default().then(|| {
            UdpOverTcpOptions {
                enabled: true,
                version: s.udp_over_tcp_version,
            }
        });

        let mut dialer = h.dialer_policy().clone();
        apply_ip_version(&mut dialer, s.common_opts.ip_version.as_deref());

        let (plugin, plugin_opts) = match plugin {
            Some(p) => (Some(p.name.to_owned()), Some(p.opts)),
            None => (None, None),
        };

        Ok(OutboundOptions::Shadowsocks(ShadowsocksOutboundOptions {
            server: (&s.common_opts).into(),
            method,
            password: s.password.to_owned(),
            plugin,
            plugin_opts,
            network: network_restriction(s.udp.unwrap_or_default()),
            udp_over_tcp,
            dialer,
        }))
    }
}

fn required_plugin_opts<'a>(
    s: &'a OutboundShadowsocks,
    plugin: &str,
) -> Result<&'a HashMap<String, serde_yaml::Value>, Error> {
    s.plugin_opts.as_ref().ok_or_else(|| {
        Error::InvalidConfig(format!("plugin-opts is required for plugin {plugin}"))
    })
}

fn obfs_plugin(
    value: &HashMap<String, serde_yaml::Value>,
) -> Result<Sip003Plugin, Error> {
    let host = value
        .get("host")
        .and_then(|x| x.as_str())
        .unwrap_or("bing.com");
    let mode = value
        .get("mode")
        .and_then(|x| x.as_str())
        .ok_or(Error::InvalidConfig("obfs mode is required".to_owned()))?;

    match mode {
        "http" | "tls" => Ok(Sip003Plugin {
            name: "obfs-local",
            opts: format!("obfs={mode};obfs-host={host}"),
        }),
        _ => Err(Error::InvalidConfig(format!("invalid obfs mode: {mode}"))),
    }
}

fn v2ray_plugin(
    value: &HashMap<String, serde_yaml::Value>,
) -> Result<Sip003Plugin, Error> {
    let host = value
        .get("host")
        .and_then(|x| x.as_str())
        .unwrap_or("bing.com");
    let mode = value
        .get("mode")
        .and_then(|x| x.as_str())
        .ok_or(Error::InvalidConfig(
            "v2ray-plugin mode is required".to_owned(),
        ))?;

    if mode != "websocket" {
        return Err(Error::InvalidConfig(format!(
            "invalid v2ray-plugin mode: {mode}"
        )));
    }

    let mut opts = vec![format!("mode={mode}"), format!("host={host}")];
    if let Some(path) = value.get("path").and_then(|x| x.as_str())
        && !path.is_empty()
    {
        opts.push(format!("path={path}"));
    }
    if value.get("tls").and_then(|x| x.as_bool()).unwrap_or(false) {
        opts.push("tls".to_owned());
    }
    if value.get("mux").and_then(|x| x.as_bool()) == Some(false) {
        opts.push("mux=0".to_owned());
    }

    Ok(Sip003Plugin {
        name: "v2ray-plugin",
        opts: opts.join(";"),
    })
}
