use tracing::warn;

use crate::{
    Error,
    common::{
        features::{CLIENT_HELLO_IMPERSONATION, FeatureRegistry},
        utils::non_empty,
    },
    config::proxy::{CommonConfigOptions, GrpcOpt, H2Opt, HttpOpt, WsOpt},
    outbound::{
        DialerOptions, DomainStrategy, GrpcOptions, Headers,
        HttpTransportOptions, Listable, Network, OutboundTlsOptions,
        OutboundUtlsOptions, V2RayTransportOptions, WebsocketOptions,
    },
};

/// TLS block with the server name defaulting to the server address.
pub(super) fn new_tls(
    sni: &Option<String>,
    common: &CommonConfigOptions,
    skip_cert_verify: bool,
    alpn: &Option<Vec<String>>,
) -> OutboundTlsOptions {
    if skip_cert_verify {
        warn!("skipping TLS cert verification for {}", common.server);
    }

    OutboundTlsOptions {
        enabled: true,
        server_name: non_empty(sni).unwrap_or(&common.server).to_owned(),
        insecure: skip_cert_verify,
        alpn: alpn.clone().unwrap_or_default(),
        ..Default::default()
    }
}

pub(super) fn new_utls(
    fingerprint: &str,
    features: &dyn FeatureRegistry,
) -> Result<OutboundUtlsOptions, Error> {
    CLIENT_HELLO_IMPERSONATION.ensure(features)?;
    Ok(OutboundUtlsOptions {
        enabled: true,
        fingerprint: fingerprint.to_owned(),
    })
}

/// Without UDP the outbound is restricted to TCP.
pub(super) fn network_restriction(udp: bool) -> Option<Network> {
    (!udp).then_some(Network::Tcp)
}

pub(super) fn apply_ip_version(
    dialer: &mut DialerOptions,
    ip_version: Option<&str>,
) {
    match ip_version {
        None | Some("dual") => {}
        Some(v) => match DomainStrategy::from_ip_version(v) {
            Some(strategy) => dialer.domain_strategy = Some(strategy),
            None => warn!("unknown ip-version {v}, keeping domain strategy"),
        },
    }
}

impl From<(&WsOpt, &str)> for WebsocketOptions {
    /// `host` fills the Host header when the provider did not set one.
    fn from(pair: (&WsOpt, &str)) -> Self {
        let (x, host) = pair;
        let mut headers = x
            .headers
            .as_ref()
            .map(single_value_headers)
            .unwrap_or_default();
        headers
            .entry("Host".to_owned())
            .or_insert_with(|| Listable(vec![host.to_owned()]));

        WebsocketOptions {
            path: x.path.as_ref().map(|x| x.to_owned()).unwrap_or_default(),
            headers,
            max_early_data: x.max_early_data.unwrap_or_default(),
            early_data_header_name: x
                .early_data_header_name
                .as_ref()
                .map(|x| x.to_owned())
                .unwrap_or_default(),
        }
    }
}

impl From<&GrpcOpt> for GrpcOptions {
    fn from(x: &GrpcOpt) -> Self {
        GrpcOptions {
            service_name: x
                .grpc_service_name
                .as_ref()
                .map(|x| x.to_owned())
                .unwrap_or_default(),
        }
    }
}

impl From<&H2Opt> for HttpTransportOptions {
    fn from(x: &H2Opt) -> Self {
        HttpTransportOptions {
            host: x.host.clone().unwrap_or_default(),
            path: x.path.clone().unwrap_or_default(),
            ..Default::default()
        }
    }
}

impl From<&HttpOpt> for HttpTransportOptions {
    fn from(x: &HttpOpt) -> Self {
        let mut headers: Headers = x
            .headers
            .as_ref()
            .map(|h| {
                h.iter()
                    .map(|(k, v)| (k.to_owned(), Listable(v.to_owned())))
                    .collect()
            })
            .unwrap_or_default();
        // the engine carries Host as its own field
        let host = headers.remove("Host").map(|x| x.0).unwrap_or_default();

        HttpTransportOptions {
            host,
            // the engine takes a single path
            path: x
                .path
                .as_ref()
                .and_then(|x| x.first())
                .cloned()
                .unwrap_or_default(),
            method: x.method.clone().unwrap_or_default(),
            headers,
        }
    }
}

pub(super) fn ws_transport(
    opts: &Option<WsOpt>,
    host: &str,
) -> Result<V2RayTransportOptions, Error> {
    let opts = opts.as_ref().ok_or(Error::MissingSubOptions("ws-opts"))?;
    Ok(V2RayTransportOptions::Websocket((opts, host).into()))
}

pub(super) fn grpc_transport(
    opts: &Option<GrpcOpt>,
) -> Result<V2RayTransportOptions, Error> {
    let opts = opts.as_ref().ok_or(Error::MissingSubOptions("grpc-opts"))?;
    Ok(V2RayTransportOptions::Grpc(opts.into()))
}

pub(super) fn h2_transport(
    opts: &Option<H2Opt>,
) -> Result<V2RayTransportOptions, Error> {
    let opts = opts.as_ref().ok_or(Error::MissingSubOptions("h2-opts"))?;
    Ok(V2RayTransportOptions::Http(opts.into()))
}

pub(super) fn http_transport(
    opts: &Option<HttpOpt>,
) -> Result<V2RayTransportOptions, Error> {
    let opts = opts.as_ref().ok_or(Error::MissingSubOptions("http-opts"))?;
    Ok(V2RayTransportOptions::Http(opts.into()))
}

/// Maps a header mapping onto the engine's list-valued headers.
pub(super) fn single_value_headers<'a>(
    headers: impl IntoIterator<Item = (&'a String, &'a String)>,
) -> Headers {
    headers
        .into_iter()
        .map(|(k, v)| (k.to_owned(), Listable(vec![v.to_owned()])))
        .collect()
}
