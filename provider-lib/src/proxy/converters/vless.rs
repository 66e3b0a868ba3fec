use crate::{
    Error,
    common::utils::non_empty,
    config::proxy::OutboundVless,
    outbound::{OutboundOptions, OutboundRealityOptions, VlessOutboundOptions},
    proxy::Handler,
};

use super::utils::{
    apply_ip_version, grpc_transport, h2_transport, http_transport,
    network_restriction, new_tls, new_utls, ws_transport,
};

static SUPPORTED_FLOW: &str = "xtls-rprx-vision";
static DEFAULT_REALITY_FINGERPRINT: &str = "chrome";

impl TryFrom<&Handler<OutboundVless>> for OutboundOptions {
    type Error = crate::Error;

    fn try_from(h: &Handler<OutboundVless>) -> Result<Self, Self::Error> {
        let s = h.raw_options();

        let flow = non_empty(&s.flow);
        if let Some(flow) = flow
            && flow != SUPPORTED_FLOW
        {
            return Err(Error::UnsupportedFeature(format!("vless flow {flow}")));
        }

        // reality rides on TLS and needs a client-hello fingerprint
        let tls = match (s.tls.unwrap_or_default(), s.reality_opts.as_ref()) {
            (false, None) => None,
            (_, reality) => {
                let mut tls = new_tls(
                    &s.server_name,
                    &s.common_opts,
                    s.skip_cert_verify.unwrap_or_default(),
                    &s.alpn,
                );
                let fingerprint = non_empty(&s.client_fingerprint)
                    .or_else(|| reality.map(|_| DEFAULT_REALITY_FINGERPRINT));
                if let Some(fingerprint) = fingerprint {
                    tls.utls = Some(new_utls(fingerprint, h.features())?);
                }
                tls.reality = reality.map(|x| OutboundRealityOptions {
                    enabled: true,
                    public_key: x.public_key.to_owned(),
                    short_id: x.short_id.clone().unwrap_or_default(),
                });
                Some(tls)
            }
        };

        let host = tls
            .as_ref()
            .map(|x| x.server_name.as_str())
            .unwrap_or(non_empty(&s.server_name).unwrap_or(&s.common_opts.server));
        let transport = match s.network.as_deref() {
            Some("ws") => Some(ws_transport(&s.ws_opts, host)?),
            Some("grpc") => Some(grpc_transport(&s.grpc_opts)?),
            Some("h2") => Some(h2_transport(&s.h2_opts)?),
            Some("http") => Some(http_transport(&s.http_opts)?),
            _ => None,
        };

        let mut dialer = h.dialer_policy().clone();
        apply_ip_version(&mut dialer, s.common_opts.ip_version.as_deref());

        Ok(OutboundOptions::Vless(VlessOutboundOptions {
            server: (&s.common_opts).into(),
            uuid: s.uuid.to_owned(),
            flow: flow.map(|x| x.to_owned()),
            network: network_restriction(s.udp.unwrap_or_default()),
            tls,
            packet_encoding: non_empty(&s.packet_encoding).map(|x| x.to_owned()),
            transport,
            dialer,
        }))
    }
}
