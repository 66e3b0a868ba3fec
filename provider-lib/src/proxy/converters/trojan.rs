use crate::{
    Error,
    common::utils::non_empty,
    config::proxy::OutboundTrojan,
    outbound::{OutboundOptions, TrojanOutboundOptions},
    proxy::Handler,
};

use super::utils::{
    apply_ip_version, grpc_transport, network_restriction, new_tls, new_utls,
    ws_transport,
};

impl TryFrom<&Handler<OutboundTrojan>> for OutboundOptions {
    type Error = crate::Error;

    fn try_from(h: &Handler<OutboundTrojan>) -> Result<Self, Self::Error> {
        let s = h.raw_options();

        if non_empty(&s.flow).is_some() || s.flow_show.unwrap_or_default() {
            return Err(Error::UnsupportedFeature("trojan flow".to_owned()));
        }

        let mut tls = new_tls(
            &s.sni,
            &s.common_opts,
            s.skip_cert_verify.unwrap_or_default(),
            &s.alpn,
        );
        if let Some(fingerprint) = non_empty(&s.client_fingerprint) {
            tls.utls = Some(new_utls(fingerprint, h.features())?);
        }

        let transport = match s.network.as_deref() {
            Some("ws") => Some(ws_transport(&s.ws_opts, &tls.server_name)?),
            Some("grpc") => Some(grpc_transport(&s.grpc_opts)?),
            _ => None,
        };

        let mut dialer = h.dialer_policy().clone();
        apply_ip_version(&mut dialer, s.common_opts.ip_version.as_deref());

        Ok(OutboundOptions::Trojan(TrojanOutboundOptions {
            server: (&s.common_opts).into(),
            password: s.password.to_owned(),
            network: network_restriction(s.udp.unwrap_or_default()),
            tls,
            transport,
            dialer,
        }))
    }
}
