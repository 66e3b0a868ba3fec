use crate::{
    common::utils::non_empty,
    config::proxy::OutboundVmess,
    outbound::{OutboundOptions, VmessOutboundOptions},
    proxy::Handler,
};

use super::utils::{
    apply_ip_version, grpc_transport, h2_transport, http_transport,
    network_restriction, new_tls, new_utls, ws_transport,
};

impl TryFrom<&Handler<OutboundVmess>> for OutboundOptions {
    type Error = crate::Error;

    fn try_from(h: &Handler<OutboundVmess>) -> Result<Self, Self::Error> {
        let s = h.raw_options();

        let tls = match s.tls.unwrap_or_default() {
            true => {
                let mut tls = new_tls(
                    &s.server_name,
                    &s.common_opts,
                    s.skip_cert_verify.unwrap_or_default(),
                    &s.alpn,
                );
                if let Some(fingerprint) = non_empty(&s.client_fingerprint) {
                    tls.utls = Some(new_utls(fingerprint, h.features())?);
                }
                Some(tls)
            }
            false => None,
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

        Ok(OutboundOptions::Vmess(VmessOutboundOptions {
            server: (&s.common_opts).into(),
            uuid: s.uuid.to_owned(),
            security: non_empty(&s.cipher).unwrap_or("auto").to_owned(),
            alter_id: s.alter_id.unwrap_or_default(),
            global_padding: s.global_padding.unwrap_or_default(),
            authenticated_length: s.authenticated_length.unwrap_or_default(),
            network: network_restriction(s.udp.unwrap_or_default()),
            tls,
            packet_encoding: non_empty(&s.packet_encoding).map(|x| x.to_owned()),
            transport,
            dialer,
        }))
    }
}
