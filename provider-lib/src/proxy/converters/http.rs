use crate::{
    common::utils::non_empty,
    config::proxy::OutboundHttp,
    outbound::{HttpOutboundOptions, OutboundOptions},
    proxy::Handler,
};

use super::utils::{apply_ip_version, new_tls, single_value_headers};

impl TryFrom<&Handler<OutboundHttp>> for OutboundOptions {
    type Error = crate::Error;

    fn try_from(h: &Handler<OutboundHttp>) -> Result<Self, Self::Error> {
        let s = h.raw_options();

        let tls = s.tls.unwrap_or_default().then(|| {
            new_tls(
                &s.sni,
                &s.common_opts,
                s.skip_cert_verify.unwrap_or_default(),
                &None,
            )
        });

        let mut dialer = h.dialer_policy().clone();
        apply_ip_version(&mut dialer, s.common_opts.ip_version.as_deref());

        Ok(OutboundOptions::Http(HttpOutboundOptions {
            server: (&s.common_opts).into(),
            username: non_empty(&s.username).map(|x| x.to_owned()),
            password: non_empty(&s.password).map(|x| x.to_owned()),
            headers: s
                .headers
                .as_ref()
                .map(single_value_headers)
                .unwrap_or_default(),
            tls,
            dialer,
        }))
    }
}
