use crate::{
    Error,
    common::utils::non_empty,
    config::proxy::OutboundSocks5,
    outbound::{OutboundOptions, SocksOutboundOptions},
    proxy::Handler,
};

use super::utils::{apply_ip_version, network_restriction};

impl TryFrom<&Handler<OutboundSocks5>> for OutboundOptions {
    type Error = crate::Error;

    fn try_from(h: &Handler<OutboundSocks5>) -> Result<Self, Self::Error> {
        let s = h.raw_options();

        if s.tls.unwrap_or_default() {
            return Err(Error::UnsupportedFeature("socks5 tls".to_owned()));
        }

        let mut dialer = h.dialer_policy().clone();
        apply_ip_version(&mut dialer, s.common_opts.ip_version.as_deref());

        Ok(OutboundOptions::Socks(SocksOutboundOptions {
            server: (&s.common_opts).into(),
            version: "5".to_owned(),
            username: non_empty(&s.username).map(|x| x.to_owned()),
            password: non_empty(&s.password).map(|x| x.to_owned()),
            network: network_restriction(s.udp.unwrap_or_default()),
            dialer,
        }))
    }
}
