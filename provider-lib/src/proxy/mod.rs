//! Protocol translators.
//!
//! A [`Handler`] owns one provider entry's raw options plus the dialer policy
//! to merge in, and turns them into an [`Outbound`] on [`Handler::generate`].
//! The per-protocol mapping lives in [`converters`].

use std::fmt::Debug;

use tracing::debug;

use crate::{
    Error, Result,
    common::{
        features::{FeatureRegistry, ThreadSafeFeatureRegistry},
        utils::join_host_port,
    },
    config::proxy::{
        CommonConfigOptions, OutboundHttp, OutboundProxyProtocol,
        OutboundShadowsocks, OutboundSocks5, OutboundTrojan, OutboundVless,
        OutboundVmess, PROXY_TYPE_HTTP, PROXY_TYPE_SHADOWSOCKS,
        PROXY_TYPE_SOCKS, PROXY_TYPE_TROJAN, PROXY_TYPE_VLESS, PROXY_TYPE_VMESS,
    },
    outbound::{DialerOptions, Outbound, OutboundOptions},
};

pub mod converters;

/// Raw provider options for one protocol.
pub trait RawOptions: Clone + Debug + Send + Sync {
    /// The engine's name for the protocol.
    const PROTOCOL: &'static str;

    fn common_opts(&self) -> &CommonConfigOptions;
}

macro_rules! impl_raw_options {
    ($opts:ty, $proto:expr) => {
        impl RawOptions for $opts {
            const PROTOCOL: &'static str = $proto;

            fn common_opts(&self) -> &CommonConfigOptions {
                &self.common_opts
            }
        }
    };
}

impl_raw_options!(OutboundTrojan, PROXY_TYPE_TROJAN);
impl_raw_options!(OutboundShadowsocks, PROXY_TYPE_SHADOWSOCKS);
impl_raw_options!(OutboundVmess, PROXY_TYPE_VMESS);
impl_raw_options!(OutboundVless, PROXY_TYPE_VLESS);
impl_raw_options!(OutboundHttp, PROXY_TYPE_HTTP);
impl_raw_options!(OutboundSocks5, PROXY_TYPE_SOCKS);

pub struct Handler<O> {
    /// Fixed at construction, rebinding the options does not change it.
    tag: String,
    opts: O,
    dialer: DialerOptions,
    features: ThreadSafeFeatureRegistry,
}

impl<O: RawOptions> Debug for Handler<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("tag", &self.tag)
            .field("type", &O::PROTOCOL)
            .finish()
    }
}

impl<O: RawOptions> Handler<O> {
    pub fn new(opts: O, features: ThreadSafeFeatureRegistry) -> Self {
        Self {
            tag: derive_tag(opts.common_opts()),
            opts,
            dialer: Default::default(),
            features,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn protocol_type(&self) -> &'static str {
        O::PROTOCOL
    }

    /// The `type` the provider declared, e.g. `ss` for shadowsocks.
    pub fn raw_protocol_label(&self) -> &str {
        &self.opts.common_opts().proxy_type
    }

    pub fn raw_options(&self) -> &O {
        &self.opts
    }

    pub fn bind_raw_options(&mut self, opts: O) {
        self.opts = opts;
    }

    pub fn dialer_policy(&self) -> &DialerOptions {
        &self.dialer
    }

    pub fn bind_dialer_policy(&mut self, dialer: DialerOptions) {
        self.dialer = dialer;
    }

    pub(crate) fn features(&self) -> &dyn FeatureRegistry {
        self.features.as_ref()
    }
}

impl<O: RawOptions> Handler<O>
where
    for<'a> OutboundOptions: TryFrom<&'a Handler<O>, Error = Error>,
{
    /// Validates the raw options and builds the outbound descriptor.
    pub fn generate(&self) -> Result<Outbound> {
        let options = OutboundOptions::try_from(self)?;
        debug!("generated {} outbound {}", O::PROTOCOL, self.tag);
        Ok(Outbound {
            tag: self.tag.clone(),
            options,
        })
    }
}

fn derive_tag(common: &CommonConfigOptions) -> String {
    if !common.name.is_empty() {
        common.name.to_owned()
    } else {
        join_host_port(&common.server, common.port)
    }
}

/// A translator for any supported protocol.
#[derive(Debug)]
pub enum AnyHandler {
    Trojan(Handler<OutboundTrojan>),
    Shadowsocks(Handler<OutboundShadowsocks>),
    Vmess(Handler<OutboundVmess>),
    Vless(Handler<OutboundVless>),
    Http(Handler<OutboundHttp>),
    Socks5(Handler<OutboundSocks5>),
}

macro_rules! dispatch {
    ($self:expr, $h:ident => $body:expr) => {
        match $self {
            AnyHandler::Trojan($h) => $body,
            AnyHandler::Shadowsocks($h) => $body,
            AnyHandler::Vmess($h) => $body,
            AnyHandler::Vless($h) => $body,
            AnyHandler::Http($h) => $body,
            AnyHandler::Socks5($h) => $body,
        }
    };
}

impl AnyHandler {
    pub fn new(
        proto: OutboundProxyProtocol,
        features: ThreadSafeFeatureRegistry,
    ) -> Self {
        match proto {
            OutboundProxyProtocol::Trojan(x) => {
                AnyHandler::Trojan(Handler::new(x, features))
            }
            OutboundProxyProtocol::Shadowsocks(x) => {
                AnyHandler::Shadowsocks(Handler::new(x, features))
            }
            OutboundProxyProtocol::Vmess(x) => {
                AnyHandler::Vmess(Handler::new(x, features))
            }
            OutboundProxyProtocol::Vless(x) => {
                AnyHandler::Vless(Handler::new(x, features))
            }
            OutboundProxyProtocol::Http(x) => {
                AnyHandler::Http(Handler::new(x, features))
            }
            OutboundProxyProtocol::Socks5(x) => {
                AnyHandler::Socks5(Handler::new(x, features))
            }
        }
    }

    pub fn tag(&self) -> &str {
        dispatch!(self, h => h.tag())
    }

    pub fn protocol_type(&self) -> &'static str {
        dispatch!(self, h => h.protocol_type())
    }

    pub fn raw_protocol_label(&self) -> &str {
        dispatch!(self, h => h.raw_protocol_label())
    }

    /// Replaces the raw options, which must belong to the same protocol.
    /// On a mismatch the bound options are left as they were.
    pub fn bind_raw_options(&mut self, opts: OutboundProxyProtocol) -> Result<()> {
        match (self, opts) {
            (AnyHandler::Trojan(h), OutboundProxyProtocol::Trojan(x)) => {
                h.bind_raw_options(x)
            }
            (
                AnyHandler::Shadowsocks(h),
                OutboundProxyProtocol::Shadowsocks(x),
            ) => h.bind_raw_options(x),
            (AnyHandler::Vmess(h), OutboundProxyProtocol::Vmess(x)) => {
                h.bind_raw_options(x)
            }
            (AnyHandler::Vless(h), OutboundProxyProtocol::Vless(x)) => {
                h.bind_raw_options(x)
            }
            (AnyHandler::Http(h), OutboundProxyProtocol::Http(x)) => {
                h.bind_raw_options(x)
            }
            (AnyHandler::Socks5(h), OutboundProxyProtocol::Socks5(x)) => {
                h.bind_raw_options(x)
            }
            (this, other) => {
                return Err(Error::TypeMismatch {
                    expected: this.protocol_type(),
                    found: other.protocol_type(),
                });
            }
        }
        Ok(())
    }

    pub fn bind_dialer_policy(&mut self, dialer: DialerOptions) {
        dispatch!(self, h => h.bind_dialer_policy(dialer))
    }

    pub fn generate(&self) -> Result<Outbound> {
        dispatch!(self, h => h.generate())
    }
}
