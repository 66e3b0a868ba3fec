//! Translates Clash-style proxy provider entries into engine outbound
//! descriptors.
//!
//! A provider entry is first parsed into an [`OutboundProxyProtocol`], which
//! picks the protocol variant from the entry's `type` field. The matching
//! [`Handler`] (or the protocol-agnostic [`AnyHandler`]) then validates the
//! entry and produces an [`Outbound`] ready for the routing engine.

pub mod common;
pub mod config;
pub mod outbound;
pub mod proxy;

pub use common::features::{
    BuildFeatures, FeatureRegistry, FeatureSet, GatedFeature,
    ThreadSafeFeatureRegistry,
};
pub use config::proxy::OutboundProxyProtocol;
pub use outbound::{DialerOptions, DomainStrategy, Outbound, OutboundOptions};
pub use proxy::{AnyHandler, Handler};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The entry asks for something the engine has no equivalent for.
    #[error("{0} is not supported")]
    UnsupportedFeature(String),
    #[error(
        "{feature} is not included in this build, rebuild with --features \
         {flag}"
    )]
    MissingBuildFeature {
        feature: &'static str,
        flag: &'static str,
    },
    #[error("missing {0}")]
    MissingSubOptions(&'static str),
    #[error("expected {expected} options, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
