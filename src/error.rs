//! Error taxonomy for this crate.
//!
//! Datapath failures (bad wire bytes, frames not addressed to us, a
//! forwarding decision that finds no route) are never propagated to
//! callers of [`crate::iface::NetworkInterface`] or [`crate::router::Router`] —
//! they collapse to `None`/silent drop, as required by the spec's loss
//! tolerance. [`ParseError`] exists so the collapse can still be logged with
//! a reason. [`ConfigError`] is the one place failures *are* observable,
//! since building a router from a bad configuration happens off the
//! datapath and a loud failure beats a silently misrouted network.

use thiserror::Error;

/// Why a codec rejected a buffer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("ethernet: {0}")]
    Ethernet(&'static str),
    #[error("arp: {0}")]
    Arp(&'static str),
    #[error("ipv4: {0}")]
    Ipv4(&'static str),
}

/// Why `Router::from_config` (or `Router::from_toml_str`) rejected a
/// configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("route references unknown interface index {0}")]
    UnknownInterface(usize),
    #[error("prefix length {0} is out of range 0..=32")]
    InvalidPrefixLength(u8),
    #[error("invalid toml: {0}")]
    Toml(String),
}
