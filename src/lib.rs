//! A software data plane bridging Ethernet and IPv4: a [`NetworkInterface`]
//! performing ARP resolution and framing, and a [`Router`] forwarding
//! datagrams between interfaces by longest-prefix match.
//!
//! [`NetworkInterface`]: iface::NetworkInterface
//! [`Router`]: router::Router

pub mod config;
pub mod error;
pub mod iface;
pub mod proto;
pub mod router;
