//! Wire-format collaborators: Ethernet II, ARP for IPv4, and IPv4 itself.
//!
//! The core forwarding logic in `crate::iface` and `crate::router` treats
//! these as black-box codecs; this module is where byte-exact compatibility
//! with the real protocols actually lives.

// Address / prefix helpers
pub mod addr;
pub mod ip;

// Layer 2 (data link)
mod eth;
pub use eth::*;

// Layer 3 (network)
mod arp;
mod ipv4;
pub use arp::*;
pub use ipv4::*;

pub use addr::{Address, AddressExt};
pub use ip::MaskableIp;
