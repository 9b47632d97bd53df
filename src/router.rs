//! The IPv4 router: owns a set of [`NetworkInterface`]s and a longest-prefix-
//! match routing table, and forwards datagrams between interfaces.
//!
//! Grounded on the teacher's `node/server/mod.rs` (`ServerNode`/`IpRoutes`),
//! generalized from a first-match scan to a real LPM decision (the source's
//! `IpRoutes::fetch` takes the first matching entry regardless of
//! specificity) and from an external link-polling model to an explicit
//! inbound-frame queue owned by the router itself.

use std::collections::VecDeque;

use tracing::debug;

use crate::iface::NetworkInterface;
use crate::proto::{Address, EthFrame, InternetDatagram, MaskableIp};

struct RouteEntry {
    route_prefix: Address,
    prefix_length: u8,
    next_hop: Option<Address>,
    interface_num: usize,
}

/// Owns interfaces and routes; never the physical link.
///
/// The NetworkInterface's host-facing surface has no RX queue of its own
/// (§6.4 names only `send_datagram`/`recv_frame`/`tick`/`maybe_send`), so the
/// router provides the missing `maybe_receive()`-equivalent itself:
/// [`Router::deliver_frame`] hands a frame to the named interface and, if a
/// datagram comes back, buffers it on a per-interface queue that `route()`
/// later drains.
pub struct Router {
    interfaces: Vec<NetworkInterface>,
    inbound: Vec<VecDeque<InternetDatagram>>,
    routes: Vec<RouteEntry>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            interfaces: Vec::new(),
            inbound: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// Append an interface, returning its stable zero-based index.
    pub fn add_interface(&mut self, iface: NetworkInterface) -> usize {
        self.interfaces.push(iface);
        self.inbound.push(VecDeque::new());
        self.interfaces.len() - 1
    }

    /// Append a routing entry. `prefix_length` must be in `0..=32`; this is
    /// a caller contract, enforced only by debug assertion (see the crate's
    /// error handling design: a malformed literal route is a programmer
    /// error, not a runtime failure the data plane need observe). Configs
    /// loaded from untrusted input go through [`crate::config`] instead,
    /// which validates and returns `Result`.
    pub fn add_route(
        &mut self,
        route_prefix: Address,
        prefix_length: u8,
        next_hop: Option<Address>,
        interface_num: usize,
    ) {
        debug_assert!(prefix_length <= 32);
        self.routes.push(RouteEntry {
            route_prefix,
            prefix_length,
            next_hop,
            interface_num,
        });
    }

    pub fn interface(&self, n: usize) -> Option<&NetworkInterface> {
        self.interfaces.get(n)
    }

    pub fn interface_mut(&mut self, n: usize) -> Option<&mut NetworkInterface> {
        self.interfaces.get_mut(n)
    }

    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }

    /// Deliver an inbound frame to interface `n`. Any datagram it yields is
    /// queued for the next `route()` call.
    pub fn deliver_frame(&mut self, n: usize, frame: EthFrame) {
        if let Some(iface) = self.interfaces.get_mut(n) {
            if let Some(dgram) = iface.recv_frame(frame) {
                self.inbound[n].push_back(dgram);
            }
        }
    }

    /// Age every interface's ARP cache by `ms`.
    pub fn tick(&mut self, ms: i64) {
        for iface in &mut self.interfaces {
            iface.tick(ms);
        }
    }

    /// Drain every interface's queued inbound datagrams and forward each via
    /// LPM. Interfaces are drained in index order; datagrams from a given
    /// interface are processed in arrival order.
    pub fn route(&mut self) {
        for idx in 0..self.interfaces.len() {
            while let Some(dgram) = self.inbound[idx].pop_front() {
                self.forward(dgram);
            }
        }
    }

    fn forward(&mut self, mut dgram: InternetDatagram) {
        let dst = dgram.header.dst;
        let Some((next_hop, interface_num)) = self.lookup(dst) else {
            debug!(%dst, "no route matches, dropping datagram");
            return;
        };

        if dgram.header.ttl <= 1 {
            debug!(%dst, ttl = dgram.header.ttl, "ttl exhausted, dropping datagram");
            return;
        }
        dgram.header.ttl -= 1;
        dgram.header.recompute_checksum();

        let next_hop = next_hop.unwrap_or(dst);
        if let Some(iface) = self.interfaces.get_mut(interface_num) {
            iface.send_datagram(dgram, next_hop);
        }
    }

    /// Longest-prefix-match lookup. Ties are broken by first insertion: a
    /// later route of equal prefix length never displaces an earlier one.
    fn lookup(&self, dst: Address) -> Option<(Option<Address>, usize)> {
        let mut best: Option<&RouteEntry> = None;
        for route in &self.routes {
            if !dst.has_same_prefix(route.route_prefix, route.prefix_length) {
                continue;
            }
            let better = match best {
                Some(current) => route.prefix_length > current.prefix_length,
                None => true,
            };
            if better {
                best = Some(route);
            }
        }
        best.map(|route| (route.next_hop, route.interface_num))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
