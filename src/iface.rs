//! The link-layer network interface: ARP resolution, IPv4↔Ethernet framing,
//! a timed ARP cache, and FIFO send/receive queues.
//!
//! Grounded on the teacher's `node/server/eth.rs` ARP handling, generalized
//! with a real timed cache (instead of a bare `Known`/`Pending` enum with no
//! expiry) and a TX queue (the teacher writes straight to a simulated link).

use std::collections::{HashMap, VecDeque};

use tracing::{debug, trace};

use crate::proto::{Address, ArpMessage, ArpOp, EthFrame, InternetDatagram, MacAddr, TYPE_ARP, TYPE_IPV4};

/// Initial (and non-refreshing) lifetime of a cache entry awaiting a reply.
pub const PENDING_TTL_MS: i64 = 5_000;
/// Lifetime a resolved entry is given on first resolution and on every
/// subsequent ARP touch for the same IP.
pub const RESOLVED_TTL_MS: i64 = 30_000;

/// A cache entry fuses the ARP resolution state with its pending queue, so
/// "pending entry without a queue" is not a representable state (see design
/// notes item 2: this is the fix for the source's parallel-array hazard).
#[derive(Debug)]
enum CacheEntry {
    Pending {
        ttl_ms: i64,
        queue: VecDeque<InternetDatagram>,
    },
    Resolved {
        mac: MacAddr,
        ttl_ms: i64,
    },
}

/// Translates outbound IPv4 datagrams into Ethernet frames (resolving the
/// next hop's MAC via ARP as needed) and inbound frames into IPv4 datagrams
/// or cache updates.
pub struct NetworkInterface {
    mac: MacAddr,
    ip: Address,
    cache: HashMap<Address, CacheEntry>,
    tx: VecDeque<EthFrame>,
}

impl NetworkInterface {
    pub fn new(mac: MacAddr, ip: Address) -> Self {
        Self {
            mac,
            ip,
            cache: HashMap::new(),
            tx: VecDeque::new(),
        }
    }

    pub fn mac(&self) -> MacAddr {
        self.mac
    }

    pub fn ip(&self) -> Address {
        self.ip
    }

    /// Send `dgram` towards `next_hop_ip`, resolving via ARP if needed.
    ///
    /// See §4.1.1: a Pending lookup buffers the datagram without refreshing
    /// the timer or re-emitting a request, bounding ARP chatter.
    pub fn send_datagram(&mut self, dgram: InternetDatagram, next_hop_ip: Address) {
        match self.cache.get_mut(&next_hop_ip) {
            Some(CacheEntry::Resolved { mac, .. }) => {
                self.tx
                    .push_back(EthFrame::new(self.mac, *mac, TYPE_IPV4, dgram.serialize()));
            }
            Some(CacheEntry::Pending { queue, .. }) => {
                queue.push_back(dgram);
            }
            None => {
                let mut queue = VecDeque::new();
                queue.push_back(dgram);
                self.cache.insert(
                    next_hop_ip,
                    CacheEntry::Pending {
                        ttl_ms: PENDING_TTL_MS,
                        queue,
                    },
                );

                let request = ArpMessage::request(self.mac, self.ip, next_hop_ip);
                self.tx.push_back(EthFrame::new(
                    self.mac,
                    MacAddr::BROADCAST,
                    TYPE_ARP,
                    request.serialize(),
                ));
                trace!(target_ip = %next_hop_ip, "emitted arp request");
            }
        }
    }

    /// Accept an inbound frame. Returns the carried datagram for IPv4
    /// frames; ARP frames update the cache and never surface a datagram.
    pub fn recv_frame(&mut self, frame: EthFrame) -> Option<InternetDatagram> {
        if frame.dst != self.mac && !frame.dst.is_broadcast() {
            return None;
        }

        match frame.ethertype {
            TYPE_IPV4 => match InternetDatagram::parse(&frame.payload) {
                Ok(dgram) => Some(dgram),
                Err(err) => {
                    debug!(%err, "dropping frame with malformed ipv4 payload");
                    None
                }
            },
            TYPE_ARP => {
                match ArpMessage::parse(&frame.payload) {
                    Ok(msg) => self.handle_arp(msg),
                    Err(err) => debug!(%err, "dropping frame with malformed arp payload"),
                }
                None
            }
            other => {
                trace!(ethertype = %format_args!("{other:#06x}"), "dropping unrecognized ethertype");
                None
            }
        }
    }

    fn handle_arp(&mut self, msg: ArpMessage) {
        let sender_mac = msg.sender_ethernet_address;
        let sender_ip = msg.sender_ip_address;

        match self.cache.remove(&sender_ip) {
            None => {
                trace!(ip = %sender_ip, mac = %sender_mac, "learned new arp entry");
            }
            Some(CacheEntry::Pending { queue, .. }) => {
                debug!(ip = %sender_ip, count = queue.len(), "arp resolved, draining pending queue");
                for dgram in queue {
                    self.tx.push_back(EthFrame::new(
                        self.mac,
                        sender_mac,
                        TYPE_IPV4,
                        dgram.serialize(),
                    ));
                }
            }
            Some(CacheEntry::Resolved { .. }) => {
                trace!(ip = %sender_ip, mac = %sender_mac, "refreshed arp entry");
            }
        }
        self.cache.insert(
            sender_ip,
            CacheEntry::Resolved {
                mac: sender_mac,
                ttl_ms: RESOLVED_TTL_MS,
            },
        );

        if msg.opcode == ArpOp::Request && msg.target_ip_address == self.ip {
            let reply = ArpMessage::reply(self.mac, self.ip, sender_mac, sender_ip);
            self.tx
                .push_back(EthFrame::new(self.mac, sender_mac, TYPE_ARP, reply.serialize()));
        }
    }

    /// Age every cache entry by `ms`, dropping anything that reaches zero.
    /// A Pending entry's queued datagrams are dropped with it.
    pub fn tick(&mut self, ms: i64) {
        self.cache.retain(|ip, entry| match entry {
            CacheEntry::Pending { ttl_ms, queue } => {
                *ttl_ms -= ms;
                let alive = *ttl_ms > 0;
                if !alive && !queue.is_empty() {
                    debug!(%ip, dropped = queue.len(), "pending arp entry expired, dropping queued datagrams");
                }
                alive
            }
            CacheEntry::Resolved { ttl_ms, .. } => {
                *ttl_ms -= ms;
                *ttl_ms > 0
            }
        });
    }

    /// Dequeue the next frame ready to transmit, FIFO.
    pub fn maybe_send(&mut self) -> Option<EthFrame> {
        self.tx.pop_front()
    }

    #[cfg(test)]
    pub(crate) fn pending_cache_len(&self) -> usize {
        self.cache.len()
    }
}
