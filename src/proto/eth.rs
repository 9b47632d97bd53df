use std::fmt;

use crate::error::ParseError;

/// Size in bytes of an Ethernet II header (dst + src + ethertype).
pub const HEADER_LEN: usize = 14;

/// EtherType carried by an IPv4 payload.
pub const TYPE_IPV4: u16 = 0x0800;

/// EtherType carried by an ARP payload.
pub const TYPE_ARP: u16 = 0x0806;

/// A 6-byte Ethernet MAC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {

    pub const BROADCAST: Self = Self([0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);

    pub const ZERO: Self = Self([0, 0, 0, 0, 0, 0]);

    pub const fn is_unicast(self) -> bool {
        self.0[0] & 0b01 == 0
    }

    pub const fn is_multicast(self) -> bool {
        !self.is_unicast()
    }

    #[inline]
    pub const fn is_broadcast(self) -> bool {
        self.0[0] == 0xFF
            && self.0[1] == 0xFF
            && self.0[2] == 0xFF
            && self.0[3] == 0xFF
            && self.0[4] == 0xFF
            && self.0[5] == 0xFF
    }

}

impl fmt::Display for MacAddr {
    fn fmt(&self, f_: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, f] = self.0;
        f_.write_fmt(format_args!("{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{f:02X}"))
    }
}

/// An Ethernet II frame: a header plus an opaque payload.
///
/// `payload` carries the serialized ARP or IPv4 message; this type does not
/// itself know how to interpret it, only `ethertype` says what codec applies.
#[derive(Clone, PartialEq, Eq)]
pub struct EthFrame {
    pub src: MacAddr,
    pub dst: MacAddr,
    pub ethertype: u16,
    pub payload: Vec<u8>,
}

impl EthFrame {

    pub fn new(src: MacAddr, dst: MacAddr, ethertype: u16, payload: Vec<u8>) -> Self {
        Self { src, dst, ethertype, payload }
    }

    /// Parse a frame from its wire representation.
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        if bytes.len() < HEADER_LEN {
            return Err(ParseError::Ethernet("frame shorter than header"));
        }
        let mut dst = [0u8; 6];
        let mut src = [0u8; 6];
        dst.copy_from_slice(&bytes[0..6]);
        src.copy_from_slice(&bytes[6..12]);
        let ethertype = u16::from_be_bytes([bytes[12], bytes[13]]);
        Ok(Self {
            src: MacAddr(src),
            dst: MacAddr(dst),
            ethertype,
            payload: bytes[HEADER_LEN..].to_vec(),
        })
    }

    /// Serialize this frame to its wire representation.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.payload.len());
        out.extend_from_slice(&self.dst.0);
        out.extend_from_slice(&self.src.0);
        out.extend_from_slice(&self.ethertype.to_be_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

}

impl fmt::Debug for EthFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EthFrame")
            .field("src", &format_args!("{}", self.src))
            .field("dst", &format_args!("{}", self.dst))
            .field("ethertype", &format_args!("{:#06x}", self.ethertype))
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let frame = EthFrame::new(
            MacAddr([1, 2, 3, 4, 5, 6]),
            MacAddr::BROADCAST,
            TYPE_ARP,
            vec![0xAA; 28],
        );
        let bytes = frame.serialize();
        let parsed = EthFrame::parse(&bytes).unwrap();
        assert_eq!(parsed, frame);
    }

    #[test]
    fn rejects_short_buffer() {
        let err = EthFrame::parse(&[0u8; 10]).unwrap_err();
        assert!(matches!(err, ParseError::Ethernet(_)));
    }

    #[test]
    fn broadcast_display() {
        assert_eq!(MacAddr::BROADCAST.to_string(), "FF:FF:FF:FF:FF:FF");
        assert!(MacAddr::BROADCAST.is_broadcast());
        assert!(!MacAddr([1, 2, 3, 4, 5, 6]).is_broadcast());
    }
}
