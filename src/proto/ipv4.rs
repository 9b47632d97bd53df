//! IPv4 header parsing/serialization and checksum (RFC 791).
//!
//! Fragmentation and option processing are non-goals: this crate never acts
//! on the flags/fragment-offset fields or interprets option bytes, but it
//! still carries them byte-exactly so a datagram that passes through is
//! indistinguishable on the wire from one a fragmentation-aware stack built.

use crate::error::ParseError;
use crate::proto::addr::Address;

/// Minimum IPv4 header length (no options), in bytes.
pub const MIN_HEADER_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4Header {
    /// Header length in 32-bit words (IHL); 5 when there are no options.
    pub ihl: u8,
    pub dscp_ecn: u8,
    pub total_length: u16,
    pub identification: u16,
    pub flags_fragment_offset: u16,
    pub ttl: u8,
    pub protocol: u8,
    pub checksum: u16,
    pub src: Address,
    pub dst: Address,
    /// Opaque option bytes, length `(ihl - 5) * 4`. Never interpreted.
    pub options: Vec<u8>,
}

impl Ipv4Header {
    /// Number of header bytes, including options.
    pub fn header_len(&self) -> usize {
        self.ihl as usize * 4
    }

    /// Recompute and store the checksum over this header (options included),
    /// with the checksum field itself treated as zero per RFC 791 §3.1.
    pub fn recompute_checksum(&mut self) {
        self.checksum = 0;
        self.checksum = checksum(&self.header_bytes_for_checksum());
    }

    fn header_bytes_for_checksum(&self) -> Vec<u8> {
        let mut buf = self.serialize();
        buf[10] = 0;
        buf[11] = 0;
        buf
    }

    fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.header_len());
        out.push((4 << 4) | (self.ihl & 0x0F));
        out.push(self.dscp_ecn);
        out.extend_from_slice(&self.total_length.to_be_bytes());
        out.extend_from_slice(&self.identification.to_be_bytes());
        out.extend_from_slice(&self.flags_fragment_offset.to_be_bytes());
        out.push(self.ttl);
        out.push(self.protocol);
        out.extend_from_slice(&self.checksum.to_be_bytes());
        out.extend_from_slice(&self.src.octets());
        out.extend_from_slice(&self.dst.octets());
        out.extend_from_slice(&self.options);
        out
    }
}

/// A parsed IPv4 datagram: mutable header plus opaque payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternetDatagram {
    pub header: Ipv4Header,
    pub payload: Vec<u8>,
}

impl InternetDatagram {
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        if bytes.len() < MIN_HEADER_LEN {
            return Err(ParseError::Ipv4("datagram shorter than minimum header"));
        }
        let version = bytes[0] >> 4;
        if version != 4 {
            return Err(ParseError::Ipv4("not an IPv4 datagram"));
        }
        let ihl = bytes[0] & 0x0F;
        if ihl < 5 {
            return Err(ParseError::Ipv4("IHL smaller than minimum header"));
        }
        let header_len = ihl as usize * 4;
        if bytes.len() < header_len {
            return Err(ParseError::Ipv4("buffer shorter than declared header length"));
        }

        let total_length = u16::from_be_bytes([bytes[2], bytes[3]]);
        let identification = u16::from_be_bytes([bytes[4], bytes[5]]);
        let flags_fragment_offset = u16::from_be_bytes([bytes[6], bytes[7]]);
        let ttl = bytes[8];
        let protocol = bytes[9];
        let checksum = u16::from_be_bytes([bytes[10], bytes[11]]);
        let src = Address::from([bytes[12], bytes[13], bytes[14], bytes[15]]);
        let dst = Address::from([bytes[16], bytes[17], bytes[18], bytes[19]]);
        let options = bytes[20..header_len].to_vec();

        let header = Ipv4Header {
            ihl,
            dscp_ecn: bytes[1],
            total_length,
            identification,
            flags_fragment_offset,
            ttl,
            protocol,
            checksum,
            src,
            dst,
            options,
        };

        let payload = bytes[header_len..].to_vec();
        Ok(Self { header, payload })
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = self.header.serialize();
        out.extend_from_slice(&self.payload);
        out
    }
}

/// The RFC 791 ones-complement checksum over `data`, treated as a sequence
/// of 16-bit big-endian words (a trailing odd byte is padded with zero).
pub fn checksum(data: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    let mut chunks = data.chunks_exact(2);
    for chunk in &mut chunks {
        sum += u16::from_be_bytes([chunk[0], chunk[1]]) as u32;
    }
    if let [last] = chunks.remainder() {
        sum += (*last as u32) << 8;
    }
    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    !(sum as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InternetDatagram {
        let mut header = Ipv4Header {
            ihl: 5,
            dscp_ecn: 0,
            total_length: 20 + 4,
            identification: 0xBEEF,
            flags_fragment_offset: 0,
            ttl: 64,
            protocol: 17,
            checksum: 0,
            src: Address::new(10, 0, 0, 1),
            dst: Address::new(10, 0, 0, 2),
            options: Vec::new(),
        };
        header.recompute_checksum();
        InternetDatagram { header, payload: vec![1, 2, 3, 4] }
    }

    #[test]
    fn round_trip() {
        let dgram = sample();
        let bytes = dgram.serialize();
        let parsed = InternetDatagram::parse(&bytes).unwrap();
        assert_eq!(parsed, dgram);
    }

    #[test]
    fn checksum_is_valid_after_recompute() {
        let dgram = sample();
        let header_bytes = &dgram.serialize()[..MIN_HEADER_LEN];
        // A valid IPv4 checksum sums to 0xFFFF (all ones) over the header.
        assert_eq!(checksum(header_bytes), 0);
    }

    #[test]
    fn ttl_decrement_updates_checksum() {
        let mut dgram = sample();
        let before = dgram.header.checksum;
        dgram.header.ttl -= 1;
        dgram.header.recompute_checksum();
        assert_ne!(dgram.header.checksum, before);
        let header_bytes = &dgram.serialize()[..MIN_HEADER_LEN];
        assert_eq!(checksum(header_bytes), 0);
    }

    #[test]
    fn rejects_short_buffer() {
        assert!(matches!(InternetDatagram::parse(&[0u8; 10]), Err(ParseError::Ipv4(_))));
    }

    #[test]
    fn rejects_non_ipv4_version() {
        let mut bytes = sample().serialize();
        bytes[0] = (6 << 4) | 5;
        assert!(matches!(InternetDatagram::parse(&bytes), Err(ParseError::Ipv4(_))));
    }

    #[test]
    fn preserves_opaque_options() {
        let mut header = Ipv4Header {
            ihl: 6,
            dscp_ecn: 0,
            total_length: 24,
            identification: 1,
            flags_fragment_offset: 0,
            ttl: 10,
            protocol: 6,
            checksum: 0,
            src: Address::new(1, 1, 1, 1),
            dst: Address::new(2, 2, 2, 2),
            options: vec![1, 2, 3, 4],
        };
        header.recompute_checksum();
        let dgram = InternetDatagram { header, payload: vec![] };
        let bytes = dgram.serialize();
        let parsed = InternetDatagram::parse(&bytes).unwrap();
        assert_eq!(parsed.header.options, vec![1, 2, 3, 4]);
    }
}
