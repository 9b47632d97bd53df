//! ARP for IPv4-over-Ethernet (RFC 826), byte-exact wire codec.

use crate::error::ParseError;
use crate::proto::eth::MacAddr;
use crate::proto::addr::Address;

/// Hardware type: Ethernet.
const HTYPE_ETHERNET: u16 = 1;
/// Protocol type: IPv4.
const PTYPE_IPV4: u16 = 0x0800;
const HLEN_ETHERNET: u8 = 6;
const PLEN_IPV4: u8 = 4;

/// Fixed wire length of an ARP-for-IPv4-over-Ethernet message.
pub const WIRE_LEN: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArpOp {
    Request = 1,
    Reply = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpMessage {
    pub opcode: ArpOp,
    pub sender_ethernet_address: MacAddr,
    pub sender_ip_address: Address,
    pub target_ethernet_address: MacAddr,
    pub target_ip_address: Address,
}

impl ArpMessage {

    /// Build a REQUEST message: target hardware address is left
    /// unspecified, as mandated by RFC 826 for a first-time lookup.
    pub fn request(sender_mac: MacAddr, sender_ip: Address, target_ip: Address) -> Self {
        Self {
            opcode: ArpOp::Request,
            sender_ethernet_address: sender_mac,
            sender_ip_address: sender_ip,
            target_ethernet_address: MacAddr::ZERO,
            target_ip_address: target_ip,
        }
    }

    /// Build a REPLY message in response to a request from `target`.
    pub fn reply(sender_mac: MacAddr, sender_ip: Address, target_mac: MacAddr, target_ip: Address) -> Self {
        Self {
            opcode: ArpOp::Reply,
            sender_ethernet_address: sender_mac,
            sender_ip_address: sender_ip,
            target_ethernet_address: target_mac,
            target_ip_address: target_ip,
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        if bytes.len() < WIRE_LEN {
            return Err(ParseError::Arp("message shorter than 28 bytes"));
        }
        let htype = u16::from_be_bytes([bytes[0], bytes[1]]);
        let ptype = u16::from_be_bytes([bytes[2], bytes[3]]);
        let hlen = bytes[4];
        let plen = bytes[5];
        if htype != HTYPE_ETHERNET || hlen != HLEN_ETHERNET {
            return Err(ParseError::Arp("unsupported hardware type/length"));
        }
        if ptype != PTYPE_IPV4 || plen != PLEN_IPV4 {
            return Err(ParseError::Arp("unsupported protocol type/length"));
        }
        let opcode = match u16::from_be_bytes([bytes[6], bytes[7]]) {
            1 => ArpOp::Request,
            2 => ArpOp::Reply,
            _ => return Err(ParseError::Arp("unknown opcode")),
        };

        let mut sender_mac = [0u8; 6];
        sender_mac.copy_from_slice(&bytes[8..14]);
        let sender_ip = Address::from([bytes[14], bytes[15], bytes[16], bytes[17]]);

        let mut target_mac = [0u8; 6];
        target_mac.copy_from_slice(&bytes[18..24]);
        let target_ip = Address::from([bytes[24], bytes[25], bytes[26], bytes[27]]);

        Ok(Self {
            opcode,
            sender_ethernet_address: MacAddr(sender_mac),
            sender_ip_address: sender_ip,
            target_ethernet_address: MacAddr(target_mac),
            target_ip_address: target_ip,
        })
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(WIRE_LEN);
        out.extend_from_slice(&HTYPE_ETHERNET.to_be_bytes());
        out.extend_from_slice(&PTYPE_IPV4.to_be_bytes());
        out.push(HLEN_ETHERNET);
        out.push(PLEN_IPV4);
        out.extend_from_slice(&(self.opcode as u16).to_be_bytes());
        out.extend_from_slice(&self.sender_ethernet_address.0);
        out.extend_from_slice(&self.sender_ip_address.octets());
        out.extend_from_slice(&self.target_ethernet_address.0);
        out.extend_from_slice(&self.target_ip_address.octets());
        out
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn mac(b: u8) -> MacAddr {
        MacAddr([0, 0, 0, 0, 0, b])
    }

    #[test]
    fn round_trip_request() {
        let msg = ArpMessage::request(mac(1), Address::new(10, 0, 0, 1), Address::new(10, 0, 0, 2));
        let bytes = msg.serialize();
        assert_eq!(bytes.len(), WIRE_LEN);
        assert_eq!(ArpMessage::parse(&bytes).unwrap(), msg);
    }

    #[test]
    fn round_trip_reply() {
        let msg = ArpMessage::reply(mac(1), Address::new(10, 0, 0, 1), mac(2), Address::new(10, 0, 0, 2));
        let bytes = msg.serialize();
        assert_eq!(ArpMessage::parse(&bytes).unwrap(), msg);
    }

    #[test]
    fn rejects_short_buffer() {
        assert!(matches!(ArpMessage::parse(&[0u8; 20]), Err(ParseError::Arp(_))));
    }

    #[test]
    fn rejects_bad_hardware_type() {
        let mut msg = ArpMessage::request(mac(1), Address::new(1, 1, 1, 1), Address::new(2, 2, 2, 2)).serialize();
        msg[1] = 2; // htype = 2 (not Ethernet)
        assert!(matches!(ArpMessage::parse(&msg), Err(ParseError::Arp(_))));
    }
}
