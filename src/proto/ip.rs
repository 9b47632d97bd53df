//! Prefix masking helper for longest-prefix-match routing.

use crate::proto::addr::{Address, AddressExt};

pub trait MaskableIp {

    /// Keep only the top `prefix_len` bits of this address, zeroing the rest.
    fn take_prefix(self, prefix_len: u8) -> Self;

    /// Return true if the two addresses agree on their top `prefix_len` bits.
    #[inline]
    fn has_same_prefix(self, other: Self, prefix_len: u8) -> bool
        where Self: Sized + Eq
    {
        self.take_prefix(prefix_len) == other.take_prefix(prefix_len)
    }

}

impl MaskableIp for Address {

    #[inline]
    fn take_prefix(self, prefix_len: u8) -> Self {
        debug_assert!(prefix_len <= 32);
        let mask = if prefix_len == 0 {
            0
        } else {
            u32::MAX << (32 - prefix_len)
        };
        Self::from_ipv4_numeric(self.ipv4_numeric() & mask)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_prefix_matches_everything() {
        let a = Address::new(10, 0, 0, 1);
        let b = Address::new(200, 55, 3, 9);
        assert!(a.has_same_prefix(b, 0));
    }

    #[test]
    fn full_prefix_requires_exact_match() {
        let a = Address::new(10, 0, 0, 1);
        let b = Address::new(10, 0, 0, 2);
        assert!(!a.has_same_prefix(b, 32));
        assert!(a.has_same_prefix(a, 32));
    }

    #[test]
    fn partial_prefix() {
        let a = Address::new(10, 1, 2, 3);
        let b = Address::new(10, 1, 200, 5);
        assert!(a.has_same_prefix(b, 16));
        assert!(!a.has_same_prefix(b, 24));
    }
}
