use byteorder::{BigEndian, ByteOrder};

use crate::byte_array::ByteArray;
use crate::error::{DecodeError, EncodeError};

/// Packet identifier used by PUBLISH (QoS>0), (UN)SUBSCRIBE and their
/// acknowledgements. Zero is reserved and never assigned by a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PacketId(u16);

impl PacketId {
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn bytes() -> usize {
        2
    }

    pub(crate) fn decode(ba: &mut ByteArray<'_>) -> Result<Self, DecodeError> {
        Ok(Self(ba.read_u16()?))
    }

    pub(crate) fn encode(self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let mut tmp = [0u8; 2];
        BigEndian::write_u16(&mut tmp, self.0);
        buf.extend_from_slice(&tmp);
        Ok(2)
    }
}

impl From<u16> for PacketId {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for PacketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic packet-id allocator, wrapping at `u16::MAX` back to 1 (0 is
/// reserved).
#[derive(Debug, Clone, Copy)]
pub struct PacketIdSequence(u16);

impl PacketIdSequence {
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    pub fn next(&mut self) -> PacketId {
        self.0 = self.0.wrapping_add(1);
        if self.0 == 0 {
            self.0 = 1;
        }
        PacketId(self.0)
    }
}

impl Default for PacketIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_skips_zero_on_wrap() {
        let mut seq = PacketIdSequence::new();
        seq.0 = u16::MAX - 1;
        assert_eq!(seq.next().value(), u16::MAX);
        assert_eq!(seq.next().value(), 1);
    }

    #[test]
    fn test_encode_decode() {
        let id = PacketId::new(0x1234);
        let mut buf = Vec::new();
        id.encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0x12, 0x34]);
        let mut ba = ByteArray::new(&buf);
        assert_eq!(PacketId::decode(&mut ba).unwrap(), id);
    }
}
