use crate::byte_array::ByteArray;
use crate::error::{DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::packet::Frameable;
use crate::packet_id::PacketId;

/// `PUBACK`, the QoS 1 acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishAckPacket {
    packet_id: PacketId,
}

impl PublishAckPacket {
    #[must_use]
    pub const fn new(packet_id: PacketId) -> Self {
        Self { packet_id }
    }

    #[must_use]
    pub const fn packet_id(self) -> PacketId {
        self.packet_id
    }

    pub(crate) fn decode(ba: &mut ByteArray<'_>, remaining_length: usize) -> Result<Self, DecodeError> {
        if remaining_length != PacketId::bytes() {
            return Err(DecodeError::InvalidRemainingLength);
        }
        Ok(Self::new(PacketId::decode(ba)?))
    }
}

impl Frameable for PublishAckPacket {
    fn packet_type(&self) -> PacketType {
        PacketType::PublishAck
    }

    fn fixed_header(&self) -> Result<FixedHeader, EncodeError> {
        Ok(FixedHeader::new(self.packet_type(), PacketId::bytes()))
    }

    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let start = buf.len();
        self.fixed_header()?.encode(buf)?;
        self.packet_id.encode(buf)?;
        Ok(buf.len() - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let packet = PublishAckPacket::new(PacketId::new(42));
        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();
        let mut ba = ByteArray::new(&buf[2..]);
        assert_eq!(PublishAckPacket::decode(&mut ba, 2).unwrap(), packet);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let mut ba = ByteArray::new(&[0x00, 0x01, 0x00]);
        assert_eq!(
            PublishAckPacket::decode(&mut ba, 3),
            Err(DecodeError::InvalidRemainingLength)
        );
    }
}
