use crate::byte_array::ByteArray;
use crate::error::{DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::packet::Frameable;

/// `PINGREQ`, sent by the client to keep the connection alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PingRequestPacket;

impl PingRequestPacket {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    pub(crate) fn decode(_ba: &mut ByteArray<'_>, remaining_length: usize) -> Result<Self, DecodeError> {
        if remaining_length != 0 {
            return Err(DecodeError::InvalidRemainingLength);
        }
        Ok(Self)
    }
}

impl Frameable for PingRequestPacket {
    fn packet_type(&self) -> PacketType {
        PacketType::PingRequest
    }

    fn fixed_header(&self) -> Result<FixedHeader, EncodeError> {
        Ok(FixedHeader::new(self.packet_type(), 0))
    }

    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let start = buf.len();
        self.fixed_header()?.encode(buf)?;
        Ok(buf.len() - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut buf = Vec::new();
        PingRequestPacket::new().encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0xC0, 0x00]);
    }
}
