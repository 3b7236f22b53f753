use crate::byte_array::ByteArray;
use crate::error::{DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::packet::Frameable;
use crate::packet_id::PacketId;
use crate::qos::QoS;

/// Per-topic result in a SUBACK payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeAck {
    Success(QoS),
    Failure,
}

impl SubscribeAck {
    const fn value(self) -> u8 {
        match self {
            Self::Success(qos) => qos.value(),
            Self::Failure => 0x80,
        }
    }

    fn from_byte(byte: u8) -> Result<Self, DecodeError> {
        if byte == 0x80 {
            Ok(Self::Failure)
        } else if byte & 0b1111_1100 == 0 {
            Ok(Self::Success(QoS::try_from(byte)?))
        } else {
            Err(DecodeError::InvalidQoS)
        }
    }
}

/// `SUBACK`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeAckPacket {
    packet_id: PacketId,
    acks: Vec<SubscribeAck>,
}

impl SubscribeAckPacket {
    #[must_use]
    pub const fn new(packet_id: PacketId, acks: Vec<SubscribeAck>) -> Self {
        Self { packet_id, acks }
    }

    #[must_use]
    pub const fn packet_id(&self) -> PacketId {
        self.packet_id
    }

    #[must_use]
    pub fn acks(&self) -> &[SubscribeAck] {
        &self.acks
    }

    pub(crate) fn decode(ba: &mut ByteArray<'_>, remaining_length: usize) -> Result<Self, DecodeError> {
        let start = ba.offset();
        let packet_id = PacketId::decode(ba)?;
        let mut acks = Vec::new();
        while ba.offset() - start < remaining_length {
            acks.push(SubscribeAck::from_byte(ba.read_byte()?)?);
        }
        Ok(Self { packet_id, acks })
    }
}

impl Frameable for SubscribeAckPacket {
    fn packet_type(&self) -> PacketType {
        PacketType::SubscribeAck
    }

    fn fixed_header(&self) -> Result<FixedHeader, EncodeError> {
        Ok(FixedHeader::new(
            self.packet_type(),
            PacketId::bytes() + self.acks.len(),
        ))
    }

    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let start = buf.len();
        self.fixed_header()?.encode(buf)?;
        self.packet_id.encode(buf)?;
        for ack in &self.acks {
            buf.push(ack.value());
        }
        Ok(buf.len() - start)
    }
}
