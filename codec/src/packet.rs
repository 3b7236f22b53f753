use crate::byte_array::ByteArray;
use crate::error::{DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::v3::{
    ConnectAckPacket, ConnectPacket, DisconnectPacket, PingRequestPacket, PingResponsePacket,
    PublishAckPacket, PublishCompletePacket, PublishPacket, PublishReceivedPacket,
    PublishReleasePacket, SubscribeAckPacket, SubscribePacket, UnsubscribeAckPacket,
    UnsubscribePacket,
};

/// Common surface every control packet body implements: its wire type and
/// the ability to serialize itself, fixed header included.
pub trait Frameable {
    fn packet_type(&self) -> PacketType;

    /// # Errors
    ///
    /// Returns `EncodeError::ValueTooLarge` if the packet's remaining length
    /// would exceed 268,435,455 bytes.
    fn fixed_header(&self) -> Result<FixedHeader, EncodeError>;

    /// Append this packet's wire representation (fixed header included) to
    /// `buf`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns an `EncodeError` if any field cannot be represented on the
    /// wire (oversized string/binary data, client id too long, etc).
    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError>;
}

/// Any decoded MQTT 3.1.1 control packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Connect(ConnectPacket),
    ConnectAck(ConnectAckPacket),
    Publish(PublishPacket),
    PublishAck(PublishAckPacket),
    PublishReceived(PublishReceivedPacket),
    PublishRelease(PublishReleasePacket),
    PublishComplete(PublishCompletePacket),
    Subscribe(SubscribePacket),
    SubscribeAck(SubscribeAckPacket),
    Unsubscribe(UnsubscribePacket),
    UnsubscribeAck(UnsubscribeAckPacket),
    PingRequest(PingRequestPacket),
    PingResponse(PingResponsePacket),
    Disconnect(DisconnectPacket),
}

impl Packet {
    /// Decode a packet body given its already-parsed fixed header and the
    /// exact slice of bytes the header says follows it (`remaining_length`
    /// bytes, no more, no less).
    pub(crate) fn decode_body(header: FixedHeader, body: &[u8]) -> Result<Self, DecodeError> {
        let mut ba = ByteArray::new(body);
        let remaining_length = header.remaining_length();
        let packet = match header.packet_type() {
            PacketType::Connect => Self::Connect(ConnectPacket::decode(&mut ba, remaining_length)?),
            PacketType::ConnectAck => {
                Self::ConnectAck(ConnectAckPacket::decode(&mut ba, remaining_length)?)
            }
            pt @ PacketType::Publish { .. } => {
                Self::Publish(PublishPacket::decode(&mut ba, pt, remaining_length)?)
            }
            PacketType::PublishAck => {
                Self::PublishAck(PublishAckPacket::decode(&mut ba, remaining_length)?)
            }
            PacketType::PublishReceived => {
                Self::PublishReceived(PublishReceivedPacket::decode(&mut ba, remaining_length)?)
            }
            PacketType::PublishRelease => {
                Self::PublishRelease(PublishReleasePacket::decode(&mut ba, remaining_length)?)
            }
            PacketType::PublishComplete => {
                Self::PublishComplete(PublishCompletePacket::decode(&mut ba, remaining_length)?)
            }
            PacketType::Subscribe => {
                Self::Subscribe(SubscribePacket::decode(&mut ba, remaining_length)?)
            }
            PacketType::SubscribeAck => {
                Self::SubscribeAck(SubscribeAckPacket::decode(&mut ba, remaining_length)?)
            }
            PacketType::Unsubscribe => {
                Self::Unsubscribe(UnsubscribePacket::decode(&mut ba, remaining_length)?)
            }
            PacketType::UnsubscribeAck => {
                Self::UnsubscribeAck(UnsubscribeAckPacket::decode(&mut ba, remaining_length)?)
            }
            PacketType::PingRequest => {
                Self::PingRequest(PingRequestPacket::decode(&mut ba, remaining_length)?)
            }
            PacketType::PingResponse => {
                Self::PingResponse(PingResponsePacket::decode(&mut ba, remaining_length)?)
            }
            PacketType::Disconnect => {
                Self::Disconnect(DisconnectPacket::decode(&mut ba, remaining_length)?)
            }
        };
        if ba.remaining_bytes() != 0 {
            return Err(DecodeError::InvalidRemainingLength);
        }
        Ok(packet)
    }
}

impl Frameable for Packet {
    fn packet_type(&self) -> PacketType {
        match self {
            Self::Connect(p) => p.packet_type(),
            Self::ConnectAck(p) => p.packet_type(),
            Self::Publish(p) => p.packet_type(),
            Self::PublishAck(p) => p.packet_type(),
            Self::PublishReceived(p) => p.packet_type(),
            Self::PublishRelease(p) => p.packet_type(),
            Self::PublishComplete(p) => p.packet_type(),
            Self::Subscribe(p) => p.packet_type(),
            Self::SubscribeAck(p) => p.packet_type(),
            Self::Unsubscribe(p) => p.packet_type(),
            Self::UnsubscribeAck(p) => p.packet_type(),
            Self::PingRequest(p) => p.packet_type(),
            Self::PingResponse(p) => p.packet_type(),
            Self::Disconnect(p) => p.packet_type(),
        }
    }

    fn fixed_header(&self) -> Result<FixedHeader, EncodeError> {
        match self {
            Self::Connect(p) => p.fixed_header(),
            Self::ConnectAck(p) => p.fixed_header(),
            Self::Publish(p) => p.fixed_header(),
            Self::PublishAck(p) => p.fixed_header(),
            Self::PublishReceived(p) => p.fixed_header(),
            Self::PublishRelease(p) => p.fixed_header(),
            Self::PublishComplete(p) => p.fixed_header(),
            Self::Subscribe(p) => p.fixed_header(),
            Self::SubscribeAck(p) => p.fixed_header(),
            Self::Unsubscribe(p) => p.fixed_header(),
            Self::UnsubscribeAck(p) => p.fixed_header(),
            Self::PingRequest(p) => p.fixed_header(),
            Self::PingResponse(p) => p.fixed_header(),
            Self::Disconnect(p) => p.fixed_header(),
        }
    }

    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        match self {
            Self::Connect(p) => p.encode(buf),
            Self::ConnectAck(p) => p.encode(buf),
            Self::Publish(p) => p.encode(buf),
            Self::PublishAck(p) => p.encode(buf),
            Self::PublishReceived(p) => p.encode(buf),
            Self::PublishRelease(p) => p.encode(buf),
            Self::PublishComplete(p) => p.encode(buf),
            Self::Subscribe(p) => p.encode(buf),
            Self::SubscribeAck(p) => p.encode(buf),
            Self::Unsubscribe(p) => p.encode(buf),
            Self::UnsubscribeAck(p) => p.encode(buf),
            Self::PingRequest(p) => p.encode(buf),
            Self::PingResponse(p) => p.encode(buf),
            Self::Disconnect(p) => p.encode(buf),
        }
    }
}

macro_rules! impl_from_packet {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Packet {
            fn from(p: $ty) -> Self {
                Self::$variant(p)
            }
        }
    };
}

impl_from_packet!(Connect, ConnectPacket);
impl_from_packet!(ConnectAck, ConnectAckPacket);
impl_from_packet!(Publish, PublishPacket);
impl_from_packet!(PublishAck, PublishAckPacket);
impl_from_packet!(PublishReceived, PublishReceivedPacket);
impl_from_packet!(PublishRelease, PublishReleasePacket);
impl_from_packet!(PublishComplete, PublishCompletePacket);
impl_from_packet!(Subscribe, SubscribePacket);
impl_from_packet!(SubscribeAck, SubscribeAckPacket);
impl_from_packet!(Unsubscribe, UnsubscribePacket);
impl_from_packet!(UnsubscribeAck, UnsubscribeAckPacket);
impl_from_packet!(PingRequest, PingRequestPacket);
impl_from_packet!(PingResponse, PingResponsePacket);
impl_from_packet!(Disconnect, DisconnectPacket);
