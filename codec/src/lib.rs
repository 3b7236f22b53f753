//! Wire codec for MQTT 3.1.1 control packets.
//!
//! [`Decoder`] turns a byte stream, delivered in arbitrary chunks, into a
//! sequence of [`Packet`]s. [`encoder::encode_many`] does the reverse.
//! Everything under [`v3`] is a typed packet body; [`header`] and
//! [`var_int`] are the framing primitives both directions share.

mod binary_data;
mod byte_array;
mod connect_flags;
mod decoder;
mod encoder;
mod error;
mod header;
mod packet;
mod packet_id;
mod qos;
mod string_data;
mod v3;
mod var_int;

pub use binary_data::BinaryData;
pub use decoder::Decoder;
pub use encoder::{encode_many, estimate_size};
pub use error::{DecodeError, EncodeError};
pub use header::{FixedHeader, FixedHeaderOutcome, PacketType};
pub use packet::{Frameable, Packet};
pub use packet_id::{PacketId, PacketIdSequence};
pub use qos::QoS;
pub use string_data::StringData;
pub use v3::{
    ConnectAckPacket, ConnectPacket, ConnectReturnCode, DisconnectPacket, PingRequestPacket,
    PingResponsePacket, PublishAckPacket, PublishCompletePacket, PublishPacket,
    PublishReceivedPacket, PublishReleasePacket, SubscribeAck, SubscribeAckPacket,
    SubscribePacket, SubscribeTopic, UnsubscribeAckPacket, UnsubscribePacket,
};
pub use var_int::{try_decode as try_decode_var_int, MAX_REMAINING_LENGTH};
