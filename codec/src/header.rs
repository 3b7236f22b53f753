use crate::error::{DecodeError, EncodeError};
use crate::qos::QoS;
use crate::var_int::{self, VarIntOutcome};

/// Control packet type, carrying the flag bits that are meaningful for it.
///
/// Reserved flag bits are validated on decode rather than stored; a packet
/// whose reserved bits are set is rejected before this type is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    Connect,
    ConnectAck,
    Publish { dup: bool, qos: QoS, retain: bool },
    PublishAck,
    PublishReceived,
    PublishRelease,
    PublishComplete,
    Subscribe,
    SubscribeAck,
    Unsubscribe,
    UnsubscribeAck,
    PingRequest,
    PingResponse,
    Disconnect,
}

impl PacketType {
    const fn type_bits(self) -> u8 {
        match self {
            Self::Connect => 1,
            Self::ConnectAck => 2,
            Self::Publish { .. } => 3,
            Self::PublishAck => 4,
            Self::PublishReceived => 5,
            Self::PublishRelease => 6,
            Self::PublishComplete => 7,
            Self::Subscribe => 8,
            Self::SubscribeAck => 9,
            Self::Unsubscribe => 10,
            Self::UnsubscribeAck => 11,
            Self::PingRequest => 12,
            Self::PingResponse => 13,
            Self::Disconnect => 14,
        }
    }

    const fn flag_bits(self) -> u8 {
        match self {
            Self::Publish { dup, qos, retain } => {
                let mut bits = qos.value() << 1;
                if dup {
                    bits |= 0b1000;
                }
                if retain {
                    bits |= 0b0001;
                }
                bits
            }
            // [MQTT-2.2.2-1] PUBREL, SUBSCRIBE, UNSUBSCRIBE reserve 0b0010.
            Self::PublishRelease | Self::Subscribe | Self::Unsubscribe => 0b0010,
            _ => 0,
        }
    }

    /// Decode a `PacketType` from the fixed header's first byte, validating
    /// that its flag bits are legal for the packet type they accompany.
    pub(crate) fn from_byte(byte: u8) -> Result<Self, DecodeError> {
        let type_bits = byte >> 4;
        let flags = byte & 0x0f;
        match type_bits {
            1 if flags == 0 => Ok(Self::Connect),
            2 if flags == 0 => Ok(Self::ConnectAck),
            3 => Ok(Self::Publish {
                dup: flags & 0b1000 != 0,
                qos: QoS::try_from((flags >> 1) & 0b11)?,
                retain: flags & 0b0001 != 0,
            }),
            4 if flags == 0 => Ok(Self::PublishAck),
            5 if flags == 0 => Ok(Self::PublishReceived),
            6 if flags == 0b0010 => Ok(Self::PublishRelease),
            7 if flags == 0 => Ok(Self::PublishComplete),
            8 if flags == 0b0010 => Ok(Self::Subscribe),
            9 if flags == 0 => Ok(Self::SubscribeAck),
            10 if flags == 0b0010 => Ok(Self::Unsubscribe),
            11 if flags == 0 => Ok(Self::UnsubscribeAck),
            12 if flags == 0 => Ok(Self::PingRequest),
            13 if flags == 0 => Ok(Self::PingResponse),
            14 if flags == 0 => Ok(Self::Disconnect),
            1..=14 => {
                log::error!("header: got invalid flag bits {flags:#06b} for type {type_bits}");
                Err(DecodeError::InvalidPacketFlags)
            }
            _ => {
                log::error!("header: invalid type_bits {type_bits:#06b}");
                Err(DecodeError::InvalidPacketType)
            }
        }
    }

    const fn to_byte(self) -> u8 {
        (self.type_bits() << 4) | self.flag_bits()
    }
}

/// Fixed header common to every control packet: type/flags byte plus the
/// varint length of everything that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedHeader {
    packet_type: PacketType,
    remaining_length: usize,
}

/// Outcome of attempting to read a fixed header from a streaming buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedHeaderOutcome {
    NeedMore,
    Malformed(DecodeError),
    Header { header: FixedHeader, consumed: usize },
}

impl FixedHeader {
    #[must_use]
    pub const fn new(packet_type: PacketType, remaining_length: usize) -> Self {
        Self {
            packet_type,
            remaining_length,
        }
    }

    #[must_use]
    pub const fn packet_type(&self) -> PacketType {
        self.packet_type
    }

    #[must_use]
    pub const fn remaining_length(&self) -> usize {
        self.remaining_length
    }

    /// Total encoded size of this fixed header (type byte + varint).
    ///
    /// # Errors
    ///
    /// Returns `EncodeError::ValueTooLarge` if `remaining_length` exceeds
    /// 268,435,455.
    pub fn bytes(&self) -> Result<usize, EncodeError> {
        let len = var_int::encoded_len(self.remaining_length)?;
        Ok(1 + len)
    }

    /// Attempt to parse a fixed header from the start of `buf` without
    /// consuming anything on `NeedMore`.
    #[must_use]
    pub fn try_decode(buf: &[u8]) -> FixedHeaderOutcome {
        if buf.is_empty() {
            return FixedHeaderOutcome::NeedMore;
        }
        let packet_type = match PacketType::from_byte(buf[0]) {
            Ok(pt) => pt,
            Err(err) => return FixedHeaderOutcome::Malformed(err),
        };
        match var_int::try_decode(&buf[1..]) {
            VarIntOutcome::NeedMore => FixedHeaderOutcome::NeedMore,
            VarIntOutcome::Malformed => {
                FixedHeaderOutcome::Malformed(DecodeError::InvalidVarInt)
            }
            VarIntOutcome::Value { value, consumed } => FixedHeaderOutcome::Header {
                header: Self::new(packet_type, value),
                consumed: 1 + consumed,
            },
        }
    }

    pub(crate) fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        buf.push(self.packet_type.to_byte());
        let written = var_int::encode(self.remaining_length, buf)?;
        Ok(1 + written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_header_round_trip() {
        let header = FixedHeader::new(
            PacketType::Publish {
                dup: false,
                qos: QoS::AtLeastOnce,
                retain: true,
            },
            10,
        );
        let mut buf = Vec::new();
        header.encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0b0011_0011, 10]);
        match FixedHeader::try_decode(&buf) {
            FixedHeaderOutcome::Header { header: decoded, consumed } => {
                assert_eq!(decoded, header);
                assert_eq!(consumed, 2);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_need_more_on_truncated_varint() {
        assert_eq!(
            FixedHeader::try_decode(&[0b0011_0000 | 0b0010, 0x80]),
            FixedHeaderOutcome::NeedMore
        );
    }

    #[test]
    fn test_invalid_flags() {
        // CONNECT must have flags == 0.
        assert_eq!(
            FixedHeader::try_decode(&[0b0001_0001, 0x00]),
            FixedHeaderOutcome::Malformed(DecodeError::InvalidPacketFlags)
        );
    }

    #[test]
    fn test_ping_request() {
        let header = FixedHeader::new(PacketType::PingRequest, 0);
        let mut buf = Vec::new();
        header.encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0xC0, 0x00]);
    }
}
