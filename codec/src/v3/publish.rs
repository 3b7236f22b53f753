use crate::byte_array::ByteArray;
use crate::error::{DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::packet::Frameable;
use crate::packet_id::PacketId;
use crate::qos::QoS;
use crate::string_data::StringData;

/// `PUBLISH`, carrying application payload. `packet_id` is only meaningful
/// (and only encoded/decoded) when `qos != AtMostOnce`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishPacket {
    dup: bool,
    qos: QoS,
    retain: bool,
    topic: StringData,
    packet_id: PacketId,
    payload: Vec<u8>,
}

impl PublishPacket {
    /// # Errors
    ///
    /// Returns `EncodeError::InvalidClientId` if `topic` is empty, or
    /// `EncodeError::TooManyData` if `topic` exceeds 65,535 bytes.
    pub fn new(topic: &str, qos: QoS, payload: Vec<u8>) -> Result<Self, EncodeError> {
        if topic.is_empty() {
            return Err(EncodeError::InvalidClientId);
        }
        Ok(Self {
            dup: false,
            qos,
            retain: false,
            topic: StringData::new(topic)?,
            packet_id: PacketId::new(0),
            payload,
        })
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        self.topic.as_str()
    }

    #[must_use]
    pub const fn qos(&self) -> QoS {
        self.qos
    }

    #[must_use]
    pub const fn dup(&self) -> bool {
        self.dup
    }

    #[must_use]
    pub const fn retain(&self) -> bool {
        self.retain
    }

    #[must_use]
    pub const fn packet_id(&self) -> PacketId {
        self.packet_id
    }

    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn set_retain(&mut self, on: bool) -> &mut Self {
        self.retain = on;
        self
    }

    /// Re-delivery of a packet with `qos != AtMostOnce`.
    pub fn set_dup(&mut self, on: bool) -> &mut Self {
        if self.qos != QoS::AtMostOnce {
            self.dup = on;
        }
        self
    }

    /// # Panics
    ///
    /// Panics if `qos` is `AtMostOnce` — QoS 0 publishes carry no packet id.
    pub fn set_packet_id(&mut self, packet_id: PacketId) -> &mut Self {
        assert!(
            self.qos != QoS::AtMostOnce,
            "QoS 0 publish cannot carry a packet id"
        );
        self.packet_id = packet_id;
        self
    }

    pub(crate) fn decode(
        ba: &mut ByteArray<'_>,
        packet_type: PacketType,
        remaining_length: usize,
    ) -> Result<Self, DecodeError> {
        let PacketType::Publish { dup, qos, retain } = packet_type else {
            unreachable!("caller guarantees PacketType::Publish")
        };
        if dup && qos == QoS::AtMostOnce {
            return Err(DecodeError::InvalidPacketFlags);
        }
        let start = ba.offset();
        let topic = StringData::decode(ba)?;
        if topic.is_empty() {
            return Err(DecodeError::InvalidClientId);
        }
        let packet_id = if qos == QoS::AtMostOnce {
            PacketId::new(0)
        } else {
            let id = PacketId::decode(ba)?;
            if id.value() == 0 {
                return Err(DecodeError::InvalidPacketId);
            }
            id
        };
        let consumed = ba.offset() - start;
        if consumed > remaining_length {
            return Err(DecodeError::InvalidRemainingLength);
        }
        let payload_len = remaining_length - consumed;
        let payload = ba.read_bytes(payload_len)?.to_vec();
        Ok(Self {
            dup,
            qos,
            retain,
            topic,
            packet_id,
            payload,
        })
    }
}

impl Frameable for PublishPacket {
    fn packet_type(&self) -> PacketType {
        PacketType::Publish {
            dup: self.dup,
            qos: self.qos,
            retain: self.retain,
        }
    }

    fn fixed_header(&self) -> Result<FixedHeader, EncodeError> {
        let mut len = self.topic.bytes() + self.payload.len();
        if self.qos != QoS::AtMostOnce {
            len += PacketId::bytes();
        }
        Ok(FixedHeader::new(self.packet_type(), len))
    }

    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let start = buf.len();
        self.fixed_header()?.encode(buf)?;
        self.topic.encode(buf)?;
        if self.qos != QoS::AtMostOnce {
            self.packet_id.encode(buf)?;
        }
        buf.extend_from_slice(&self.payload);
        Ok(buf.len() - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_qos0() {
        let packet = PublishPacket::new("a/b", QoS::AtMostOnce, b"hello".to_vec()).unwrap();
        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();
        let header = match FixedHeader::try_decode(&buf) {
            crate::header::FixedHeaderOutcome::Header { header, .. } => header,
            other => panic!("{other:?}"),
        };
        let mut ba = ByteArray::new(&buf[2..]);
        let decoded =
            PublishPacket::decode(&mut ba, header.packet_type(), header.remaining_length()).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn test_round_trip_qos1_with_packet_id() {
        let mut packet = PublishPacket::new("a/b", QoS::AtLeastOnce, b"hi".to_vec()).unwrap();
        packet.set_packet_id(PacketId::new(7));
        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();
        let header = match FixedHeader::try_decode(&buf) {
            crate::header::FixedHeaderOutcome::Header { header, .. } => header,
            other => panic!("{other:?}"),
        };
        let mut ba = ByteArray::new(&buf[2..]);
        let decoded =
            PublishPacket::decode(&mut ba, header.packet_type(), header.remaining_length()).unwrap();
        assert_eq!(decoded.packet_id().value(), 7);
    }

    #[test]
    fn test_dup_rejected_on_qos0() {
        let mut packet = PublishPacket::new("a/b", QoS::AtMostOnce, vec![]).unwrap();
        packet.set_dup(true);
        assert!(!packet.dup());
    }
}
