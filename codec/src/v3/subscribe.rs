use crate::byte_array::ByteArray;
use crate::error::{DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::packet::Frameable;
use crate::packet_id::PacketId;
use crate::qos::QoS;
use crate::string_data::StringData;

/// One `(topic filter, requested QoS)` pair in a SUBSCRIBE payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeTopic {
    pub topic: StringData,
    pub qos: QoS,
}

/// `SUBSCRIBE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribePacket {
    packet_id: PacketId,
    topics: Vec<SubscribeTopic>,
}

impl SubscribePacket {
    /// # Errors
    ///
    /// Returns `DecodeError::EmptyTopicFilter` if `topics` is empty.
    pub fn new(packet_id: PacketId, topics: Vec<SubscribeTopic>) -> Result<Self, DecodeError> {
        if topics.is_empty() {
            return Err(DecodeError::EmptyTopicFilter);
        }
        Ok(Self { packet_id, topics })
    }

    #[must_use]
    pub const fn packet_id(&self) -> PacketId {
        self.packet_id
    }

    #[must_use]
    pub fn topics(&self) -> &[SubscribeTopic] {
        &self.topics
    }

    fn payload_len(&self) -> usize {
        self.topics.iter().map(|t| t.topic.bytes() + 1).sum()
    }

    pub(crate) fn decode(ba: &mut ByteArray<'_>, remaining_length: usize) -> Result<Self, DecodeError> {
        let start = ba.offset();
        let packet_id = PacketId::decode(ba)?;
        let mut topics = Vec::new();
        while ba.offset() - start < remaining_length {
            let topic = StringData::decode(ba)?;
            if topic.is_empty() {
                return Err(DecodeError::EmptyTopicFilter);
            }
            let byte = ba.read_byte()?;
            if byte & 0b1111_1100 != 0 {
                return Err(DecodeError::InvalidQoS);
            }
            let qos = QoS::try_from(byte)?;
            topics.push(SubscribeTopic { topic, qos });
        }
        if topics.is_empty() {
            return Err(DecodeError::EmptyTopicFilter);
        }
        Ok(Self { packet_id, topics })
    }
}

impl Frameable for SubscribePacket {
    fn packet_type(&self) -> PacketType {
        PacketType::Subscribe
    }

    fn fixed_header(&self) -> Result<FixedHeader, EncodeError> {
        Ok(FixedHeader::new(
            self.packet_type(),
            PacketId::bytes() + self.payload_len(),
        ))
    }

    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let start = buf.len();
        self.fixed_header()?.encode(buf)?;
        self.packet_id.encode(buf)?;
        for t in &self.topics {
            t.topic.encode(buf)?;
            buf.push(t.qos.value() & 0b11);
        }
        Ok(buf.len() - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let packet = SubscribePacket::new(
            PacketId::new(1),
            vec![
                SubscribeTopic {
                    topic: StringData::new("a/b").unwrap(),
                    qos: QoS::AtLeastOnce,
                },
                SubscribeTopic {
                    topic: StringData::new("c/+/d").unwrap(),
                    qos: QoS::ExactlyOnce,
                },
            ],
        )
        .unwrap();
        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();
        let header = match FixedHeader::try_decode(&buf) {
            crate::header::FixedHeaderOutcome::Header { header, .. } => header,
            other => panic!("{other:?}"),
        };
        let mut ba = ByteArray::new(&buf[2..]);
        let decoded = SubscribePacket::decode(&mut ba, header.remaining_length()).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn test_empty_topic_list_rejected() {
        assert_eq!(
            SubscribePacket::new(PacketId::new(1), vec![]),
            Err(DecodeError::EmptyTopicFilter)
        );
    }
}
