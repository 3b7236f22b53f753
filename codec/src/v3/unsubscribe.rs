use crate::byte_array::ByteArray;
use crate::error::{DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::packet::Frameable;
use crate::packet_id::PacketId;
use crate::string_data::StringData;

/// `UNSUBSCRIBE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsubscribePacket {
    packet_id: PacketId,
    topics: Vec<StringData>,
}

impl UnsubscribePacket {
    /// # Errors
    ///
    /// Returns `DecodeError::EmptyTopicFilter` if `topics` is empty.
    pub fn new(packet_id: PacketId, topics: Vec<StringData>) -> Result<Self, DecodeError> {
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
    pub fn topics(&self) -> &[StringData] {
        &self.topics
    }

    fn payload_len(&self) -> usize {
        self.topics.iter().map(StringData::bytes).sum()
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
            topics.push(topic);
        }
        if topics.is_empty() {
            return Err(DecodeError::EmptyTopicFilter);
        }
        Ok(Self { packet_id, topics })
    }
}

impl Frameable for UnsubscribePacket {
    fn packet_type(&self) -> PacketType {
        PacketType::Unsubscribe
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
            t.encode(buf)?;
        }
        Ok(buf.len() - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let packet = UnsubscribePacket::new(
            PacketId::new(1),
            vec![StringData::new("a/b").unwrap(), StringData::new("c/d").unwrap()],
        )
        .unwrap();
        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();
        let header = match FixedHeader::try_decode(&buf) {
            crate::header::FixedHeaderOutcome::Header { header, .. } => header,
            other => panic!("{other:?}"),
        };
        let mut ba = ByteArray::new(&buf[2..]);
        let decoded = UnsubscribePacket::decode(&mut ba, header.remaining_length()).unwrap();
        assert_eq!(decoded, packet);
    }
}
