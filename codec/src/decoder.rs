use bytes::{Buf, BytesMut};

use crate::error::DecodeError;
use crate::header::{FixedHeader, FixedHeaderOutcome};
use crate::packet::Packet;

/// Streaming decoder that turns a byte stream (delivered in arbitrary,
/// possibly mid-packet chunks) into a sequence of `Packet`s.
///
/// Once a malformed packet is observed the decoder is poisoned: every
/// subsequent call to `try_decode` returns the same error without touching
/// the buffer, since the byte stream can no longer be trusted to be
/// frame-aligned.
pub struct Decoder {
    buffer: BytesMut,
    poison: Option<DecodeError>,
}

impl Decoder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
            poison: None,
        }
    }

    /// Append freshly-read bytes to the decoder's internal buffer.
    pub fn feed(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Decode as many complete packets as the buffer currently holds.
    ///
    /// Leaves any trailing partial packet buffered for the next call.
    ///
    /// # Errors
    ///
    /// Returns the poisoning `DecodeError` once a malformed packet has been
    /// observed, on this call and every call thereafter.
    pub fn try_decode(&mut self) -> Result<Vec<Packet>, DecodeError> {
        if let Some(err) = self.poison {
            return Err(err);
        }
        let mut packets = Vec::new();
        loop {
            match FixedHeader::try_decode(&self.buffer) {
                FixedHeaderOutcome::NeedMore => break,
                FixedHeaderOutcome::Malformed(err) => {
                    log::error!("decoder: malformed fixed header, poisoning stream: {err}");
                    self.poison = Some(err);
                    return Err(err);
                }
                FixedHeaderOutcome::Header { header, consumed } => {
                    let total = consumed + header.remaining_length();
                    if self.buffer.len() < total {
                        break;
                    }
                    let body = self.buffer[consumed..total].to_vec();
                    match Packet::decode_body(header, &body) {
                        Ok(packet) => packets.push(packet),
                        Err(err) => {
                            log::error!("decoder: malformed packet body, poisoning stream: {err}");
                            self.poison = Some(err);
                            return Err(err);
                        }
                    }
                    self.buffer.advance(total);
                }
            }
        }
        Ok(packets)
    }

    /// Number of bytes currently buffered but not yet decoded into a packet.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::Frameable;
    use crate::v3::PingRequestPacket;

    #[test]
    fn test_decodes_split_across_feeds() {
        let mut decoder = Decoder::new();
        let mut encoded = Vec::new();
        PingRequestPacket::new().encode(&mut encoded).unwrap();

        decoder.feed(&encoded[..1]);
        assert_eq!(decoder.try_decode().unwrap(), vec![]);
        assert_eq!(decoder.buffered_len(), 1);

        decoder.feed(&encoded[1..]);
        let packets = decoder.try_decode().unwrap();
        assert_eq!(packets.len(), 1);
        assert!(matches!(packets[0], Packet::PingRequest(_)));
        assert_eq!(decoder.buffered_len(), 0);
    }

    #[test]
    fn test_decodes_multiple_packets_in_one_feed() {
        let mut decoder = Decoder::new();
        let mut encoded = Vec::new();
        PingRequestPacket::new().encode(&mut encoded).unwrap();
        PingRequestPacket::new().encode(&mut encoded).unwrap();

        decoder.feed(&encoded);
        let packets = decoder.try_decode().unwrap();
        assert_eq!(packets.len(), 2);
    }

    #[test]
    fn test_poisons_on_malformed() {
        let mut decoder = Decoder::new();
        // CONNECT (type 1) with a non-zero flags nibble is illegal.
        decoder.feed(&[0b0001_0001, 0x00]);
        assert_eq!(
            decoder.try_decode(),
            Err(DecodeError::InvalidPacketFlags)
        );
        // Poisoned: still errors even though nothing new was fed.
        assert_eq!(
            decoder.try_decode(),
            Err(DecodeError::InvalidPacketFlags)
        );
    }

    #[test]
    fn test_need_more_leaves_buffer_untouched() {
        let mut decoder = Decoder::new();
        decoder.feed(&[0xC0]); // PINGREQ type/flags byte, varint not yet sent
        assert_eq!(decoder.try_decode().unwrap(), vec![]);
        assert_eq!(decoder.buffered_len(), 1);
    }
}
