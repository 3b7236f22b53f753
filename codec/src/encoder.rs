use crate::error::EncodeError;
use crate::packet::{Frameable, Packet};

/// Total encoded size of `packet`, fixed header included.
///
/// # Errors
///
/// Returns an `EncodeError` if the packet cannot be represented on the wire.
pub fn estimate_size(packet: &Packet) -> Result<usize, EncodeError> {
    let header_len = packet.fixed_header()?.bytes()?;
    Ok(header_len + packet.fixed_header()?.remaining_length())
}

/// Encode each packet in `packets_with_sizes` into `dst_buffer`, in order.
///
/// Each entry carries its own pre-estimated size (from [`estimate_size`]);
/// callers size `dst_buffer` to the sum of those sizes up front rather than
/// letting this function allocate. Returns the number of bytes written.
///
/// # Errors
///
/// Returns `EncodeError::BufferTooSmall` if `dst_buffer` runs out of room
/// for a packet at its stated size, or any other `EncodeError` from the
/// first packet that cannot be encoded; bytes already written for earlier
/// packets remain in `dst_buffer` up to that point, so callers should treat
/// any error as meaning "discard the whole batch."
pub fn encode_many(packets_with_sizes: &[(&Packet, usize)], dst_buffer: &mut [u8]) -> Result<usize, EncodeError> {
    let mut offset = 0;
    for (packet, size) in packets_with_sizes {
        if dst_buffer.len() - offset < *size {
            return Err(EncodeError::BufferTooSmall);
        }
        let mut scratch = Vec::with_capacity(*size);
        let written = packet.encode(&mut scratch)?;
        if offset + written > dst_buffer.len() {
            return Err(EncodeError::BufferTooSmall);
        }
        dst_buffer[offset..offset + written].copy_from_slice(&scratch);
        offset += written;
    }
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::v3::PingRequestPacket;

    #[test]
    fn test_estimate_size_matches_encode() {
        let packet = Packet::from(PingRequestPacket::new());
        let mut buf = Vec::new();
        let written = packet.encode(&mut buf).unwrap();
        assert_eq!(estimate_size(&packet).unwrap(), written);
    }

    #[test]
    fn test_encode_many_fills_buffer() {
        let a = Packet::from(PingRequestPacket::new());
        let b = Packet::from(PingRequestPacket::new());
        let size_a = estimate_size(&a).unwrap();
        let size_b = estimate_size(&b).unwrap();
        let mut dst = vec![0u8; size_a + size_b];
        let written = encode_many(&[(&a, size_a), (&b, size_b)], &mut dst).unwrap();
        assert_eq!(written, dst.len());
        assert_eq!(dst, vec![0xC0, 0x00, 0xC0, 0x00]);
    }

    #[test]
    fn test_encode_many_rejects_undersized_buffer() {
        let packet = Packet::from(PingRequestPacket::new());
        let size = estimate_size(&packet).unwrap();
        let mut dst = vec![0u8; size - 1];
        assert_eq!(
            encode_many(&[(&packet, size)], &mut dst),
            Err(EncodeError::BufferTooSmall)
        );
    }
}
