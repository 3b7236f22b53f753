use byteorder::{BigEndian, ByteOrder};

use crate::byte_array::ByteArray;
use crate::error::{DecodeError, EncodeError};

/// Length-prefixed opaque byte string, as used for will messages and
/// username/password fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BinaryData(Vec<u8>);

impl BinaryData {
    /// # Errors
    ///
    /// Returns `EncodeError::TooManyData` if `data` is longer than 65,535 bytes.
    pub fn new(data: impl Into<Vec<u8>>) -> Result<Self, EncodeError> {
        let data = data.into();
        if data.len() > u16::MAX as usize {
            return Err(EncodeError::TooManyData);
        }
        Ok(Self(data))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn bytes(&self) -> usize {
        2 + self.0.len()
    }

    pub(crate) fn decode(ba: &mut ByteArray<'_>) -> Result<Self, DecodeError> {
        let len = ba.read_u16()? as usize;
        let data = ba.read_bytes(len)?.to_vec();
        Ok(Self(data))
    }

    pub(crate) fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let mut len_bytes = [0u8; 2];
        BigEndian::write_u16(&mut len_bytes, self.0.len() as u16);
        buf.extend_from_slice(&len_bytes);
        buf.extend_from_slice(&self.0);
        Ok(self.bytes())
    }
}

impl From<BinaryData> for Vec<u8> {
    fn from(data: BinaryData) -> Self {
        data.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let d = BinaryData::new(vec![0xde, 0xad, 0xbe, 0xef]).unwrap();
        let mut buf = Vec::new();
        d.encode(&mut buf).unwrap();
        let mut ba = ByteArray::new(&buf);
        assert_eq!(BinaryData::decode(&mut ba).unwrap(), d);
    }
}
