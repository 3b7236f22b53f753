use byteorder::{BigEndian, ByteOrder};

use crate::byte_array::ByteArray;
use crate::error::{DecodeError, EncodeError};

/// Length-prefixed UTF-8 string, as used for client ids, topic names, etc.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StringData(String);

impl StringData {
    /// # Errors
    ///
    /// Returns `EncodeError::TooManyData` if `s` is longer than 65,535 bytes.
    pub fn new(s: impl Into<String>) -> Result<Self, EncodeError> {
        let s = s.into();
        if s.len() > u16::MAX as usize {
            return Err(EncodeError::TooManyData);
        }
        Ok(Self(s))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
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
        let s = ba.read_string(len)?;
        Ok(Self(s))
    }

    pub(crate) fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let mut len_bytes = [0u8; 2];
        BigEndian::write_u16(&mut len_bytes, self.0.len() as u16);
        buf.extend_from_slice(&len_bytes);
        buf.extend_from_slice(self.0.as_bytes());
        Ok(self.bytes())
    }
}

impl From<StringData> for String {
    fn from(s: StringData) -> Self {
        s.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let s = StringData::new("hebo/topic").unwrap();
        let mut buf = Vec::new();
        s.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), s.bytes());
        let mut ba = ByteArray::new(&buf);
        assert_eq!(StringData::decode(&mut ba).unwrap(), s);
    }

    #[test]
    fn test_empty() {
        let s = StringData::new("").unwrap();
        let mut buf = Vec::new();
        s.encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0x00, 0x00]);
    }
}
