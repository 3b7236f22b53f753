use crate::binary_data::BinaryData;
use crate::byte_array::ByteArray;
use crate::connect_flags::ConnectFlags;
use crate::error::{DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::packet::Frameable;
use crate::string_data::StringData;

const PROTOCOL_NAME: &str = "MQTT";
const PROTOCOL_LEVEL: u8 = 4;
const MAX_CLIENT_ID_LEN: usize = 23;

/// CONNECT, sent once by the client immediately after the TCP/TLS socket is
/// established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectPacket {
    connect_flags: ConnectFlags,
    keep_alive: u16,
    client_id: StringData,
    will_topic: StringData,
    will_message: BinaryData,
    username: StringData,
    password: BinaryData,
}

impl ConnectPacket {
    /// # Errors
    ///
    /// Returns `EncodeError::InvalidClientId` if `client_id` is longer than
    /// 23 bytes (the MQTT 3.1.1 minimum a server is required to accept).
    pub fn new(client_id: &str, keep_alive: u16) -> Result<Self, EncodeError> {
        if client_id.len() > MAX_CLIENT_ID_LEN {
            return Err(EncodeError::InvalidClientId);
        }
        let mut connect_flags = ConnectFlags::default();
        connect_flags.set_clean_session(true);
        Ok(Self {
            connect_flags,
            keep_alive,
            client_id: StringData::new(client_id)?,
            will_topic: StringData::default(),
            will_message: BinaryData::default(),
            username: StringData::default(),
            password: BinaryData::default(),
        })
    }

    #[must_use]
    pub const fn connect_flags(&self) -> &ConnectFlags {
        &self.connect_flags
    }

    #[must_use]
    pub const fn keep_alive(&self) -> u16 {
        self.keep_alive
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        self.client_id.as_str()
    }

    pub fn set_clean_session(&mut self, on: bool) -> &mut Self {
        self.connect_flags.set_clean_session(on);
        self
    }

    /// # Errors
    ///
    /// Returns `EncodeError::TooManyData` if `topic` or `message` exceed
    /// 65,535 bytes.
    pub fn set_will(
        &mut self,
        topic: &str,
        message: &[u8],
        qos: crate::qos::QoS,
        retain: bool,
    ) -> Result<&mut Self, EncodeError> {
        self.will_topic = StringData::new(topic)?;
        self.will_message = BinaryData::new(message.to_vec())?;
        self.connect_flags.set_will(true);
        self.connect_flags.set_will_qos(qos);
        self.connect_flags.set_will_retain(retain);
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `EncodeError::TooManyData` if `username` or `password`
    /// exceed 65,535 bytes.
    pub fn set_credentials(
        &mut self,
        username: &str,
        password: Option<&[u8]>,
    ) -> Result<&mut Self, EncodeError> {
        self.username = StringData::new(username)?;
        self.connect_flags.set_username(true);
        if let Some(password) = password {
            self.password = BinaryData::new(password.to_vec())?;
            self.connect_flags.set_password(true);
        }
        Ok(self)
    }

    fn payload_len(&self) -> usize {
        let mut len = self.client_id.bytes();
        if self.connect_flags.will() {
            len += self.will_topic.bytes() + self.will_message.bytes();
        }
        if self.connect_flags.username() {
            len += self.username.bytes();
        }
        if self.connect_flags.password() {
            len += self.password.bytes();
        }
        len
    }

    fn variable_header_len() -> usize {
        StringData::new(PROTOCOL_NAME).expect("constant fits").bytes() + 1 + ConnectFlags::bytes() + 2
    }

    pub(crate) fn decode(ba: &mut ByteArray<'_>, remaining_length: usize) -> Result<Self, DecodeError> {
        let start = ba.offset();
        let protocol_name = StringData::decode(ba)?;
        if protocol_name.as_str() != PROTOCOL_NAME {
            return Err(DecodeError::InvalidProtocolName);
        }
        let protocol_level = ba.read_byte()?;
        if protocol_level != PROTOCOL_LEVEL {
            return Err(DecodeError::InvalidProtocolLevel);
        }
        let connect_flags = ConnectFlags::decode(ba)?;
        let keep_alive = ba.read_u16()?;
        let client_id = StringData::decode(ba)?;
        if client_id.is_empty() && !connect_flags.clean_session() {
            return Err(DecodeError::InvalidClientId);
        }

        let mut will_topic = StringData::default();
        let mut will_message = BinaryData::default();
        if connect_flags.will() {
            will_topic = StringData::decode(ba)?;
            if will_topic.is_empty() {
                return Err(DecodeError::InvalidClientId);
            }
            will_message = BinaryData::decode(ba)?;
        }

        let mut username = StringData::default();
        if connect_flags.username() {
            username = StringData::decode(ba)?;
        }
        let mut password = BinaryData::default();
        if connect_flags.password() {
            password = BinaryData::decode(ba)?;
        }

        if ba.offset() - start != remaining_length {
            return Err(DecodeError::InvalidRemainingLength);
        }

        Ok(Self {
            connect_flags,
            keep_alive,
            client_id,
            will_topic,
            will_message,
            username,
            password,
        })
    }
}

impl Frameable for ConnectPacket {
    fn packet_type(&self) -> PacketType {
        PacketType::Connect
    }

    fn fixed_header(&self) -> Result<FixedHeader, EncodeError> {
        Ok(FixedHeader::new(
            self.packet_type(),
            Self::variable_header_len() + self.payload_len(),
        ))
    }

    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let start = buf.len();
        self.fixed_header()?.encode(buf)?;
        StringData::new(PROTOCOL_NAME)?.encode(buf)?;
        buf.push(PROTOCOL_LEVEL);
        self.connect_flags
            .encode(buf)
            .map_err(|_| EncodeError::InvalidClientId)?;
        buf.extend_from_slice(&self.keep_alive.to_be_bytes());
        self.client_id.encode(buf)?;
        if self.connect_flags.will() {
            self.will_topic.encode(buf)?;
            self.will_message.encode(buf)?;
        }
        if self.connect_flags.username() {
            self.username.encode(buf)?;
        }
        if self.connect_flags.password() {
            self.password.encode(buf)?;
        }
        Ok(buf.len() - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut packet = ConnectPacket::new("wvPTXcCw", 60).unwrap();
        packet.set_credentials("ivy", Some(b"hunter2")).unwrap();
        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();

        let header = match FixedHeader::try_decode(&buf) {
            crate::header::FixedHeaderOutcome::Header { header, .. } => header,
            other => panic!("{other:?}"),
        };
        let mut ba = ByteArray::new(&buf[2..]);
        let decoded = ConnectPacket::decode(&mut ba, header.remaining_length()).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn test_rejects_wrong_protocol_name() {
        let mut buf = Vec::new();
        StringData::new("MQisdp").unwrap().encode(&mut buf).unwrap();
        buf.push(PROTOCOL_LEVEL);
        buf.push(0b0000_0010); // clean session
        buf.extend_from_slice(&60u16.to_be_bytes());
        StringData::new("c").unwrap().encode(&mut buf).unwrap();
        let len = buf.len();
        let mut ba = ByteArray::new(&buf);
        assert_eq!(
            ConnectPacket::decode(&mut ba, len),
            Err(DecodeError::InvalidProtocolName)
        );
    }

    #[test]
    fn test_empty_client_id_requires_clean_session() {
        let mut buf = Vec::new();
        StringData::new(PROTOCOL_NAME).unwrap().encode(&mut buf).unwrap();
        buf.push(PROTOCOL_LEVEL);
        buf.push(0b0000_0000); // clean session = false
        buf.extend_from_slice(&60u16.to_be_bytes());
        StringData::new("").unwrap().encode(&mut buf).unwrap();
        let len = buf.len();
        let mut ba = ByteArray::new(&buf);
        assert_eq!(
            ConnectPacket::decode(&mut ba, len),
            Err(DecodeError::InvalidClientId)
        );
    }
}
