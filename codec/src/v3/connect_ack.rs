use crate::byte_array::ByteArray;
use crate::error::{DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::packet::Frameable;

/// `CONNACK` return code, sent by the server in response to `CONNECT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectReturnCode {
    Accepted,
    UnacceptableProtocolVersion,
    IdentifierRejected,
    ServerUnavailable,
    BadUserNameOrPassword,
    NotAuthorized,
}

impl ConnectReturnCode {
    const fn value(self) -> u8 {
        match self {
            Self::Accepted => 0,
            Self::UnacceptableProtocolVersion => 1,
            Self::IdentifierRejected => 2,
            Self::ServerUnavailable => 3,
            Self::BadUserNameOrPassword => 4,
            Self::NotAuthorized => 5,
        }
    }
}

impl TryFrom<u8> for ConnectReturnCode {
    type Error = DecodeError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0 => Ok(Self::Accepted),
            1 => Ok(Self::UnacceptableProtocolVersion),
            2 => Ok(Self::IdentifierRejected),
            3 => Ok(Self::ServerUnavailable),
            4 => Ok(Self::BadUserNameOrPassword),
            5 => Ok(Self::NotAuthorized),
            _ => Err(DecodeError::InvalidPacketType),
        }
    }
}

/// `CONNACK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectAckPacket {
    session_present: bool,
    return_code: ConnectReturnCode,
}

impl ConnectAckPacket {
    #[must_use]
    pub const fn new(session_present: bool, return_code: ConnectReturnCode) -> Self {
        // [MQTT-3.2.2-4]: a server MUST set session_present to 0 if it
        // sends a non-zero return code.
        let session_present = session_present && matches!(return_code, ConnectReturnCode::Accepted);
        Self {
            session_present,
            return_code,
        }
    }

    #[must_use]
    pub const fn session_present(self) -> bool {
        self.session_present
    }

    #[must_use]
    pub const fn return_code(self) -> ConnectReturnCode {
        self.return_code
    }

    pub(crate) fn decode(ba: &mut ByteArray<'_>, remaining_length: usize) -> Result<Self, DecodeError> {
        if remaining_length != 2 {
            return Err(DecodeError::InvalidRemainingLength);
        }
        let flags = ba.read_byte()?;
        if flags & 0b1111_1110 != 0 {
            return Err(DecodeError::InvalidConnectFlags);
        }
        let session_present = flags & 0b0000_0001 != 0;
        let return_code = ConnectReturnCode::try_from(ba.read_byte()?)?;
        Ok(Self::new(session_present, return_code))
    }
}

impl Frameable for ConnectAckPacket {
    fn packet_type(&self) -> PacketType {
        PacketType::ConnectAck
    }

    fn fixed_header(&self) -> Result<FixedHeader, EncodeError> {
        Ok(FixedHeader::new(self.packet_type(), 2))
    }

    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let start = buf.len();
        self.fixed_header()?.encode(buf)?;
        buf.push(u8::from(self.session_present));
        buf.push(self.return_code.value());
        Ok(buf.len() - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let packet = ConnectAckPacket::new(true, ConnectReturnCode::Accepted);
        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0x20, 0x02, 0x01, 0x00]);
        let mut ba = ByteArray::new(&buf[2..]);
        assert_eq!(ConnectAckPacket::decode(&mut ba, 2).unwrap(), packet);
    }

    #[test]
    fn test_session_present_forced_false_on_error() {
        let packet = ConnectAckPacket::new(true, ConnectReturnCode::NotAuthorized);
        assert!(!packet.session_present());
    }
}
