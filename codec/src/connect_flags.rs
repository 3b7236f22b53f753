use crate::byte_array::ByteArray;
use crate::error::DecodeError;
use crate::qos::QoS;

/// The CONNECT packet's "Connect Flags" byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectFlags {
    username: bool,
    password: bool,
    will_retain: bool,
    will_qos: QoS,
    will: bool,
    clean_session: bool,
}

impl ConnectFlags {
    #[must_use]
    pub const fn username(self) -> bool {
        self.username
    }

    pub fn set_username(&mut self, on: bool) -> &mut Self {
        self.username = on;
        self
    }

    #[must_use]
    pub const fn password(self) -> bool {
        self.password
    }

    pub fn set_password(&mut self, on: bool) -> &mut Self {
        self.password = on;
        self
    }

    #[must_use]
    pub const fn will(self) -> bool {
        self.will
    }

    pub fn set_will(&mut self, on: bool) -> &mut Self {
        self.will = on;
        self
    }

    #[must_use]
    pub const fn will_qos(self) -> QoS {
        self.will_qos
    }

    pub fn set_will_qos(&mut self, qos: QoS) -> &mut Self {
        self.will_qos = qos;
        self
    }

    #[must_use]
    pub const fn will_retain(self) -> bool {
        self.will_retain
    }

    pub fn set_will_retain(&mut self, on: bool) -> &mut Self {
        self.will_retain = on;
        self
    }

    #[must_use]
    pub const fn clean_session(self) -> bool {
        self.clean_session
    }

    pub fn set_clean_session(&mut self, on: bool) -> &mut Self {
        self.clean_session = on;
        self
    }

    #[must_use]
    pub const fn bytes() -> usize {
        1
    }

    pub(crate) fn decode(ba: &mut ByteArray<'_>) -> Result<Self, DecodeError> {
        let byte = ba.read_byte()?;
        if byte & 0x01 != 0 {
            return Err(DecodeError::InvalidConnectFlags);
        }
        let clean_session = byte & 0b0000_0010 != 0;
        let will = byte & 0b0000_0100 != 0;
        let will_qos = QoS::try_from((byte >> 3) & 0b11)?;
        let will_retain = byte & 0b0010_0000 != 0;
        let password = byte & 0b0100_0000 != 0;
        let username = byte & 0b1000_0000 != 0;

        if !will && (will_qos != QoS::AtMostOnce || will_retain) {
            return Err(DecodeError::InvalidConnectFlags);
        }
        if password && !username {
            return Err(DecodeError::InvalidConnectFlags);
        }

        Ok(Self {
            username,
            password,
            will_retain,
            will_qos,
            will,
            clean_session,
        })
    }

    pub(crate) fn encode(self, buf: &mut Vec<u8>) -> Result<usize, DecodeError> {
        if self.password && !self.username {
            return Err(DecodeError::InvalidConnectFlags);
        }
        let mut byte = 0u8;
        if self.username {
            byte |= 0b1000_0000;
        }
        if self.password {
            byte |= 0b0100_0000;
        }
        if self.will_retain {
            byte |= 0b0010_0000;
        }
        byte |= self.will_qos.value() << 3;
        if self.will {
            byte |= 0b0000_0100;
        }
        if self.clean_session {
            byte |= 0b0000_0010;
        }
        buf.push(byte);
        Ok(1)
    }
}
