use std::fmt;
use std::io;

use mqtt_codec::{DecodeError, EncodeError};

/// Errors the transport's state machine and loops can raise.
#[derive(Debug)]
pub enum Error {
    Dns(io::Error),
    Connect(io::Error),
    Tls(String),
    Read(io::Error),
    Write(io::Error),
    DecoderMalformed(DecodeError),
    EncoderFailed(EncodeError),
    ChannelClosed,
    ReconnectExhausted,
    Cancelled,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dns(err) => write!(f, "dns resolution failed: {err}"),
            Self::Connect(err) => write!(f, "connect failed: {err}"),
            Self::Tls(msg) => write!(f, "tls error: {msg}"),
            Self::Read(err) => write!(f, "read failed: {err}"),
            Self::Write(err) => write!(f, "write failed: {err}"),
            Self::DecoderMalformed(err) => write!(f, "malformed packet: {err}"),
            Self::EncoderFailed(err) => write!(f, "failed to encode packet: {err}"),
            Self::ChannelClosed => write!(f, "channel closed"),
            Self::ReconnectExhausted => write!(f, "reconnect attempts exhausted"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::error::Error for Error {}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Self::DecoderMalformed(err)
    }
}

impl From<EncodeError> for Error {
    fn from(err: EncodeError) -> Self {
        Self::EncoderFailed(err)
    }
}
