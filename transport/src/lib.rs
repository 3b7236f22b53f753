//! Connection lifecycle and byte transport for an MQTT 3.1.1 client.
//!
//! This crate owns the socket: DNS resolution, TCP/TLS connect, a
//! single-owner actor that drives `NotStarted -> Connecting -> Running ->
//! Reconnecting -> Terminated`, and the duplex byte channels a session layer
//! reads and writes through. It does not parse MQTT packets; see
//! `mqtt_codec` for that.

mod buffer;
mod channel;
mod config;
mod connect;
mod error;
mod reconnect;
mod socket;
mod status;
mod transport;

pub use buffer::BufferCell;
pub use config::{AddressFamily, ConnectionConfig, TlsConfig, VerifyCallback};
pub use error::Error;
pub use status::{ConnectionStatus, TerminationReason};
pub use transport::{spawn, TransportHandle};
