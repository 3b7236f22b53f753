use std::sync::Arc;
use std::time::Duration;

const DEFAULT_MAX_FRAME_SIZE: u32 = 64 * 1024;
const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;
const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_secs(5);

/// Which address families DNS resolution should consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressFamily {
    #[default]
    Unspecified,
    IPv4,
    IPv6,
}

/// Verifies a TLS peer certificate chain. Certificate parsing itself is out
/// of scope for this crate; the callback is handed whatever the TLS backend
/// already decoded.
pub type VerifyCallback = Arc<dyn Fn(&[u8], &[Vec<u8>]) -> bool + Send + Sync>;

/// Opaque TLS parameters layered over the socket stream. Held at arm's
/// length deliberately: certificate parsing and trust-store management are
/// a consumer concern.
#[derive(Clone)]
pub struct TlsConfig {
    server_name: String,
    verify: Option<VerifyCallback>,
}

impl TlsConfig {
    #[must_use]
    pub fn new(server_name: impl Into<String>) -> Self {
        Self {
            server_name: server_name.into(),
            verify: None,
        }
    }

    #[must_use]
    pub fn with_verify(mut self, verify: VerifyCallback) -> Self {
        self.verify = Some(verify);
        self
    }

    #[must_use]
    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    #[must_use]
    pub fn verify(&self) -> Option<&VerifyCallback> {
        self.verify.as_ref()
    }
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("server_name", &self.server_name)
            .field("verify", &self.verify.is_some())
            .finish()
    }
}

/// Immutable connection parameters, built with chainable `with_*` setters
/// consumed by value.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    host: String,
    port: u16,
    address_family: AddressFamily,
    max_frame_size: u32,
    max_reconnect_attempts: u32,
    reconnect_interval: Duration,
    tls: Option<TlsConfig>,
}

impl ConnectionConfig {
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            address_family: AddressFamily::Unspecified,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            reconnect_interval: DEFAULT_RECONNECT_INTERVAL,
            tls: None,
        }
    }

    #[must_use]
    pub fn with_address_family(mut self, family: AddressFamily) -> Self {
        self.address_family = family;
        self
    }

    #[must_use]
    pub fn with_max_frame_size(mut self, max_frame_size: u32) -> Self {
        self.max_frame_size = max_frame_size;
        self
    }

    #[must_use]
    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_reconnect_interval(mut self, interval: Duration) -> Self {
        self.reconnect_interval = interval;
        self
    }

    #[must_use]
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub const fn address_family(&self) -> AddressFamily {
        self.address_family
    }

    #[must_use]
    pub const fn max_frame_size(&self) -> u32 {
        self.max_frame_size
    }

    #[must_use]
    pub const fn max_reconnect_attempts(&self) -> u32 {
        self.max_reconnect_attempts
    }

    #[must_use]
    pub const fn reconnect_interval(&self) -> Duration {
        self.reconnect_interval
    }

    #[must_use]
    pub fn tls(&self) -> Option<&TlsConfig> {
        self.tls.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConnectionConfig::new("broker.example.com", 1883);
        assert_eq!(config.max_frame_size(), DEFAULT_MAX_FRAME_SIZE);
        assert_eq!(config.max_reconnect_attempts(), DEFAULT_MAX_RECONNECT_ATTEMPTS);
        assert_eq!(config.reconnect_interval(), DEFAULT_RECONNECT_INTERVAL);
        assert_eq!(config.address_family(), AddressFamily::Unspecified);
        assert!(config.tls().is_none());
    }

    #[test]
    fn test_builder_chain() {
        let config = ConnectionConfig::new("localhost", 8883)
            .with_address_family(AddressFamily::IPv4)
            .with_max_frame_size(4096)
            .with_max_reconnect_attempts(1)
            .with_reconnect_interval(Duration::from_millis(50));
        assert_eq!(config.max_frame_size(), 4096);
        assert_eq!(config.max_reconnect_attempts(), 1);
        assert_eq!(config.reconnect_interval(), Duration::from_millis(50));
        assert_eq!(config.address_family(), AddressFamily::IPv4);
    }
}
