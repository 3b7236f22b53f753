use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::rustls::client::{ServerCertVerified, ServerCertVerifier};
use tokio_rustls::rustls::{Certificate, ClientConfig, Error as TlsError, ServerName};
use tokio_rustls::{client::TlsStream, TlsConnector};

use crate::config::TlsConfig;
use crate::error::Error;

/// A connected transport stream, plain or TLS-wrapped. Mirrors the shape of
/// a typical MQTT client's connection variants, minus anything not reached
/// by this crate's scope (WebSocket, QUIC).
pub enum Socket {
    Plain(TcpStream),
    Tls(Box<TlsStream<TcpStream>>),
}

impl Socket {
    pub async fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Self::Plain(stream) => stream.read(buf).await,
            Self::Tls(stream) => stream.read(buf).await,
        }
    }

    pub async fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> {
        match self {
            Self::Plain(stream) => stream.write_all(buf).await,
            Self::Tls(stream) => stream.write_all(buf).await,
        }
    }

    pub fn set_nodelay(&self, nodelay: bool) -> std::io::Result<()> {
        match self {
            Self::Plain(stream) => stream.set_nodelay(nodelay),
            Self::Tls(stream) => stream.get_ref().0.set_nodelay(nodelay),
        }
    }

    /// Split into independent read/write halves so the read loop and write
    /// loop can each own one without locking.
    #[must_use]
    pub fn into_split(self) -> (SocketReadHalf, SocketWriteHalf) {
        match self {
            Self::Plain(stream) => {
                let (read, write) = stream.into_split();
                (SocketReadHalf::Plain(read), SocketWriteHalf::Plain(write))
            }
            Self::Tls(stream) => {
                let (read, write) = tokio::io::split(*stream);
                (SocketReadHalf::Tls(read), SocketWriteHalf::Tls(write))
            }
        }
    }
}

pub enum SocketReadHalf {
    Plain(tokio::net::tcp::OwnedReadHalf),
    Tls(tokio::io::ReadHalf<TlsStream<TcpStream>>),
}

impl SocketReadHalf {
    pub async fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Self::Plain(half) => half.read(buf).await,
            Self::Tls(half) => half.read(buf).await,
        }
    }
}

pub enum SocketWriteHalf {
    Plain(tokio::net::tcp::OwnedWriteHalf),
    Tls(tokio::io::WriteHalf<TlsStream<TcpStream>>),
}

impl SocketWriteHalf {
    pub async fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> {
        match self {
            Self::Plain(half) => half.write_all(buf).await,
            Self::Tls(half) => half.write_all(buf).await,
        }
    }
}

/// Defers certificate trust entirely to the config's `verify` callback.
/// Certificate *parsing* stays inside rustls; this crate only relays the
/// raw DER bytes outward, per the scope boundary in the design notes.
struct CallbackVerifier {
    verify: Option<crate::config::VerifyCallback>,
}

impl ServerCertVerifier for CallbackVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &Certificate,
        intermediates: &[Certificate],
        _server_name: &ServerName,
        _scts: &mut dyn Iterator<Item = &[u8]>,
        _ocsp_response: &[u8],
        _now: std::time::SystemTime,
    ) -> Result<ServerCertVerified, TlsError> {
        let Some(verify) = &self.verify else {
            return Err(TlsError::General("no verify callback configured".into()));
        };
        let chain: Vec<Vec<u8>> = intermediates.iter().map(|c| c.0.clone()).collect();
        if verify(&end_entity.0, &chain) {
            Ok(ServerCertVerified::assertion())
        } else {
            Err(TlsError::General("certificate rejected by verify callback".into()))
        }
    }
}

/// Perform the TLS handshake over an already-connected `TcpStream`.
pub async fn upgrade_tls(stream: TcpStream, tls: &TlsConfig) -> Result<Socket, Error> {
    let verifier = CallbackVerifier {
        verify: tls.verify().cloned(),
    };
    let config = ClientConfig::builder()
        .with_safe_defaults()
        .with_custom_certificate_verifier(Arc::new(verifier))
        .with_no_client_auth();
    let connector = TlsConnector::from(Arc::new(config));
    let server_name = ServerName::try_from(tls.server_name())
        .map_err(|_| Error::Tls(format!("invalid server name: {}", tls.server_name())))?;
    let stream = connector
        .connect(server_name, stream)
        .await
        .map_err(|err| Error::Tls(err.to_string()))?;
    Ok(Socket::Tls(Box::new(stream)))
}
