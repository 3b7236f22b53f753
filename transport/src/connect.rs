use std::net::SocketAddr;
use std::time::Duration;

use socket2::{Domain, Protocol, SockAddr, Socket as Socket2, Type};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::{AddressFamily, ConnectionConfig};
use crate::error::Error;
use crate::socket::{upgrade_tls, Socket};

fn io_err(kind: std::io::ErrorKind, msg: &str) -> std::io::Error {
    std::io::Error::new(kind, msg)
}

/// Resolve `config`'s host/port, then attempt each resulting address in
/// order until one connects or `deadline` expires.
pub async fn connect(config: &ConnectionConfig, deadline: Duration) -> Result<Socket, Error> {
    let addrs = resolve(config).await?;
    timeout(deadline, connect_in_order(&addrs, config))
        .await
        .unwrap_or_else(|_| Err(Error::Connect(io_err(std::io::ErrorKind::TimedOut, "connect deadline exceeded"))))
}

async fn connect_in_order(addrs: &[SocketAddr], config: &ConnectionConfig) -> Result<Socket, Error> {
    let mut last_err = None;
    for addr in addrs {
        match connect_one(*addr, config).await {
            Ok(socket) => return Ok(socket),
            Err(err) => {
                log::debug!("connect attempt to {addr} failed: {err}");
                last_err = Some(err);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| Error::Connect(io_err(std::io::ErrorKind::NotFound, "no addresses resolved"))))
}

async fn resolve(config: &ConnectionConfig) -> Result<Vec<SocketAddr>, Error> {
    let host_port = format!("{}:{}", config.host(), config.port());
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&host_port)
        .await
        .map_err(Error::Dns)?
        .filter(|addr| match config.address_family() {
            AddressFamily::Unspecified => true,
            AddressFamily::IPv4 => addr.is_ipv4(),
            AddressFamily::IPv6 => addr.is_ipv6(),
        })
        .collect();
    if addrs.is_empty() {
        return Err(Error::Dns(io_err(
            std::io::ErrorKind::NotFound,
            "no addresses matched the configured address family",
        )));
    }
    Ok(addrs)
}

async fn connect_one(addr: SocketAddr, config: &ConnectionConfig) -> Result<Socket, Error> {
    let domain = if addr.is_ipv4() { Domain::IPV4 } else { Domain::IPV6 };
    let raw = Socket2::new(domain, Type::STREAM, Some(Protocol::TCP)).map_err(Error::Connect)?;
    raw.set_nonblocking(true).map_err(Error::Connect)?;

    let buf_size = config.max_frame_size() as usize * 2;
    raw.set_recv_buffer_size(buf_size).map_err(Error::Connect)?;
    raw.set_send_buffer_size(buf_size).map_err(Error::Connect)?;
    raw.set_linger(Some(Duration::from_secs(2))).map_err(Error::Connect)?;

    // A nonblocking connect() on most platforms returns WouldBlock while the
    // handshake is in flight; the authoritative result comes from polling
    // writable readiness below and checking SO_ERROR.
    let _ = raw.connect(&SockAddr::from(addr));

    let stream = TcpStream::from_std(raw.into()).map_err(Error::Connect)?;
    stream.writable().await.map_err(Error::Connect)?;
    if let Some(err) = stream.take_error().map_err(Error::Connect)? {
        return Err(Error::Connect(err));
    }
    stream.set_nodelay(true).map_err(Error::Connect)?;

    let socket = Socket::Plain(stream);
    match config.tls() {
        Some(tls) => {
            let Socket::Plain(plain) = socket else {
                unreachable!("socket was just constructed as Plain")
            };
            upgrade_tls(plain, tls).await
        }
        None => Ok(socket),
    }
}
