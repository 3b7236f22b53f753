use std::time::Duration;

use mqtt_transport::{AddressFamily, BufferCell, ConnectionConfig, ConnectionStatus, TerminationReason};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::time::timeout;

async fn local_listener() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback listener");
    let port = listener.local_addr().expect("local addr").port();
    (listener, port)
}

fn config(port: u16) -> ConnectionConfig {
    ConnectionConfig::new("127.0.0.1", port)
        .with_address_family(AddressFamily::IPv4)
        .with_max_reconnect_attempts(3)
        .with_reconnect_interval(Duration::from_millis(50))
}

#[tokio::test]
async fn connect_write_and_read_echo() {
    let (listener, port) = local_listener().await;
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut buf = [0u8; 64];
        let n = socket.read(&mut buf).await.expect("read from client");
        socket.write_all(&buf[..n]).await.expect("echo back to client");
    });

    let mut handle = mqtt_transport::spawn(config(port));
    handle.connect(Duration::from_secs(2));

    handle.write(BufferCell::new(vec![1, 2, 3, 4])).expect("write to transport");
    let cell = timeout(Duration::from_secs(2), handle.read())
        .await
        .expect("read did not time out")
        .expect("inbound channel open");
    assert_eq!(cell.as_slice(), &[1, 2, 3, 4]);

    handle.close();
    let reason = timeout(Duration::from_secs(2), handle.terminated())
        .await
        .expect("terminated did not time out")
        .expect("terminated channel delivered");
    assert_eq!(reason, TerminationReason::Normal);
}

#[tokio::test]
async fn status_reaches_connected() {
    let (listener, port) = local_listener().await;
    tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.expect("accept");
        std::future::pending::<()>().await;
    });

    let handle = mqtt_transport::spawn(config(port));
    handle.connect(Duration::from_secs(2));

    let mut last = ConnectionStatus::Connecting;
    for _ in 0..200 {
        last = handle.status();
        if last == ConnectionStatus::Connected {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(last, ConnectionStatus::Connected);
    handle.close();
}

#[tokio::test]
async fn reconnect_after_forced_kick() {
    let (listener, port) = local_listener().await;
    let accepts = std::sync::Arc::new(tokio::sync::Mutex::new(0u32));
    let accepts_task = accepts.clone();
    tokio::spawn(async move {
        // First connection: accept then immediately drop to force a reset.
        let (socket, _) = listener.accept().await.expect("first accept");
        drop(socket);
        *accepts_task.lock().await += 1;

        // Second connection: stay alive so the reconnect can settle.
        let (_socket, _) = listener.accept().await.expect("second accept");
        *accepts_task.lock().await += 1;
        std::future::pending::<()>().await;
    });

    let handle = mqtt_transport::spawn(config(port));
    handle.connect(Duration::from_secs(2));

    let mut saw_connected_twice = false;
    let mut connected_count = 0;
    let mut last_status = ConnectionStatus::Connecting;
    for _ in 0..400 {
        let current = handle.status();
        if current == ConnectionStatus::Connected && last_status != ConnectionStatus::Connected {
            connected_count += 1;
        }
        last_status = current;
        if connected_count >= 2 {
            saw_connected_twice = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(saw_connected_twice, "expected transport to reconnect and reach Connected twice");
    handle.close();
}

#[tokio::test]
async fn exhausted_reconnects_terminate_with_could_not_connect() {
    // Bind and immediately drop so the port is (most likely) unreachable;
    // a short connect deadline plus a small attempt budget keeps this fast.
    let (listener, port) = local_listener().await;
    drop(listener);

    let handle = mqtt_transport::spawn(
        ConnectionConfig::new("127.0.0.1", port)
            .with_address_family(AddressFamily::IPv4)
            .with_max_reconnect_attempts(2)
            .with_reconnect_interval(Duration::from_millis(10)),
    );
    handle.connect(Duration::from_millis(200));

    let reason = timeout(Duration::from_secs(5), handle.terminated())
        .await
        .expect("terminated did not time out")
        .expect("terminated channel delivered");
    assert_eq!(reason, TerminationReason::CouldNotConnect);
}

#[tokio::test]
async fn server_absent_then_present() {
    let (listener, port) = local_listener().await;
    // Release the port immediately; the transport's first attempts should
    // fail until the server below binds the same port and starts accepting.
    drop(listener);

    let handle = mqtt_transport::spawn(config(port));
    handle.connect(Duration::from_millis(100));

    tokio::time::sleep(Duration::from_millis(120)).await;
    let listener = TcpListener::bind(("127.0.0.1", port)).await.expect("rebind same port");
    tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.expect("accept after delay");
        std::future::pending::<()>().await;
    });

    let mut reached_connected = false;
    for _ in 0..400 {
        if handle.status() == ConnectionStatus::Connected {
            reached_connected = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(reached_connected, "expected transport to connect once the server appeared");
    handle.close();
}
