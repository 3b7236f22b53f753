use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tokio_util::sync::CancellationToken;

use crate::buffer::BufferCell;
use crate::channel::{BufferReader, BufferWriter, ChannelPair};
use crate::config::ConnectionConfig;
use crate::connect;
use crate::error::Error;
use crate::reconnect::ReconnectPolicy;
use crate::socket::{Socket, SocketReadHalf, SocketWriteHalf};
use crate::status::{ConnectionStatus, TerminationReason};

#[derive(Debug)]
enum State {
    NotStarted,
    Connecting,
    Running,
    Reconnecting,
    Terminated,
}

enum Event {
    Connect { deadline: Duration },
    ConnectResult(Result<Socket, Error>),
    WriteError(Error),
    ReadError(Error),
    ReadFinished,
    Close,
    ReconnectExhausted,
}

/// Session-facing handle returned by [`crate::spawn`]. No socket I/O has
/// occurred by the time this is returned; the caller drives the lifecycle
/// with [`TransportHandle::connect`] and [`TransportHandle::close`].
pub struct TransportHandle {
    outbound_writer: BufferWriter,
    inbound_reader: BufferReader,
    terminated: oneshot::Receiver<TerminationReason>,
    status: watch::Receiver<ConnectionStatus>,
    max_frame_size: u32,
    control: mpsc::UnboundedSender<Event>,
}

impl TransportHandle {
    /// Enqueue a buffer for the write loop. Non-blocking.
    ///
    /// # Errors
    ///
    /// Returns `Error::ChannelClosed` after `close()` has fully completed.
    pub fn write(&self, cell: BufferCell) -> Result<(), Error> {
        self.outbound_writer.write(cell)
    }

    /// Await the next inbound buffer, or `None` once the transport has
    /// fully shut down and the backlog has drained.
    pub async fn read(&mut self) -> Option<BufferCell> {
        self.inbound_reader.read_async().await
    }

    /// Post a `Connect` event. Only has an effect while the state machine is
    /// in `Connecting` (initial, or after a reconnect schedules one).
    pub fn connect(&self, deadline: Duration) {
        let _ = self.control.send(Event::Connect { deadline });
    }

    /// Post a `Close` event and begin a graceful, terminal shutdown.
    pub fn close(&self) {
        let _ = self.control.send(Event::Close);
    }

    /// Best-effort observable status; never a synchronization primitive.
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    #[must_use]
    pub const fn max_frame_size(&self) -> u32 {
        self.max_frame_size
    }

    /// Await the terminal outcome of this transport's lifecycle.
    ///
    /// # Errors
    ///
    /// Returns `Error::ChannelClosed` if the transport task panicked before
    /// completing the one-shot (it always completes it on a clean exit).
    pub async fn terminated(self) -> Result<TerminationReason, Error> {
        self.terminated.await.map_err(|_| Error::ChannelClosed)
    }
}

/// Owns the socket across its whole lifecycle: connect, run, reconnect,
/// terminate. Runs as a single spawned task; every field here is touched
/// only from that task (see the design notes on the single-owner model).
struct Transport {
    config: ConnectionConfig,
    state: State,
    status_tx: watch::Sender<ConnectionStatus>,
    reconnect: ReconnectPolicy,
    outbound_reader: Arc<Mutex<BufferReader>>,
    inbound_writer: BufferWriter,
    shutdown_signal: CancellationToken,
    terminated_tx: Option<oneshot::Sender<TerminationReason>>,
    mailbox_tx: mpsc::UnboundedSender<Event>,
    mailbox_rx: mpsc::UnboundedReceiver<Event>,
}

/// Create a transport for `config` and spawn its lifecycle task.
///
/// No DNS resolution or socket I/O happens until the caller posts a
/// `connect` through the returned handle.
#[must_use]
pub fn spawn(config: ConnectionConfig) -> TransportHandle {
    let ChannelPair {
        outbound_writer,
        outbound_reader,
        inbound_writer,
        inbound_reader,
    } = ChannelPair::new();
    let (status_tx, status_rx) = watch::channel(ConnectionStatus::NotStarted);
    let (terminated_tx, terminated_rx) = oneshot::channel();
    let (mailbox_tx, mailbox_rx) = mpsc::unbounded_channel();
    let max_frame_size = config.max_frame_size();
    let reconnect = ReconnectPolicy::new(config.max_reconnect_attempts(), config.reconnect_interval());
    let control = mailbox_tx.clone();

    let actor = Transport {
        config,
        state: State::NotStarted,
        status_tx,
        reconnect,
        outbound_reader: Arc::new(Mutex::new(outbound_reader)),
        inbound_writer,
        shutdown_signal: CancellationToken::new(),
        terminated_tx: Some(terminated_tx),
        mailbox_tx: mailbox_tx.clone(),
        mailbox_rx,
    };
    tokio::spawn(actor.run());

    TransportHandle {
        outbound_writer,
        inbound_reader,
        terminated: terminated_rx,
        status: status_rx,
        max_frame_size,
        control,
    }
}

impl Transport {
    async fn run(mut self) {
        while let Some(event) = self.mailbox_rx.recv().await {
            if self.handle_event(event).await {
                break;
            }
        }
        log::debug!("transport lifecycle task exiting");
    }

    async fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Connect { deadline } => {
                if matches!(self.state, State::NotStarted | State::Connecting) {
                    self.begin_connect(deadline);
                } else {
                    log::debug!("ignoring Connect event in state {:?}", self.state);
                }
                false
            }
            Event::ConnectResult(Ok(socket)) => {
                if matches!(self.state, State::Connecting) {
                    self.on_connected(socket);
                }
                false
            }
            Event::ConnectResult(Err(err)) => {
                if matches!(self.state, State::Connecting) {
                    log::warn!("connect failed: {err}");
                    let _ = self.status_tx.send(ConnectionStatus::Failed);
                    self.state = State::Reconnecting;
                    self.invoke_reconnect_policy();
                }
                false
            }
            Event::WriteError(err) => {
                if matches!(self.state, State::Running) {
                    self.on_loop_failure(&format!("write loop failed: {err}"));
                }
                false
            }
            Event::ReadError(err) => {
                if matches!(self.state, State::Running) {
                    self.on_loop_failure(&format!("read loop failed: {err}"));
                }
                false
            }
            Event::ReadFinished => {
                if matches!(self.state, State::Running) {
                    self.on_loop_failure("read loop observed end of stream");
                }
                false
            }
            Event::Close => {
                if !matches!(self.state, State::Terminated) {
                    self.full_shutdown(TerminationReason::Normal);
                }
                true
            }
            Event::ReconnectExhausted => {
                self.full_shutdown(TerminationReason::CouldNotConnect);
                true
            }
        }
    }

    fn begin_connect(&mut self, deadline: Duration) {
        log::info!("connecting to {}:{}", self.config.host(), self.config.port());
        self.state = State::Connecting;
        let _ = self.status_tx.send(ConnectionStatus::Connecting);
        let config = self.config.clone();
        let mailbox = self.mailbox_tx.clone();
        tokio::spawn(async move {
            let result = connect::connect(&config, deadline).await;
            let _ = mailbox.send(Event::ConnectResult(result));
        });
    }

    fn on_connected(&mut self, socket: Socket) {
        log::info!("connected to {}:{}", self.config.host(), self.config.port());
        self.reconnect.reset();
        self.state = State::Running;
        let _ = self.status_tx.send(ConnectionStatus::Connected);
        self.shutdown_signal = CancellationToken::new();

        let (read_half, write_half) = socket.into_split();
        let max_frame_size = self.config.max_frame_size() as usize;

        tokio::spawn(read_loop(
            read_half,
            self.inbound_writer.clone(),
            max_frame_size,
            self.shutdown_signal.clone(),
            self.mailbox_tx.clone(),
        ));
        tokio::spawn(write_loop(
            write_half,
            Arc::clone(&self.outbound_reader),
            self.shutdown_signal.clone(),
            self.mailbox_tx.clone(),
        ));
    }

    fn on_loop_failure(&mut self, reason: &str) {
        log::warn!("{reason}; entering reconnect");
        self.shutdown_signal.cancel();
        let _ = self.status_tx.send(ConnectionStatus::Aborted);
        self.state = State::Reconnecting;
        self.invoke_reconnect_policy();
    }

    fn invoke_reconnect_policy(&mut self) {
        match self.reconnect.next_delay() {
            Some(delay) => {
                log::info!(
                    "scheduling reconnect attempt {} of {} in {delay:?}",
                    self.reconnect.attempts(),
                    self.config.max_reconnect_attempts()
                );
                self.state = State::Connecting;
                let mailbox = self.mailbox_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = mailbox.send(Event::Connect { deadline: delay });
                });
            }
            None => {
                log::error!(
                    "reconnect attempts exhausted after {} tries",
                    self.reconnect.attempts()
                );
                let _ = self.mailbox_tx.send(Event::ReconnectExhausted);
            }
        }
    }

    fn full_shutdown(&mut self, reason: TerminationReason) {
        log::info!("full shutdown: {reason:?}");
        self.shutdown_signal.cancel();
        self.state = State::Terminated;
        let _ = self.status_tx.send(reason.into_status());
        if let Some(tx) = self.terminated_tx.take() {
            let _ = tx.send(reason);
        }
        // `self` is dropped at the end of `run()`, taking `inbound_writer`
        // and `outbound_reader` with it — the session layer observes
        // `Closed` on both channels without an explicit complete() call.
    }
}

async fn read_loop(
    mut read_half: SocketReadHalf,
    inbound_writer: BufferWriter,
    max_frame_size: usize,
    shutdown: CancellationToken,
    mailbox: mpsc::UnboundedSender<Event>,
) {
    let mut scratch = vec![0u8; max_frame_size];
    loop {
        let read_result = tokio::select! {
            () = shutdown.cancelled() => {
                log::debug!("read loop cancelled");
                return;
            }
            result = read_half.read(&mut scratch) => result,
        };
        match read_result {
            Ok(0) => {
                log::debug!("read loop observed end of stream");
                let _ = mailbox.send(Event::ReadFinished);
                return;
            }
            Ok(n) => {
                log::trace!("read {n} bytes");
                if inbound_writer.write(BufferCell::new(scratch[..n].to_vec())).is_err() {
                    log::debug!("inbound channel closed; read loop exiting");
                    return;
                }
            }
            Err(err) => {
                log::error!("read failed: {err}");
                let _ = mailbox.send(Event::ReadError(Error::Read(err)));
                return;
            }
        }
    }
}

async fn write_loop(
    mut write_half: SocketWriteHalf,
    outbound_reader: Arc<Mutex<BufferReader>>,
    shutdown: CancellationToken,
    mailbox: mpsc::UnboundedSender<Event>,
) {
    loop {
        let cell = {
            let mut reader = outbound_reader.lock().await;
            tokio::select! {
                () = shutdown.cancelled() => {
                    log::debug!("write loop cancelled");
                    return;
                }
                cell = reader.read_async() => cell,
            }
        };
        let Some(cell) = cell else {
            log::debug!("outbound channel closed; write loop exiting");
            return;
        };
        log::trace!("writing {} bytes", cell.len());
        let result = write_half.write_all(cell.as_slice()).await;
        // `cell` is dropped here either way: the buffer is released on both
        // the success and failure paths.
        if let Err(err) = result {
            log::error!("write failed: {err}");
            let _ = mailbox.send(Event::WriteError(Error::Write(err)));
            return;
        }
    }
}
