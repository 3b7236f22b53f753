use tokio::sync::mpsc;

use crate::buffer::BufferCell;
use crate::error::Error;

/// Non-blocking enqueue side of a duplex byte channel.
#[derive(Clone)]
pub struct BufferWriter {
    tx: mpsc::UnboundedSender<BufferCell>,
}

impl BufferWriter {
    /// # Errors
    ///
    /// Returns `Error::ChannelClosed` once the matching `BufferReader` has
    /// been dropped.
    pub fn write(&self, cell: BufferCell) -> Result<(), Error> {
        self.tx.send(cell).map_err(|_| Error::ChannelClosed)
    }
}

/// Async dequeue side of a duplex byte channel.
pub struct BufferReader {
    rx: mpsc::UnboundedReceiver<BufferCell>,
}

impl BufferReader {
    /// Await the next cell, or `None` once the writer side has been
    /// dropped and the backlog has fully drained.
    pub async fn read_async(&mut self) -> Option<BufferCell> {
        self.rx.recv().await
    }
}

/// Build one direction's writer/reader pair.
#[must_use]
pub fn duplex_channel() -> (BufferWriter, BufferReader) {
    let (tx, rx) = mpsc::unbounded_channel();
    (BufferWriter { tx }, BufferReader { rx })
}

/// Both directions of a connection's byte channels, plus the ends the
/// session-layer handle keeps versus the ends the transport actor keeps.
pub struct ChannelPair {
    /// Given to the session handle; it enqueues bytes to send.
    pub outbound_writer: BufferWriter,
    /// Kept by the transport's write loop.
    pub outbound_reader: BufferReader,
    /// Kept by the transport's read loop.
    pub inbound_writer: BufferWriter,
    /// Given to the session handle; it dequeues bytes received.
    pub inbound_reader: BufferReader,
}

impl ChannelPair {
    #[must_use]
    pub fn new() -> Self {
        let (outbound_writer, outbound_reader) = duplex_channel();
        let (inbound_writer, inbound_reader) = duplex_channel();
        Self {
            outbound_writer,
            outbound_reader,
            inbound_writer,
            inbound_reader,
        }
    }
}

impl Default for ChannelPair {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_then_read() {
        let (writer, mut reader) = duplex_channel();
        writer.write(BufferCell::new(vec![1, 2, 3])).unwrap();
        let cell = reader.read_async().await.unwrap();
        assert_eq!(cell.as_slice(), &[1, 2, 3]);
    }

    #[tokio::test]
    async fn test_read_returns_none_after_writer_dropped() {
        let (writer, mut reader) = duplex_channel();
        drop(writer);
        assert!(reader.read_async().await.is_none());
    }

    #[tokio::test]
    async fn test_write_fails_after_reader_dropped() {
        let (writer, reader) = duplex_channel();
        drop(reader);
        assert!(matches!(
            writer.write(BufferCell::new(vec![])),
            Err(Error::ChannelClosed)
        ));
    }
}
