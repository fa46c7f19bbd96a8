//! Stream adapters between the signin subprocess and the protocol loop.
//!
//! The subprocess side is plain blocking `std::io`: the runner's pump threads
//! copy child stdout/stderr into a [`ChunkSink`] and copy an [`InputFeed`]
//! into child stdin. The protocol loop sits on the async side of the same
//! channels. Every queue has capacity one, so a slow consumer on either end
//! stalls the producer.

use std::io::{self, Read, Write};

use tokio::sync::mpsc;

/// One discrete write from the subprocess to one of its output streams.
pub type Chunk = Vec<u8>;

/// Write sink that publishes each `write` call as a single queued chunk.
///
/// Chunk boundaries are whatever the pipe delivered in one read, not lines.
pub struct ChunkSink {
    tx: mpsc::Sender<Chunk>,
}

/// Create a chunk sink and the receiver the protocol loop consumes.
pub fn chunk_channel() -> (ChunkSink, mpsc::Receiver<Chunk>) {
    let (tx, rx) = mpsc::channel(1);
    (ChunkSink { tx }, rx)
}

impl Write for ChunkSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        // Blocks until the previous chunk has been taken off the queue.
        self.tx
            .blocking_send(buf.to_vec())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "chunk receiver dropped"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Read source that serves queued strings to the subprocess's stdin.
///
/// Leftover bytes from the previous string are drained first; once they are
/// exhausted the next `read` blocks for another string. A closed queue reads
/// as end-of-stream, which is what lets a child blocked on stdin exit.
pub struct InputFeed {
    leftover: Vec<u8>,
    offset: usize,
    rx: mpsc::Receiver<String>,
}

impl InputFeed {
    fn serve(&mut self, buf: &mut [u8]) -> usize {
        let pending = &self.leftover[self.offset..];
        let n = pending.len().min(buf.len());
        buf[..n].copy_from_slice(&pending[..n]);
        self.offset += n;
        if self.offset == self.leftover.len() {
            self.leftover.clear();
            self.offset = 0;
        }
        n
    }
}

impl Read for InputFeed {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.offset < self.leftover.len() {
            return Ok(self.serve(buf));
        }
        match self.rx.blocking_recv() {
            Some(text) => {
                self.leftover = text.into_bytes();
                self.offset = 0;
                Ok(self.serve(buf))
            }
            None => Ok(0),
        }
    }
}

/// Writer half of the synthetic input, owned by the protocol loop.
///
/// The queue can be closed from more than one place (an `ERROR` on stderr,
/// the token arriving on stdout), so the sender is taken exactly once and
/// later closes are no-ops.
pub struct InputQueue {
    tx: Option<mpsc::Sender<String>>,
}

impl InputQueue {
    /// Enqueue `text` for the subprocess. Waits while the previous string is
    /// still unread.
    ///
    /// Returns `false` if the queue was already closed or the feed is gone.
    pub async fn send(&mut self, text: String) -> bool {
        match &self.tx {
            Some(tx) => tx.send(text).await.is_ok(),
            None => {
                log::debug!("input queue already closed, dropping input");
                false
            }
        }
    }

    /// Close the queue so the feed reports end-of-stream once drained.
    pub fn close(&mut self) {
        if self.tx.take().is_some() {
            log::debug!("input queue closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_none()
    }
}

/// Create the synthetic input pair, with `preload` already buffered in the
/// feed ahead of anything sent through the queue.
pub fn input_channel(preload: impl Into<String>) -> (InputQueue, InputFeed) {
    let (tx, rx) = mpsc::channel(1);
    let feed = InputFeed {
        leftover: preload.into().into_bytes(),
        offset: 0,
        rx,
    };
    (InputQueue { tx: Some(tx) }, feed)
}
