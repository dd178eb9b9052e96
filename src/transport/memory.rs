//! In-memory transport
//!
//! A one-directional byte pipe between two threads. Behaves like one
//! direction of a socket: ordered, blocking reads with an optional timeout,
//! and an orderly close when the writer is dropped.

use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::{Buf, BytesMut};
use parking_lot::{Condvar, Mutex};

struct PipeState {
    buffer: BytesMut,
    writer_closed: bool,
    reader_closed: bool,
}

struct Shared {
    state: Mutex<PipeState>,
    readable: Condvar,
    written: AtomicU64,
}

/// Create a connected writer/reader pair
///
/// `read_timeout` bounds how long a read waits for data; `None` waits
/// forever.
pub fn pipe(read_timeout: Option<Duration>) -> (PipeWriter, PipeReader) {
    let shared = Arc::new(Shared {
        state: Mutex::new(PipeState {
            buffer: BytesMut::new(),
            writer_closed: false,
            reader_closed: false,
        }),
        readable: Condvar::new(),
        written: AtomicU64::new(0),
    });

    (
        PipeWriter {
            shared: Arc::clone(&shared),
        },
        PipeReader {
            shared,
            read_timeout,
        },
    )
}

/// Writing end of a pipe
pub struct PipeWriter {
    shared: Arc<Shared>,
}

impl PipeWriter {
    /// Total bytes accepted so far
    pub fn bytes_written(&self) -> u64 {
        self.shared.written.load(Ordering::SeqCst)
    }
}

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.shared.state.lock();
        if state.reader_closed {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "pipe reader was dropped",
            ));
        }
        state.buffer.extend_from_slice(buf);
        self.shared
            .written
            .fetch_add(buf.len() as u64, Ordering::SeqCst);
        drop(state);
        self.shared.readable.notify_one();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for PipeWriter {
    fn drop(&mut self) {
        self.shared.state.lock().writer_closed = true;
        self.shared.readable.notify_all();
    }
}

/// Reading end of a pipe
pub struct PipeReader {
    shared: Arc<Shared>,
    read_timeout: Option<Duration>,
}

impl PipeReader {
    /// Bytes written but not yet read
    pub fn pending(&self) -> usize {
        self.shared.state.lock().buffer.len()
    }
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let deadline = self.read_timeout.map(|t| Instant::now() + t);
        let mut state = self.shared.state.lock();
        loop {
            if !state.buffer.is_empty() {
                let n = buf.len().min(state.buffer.len());
                buf[..n].copy_from_slice(&state.buffer[..n]);
                state.buffer.advance(n);
                return Ok(n);
            }
            if state.writer_closed {
                return Ok(0);
            }

            match deadline {
                Some(deadline) => {
                    if self.shared.readable.wait_until(&mut state, deadline).timed_out()
                        && state.buffer.is_empty()
                        && !state.writer_closed
                    {
                        return Err(io::Error::new(
                            io::ErrorKind::TimedOut,
                            "pipe read timed out",
                        ));
                    }
                }
                None => self.shared.readable.wait(&mut state),
            }
        }
    }
}

impl Drop for PipeReader {
    fn drop(&mut self) {
        self.shared.state.lock().reader_closed = true;
    }
}
