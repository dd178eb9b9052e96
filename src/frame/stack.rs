//! Buffered frame stacks
//!
//! Batches small codec reads/writes into larger operations against the
//! filter. Neither side adds bytes or framing of its own.

use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};

use crate::config::FrameSettings;
use crate::error::{Result, WireError};

use super::{Deflater, FrameStats, Inflater};

/// Write side of one frame: `BufWriter<Deflater<W>>`
pub struct FrameWriter<W: Write> {
    buffer: BufWriter<Deflater<W>>,
}

impl<W: Write> FrameWriter<W> {
    /// Open a fresh frame on `writer`
    pub fn open(writer: W, settings: &FrameSettings) -> Self {
        let deflater = Deflater::open(writer, settings.level);
        Self {
            buffer: BufWriter::with_capacity(settings.write_buffer_size, deflater),
        }
    }

    /// Flush the buffer into the deflater, then finish the deflate stream
    ///
    /// The order matters: finishing the deflater first would drop whatever
    /// is still sitting in the buffer.
    pub fn finish(self) -> Result<(W, FrameStats)> {
        let deflater = self
            .buffer
            .into_inner()
            .map_err(|e| WireError::from_io(e.into_error()))?;
        deflater.finish().map_err(WireError::from_io)
    }
}

impl<W: Write> Write for FrameWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.buffer.flush()
    }
}

/// Read side of one frame: `BufReader<Inflater<R>>`
///
/// `R` is the session-long buffered transport reader. It must outlive the
/// frame so bytes belonging to the next frame stay in its buffer.
pub struct FrameReader<R: BufRead> {
    buffer: BufReader<Inflater<R>>,
}

impl<R: BufRead> FrameReader<R> {
    /// Open a fresh frame on `reader`
    pub fn open(reader: R, settings: &FrameSettings) -> Self {
        Self {
            buffer: BufReader::with_capacity(settings.read_buffer_size, Inflater::open(reader)),
        }
    }

    /// Consume the frame through its end marker
    ///
    /// Fails if decompressed bytes remain after the record, since that means
    /// the frame held more than one envelope's worth of data.
    pub fn finish(mut self) -> Result<FrameStats> {
        let trailing =
            io::copy(&mut self.buffer, &mut io::sink()).map_err(WireError::from_io)?;
        if trailing > 0 {
            return Err(WireError::MalformedEnvelope(format!(
                "{} unread bytes after the envelope",
                trailing
            )));
        }

        let inflater = self.buffer.get_ref();
        if !inflater.is_finished() {
            return Err(WireError::MalformedEnvelope(
                "frame ended without an end marker".to_string(),
            ));
        }
        Ok(inflater.stats())
    }
}

impl<R: BufRead> Read for FrameReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.buffer.read(buf)
    }
}
