//! Compression filter
//!
//! Raw deflate in one direction per instance, one instance per message.

use std::io::{self, BufRead, Read, Write};

use flate2::write::DeflateEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

use super::FrameStats;

// =============================================================================
// Write Side
// =============================================================================

/// Compressing half of the filter
///
/// Bytes reach the underlying writer as the encoder emits them; all of them
/// are written once [`Deflater::finish`] returns. Dropping an unfinished
/// Deflater still finishes the stream, so the peer sees a complete frame even
/// when encoding fails partway.
pub struct Deflater<W: Write> {
    encoder: DeflateEncoder<W>,
}

impl<W: Write> Deflater<W> {
    /// Begin a new compressed frame on `writer`
    pub fn open(writer: W, level: Compression) -> Self {
        Self {
            encoder: DeflateEncoder::new(writer, level),
        }
    }

    /// Write the final block and end marker, returning the writer
    pub fn finish(mut self) -> io::Result<(W, FrameStats)> {
        self.encoder.try_finish()?;
        let stats = FrameStats {
            payload_bytes: self.encoder.total_in(),
            compressed_bytes: self.encoder.total_out(),
        };
        let writer = self.encoder.finish()?;
        Ok((writer, stats))
    }
}

impl<W: Write> Write for Deflater<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.encoder.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.encoder.flush()
    }
}

// =============================================================================
// Read Side
// =============================================================================

/// Decompressing half of the filter
///
/// Pulls from a caller-owned `BufRead` and consumes only the compressed bytes
/// it actually uses. Once the end marker is reached every read returns 0 and
/// the underlying buffer is positioned at the first byte of the next frame.
pub struct Inflater<R: BufRead> {
    reader: R,
    state: Decompress,
    finished: bool,
}

impl<R: BufRead> Inflater<R> {
    /// Begin consuming a compressed frame from `reader`
    pub fn open(reader: R) -> Self {
        Self {
            reader,
            // raw deflate, no zlib header
            state: Decompress::new(false),
            finished: false,
        }
    }

    /// True once the end-of-stream marker has been consumed
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            payload_bytes: self.state.total_out(),
            compressed_bytes: self.state.total_in(),
        }
    }
}

impl<R: BufRead> Read for Inflater<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.finished || buf.is_empty() {
            return Ok(0);
        }

        loop {
            let (status, consumed, produced, eof) = {
                let input = self.reader.fill_buf()?;
                let eof = input.is_empty();
                let before_in = self.state.total_in();
                let before_out = self.state.total_out();

                let status = self
                    .state
                    .decompress(input, buf, FlushDecompress::None)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

                let consumed = (self.state.total_in() - before_in) as usize;
                let produced = (self.state.total_out() - before_out) as usize;
                (status, consumed, produced, eof)
            };
            self.reader.consume(consumed);

            if status == Status::StreamEnd {
                self.finished = true;
                return Ok(produced);
            }
            if produced > 0 {
                return Ok(produced);
            }

            if eof {
                return Err(if self.state.total_in() == 0 {
                    io::Error::new(
                        io::ErrorKind::ConnectionAborted,
                        "session closed before the next frame",
                    )
                } else {
                    io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "session closed inside a frame",
                    )
                });
            }

            if consumed == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "inflate made no progress",
                ));
            }
        }
    }
}
