//! Envelope codec
//!
//! Encoding and decoding of a single envelope record, plus helpers that build
//! a complete fresh frame stack around one record.

use std::io::{self, BufRead, Read, Write};

use crate::config::FrameSettings;
use crate::error::{Result, WireError};
use crate::frame::{FrameReader, FrameStats, FrameWriter};

use super::Envelope;

// =============================================================================
// Record Encoding/Decoding
// =============================================================================

/// Encode an envelope as a self-describing record
pub fn encode<W: Write + ?Sized>(envelope: &Envelope, sink: &mut W) -> Result<()> {
    rmp_serde::encode::write_named(sink, envelope).map_err(encode_error)
}

/// Decode exactly one envelope record from `source`
///
/// Structural problems (truncation, wrong type marker, missing field, bad
/// UTF-8) are `MalformedEnvelope`. Failures of the reader underneath keep
/// their own kind.
pub fn decode<R: Read>(source: R) -> Result<Envelope> {
    rmp_serde::from_read(source).map_err(decode_error)
}

fn encode_error(err: rmp_serde::encode::Error) -> WireError {
    match err {
        rmp_serde::encode::Error::InvalidValueWrite(inner) => {
            WireError::from_io(io::Error::from(inner))
        }
        other => WireError::MalformedEnvelope(other.to_string()),
    }
}

fn decode_error(err: rmp_serde::decode::Error) -> WireError {
    use rmp_serde::decode::Error;

    match err {
        Error::InvalidMarkerRead(e) | Error::InvalidDataRead(e) => {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                WireError::MalformedEnvelope(format!("record truncated: {}", e))
            } else {
                WireError::from_io(e)
            }
        }
        other => WireError::MalformedEnvelope(other.to_string()),
    }
}

// =============================================================================
// Framed I/O
// =============================================================================

/// Write one envelope as one complete frame
///
/// Builds a fresh deflater and buffer for this message only, and finishes
/// them before returning. On error the stack is dropped, which still flushes
/// and ends the deflate stream.
pub fn write_frame<W: Write>(
    writer: W,
    envelope: &Envelope,
    settings: &FrameSettings,
) -> Result<FrameStats> {
    let mut frame = FrameWriter::open(writer, settings);
    encode(envelope, &mut frame)?;
    let (_, stats) = frame.finish()?;
    Ok(stats)
}

/// Read one frame and decode the single envelope it carries
///
/// `reader` must be the session-long buffered reader; on success it is
/// positioned at the first byte of the next frame.
pub fn read_frame<R: BufRead>(reader: R, settings: &FrameSettings) -> Result<(Envelope, FrameStats)> {
    let mut frame = FrameReader::open(reader, settings);
    let envelope = decode(&mut frame)?;
    let stats = frame.finish()?;
    Ok((envelope, stats))
}
