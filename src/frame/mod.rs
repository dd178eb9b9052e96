//! Frame Module
//!
//! One frame carries exactly one envelope. A frame is a raw deflate stream
//! that starts fresh for every message and ends with the deflate
//! end-of-stream marker, which is the only delimiter on the wire.
//!
//! ## Wire Format
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────┬─────
//! │ Frame 1                      │ Frame 2                      │ ...
//! │ deflate(msgpack{message})    │ deflate(msgpack{message})    │
//! │                        [EOB] │                        [EOB] │
//! └──────────────────────────────┴──────────────────────────────┴─────
//! ```
//!
//! No length prefix. The reader knows a frame is complete when the inflater
//! reaches the end-of-stream marker, so frames must never share a
//! compression context.
//!
//! ## Layers (per message)
//! ```text
//!   write side                         read side
//!   ──────────                         ─────────
//!   envelope encoder                   envelope decoder
//!        │                                  ▲
//!   BufWriter (FrameWriter)            BufReader (FrameReader)
//!        │                                  ▲
//!   Deflater                           Inflater
//!        │                                  ▲
//!   transport writer                   session BufReader ◄── transport reader
//! ```

mod filter;
mod stack;

pub use filter::{Deflater, Inflater};
pub use stack::{FrameReader, FrameWriter};

/// Byte counts for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Uncompressed record bytes
    pub payload_bytes: u64,

    /// Compressed bytes on the wire, end marker included
    pub compressed_bytes: u64,
}
