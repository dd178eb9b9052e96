//! Consumer loop
//!
//! Decodes one frame at a time and releases the gate after each.

use std::io::{BufReader, Read};
use std::sync::Arc;

use crate::config::FrameSettings;
use crate::envelope::{read_frame, Envelope};
use crate::error::Result;
use crate::frame::FrameStats;
use crate::gate::Gate;

/// Consuming side of an exchange
pub struct Consumer<R: Read> {
    /// Session-long buffer over the transport reader. Per-message inflaters
    /// borrow it, so look-ahead bytes of the next frame are never lost.
    reader: BufReader<R>,

    /// Shared with the producer
    gate: Arc<Gate>,

    settings: FrameSettings,

    /// Messages decoded so far
    received: usize,
}

impl<R: Read> Consumer<R> {
    pub fn new(reader: R, gate: Arc<Gate>, settings: FrameSettings) -> Self {
        Self {
            reader: BufReader::with_capacity(settings.read_buffer_size, reader),
            gate,
            settings,
            received: 0,
        }
    }

    /// Decode the next envelope, then let the producer send another
    pub fn receive(&mut self) -> Result<(Envelope, FrameStats)> {
        let index = self.received;
        tracing::debug!(index, "reading message");

        let (envelope, stats) = read_frame(&mut self.reader, &self.settings)?;

        self.received += 1;
        tracing::debug!(
            index,
            payload_bytes = stats.payload_bytes,
            compressed_bytes = stats.compressed_bytes,
            "message read"
        );
        self.gate.release();
        Ok((envelope, stats))
    }

    pub fn received(&self) -> usize {
        self.received
    }

    /// Bytes already pulled from the transport but not yet decoded
    pub fn buffered(&self) -> &[u8] {
        self.reader.buffer()
    }
}
