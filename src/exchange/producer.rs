//! Producer loop
//!
//! Writes one frame per acquired gate token.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crate::config::FrameSettings;
use crate::envelope::{write_frame, Envelope};
use crate::error::{Result, WireError};
use crate::frame::FrameStats;
use crate::gate::Gate;

/// Producing side of an exchange
pub struct Producer<W: Write> {
    /// Transport writer, kept for the whole session
    writer: W,

    /// Shared with the consumer
    gate: Arc<Gate>,

    settings: FrameSettings,

    /// How long to wait for the previous message to be acknowledged
    ack_timeout: Duration,

    /// Messages written so far
    sent: usize,
}

impl<W: Write> Producer<W> {
    pub fn new(writer: W, gate: Arc<Gate>, settings: FrameSettings, ack_timeout: Duration) -> Self {
        Self {
            writer,
            gate,
            settings,
            ack_timeout,
            sent: 0,
        }
    }

    /// Send one envelope as one frame
    ///
    /// Waits for the gate first, so nothing of this message reaches the
    /// transport until the previous message has been decoded.
    pub fn send(&mut self, envelope: &Envelope) -> Result<FrameStats> {
        let index = self.sent;
        tracing::debug!(index, "ready to write message");
        self.gate.acquire_timeout(self.ack_timeout)?;

        tracing::debug!(index, "writing message");
        let stats = write_frame(&mut self.writer, envelope, &self.settings)?;
        self.writer.flush().map_err(WireError::from_io)?;

        self.sent += 1;
        tracing::debug!(
            index,
            payload_bytes = stats.payload_bytes,
            compressed_bytes = stats.compressed_bytes,
            "message written"
        );
        Ok(stats)
    }

    pub fn sent(&self) -> usize {
        self.sent
    }
}
