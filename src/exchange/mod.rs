//! Exchange Module
//!
//! Drives a fixed number of produce/consume cycles over one session.
//!
//! ## Responsibilities
//! - Run the producer and consumer loops on two scoped threads
//! - Share one gate between them, open at start
//! - Stop both loops on the first failure and report it
//! - Summarize every message on both sides
//!
//! ## Timeline (N = 3)
//! ```text
//!   producer:  acquire ─ write#0 ─ acquire ······· write#1 ─ acquire ······· write#2
//!                                     ▲                         ▲
//!   consumer:  read#0 ─────────────── release ─ read#1 ──────── release ─ read#2 ─ release
//! ```
//! The first acquire never waits. Every later one waits for the release that
//! follows the previous message's decode, so at most one frame is ever in
//! flight.

mod consumer;
mod producer;

pub use consumer::Consumer;
pub use producer::Producer;

use std::io::{Read, Write};
use std::sync::Arc;

use crate::config::Config;
use crate::envelope::Envelope;
use crate::error::{Result, WireError};
use crate::frame::FrameStats;
use crate::gate::Gate;
use crate::payload::{PayloadSource, RandomPayload};
use crate::transport::tcp;

/// What one side saw of one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSummary {
    /// Position in the exchange
    pub index: usize,

    /// Payload length in bytes
    pub payload_len: usize,

    /// CRC32 of the payload bytes
    pub checksum: u32,

    pub frame: FrameStats,
}

impl MessageSummary {
    pub fn new(index: usize, payload: &str, frame: FrameStats) -> Self {
        Self {
            index,
            payload_len: payload.len(),
            checksum: crc32fast::hash(payload.as_bytes()),
            frame,
        }
    }
}

/// Result of a completed exchange
#[derive(Debug, Clone, Default)]
pub struct ExchangeReport {
    pub sent: Vec<MessageSummary>,
    pub received: Vec<MessageSummary>,
}

impl ExchangeReport {
    /// Both sides saw the same payloads, in the same order
    pub fn is_consistent(&self) -> bool {
        self.sent.len() == self.received.len()
            && self
                .sent
                .iter()
                .zip(&self.received)
                .all(|(s, r)| s.checksum == r.checksum && s.payload_len == r.payload_len)
    }

    /// Compressed bytes the producer put on the wire
    pub fn wire_bytes(&self) -> u64 {
        self.sent.iter().map(|m| m.frame.compressed_bytes).sum()
    }

    /// Uncompressed record bytes the producer encoded
    pub fn record_bytes(&self) -> u64 {
        self.sent.iter().map(|m| m.frame.payload_bytes).sum()
    }
}

/// Message loop controller
pub struct Exchange {
    config: Config,
}

impl Exchange {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Random payloads of the configured `payload_len`
    pub fn random_payloads(&self) -> RandomPayload {
        RandomPayload::new(self.config.payload_len)
    }

    /// Like [`Exchange::random_payloads`], but reproducible for `seed`
    pub fn seeded_payloads(&self, seed: u64) -> RandomPayload {
        RandomPayload::with_seed(self.config.payload_len, seed)
    }

    /// Run `message_count` cycles on each side of an established session
    ///
    /// `on_message` receives every decoded envelope on the consumer thread,
    /// after the gate has been released for it. Returns the first failure of
    /// either loop; a panic on either side abandons the gate as well.
    pub fn run<R, W, P, H>(
        &self,
        reader: R,
        writer: W,
        payloads: P,
        on_message: H,
    ) -> Result<ExchangeReport>
    where
        R: Read + Send,
        W: Write + Send,
        P: PayloadSource,
        H: FnMut(usize, Envelope) + Send,
    {
        let count = self.config.message_count;
        let settings = self.config.frame_settings();
        let gate = Arc::new(Gate::new());

        let producer = Producer::new(writer, Arc::clone(&gate), settings, self.config.ack_timeout());
        let consumer = Consumer::new(reader, Arc::clone(&gate), settings);

        tracing::info!(count, payload_len = self.config.payload_len, "Starting exchange");

        let (produced, consumed) = crossbeam::scope(|scope| -> Result<_> {
            let producer_gate = Arc::clone(&gate);
            let producer_thread = scope
                .builder()
                .name("producer".to_string())
                .spawn(move |_| {
                    let _guard = AbandonOnPanic::new("producer", &producer_gate);
                    let result = produce(producer, payloads, count);
                    LoopOutcome::new("producer", result, &producer_gate)
                })?;

            let consumer_gate = Arc::clone(&gate);
            let consumer_thread = scope
                .builder()
                .name("consumer".to_string())
                .spawn(move |_| {
                    let _guard = AbandonOnPanic::new("consumer", &consumer_gate);
                    let result = consume(consumer, count, on_message);
                    LoopOutcome::new("consumer", result, &consumer_gate)
                })
                .map_err(|e| {
                    gate.abandon();
                    WireError::from(e)
                })?;

            let produced = producer_thread.join().map_err(|_| {
                gate.abandon();
                WireError::Panicked("producer".to_string())
            })?;
            let consumed = consumer_thread
                .join()
                .map_err(|_| WireError::Panicked("consumer".to_string()))?;
            Ok((produced, consumed))
        })
        .map_err(|_| WireError::Panicked("exchange".to_string()))??;

        let report = match (produced.result, consumed.result) {
            (Ok(sent), Ok(received)) => ExchangeReport { sent, received },
            (Err(e), Ok(_)) | (Ok(_), Err(e)) => return Err(e),
            (Err(producer_err), Err(consumer_err)) => {
                return Err(if produced.first_failure {
                    producer_err
                } else {
                    consumer_err
                })
            }
        };

        tracing::info!(
            messages = report.received.len(),
            record_bytes = report.record_bytes(),
            wire_bytes = report.wire_bytes(),
            "Exchange complete"
        );
        Ok(report)
    }

    /// Open a loopback TCP session on `config.addr` and run over it
    pub fn run_loopback<P, H>(&self, payloads: P, on_message: H) -> Result<ExchangeReport>
    where
        P: PayloadSource,
        H: FnMut(usize, Envelope) + Send,
    {
        let session = tcp::loopback(&self.config)?;
        self.run(session.reader, session.writer, payloads, on_message)
    }
}

// =============================================================================
// Loops
// =============================================================================

struct LoopOutcome {
    result: Result<Vec<MessageSummary>>,
    /// This loop failed before the other one did
    first_failure: bool,
}

impl LoopOutcome {
    fn new(role: &'static str, result: Result<Vec<MessageSummary>>, gate: &Gate) -> Self {
        let first_failure = match &result {
            Ok(_) => false,
            Err(e) => {
                let first = gate.abandon();
                tracing::warn!(role, kind = e.kind(), first, "Loop failed: {}", e);
                first
            }
        };
        Self {
            result,
            first_failure,
        }
    }
}

/// Abandons the gate when its loop unwinds, so the other loop stops waiting
struct AbandonOnPanic<'a> {
    role: &'static str,
    gate: &'a Gate,
}

impl<'a> AbandonOnPanic<'a> {
    fn new(role: &'static str, gate: &'a Gate) -> Self {
        Self { role, gate }
    }
}

impl Drop for AbandonOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() && self.gate.abandon() {
            tracing::warn!(role = self.role, "Loop panicked");
        }
    }
}

fn produce<W: Write, P: PayloadSource>(
    mut producer: Producer<W>,
    mut payloads: P,
    count: usize,
) -> Result<Vec<MessageSummary>> {
    let mut sent = Vec::with_capacity(count);
    for index in 0..count {
        let envelope = Envelope::new(payloads.next_payload(index));
        let frame = producer.send(&envelope)?;
        sent.push(MessageSummary::new(index, envelope.message(), frame));
    }
    Ok(sent)
}

fn consume<R: Read, H: FnMut(usize, Envelope)>(
    mut consumer: Consumer<R>,
    count: usize,
    mut on_message: H,
) -> Result<Vec<MessageSummary>> {
    let mut received = Vec::with_capacity(count);
    for index in 0..count {
        let (envelope, frame) = consumer.receive()?;
        received.push(MessageSummary::new(index, envelope.message(), frame));
        on_message(index, envelope);
    }
    Ok(received)
}
