//! # gatewire
//!
//! Point-to-point exchange of discrete messages over one persistent byte
//! stream:
//! - Every message is its own deflate stream (self-delimiting, no length prefix)
//! - Envelopes are self-describing MessagePack records
//! - A single-token gate keeps at most one message in flight
//! - Producer and consumer run as two independent threads
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────┐                      ┌──────────────────────┐
//! │      Producer        │                      │      Consumer        │
//! │  acquire gate        │      ┌────────┐      │  decode envelope     │
//! │  encode envelope     │◄─────│  Gate  │◄─────│  drain to end marker │
//! │  finish frame        │      └────────┘      │  release gate        │
//! └──────────┬───────────┘                      └──────────▲───────────┘
//!            │ fresh per message:                          │ fresh per message:
//!            │ msgpack → BufWriter → Deflater              │ Inflater → BufReader → msgpack
//!            ▼                                             │
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                 Transport Session (one byte stream)                   │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod frame;
pub mod envelope;
pub mod gate;
pub mod transport;
pub mod payload;
pub mod exchange;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{WireError, Result};
pub use config::{Config, FrameSettings};
pub use envelope::Envelope;
pub use gate::Gate;
pub use exchange::{Consumer, Exchange, ExchangeReport, MessageSummary, Producer};
pub use payload::{PayloadSource, RandomPayload};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of gatewire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
