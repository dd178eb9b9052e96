//! Envelope Module
//!
//! The structured record carrying one message payload, and its codec.
//!
//! ## Record Format
//! A MessagePack map with named fields, so a decoder only needs to know it is
//! reading an envelope:
//! ```text
//! ┌────────────┬───────────────────┬──────────┬──────────────────┐
//! │ map(1)     │ str "message"     │ str hdr  │ UTF-8 bytes      │
//! │ 0x81       │ 0xa7 m e s s a g e│ len tag  │ ...              │
//! └────────────┴───────────────────┴──────────┴──────────────────┘
//! ```

mod codec;

pub use codec::{decode, encode, read_frame, write_frame};

use serde::{Deserialize, Serialize};

/// One unit of application payload
///
/// Built fresh for every transmitted message and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    message: String,
}

impl Envelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_message(self) -> String {
        self.message
    }
}
