//! Configuration for gatewire
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use flate2::Compression;

use crate::error::{Result, WireError};

/// Main configuration for an exchange
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP endpoint (host:port). Port 0 picks an ephemeral port.
    pub addr: String,

    /// Consumer read timeout (milliseconds)
    pub read_timeout_ms: u64,

    /// Producer socket write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Exchange Configuration
    // -------------------------------------------------------------------------
    /// Number of messages each side handles
    pub message_count: usize,

    /// Characters per generated payload
    pub payload_len: usize,

    /// How long the producer waits for the consumer to release the gate
    /// (milliseconds)
    pub ack_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Frame Configuration
    // -------------------------------------------------------------------------
    /// Deflate level, 0 (store) through 9 (best)
    pub compression_level: u32,

    /// Capacity of the buffer in front of the deflater
    pub write_buffer_size: usize,

    /// Capacity of the buffer behind the inflater
    pub read_buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:27111".to_string(),
            read_timeout_ms: 60_000,
            write_timeout_ms: 60_000,
            message_count: 10,
            payload_len: 4096,
            ack_timeout_ms: 60_000,
            compression_level: 6,
            write_buffer_size: 8192,
            read_buffer_size: 4096,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        if self.addr.is_empty() {
            return Err(WireError::Config("addr must not be empty".to_string()));
        }
        if self.read_timeout_ms == 0 {
            return Err(WireError::Config(
                "read_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.ack_timeout_ms == 0 {
            return Err(WireError::Config(
                "ack_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.compression_level > 9 {
            return Err(WireError::Config(format!(
                "compression_level must be 0..=9, got {}",
                self.compression_level
            )));
        }
        if self.write_buffer_size == 0 || self.read_buffer_size == 0 {
            return Err(WireError::Config(
                "buffer sizes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// `None` when write timeouts are disabled
    pub fn write_timeout(&self) -> Option<Duration> {
        if self.write_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.write_timeout_ms))
        }
    }

    pub fn ack_timeout(&self) -> Duration {
        Duration::from_millis(self.ack_timeout_ms)
    }

    /// Settings for building per-message frame stacks
    pub fn frame_settings(&self) -> FrameSettings {
        FrameSettings {
            level: Compression::new(self.compression_level),
            write_buffer_size: self.write_buffer_size,
            read_buffer_size: self.read_buffer_size,
        }
    }
}

/// The subset of configuration a frame stack needs
#[derive(Debug, Clone, Copy)]
pub struct FrameSettings {
    pub level: Compression,
    pub write_buffer_size: usize,
    pub read_buffer_size: usize,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Config::default().frame_settings()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP endpoint (host:port)
    pub fn addr(mut self, addr: impl Into<String>) -> Self {
        self.config.addr = addr.into();
        self
    }

    /// Set the number of messages per side
    pub fn message_count(mut self, count: usize) -> Self {
        self.config.message_count = count;
        self
    }

    /// Set the generated payload length
    pub fn payload_len(mut self, len: usize) -> Self {
        self.config.payload_len = len;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the read timeout in whole seconds, saturating on overflow
    pub fn read_timeout_secs(self, secs: u64) -> Self {
        self.read_timeout_ms(secs.saturating_mul(1000))
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the acknowledgment timeout (in milliseconds)
    pub fn ack_timeout_ms(mut self, ms: u64) -> Self {
        self.config.ack_timeout_ms = ms;
        self
    }

    /// Set the acknowledgment timeout in whole seconds, saturating on overflow
    pub fn ack_timeout_secs(self, secs: u64) -> Self {
        self.ack_timeout_ms(secs.saturating_mul(1000))
    }

    /// Set the deflate level (0-9)
    pub fn compression_level(mut self, level: u32) -> Self {
        self.config.compression_level = level;
        self
    }

    pub fn write_buffer_size(mut self, size: usize) -> Self {
        self.config.write_buffer_size = size;
        self
    }

    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.config.read_buffer_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
