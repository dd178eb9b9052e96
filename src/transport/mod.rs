//! Transport Module
//!
//! Byte-stream sessions the exchange runs over.
//!
//! ## Contract
//! The core only needs `std::io::Write` on the producing end and
//! `std::io::Read` on the consuming end. A read returning 0 is an orderly
//! close; an elapsed read timeout surfaces as `TimedOut` or `WouldBlock`.
//! The core never closes or reopens a session between messages.
//!
//! ## Implementations
//! - `tcp`: one loopback TCP connection (server end writes, client end reads)
//! - `memory`: an in-process pipe, used by tests and benchmarks

pub mod memory;
pub mod tcp;

pub use memory::{pipe, PipeReader, PipeWriter};
pub use tcp::TcpSession;
