//! TCP transport
//!
//! Establishes the single connection an exchange runs over. The accepted
//! (server) end is handed to the producer, the connecting (client) end to the
//! consumer, matching which side writes and which side reads.

use std::net::{SocketAddr, TcpListener, TcpStream};

use crate::config::Config;
use crate::error::{Result, WireError};

/// Both ends of one TCP connection
pub struct TcpSession {
    /// Accepted stream, written by the producer
    pub writer: TcpStream,

    /// Connecting stream, read by the consumer
    pub reader: TcpStream,

    /// Address the listener was bound to
    pub local_addr: SocketAddr,
}

/// Bind a listener on `addr`
pub fn listen(addr: &str) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .map_err(|e| WireError::Connection(format!("failed to bind {}: {}", addr, e)))
}

/// Accept one connection and configure it as the writing end
pub fn accept(listener: &TcpListener, config: &Config) -> Result<TcpStream> {
    let (stream, peer) = listener
        .accept()
        .map_err(|e| WireError::Connection(format!("accept failed: {}", e)))?;
    tracing::debug!("Accepted connection from {}", peer);

    // Disable Nagle's algorithm: each frame ends with a small final block
    stream.set_nodelay(true)?;
    stream.set_write_timeout(config.write_timeout())?;
    Ok(stream)
}

/// Connect to `addr` and configure it as the reading end
pub fn connect(addr: &str, config: &Config) -> Result<TcpStream> {
    let stream = TcpStream::connect(addr)
        .map_err(|e| WireError::Connection(format!("failed to connect to {}: {}", addr, e)))?;

    stream.set_nodelay(true)?;
    stream.set_read_timeout(Some(config.read_timeout()))?;
    Ok(stream)
}

/// Listen, connect and accept on the calling thread
///
/// The connect completes against the listen backlog before `accept` runs, so
/// no second thread is needed. `config.addr` may use port 0.
pub fn loopback(config: &Config) -> Result<TcpSession> {
    config.validate()?;

    let listener = listen(&config.addr)?;
    let local_addr = listener.local_addr()?;
    tracing::info!("Listening on {}", local_addr);

    let reader = connect(&local_addr.to_string(), config)?;
    let writer = accept(&listener, config)?;

    Ok(TcpSession {
        writer,
        reader,
        local_addr,
    })
}
