//! TCP Transport Tests
//!
//! Tests verify:
//! - Loopback session setup on an ephemeral port
//! - Read timeout and peer close map to the right error kinds
//! - Bind failures are connection errors

use std::sync::Arc;
use std::time::{Duration, Instant};

use gatewire::transport::tcp;
use gatewire::{Config, Consumer, Envelope, Gate, Producer, WireError};

fn loopback_config(read_timeout_ms: u64) -> Config {
    Config::builder()
        .addr("127.0.0.1:0")
        .read_timeout_ms(read_timeout_ms)
        .ack_timeout_ms(5_000)
        .build()
}

#[test]
fn test_loopback_binds_ephemeral_port() {
    let session = tcp::loopback(&loopback_config(1_000)).unwrap();
    assert_ne!(session.local_addr.port(), 0);
    assert_eq!(session.writer.local_addr().unwrap(), session.local_addr);
    assert_eq!(session.reader.peer_addr().unwrap(), session.local_addr);
    assert_eq!(
        session.reader.read_timeout().unwrap(),
        Some(Duration::from_millis(1_000))
    );
    assert!(session.writer.nodelay().unwrap());
}

#[test]
fn test_frames_cross_a_tcp_session() {
    let config = loopback_config(5_000);
    let session = tcp::loopback(&config).unwrap();
    let gate = Arc::new(Gate::new());

    let mut producer = Producer::new(
        session.writer,
        Arc::clone(&gate),
        config.frame_settings(),
        config.ack_timeout(),
    );
    let mut consumer = Consumer::new(session.reader, Arc::clone(&gate), config.frame_settings());

    for text in ["one", "two", "three"] {
        let sent = producer.send(&Envelope::new(text)).unwrap();
        let (envelope, received) = consumer.receive().unwrap();
        assert_eq!(envelope.message(), text);
        assert_eq!(sent, received);
    }
    assert!(consumer.buffered().is_empty());
}

#[test]
fn test_tcp_read_timeout_is_timeout_error() {
    let config = loopback_config(200);
    let session = tcp::loopback(&config).unwrap();
    let mut consumer = Consumer::new(session.reader, Arc::new(Gate::closed()), config.frame_settings());

    let start = Instant::now();
    let result = consumer.receive();
    assert!(matches!(result, Err(WireError::Timeout(_))));
    assert!(start.elapsed() >= Duration::from_millis(150));

    drop(session.writer);
}

#[test]
fn test_tcp_peer_close_is_connection_error() {
    let config = loopback_config(5_000);
    let session = tcp::loopback(&config).unwrap();
    drop(session.writer);

    let mut consumer = Consumer::new(session.reader, Arc::new(Gate::closed()), config.frame_settings());
    assert!(matches!(consumer.receive(), Err(WireError::Connection(_))));
}

#[test]
fn test_bind_failure_is_connection_error() {
    let result = tcp::listen("not an address");
    assert!(matches!(result, Err(WireError::Connection(_))));
}

#[test]
fn test_loopback_rejects_invalid_config() {
    let config = Config::builder().addr("127.0.0.1:0").read_timeout_ms(0).build();
    assert!(matches!(tcp::loopback(&config), Err(WireError::Config(_))));
}
