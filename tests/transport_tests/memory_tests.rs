//! Memory Pipe Tests
//!
//! Tests verify:
//! - Bytes arrive in order and reads block until data is written
//! - Read timeouts and orderly close behave like a socket
//! - Writing to a pipe whose reader is gone fails

use std::io::{self, Read, Write};
use std::thread;
use std::time::Duration;

use gatewire::transport::pipe;

#[test]
fn test_bytes_arrive_in_order() {
    let (mut writer, mut reader) = pipe(None);
    writer.write_all(b"hello ").unwrap();
    writer.write_all(b"world").unwrap();
    assert_eq!(writer.bytes_written(), 11);

    let mut out = [0u8; 11];
    reader.read_exact(&mut out).unwrap();
    assert_eq!(&out, b"hello world");
    assert_eq!(reader.pending(), 0);
}

#[test]
fn test_read_blocks_until_write() {
    let (mut writer, mut reader) = pipe(Some(Duration::from_secs(5)));
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(30));
        writer.write_all(b"late").unwrap();
    });

    let mut out = [0u8; 4];
    reader.read_exact(&mut out).unwrap();
    assert_eq!(&out, b"late");
    handle.join().unwrap();
}

#[test]
fn test_read_times_out() {
    let (_writer, mut reader) = pipe(Some(Duration::from_millis(30)));
    let err = reader.read(&mut [0u8; 8]).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::TimedOut);
}

#[test]
fn test_dropped_writer_is_orderly_close() {
    let (mut writer, mut reader) = pipe(Some(Duration::from_millis(30)));
    writer.write_all(b"tail").unwrap();
    drop(writer);

    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"tail");
}

#[test]
fn test_write_after_reader_dropped_fails() {
    let (mut writer, reader) = pipe(None);
    drop(reader);
    let err = writer.write(b"x").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
}
