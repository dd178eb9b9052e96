//! Frame Stack Tests
//!
//! Tests verify:
//! - Each decode consumes exactly its own frame
//! - Bytes after the last frame are left untouched
//! - Every frame gets a fresh compression context
//! - The write buffer is flushed before the deflate stream ends

use std::io::{BufRead, BufReader, Cursor, Read, Write};

use gatewire::envelope::{read_frame, write_frame, Envelope};
use gatewire::frame::{FrameStats, FrameWriter, Inflater};
use gatewire::payload::{PayloadSource, RandomPayload};
use gatewire::FrameSettings;

// =============================================================================
// Self-containment Tests
// =============================================================================

#[test]
fn test_consecutive_frames_are_consumed_exactly() {
    let settings = FrameSettings::default();
    let lengths = [0usize, 1, 17, 4096, 65_536];

    let mut wire = Vec::new();
    let mut sent: Vec<(String, FrameStats)> = Vec::new();
    for (i, &len) in lengths.iter().enumerate() {
        let message = RandomPayload::with_seed(len, i as u64).next_payload(i);
        let stats = write_frame(&mut wire, &Envelope::new(message.clone()), &settings).unwrap();
        sent.push((message, stats));
    }
    wire.extend_from_slice(b"JUNK");

    let mut reader = BufReader::new(Cursor::new(wire));
    for (message, written) in &sent {
        let (envelope, read) = read_frame(&mut reader, &settings).unwrap();
        assert_eq!(envelope.message(), message);
        assert_eq!(read.compressed_bytes, written.compressed_bytes);
        assert_eq!(read.payload_bytes, written.payload_bytes);
    }

    assert_eq!(reader.fill_buf().unwrap(), b"JUNK");
}

#[test]
fn test_frames_survive_tiny_read_buffers() {
    let settings = FrameSettings {
        read_buffer_size: 1,
        write_buffer_size: 1,
        ..FrameSettings::default()
    };

    let mut wire = Vec::new();
    for text in ["alpha", "", "gamma"] {
        write_frame(&mut wire, &Envelope::new(text), &settings).unwrap();
    }

    // Session buffer of one byte: the inflater can never read ahead
    let mut reader = BufReader::with_capacity(1, Cursor::new(wire));
    for text in ["alpha", "", "gamma"] {
        let (envelope, _) = read_frame(&mut reader, &settings).unwrap();
        assert_eq!(envelope.message(), text);
    }
    assert!(reader.fill_buf().unwrap().is_empty());
}

#[test]
fn test_each_frame_uses_a_fresh_context() {
    let settings = FrameSettings::default();
    let envelope = Envelope::new("the same text twice, the same text twice");

    let mut first = Vec::new();
    write_frame(&mut first, &envelope, &settings).unwrap();

    let mut both = Vec::new();
    write_frame(&mut both, &envelope, &settings).unwrap();
    write_frame(&mut both, &envelope, &settings).unwrap();

    // No dictionary carried over: the second frame is byte-identical
    assert_eq!(both.len(), first.len() * 2);
    assert_eq!(&both[..first.len()], &first[..]);
    assert_eq!(&both[first.len()..], &first[..]);
}

// =============================================================================
// Buffering Tests
// =============================================================================

#[test]
fn test_finish_flushes_buffer_first() {
    let settings = FrameSettings {
        write_buffer_size: 8192,
        ..FrameSettings::default()
    };
    let data = RandomPayload::with_seed(10_000, 9).next_payload(0);

    let mut frame = FrameWriter::open(Vec::new(), &settings);
    frame.write_all(data.as_bytes()).unwrap();
    let (wire, stats) = frame.finish().unwrap();
    assert_eq!(stats.payload_bytes, 10_000);
    assert_eq!(stats.compressed_bytes, wire.len() as u64);

    let mut source = Cursor::new(wire);
    let mut out = Vec::new();
    Inflater::open(&mut source).read_to_end(&mut out).unwrap();
    assert_eq!(out, data.as_bytes());
}

#[test]
fn test_dropped_writer_still_ends_the_frame() {
    let mut wire = Vec::new();
    {
        let mut frame = FrameWriter::open(&mut wire, &FrameSettings::default());
        frame.write_all(b"partial").unwrap();
    }

    let mut source = Cursor::new(wire);
    let mut inflater = Inflater::open(&mut source);
    let mut out = Vec::new();
    inflater.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"partial");
    assert!(inflater.is_finished());
}

#[test]
fn test_compression_level_zero_still_frames() {
    let settings = gatewire::Config::builder()
        .compression_level(0)
        .build()
        .frame_settings();

    let mut wire = Vec::new();
    let stats = write_frame(&mut wire, &Envelope::new("stored"), &settings).unwrap();
    assert!(stats.compressed_bytes > stats.payload_bytes);

    let mut reader = BufReader::new(Cursor::new(wire));
    let (envelope, _) = read_frame(&mut reader, &settings).unwrap();
    assert_eq!(envelope.message(), "stored");
}
