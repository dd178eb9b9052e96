//! gatewire Binary
//!
//! Runs a loopback exchange: listens, connects to itself, then streams
//! randomly generated messages from the accepted end to the connecting end.

use clap::Parser;
use gatewire::{Config, Exchange};
use tracing_subscriber::{fmt, EnvFilter};

/// gatewire loopback exchange
#[derive(Parser, Debug)]
#[command(name = "gatewire")]
#[command(about = "Compressed, gated message exchange over one TCP connection")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:27111")]
    addr: String,

    /// Number of messages to send
    #[arg(short = 'n', long, default_value = "10")]
    count: usize,

    /// Characters per message
    #[arg(short, long, default_value = "4096")]
    length: usize,

    /// Consumer read timeout in seconds
    #[arg(long, default_value = "60")]
    read_timeout_secs: u64,

    /// How long the producer waits for an acknowledgment, in seconds
    #[arg(long, default_value = "60")]
    ack_timeout_secs: u64,

    /// Deflate level (0-9)
    #[arg(long, default_value = "6")]
    level: u32,

    /// Seed for reproducible payloads
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gatewire=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .init();

    let args = Args::parse();

    tracing::info!("gatewire v{}", gatewire::VERSION);
    tracing::info!("Address: {}", args.addr);

    let config = Config::builder()
        .addr(&args.addr)
        .message_count(args.count)
        .payload_len(args.length)
        .read_timeout_secs(args.read_timeout_secs)
        .ack_timeout_secs(args.ack_timeout_secs)
        .compression_level(args.level)
        .build();

    let exchange = match Exchange::new(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let payloads = match args.seed {
        Some(seed) => exchange.seeded_payloads(seed),
        None => exchange.random_payloads(),
    };

    let report = match exchange.run_loopback(payloads, |_, _| {}) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(kind = e.kind(), "Exchange failed: {}", e);
            std::process::exit(1);
        }
    };

    if !report.is_consistent() {
        tracing::error!("Received payloads do not match what was sent");
        std::process::exit(1);
    }

    tracing::info!(
        messages = report.received.len(),
        record_bytes = report.record_bytes(),
        wire_bytes = report.wire_bytes(),
        "Checksums match"
    );
    println!("All done");
}
