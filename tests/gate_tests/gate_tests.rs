//! Gate Tests
//!
//! Tests verify:
//! - The gate starts open and the first acquire never waits
//! - Later acquires wait for a release
//! - Double releases collapse to a single token
//! - Timeouts and abandonment end a wait

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use gatewire::gate::{Gate, GateState};
use gatewire::WireError;

// =============================================================================
// Acquire/Release Tests
// =============================================================================

#[test]
fn test_first_acquire_does_not_block() {
    let gate = Gate::new();
    assert!(gate.is_open());
    gate.acquire().unwrap();
    assert_eq!(gate.state(), GateState::Closed);
    assert_eq!(gate.acquisitions(), 1);
}

#[test]
fn test_second_acquire_waits_for_release() {
    let gate = Arc::new(Gate::new());
    gate.acquire().unwrap();

    let releaser = {
        let gate = Arc::clone(&gate);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            gate.release();
        })
    };

    let start = Instant::now();
    gate.acquire().unwrap();
    assert!(start.elapsed() >= Duration::from_millis(40));
    releaser.join().unwrap();
    assert_eq!(gate.acquisitions(), 2);
    assert_eq!(gate.releases(), 1);
}

#[test]
fn test_double_release_collapses_to_open() {
    let gate = Gate::closed();
    gate.release();
    gate.release();
    assert!(gate.is_open());

    assert!(gate.try_acquire());
    assert!(!gate.try_acquire());
}

// =============================================================================
// Timeout and Abandon Tests
// =============================================================================

#[test]
fn test_acquire_timeout_expires() {
    let gate = Gate::closed();
    let start = Instant::now();
    let err = gate.acquire_timeout(Duration::from_millis(50)).unwrap_err();
    assert!(matches!(err, WireError::Timeout(_)));
    assert!(start.elapsed() >= Duration::from_millis(50));
    assert_eq!(gate.acquisitions(), 0);
}

#[test]
fn test_abandon_wakes_waiter() {
    let gate = Arc::new(Gate::closed());
    let waiter = {
        let gate = Arc::clone(&gate);
        thread::spawn(move || gate.acquire())
    };

    thread::sleep(Duration::from_millis(20));
    assert!(gate.abandon());
    assert!(!gate.abandon());

    let result = waiter.join().unwrap();
    assert!(matches!(result, Err(WireError::Connection(_))));

    gate.release();
    assert_eq!(gate.state(), GateState::Abandoned);
}

#[test]
fn test_abandon_wakes_timed_waiter_early() {
    let gate = Arc::new(Gate::closed());
    let waiter = {
        let gate = Arc::clone(&gate);
        thread::spawn(move || gate.acquire_timeout(Duration::from_secs(30)))
    };

    let start = Instant::now();
    thread::sleep(Duration::from_millis(20));
    gate.abandon();

    let result = waiter.join().unwrap();
    assert!(matches!(result, Err(WireError::Connection(_))));
    assert!(start.elapsed() < Duration::from_secs(5));
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_single_token_under_contention() {
    let gate = Arc::new(Gate::new());
    let winners = Arc::new(AtomicU64::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let gate = Arc::clone(&gate);
            let winners = Arc::clone(&winners);
            thread::spawn(move || {
                if gate.try_acquire() {
                    winners.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(winners.load(Ordering::SeqCst), 1);
}
