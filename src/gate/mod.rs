//! Gate Module
//!
//! Binary rendezvous between the producer and consumer loops. Enforces at
//! most one outstanding (written but not yet decoded) message without any
//! flow-control bytes on the wire.
//!
//! ## State Machine
//! ```text
//!              acquire
//!   ┌──────┐ ──────────► ┌────────┐
//!   │ OPEN │             │ CLOSED │
//!   └──────┘ ◄────────── └────────┘
//!      │ ▲     release       │
//!      │ └─ release (no-op)  │
//!      │                     │
//!      └──── abandon ────────┴────► ABANDONED (terminal)
//! ```
//!
//! Starts OPEN so the first message is written before anything has been
//! read: the producer may run ahead by exactly one message.
//!
//! ## Concurrency
//! - `state`: parking_lot Mutex, waiters park on `cond` (no busy-waiting)
//! - counters: atomics, readable without the lock

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::{Result, WireError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Token available
    Open,
    /// Token held by the producer
    Closed,
    /// One side failed; every acquire fails from now on
    Abandoned,
}

/// Single-token gate with reset-event semantics
pub struct Gate {
    state: Mutex<GateState>,
    cond: Condvar,
    acquisitions: AtomicU64,
    releases: AtomicU64,
}

impl Gate {
    /// A gate whose token is available
    pub fn new() -> Self {
        Self::with_state(GateState::Open)
    }

    /// A gate whose token is already taken
    pub fn closed() -> Self {
        Self::with_state(GateState::Closed)
    }

    fn with_state(state: GateState) -> Self {
        Self {
            state: Mutex::new(state),
            cond: Condvar::new(),
            acquisitions: AtomicU64::new(0),
            releases: AtomicU64::new(0),
        }
    }

    /// Block until the token is available, then take it
    pub fn acquire(&self) -> Result<()> {
        let mut state = self.state.lock();
        loop {
            match *state {
                GateState::Open => break,
                GateState::Closed => self.cond.wait(&mut state),
                GateState::Abandoned => return Err(abandoned()),
            }
        }
        self.take(&mut state);
        Ok(())
    }

    /// Like [`Gate::acquire`], but fail with `Timeout` after `timeout`
    pub fn acquire_timeout(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        loop {
            match *state {
                GateState::Open => break,
                GateState::Abandoned => return Err(abandoned()),
                GateState::Closed => {
                    if self.cond.wait_until(&mut state, deadline).timed_out()
                        && *state == GateState::Closed
                    {
                        return Err(WireError::Timeout(format!(
                            "no acknowledgment within {:?}",
                            timeout
                        )));
                    }
                }
            }
        }
        self.take(&mut state);
        Ok(())
    }

    /// Take the token if it is available right now
    pub fn try_acquire(&self) -> bool {
        let mut state = self.state.lock();
        if *state != GateState::Open {
            return false;
        }
        self.take(&mut state);
        true
    }

    /// Make the token available again and wake one waiter
    ///
    /// Releasing an open gate leaves it open; there is never more than one
    /// token. Releasing an abandoned gate does nothing.
    pub fn release(&self) {
        let mut state = self.state.lock();
        if *state == GateState::Abandoned {
            return;
        }
        *state = GateState::Open;
        self.releases.fetch_add(1, Ordering::SeqCst);
        drop(state);
        self.cond.notify_one();
    }

    /// Fail every current and future acquire
    ///
    /// Returns true for the first caller only, so the first failure of an
    /// exchange can be told apart from the ones it caused.
    pub fn abandon(&self) -> bool {
        let mut state = self.state.lock();
        if *state == GateState::Abandoned {
            return false;
        }
        *state = GateState::Abandoned;
        drop(state);
        self.cond.notify_all();
        true
    }

    pub fn state(&self) -> GateState {
        *self.state.lock()
    }

    pub fn is_open(&self) -> bool {
        self.state() == GateState::Open
    }

    /// Number of successful acquires so far
    pub fn acquisitions(&self) -> u64 {
        self.acquisitions.load(Ordering::SeqCst)
    }

    /// Number of releases so far (no-op releases on an open gate included)
    pub fn releases(&self) -> u64 {
        self.releases.load(Ordering::SeqCst)
    }

    fn take(&self, state: &mut GateState) {
        *state = GateState::Closed;
        self.acquisitions.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

fn abandoned() -> WireError {
    WireError::Connection("session abandoned by the other loop".to_string())
}
