//! Payload generation
//!
//! Supplies the message text for each produced envelope.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Characters a random payload is drawn from
pub const ALPHABET: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz0123456789!@$?_-";

/// Source of message payloads, asked once per produced message
pub trait PayloadSource: Send {
    fn next_payload(&mut self, index: usize) -> String;
}

impl<F> PayloadSource for F
where
    F: FnMut(usize) -> String + Send,
{
    fn next_payload(&mut self, index: usize) -> String {
        self(index)
    }
}

/// Fixed-length strings of uniformly random [`ALPHABET`] characters
pub struct RandomPayload {
    len: usize,
    rng: StdRng,
}

impl RandomPayload {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible payloads for a given seed
    pub fn with_seed(len: usize, seed: u64) -> Self {
        Self {
            len,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl PayloadSource for RandomPayload {
    fn next_payload(&mut self, _index: usize) -> String {
        (0..self.len)
            .map(|_| ALPHABET[self.rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }
}
