//! Deterministic random number generation with per-run derivation and forking.
//!
//! ## Key Features
//!
//! - **Derived**: every run's stream is a pure function of
//!   `(root seed, context, modifier, run index)`
//! - **Order independent**: derivation never touches shared state, so
//!   sequential and parallel batches see identical streams
//! - **Forkable**: lookahead samples get their own sub-streams, derived
//!   deterministically from the caller's generator
//! - **Context streams**: independent sequences for different purposes
//!
//! ## Usage
//!
//! ```
//! use spire_sim::core::GameRng;
//!
//! let mut a = GameRng::derive(42, "ironclad", "none", 7);
//! let mut b = GameRng::derive(42, "ironclad", "none", 7);
//! assert_eq!(a.gen_range(0..1000), b.gen_range(0..1000));
//!
//! // Forks are deterministic too
//! let mut fa = a.fork();
//! let mut fb = b.fork();
//! assert_eq!(fa.gen_range(0..1000), fb.gen_range(0..1000));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Deterministic RNG used for everything random inside a combat.
///
/// Uses ChaCha8 for speed while keeping cryptographic quality output.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG from a plain seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::from_key(ChaCha8Rng::seed_from_u64(seed).get_seed())
    }

    /// Derive the generator for one independent run.
    ///
    /// The `(context, modifier, run_index)` triple is hashed into a
    /// fixed-width spawn key which is then expanded together with the root
    /// seed into the 32-byte ChaCha key. Never fails; call it exactly once
    /// per run.
    #[must_use]
    pub fn derive(root_seed: u64, context: &str, modifier: &str, run_index: u64) -> Self {
        let spawn = spawn_key(context, modifier, run_index);

        let mut hasher = Sha256::new();
        hasher.update(root_seed.to_le_bytes());
        hasher.update(spawn.to_le_bytes());
        Self::from_key(digest_key(hasher))
    }

    fn from_key(key: [u8; 32]) -> Self {
        Self {
            inner: ChaCha8Rng::from_seed(key),
            fork_counter: 0,
        }
    }

    /// The 32-byte key this stream was started from.
    #[must_use]
    pub fn key(&self) -> [u8; 32] {
        self.inner.get_seed()
    }

    /// Fork this RNG to create an independent branch.
    ///
    /// Each fork produces a different but deterministic sequence. The parent
    /// stream position is untouched; only its fork counter advances.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;

        let mut hasher = Sha256::new();
        hasher.update(self.key());
        hasher.update(b"fork");
        hasher.update(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15).to_le_bytes());
        Self::from_key(digest_key(hasher))
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same key.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(self.key());
        hasher.update(context.as_bytes());
        Self::from_key(digest_key(hasher))
    }

    /// Generate a random integer in the given range.
    pub fn gen_range(&mut self, range: std::ops::Range<i64>) -> i64 {
        self.inner.gen_range(range)
    }

    /// Generate a uniform float in `[0, 1)`.
    pub fn gen_unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose an index with weighted probability.
    ///
    /// Weights do not need to sum to 1.0. Returns `None` if weights are
    /// empty or all zero.
    pub fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        if weights.is_empty() {
            return None;
        }

        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return None;
        }

        let mut threshold = self.gen_unit() * total;

        for (i, &weight) in weights.iter().enumerate() {
            threshold -= weight;
            if threshold < 0.0 {
                return Some(i);
            }
        }

        // Floating point edge case - return last non-zero weight
        weights.iter().rposition(|&w| w > 0.0)
    }
}

/// Hash a `(context, modifier, run index)` triple into a 64-bit spawn key.
///
/// First eight bytes, little-endian, of SHA-256 over
/// `"{context}:{modifier}:{run_index}"`.
#[must_use]
pub fn spawn_key(context: &str, modifier: &str, run_index: u64) -> u64 {
    let digest = Sha256::digest(format!("{context}:{modifier}:{run_index}").as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

fn digest_key(hasher: Sha256) -> [u8; 32] {
    let mut key = [0u8; 32];
    key.copy_from_slice(&hasher.finalize());
    key
}
