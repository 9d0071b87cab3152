// crates/tenant-dispatch-core/src/runtime/filter.rs
// ============================================================================
// Module: Tenant Dispatch Membership Filter
// Description: Bloom filter for tracking initialized tenant views.
// Purpose: Bound memory for tenant tracking on the hot dispatch path.
// Dependencies: serde, sha2, thiserror
// ============================================================================

//! ## Overview
//! [`MembershipFilter`] is a fixed-size Bloom filter sized from an expected
//! insertion count and a target false-positive rate. It never reports a false
//! negative. A false positive makes the gate treat an uninitialized tenant as
//! initialized; the target rate bounds how often that happens.
//!
//! Keys are fed through a [`KeySink`] into SHA-256. The first two 64-bit
//! words of the digest drive Kirsch-Mitzenmacher double hashing, so `k` bit
//! positions cost a single digest.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::f64::consts::LN_2;
use std::marker::PhantomData;

use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Bits per storage word.
const WORD_BITS: u64 = 64;
/// Smallest bit array allocated, whatever the sizing inputs.
const MIN_BITS: u64 = WORD_BITS;
/// Upper bound on the bit array (8 GiB of words).
const MAX_BITS: u64 = 1 << 36;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when sizing a membership filter.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// False-positive rate outside the open interval (0, 1).
    #[error("false positive rate must be in (0, 1), got {0}")]
    InvalidFalsePositiveRate(f64),
    /// Requested sizing exceeds the supported bit array size.
    #[error("filter requires {bits} bits, limit is {max_bits}")]
    TooLarge {
        /// Required bits.
        bits: u64,
        /// Maximum supported bits.
        max_bits: u64,
    },
}

// ============================================================================
// SECTION: Key Funnel
// ============================================================================

/// Hash input builder for filter keys.
///
/// # Invariants
/// - Every field is length-prefixed, so field boundaries are part of the hash.
pub struct KeySink {
    /// Digest accumulating the key bytes.
    hasher: Sha256,
}

impl KeySink {
    /// Creates an empty sink.
    fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    /// Appends a length-prefixed UTF-8 string.
    pub fn put_str(&mut self, value: &str) -> &mut Self {
        self.put_bytes(value.as_bytes())
    }

    /// Appends a length-prefixed byte string.
    pub fn put_bytes(&mut self, value: &[u8]) -> &mut Self {
        self.hasher.update((value.len() as u64).to_le_bytes());
        self.hasher.update(value);
        self
    }

    /// Returns the two 64-bit hash halves for double hashing.
    fn finish(self) -> (u64, u64) {
        let digest = self.hasher.finalize();
        let mut low = [0_u8; 8];
        let mut high = [0_u8; 8];
        low.copy_from_slice(&digest[.. 8]);
        high.copy_from_slice(&digest[8 .. 16]);
        (u64::from_le_bytes(low), u64::from_le_bytes(high))
    }
}

/// Key type storable in a [`MembershipFilter`].
pub trait FilterKey {
    /// Feeds every identifying field of the key into the sink.
    fn funnel(&self, sink: &mut KeySink);
}

// ============================================================================
// SECTION: Membership Filter
// ============================================================================

/// Sizing and occupancy snapshot of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterStats {
    /// Size of the bit array.
    pub num_bits: u64,
    /// Hash functions applied per key.
    pub num_hashes: u32,
    /// Insertion count the filter was sized for.
    pub expected_insertions: u64,
    /// Target false-positive rate at `expected_insertions`.
    pub false_positive_rate: f64,
    /// Bits currently set.
    pub bits_set: u64,
}

/// Bloom filter over keys of type `K`.
///
/// # Invariants
/// - `bits.len() * 64 == num_bits` and `num_bits >= 64`.
/// - Bits are only ever set, never cleared.
#[derive(Debug, Clone)]
pub struct MembershipFilter<K> {
    /// Bit array storage.
    bits: Vec<u64>,
    /// Number of addressable bits.
    num_bits: u64,
    /// Hash functions applied per key.
    num_hashes: u32,
    /// Insertion count used for sizing.
    expected_insertions: u64,
    /// Target false-positive rate used for sizing.
    false_positive_rate: f64,
    /// Key type marker.
    key: PhantomData<fn(&K)>,
}

impl<K: FilterKey> MembershipFilter<K> {
    /// Creates a filter sized for `expected_insertions` keys at the target rate.
    ///
    /// An expected count of zero is treated as one.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] when the rate is not in (0, 1) or the sizing
    /// exceeds the supported bit array size.
    pub fn new(expected_insertions: u64, false_positive_rate: f64) -> Result<Self, FilterError> {
        let in_range = false_positive_rate > 0.0 && false_positive_rate < 1.0;
        if !in_range {
            return Err(FilterError::InvalidFalsePositiveRate(false_positive_rate));
        }
        let expected_insertions = expected_insertions.max(1);
        let optimal_bits = optimal_num_bits(expected_insertions, false_positive_rate);
        if optimal_bits > MAX_BITS {
            return Err(FilterError::TooLarge {
                bits: optimal_bits,
                max_bits: MAX_BITS,
            });
        }
        let num_hashes = optimal_num_hashes(expected_insertions, optimal_bits);
        let num_bits = optimal_bits.max(MIN_BITS).div_ceil(WORD_BITS) * WORD_BITS;
        let words = usize::try_from(num_bits / WORD_BITS).map_err(|_| FilterError::TooLarge {
            bits: num_bits,
            max_bits: MAX_BITS,
        })?;
        Ok(Self {
            bits: vec![0; words],
            num_bits,
            num_hashes,
            expected_insertions,
            false_positive_rate,
            key: PhantomData,
        })
    }

    /// Returns true if the key might have been added; false means it never was.
    #[must_use]
    pub fn might_contain(&self, key: &K) -> bool {
        let (h1, h2) = hash_key(key);
        (0 .. self.num_hashes).all(|round| {
            let (word, mask) = self.locate(h1, h2, round);
            self.bits[word] & mask != 0
        })
    }

    /// Adds the key and returns true if any bit changed.
    ///
    /// A `false` return means the key was already reported as present, either
    /// because it was added before or because of a false positive.
    pub fn put(&mut self, key: &K) -> bool {
        let (h1, h2) = hash_key(key);
        let mut changed = false;
        for round in 0 .. self.num_hashes {
            let (word, mask) = self.locate(h1, h2, round);
            if self.bits[word] & mask == 0 {
                self.bits[word] |= mask;
                changed = true;
            }
        }
        changed
    }

    /// Returns a sizing and occupancy snapshot.
    #[must_use]
    pub fn stats(&self) -> FilterStats {
        FilterStats {
            num_bits: self.num_bits,
            num_hashes: self.num_hashes,
            expected_insertions: self.expected_insertions,
            false_positive_rate: self.false_positive_rate,
            bits_set: self.bits.iter().map(|word| u64::from(word.count_ones())).sum(),
        }
    }

    /// Maps the `round`-th hash of a key to a storage word and bit mask.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Bit index is reduced modulo num_bits, whose word count fits in usize."
    )]
    fn locate(&self, h1: u64, h2: u64, round: u32) -> (usize, u64) {
        let combined = h1.wrapping_add(u64::from(round).wrapping_mul(h2));
        let index = combined % self.num_bits;
        ((index / WORD_BITS) as usize, 1_u64 << (index % WORD_BITS))
    }
}

// ============================================================================
// SECTION: Sizing Helpers
// ============================================================================

/// Hashes a key into its two double-hashing halves.
fn hash_key<K: FilterKey>(key: &K) -> (u64, u64) {
    let mut sink = KeySink::new();
    key.funnel(&mut sink);
    sink.finish()
}

/// Optimal bit count: `ceil(-n ln p / (ln 2)^2)`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "Sizing math is approximate; the result is positive and bounded by MAX_BITS checks."
)]
fn optimal_num_bits(expected_insertions: u64, false_positive_rate: f64) -> u64 {
    let n = expected_insertions as f64;
    let bits = (-n * false_positive_rate.ln() / (LN_2 * LN_2)).ceil();
    if bits >= MAX_BITS as f64 { MAX_BITS + 1 } else { bits as u64 }
}

/// Optimal hash count: `max(1, round(m / n * ln 2))`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "Hash count is a small positive integer derived from bounded sizing inputs."
)]
fn optimal_num_hashes(expected_insertions: u64, num_bits: u64) -> u32 {
    let ratio = num_bits as f64 / expected_insertions as f64;
    let hashes = (ratio * LN_2).round();
    if hashes < 1.0 { 1 } else { hashes.min(f64::from(u32::MAX)) as u32 }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
