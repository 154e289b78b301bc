//! # terse-uid
//!
//! Generation of terse unique identifiers (UIDs): strings of 16 lowercase
//! alphanumerical characters, produced with no coordination with any
//! external service.
//!
//! To achieve uniqueness, each UID is built from three number components:
//! - a random number, freshly drawn on every call,
//! - a deterministic number, formed from a round-robin counter and an
//!   immutable per-process/per-thread number base,
//! - the current time in milliseconds since 2025-01-01 00:00:00.000 UTC.
//!
//! The components are encoded into character strings of fixed length with
//! the highest possible radix of 36, reversed to make lower digits appear
//! left, and finally concatenated. Although universal uniqueness is not
//! guaranteed in theory, duplicate UIDs are by all means excluded.
//!
//! ## UID structure
//!
//! | Characters | Component | Value range |
//! |------------|-----------|-------------|
//! | `0..3`  | random number | `0..46_656` (36³) |
//! | `3..8`  | number base + counter | counter cycles through `0..1_000_000` |
//! | `8..16` | elapsed milliseconds | supports times until 2114-05-26T16:38:27.455Z |
//!
//! The number base places the process identifier in the range
//! `1_000_000..=5_194_304` (the maximum PID on 64-bit systems is
//! `4_194_304`) and the thread contribution above `5_194_305`, so that
//! process/thread identity and counter value occupy disjoint numeric
//! sub-ranges.
//!
//! Because rapidly changing characters of each component are placed
//! farthest left, naive left-to-right string comparison notices divergence
//! between recently issued UIDs early.
//!
//! ## Quick start
//!
//! ```
//! // Generate a single UID.
//! let id = terse_uid::uid();
//! assert_eq!(id.len(), 16);
//!
//! // Generate a bounded lazy sequence of UIDs.
//! let ids: Vec<String> = terse_uid::uid_seq(Some(3)).collect();
//! assert_eq!(ids.len(), 3);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use rand::Rng;

/// Length of a UID in characters.
pub const UID_LEN: usize = 16;

/// Number of characters used by the random component.
const RANDOM_LEN: usize = 3;
/// Number of characters used by the deterministic number component.
const NUMBER_LEN: usize = 5;
/// Number of characters used by the time component.
const TIME_LEN: usize = 8;

/// Exclusive upper bound of the random component (36^3).
const MAX_RANDOM: u64 = 46_656;

/// Exclusive upper bound of the round-robin counter.
const MAX_COUNTER: u64 = 1_000_000;

/// Offset placing the process identifier in `1_000_000..=5_194_304`.
const PID_OFFSET: u64 = 1_000_000;
/// Offset placing the thread contribution above `5_194_305`.
const THREAD_OFFSET: u64 = 5_194_305;

/// The time origin 2025-01-01T00:00:00.000Z, in milliseconds since the
/// UNIX epoch. All time components measure elapsed milliseconds from here.
const TIME_ORIGIN_MS: i64 = 1_735_689_600_000;

/// Global round-robin counter, incremented on every UID. Shared by all
/// threads of the process; the atomic increment rules out lost updates.
static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Source of per-thread ordinals for the number base. The first thread to
/// generate a UID (the main thread, in ordinary use) receives ordinal 0.
static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(0);

thread_local! {
    /// The immutable number base for the current process/thread, computed
    /// once the first time the thread generates a UID.
    static NUMBER_BASE: u64 = u64::from(std::process::id()) + PID_OFFSET
        + NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed) + THREAD_OFFSET;
}

/// Encoding of numbers into reversed fixed-length base-36 strings.
mod encode {
    /// Base36 alphabet (0-9, a-z).
    const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    /// Radix used for encoding numbers into strings.
    const RADIX: u64 = 36;

    /// Encode a number into a string of exactly `len` alphanumerical
    /// characters, least-significant digit first.
    ///
    /// Emitting digits lowest-first is equivalent to rendering the number
    /// most-significant-first, left-padding with `'0'` to `len`, and
    /// reversing. Digits beyond `len` are dropped, so a value of `RADIX`
    /// to the power `len` or above silently loses its highest-order
    /// digits rather than growing the string.
    pub fn base36_rev(mut value: u64, len: usize) -> String {
        let mut chars = Vec::with_capacity(len);
        while chars.len() < len {
            chars.push(BASE36[(value % RADIX) as usize]);
            value /= RADIX;
        }
        String::from_utf8(chars).unwrap()
    }
}

/// The number base of the calling thread.
fn number_base() -> u64 {
    NUMBER_BASE.with(|base| *base)
}

/// Advance the global counter and return its previous value, wrapped into
/// `0..MAX_COUNTER`.
fn next_count() -> u64 {
    COUNTER.fetch_add(1, Ordering::Relaxed) % MAX_COUNTER
}

/// Milliseconds elapsed since the time origin.
fn elapsed_ms() -> u64 {
    let now = Utc::now().timestamp_millis();
    debug_assert!(now >= TIME_ORIGIN_MS, "system clock precedes the time origin");
    (now - TIME_ORIGIN_MS).max(0) as u64
}

/// Return a new UID as a string of 16 alphanumerical characters, all
/// lowercase.
///
/// Never fails; the only side effect is advancing the internal round-robin
/// counter by one (wrapping at `1_000_000`).
///
/// # Example
///
/// ```
/// let id = terse_uid::uid();
/// assert_eq!(id.len(), terse_uid::UID_LEN);
/// assert!(id.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
/// ```
pub fn uid() -> String {
    let mut id = String::with_capacity(UID_LEN);
    // Random component
    id.push_str(&encode::base36_rev(
        rand::thread_rng().gen_range(0..MAX_RANDOM),
        RANDOM_LEN,
    ));
    // Number component
    id.push_str(&encode::base36_rev(number_base() + next_count(), NUMBER_LEN));
    // Time component
    id.push_str(&encode::base36_rev(elapsed_ms(), TIME_LEN));
    id
}

/// Return a lazy sequence of UIDs.
///
/// The sequence is pull-based and single-pass: each element is produced by
/// [`uid`] on demand, never precomputed or buffered. With
/// `max_count = Some(n)` the iterator yields exactly `n` UIDs and then
/// terminates; with `None` it is unbounded. Exhausting or abandoning a
/// sequence does not reset generator state, and a fresh sequence continues
/// from the current counter value.
///
/// # Examples
///
/// ```
/// // Bounded sequence.
/// let mut seq = terse_uid::uid_seq(Some(2));
/// assert!(seq.next().is_some());
/// assert!(seq.next().is_some());
/// assert!(seq.next().is_none());
/// ```
///
/// ```
/// // Unbounded sequence, truncated by the caller.
/// let ids: Vec<String> = terse_uid::uid_seq(None).take(2).collect();
/// assert_eq!(ids.len(), 2);
/// ```
pub fn uid_seq(max_count: Option<u64>) -> UidSeq {
    UidSeq { remaining: max_count }
}

/// Lazy sequence of UIDs, created by [`uid_seq`].
#[derive(Debug)]
pub struct UidSeq {
    /// UIDs left to yield, or `None` when unbounded.
    remaining: Option<u64>,
}

impl Iterator for UidSeq {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match &mut self.remaining {
            Some(0) => None,
            Some(n) => {
                *n -= 1;
                Some(uid())
            }
            None => Some(uid()),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining {
            Some(n) => {
                let n = usize::try_from(n).unwrap_or(usize::MAX);
                (n, Some(n))
            }
            None => (usize::MAX, None),
        }
    }
}

impl std::iter::FusedIterator for UidSeq {}
