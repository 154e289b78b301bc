//! Black-box tests of UID generation: format, volume uniqueness, time
//! ordering, and sequence bounding.

use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use terse_uid::{UID_LEN, uid, uid_seq};

/// Volume for the uniqueness checks.
const NUM_UIDS: usize = 1_000_000;

/// Whether a UID consists of exactly 16 lowercase alphanumerical
/// characters.
fn is_well_formed(id: &str) -> bool {
    id.len() == UID_LEN && id.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
}

/// Undo the encoding of a single component: reverse the characters back to
/// most-significant-first order and read them in base 36.
fn decode(component: &str) -> u64 {
    component
        .chars()
        .rev()
        .fold(0, |n, c| n * 36 + u64::from(c.to_digit(36).expect("base-36 digit")))
}

/// Verify format and uniqueness of one batch of UIDs.
fn check_batch(uids: &HashSet<String>) {
    let invalid = uids.iter().filter(|id| !is_well_formed(id)).count();
    assert_eq!(invalid, 0, "malformed UIDs in batch");
    assert_eq!(uids.len(), NUM_UIDS, "duplicate UIDs in batch");
}

#[test]
fn uid_yields_a_million_distinct_well_formed_uids() {
    let mut uids = HashSet::with_capacity(NUM_UIDS);
    for _ in 0..NUM_UIDS {
        uids.insert(uid());
    }
    check_batch(&uids);
}

#[test]
fn uid_seq_yields_a_million_distinct_well_formed_uids() {
    let uids: HashSet<String> = uid_seq(Some(NUM_UIDS as u64)).collect();
    check_batch(&uids);
}

#[test]
fn bounded_seq_terminates_after_max_count() {
    let mut seq = uid_seq(Some(5));
    assert_eq!(seq.size_hint(), (5, Some(5)));
    for _ in 0..5 {
        let id = seq.next().expect("bounded sequence ended early");
        assert!(is_well_formed(&id));
    }
    assert!(seq.next().is_none());
    // A finished sequence stays finished.
    assert!(seq.next().is_none());
}

#[test]
fn unbounded_seq_keeps_yielding() {
    let mut seq = uid_seq(None);
    assert_eq!(seq.size_hint(), (usize::MAX, None));
    for _ in 0..10_000 {
        assert!(seq.next().is_some());
    }
}

#[test]
fn zero_bound_yields_nothing() {
    assert!(uid_seq(Some(0)).next().is_none());
}

#[test]
fn time_component_is_non_decreasing() {
    let earlier = decode(&uid()[8..]);
    thread::sleep(Duration::from_millis(10));
    let later = decode(&uid()[8..]);
    // The sleep crossed at least one millisecond boundary.
    assert!(later > earlier);
}

#[test]
fn seq_continues_from_current_generator_state() {
    // Sequences share the process-wide counter, so UIDs from consecutive
    // sequences never repeat a (counter, time) pair either.
    let first: Vec<String> = uid_seq(Some(100)).collect();
    let second: Vec<String> = uid_seq(Some(100)).collect();
    let all: HashSet<&String> = first.iter().chain(second.iter()).collect();
    assert_eq!(all.len(), 200);
}
