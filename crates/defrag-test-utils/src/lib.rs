//! Test fixtures and post-condition checks for defrag development.
//!
//! Provides deterministic buffers and reference sets, and
//! [`assert_compacted`], which checks every guarantee a compaction pass
//! makes against a before/after pair.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::HashSet;

use defrag_core::{ByteRef, Relocatable};
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A buffer of `len` non-zero bytes, so zero-filled tails are detectable.
pub fn patterned_buffer(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 255) as u8 + 1).collect()
}

/// `count` distinct references into a buffer of `len` bytes, in scrambled
/// order. Deterministic for a given seed.
///
/// # Panics
///
/// Panics if `count > len`.
pub fn scattered_refs(len: usize, count: usize, seed: u64) -> Vec<ByteRef> {
    assert!(count <= len, "cannot place {count} distinct refs in {len} bytes");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut occupied = HashSet::with_capacity(count);
    let mut refs = Vec::with_capacity(count);

    for _ in 0..count {
        let mut pos = (rng.next_u64() % len as u64) as usize;
        // Linear probe to avoid collisions.
        while occupied.contains(&pos) {
            pos = (pos + 1) % len;
        }
        occupied.insert(pos);
        refs.push(ByteRef(pos));
    }
    refs
}

/// `count` references into a buffer of `len` bytes, drawn independently so
/// duplicates are likely. Deterministic for a given seed.
pub fn refs_with_duplicates(len: usize, count: usize, seed: u64) -> Vec<ByteRef> {
    assert!(len > 0, "cannot reference into an empty buffer");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| ByteRef((rng.next_u64() % len as u64) as usize))
        .collect()
}

/// Check a compaction result against the state it started from.
///
/// Asserts that:
///
/// - the buffer length is unchanged;
/// - every reference names the same byte value it named before;
/// - references with distinct original offsets keep their relative order;
/// - the new offsets form the dense range `0..live_len`;
/// - every byte from `live_len` onwards is zero.
///
/// Holds for either duplicate policy. Returns `live_len`.
///
/// # Panics
///
/// Panics with a description of the first violated guarantee.
pub fn assert_compacted<R: Relocatable>(
    before: &[u8],
    after: &[u8],
    refs_before: &[R],
    refs_after: &[R],
) -> usize {
    assert_eq!(before.len(), after.len(), "buffer length changed");
    assert_eq!(
        refs_before.len(),
        refs_after.len(),
        "reference count changed"
    );

    for (i, (rb, ra)) in refs_before.iter().zip(refs_after).enumerate() {
        let (old, new) = (rb.offset(), ra.offset());
        assert!(new < after.len(), "reference {i} relocated out of bounds to {new}");
        assert_eq!(
            after[new], before[old],
            "reference {i}: byte moved from {old} to {new} changed value"
        );
    }

    let mut order: Vec<usize> = (0..refs_before.len()).collect();
    order.sort_by_key(|&i| refs_before[i].offset());
    for pair in order.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let (old_a, old_b) = (refs_before[a].offset(), refs_before[b].offset());
        let (new_a, new_b) = (refs_after[a].offset(), refs_after[b].offset());
        if old_a < old_b {
            assert!(
                new_a < new_b,
                "order lost: {old_a} < {old_b} but relocated to {new_a} >= {new_b}"
            );
        }
    }

    let mut dests: Vec<usize> = refs_after.iter().map(Relocatable::offset).collect();
    dests.sort_unstable();
    dests.dedup();
    let live_len = dests.len();
    assert!(
        dests.iter().enumerate().all(|(k, &d)| k == d),
        "destinations are not the dense range 0..{live_len}: {dests:?}"
    );

    if let Some(pos) = after[live_len..].iter().position(|&b| b != 0) {
        panic!(
            "tail not zeroed: byte {} is {:#04x}",
            live_len + pos,
            after[live_len + pos]
        );
    }

    live_len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterned_buffer_has_no_zeros() {
        let buf = patterned_buffer(600);
        assert_eq!(buf.len(), 600);
        assert!(buf.iter().all(|&b| b != 0));
    }

    #[test]
    fn scattered_refs_are_distinct_and_in_bounds() {
        let refs = scattered_refs(100, 40, 42);
        assert_eq!(refs.len(), 40);
        let unique: HashSet<ByteRef> = refs.iter().copied().collect();
        assert_eq!(unique.len(), 40, "all refs should be distinct");
        assert!(refs.iter().all(|r| r.offset() < 100));
    }

    #[test]
    fn scattered_refs_are_deterministic() {
        assert_eq!(scattered_refs(64, 16, 7), scattered_refs(64, 16, 7));
    }

    #[test]
    fn scattered_refs_can_fill_the_buffer() {
        let mut refs = scattered_refs(10, 10, 1);
        refs.sort();
        assert_eq!(refs, (0..10).map(ByteRef).collect::<Vec<_>>());
    }

    #[test]
    fn refs_with_duplicates_stay_in_bounds() {
        let refs = refs_with_duplicates(4, 50, 3);
        assert_eq!(refs.len(), 50);
        assert!(refs.iter().all(|r| r.offset() < 4));
    }

    #[test]
    fn accepts_a_correct_compaction() {
        let before = [0xAA, 0x00, 0xBB, 0x00, 0x00, 0xCC];
        let after = [0xAA, 0xBB, 0xCC, 0x00, 0x00, 0x00];
        let refs_before = [ByteRef(0), ByteRef(2), ByteRef(5)];
        let refs_after = [ByteRef(0), ByteRef(1), ByteRef(2)];
        assert_eq!(
            assert_compacted(&before, &after, &refs_before, &refs_after),
            3
        );
    }

    #[test]
    #[should_panic(expected = "tail not zeroed")]
    fn rejects_dirty_tail() {
        let before = [1, 2, 3];
        let after = [1, 0, 3];
        assert_compacted(&before, &after, &[ByteRef(0)], &[ByteRef(0)]);
    }

    #[test]
    #[should_panic(expected = "order lost")]
    fn rejects_reordering() {
        let before = [1, 1, 0];
        let after = [1, 1, 0];
        assert_compacted(
            &before,
            &after,
            &[ByteRef(0), ByteRef(1)],
            &[ByteRef(1), ByteRef(0)],
        );
    }

    #[test]
    #[should_panic(expected = "changed value")]
    fn rejects_lost_value() {
        let before = [0, 5];
        let after = [0, 0];
        assert_compacted(&before, &after, &[ByteRef(1)], &[ByteRef(0)]);
    }
}
