//! Integration tests: compaction guarantees over generated buffers, and
//! segment behaviour under allocation churn.

use defrag_compact::{
    compact, ByteRef, CompactConfig, CompactError, Compactor, DuplicatePolicy, Segment,
    SegmentConfig,
};
use defrag_test_utils::{
    assert_compacted, patterned_buffer, refs_with_duplicates, scattered_refs,
};

fn shared() -> Compactor {
    Compactor::new(CompactConfig::new().with_duplicate_policy(DuplicatePolicy::Shared))
}

// ── Reference scenarios ─────────────────────────────────────────────

#[test]
fn scattered_block_packs_to_front() {
    let before = vec![0xAA, 0x00, 0xBB, 0x00, 0x00, 0xCC];
    let refs_before = vec![ByteRef(0), ByteRef(2), ByteRef(5)];

    let mut memory = before.clone();
    let mut refs = refs_before.clone();
    compact(&mut memory, &mut refs).unwrap();

    assert_eq!(memory, vec![0xAA, 0xBB, 0xCC, 0x00, 0x00, 0x00]);
    assert_eq!(refs, vec![ByteRef(0), ByteRef(1), ByteRef(2)]);
    assert_eq!(assert_compacted(&before, &memory, &refs_before, &refs), 3);
}

#[test]
fn packed_buffer_needs_no_movement() {
    let mut memory = vec![0x01, 0x02, 0x03];
    let mut refs = vec![ByteRef(0), ByteRef(1), ByteRef(2)];

    let report = compact(&mut memory, &mut refs).unwrap();

    assert_eq!(memory, vec![0x01, 0x02, 0x03]);
    assert_eq!(refs, vec![ByteRef(0), ByteRef(1), ByteRef(2)]);
    assert_eq!(report.bytes_moved, 0);
}

#[test]
fn empty_reference_list_zeroes_buffer() {
    let mut memory = vec![0x11, 0x22, 0x33, 0x44];
    let mut refs: Vec<ByteRef> = Vec::new();

    compact(&mut memory, &mut refs).unwrap();

    assert_eq!(memory, vec![0, 0, 0, 0]);
}

// ── Generated inputs ────────────────────────────────────────────────

#[test]
fn distinct_scattered_refs_across_densities() {
    for &len in &[1usize, 7, 64, 4096] {
        for &percent in &[0usize, 1, 10, 50, 100] {
            let count = len * percent / 100;
            let before = patterned_buffer(len);
            let refs_before = scattered_refs(len, count, len as u64 ^ percent as u64);

            let mut memory = before.clone();
            let mut refs = refs_before.clone();
            let report = compact(&mut memory, &mut refs).unwrap();

            let live_len = assert_compacted(&before, &memory, &refs_before, &refs);
            assert_eq!(live_len, count, "len {len}, {percent}%");
            assert_eq!(report.live_len, count);
            assert_eq!(report.distinct_offsets, count);
        }
    }
}

#[test]
fn duplicate_refs_under_both_policies() {
    for seed in 0..32u64 {
        let len = 48;
        let before = patterned_buffer(len);
        let refs_before = refs_with_duplicates(len, 40, seed);

        let mut separate_mem = before.clone();
        let mut separate_refs = refs_before.clone();
        let separate = Compactor::default()
            .compact(&mut separate_mem, &mut separate_refs)
            .unwrap();
        let live = assert_compacted(&before, &separate_mem, &refs_before, &separate_refs);
        assert_eq!(live, refs_before.len(), "every reference takes a slot");
        assert_eq!(separate.live_len, refs_before.len());

        let mut shared_mem = before.clone();
        let mut shared_refs = refs_before.clone();
        let shared_report = shared().compact(&mut shared_mem, &mut shared_refs).unwrap();
        let live = assert_compacted(&before, &shared_mem, &refs_before, &shared_refs);
        assert_eq!(live, shared_report.distinct_offsets, "one slot per distinct offset");
        assert_eq!(separate.distinct_offsets, shared_report.distinct_offsets);
    }
}

#[test]
fn duplicates_overflowing_the_buffer_fail_cleanly() {
    let before = patterned_buffer(8);
    let refs_before = refs_with_duplicates(8, 9, 11);

    let mut memory = before.clone();
    let mut refs = refs_before.clone();
    let err = compact(&mut memory, &mut refs).unwrap_err();

    assert_eq!(
        err,
        CompactError::TooManyReferences {
            required: 9,
            len: 8
        }
    );
    assert_eq!(memory, before);
    assert_eq!(refs, refs_before);
}

#[test]
fn second_pass_over_generated_input_is_a_no_op() {
    let before = patterned_buffer(512);
    let mut memory = before;
    let mut refs = scattered_refs(512, 100, 99);

    compact(&mut memory, &mut refs).unwrap();
    let (memory_once, refs_once) = (memory.clone(), refs.clone());
    let report = compact(&mut memory, &mut refs).unwrap();

    assert_eq!(memory, memory_once);
    assert_eq!(refs, refs_once);
    assert!(!report.moved_any());
}

#[test]
fn plan_predicts_generated_compaction() {
    let compactor = Compactor::default();
    let mut memory = patterned_buffer(256);
    let mut refs = scattered_refs(256, 64, 5);

    let plan = compactor.plan(memory.len(), &refs).unwrap();
    let report = compactor.compact(&mut memory, &mut refs).unwrap();

    let offsets: Vec<usize> = refs.iter().map(|r| r.offset()).collect();
    assert_eq!(plan.destinations(), offsets.as_slice());
    assert_eq!(plan.moves(), report.bytes_moved);
}

// ── Segment churn ───────────────────────────────────────────────────

/// Allocate, drop every other live byte, defragment, repeat. The segment
/// must never fill up: defragmentation returns dropped bytes to the pool.
#[test]
fn segment_survives_alloc_free_churn() {
    let config = SegmentConfig::new(256).with_fragmentation_threshold(0.25);
    let mut seg = Segment::new(config).unwrap();
    let mut live: Vec<ByteRef> = Vec::new();
    let mut values: Vec<u8> = Vec::new();

    for round in 0..200u32 {
        let batch: Vec<u8> = (0..32u32).map(|i| (round * 32 + i) as u8 | 1).collect();
        let refs = seg.alloc_bytes(&batch).unwrap();
        live.extend(refs);
        values.extend(&batch);

        // Keep every other reference.
        (live, values) = live
            .iter()
            .zip(&values)
            .step_by(2)
            .map(|(&r, &v)| (r, v))
            .unzip();

        seg.maybe_defragment(&mut live).unwrap();

        for (r, &v) in live.iter().zip(&values) {
            assert_eq!(seg.get(*r), Some(v), "round {round}: value lost at {r}");
        }
    }

    assert!(seg.used() <= seg.capacity());
}
