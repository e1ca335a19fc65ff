//! Benchmark workloads for defrag compaction.
//!
//! Provides pre-built buffer/reference pairs shared by the criterion
//! benches:
//!
//! - [`workload`]: a patterned buffer with a scattered reference set at a
//!   given density
//! - [`packed_workload`]: the same buffer already compacted, for measuring
//!   the no-movement path

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use defrag_core::ByteRef;
use defrag_test_utils::{patterned_buffer, scattered_refs};

/// A buffer and the references to compact it with.
#[derive(Clone, Debug)]
pub struct Workload {
    /// Bytes to compact.
    pub buffer: Vec<u8>,
    /// Distinct references into `buffer`, in scrambled order.
    pub refs: Vec<ByteRef>,
}

/// Build a workload of `len` bytes with `percent`% of them referenced.
///
/// Deterministic for a given `seed`.
pub fn workload(len: usize, percent: usize, seed: u64) -> Workload {
    let count = len * percent.min(100) / 100;
    Workload {
        buffer: patterned_buffer(len),
        refs: scattered_refs(len, count, seed),
    }
}

/// Build a workload whose references already form the packed prefix
/// `0..count`, so compaction moves nothing and only zeroes the tail.
pub fn packed_workload(len: usize, percent: usize) -> Workload {
    let count = len * percent.min(100) / 100;
    Workload {
        buffer: patterned_buffer(len),
        refs: (0..count).map(ByteRef).collect(),
    }
}
