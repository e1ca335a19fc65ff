//! In-place compaction of a byte buffer with fix-up of external references.
//!
//! Given a buffer and a set of caller-owned handles into it, the compactor
//! packs every referenced byte to the front of the buffer in ascending order
//! of its original offset, rewrites each handle to the byte's new offset,
//! and zero-fills whatever is left behind.
//!
//! # Architecture
//!
//! ```text
//! compact() / Compactor (single pass, no retained state)
//! ├── CompactConfig (DuplicatePolicy)
//! ├── RefInfo[] (index, original offset, destination, byte; per call)
//! └── CompactReport (per-call counters)
//!
//! Segment (fixed-capacity bump buffer)
//! ├── SegmentConfig (capacity, fragmentation threshold, CompactConfig)
//! └── defragment() → Compactor::compact over the whole buffer
//! ```
//!
//! # Failure model
//!
//! Validation runs to completion before the first write. An `Err` from any
//! entry point leaves the buffer and every handle untouched.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod compactor;
pub mod config;
pub mod report;
pub mod segment;

// Public re-exports for the primary API surface.
pub use compactor::{compact, CompactPlan, Compactor};
pub use config::{CompactConfig, DuplicatePolicy, SegmentConfig};
pub use defrag_core::{ByteRef, CompactError, Relocatable};
pub use report::CompactReport;
pub use segment::Segment;
