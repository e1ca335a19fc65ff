//! defrag: pack referenced bytes to the front of a buffer and fix up the
//! references that point into it.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the defrag sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use defrag::prelude::*;
//!
//! let mut memory = [0xAA, 0x00, 0xBB, 0x00, 0x00, 0xCC];
//! let mut refs = [ByteRef(0), ByteRef(2), ByteRef(5)];
//!
//! let report = compact(&mut memory, &mut refs).unwrap();
//!
//! assert_eq!(memory, [0xAA, 0xBB, 0xCC, 0x00, 0x00, 0x00]);
//! assert_eq!(refs, [ByteRef(0), ByteRef(1), ByteRef(2)]);
//! assert_eq!(report.bytes_zeroed, 3);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `defrag-core` | `ByteRef`, `Relocatable`, `CompactError` |
//! | [`compact`] | `defrag-compact` | `Compactor`, configs, `CompactReport`, `Segment` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Handles, the relocation trait, and errors (`defrag-core`).
pub use defrag_core as types;

/// The compactor and the segment built on it (`defrag-compact`).
pub use defrag_compact as compact;

/// Common imports for typical defrag usage.
///
/// ```rust
/// use defrag::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use defrag_core::{ByteRef, CompactError, Relocatable};

    // Compaction
    pub use defrag_compact::{
        compact, CompactConfig, CompactPlan, CompactReport, Compactor, DuplicatePolicy,
    };

    // Segment
    pub use defrag_compact::{Segment, SegmentConfig};
}
