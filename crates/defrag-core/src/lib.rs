//! Core types and traits for in-place byte-buffer compaction.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the abstractions shared across the defrag workspace: the [`ByteRef`]
//! handle, the [`Relocatable`] trait that lets the compactor rewrite
//! caller-owned references, and the [`CompactError`] type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod traits;

pub use error::CompactError;
pub use id::ByteRef;
pub use traits::Relocatable;
