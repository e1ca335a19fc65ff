//! Error types for compaction and segment operations.
//!
//! Every variant is detected before the first byte is written, so a
//! returned error always means the buffer and the references are exactly
//! as the caller passed them in.

use std::error::Error;
use std::fmt;

/// Errors that can occur while compacting a buffer or managing a segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompactError {
    /// The buffer has length zero, so no offset is addressable.
    EmptyBuffer,
    /// A reference points at or beyond the end of the buffer.
    ReferenceOutOfBounds {
        /// Position of the offending reference in the caller's sequence.
        index: usize,
        /// The offset the reference carried.
        offset: usize,
        /// Length of the addressable region.
        len: usize,
    },
    /// The references need more destination slots than the buffer holds.
    ///
    /// Only reachable when duplicate references each take their own slot.
    TooManyReferences {
        /// Number of destination slots the references require.
        required: usize,
        /// Length of the buffer.
        len: usize,
    },
    /// A segment has no room left for the requested allocation.
    CapacityExceeded {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes still free in the segment.
        remaining: usize,
    },
    /// A configuration value failed validation.
    InvalidConfig {
        /// Human-readable description of the rejected value.
        reason: String,
    },
}

impl fmt::Display for CompactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBuffer => write!(f, "cannot compact an empty buffer"),
            Self::ReferenceOutOfBounds { index, offset, len } => {
                write!(
                    f,
                    "reference {index} out of bounds: offset {offset}, buffer length {len}"
                )
            }
            Self::TooManyReferences { required, len } => {
                write!(
                    f,
                    "too many references: {required} slots required, buffer length {len}"
                )
            }
            Self::CapacityExceeded {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "segment capacity exceeded: requested {requested} bytes, remaining {remaining} bytes"
                )
            }
            Self::InvalidConfig { reason } => write!(f, "invalid config: {reason}"),
        }
    }
}

impl Error for CompactError {}
