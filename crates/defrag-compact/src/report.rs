//! Per-call compaction metrics.
//!
//! [`CompactReport`] is returned by every successful compaction and
//! describes what the pass did to the buffer.

/// Counters collected during a single compaction pass.
///
/// Every byte of the buffer is accounted for exactly once:
/// `bytes_moved + bytes_in_place + bytes_zeroed == buffer length`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompactReport {
    /// Number of references the caller passed in.
    pub references: usize,
    /// Number of distinct original offsets among those references.
    pub distinct_offsets: usize,
    /// Final write cursor: length of the packed prefix.
    pub live_len: usize,
    /// Destination slots that received a byte from a different offset.
    pub bytes_moved: usize,
    /// Destination slots whose byte was already in place.
    pub bytes_in_place: usize,
    /// Tail bytes set to zero (`buffer length - live_len`).
    pub bytes_zeroed: usize,
}

impl CompactReport {
    /// Whether any referenced byte changed position.
    pub fn moved_any(&self) -> bool {
        self.bytes_moved > 0
    }

    /// Length of the buffer the report describes.
    pub fn buffer_len(&self) -> usize {
        self.live_len + self.bytes_zeroed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_report_is_zero() {
        let r = CompactReport::default();
        assert_eq!(r.references, 0);
        assert_eq!(r.distinct_offsets, 0);
        assert_eq!(r.live_len, 0);
        assert_eq!(r.bytes_moved, 0);
        assert_eq!(r.bytes_in_place, 0);
        assert_eq!(r.bytes_zeroed, 0);
        assert!(!r.moved_any());
    }

    #[test]
    fn buffer_len_sums_live_and_tail() {
        let r = CompactReport {
            references: 3,
            distinct_offsets: 3,
            live_len: 3,
            bytes_moved: 2,
            bytes_in_place: 1,
            bytes_zeroed: 3,
        };
        assert_eq!(r.buffer_len(), 6);
        assert!(r.moved_any());
    }
}
