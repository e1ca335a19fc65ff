//! Fixed-capacity byte segment with bump allocation and defragmentation.
//!
//! A [`Segment`] hands out one [`ByteRef`] per allocated byte. The segment
//! never tracks which handles are still live: callers pass the live set to
//! [`Segment::defragment`], which compacts the buffer, rewrites those
//! handles, and moves the bump cursor to the end of the packed prefix.

use defrag_core::{ByteRef, CompactError, Relocatable};

use crate::compactor::Compactor;
use crate::config::SegmentConfig;
use crate::report::CompactReport;

/// A single contiguous byte buffer with a bump cursor.
///
/// The buffer is zero-initialised and allocated to full capacity at
/// creation. It is never resized.
pub struct Segment {
    /// Backing storage.
    data: Vec<u8>,
    /// Bump pointer: next free position.
    cursor: usize,
    fragmentation_threshold: f64,
    compactor: Compactor,
}

impl Segment {
    /// Create a zeroed segment from a validated config.
    pub fn new(config: SegmentConfig) -> Result<Self, CompactError> {
        config.validate()?;
        Ok(Self {
            data: vec![0; config.capacity],
            cursor: 0,
            fragmentation_threshold: config.fragmentation_threshold,
            compactor: Compactor::new(config.compact),
        })
    }

    /// Create a segment with `capacity` bytes and default settings.
    pub fn with_capacity(capacity: usize) -> Result<Self, CompactError> {
        Self::new(SegmentConfig::new(capacity))
    }

    /// Bump-allocate one byte holding `value`.
    pub fn alloc(&mut self, value: u8) -> Result<ByteRef, CompactError> {
        if self.cursor >= self.data.len() {
            return Err(CompactError::CapacityExceeded {
                requested: 1,
                remaining: 0,
            });
        }
        let r = ByteRef(self.cursor);
        self.data[self.cursor] = value;
        self.cursor += 1;
        Ok(r)
    }

    /// Bump-allocate `values.len()` consecutive bytes, one handle per byte.
    ///
    /// All-or-nothing: if the values do not fit, nothing is allocated.
    pub fn alloc_bytes(&mut self, values: &[u8]) -> Result<Vec<ByteRef>, CompactError> {
        if values.len() > self.remaining() {
            return Err(CompactError::CapacityExceeded {
                requested: values.len(),
                remaining: self.remaining(),
            });
        }
        let start = self.cursor;
        let end = start + values.len();
        self.data[start..end].copy_from_slice(values);
        self.cursor = end;
        Ok((start..end).map(ByteRef).collect())
    }

    /// Read the byte behind `r`, or `None` if it lies outside the used region.
    pub fn get(&self, r: ByteRef) -> Option<u8> {
        self.used_bytes().get(r.offset()).copied()
    }

    /// Overwrite the byte behind `r`, or `None` if it lies outside the used
    /// region.
    pub fn set(&mut self, r: ByteRef, value: u8) -> Option<()> {
        let used = self.cursor;
        let slot = self.data[..used].get_mut(r.offset())?;
        *slot = value;
        Some(())
    }

    /// The full backing buffer, including the unused tail.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The allocated prefix of the buffer.
    pub fn used_bytes(&self) -> &[u8] {
        &self.data[..self.cursor]
    }

    /// Number of bytes allocated.
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Remaining free capacity in bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Fraction of the used region not named by any live handle.
    ///
    /// `0.0` for an empty segment. Handles outside the used region are
    /// ignored.
    pub fn fragmentation<R: Relocatable>(&self, live: &[R]) -> f64 {
        if self.cursor == 0 {
            return 0.0;
        }
        let mut offsets: Vec<usize> = live
            .iter()
            .map(Relocatable::offset)
            .filter(|&offset| offset < self.cursor)
            .collect();
        offsets.sort_unstable();
        offsets.dedup();
        1.0 - offsets.len() as f64 / self.cursor as f64
    }

    /// Whether fragmentation has reached the configured threshold.
    pub fn should_defragment<R: Relocatable>(&self, live: &[R]) -> bool {
        self.cursor > 0 && self.fragmentation(live) >= self.fragmentation_threshold
    }

    /// Compact the segment so that only bytes named by `live` remain.
    ///
    /// Every handle in `live` is rewritten to its byte's new offset and the
    /// bump cursor moves to the end of the packed prefix, so subsequent
    /// allocations reuse the reclaimed space.
    ///
    /// Under [`DuplicatePolicy::Separate`](crate::DuplicatePolicy::Separate)
    /// each duplicate handle takes its own slot, so the packed prefix is as
    /// long as `live` and can end past the old cursor: one used byte named
    /// by four handles leaves four bytes used.
    ///
    /// # Errors
    ///
    /// [`CompactError::ReferenceOutOfBounds`] if a handle lies outside the
    /// used region, plus anything [`Compactor::compact`] returns, including
    /// [`CompactError::TooManyReferences`] when duplicates need more slots
    /// than the segment has. The segment and the handles are untouched on
    /// error.
    pub fn defragment<R: Relocatable>(
        &mut self,
        live: &mut [R],
    ) -> Result<CompactReport, CompactError> {
        for (index, r) in live.iter().enumerate() {
            let offset = r.offset();
            if offset >= self.cursor {
                tracing::debug!(
                    index,
                    offset,
                    used = self.cursor,
                    "defragment rejected handle outside used region"
                );
                return Err(CompactError::ReferenceOutOfBounds {
                    index,
                    offset,
                    len: self.cursor,
                });
            }
        }

        let reclaimed_from = self.cursor;
        let report = self.compactor.compact(&mut self.data, live)?;
        self.cursor = report.live_len;

        tracing::trace!(
            used_before = reclaimed_from,
            used_after = self.cursor,
            capacity = self.data.len(),
            "defragmented segment"
        );
        Ok(report)
    }

    /// Defragment only if [`should_defragment`](Self::should_defragment)
    /// holds.
    pub fn maybe_defragment<R: Relocatable>(
        &mut self,
        live: &mut [R],
    ) -> Result<Option<CompactReport>, CompactError> {
        if !self.should_defragment(live) {
            return Ok(None);
        }
        self.defragment(live).map(Some)
    }

    /// Discard every allocation and zero the buffer.
    pub fn reset(&mut self) {
        self.data.fill(0);
        self.cursor = 0;
    }
}
