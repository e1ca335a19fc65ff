//! The single-pass compacting relocator.
//!
//! [`Compactor::compact`] packs every referenced byte to the front of the
//! buffer in ascending order of original offset, rewrites each reference to
//! its byte's new position, and zero-fills the tail.
//!
//! The pass runs in three phases:
//!
//! 1. **Layout.** Bounds-check every reference, sort by original offset and
//!    assign destinations with a write cursor starting at 0. Nothing is
//!    written yet, so any error leaves the caller's state untouched.
//! 2. **Capture.** Read each reference's source byte into its [`RefInfo`].
//!    Under [`DuplicatePolicy::Separate`] the cursor can overtake the source
//!    offsets of later entries; capturing first means no write can clobber
//!    a byte that has not been read.
//! 3. **Apply.** Write captured bytes to their destinations, skipping slots
//!    whose byte is already in place, relocate every reference, and zero
//!    from the final cursor to the end.

use defrag_core::{CompactError, Relocatable};
use smallvec::SmallVec;

use crate::config::{CompactConfig, DuplicatePolicy};
use crate::report::CompactReport;

/// Reference sets up to this size are laid out without a heap allocation.
const INLINE_REFS: usize = 16;

/// One caller reference for the duration of a single pass.
#[derive(Clone, Copy, Debug)]
struct RefInfo {
    /// Position in the caller's reference slice.
    index: usize,
    /// Offset the reference carried on entry.
    offset: usize,
    /// Offset the reference will carry on exit.
    dest: usize,
    /// Byte read from `offset` before any write.
    value: u8,
}

/// Sorted reference infos plus the cursor state they produce.
struct Layout {
    infos: SmallVec<[RefInfo; INLINE_REFS]>,
    live_len: usize,
    distinct_offsets: usize,
}

/// Compact `buffer` in place using the default configuration.
///
/// Shorthand for `Compactor::default().compact(buffer, references)`.
///
/// # Examples
///
/// ```
/// use defrag_compact::{compact, ByteRef};
///
/// let mut memory = [0xAA, 0x00, 0xBB, 0x00, 0x00, 0xCC];
/// let mut refs = [ByteRef(0), ByteRef(2), ByteRef(5)];
///
/// compact(&mut memory, &mut refs).unwrap();
///
/// assert_eq!(memory, [0xAA, 0xBB, 0xCC, 0x00, 0x00, 0x00]);
/// assert_eq!(refs, [ByteRef(0), ByteRef(1), ByteRef(2)]);
/// ```
pub fn compact<R: Relocatable>(
    buffer: &mut [u8],
    references: &mut [R],
) -> Result<CompactReport, CompactError> {
    Compactor::default().compact(buffer, references)
}

/// Compacts byte buffers and relocates references into them.
///
/// Holds only its configuration; one `Compactor` can serve any number of
/// buffers, from any thread.
#[derive(Clone, Debug, Default)]
pub struct Compactor {
    config: CompactConfig,
}

impl Compactor {
    /// Create a compactor with the given configuration.
    pub fn new(config: CompactConfig) -> Self {
        Self { config }
    }

    /// The configuration this compactor was built with.
    pub fn config(&self) -> &CompactConfig {
        &self.config
    }

    /// Compact `buffer` in place and relocate every reference.
    ///
    /// On success:
    ///
    /// - references with distinct original offsets keep their relative order;
    /// - destinations form the dense range `0..live_len`;
    /// - every reference names a byte equal to the one it named on entry;
    /// - every byte from `live_len` to the end of the buffer is zero;
    /// - the buffer length is unchanged.
    ///
    /// # Errors
    ///
    /// - [`CompactError::EmptyBuffer`] if `buffer` is empty.
    /// - [`CompactError::ReferenceOutOfBounds`] for the first reference
    ///   whose offset is not below `buffer.len()`.
    /// - [`CompactError::TooManyReferences`] if the references need more
    ///   slots than the buffer has.
    ///
    /// The buffer and the references are untouched when an error is returned.
    pub fn compact<R: Relocatable>(
        &self,
        buffer: &mut [u8],
        references: &mut [R],
    ) -> Result<CompactReport, CompactError> {
        let len = buffer.len();
        let count = references.len();
        let mut layout = self.layout(len, references).inspect_err(|err| {
            tracing::debug!(%err, len, references = count, "compaction rejected");
        })?;

        for info in layout.infos.iter_mut() {
            info.value = buffer[info.offset];
        }

        let mut report = CompactReport {
            references: count,
            distinct_offsets: layout.distinct_offsets,
            live_len: layout.live_len,
            ..CompactReport::default()
        };

        let mut last_dest = None;
        let mut run = MoveRun::default();
        for info in &layout.infos {
            // Shared duplicates reuse the slot their first occurrence filled.
            if last_dest != Some(info.dest) {
                if info.offset != info.dest {
                    buffer[info.dest] = info.value;
                    report.bytes_moved += 1;
                    run.push(info.offset, info.dest);
                } else {
                    report.bytes_in_place += 1;
                }
                last_dest = Some(info.dest);
            }
            references[info.index].relocate(info.dest);
        }
        run.flush();

        buffer[layout.live_len..].fill(0);
        report.bytes_zeroed = len - layout.live_len;

        tracing::debug!(
            len,
            references = report.references,
            distinct_offsets = report.distinct_offsets,
            live_len = report.live_len,
            bytes_moved = report.bytes_moved,
            bytes_zeroed = report.bytes_zeroed,
            "compacted buffer"
        );
        Ok(report)
    }

    /// Compute where every reference would land, without writing anything.
    ///
    /// Runs the same validation as [`compact`](Self::compact) against a
    /// buffer of length `len`.
    pub fn plan<R: Relocatable>(
        &self,
        len: usize,
        references: &[R],
    ) -> Result<CompactPlan, CompactError> {
        let layout = self.layout(len, references).inspect_err(|err| {
            tracing::debug!(%err, len, references = references.len(), "plan rejected");
        })?;

        let mut destinations = vec![0; references.len()];
        let mut moves = 0;
        let mut last_dest = None;
        for info in &layout.infos {
            destinations[info.index] = info.dest;
            if last_dest != Some(info.dest) {
                if info.offset != info.dest {
                    moves += 1;
                }
                last_dest = Some(info.dest);
            }
        }

        Ok(CompactPlan {
            destinations,
            live_len: layout.live_len,
            distinct_offsets: layout.distinct_offsets,
            moves,
        })
    }

    /// Validate references and assign destinations in ascending offset order.
    fn layout<R: Relocatable>(
        &self,
        len: usize,
        references: &[R],
    ) -> Result<Layout, CompactError> {
        if len == 0 {
            return Err(CompactError::EmptyBuffer);
        }

        let mut infos: SmallVec<[RefInfo; INLINE_REFS]> =
            SmallVec::with_capacity(references.len());
        for (index, reference) in references.iter().enumerate() {
            let offset = reference.offset();
            if offset >= len {
                return Err(CompactError::ReferenceOutOfBounds { index, offset, len });
            }
            infos.push(RefInfo {
                index,
                offset,
                dest: 0,
                value: 0,
            });
        }

        // Stable: under `Separate`, tied references take slots in input order.
        infos.sort_by_key(|info| info.offset);

        let mut cursor = 0;
        let mut distinct_offsets = 0;
        let mut prev_offset = None;
        for info in infos.iter_mut() {
            let repeat = prev_offset == Some(info.offset);
            if !repeat {
                distinct_offsets += 1;
            }
            match self.config.duplicate_policy {
                DuplicatePolicy::Shared if repeat => info.dest = cursor - 1,
                _ => {
                    info.dest = cursor;
                    cursor += 1;
                }
            }
            prev_offset = Some(info.offset);
        }

        if cursor > len {
            return Err(CompactError::TooManyReferences {
                required: cursor,
                len,
            });
        }

        Ok(Layout {
            infos,
            live_len: cursor,
            distinct_offsets,
        })
    }
}

/// Contiguous source bytes written to contiguous destinations, reported as
/// one trace event.
#[derive(Default)]
struct MoveRun {
    from: usize,
    to: usize,
    len: usize,
}

impl MoveRun {
    fn push(&mut self, from: usize, to: usize) {
        if self.len > 0 && from == self.from + self.len && to == self.to + self.len {
            self.len += 1;
            return;
        }
        self.flush();
        *self = MoveRun { from, to, len: 1 };
    }

    fn flush(&mut self) {
        if self.len > 0 {
            tracing::trace!(from = self.from, to = self.to, len = self.len, "moved byte run");
        }
        self.len = 0;
    }
}

/// Destinations computed by [`Compactor::plan`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompactPlan {
    destinations: Vec<usize>,
    live_len: usize,
    distinct_offsets: usize,
    moves: usize,
}

impl CompactPlan {
    /// New offset of every reference, in the caller's order.
    pub fn destinations(&self) -> &[usize] {
        &self.destinations
    }

    /// New offset of the reference at `index`, if it exists.
    pub fn destination(&self, index: usize) -> Option<usize> {
        self.destinations.get(index).copied()
    }

    /// Length of the packed prefix after compaction.
    pub fn live_len(&self) -> usize {
        self.live_len
    }

    /// Number of distinct original offsets.
    pub fn distinct_offsets(&self) -> usize {
        self.distinct_offsets
    }

    /// Number of destination slots that would receive a byte from elsewhere.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Whether compaction would leave every referenced byte where it is.
    pub fn is_identity(&self) -> bool {
        self.moves == 0
    }
}
