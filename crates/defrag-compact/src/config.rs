//! Compaction and segment configuration.

use defrag_core::CompactError;

/// How references that share an original offset are laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DuplicatePolicy {
    /// Every reference takes its own destination slot, even when it names
    /// the same byte as the reference before it. The k-th reference in
    /// ascending offset order lands at offset `k - 1`, and each slot holds a
    /// copy of the shared byte.
    #[default]
    Separate,
    /// References that name the same byte share one destination slot. The
    /// write cursor advances once per distinct original offset.
    Shared,
}

/// Configuration for a [`Compactor`](crate::Compactor).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompactConfig {
    /// Layout of references that share an original offset.
    ///
    /// Default: [`DuplicatePolicy::Separate`].
    pub duplicate_policy: DuplicatePolicy,
}

impl CompactConfig {
    /// Default duplicate handling.
    pub const DEFAULT_DUPLICATE_POLICY: DuplicatePolicy = DuplicatePolicy::Separate;

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            duplicate_policy: Self::DEFAULT_DUPLICATE_POLICY,
        }
    }

    /// Set the duplicate policy.
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Check every field against its documented range.
    ///
    /// Every [`DuplicatePolicy`] is valid, so this currently always
    /// succeeds. [`SegmentConfig::validate`] calls it for the embedded
    /// compactor settings.
    pub fn validate(&self) -> Result<(), CompactError> {
        match self.duplicate_policy {
            DuplicatePolicy::Separate | DuplicatePolicy::Shared => Ok(()),
        }
    }
}

/// Configuration for a [`Segment`](crate::Segment).
///
/// Validated at construction; the segment never changes it afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentConfig {
    /// Size of the backing buffer in bytes.
    ///
    /// Default: 4096. Must be non-zero.
    pub capacity: usize,

    /// Fragmentation ratio at or above which
    /// [`Segment::maybe_defragment`](crate::Segment::maybe_defragment)
    /// compacts.
    ///
    /// Default: 0.3. Must lie in `[0.0, 1.0]`.
    pub fragmentation_threshold: f64,

    /// Compactor settings used when the segment defragments.
    pub compact: CompactConfig,
}

impl SegmentConfig {
    /// Default segment size in bytes.
    pub const DEFAULT_CAPACITY: usize = 4096;

    /// Default fragmentation threshold (30% of the used region is dead).
    pub const DEFAULT_FRAGMENTATION_THRESHOLD: f64 = 0.3;

    /// Create a segment config with the given capacity.
    ///
    /// Uses default values for all other parameters.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            fragmentation_threshold: Self::DEFAULT_FRAGMENTATION_THRESHOLD,
            compact: CompactConfig::new(),
        }
    }

    /// Set the fragmentation threshold.
    pub fn with_fragmentation_threshold(mut self, threshold: f64) -> Self {
        self.fragmentation_threshold = threshold;
        self
    }

    /// Set the compactor settings.
    pub fn with_compact(mut self, compact: CompactConfig) -> Self {
        self.compact = compact;
        self
    }

    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<(), CompactError> {
        if self.capacity == 0 {
            return Err(CompactError::InvalidConfig {
                reason: "segment capacity must be non-zero".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.fragmentation_threshold) {
            return Err(CompactError::InvalidConfig {
                reason: format!(
                    "fragmentation_threshold must lie in [0, 1], got {}",
                    self.fragmentation_threshold
                ),
            });
        }
        self.compact.validate()
    }
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
