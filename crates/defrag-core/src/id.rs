//! The [`ByteRef`] handle.

use std::fmt;

/// Handle to a single byte inside a buffer, expressed as an offset from
/// the buffer start.
///
/// A `ByteRef` carries no lifetime and no pointer: it stays meaningful only
/// as long as the caller keeps it in step with the buffer. The compactor
/// rewrites it through [`Relocatable`](crate::Relocatable) whenever the byte
/// it names moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteRef(pub usize);

impl ByteRef {
    /// Offset of the referenced byte from the buffer start.
    pub fn offset(self) -> usize {
        self.0
    }
}

impl fmt::Display for ByteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl From<usize> for ByteRef {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

impl From<ByteRef> for usize {
    fn from(r: ByteRef) -> Self {
        r.0
    }
}
