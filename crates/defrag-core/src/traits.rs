//! The [`Relocatable`] trait: how the compactor reads and rewrites
//! caller-owned references.

use crate::id::ByteRef;

/// A caller-owned handle whose value is an offset into a buffer.
///
/// The compactor reads every handle's [`offset`](Relocatable::offset)
/// before it touches the buffer, then calls
/// [`relocate`](Relocatable::relocate) exactly once per handle with the
/// byte's new offset.
///
/// Handles that live in separate places can still be compacted together by
/// collecting `&mut` borrows into a slice: `&mut T` implements this trait
/// whenever `T` does.
pub trait Relocatable {
    /// Current offset of the referenced byte.
    fn offset(&self) -> usize;

    /// Point the handle at `offset`.
    fn relocate(&mut self, offset: usize);
}

impl Relocatable for ByteRef {
    fn offset(&self) -> usize {
        self.0
    }

    fn relocate(&mut self, offset: usize) {
        self.0 = offset;
    }
}

impl Relocatable for usize {
    fn offset(&self) -> usize {
        *self
    }

    fn relocate(&mut self, offset: usize) {
        *self = offset;
    }
}

impl<T: Relocatable + ?Sized> Relocatable for &mut T {
    fn offset(&self) -> usize {
        (**self).offset()
    }

    fn relocate(&mut self, offset: usize) {
        (**self).relocate(offset);
    }
}
