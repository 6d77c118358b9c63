use core::slice;

use crate::allocator::{Allocator, SystemAllocator};
use crate::core::AllocVec;
use crate::error::AllocVecError;

/// Iterator over the elements of an `AllocVec`
///
/// This iterator implements `Clone`.
#[derive(Clone)]
pub struct AllocVecIter<'a, T> {
    inner: slice::Iter<'a, T>,
}

impl<'a, T> Iterator for AllocVecIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for AllocVecIter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for AllocVecIter<'_, T> {}

impl<'a, T, A: Allocator> IntoIterator for &'a AllocVec<T, A> {
    type Item = &'a T;
    type IntoIter = AllocVecIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        AllocVecIter {
            inner: self.as_slice().iter(),
        }
    }
}

/// Where a cursor stands relative to the last element it returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Nothing returned yet
    Fresh,
    /// The last `next()` returned the element at this index
    Positioned(usize),
    /// The last returned element was removed; the cursor waits for `next()`
    Removed,
    /// `next()` reached the end
    Exhausted,
}

impl CursorState {
    pub(crate) fn index(self) -> Option<usize> {
        match self {
            CursorState::Positioned(index) => Some(index),
            _ => None,
        }
    }
}

/// A cursor over one `AllocVec` that can mutate the array while traversing it.
///
/// `remove` and `replace` act on the element returned by the last `next()`.
/// After a `remove`, the following `next()` returns the element that slid into
/// the vacated slot, so a single left-to-right pass visits every element once.
///
/// ```
/// # use allocvec::AllocVec;
/// let mut vec: AllocVec<u32> = AllocVec::new().unwrap();
/// for i in 1..=5 {
///     vec.add(i).unwrap();
/// }
///
/// let mut cursor = vec.cursor();
/// while let Some(value) = cursor.next() {
///     if value % 2 == 0 {
///         cursor.remove().unwrap();
///     }
/// }
///
/// assert_eq!(vec.as_slice(), &[1, 3, 5]);
/// ```
pub struct AllocVecCursor<'a, T, A: Allocator = SystemAllocator> {
    vec: &'a mut AllocVec<T, A>,
    next: usize,
    state: CursorState,
}

impl<'a, T, A: Allocator> AllocVecCursor<'a, T, A> {
    pub(crate) fn new(vec: &'a mut AllocVec<T, A>) -> Self {
        Self {
            vec,
            next: 0,
            state: CursorState::Fresh,
        }
    }

    /// Advances to the next element and returns it, or `None` at the end.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&T> {
        if self.next >= self.vec.len() {
            self.state = CursorState::Exhausted;
            return None;
        }

        let index = self.next;
        self.next += 1;
        self.state = CursorState::Positioned(index);
        self.vec.get_at(index).ok()
    }

    /// Removes the element returned by the last `next()` and returns it.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::OutOfRange` if `next()` has not returned an
    /// element since the cursor was created or since the previous `remove`.
    pub fn remove(&mut self) -> Result<T, AllocVecError> {
        let index = self.state.index().ok_or(AllocVecError::OutOfRange)?;
        let removed = self.vec.remove_at(index)?;

        self.next = index;
        self.state = CursorState::Removed;
        Ok(removed)
    }

    /// Replaces the element returned by the last `next()` and returns the
    /// previous one.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::OutOfRange` if the cursor is not positioned on
    /// an element.
    pub fn replace(&mut self, element: T) -> Result<T, AllocVecError> {
        let index = self.state.index().ok_or(AllocVecError::OutOfRange)?;
        self.vec.replace_at(index, element)
    }

    /// Inserts an element at the cursor position, just after the last
    /// returned element, and steps past it. Repeated calls insert in call
    /// order. No prior `next()` is required.
    ///
    /// # Errors
    ///
    /// Same as `AllocVec::add_at`; the array and cursor are unchanged on error.
    pub fn add(&mut self, element: T) -> Result<(), AllocVecError> {
        self.vec.add_at(self.next, element)?;
        self.next += 1;
        Ok(())
    }

    /// Index of the element returned by the last `next()`, if the cursor is
    /// positioned on one.
    ///
    /// Right after a `remove` this is `None`; the following `next()` returns
    /// the element that slid into the removed index and reports that index
    /// again.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.state.index()
    }

    #[must_use]
    pub fn state(&self) -> CursorState {
        self.state
    }
}
