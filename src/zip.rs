use crate::allocator::{Allocator, SystemAllocator};
use crate::core::AllocVec;
use crate::error::AllocVecError;
use crate::iter::CursorState;

/// A cursor over two arrays that advances through both with one shared index.
///
/// Traversal ends as soon as the index reaches the length of either array, so
/// the shorter array bounds it. Mutations apply to both arrays at the shared
/// index, each against its own buffer.
///
/// ```
/// # use allocvec::AllocVec;
/// let mut numbers: AllocVec<u32> = AllocVec::new().unwrap();
/// let mut names: AllocVec<&str> = AllocVec::new().unwrap();
/// numbers.add(1).unwrap();
/// numbers.add(2).unwrap();
/// numbers.add(3).unwrap();
/// names.add("one").unwrap();
/// names.add("two").unwrap();
///
/// let mut zip = numbers.zip_cursor(&mut names);
/// assert_eq!(zip.next(), Some((&1, &"one")));
/// assert_eq!(zip.next(), Some((&2, &"two")));
/// assert_eq!(zip.next(), None);
/// ```
pub struct AllocVecZipCursor<'a, T, U, A = SystemAllocator, B = SystemAllocator>
where
    A: Allocator,
    B: Allocator,
{
    first: &'a mut AllocVec<T, A>,
    second: &'a mut AllocVec<U, B>,
    next: usize,
    state: CursorState,
}

impl<'a, T, U, A: Allocator, B: Allocator> AllocVecZipCursor<'a, T, U, A, B> {
    pub(crate) fn new(first: &'a mut AllocVec<T, A>, second: &'a mut AllocVec<U, B>) -> Self {
        Self {
            first,
            second,
            next: 0,
            state: CursorState::Fresh,
        }
    }

    /// Advances both arrays and returns the pair at the shared index, or
    /// `None` once either array is exhausted.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<(&T, &U)> {
        let index = self.next;
        if index >= self.first.len() || index >= self.second.len() {
            self.state = CursorState::Exhausted;
            return None;
        }

        self.next += 1;
        self.state = CursorState::Positioned(index);
        Some((
            self.first.get_at(index).ok()?,
            self.second.get_at(index).ok()?,
        ))
    }

    /// Removes the pair returned by the last `next()` from both arrays and
    /// returns it. The following `next()` returns the pair that slid down.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::OutOfRange` if the cursor is not positioned on
    /// a pair, or if the shared index is not below both array lengths.
    pub fn remove(&mut self) -> Result<(T, U), AllocVecError> {
        let index = self.positioned_index()?;

        let removed_first = self.first.remove_at(index)?;
        let removed_second = self.second.remove_at(index)?;

        self.next = index;
        self.state = CursorState::Removed;
        Ok((removed_first, removed_second))
    }

    /// Inserts a pair at the cursor position in both arrays and steps past it.
    ///
    /// Room for the new pair is reserved in both arrays before either insert
    /// happens, so a failure leaves both lengths and contents unchanged.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::MaxCapacityReached` or
    /// `AllocVecError::AllocFailure` if either array cannot make room.
    pub fn add(&mut self, first: T, second: U) -> Result<(), AllocVecError> {
        let index = self.next;
        if index > self.first.len() || index > self.second.len() {
            return Err(AllocVecError::OutOfRange);
        }

        self.first.reserve_one()?;
        self.second.reserve_one()?;

        self.first.add_at(index, first)?;
        self.second.add_at(index, second)?;

        self.next += 1;
        Ok(())
    }

    /// Replaces the pair returned by the last `next()` and returns the
    /// previous pair.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::OutOfRange` if the cursor is not positioned on
    /// a pair.
    pub fn replace(&mut self, first: T, second: U) -> Result<(T, U), AllocVecError> {
        let index = self.positioned_index()?;

        let replaced_first = self.first.replace_at(index, first)?;
        let replaced_second = self.second.replace_at(index, second)?;
        Ok((replaced_first, replaced_second))
    }

    /// Shared index of the pair returned by the last `next()`, if the cursor
    /// is positioned on one.
    ///
    /// Right after a `remove` this is `None`; the following `next()` returns
    /// the pair that slid into the removed index and reports that index
    /// again.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.state.index()
    }

    #[must_use]
    pub fn state(&self) -> CursorState {
        self.state
    }

    fn positioned_index(&self) -> Result<usize, AllocVecError> {
        let index = self.state.index().ok_or(AllocVecError::OutOfRange)?;
        if index >= self.first.len() || index >= self.second.len() {
            return Err(AllocVecError::OutOfRange);
        }
        Ok(index)
    }
}
