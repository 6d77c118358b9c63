use core::alloc::Layout;
use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ptr::{self, NonNull};
use core::slice;

use crate::allocator::{Allocator, SystemAllocator};
use crate::conf::{AllocVecConf, DEFAULT_EXP_FACTOR};
use crate::error::AllocVecError;
use crate::iter::{AllocVecCursor, AllocVecIter};
use crate::zip::AllocVecZipCursor;

/// A growable array whose slot buffer is managed through caller-supplied
/// allocator bindings.
///
/// Elements are handles: the array moves them in and out of its slots and
/// drops whatever is still stored when it is dropped, but it never allocates
/// or frees the data a handle points to, except in `copy_deep` (through the
/// caller's copy function), `copy_deep_handles` and `remove_all_free`.
pub struct AllocVec<T, A: Allocator = SystemAllocator> {
    buffer: NonNull<T>,
    size: usize,
    capacity: usize,
    exp_factor: f32,
    allocator: A,
    _owns: PhantomData<T>,
}

impl<T> AllocVec<T, SystemAllocator> {
    /// Creates an empty array with capacity 8, expansion factor 2.0 and the
    /// system allocator.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::AllocFailure` if the initial buffer cannot be
    /// allocated.
    pub fn new() -> Result<Self, AllocVecError> {
        Self::with_conf(AllocVecConf::default())
    }
}

impl<T, A: Allocator> AllocVec<T, A> {
    /// Largest number of elements an array of `T` can hold.
    pub const MAX_ELEMENTS: usize = if mem::size_of::<T>() == 0 {
        usize::MAX
    } else {
        isize::MAX as usize / mem::size_of::<T>()
    };

    /// Creates an empty array from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::InvalidCapacity` if:
    /// - `capacity` is 0
    /// - `exp_factor` is NaN, not positive, or below 1 (exactly 1.0 is
    ///   replaced by the default factor 2.0)
    /// - `capacity * exp_factor` exceeds `MAX_ELEMENTS`
    ///
    /// Returns `AllocVecError::AllocFailure` if the initial buffer cannot be
    /// allocated.
    #[allow(clippy::cast_precision_loss)]
    pub fn with_conf(conf: AllocVecConf<A>) -> Result<Self, AllocVecError> {
        if conf.capacity == 0 {
            return Err(AllocVecError::InvalidCapacity {
                reason: "capacity must be non-zero",
            });
        }

        let exp_factor = checked_exp_factor(conf.exp_factor)?;

        if conf.capacity as f64 * f64::from(exp_factor) > Self::MAX_ELEMENTS as f64 {
            return Err(AllocVecError::InvalidCapacity {
                reason: "capacity times expansion factor exceeds the maximum element count",
            });
        }

        let buffer = allocate_buffer::<T, A>(&conf.allocator, conf.capacity, true)?;

        Ok(Self {
            buffer,
            size: 0,
            capacity: conf.capacity,
            exp_factor,
            allocator: conf.allocator,
            _owns: PhantomData,
        })
    }

    /// Number of stored elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of slots in the current buffer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Capacity multiplier applied on growth, after configuration defaults.
    #[must_use]
    pub fn exp_factor(&self) -> f32 {
        self.exp_factor
    }

    #[must_use]
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// The stored elements in index order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // Safe: the first `size` slots are initialized and the buffer is
        // valid (or dangling and well aligned for zero-sized `T`)
        #[allow(unsafe_code)]
        unsafe {
            slice::from_raw_parts(self.buffer.as_ptr(), self.size)
        }
    }

    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // Safe: see `as_slice`; `&mut self` guarantees exclusive access
        #[allow(unsafe_code)]
        unsafe {
            slice::from_raw_parts_mut(self.buffer.as_ptr(), self.size)
        }
    }

    /// Appends an element, growing the buffer if it is full.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::MaxCapacityReached` if the array already holds
    /// `MAX_ELEMENTS` elements, and `AllocVecError::AllocFailure` if growth
    /// fails. The array is unchanged on error.
    pub fn add(&mut self, element: T) -> Result<(), AllocVecError> {
        self.reserve_one()?;

        // Safe: `reserve_one` guarantees slot `size` exists and is vacant
        #[allow(unsafe_code)]
        unsafe {
            self.buffer.as_ptr().add(self.size).write(element);
        }
        self.size += 1;

        Ok(())
    }

    /// Inserts an element at `index`, shifting every element at or after it
    /// one slot toward the end. `index == len()` appends.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::OutOfRange` if `index > len()`, otherwise the
    /// same errors as `add`. The array is unchanged on error.
    pub fn add_at(&mut self, index: usize, element: T) -> Result<(), AllocVecError> {
        if index > self.size {
            return Err(AllocVecError::OutOfRange);
        }
        if index == self.size {
            return self.add(element);
        }

        self.reserve_one()?;

        // Safe: `index < size < capacity`, so the shifted run
        // `[index, size)` moves into `[index + 1, size + 1)` inside the buffer
        #[allow(unsafe_code)]
        unsafe {
            let slot = self.buffer.as_ptr().add(index);
            ptr::copy(slot, slot.add(1), self.size - index);
            slot.write(element);
        }
        self.size += 1;

        Ok(())
    }

    /// Removes the element at `index`, shifting every later element one slot
    /// toward the front, and returns it.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::OutOfRange` if `index >= len()`.
    pub fn remove_at(&mut self, index: usize) -> Result<T, AllocVecError> {
        if index >= self.size {
            return Err(AllocVecError::OutOfRange);
        }

        // Safe: slot `index` is initialized; after reading it the run
        // `(index, size)` closes the gap and the last slot becomes vacant
        #[allow(unsafe_code)]
        let removed = unsafe {
            let slot = self.buffer.as_ptr().add(index);
            let removed = slot.read();
            ptr::copy(slot.add(1), slot, self.size - index - 1);
            removed
        };
        self.size -= 1;

        Ok(removed)
    }

    /// Removes and returns the last element.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::ValueNotFound` if the array is empty.
    pub fn remove_last(&mut self) -> Result<T, AllocVecError> {
        if self.size == 0 {
            return Err(AllocVecError::ValueNotFound);
        }

        self.size -= 1;
        // Safe: slot `size` was the last initialized slot and is now vacant
        #[allow(unsafe_code)]
        let removed = unsafe { self.buffer.as_ptr().add(self.size).read() };

        Ok(removed)
    }

    /// Drops every stored element. Capacity is kept.
    pub fn remove_all(&mut self) {
        let len = self.size;
        self.size = 0;
        // Safe: the first `len` slots were initialized and are no longer
        // reachable now that `size` is 0
        #[allow(unsafe_code)]
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.buffer.as_ptr(), len));
        }
    }

    /// Replaces the element at `index` and returns the previous one.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::OutOfRange` if `index >= len()`.
    pub fn replace_at(&mut self, index: usize, element: T) -> Result<T, AllocVecError> {
        let slot = self
            .as_mut_slice()
            .get_mut(index)
            .ok_or(AllocVecError::OutOfRange)?;
        Ok(mem::replace(slot, element))
    }

    /// Exchanges the elements at two positions.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::OutOfRange` if either index is `>= len()`.
    pub fn swap_at(&mut self, index1: usize, index2: usize) -> Result<(), AllocVecError> {
        if index1 >= self.size || index2 >= self.size {
            return Err(AllocVecError::OutOfRange);
        }
        self.as_mut_slice().swap(index1, index2);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AllocVecError::OutOfRange` if `index >= len()`.
    pub fn get_at(&self, index: usize) -> Result<&T, AllocVecError> {
        self.as_slice().get(index).ok_or(AllocVecError::OutOfRange)
    }

    /// # Errors
    ///
    /// Returns `AllocVecError::ValueNotFound` if the array is empty.
    pub fn get_last(&self) -> Result<&T, AllocVecError> {
        self.as_slice().last().ok_or(AllocVecError::ValueNotFound)
    }

    pub fn reverse(&mut self) {
        self.as_mut_slice().reverse();
    }

    /// Sorts in place with a three-way comparator.
    ///
    /// The sort is unstable but deterministic: the same input and comparator
    /// always produce the same order. It allocates nothing.
    pub fn sort<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.as_mut_slice().sort_unstable_by(compare);
    }

    /// Applies `f` to every element in place.
    pub fn map<F>(&mut self, f: F)
    where
        F: FnMut(&mut T),
    {
        self.as_mut_slice().iter_mut().for_each(f);
    }

    /// Folds the elements into `result`.
    ///
    /// The combiner sees `(element 0, None)` for a single-element array,
    /// `(element 0, Some(element 1))` first otherwise, and then
    /// `(accumulator, Some(element i))` for each remaining element. An empty
    /// array leaves `result` untouched.
    pub fn reduce<F>(&self, result: &mut T, mut combine: F)
    where
        F: FnMut(&T, Option<&T>) -> T,
    {
        match self.as_slice() {
            [] => {}
            [only] => *result = combine(only, None),
            [first, second, rest @ ..] => {
                let mut acc = combine(first, Some(second));
                for element in rest {
                    acc = combine(&acc, Some(element));
                }
                *result = acc;
            }
        }
    }

    /// Keeps only the elements for which `predicate` returns `true`,
    /// preserving their relative order. Rejected elements are dropped.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::OutOfRange` if the array is empty, or if no
    /// element survives. In the latter case the array is left empty: "no
    /// matches" is reported as an error, not as an empty success.
    pub fn filter_mut<F>(&mut self, mut predicate: F) -> Result<(), AllocVecError>
    where
        F: FnMut(&T) -> bool,
    {
        if self.size == 0 {
            return Err(AllocVecError::OutOfRange);
        }

        let len = self.size;
        // Elements are leaked rather than double-dropped if `predicate` panics
        self.size = 0;

        let base = self.buffer.as_ptr();
        let mut kept = 0;
        for index in 0..len {
            // Safe: slots `[index, len)` are still initialized and untouched;
            // `kept <= index`, so moving into slot `kept` never overwrites a
            // pending element
            #[allow(unsafe_code)]
            unsafe {
                let slot = base.add(index);
                if predicate(&*slot) {
                    if kept != index {
                        ptr::copy_nonoverlapping(slot, base.add(kept), 1);
                    }
                    kept += 1;
                } else {
                    ptr::drop_in_place(slot);
                }
            }
        }
        self.size = kept;

        if kept == 0 {
            return Err(AllocVecError::OutOfRange);
        }
        Ok(())
    }

    /// Number of elements equal to `element`.
    pub fn contains(&self, element: &T) -> usize
    where
        T: PartialEq,
    {
        self.as_slice().iter().filter(|e| *e == element).count()
    }

    /// Number of elements the comparator reports as `Ordering::Equal` to
    /// `element`.
    pub fn contains_value<F>(&self, element: &T, mut compare: F) -> usize
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.as_slice()
            .iter()
            .filter(|e| compare(*e, element) == Ordering::Equal)
            .count()
    }

    /// Index of the first element equal to `element`.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::ValueNotFound` if there is no such element.
    pub fn index_of(&self, element: &T) -> Result<usize, AllocVecError>
    where
        T: PartialEq,
    {
        self.as_slice()
            .iter()
            .position(|e| e == element)
            .ok_or(AllocVecError::ValueNotFound)
    }

    /// Removes the first element equal to `element` and returns it.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::ValueNotFound` if there is no such element.
    pub fn remove(&mut self, element: &T) -> Result<T, AllocVecError>
    where
        T: PartialEq,
    {
        let index = self.index_of(element)?;
        self.remove_at(index)
    }

    /// Shrinks the buffer to `max(len(), 1)` slots.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::AllocFailure` if the smaller buffer cannot be
    /// allocated; the array is unchanged in that case.
    pub fn trim_capacity(&mut self) -> Result<(), AllocVecError> {
        let target = self.size.max(1);
        if target == self.capacity {
            return Ok(());
        }
        self.reallocate(target)
    }

    /// Returns an iterator over the elements.
    #[must_use]
    pub fn iter(&self) -> AllocVecIter<'_, T> {
        self.into_iter()
    }

    /// Returns a cursor that can insert, remove and replace while traversing.
    #[must_use]
    pub fn cursor(&mut self) -> AllocVecCursor<'_, T, A> {
        AllocVecCursor::new(self)
    }

    /// Returns a cursor that traverses this array and `other` in lockstep.
    #[must_use]
    pub fn zip_cursor<'a, U, B: Allocator>(
        &'a mut self,
        other: &'a mut AllocVec<U, B>,
    ) -> AllocVecZipCursor<'a, T, U, A, B> {
        AllocVecZipCursor::new(self, other)
    }

    /// Makes sure one more element fits, growing the buffer if needed.
    pub(crate) fn reserve_one(&mut self) -> Result<(), AllocVecError> {
        if self.size >= Self::MAX_ELEMENTS {
            return Err(AllocVecError::MaxCapacityReached {
                max_elements: Self::MAX_ELEMENTS,
            });
        }
        if self.size >= self.capacity {
            self.expand_capacity()?;
        }
        Ok(())
    }

    /// Grows to `max(ceil(capacity * exp_factor), capacity + 1)` slots,
    /// clamped to `MAX_ELEMENTS`.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn expand_capacity(&mut self) -> Result<(), AllocVecError> {
        if self.capacity >= Self::MAX_ELEMENTS {
            return Err(AllocVecError::MaxCapacityReached {
                max_elements: Self::MAX_ELEMENTS,
            });
        }

        let scaled = self.capacity as f64 * f64::from(self.exp_factor);
        let target = if scaled >= Self::MAX_ELEMENTS as f64 {
            Self::MAX_ELEMENTS
        } else {
            // `f64::ceil` needs std
            let whole = scaled as usize;
            let rounded = if (whole as f64) < scaled { whole + 1 } else { whole };
            rounded.max(self.capacity + 1)
        };

        self.reallocate(target)
    }

    /// Moves the elements into a fresh buffer of `new_capacity` slots.
    /// On failure the old buffer stays in place.
    fn reallocate(&mut self, new_capacity: usize) -> Result<(), AllocVecError> {
        debug_assert!(new_capacity >= self.size);

        if mem::size_of::<T>() == 0 {
            self.capacity = new_capacity;
            return Ok(());
        }

        let new_buffer = allocate_buffer::<T, A>(&self.allocator, new_capacity, false)?;

        // Safe: both buffers hold at least `size` slots and are distinct
        // allocations; the old one is released exactly once
        #[allow(unsafe_code)]
        unsafe {
            ptr::copy_nonoverlapping(self.buffer.as_ptr(), new_buffer.as_ptr(), self.size);
            release_buffer(&self.allocator, self.buffer, self.capacity);
        }
        self.buffer = new_buffer;
        self.capacity = new_capacity;

        Ok(())
    }
}

impl<T: Clone, A: Allocator + Clone> AllocVec<T, A> {
    /// Builds a new array holding copies of the handles for which
    /// `predicate` returns `true`, in order. The source is not modified.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::OutOfRange` if the source is empty or if no
    /// element matches, and `AllocVecError::AllocFailure` if the new buffer
    /// cannot be allocated.
    pub fn filter<F>(&self, mut predicate: F) -> Result<Self, AllocVecError>
    where
        F: FnMut(&T) -> bool,
    {
        if self.size == 0 {
            return Err(AllocVecError::OutOfRange);
        }

        let mut filtered = self.empty_like(self.capacity)?;
        for element in self.as_slice() {
            if predicate(element) {
                filtered.add(element.clone())?;
            }
        }

        if filtered.is_empty() {
            return Err(AllocVecError::OutOfRange);
        }
        Ok(filtered)
    }

    /// Copies the handles in `[begin, end]` (both inclusive) into a new array.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::InvalidRange` if `begin > end` or
    /// `end >= len()`, and `AllocVecError::AllocFailure` if the new buffer
    /// cannot be allocated.
    pub fn subarray(&self, begin: usize, end: usize) -> Result<Self, AllocVecError> {
        if begin > end || end >= self.size {
            return Err(AllocVecError::InvalidRange {
                begin,
                end,
                size: self.size,
            });
        }

        let range = self.as_slice().get(begin..=end).ok_or(AllocVecError::InvalidRange {
            begin,
            end,
            size: self.size,
        })?;

        let mut sub = self.empty_like(range.len())?;
        for element in range {
            sub.add(element.clone())?;
        }
        Ok(sub)
    }

    /// Duplicates the handle buffer. Both arrays refer to the same element
    /// data afterwards.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::AllocFailure` if the new buffer cannot be
    /// allocated.
    pub fn copy_shallow(&self) -> Result<Self, AllocVecError> {
        let mut copy = self.empty_like(self.capacity)?;
        for element in self {
            copy.add(element.clone())?;
        }
        Ok(copy)
    }
}

impl<T, A: Allocator + Clone> AllocVec<T, A> {
    /// Builds a new array whose elements are produced by `copy`, which is
    /// expected to duplicate the data behind each handle. The new array owns
    /// the produced handles.
    ///
    /// Elements copied before a failure are dropped, which releases their
    /// data only if `T` owns it. For `NonNull` handles obtained from
    /// `alloc_handle`, use `copy_deep_handles`.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::AllocFailure` if the new buffer cannot be
    /// allocated or if `copy` returns `None` for any element.
    pub fn copy_deep<F>(&self, mut copy: F) -> Result<Self, AllocVecError>
    where
        F: FnMut(&T) -> Option<T>,
    {
        let mut deep = self.empty_like(self.capacity)?;
        for element in self {
            let duplicate = copy(element).ok_or(AllocVecError::AllocFailure {
                bytes: mem::size_of::<T>(),
            })?;
            deep.add(duplicate)?;
        }
        Ok(deep)
    }

    /// An empty array sharing this one's allocator and expansion factor.
    fn empty_like(&self, capacity: usize) -> Result<Self, AllocVecError> {
        let capacity = capacity.max(1);
        let buffer = allocate_buffer::<T, A>(&self.allocator, capacity, false)?;
        Ok(Self {
            buffer,
            size: 0,
            capacity,
            exp_factor: self.exp_factor,
            allocator: self.allocator.clone(),
            _owns: PhantomData,
        })
    }
}

impl<E, A: Allocator> AllocVec<NonNull<E>, A> {
    /// Moves `value` into a block obtained from this array's allocator and
    /// returns the handle, suitable for a later `remove_all_free`.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::AllocFailure` if the allocator refuses.
    pub fn alloc_handle(&self, value: E) -> Result<NonNull<E>, AllocVecError> {
        let layout = Layout::new::<E>();
        if layout.size() == 0 {
            mem::forget(value);
            return Ok(NonNull::dangling());
        }

        let handle = self
            .allocator
            .allocate(layout)
            .ok_or(AllocVecError::AllocFailure {
                bytes: layout.size(),
            })?
            .cast::<E>();
        // Safe: fresh block sized and aligned for `E`
        #[allow(unsafe_code)]
        unsafe {
            handle.as_ptr().write(value);
        }
        Ok(handle)
    }

    /// Removes every handle, dropping each pointee and returning its block to
    /// this array's allocator.
    ///
    /// # Safety
    ///
    /// Every stored handle must point to a live `E` allocated with
    /// `Layout::new::<E>()` by this array's allocator (for instance through
    /// `alloc_handle`), must be stored only once, and must not be used after
    /// this call.
    pub unsafe fn remove_all_free(&mut self) {
        let len = self.size;
        self.size = 0;

        for index in 0..len {
            #[allow(unsafe_code)]
            unsafe {
                let handle = self.buffer.as_ptr().add(index).read();
                free_handle(&self.allocator, handle);
            }
        }
    }

    /// Frees every element like `remove_all_free`, then drops the array.
    ///
    /// # Safety
    ///
    /// Same contract as `remove_all_free`.
    pub unsafe fn destroy_free(mut self) {
        #[allow(unsafe_code)]
        unsafe {
            self.remove_all_free();
        }
    }
}

impl<E, A: Allocator + Clone> AllocVec<NonNull<E>, A> {
    /// Builds a new array of handles whose pointees are produced by `copy`
    /// and stored in blocks from this array's allocator. Each new handle is
    /// distinct from its source, so the copy can be released with
    /// `remove_all_free` independently of this array.
    ///
    /// If any element fails, every pointee copied so far is dropped and its
    /// block returned to the allocator before the error is reported.
    ///
    /// # Errors
    ///
    /// Returns `AllocVecError::AllocFailure` if the new buffer or a new
    /// block cannot be allocated, or if `copy` returns `None`.
    ///
    /// # Safety
    ///
    /// Every stored handle must point to a live `E`.
    pub unsafe fn copy_deep_handles<F>(&self, mut copy: F) -> Result<Self, AllocVecError>
    where
        F: FnMut(&E) -> Option<E>,
    {
        let mut deep = self.empty_like(self.capacity)?;
        for handle in self {
            // Safe: the caller guarantees the handle points to a live `E`
            #[allow(unsafe_code)]
            let source = unsafe { handle.as_ref() };

            let copied = copy(source)
                .ok_or(AllocVecError::AllocFailure {
                    bytes: mem::size_of::<E>(),
                })
                .and_then(|value| deep.alloc_handle(value));
            let pushed = match copied {
                // `deep` was sized to hold every source element, so `add`
                // never needs to grow here
                Ok(duplicate) => deep.add(duplicate).map_err(|err| {
                    // Safe: `duplicate` came from `alloc_handle` on `deep`
                    #[allow(unsafe_code)]
                    unsafe {
                        free_handle(&deep.allocator, duplicate);
                    }
                    err
                }),
                Err(err) => Err(err),
            };

            if let Err(err) = pushed {
                // Safe: every handle in `deep` came from its `alloc_handle`
                #[allow(unsafe_code)]
                unsafe {
                    deep.remove_all_free();
                }
                return Err(err);
            }
        }
        Ok(deep)
    }
}

impl<T, A: Allocator> Drop for AllocVec<T, A> {
    fn drop(&mut self) {
        self.remove_all();
        // Safe: the buffer came from this allocator with this capacity
        #[allow(unsafe_code)]
        unsafe {
            release_buffer(&self.allocator, self.buffer, self.capacity);
        }
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for AllocVec<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllocVec")
            .field("size", &self.size)
            .field("capacity", &self.capacity)
            .field("exp_factor", &self.exp_factor)
            .field("elements", &self.as_slice())
            .finish()
    }
}

#[allow(clippy::float_cmp)]
fn checked_exp_factor(exp_factor: f32) -> Result<f32, AllocVecError> {
    if exp_factor.is_nan() || exp_factor <= 0.0 {
        return Err(AllocVecError::InvalidCapacity {
            reason: "expansion factor must be positive",
        });
    }
    if exp_factor == 1.0 {
        return Ok(DEFAULT_EXP_FACTOR);
    }
    if exp_factor < 1.0 {
        return Err(AllocVecError::InvalidCapacity {
            reason: "expansion factor must be greater than 1",
        });
    }
    Ok(exp_factor)
}

fn allocate_buffer<T, A: Allocator>(
    allocator: &A,
    capacity: usize,
    zeroed: bool,
) -> Result<NonNull<T>, AllocVecError> {
    if mem::size_of::<T>() == 0 {
        return Ok(NonNull::dangling());
    }

    let layout = Layout::array::<T>(capacity).map_err(|_| AllocVecError::AllocFailure {
        bytes: capacity.saturating_mul(mem::size_of::<T>()),
    })?;
    let block = if zeroed {
        allocator.allocate_zeroed(layout)
    } else {
        allocator.allocate(layout)
    };

    block
        .map(NonNull::cast::<T>)
        .ok_or(AllocVecError::AllocFailure {
            bytes: layout.size(),
        })
}

/// Drops the pointee and returns its block to `allocator`.
///
/// # Safety
///
/// `handle` must point to a live `E` allocated with `Layout::new::<E>()` by
/// `allocator`, and must not be used afterwards.
unsafe fn free_handle<E, A: Allocator>(allocator: &A, handle: NonNull<E>) {
    let layout = Layout::new::<E>();
    #[allow(unsafe_code)]
    unsafe {
        ptr::drop_in_place(handle.as_ptr());
        if layout.size() != 0 {
            allocator.deallocate(handle.cast::<u8>(), layout);
        }
    }
}

/// # Safety
///
/// `buffer` must come from `allocate_buffer` with the same allocator and
/// `capacity`, and must not be used afterwards.
unsafe fn release_buffer<T, A: Allocator>(allocator: &A, buffer: NonNull<T>, capacity: usize) {
    if mem::size_of::<T>() == 0 {
        return;
    }
    if let Ok(layout) = Layout::array::<T>(capacity) {
        #[allow(unsafe_code)]
        unsafe {
            allocator.deallocate(buffer.cast::<u8>(), layout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_uses_ceiled_factor() {
        let conf = AllocVecConf {
            capacity: 3,
            exp_factor: 1.5,
            allocator: SystemAllocator,
        };
        let mut vec: AllocVec<u32> = AllocVec::with_conf(conf).unwrap();

        for i in 0..3 {
            vec.add(i).unwrap();
        }
        assert_eq!(vec.capacity(), 3);

        vec.add(3).unwrap();
        assert_eq!(vec.capacity(), 5); // ceil(3 * 1.5)
    }

    #[test]
    fn test_growth_adds_at_least_one_slot() {
        let conf = AllocVecConf {
            capacity: 1,
            exp_factor: 1.1,
            allocator: SystemAllocator,
        };
        let mut vec: AllocVec<u32> = AllocVec::with_conf(conf).unwrap();

        vec.add(1).unwrap();
        vec.add(2).unwrap();
        assert_eq!(vec.capacity(), 2);
        vec.add(3).unwrap();
        assert_eq!(vec.capacity(), 3); // ceil(2 * 1.1)
    }

    #[test]
    fn test_add_rejected_at_max_elements() {
        let mut vec: AllocVec<u64> = AllocVec::new().unwrap();

        // Only the size counter is forged; `add` must refuse before touching
        // the buffer
        vec.size = AllocVec::<u64>::MAX_ELEMENTS;
        assert_eq!(
            vec.add(1),
            Err(AllocVecError::MaxCapacityReached {
                max_elements: AllocVec::<u64>::MAX_ELEMENTS
            })
        );
        assert_eq!(vec.len(), AllocVec::<u64>::MAX_ELEMENTS);
        vec.size = 0;
    }

    #[test]
    fn test_zero_sized_elements_skip_allocation() {
        let mut vec: AllocVec<()> = AllocVec::new().unwrap();
        for _ in 0..20 {
            vec.add(()).unwrap();
        }
        assert_eq!(vec.len(), 20);
        assert!(vec.capacity() >= 20);
        assert_eq!(vec.remove_at(5), Ok(()));
        assert_eq!(vec.len(), 19);
    }

    #[test]
    fn test_exp_factor_thresholds() {
        assert_eq!(checked_exp_factor(1.0), Ok(DEFAULT_EXP_FACTOR));
        assert_eq!(checked_exp_factor(3.5), Ok(3.5));
        assert!(checked_exp_factor(0.0).is_err());
        assert!(checked_exp_factor(-2.0).is_err());
        assert!(checked_exp_factor(0.5).is_err());
        assert!(checked_exp_factor(f32::NAN).is_err());
    }
}
