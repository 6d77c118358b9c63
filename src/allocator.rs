use core::alloc::Layout;
use core::ptr::NonNull;

/// Memory bindings used by an `AllocVec` for its slot buffer.
///
/// Each array stores its own allocator value and routes every buffer
/// allocation and deallocation through it. Implementations report failure by
/// returning `None`; the array turns that into `AllocVecError::AllocFailure`
/// and leaves its state untouched.
///
/// Layouts passed by `AllocVec` always have a non-zero size.
pub trait Allocator {
    /// Allocates a block for `layout`, contents uninitialized.
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Allocates a block for `layout` with every byte set to zero.
    fn allocate_zeroed(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Releases a block.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate` or `allocate_zeroed` on this allocator
    /// (or one sharing its memory source) with the same `layout`, and must not
    /// be used afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// Allocator bindings can be shared between arrays by reference.
impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).allocate(layout)
    }

    fn allocate_zeroed(&self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).allocate_zeroed(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        #[allow(unsafe_code)]
        unsafe {
            (**self).deallocate(ptr, layout);
        }
    }
}

/// The process allocator, reached through `alloc::alloc`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SystemAllocator;

impl Allocator for SystemAllocator {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            return None;
        }
        // Safe: the layout has a non-zero size
        #[allow(unsafe_code)]
        let ptr = unsafe { alloc::alloc::alloc(layout) };
        NonNull::new(ptr)
    }

    fn allocate_zeroed(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            return None;
        }
        // Safe: the layout has a non-zero size
        #[allow(unsafe_code)]
        let ptr = unsafe { alloc::alloc::alloc_zeroed(layout) };
        NonNull::new(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // Safe: forwarded from the caller's contract
        #[allow(unsafe_code)]
        unsafe {
            alloc::alloc::dealloc(ptr.as_ptr(), layout);
        }
    }
}

/// Allocator built from three plain functions.
///
/// ```
/// use allocvec::{AllocVec, AllocVecConf, FnAllocator};
/// use core::alloc::Layout;
/// use core::ptr::NonNull;
///
/// fn refuse(_: Layout) -> Option<NonNull<u8>> {
///     None
/// }
///
/// let mut conf = AllocVecConf::with_allocator(FnAllocator::system());
/// conf.allocator.allocate_zeroed = refuse;
/// assert!(AllocVec::<u32, _>::with_conf(conf).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnAllocator {
    /// Uninitialized allocation
    pub allocate: fn(Layout) -> Option<NonNull<u8>>,
    /// Zeroed allocation
    pub allocate_zeroed: fn(Layout) -> Option<NonNull<u8>>,
    /// Deallocation of a block obtained from one of the two functions above
    pub deallocate: unsafe fn(NonNull<u8>, Layout),
}

impl FnAllocator {
    /// Function bindings that forward to `SystemAllocator`.
    #[must_use]
    pub fn system() -> Self {
        Self {
            allocate: system_allocate,
            allocate_zeroed: system_allocate_zeroed,
            deallocate: system_deallocate,
        }
    }
}

impl Default for FnAllocator {
    fn default() -> Self {
        Self::system()
    }
}

impl Allocator for FnAllocator {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        (self.allocate)(layout)
    }

    fn allocate_zeroed(&self, layout: Layout) -> Option<NonNull<u8>> {
        (self.allocate_zeroed)(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        #[allow(unsafe_code)]
        unsafe {
            (self.deallocate)(ptr, layout);
        }
    }
}

fn system_allocate(layout: Layout) -> Option<NonNull<u8>> {
    SystemAllocator.allocate(layout)
}

fn system_allocate_zeroed(layout: Layout) -> Option<NonNull<u8>> {
    SystemAllocator.allocate_zeroed(layout)
}

unsafe fn system_deallocate(ptr: NonNull<u8>, layout: Layout) {
    #[allow(unsafe_code)]
    unsafe {
        SystemAllocator.deallocate(ptr, layout);
    }
}
