#![cfg_attr(not(test), no_std)]

//! `AllocVec`: a growable array with pluggable allocator bindings and cursors
//! that mutate while they traverse.
//!
//! `AllocVec` stores element handles in a contiguous slot buffer. The buffer is
//! obtained from, grown through and returned to an allocator value that every
//! array carries with it; there is no hidden global allocation. All operations
//! are bounds-checked and report failures as `AllocVecError` values.
//!
//! This crate is `no_std` compatible; it needs only `core` and `alloc`.
//!
//! # Capacity and Growth
//!
//! An array starts with the configured capacity (default 8). When an insert
//! finds the buffer full, the capacity becomes
//! `max(ceil(capacity * exp_factor), capacity + 1)` (default factor 2.0). A
//! failed growth leaves the array exactly as it was.
//!
//! ```
//! # use allocvec::{AllocVec, AllocVecConf, SystemAllocator};
//! let conf = AllocVecConf {
//!     capacity: 1,
//!     exp_factor: 2.0,
//!     allocator: SystemAllocator,
//! };
//! let mut vec: AllocVec<u32> = AllocVec::with_conf(conf).unwrap();
//!
//! vec.add(1).unwrap();
//! vec.add(2).unwrap();
//! vec.add(3).unwrap();
//!
//! assert_eq!(vec.len(), 3);
//! assert!(vec.capacity() >= 3);
//! assert_eq!(vec.as_slice(), &[1, 2, 3]);
//!
//! vec.trim_capacity().unwrap();
//! assert_eq!(vec.capacity(), 3);
//! ```
//!
//! ## Expansion Factor Rules
//!
//! - `exp_factor <= 0` or NaN is rejected with `InvalidCapacity`
//! - `exp_factor == 1.0` exactly is replaced by the default `2.0`
//! - any other `exp_factor < 1` is rejected with `InvalidCapacity`
//! - `capacity * exp_factor` must not exceed `AllocVec::MAX_ELEMENTS`
//!
//! # Allocator Bindings
//!
//! The `Allocator` trait has three operations: allocate, allocate zeroed and
//! deallocate. `SystemAllocator` forwards to `alloc::alloc`, `FnAllocator`
//! holds three plain functions, and `&A` shares one allocator between arrays.
//!
//! # Positional Operations
//!
//! ```
//! # use allocvec::{AllocVec, AllocVecError};
//! let mut vec: AllocVec<u32> = AllocVec::new().unwrap();
//! vec.add(10).unwrap();
//! vec.add(30).unwrap();
//!
//! vec.add_at(1, 20).unwrap();            // [10, 20, 30]
//! assert_eq!(vec.get_at(1), Ok(&20));
//!
//! assert_eq!(vec.remove_at(0), Ok(10));  // [20, 30]
//! assert_eq!(vec.replace_at(1, 31), Ok(30));
//! vec.swap_at(0, 1).unwrap();            // [31, 20]
//!
//! assert_eq!(vec.remove(&42), Err(AllocVecError::ValueNotFound));
//! assert_eq!(vec.add_at(5, 0), Err(AllocVecError::OutOfRange));
//! ```
//!
//! # Filtering Convention
//!
//! `filter` and `filter_mut` report `OutOfRange` when no element survives,
//! instead of producing an empty array. Callers must treat "no matches" as an
//! error condition here:
//!
//! ```
//! # use allocvec::{AllocVec, AllocVecError};
//! let mut vec: AllocVec<u32> = AllocVec::new().unwrap();
//! for i in 1..=5 {
//!     vec.add(i).unwrap();
//! }
//!
//! let even = vec.filter(|e| e % 2 == 0).unwrap();
//! assert_eq!(even.as_slice(), &[2, 4]);
//! assert_eq!(vec.len(), 5);
//!
//! assert_eq!(vec.filter(|e| *e > 100).unwrap_err(), AllocVecError::OutOfRange);
//! ```
//!
//! # Cursors
//!
//! `AllocVecCursor` walks one array and can insert, remove and replace at its
//! position. `AllocVecZipCursor` walks two arrays in lockstep; the shorter one
//! bounds the traversal, and mutations keep the shared index consistent in
//! both arrays. Cursors borrow their arrays mutably, so the arrays cannot be
//! touched elsewhere while a traversal is in progress.
//!
//! ```
//! # use allocvec::AllocVec;
//! let mut left: AllocVec<u32> = AllocVec::new().unwrap();
//! let mut right: AllocVec<u32> = AllocVec::new().unwrap();
//! for i in 0..3 {
//!     left.add(i).unwrap();
//!     right.add(i + 10).unwrap();
//! }
//!
//! let mut zip = left.zip_cursor(&mut right);
//! zip.next().unwrap();
//! zip.remove().unwrap();
//! assert_eq!(zip.next(), Some((&1, &11)));
//! drop(zip);
//!
//! assert_eq!(left.as_slice(), &[1, 2]);
//! assert_eq!(right.as_slice(), &[11, 12]);
//! ```
//!
//! # Element Ownership
//!
//! The array drops the handle values it still holds when it is dropped, which
//! for references, indices or other `Copy` handles releases nothing. Only two
//! operations take responsibility for the data behind handles: `copy_deep`,
//! which duplicates it through a caller function, and `remove_all_free`, which
//! frees `NonNull` handles through the array's own allocator.

extern crate alloc;

mod allocator;
mod conf;
mod core;
mod error;
mod iter;
mod zip;

// Re-export public types and traits
pub use allocator::{Allocator, FnAllocator, SystemAllocator};
pub use conf::AllocVecConf;
pub use crate::core::AllocVec;
pub use error::AllocVecError;
pub use iter::{AllocVecCursor, AllocVecIter, CursorState};
pub use zip::AllocVecZipCursor;
