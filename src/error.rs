use thiserror::Error;

/// Error types for `AllocVec` and its cursors
///
/// End of traversal is not an error: cursors report it as `None` from `next()`.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum AllocVecError {
    /// Rejected construction configuration
    #[error("Invalid capacity configuration: {reason}")]
    InvalidCapacity {
        /// Description of why the configuration was rejected
        reason: &'static str,
    },
    /// The allocator could not satisfy a request
    #[error("Allocation failure: could not obtain {bytes} bytes")]
    AllocFailure {
        /// Size of the failed request in bytes
        bytes: usize,
    },
    /// The array already holds the maximum number of elements
    #[error("Maximum capacity reached: at most {max_elements} elements allowed")]
    MaxCapacityReached {
        /// Maximum number of elements for this element type
        max_elements: usize,
    },
    /// An index, or a cursor state, is invalid for the requested operation
    #[error("Index or cursor position out of range")]
    OutOfRange,
    /// A search found no matching element
    #[error("Value not found")]
    ValueNotFound,
    /// A begin/end pair does not describe a range inside the array
    #[error("Invalid range: [{begin}, {end}] for array of size {size}")]
    InvalidRange {
        /// First index of the requested range
        begin: usize,
        /// Last index of the requested range, inclusive
        end: usize,
        /// Size of the array at the time of the request
        size: usize,
    },
}
