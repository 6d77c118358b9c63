use crate::allocator::SystemAllocator;

pub(crate) const DEFAULT_CAPACITY: usize = 8;
pub(crate) const DEFAULT_EXP_FACTOR: f32 = 2.0;

/// Construction parameters for an `AllocVec`.
///
/// The configuration is validated by `AllocVec::with_conf`:
/// - `capacity` must be non-zero
/// - `exp_factor` must be strictly greater than 1; exactly `1.0` is replaced
///   by the default factor `2.0`, anything else at or below 1 is rejected
/// - `capacity * exp_factor` must not exceed the maximum element count
#[derive(Debug, Clone, Copy)]
pub struct AllocVecConf<A = SystemAllocator> {
    /// Initial number of slots
    pub capacity: usize,
    /// Capacity multiplier applied when the array grows
    pub exp_factor: f32,
    /// Allocator bindings the array stores and uses for its buffer
    pub allocator: A,
}

impl<A> AllocVecConf<A> {
    /// Default capacity and expansion factor with the given allocator.
    pub fn with_allocator(allocator: A) -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            exp_factor: DEFAULT_EXP_FACTOR,
            allocator,
        }
    }
}

impl<A: Default> Default for AllocVecConf<A> {
    fn default() -> Self {
        Self::with_allocator(A::default())
    }
}
