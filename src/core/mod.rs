//! The core module
pub mod grid;

pub use crate::core::grid::{Region, Subdivision};

use thiserror::Error;

/// Integrand trait
pub trait Integrand<T: Copy>: Send + Sync {
    /// Call the integrand with a point of the integration domain.
    fn call(&self, x: &[T]) -> T;
    /// The dimension of the integrand.
    fn dim(&self) -> usize;
}

/// Errors raised when the inputs of an integration violate its contract.
///
/// All of these are detected before the first integrand evaluation; an integration never
/// returns a partial result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuadratureError {
    /// The integration region has no dimensions.
    #[error("the integration region must have at least one dimension")]
    EmptyRegion,

    /// The border vectors of the region do not have the same length.
    #[error("the region has {left} left borders but {right} right borders")]
    MismatchedBorders {
        /// Number of left borders.
        left: usize,
        /// Number of right borders.
        right: usize,
    },

    /// The region, the subdivision or the integrand disagree on the dimension.
    #[error("dimension mismatch: expected {expected} dimensions, found {found}")]
    DimensionMismatch {
        /// The dimension of the region.
        expected: usize,
        /// The offending dimension count.
        found: usize,
    },

    /// A dimension whose left border is not strictly below its right border.
    #[error("invalid interval in dimension {dim}: the left border must be strictly below the right border")]
    InvalidInterval {
        /// The zero-based index of the offending dimension.
        dim: usize,
    },

    /// A dimension with a subdivision count of zero.
    #[error("the subdivision count in dimension {dim} must be at least one")]
    ZeroCount {
        /// The zero-based index of the offending dimension.
        dim: usize,
    },

    /// The number of cells or of sample points per cell overflows `usize`.
    #[error("the grid is too large to enumerate")]
    GridTooLarge,

    /// A parallel integration was requested with zero cores.
    #[error("at least one core is required")]
    NoCores,
}

/// Compute the number of cells each core processes when `total_cells` cells are distributed
/// over `n_cores` cores in contiguous chunks.
///
/// Every core but possibly the trailing ones gets the same share, the ceiling of
/// `total_cells / n_cores`.
pub(crate) fn cells_per_core(n_cores: usize, total_cells: usize) -> usize {
    debug_assert!(n_cores >= 1);
    debug_assert!(total_cells >= 1);

    (total_cells - 1) / n_cores + 1
}

/// Compute the range of cell indices processed on a given core, given the total number of
/// cores `n_cores`, the index `core` (zero-based) of the current thread as well as the total
/// number of cells `total_cells` to process combined on all cores.
///
/// The ranges of the cores tile `[0, total_cells)` without gaps or overlap; trailing cores may
/// receive a shorter or an empty range.
pub(crate) fn cell_range_for_core(
    core: usize,
    n_cores: usize,
    total_cells: usize,
) -> std::ops::Range<usize> {
    // make sure passed data is valid
    debug_assert!(core < n_cores);

    let chunk = cells_per_core(n_cores, total_cells);
    let first = (chunk * core).min(total_cells);
    let last = (first + chunk).min(total_cells);

    first..last
}
