//! The integration grid and its enumeration.
//!
//! The grid splits the region into a rectangular arrangement of cells, one per combination of
//! per-dimension subintervals. Within a cell the tensor-product Simpson rule evaluates the
//! integrand on $6^d$ sample points, each dimension independently choosing one of the cell's
//! left border, center or right border. The center occupies four of the six slots and each
//! border exactly one, which realizes the 1-4-1 Simpson weights without explicit weight arrays.

use crate::core::QuadratureError;
use num_traits::{Float, FromPrimitive};
use serde::{Deserialize, Serialize};

/// The number of sample slots per cell and dimension.
pub(crate) const SAMPLE_RADIX: usize = 6;

/// An axis-aligned integration region.
///
/// The region is an ordered sequence of intervals, one per dimension, with the left border
/// strictly below the right border. It is validated on construction and immutable afterwards.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Region<T> {
    left: Vec<T>,
    right: Vec<T>,
}

impl<T: Float> Region<T> {
    /// Constructor.
    ///
    /// # Errors
    ///
    /// Returns an error if the border vectors differ in length, if they are empty, or if any
    /// dimension has a non-finite border or a left border that is not strictly below its right
    /// border.
    pub fn new(left: Vec<T>, right: Vec<T>) -> Result<Self, QuadratureError> {
        if left.len() != right.len() {
            return Err(QuadratureError::MismatchedBorders {
                left: left.len(),
                right: right.len(),
            });
        }

        if left.is_empty() {
            return Err(QuadratureError::EmptyRegion);
        }

        for (dim, (&a, &b)) in left.iter().zip(right.iter()).enumerate() {
            if !a.is_finite() || !b.is_finite() || a >= b {
                return Err(QuadratureError::InvalidInterval { dim });
            }
        }

        Ok(Self { left, right })
    }

    /// The dimension of the region.
    pub fn dim(&self) -> usize {
        self.left.len()
    }

    /// The left borders, one per dimension.
    pub fn left(&self) -> &[T] {
        &self.left
    }

    /// The right borders, one per dimension.
    pub fn right(&self) -> &[T] {
        &self.right
    }

    /// The volume of the region.
    pub fn volume(&self) -> T {
        self.left
            .iter()
            .zip(self.right.iter())
            .fold(T::one(), |acc, (&a, &b)| acc * (b - a))
    }
}

/// The number of equal subintervals each dimension is split into.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Subdivision {
    counts: Vec<usize>,
}

impl Subdivision {
    /// Constructor.
    ///
    /// # Errors
    ///
    /// Returns an error if `counts` is empty or contains a zero.
    pub fn new(counts: Vec<usize>) -> Result<Self, QuadratureError> {
        if counts.is_empty() {
            return Err(QuadratureError::EmptyRegion);
        }

        if let Some(dim) = counts.iter().position(|&count| count == 0) {
            return Err(QuadratureError::ZeroCount { dim });
        }

        Ok(Self { counts })
    }

    /// Construct a subdivision that splits each of the `dim` dimensions into `count`
    /// subintervals.
    ///
    /// # Errors
    ///
    /// Returns an error if `dim` or `count` is zero.
    pub fn uniform(dim: usize, count: usize) -> Result<Self, QuadratureError> {
        Self::new(vec![count; dim])
    }

    /// The dimension of the subdivision.
    pub fn dim(&self) -> usize {
        self.counts.len()
    }

    /// The subdivision counts, one per dimension.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }
}

/// The three Simpson abscissas of a cell in one dimension.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Segment<T> {
    pub left: T,
    pub center: T,
    pub right: T,
}

/// Per-worker scratch buffers, reused across cells so that no allocation happens inside the
/// evaluation loops. Memory use is O(d).
pub(crate) struct CellScratch<T> {
    digits: Vec<usize>,
    segments: Vec<Segment<T>>,
    x: Vec<T>,
}

/// Decode `index` into mixed-radix digits, least-significant dimension first.
///
/// `digits[j] = index mod radices[j]` after dividing `index` by all previous radices. Used both
/// for cell indices (radices are the subdivision counts) and for sample indices (radix 6 in
/// every dimension).
pub(crate) fn decode_mixed_radix(mut index: usize, radices: &[usize], digits: &mut [usize]) {
    debug_assert_eq!(radices.len(), digits.len());

    for (digit, &radix) in digits.iter_mut().zip(radices.iter()) {
        *digit = index % radix;
        index /= radix;
    }
}

/// The fully validated integration grid shared by all evaluators.
#[derive(Debug)]
pub(crate) struct Grid<T> {
    left: Vec<T>,
    counts: Vec<usize>,
    sample_radices: Vec<usize>,
    h: Vec<T>,
    cells: usize,
    samples_per_cell: usize,
    weight: T,
}

impl<T: Float + FromPrimitive> Grid<T> {
    /// Combine a region and a subdivision into a grid.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions disagree or if the cell count or the per-cell sample
    /// count overflows `usize`.
    pub fn new(region: &Region<T>, subdivision: &Subdivision) -> Result<Self, QuadratureError> {
        if region.dim() != subdivision.dim() {
            return Err(QuadratureError::DimensionMismatch {
                expected: region.dim(),
                found: subdivision.dim(),
            });
        }

        let dim = region.dim();
        let six = T::from_usize(SAMPLE_RADIX).unwrap();

        let mut h = Vec::with_capacity(dim);
        let mut cells: usize = 1;
        let mut weight = T::one();

        for ((&a, &b), &count) in region
            .left()
            .iter()
            .zip(region.right().iter())
            .zip(subdivision.counts().iter())
        {
            let step = (b - a) / T::from_usize(count).unwrap();
            cells = cells
                .checked_mul(count)
                .ok_or(QuadratureError::GridTooLarge)?;
            weight = weight * step / six;
            h.push(step);
        }

        let samples_per_cell = SAMPLE_RADIX
            .checked_pow(dim as u32)
            .ok_or(QuadratureError::GridTooLarge)?;

        Ok(Self {
            left: region.left().to_vec(),
            counts: subdivision.counts().to_vec(),
            sample_radices: vec![SAMPLE_RADIX; dim],
            h,
            cells,
            samples_per_cell,
            weight,
        })
    }

    /// The total number of cells.
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// The number of sample points per cell, $6^d$.
    pub fn samples_per_cell(&self) -> usize {
        self.samples_per_cell
    }

    /// The Simpson weight $\prod_i h_i / 6$ shared by every sample point.
    pub fn weight(&self) -> T {
        self.weight
    }

    /// Fresh scratch buffers for one worker.
    pub fn scratch(&self) -> CellScratch<T> {
        let dim = self.left.len();

        CellScratch {
            digits: vec![0; dim],
            segments: vec![
                Segment {
                    left: T::zero(),
                    center: T::zero(),
                    right: T::zero(),
                };
                dim
            ],
            x: vec![T::zero(); dim],
        }
    }

    /// Decode the linear `cell` index into the per-dimension coordinate triples of that cell.
    pub fn decode_cell(&self, cell: usize, scratch: &mut CellScratch<T>) {
        debug_assert!(cell < self.cells);

        let two = T::one() + T::one();
        decode_mixed_radix(cell, &self.counts, &mut scratch.digits);

        for (j, segment) in scratch.segments.iter_mut().enumerate() {
            let left = self.left[j] + T::from_usize(scratch.digits[j]).unwrap() * self.h[j];
            let right = left + self.h[j];

            *segment = Segment {
                left,
                center: (left + right) / two,
                right,
            };
        }
    }

    /// Build the argument vector of the sample point with linear index `sample` inside the cell
    /// most recently decoded into `scratch`.
    ///
    /// Digit 1 selects the right border, digit 5 the left border and every other digit the
    /// center, so the center fills four of the six slots per dimension.
    pub fn sample_point<'s>(&self, sample: usize, scratch: &'s mut CellScratch<T>) -> &'s [T] {
        debug_assert!(sample < self.samples_per_cell);

        decode_mixed_radix(sample, &self.sample_radices, &mut scratch.digits);

        for ((x, &digit), segment) in scratch
            .x
            .iter_mut()
            .zip(scratch.digits.iter())
            .zip(scratch.segments.iter())
        {
            *x = match digit {
                1 => segment.right,
                5 => segment.left,
                _ => segment.center,
            };
        }

        &scratch.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    const TOLERANCE: f64 = 1e-15;

    #[test]
    fn test_decode_mixed_radix() {
        let radices = [3, 4, 5];
        let mut digits = [0; 3];

        // 47 = 2 + 3 * (3 + 4 * 3)
        decode_mixed_radix(47, &radices, &mut digits);
        assert_eq!(digits, [2, 3, 3]);

        decode_mixed_radix(0, &radices, &mut digits);
        assert_eq!(digits, [0, 0, 0]);

        decode_mixed_radix(59, &radices, &mut digits);
        assert_eq!(digits, [2, 3, 4]);
    }

    #[test]
    fn test_decode_mixed_radix_covers_all_indices() {
        let radices = [2, 3, 2];
        let mut digits = [0; 3];
        let mut seen = Vec::new();

        for index in 0..12 {
            decode_mixed_radix(index, &radices, &mut digits);
            seen.push(digits);
        }

        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 12);
    }

    #[test]
    fn test_region_validation() {
        assert_eq!(
            Region::<f64>::new(vec![], vec![]).unwrap_err(),
            QuadratureError::EmptyRegion
        );
        assert_eq!(
            Region::new(vec![0.0], vec![1.0, 2.0]).unwrap_err(),
            QuadratureError::MismatchedBorders { left: 1, right: 2 }
        );
        assert_eq!(
            Region::new(vec![0.0, 3.0], vec![1.0, 2.0]).unwrap_err(),
            QuadratureError::InvalidInterval { dim: 1 }
        );
        assert_eq!(
            Region::new(vec![0.0], vec![0.0]).unwrap_err(),
            QuadratureError::InvalidInterval { dim: 0 }
        );
        assert_eq!(
            Region::new(vec![f64::NEG_INFINITY], vec![0.0]).unwrap_err(),
            QuadratureError::InvalidInterval { dim: 0 }
        );

        let region = Region::new(vec![0.0, -1.0], vec![2.0, 3.0]).unwrap();
        assert_eq!(region.dim(), 2);
        assert_approx_eq!(region.volume(), 8.0, TOLERANCE);
    }

    #[test]
    fn test_subdivision_validation() {
        assert_eq!(
            Subdivision::new(vec![]).unwrap_err(),
            QuadratureError::EmptyRegion
        );
        assert_eq!(
            Subdivision::new(vec![2, 0, 1]).unwrap_err(),
            QuadratureError::ZeroCount { dim: 1 }
        );
        assert_eq!(
            Subdivision::uniform(3, 0).unwrap_err(),
            QuadratureError::ZeroCount { dim: 0 }
        );

        let subdivision = Subdivision::uniform(3, 4).unwrap();
        assert_eq!(subdivision.counts(), &[4, 4, 4]);
    }

    #[test]
    fn test_grid_dimension_mismatch() {
        let region = Region::new(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
        let subdivision = Subdivision::uniform(3, 2).unwrap();

        assert_eq!(
            Grid::new(&region, &subdivision).unwrap_err(),
            QuadratureError::DimensionMismatch {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_grid_too_large() {
        let region = Region::new(vec![0.0; 30], vec![1.0; 30]).unwrap();
        let subdivision = Subdivision::uniform(30, 1).unwrap();

        // 6^30 does not fit into a 64-bit usize
        assert_eq!(
            Grid::new(&region, &subdivision).unwrap_err(),
            QuadratureError::GridTooLarge
        );
    }

    #[test]
    fn test_grid_counters_and_weight() {
        let region = Region::new(vec![0.0, 1.0], vec![2.0, 4.0]).unwrap();
        let subdivision = Subdivision::new(vec![4, 3]).unwrap();
        let grid = Grid::new(&region, &subdivision).unwrap();

        assert_eq!(grid.cells(), 12);
        assert_eq!(grid.samples_per_cell(), 36);
        // h = (0.5, 1.0), weight = 0.5/6 * 1.0/6
        assert_approx_eq!(grid.weight(), 0.5 / 36.0, TOLERANCE);
    }

    #[test]
    fn test_decode_cell_coordinates() {
        let region = Region::new(vec![0.0, 10.0], vec![2.0, 16.0]).unwrap();
        let subdivision = Subdivision::new(vec![4, 3]).unwrap();
        let grid = Grid::new(&region, &subdivision).unwrap();
        let mut scratch = grid.scratch();

        // cell 9 decodes to sub-indices (1, 2) with radices (4, 3)
        grid.decode_cell(9, &mut scratch);

        assert_approx_eq!(scratch.segments[0].left, 0.5, TOLERANCE);
        assert_approx_eq!(scratch.segments[0].center, 0.75, TOLERANCE);
        assert_approx_eq!(scratch.segments[0].right, 1.0, TOLERANCE);

        assert_approx_eq!(scratch.segments[1].left, 14.0, TOLERANCE);
        assert_approx_eq!(scratch.segments[1].center, 15.0, TOLERANCE);
        assert_approx_eq!(scratch.segments[1].right, 16.0, TOLERANCE);
    }

    #[test]
    fn test_sample_point_slot_multiplicities() {
        let region = Region::new(vec![0.0], vec![1.0]).unwrap();
        let subdivision = Subdivision::uniform(1, 1).unwrap();
        let grid = Grid::new(&region, &subdivision).unwrap();
        let mut scratch = grid.scratch();

        grid.decode_cell(0, &mut scratch);

        let mut left = 0;
        let mut center = 0;
        let mut right = 0;

        for sample in 0..grid.samples_per_cell() {
            let x = grid.sample_point(sample, &mut scratch)[0];

            if x == 0.0 {
                left += 1;
            } else if x == 0.5 {
                center += 1;
            } else if x == 1.0 {
                right += 1;
            } else {
                panic!("unexpected abscissa {}", x);
            }
        }

        // the 1-4-1 Simpson weights as slot counts
        assert_eq!(left, 1);
        assert_eq!(center, 4);
        assert_eq!(right, 1);
    }
}
