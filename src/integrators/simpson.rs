//! Composite Simpson integrator
use crate::callbacks::Callback;
use crate::core::grid::{CellScratch, Grid};
use crate::core::*;

use num_traits::{Float, FromPrimitive};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

use crossbeam as cb;

/// Estimators for the Simpson integrator.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimpsonEstimators<T> {
    integral: T,
    calls: usize,
    non_finite_calls: usize,
}

impl<T: Copy> SimpsonEstimators<T> {
    /// Returns the quadrature estimate of the integral.
    pub fn integral(&self) -> T {
        self.integral
    }

    /// Returns the number of times $N$, the integrand has been called.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Returns the number of times, $N_\mathrm{nf}$, the integrand has been called
    /// and its return value was non-finite.
    pub fn non_finite_calls(&self) -> usize {
        self.non_finite_calls
    }
}

/// Sums accumulated by a single worker over its range of cells.
#[derive(Debug)]
struct WorkerSum<T> {
    sum: T,
    calls: usize,
    non_finite_calls: usize,
}

impl<T: Float> Default for WorkerSum<T> {
    fn default() -> Self {
        Self {
            sum: T::zero(),
            calls: 0,
            non_finite_calls: 0,
        }
    }
}

impl<T: Float> Add for WorkerSum<T> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            sum: self.sum + other.sum,
            calls: self.calls + other.calls,
            non_finite_calls: self.non_finite_calls + other.non_finite_calls,
        }
    }
}

impl<T: AddAssign + Float> WorkerSum<T> {
    /// Add one integrand value. Non-finite values are counted but not filtered, they propagate
    /// arithmetically into the sum.
    fn update(&mut self, value: T) {
        self.calls += 1;

        if !value.is_finite() {
            self.non_finite_calls += 1;
        }

        self.sum += value;
    }
}

/// Check that the integrand agrees with the region on the dimension.
fn check_integrand_dim<T: Float>(
    region: &Region<T>,
    integrand: &impl Integrand<T>,
) -> Result<(), QuadratureError> {
    if integrand.dim() != region.dim() {
        return Err(QuadratureError::DimensionMismatch {
            expected: region.dim(),
            found: integrand.dim(),
        });
    }

    Ok(())
}

/// Evaluate the integrand on every sample point of the cell with linear index `cell`, scaling
/// each value by `scale` before adding it to `acc`.
fn accumulate_cell<T, I>(
    integrand: &I,
    grid: &Grid<T>,
    cell: usize,
    scratch: &mut CellScratch<T>,
    acc: &mut WorkerSum<T>,
    scale: T,
) where
    I: Integrand<T>,
    T: AddAssign + Float + FromPrimitive,
{
    grid.decode_cell(cell, scratch);

    for sample in 0..grid.samples_per_cell() {
        let x = grid.sample_point(sample, scratch);
        let value = integrand.call(x);

        acc.update(scale * value);
    }
}

/// Perform the contribution of a specific `core` to the integration.
fn perform_contribution_from_core<T, I>(
    integrand: &I,
    grid: &Grid<T>,
    core: usize,
    n_cores: usize,
) -> WorkerSum<T>
where
    I: Integrand<T>,
    T: AddAssign + Float + FromPrimitive + Send + Sync,
{
    let mut scratch = grid.scratch();
    let mut acc = WorkerSum::default();

    // every term carries the Simpson weight already, which keeps the cross-worker reduction a
    // plain addition
    let weight = grid.weight();

    for cell in cell_range_for_core(core, n_cores, grid.cells()) {
        accumulate_cell(integrand, grid, cell, &mut scratch, &mut acc, weight);
    }

    acc
}

/// Integrate the `integrand` over `region` with the tensor-product composite Simpson rule,
/// splitting each dimension according to `subdivision`.
///
/// All cells are walked in increasing index order by a single thread, so the result is
/// bit-for-bit reproducible across runs. The accumulated sum is scaled by the Simpson weight
/// once at the end. The `callback` is invoked with the finished estimators.
///
/// # Errors
///
/// Returns an error if the region, the subdivision and the integrand disagree on the dimension
/// or if the grid is too large to enumerate.
pub fn integrate<T, I>(
    integrand: &I,
    region: &Region<T>,
    subdivision: &Subdivision,
    callback: &impl Callback<T>,
) -> Result<SimpsonEstimators<T>, QuadratureError>
where
    I: Integrand<T>,
    T: AddAssign + Float + FromPrimitive,
{
    let grid = Grid::new(region, subdivision)?;
    check_integrand_dim(region, integrand)?;

    let mut scratch = grid.scratch();
    let mut acc = WorkerSum::default();

    for cell in 0..grid.cells() {
        accumulate_cell(integrand, &grid, cell, &mut scratch, &mut acc, T::one());
    }

    let estimators = SimpsonEstimators {
        integral: acc.sum * grid.weight(),
        calls: acc.calls,
        non_finite_calls: acc.non_finite_calls,
    };

    callback.print(&estimators);

    Ok(estimators)
}

/// Integrate the `integrand` over `region` on up to `cores` cores.
///
/// The cell index range is split into contiguous chunks, one per core; every worker runs the
/// same per-cell enumeration as [`integrate`] over its chunk with private scratch buffers and
/// the worker sums are combined by addition after the join. The combination order across
/// workers is unspecified, so the result agrees with [`integrate`] only up to floating-point
/// summation error.
///
/// # Errors
///
/// Returns an error if `cores` is zero, in addition to the errors of [`integrate`].
pub fn integrate_parallel<T, I>(
    integrand: &I,
    region: &Region<T>,
    subdivision: &Subdivision,
    cores: usize,
    callback: &impl Callback<T>,
) -> Result<SimpsonEstimators<T>, QuadratureError>
where
    I: Integrand<T>,
    T: AddAssign + Float + FromPrimitive + Send + Sync,
{
    if cores == 0 {
        return Err(QuadratureError::NoCores);
    }

    let grid = Grid::new(region, subdivision)?;
    check_integrand_dim(region, integrand)?;

    // never spawn more workers than there are cells
    let n_cores = cores.min(grid.cells());

    let grid_ref = &grid;

    // distribute the workload evenly across the cores
    let collect_results = cb::thread::scope(|s| {
        let mut handles = Vec::with_capacity(n_cores);

        for core in 0..n_cores {
            handles.push(s.spawn(move |_| {
                perform_contribution_from_core(integrand, grid_ref, core, n_cores)
            }));
        }

        // wait for the threads to finish
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    })
    .unwrap();

    // accumulate the intermediate results
    let accumulate = collect_results
        .into_iter()
        .fold(WorkerSum::default(), |acc, r| acc + r);

    let estimators = SimpsonEstimators {
        integral: accumulate.sum,
        calls: accumulate.calls,
        non_finite_calls: accumulate.non_finite_calls,
    };

    callback.print(&estimators);

    Ok(estimators)
}
