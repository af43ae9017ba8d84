//! Construction pipeline for gridding operators.
//!
//! ## Purpose
//!
//! This module turns an unordered trajectory into a sector-partitioned
//! operator (forward path) or attaches externally computed state verbatim
//! (load path). It coordinates the assignment, sort, permutation, histogram
//! and planning stages and assembles the selected operator variant.
//!
//! ## Design notes
//!
//! * **Injected passes**: Assignment, sort and permutation run through the
//!   function pointers of an [`ExecutionStrategy`], chosen once when the
//!   factory is built. Extension crates substitute rayon or wgpu passes.
//! * **Single barrier**: The sort consumes every assignment before the
//!   permutation and histogram start.
//! * **All-or-nothing**: Inputs are validated before any pass runs and an
//!   operator is only returned after every stage succeeded.
//!
//! ## Key concepts
//!
//! ### Forward path
//! 1. **Assign**: sample → sector id over the oversampled sector grid.
//! 2. **Sort**: order samples by `(sector, index)`; record the permutation.
//! 3. **Permute**: reorder trajectory and density into sorted order.
//! 4. **Histogram**: per-sector offsets from the sorted ids.
//! 5. **Plan**: balanced chunk list (balanced variants only).
//! 6. **Centers**: integer center of every sector (2D or 3D).
//!
//! ### Load path
//! Shapes, offsets and the permutation are checked, and balanced variants
//! require the order to cover every sample exactly once with chunks of the
//! factory's payload. The arrays are then moved into the operator unchanged.
//!
//! ## Invariants
//!
//! * The executor never mutates its inputs.
//! * Sequential and parallel strategies produce identical operators.
//!
//! ## Non-goals
//!
//! * This module does not run the gridding kernels (see `operator::transform`).
//! * This module does not retry failed passes.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

// External dependencies
use log::{debug, trace};
use num_complex::Complex;
use num_traits::Float;

// Internal dependencies
use crate::algorithms::assignment::assign_sectors;
use crate::algorithms::histogram::sector_data_count;
use crate::algorithms::permutation::{PermutedSamples, permute_samples};
use crate::algorithms::processing_order::{
    DEFAULT_MAXIMUM_PAYLOAD, ProcessingChunk, compute_processing_order,
};
use crate::engine::validator::Validator;
use crate::math::geometry::{sector_centers_2d, sector_centers_3d};
use crate::operator::core::{OperatorCore, OperatorParams};
use crate::operator::precomputed::PrecomputedOperator;
use crate::operator::{InterpolationType, Operator, OperatorType};
use crate::primitives::buffer::Array;
use crate::primitives::dimensions::Dimensions;
use crate::primitives::errors::NufftError;
use crate::primitives::sorting::{SortedSectors, sort_by_sector};

// ============================================================================
// Type Definitions
// ============================================================================

/// Signature for custom sector assignment pass function
#[doc(hidden)]
pub type AssignPassFn<T> = fn(
    &[T],        // component-major coordinates
    usize,       // sample count
    &Dimensions, // sector grid dims
) -> Result<Vec<usize>, NufftError>;

/// Signature for custom sector sort pass function
#[doc(hidden)]
pub type SortPassFn = fn(&[usize]) -> SortedSectors;

/// Signature for custom sample permutation pass function
#[doc(hidden)]
pub type PermutePassFn<T> = fn(
    &[T],         // component-major coordinates
    usize,        // coordinate components
    Option<&[T]>, // density
    &[usize],     // sorted position -> original index
) -> Result<PermutedSamples<T>, NufftError>;

/// The three injectable passes of the forward path.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionStrategy<T> {
    /// Sample-to-sector assignment.
    pub assign_pass: AssignPassFn<T>,

    /// Ordering by sector id.
    pub sort_pass: SortPassFn,

    /// Reordering of per-sample arrays.
    pub permute_pass: PermutePassFn<T>,
}

impl<T: Float> ExecutionStrategy<T> {
    /// The sequential passes shipped with this crate.
    pub fn sequential() -> Self {
        Self {
            assign_pass: assign_sectors::<T>,
            sort_pass: sort_by_sector,
            permute_pass: permute_samples::<T>,
        }
    }
}

impl<T: Float> Default for ExecutionStrategy<T> {
    fn default() -> Self {
        Self::sequential()
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Resolved factory configuration.
#[derive(Debug, Clone)]
pub struct OperatorConfig<T> {
    /// Kernel interpolation mode.
    pub interpolation: InterpolationType,

    /// Whether to build a balanced variant.
    pub balance_workload: bool,

    /// Upper bound on samples per balanced chunk.
    pub maximum_payload: usize,

    // ++++++++++++++++++++++++++++++++++++++
    // +               DEV                  +
    // ++++++++++++++++++++++++++++++++++++++
    /// Custom assignment pass function.
    #[doc(hidden)]
    pub custom_assign_pass: Option<AssignPassFn<T>>,

    /// Custom sort pass function.
    #[doc(hidden)]
    pub custom_sort_pass: Option<SortPassFn>,

    /// Custom permutation pass function.
    #[doc(hidden)]
    pub custom_permute_pass: Option<PermutePassFn<T>>,
}

impl<T> Default for OperatorConfig<T> {
    fn default() -> Self {
        Self {
            interpolation: InterpolationType::default(),
            balance_workload: false,
            maximum_payload: DEFAULT_MAXIMUM_PAYLOAD,
            custom_assign_pass: None,
            custom_sort_pass: None,
            custom_permute_pass: None,
        }
    }
}

impl<T: Float> OperatorConfig<T> {
    /// Variant selected by this configuration.
    #[inline]
    pub fn operator_type(&self) -> OperatorType {
        OperatorType::select(self.interpolation, self.balance_workload)
    }

    /// Resolve the passes, falling back to the sequential ones.
    pub fn strategy(&self) -> ExecutionStrategy<T> {
        let sequential = ExecutionStrategy::sequential();
        ExecutionStrategy {
            assign_pass: self.custom_assign_pass.unwrap_or(sequential.assign_pass),
            sort_pass: self.custom_sort_pass.unwrap_or(sequential.sort_pass),
            permute_pass: self.custom_permute_pass.unwrap_or(sequential.permute_pass),
        }
    }
}

// ============================================================================
// Executor
// ============================================================================

/// Runs the forward and load paths for one configuration.
#[derive(Debug, Clone)]
pub struct OperatorExecutor<T> {
    config: OperatorConfig<T>,
    strategy: ExecutionStrategy<T>,
}

impl<T: Float> OperatorExecutor<T> {
    /// Create an executor, resolving the passes once.
    pub fn new(config: OperatorConfig<T>) -> Self {
        let strategy = config.strategy();
        Self { config, strategy }
    }

    /// Configuration the executor was created with.
    #[inline]
    pub fn config(&self) -> &OperatorConfig<T> {
        &self.config
    }

    /// Build an operator from an unordered trajectory.
    pub fn build_operator(
        &self,
        trajectory: &Array<T>,
        density: Option<&Array<T>>,
        sensitivity: Option<Array<Complex<T>>>,
        params: OperatorParams<T>,
    ) -> Result<Operator<T>, NufftError> {
        // Validate before any work, channel count first
        Validator::validate_trajectory_channels(&trajectory.dim)?;
        Validator::validate_params(&params)?;
        let components = params.img_dims.coordinate_components();
        Validator::validate_trajectory(trajectory, components)?;
        let n = trajectory.count();
        if let Some(dens) = density {
            Validator::validate_density(dens, n)?;
        }
        if let Some(sens) = &sensitivity {
            Validator::validate_sensitivity(sens, &params.img_dims)?;
        }

        let operator_type = self.config.operator_type();
        debug!("creating {operator_type} gridding operator");

        let grid_dims = params.grid_dims();
        let grid_sector_dims = params.grid_sector_dims();
        let sector_count = grid_sector_dims.count();
        trace!(
            "grid {}x{}x{}, {} sectors, {} samples",
            grid_dims.width, grid_dims.height, grid_dims.depth, sector_count, n
        );

        // Assign
        let coords = &trajectory.data[..n * components];
        let assigned = (self.strategy.assign_pass)(coords, n, &grid_sector_dims)?;
        Validator::validate_length("sector assignment", n, assigned.len())?;
        trace!("assigned {} samples to sectors", assigned.len());

        // Sort
        let sorted = (self.strategy.sort_pass)(&assigned);
        Validator::validate_length("sorted sectors", n, sorted.len())?;

        // Permute
        let PermutedSamples {
            trajectory: sorted_traj,
            density: sorted_dens,
        } = (self.strategy.permute_pass)(
            coords,
            components,
            density.map(|d| d.as_slice()),
            &sorted.indices,
        )?;
        Validator::validate_length("sorted trajectory", n * components, sorted_traj.len())?;

        // Histogram
        let offsets = sector_data_count(&sorted.sectors, sector_count);
        // Ids outside the sector grid are never counted
        Validator::validate_length("sector_data_count", n, offsets[sector_count])?;

        // Plan
        let processing_order = if operator_type.is_balanced() {
            let order = compute_processing_order(&offsets, self.config.maximum_payload);
            trace!("balanced processing order holds {} chunks", order.len());
            order
        } else {
            Vec::new()
        };

        // Centers
        let centers = if params.img_dims.is_2d() {
            sector_centers_2d(&grid_sector_dims, params.sector_width)
        } else {
            sector_centers_3d(&grid_sector_dims, params.sector_width)
        };

        let core = OperatorCore {
            params,
            grid_dims,
            grid_sector_dims,
            k_space_traj: Array::trajectory(sorted_traj, n),
            data_indices: Array::linear(sorted.indices),
            sector_data_count: Array::linear(offsets),
            sector_centers: Array::linear(centers),
            dens: sorted_dens.map(Array::linear),
            sens: sensitivity,
        };

        Ok(self.assemble(core, Array::linear(processing_order)))
    }

    /// Attach precomputed state without recomputation.
    pub fn load_operator(
        &self,
        precomputed: PrecomputedOperator<T>,
        params: OperatorParams<T>,
    ) -> Result<Operator<T>, NufftError> {
        Validator::validate_trajectory_channels(&precomputed.k_space_traj.dim)?;
        Validator::validate_params(&params)?;

        let operator_type = self.config.operator_type();
        let grid_dims = params.grid_dims();
        let grid_sector_dims = params.grid_sector_dims();
        let components = params.img_dims.coordinate_components();
        Validator::validate_precomputed(
            &precomputed,
            components,
            grid_sector_dims.count(),
            &params.img_dims,
            operator_type
                .is_balanced()
                .then_some(self.config.maximum_payload),
        )?;

        debug!("loading precomputed {operator_type} gridding operator");

        let PrecomputedOperator {
            k_space_traj,
            data_indices,
            sector_data_count,
            sector_processing_order,
            sector_centers,
            dens,
            sens,
        } = precomputed;

        let core = OperatorCore {
            params,
            grid_dims,
            grid_sector_dims,
            k_space_traj,
            data_indices,
            sector_data_count,
            sector_centers,
            dens,
            sens,
        };

        // Non-balanced variants ignore the supplied order
        let order = if operator_type.is_balanced() {
            sector_processing_order
        } else {
            Array::linear(Vec::new())
        };

        Ok(self.assemble(core, order))
    }

    fn assemble(
        &self,
        core: OperatorCore<T>,
        processing_order: Array<ProcessingChunk>,
    ) -> Operator<T> {
        Operator::from_core(
            core,
            self.config.interpolation,
            self.config.balance_workload,
            processing_order,
            self.config.maximum_payload,
        )
    }
}
