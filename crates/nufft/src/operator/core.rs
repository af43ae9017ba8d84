//! State shared by every operator variant.
//!
//! ## Purpose
//!
//! `OperatorCore` owns the derived arrays produced at construction (or
//! accepted verbatim by the load path) together with the geometric
//! parameters they were built for. Variants wrap a core and add only what
//! distinguishes them (interpolation type, processing order).
//!
//! ## Invariants
//!
//! * `data_indices` is a permutation of `0..n` where `n = k_space_traj.count()`.
//! * `sector_data_count` has `grid_sector_dims.count() + 1` entries, starts at 0
//!   and ends at `n`.
//! * `sector_centers` holds `d` entries per sector, `d` being 2 or 3.
//! * Nothing is mutated after construction.

// External dependencies
use num_complex::Complex;
use num_traits::Float;

// Internal dependencies
use crate::math::geometry::sector_dims;
use crate::primitives::buffer::Array;
use crate::primitives::dimensions::Dimensions;

// ============================================================================
// Parameters
// ============================================================================

/// Geometric parameters an operator is built for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatorParams<T> {
    /// Interpolation kernel width in grid points.
    pub kernel_width: usize,

    /// Sector width in grid points.
    pub sector_width: usize,

    /// Oversampling ratio between grid and image.
    pub osf: T,

    /// Target image dimensions.
    pub img_dims: Dimensions,
}

impl<T: Float> OperatorParams<T> {
    /// Bundle the geometric parameters.
    pub fn new(kernel_width: usize, sector_width: usize, osf: T, img_dims: Dimensions) -> Self {
        Self {
            kernel_width,
            sector_width,
            osf,
            img_dims,
        }
    }

    /// Dimensions of the oversampled grid.
    #[inline]
    pub fn grid_dims(&self) -> Dimensions {
        self.img_dims.oversampled(self.osf)
    }

    /// Dimensions of the sector grid over the oversampled grid.
    #[inline]
    pub fn grid_sector_dims(&self) -> Dimensions {
        sector_dims(&self.grid_dims(), self.sector_width)
    }
}

// ============================================================================
// Operator Core
// ============================================================================

/// Derived arrays and parameters common to all variants.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorCore<T> {
    pub(crate) params: OperatorParams<T>,
    pub(crate) grid_dims: Dimensions,
    pub(crate) grid_sector_dims: Dimensions,
    pub(crate) k_space_traj: Array<T>,
    pub(crate) data_indices: Array<usize>,
    pub(crate) sector_data_count: Array<usize>,
    pub(crate) sector_centers: Array<usize>,
    pub(crate) dens: Option<Array<T>>,
    pub(crate) sens: Option<Array<Complex<T>>>,
}

impl<T: Float> OperatorCore<T> {
    /// Geometric parameters.
    #[inline]
    pub fn params(&self) -> &OperatorParams<T> {
        &self.params
    }

    /// Target image dimensions.
    #[inline]
    pub fn img_dims(&self) -> Dimensions {
        self.params.img_dims
    }

    /// Oversampled grid dimensions.
    #[inline]
    pub fn grid_dims(&self) -> Dimensions {
        self.grid_dims
    }

    /// Sector grid dimensions.
    #[inline]
    pub fn grid_sector_dims(&self) -> Dimensions {
        self.grid_sector_dims
    }

    /// Number of sectors.
    #[inline]
    pub fn sector_count(&self) -> usize {
        self.grid_sector_dims.count()
    }

    /// Number of k-space samples.
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.k_space_traj.count()
    }

    /// Kernel width in grid points.
    #[inline]
    pub fn kernel_width(&self) -> usize {
        self.params.kernel_width
    }

    /// Sector width in grid points.
    #[inline]
    pub fn sector_width(&self) -> usize {
        self.params.sector_width
    }

    /// Oversampling ratio.
    #[inline]
    pub fn osf(&self) -> T {
        self.params.osf
    }

    /// Whether the operator grids a 2D image.
    #[inline]
    pub fn is_2d(&self) -> bool {
        self.params.img_dims.is_2d()
    }

    /// Whether the operator grids a 3D volume.
    #[inline]
    pub fn is_3d(&self) -> bool {
        !self.is_2d()
    }

    /// Coordinate components per sample (2 or 3).
    #[inline]
    pub fn image_dimension_count(&self) -> usize {
        self.params.img_dims.coordinate_components()
    }

    /// Sector-sorted, component-major trajectory.
    #[inline]
    pub fn k_space_traj(&self) -> &Array<T> {
        &self.k_space_traj
    }

    /// Sorted position → original sample index.
    #[inline]
    pub fn data_indices(&self) -> &Array<usize> {
        &self.data_indices
    }

    /// Per-sector offsets into the sorted samples.
    #[inline]
    pub fn sector_data_count(&self) -> &Array<usize> {
        &self.sector_data_count
    }

    /// Flattened sector centers.
    #[inline]
    pub fn sector_centers(&self) -> &Array<usize> {
        &self.sector_centers
    }

    /// Center of sector `s` (2 or 3 grid coordinates).
    #[inline]
    pub fn sector_center(&self, s: usize) -> &[usize] {
        let d = self.image_dimension_count();
        &self.sector_centers.data[d * s..d * (s + 1)]
    }

    /// Sorted density compensation weights, if attached.
    #[inline]
    pub fn dens(&self) -> Option<&Array<T>> {
        self.dens.as_ref()
    }

    /// Coil sensitivity maps, if attached.
    #[inline]
    pub fn sens(&self) -> Option<&Array<Complex<T>>> {
        self.sens.as_ref()
    }

    /// Whether density compensation is applied.
    #[inline]
    pub fn apply_dens_correction(&self) -> bool {
        self.dens.is_some()
    }

    /// Whether sensitivity maps are applied.
    #[inline]
    pub fn apply_sens_data(&self) -> bool {
        self.sens.is_some()
    }
}
