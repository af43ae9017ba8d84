//! Sector grid geometry.
//!
//! ## Purpose
//!
//! Pure functions mapping image dimensions and sample coordinates onto the
//! uniform sector grid laid over the oversampled image: sector counts per
//! axis, sector ids for a coordinate, row-major linearisation and the integer
//! sector centers used as interpolation anchors.
//!
//! ## Key concepts
//!
//! * **Normalised coordinates**: k-space coordinates lie in `[-0.5, 0.5)`.
//!   Shifting by `0.5` and scaling by the per-axis sector count yields the
//!   continuous sector coordinate, which is truncated and clamped.
//! * **Row-major ids**: `x + W * y` in 2D, `x + W * (y + H * z)` in 3D.
//!
//! ## Invariants
//!
//! * Every mapped sector id lies in `[0, sector_count)` for any finite input.
//! * `sector_width` is non-zero (checked by the validator beforehand).

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::dimensions::Dimensions;

// ============================================================================
// Sector Counts
// ============================================================================

/// Number of sectors covering `dim` grid points: `ceil(dim / sector_width)`.
#[inline]
pub fn sector_count_per_dim(dim: usize, sector_width: usize) -> usize {
    dim.div_ceil(sector_width)
}

/// Sector grid dimensions for a grid of `dims`.
pub fn sector_dims(dims: &Dimensions, sector_width: usize) -> Dimensions {
    Dimensions {
        length: 0,
        width: sector_count_per_dim(dims.width, sector_width),
        height: sector_count_per_dim(dims.height, sector_width),
        depth: sector_count_per_dim(dims.depth, sector_width),
        channels: 0,
    }
}

/// Total number of sectors for a grid of `dims`.
#[inline]
pub fn total_sector_count(dims: &Dimensions, sector_width: usize) -> usize {
    sector_dims(dims, sector_width).count()
}

// ============================================================================
// Coordinate Mapping
// ============================================================================

/// Map one normalised coordinate component to a sector index along its axis.
#[inline]
pub fn sector_mapping<T: Float>(coord: T, sector_count: usize) -> usize {
    if sector_count == 0 {
        return 0;
    }
    let half = T::from(0.5).unwrap_or_else(T::zero);
    let scaled = ((coord + half) * T::from(sector_count).unwrap_or_else(T::one)).floor();

    // NaN compares false, so it lands in sector 0 with the negatives.
    if !(scaled > T::zero()) {
        return 0;
    }
    let last = sector_count - 1;
    match T::from(last) {
        Some(max) if scaled < max => scaled.to_usize().unwrap_or(last),
        _ => last,
    }
}

/// Linearise a 2D sector coordinate row-major over `sector_dims`.
#[inline]
pub fn linearize_2d(x: usize, y: usize, sector_dims: &Dimensions) -> usize {
    x + sector_dims.width * y
}

/// Linearise a 3D sector coordinate row-major over `sector_dims`.
#[inline]
pub fn linearize_3d(x: usize, y: usize, z: usize, sector_dims: &Dimensions) -> usize {
    x + sector_dims.width * (y + sector_dims.height * z)
}

/// Sector id of a 2D sample.
#[inline]
pub fn sector_of_2d<T: Float>(x: T, y: T, sector_dims: &Dimensions) -> usize {
    linearize_2d(
        sector_mapping(x, sector_dims.width),
        sector_mapping(y, sector_dims.height),
        sector_dims,
    )
}

/// Sector id of a 3D sample.
#[inline]
pub fn sector_of_3d<T: Float>(x: T, y: T, z: T, sector_dims: &Dimensions) -> usize {
    linearize_3d(
        sector_mapping(x, sector_dims.width),
        sector_mapping(y, sector_dims.height),
        sector_mapping(z, sector_dims.depth),
        sector_dims,
    )
}

// ============================================================================
// Sector Centers
// ============================================================================

/// Integer center of the sector at `index` along one axis.
#[inline]
pub fn sector_center(index: usize, sector_width: usize) -> usize {
    index * sector_width + sector_width / 2
}

/// Centers of all sectors of a 2D sector grid, two entries per sector.
pub fn sector_centers_2d(sector_dims: &Dimensions, sector_width: usize) -> Vec<usize> {
    let count = sector_dims.width * sector_dims.height;
    let mut centers = vec![0usize; 2 * count];

    for y in 0..sector_dims.height {
        for x in 0..sector_dims.width {
            let index = linearize_2d(x, y, sector_dims);
            centers[2 * index] = sector_center(x, sector_width);
            centers[2 * index + 1] = sector_center(y, sector_width);
        }
    }
    centers
}

/// Centers of all sectors of a 3D sector grid, three entries per sector.
pub fn sector_centers_3d(sector_dims: &Dimensions, sector_width: usize) -> Vec<usize> {
    let count = sector_dims.width * sector_dims.height * sector_dims.depth;
    let mut centers = vec![0usize; 3 * count];

    for z in 0..sector_dims.depth {
        for y in 0..sector_dims.height {
            for x in 0..sector_dims.width {
                let index = linearize_3d(x, y, z, sector_dims);
                centers[3 * index] = sector_center(x, sector_width);
                centers[3 * index + 1] = sector_center(y, sector_width);
                centers[3 * index + 2] = sector_center(z, sector_width);
            }
        }
    }
    centers
}
