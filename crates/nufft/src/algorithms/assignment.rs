//! Sample-to-sector assignment.
//!
//! ## Purpose
//!
//! Computes, for every k-space sample, the linear id of the sector it falls
//! into. Each sample reads only its own coordinate and writes only its own
//! output slot, so the pass is trivially data-parallel; extension crates reuse
//! [`assign_sample`] inside their parallel loops.
//!
//! ## Invariants
//!
//! * Output length equals the sample count.
//! * Every id lies in `[0, sector_dims.count())`.
//! * 2D vs 3D is decided by `sector_dims.depth == 0`.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::geometry::{sector_of_2d, sector_of_3d};
use crate::primitives::dimensions::Dimensions;
use crate::primitives::errors::NufftError;

/// Sector id of sample `i` in a component-major trajectory of `samples` samples.
#[inline]
pub fn assign_sample<T: Float>(
    coords: &[T],
    samples: usize,
    i: usize,
    sector_dims: &Dimensions,
) -> usize {
    if sector_dims.is_2d() {
        sector_of_2d(coords[i], coords[i + samples], sector_dims)
    } else {
        sector_of_3d(
            coords[i],
            coords[i + samples],
            coords[i + 2 * samples],
            sector_dims,
        )
    }
}

/// Sequential assignment pass over all samples.
pub fn assign_sectors<T: Float>(
    coords: &[T],
    samples: usize,
    sector_dims: &Dimensions,
) -> Result<Vec<usize>, NufftError> {
    Ok((0..samples)
        .map(|i| assign_sample(coords, samples, i, sector_dims))
        .collect())
}
