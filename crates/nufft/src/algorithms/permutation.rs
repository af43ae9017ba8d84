//! Reordering of per-sample arrays into sector-contiguous order.
//!
//! ## Purpose
//!
//! Applies the sort permutation to the component-major trajectory and to the
//! optional density compensation weights. Each output slot reads exactly one
//! input sample, so extension crates parallelise the same loop per sample.
//!
//! ## Invariants
//!
//! * `trajectory[c * n + k] = input[c * n + indices[k]]` for every component `c`.
//! * `density[k] = input[indices[k]]` when density is present.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

// Internal dependencies
use crate::primitives::errors::NufftError;
use crate::primitives::sorting::gather;

/// Per-sample arrays in sector-sorted order.
#[derive(Debug, Clone, PartialEq)]
pub struct PermutedSamples<T> {
    /// Component-major coordinates, sorted.
    pub trajectory: Vec<T>,

    /// Density compensation weights, sorted.
    pub density: Option<Vec<T>>,
}

/// Sequential permutation pass.
pub fn permute_samples<T: Copy>(
    trajectory: &[T],
    components: usize,
    density: Option<&[T]>,
    indices: &[usize],
) -> Result<PermutedSamples<T>, NufftError> {
    let n = indices.len();
    let mut sorted = Vec::with_capacity(n * components);

    for c in 0..components {
        let column = &trajectory[c * n..(c + 1) * n];
        sorted.extend(indices.iter().map(|&i| column[i]));
    }

    Ok(PermutedSamples {
        trajectory: sorted,
        density: density.map(|d| gather(d, indices)),
    })
}
