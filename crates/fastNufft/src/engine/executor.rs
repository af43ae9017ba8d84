//! Parallel construction passes for the operator factory.
//!
//! ## Purpose
//!
//! This module provides the rayon passes injected into the `nufft` crate's
//! construction pipeline: sector assignment, the sort by sector id and the
//! permutation of per-sample arrays. Each is a drop-in replacement for the
//! corresponding sequential pass.
//!
//! ## Design notes
//!
//! * **Implementation**: Every pass reuses the core per-sample kernel, so the
//!   parallel and sequential paths share their arithmetic.
//! * **Deterministic**: The sort uses the same `(sector, index)` key as the
//!   sequential pass, which makes the permutation identical.
//! * **Generics**: Generic over `Float` types.
//!
//! ## Invariants
//!
//! * Outputs are bit-identical to the sequential passes.
//!
//! ## Non-goals
//!
//! * This module does not validate input data (handled by `validator`).
//! * This module does not build histograms or processing orders.

// Feature-gated imports
#[cfg(feature = "cpu")]
use rayon::prelude::*;

// External dependencies
use num_traits::Float;

// Export dependencies from nufft crate
use nufft::internals::algorithms::assignment::assign_sample;
use nufft::internals::algorithms::permutation::PermutedSamples;
use nufft::internals::primitives::dimensions::Dimensions;
use nufft::internals::primitives::errors::NufftError;
use nufft::internals::primitives::sorting::SortedSectors;

// ============================================================================
// Parallel Passes
// ============================================================================

/// Assign every sample to its sector in parallel.
#[cfg(feature = "cpu")]
pub fn assign_pass_parallel<T>(
    coords: &[T],
    samples: usize,
    sector_dims: &Dimensions,
) -> Result<Vec<usize>, NufftError>
where
    T: Float + Send + Sync,
{
    Ok((0..samples)
        .into_par_iter()
        .map(|i| assign_sample(coords, samples, i, sector_dims))
        .collect())
}

/// Order samples by sector id with a parallel unstable sort.
#[cfg(feature = "cpu")]
pub fn sort_pass_parallel(assigned_sectors: &[usize]) -> SortedSectors {
    let n = assigned_sectors.len();

    if assigned_sectors.par_windows(2).all(|w| w[0] <= w[1]) {
        return SortedSectors {
            indices: (0..n).collect(),
            sectors: assigned_sectors.to_vec(),
        };
    }

    let mut keys: Vec<(usize, usize)> = assigned_sectors
        .par_iter()
        .enumerate()
        .map(|(i, &s)| (s, i))
        .collect();
    keys.par_sort_unstable();

    let (sectors, indices): (Vec<usize>, Vec<usize>) = keys.into_par_iter().unzip();
    SortedSectors { indices, sectors }
}

/// Reorder the trajectory and density into sorted order in parallel.
#[cfg(feature = "cpu")]
pub fn permute_pass_parallel<T>(
    trajectory: &[T],
    components: usize,
    density: Option<&[T]>,
    indices: &[usize],
) -> Result<PermutedSamples<T>, NufftError>
where
    T: Float + Send + Sync,
{
    let n = indices.len();
    let mut sorted = vec![T::zero(); n * components];

    if n > 0 {
        sorted
            .par_chunks_mut(n)
            .zip(trajectory.par_chunks(n))
            .for_each(|(out, column)| {
                for (slot, &i) in out.iter_mut().zip(indices) {
                    *slot = column[i];
                }
            });
    }

    Ok(PermutedSamples {
        trajectory: sorted,
        density: density.map(|d| indices.par_iter().map(|&i| d[i]).collect()),
    })
}
