//! Sector sorting and permutation utilities.
//!
//! ## Purpose
//!
//! This module orders samples by their assigned sector and records the
//! permutation so that per-sample arrays can be reordered into
//! sector-contiguous order and results can be scattered back to the caller's
//! sample order.
//!
//! ## Design notes
//!
//! * **Deterministic**: Samples are keyed by `(sector, original index)`, so the
//!   permutation is unique even though an unstable sort is used. Sequential and
//!   parallel sorts therefore agree exactly.
//! * **Index-only sort**: Only `(sector, index)` pairs move during the sort;
//!   coordinates are gathered afterwards in one pass.
//!
//! ## Key concepts
//!
//! ### Sort-Process-Unsort Pattern
//! 1. **Sort**: Sample indices are ordered by sector id.
//! 2. **Process**: Gridding kernels walk sector-contiguous runs.
//! 3. **Unsort**: Results are mapped back to original indices in O(n) time.
//!
//! ## Invariants
//!
//! * `sectors` is non-decreasing.
//! * `indices` is a permutation of `0..n` with `indices[sorted_pos] = original_pos`.
//! * Within a sector, original indices ascend.
//!
//! ## Non-goals
//!
//! * This module does not compute sector ids (see `algorithms::assignment`).

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

// External dependencies
use num_traits::Zero;

// ============================================================================
// Data Structures
// ============================================================================

/// Result of ordering samples by sector id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortedSectors {
    /// Original sample index at each sorted position.
    pub indices: Vec<usize>,

    /// Sector id at each sorted position (non-decreasing).
    pub sectors: Vec<usize>,
}

impl SortedSectors {
    /// Number of sorted samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether no samples were sorted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Split sorted `(sector, index)` keys into the two columns.
    pub fn from_keys(keys: &[(usize, usize)]) -> Self {
        Self {
            sectors: keys.iter().map(|k| k.0).collect(),
            indices: keys.iter().map(|k| k.1).collect(),
        }
    }
}

// ============================================================================
// Sorting Functions
// ============================================================================

/// Order sample indices by their assigned sector, ascending.
///
/// 1. Checks if the assignment is already sector-contiguous (fast path).
/// 2. Pairs each sector id with its sample index.
/// 3. Sorts by `(sector, index)`.
#[inline]
pub fn sort_by_sector(assigned_sectors: &[usize]) -> SortedSectors {
    let n = assigned_sectors.len();

    if assigned_sectors.windows(2).all(|w| w[0] <= w[1]) {
        return SortedSectors {
            indices: (0..n).collect(),
            sectors: assigned_sectors.to_vec(),
        };
    }

    let mut keys: Vec<(usize, usize)> = assigned_sectors
        .iter()
        .enumerate()
        .map(|(i, &s)| (s, i))
        .collect();
    keys.sort_unstable();

    SortedSectors::from_keys(&keys)
}

/// Gather `values` into sorted order: `out[k] = values[indices[k]]`.
#[inline]
pub fn gather<T: Copy>(values: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| values[i]).collect()
}

/// Map sorted values back to the original sample order in O(n) time.
#[inline]
pub fn unsort<T: Copy + Zero>(sorted_values: &[T], indices: &[usize]) -> Vec<T> {
    let mut result = vec![T::zero(); indices.len()];

    for (sorted_idx, &orig_idx) in indices.iter().enumerate() {
        result[orig_idx] = sorted_values[sorted_idx];
    }

    result
}
