//! Transportable derived state of an operator.
//!
//! `PrecomputedOperator` carries everything the load path needs to rebuild an
//! operator without recomputation: the sorted trajectory, the permutation, the
//! sector offsets, the balanced chunk list and the sector centers, plus the
//! optional density and sensitivity arrays. With the `serde` feature it can be
//! serialized across a process boundary.

// External dependencies
use num_complex::Complex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::algorithms::processing_order::ProcessingChunk;
use crate::primitives::buffer::Array;

/// Derived operator arrays, as produced by a forward construction.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrecomputedOperator<T> {
    /// Sector-sorted, component-major trajectory.
    pub k_space_traj: Array<T>,

    /// Sorted position → original sample index.
    pub data_indices: Array<usize>,

    /// Per-sector offsets (`sector_count + 1` entries).
    pub sector_data_count: Array<usize>,

    /// Balanced chunk list; empty for non-balanced operators.
    pub sector_processing_order: Array<ProcessingChunk>,

    /// Flattened sector centers.
    pub sector_centers: Array<usize>,

    /// Sorted density compensation weights.
    pub dens: Option<Array<T>>,

    /// Coil sensitivity maps.
    pub sens: Option<Array<Complex<T>>>,
}
