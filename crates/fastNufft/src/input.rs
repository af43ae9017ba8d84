//! Input abstractions for operator construction.
//!
//! ## Purpose
//!
//! This module lets the factory accept trajectories and density weights in
//! several containers (slices, vectors, ndarray) through a single interface.
//!
//! ## Design notes
//!
//! * **Zero-copy views**: Provides direct slice access to the underlying buffer.
//! * **Fail-fast validation**: Multi-dimensional arrays must be in standard
//!   (row-major) layout.
//!
//! ## Key concepts
//!
//! * **Component-major trajectories**: A 2D `ndarray` of shape `(d, N)` in
//!   standard layout stores all x, then all y, then all z, which is exactly
//!   the layout the factory expects.
//!
//! ## Invariants
//!
//! * Returned slices cover every element of the input container.
//!
//! * 2D arrays report their row count, so the factory rejects a trajectory
//!   whose rows are not the coordinate components.
//!
//! ## Non-goals
//!
//! * This module does not transpose `(N, d)` arrays.

// External dependencies
use ndarray::{ArrayBase, Data, Ix1, Ix2};
use num_traits::Float;

// Export dependencies from nufft crate
use nufft::internals::primitives::errors::NufftError;

/// Trait for types that can be used as trajectory or density input.
pub trait NufftInput<T: Float> {
    /// Convert the input to a contiguous slice.
    fn as_nufft_slice(&self) -> Result<&[T], NufftError>;

    /// Number of rows, for containers that carry a 2D shape.
    fn component_rows(&self) -> Option<usize> {
        None
    }
}

impl<T: Float> NufftInput<T> for [T] {
    fn as_nufft_slice(&self) -> Result<&[T], NufftError> {
        Ok(self)
    }
}

impl<T: Float> NufftInput<T> for Vec<T> {
    fn as_nufft_slice(&self) -> Result<&[T], NufftError> {
        Ok(self.as_slice())
    }
}

impl<T: Float, S> NufftInput<T> for ArrayBase<S, Ix1>
where
    S: Data<Elem = T>,
{
    fn as_nufft_slice(&self) -> Result<&[T], NufftError> {
        self.as_slice().ok_or(NufftError::UnsupportedFeature {
            target: "ndarray input",
            feature: "non-contiguous memory layout",
        })
    }
}

impl<T: Float, S> NufftInput<T> for ArrayBase<S, Ix2>
where
    S: Data<Elem = T>,
{
    fn as_nufft_slice(&self) -> Result<&[T], NufftError> {
        self.as_slice().ok_or(NufftError::UnsupportedFeature {
            target: "ndarray input",
            feature: "non-standard memory layout",
        })
    }

    fn component_rows(&self) -> Option<usize> {
        Some(self.nrows())
    }
}
