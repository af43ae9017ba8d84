//! Owned buffers with a logical shape.
//!
//! ## Purpose
//!
//! `Array<T>` is the unit of ownership for every derived array an operator
//! holds: sorted trajectory, data indices, sector offsets, processing order and
//! sector centers. It is a `Vec<T>` plus the `Dimensions` describing how the
//! flat storage is interpreted.
//!
//! ## Design notes
//!
//! * **Exclusive ownership**: An array belongs to whoever built it until it is
//!   moved into an operator. Dropping the operator releases it.
//! * **Component-major coordinates**: A trajectory of `N` samples with `d`
//!   components stores all x, then all y, then all z. Its `dim.length` is `N`
//!   while the backing storage holds `N * d` scalars.
//!
//! ## Invariants
//!
//! * `count()` is the logical element count taken from `dim`, not `data.len()`.

// Feature-gated dependencies
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::ops::Deref;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::primitives::dimensions::Dimensions;

// ============================================================================
// Array
// ============================================================================

/// A buffer of `T` with a known logical shape.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Array<T> {
    /// Flat storage.
    pub data: Vec<T>,

    /// Logical shape of `data`.
    pub dim: Dimensions,
}

impl<T> Array<T> {
    /// Wrap `data` with an explicit logical shape.
    #[inline]
    pub fn new(data: Vec<T>, dim: Dimensions) -> Self {
        Self { data, dim }
    }

    /// Wrap `data` as a linear buffer whose length is its element count.
    #[inline]
    pub fn linear(data: Vec<T>) -> Self {
        let dim = Dimensions::linear(data.len());
        Self { data, dim }
    }

    /// Wrap component-major sample coordinates for `samples` samples.
    #[inline]
    pub fn trajectory(data: Vec<T>, samples: usize) -> Self {
        Self {
            data,
            dim: Dimensions::linear(samples),
        }
    }

    /// Logical element count.
    #[inline]
    pub fn count(&self) -> usize {
        self.dim.count()
    }

    /// Borrow the flat storage.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consume the array, returning its storage.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T> Default for Array<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            dim: Dimensions::default(),
        }
    }
}

impl<T> Deref for Array<T> {
    type Target = [T];
    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T> From<Vec<T>> for Array<T> {
    fn from(v: Vec<T>) -> Self {
        Self::linear(v)
    }
}
