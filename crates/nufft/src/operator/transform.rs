//! Boundary to the gridding and FFT kernels.
//!
//! ## Purpose
//!
//! The convolution and FFT kernels live outside this crate. They receive a
//! [`GriddingPlan`], which borrows every derived array of an operator, and
//! sample data already in sector-sorted order. Operators take care of moving
//! data between caller order and sorted order through `data_indices`.
//!
//! ## Invariants
//!
//! * `sorted_kspace` always has one entry per sample, in sorted order.
//! * `image` always has `img_dims.count()` entries.
//!
//! ## Non-goals
//!
//! * No interpolation weights, FFT or deapodization are defined here.

// Internal dependencies
use crate::algorithms::processing_order::ProcessingChunk;
use crate::operator::core::OperatorCore;
use crate::operator::{InterpolationType, OperatorType};
use crate::primitives::errors::NufftError;

// External dependencies
use num_complex::Complex;

/// Borrowed view of an operator handed to transform kernels.
#[derive(Debug, Clone, Copy)]
pub struct GriddingPlan<'a, T> {
    /// Variant tag of the operator.
    pub operator_type: OperatorType,

    /// Interpolation mode the kernels should use.
    pub interpolation: InterpolationType,

    /// Derived arrays and geometry.
    pub core: &'a OperatorCore<T>,

    /// Balanced chunk list (balanced variants only).
    pub processing_order: Option<&'a [ProcessingChunk]>,

    /// Upper bound on samples per chunk (balanced variants only).
    pub maximum_payload: Option<usize>,
}

/// Gridding kernels that execute forward and adjoint transforms.
pub trait TransformExecutor<T> {
    /// Grid sorted k-space samples onto the image (NUFFT^H).
    fn adjoint(
        &self,
        plan: &GriddingPlan<'_, T>,
        sorted_kspace: &[Complex<T>],
        image: &mut [Complex<T>],
    ) -> Result<(), NufftError>;

    /// Resample the image at the sorted k-space positions (NUFFT).
    fn forward(
        &self,
        plan: &GriddingPlan<'_, T>,
        image: &[Complex<T>],
        sorted_kspace: &mut [Complex<T>],
    ) -> Result<(), NufftError>;
}
