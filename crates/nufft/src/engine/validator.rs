//! Input validation for operator construction.
//!
//! ## Purpose
//!
//! This module checks factory configuration, construction inputs and
//! precomputed operator state before any derived array is built. Construction
//! is all-or-nothing, so every rejection happens here.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Efficiency**: Cheap shape checks run before per-sample scans.
//! * **Generics**: Validation is generic over `Float` types.
//!
//! ## Key concepts
//!
//! * **Channel limits**: Trajectory and image carry at most one channel.
//! * **Geometry bounds**: Sector width, kernel width and oversampling are positive.
//! * **Shape agreement**: Buffer lengths follow from the sample count `N`,
//!   the coordinate component count `d` and the sector count `S`.
//! * **Precomputed consistency**: Offsets are monotone from 0 to `N` and the
//!   data indices form a bijection on `[0, N)`.
//!
//! ## Invariants
//!
//! * Validation is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * This module does not repair invalid inputs.
//! * This module does not recompute precomputed state.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::format;
#[cfg(not(feature = "std"))]
use alloc::vec;

// External dependencies
use num_complex::Complex;
use num_traits::Float;

// Internal dependencies
use crate::algorithms::processing_order::{ProcessingChunk, check_processing_order};
use crate::operator::core::OperatorParams;
use crate::operator::precomputed::PrecomputedOperator;
use crate::primitives::buffer::Array;
use crate::primitives::dimensions::Dimensions;
use crate::primitives::errors::NufftError;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for operator configuration and inputs.
///
/// All methods return `Result<(), NufftError>` and fail fast upon the first
/// violation.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Parameter Validation
    // ========================================================================

    /// Validate the trajectory channel count.
    pub fn validate_trajectory_channels(traj_dims: &Dimensions) -> Result<(), NufftError> {
        if traj_dims.channels > 1 {
            return Err(NufftError::InvalidTrajectoryChannels(traj_dims.channels));
        }
        Ok(())
    }

    /// Validate the image channel count.
    pub fn validate_image_channels(img_dims: &Dimensions) -> Result<(), NufftError> {
        if img_dims.channels > 1 {
            return Err(NufftError::InvalidImageChannels(img_dims.channels));
        }
        Ok(())
    }

    /// Validate the sector width.
    pub fn validate_sector_width(sector_width: usize) -> Result<(), NufftError> {
        if sector_width == 0 {
            return Err(NufftError::InvalidSectorWidth(sector_width));
        }
        Ok(())
    }

    /// Validate the kernel width.
    pub fn validate_kernel_width(kernel_width: usize) -> Result<(), NufftError> {
        if kernel_width == 0 {
            return Err(NufftError::InvalidKernelWidth(kernel_width));
        }
        Ok(())
    }

    /// Validate the oversampling ratio.
    pub fn validate_oversampling<T: Float>(osf: T) -> Result<(), NufftError> {
        if !osf.is_finite() || osf <= T::zero() {
            return Err(NufftError::InvalidOversampling(
                osf.to_f64().unwrap_or(f64::NAN),
            ));
        }
        Ok(())
    }

    /// Validate the balanced chunk payload.
    pub fn validate_maximum_payload(maximum_payload: usize) -> Result<(), NufftError> {
        if maximum_payload == 0 {
            return Err(NufftError::InvalidMaximumPayload(maximum_payload));
        }
        Ok(())
    }

    /// Validate all geometric parameters at once.
    pub fn validate_params<T: Float>(params: &OperatorParams<T>) -> Result<(), NufftError> {
        Self::validate_image_channels(&params.img_dims)?;
        Self::validate_kernel_width(params.kernel_width)?;
        Self::validate_sector_width(params.sector_width)?;
        Self::validate_oversampling(params.osf)
    }

    /// Validate that no builder parameter was set twice.
    pub fn validate_no_duplicates(
        duplicate_param: Option<&'static str>,
    ) -> Result<(), NufftError> {
        if let Some(param) = duplicate_param {
            return Err(NufftError::DuplicateParameter { parameter: param });
        }
        Ok(())
    }

    // ========================================================================
    // Input Validation
    // ========================================================================

    /// Validate a buffer length.
    #[inline]
    pub fn validate_length(
        name: &'static str,
        expected: usize,
        got: usize,
    ) -> Result<(), NufftError> {
        if expected != got {
            return Err(NufftError::MismatchedLength {
                name,
                expected,
                got,
            });
        }
        Ok(())
    }

    /// Validate a component-major trajectory of `components` components.
    pub fn validate_trajectory<T: Float>(
        trajectory: &Array<T>,
        components: usize,
    ) -> Result<(), NufftError> {
        Self::validate_trajectory_channels(&trajectory.dim)?;

        let n = trajectory.count();
        Self::validate_length("trajectory", n * components, trajectory.data.len())?;

        for (k, v) in trajectory.data.iter().enumerate() {
            if !v.is_finite() {
                return Err(NufftError::InvalidNumericValue(format!(
                    "trajectory[{}]={}",
                    k,
                    v.to_f64().unwrap_or(f64::NAN)
                )));
            }
        }
        Ok(())
    }

    /// Validate density compensation weights against the sample count.
    pub fn validate_density<T: Float>(density: &Array<T>, samples: usize) -> Result<(), NufftError> {
        Self::validate_length("density", samples, density.data.len())
    }

    /// Validate coil sensitivities against the image dimensions.
    pub fn validate_sensitivity<T: Float>(
        sens: &Array<Complex<T>>,
        img_dims: &Dimensions,
    ) -> Result<(), NufftError> {
        Self::validate_length(
            "sensitivity",
            img_dims.count() * sens.dim.channel_count(),
            sens.data.len(),
        )
    }

    // ========================================================================
    // Precomputed Validation
    // ========================================================================

    /// Validate externally supplied operator state.
    pub fn validate_precomputed<T: Float>(
        precomputed: &PrecomputedOperator<T>,
        components: usize,
        sector_count: usize,
        img_dims: &Dimensions,
        maximum_payload: Option<usize>,
    ) -> Result<(), NufftError> {
        let n = precomputed.k_space_traj.count();
        Self::validate_length(
            "trajectory",
            n * components,
            precomputed.k_space_traj.data.len(),
        )?;
        Self::validate_length("data_indices", n, precomputed.data_indices.data.len())?;
        Self::validate_length(
            "sector_data_count",
            sector_count + 1,
            precomputed.sector_data_count.data.len(),
        )?;
        Self::validate_length(
            "sector_centers",
            sector_count * components,
            precomputed.sector_centers.data.len(),
        )?;
        if let Some(dens) = &precomputed.dens {
            Self::validate_density(dens, n)?;
        }
        if let Some(sens) = &precomputed.sens {
            Self::validate_sensitivity(sens, img_dims)?;
        }

        Self::validate_offsets(&precomputed.sector_data_count.data, n)?;
        Self::validate_permutation(&precomputed.data_indices.data)?;
        // Only balanced variants keep the order
        if let Some(payload) = maximum_payload {
            Self::validate_processing_order(
                &precomputed.sector_processing_order.data,
                &precomputed.sector_data_count.data,
                payload,
            )?;
        }
        Ok(())
    }

    /// Validate a sector offset table: starts at 0, ends at `n`, non-decreasing.
    pub fn validate_offsets(offsets: &[usize], n: usize) -> Result<(), NufftError> {
        match (offsets.first(), offsets.last()) {
            (Some(&0), Some(&last)) if last == n => {}
            _ => {
                return Err(NufftError::InvalidPrecomputed(format!(
                    "sector offsets must run from 0 to {n}"
                )));
            }
        }
        if let Some(s) = offsets.windows(2).position(|w| w[0] > w[1]) {
            return Err(NufftError::InvalidPrecomputed(format!(
                "sector offsets decrease at sector {s}"
            )));
        }
        Ok(())
    }

    /// Validate that `indices` is a bijection on `[0, indices.len())`.
    pub fn validate_permutation(indices: &[usize]) -> Result<(), NufftError> {
        let n = indices.len();
        let mut seen = vec![false; n];
        for (k, &i) in indices.iter().enumerate() {
            if i >= n || seen[i] {
                return Err(NufftError::InvalidPrecomputed(format!(
                    "data_indices[{k}]={i} is not part of a permutation of 0..{n}"
                )));
            }
            seen[i] = true;
        }
        Ok(())
    }

    /// Validate that a balanced order covers every sample exactly once.
    pub fn validate_processing_order(
        order: &[ProcessingChunk],
        offsets: &[usize],
        maximum_payload: usize,
    ) -> Result<(), NufftError> {
        check_processing_order(order, offsets, maximum_payload)
    }
}
