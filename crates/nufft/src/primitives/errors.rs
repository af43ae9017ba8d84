//! Error types for operator construction.
//!
//! ## Purpose
//!
//! This module defines the error conditions that can occur while building a
//! gridding operator, from argument validation through accelerated passes and
//! the precomputed load path.
//!
//! ## Design notes
//!
//! * **Contextual**: Errors carry the offending values (expected vs. actual lengths).
//! * **Deferred**: Builder misuse is recorded and reported at `build()`.
//! * **No-std**: Uses `alloc` for dynamic messages when `std` is disabled.
//!
//! ## Key concepts
//!
//! 1. **Argument validation**: channel counts, sector/kernel width, oversampling.
//! 2. **Shape validation**: buffer lengths against sample and sector counts.
//! 3. **Precomputed state**: inconsistent arrays handed to the load path.
//! 4. **Backend failures**: accelerated passes that could not run.
//!
//! ## Invariants
//!
//! * Every variant is raised before an operator escapes the factory.
//!
//! ## Non-goals
//!
//! * This module does not perform the validation itself (see `validator`).
//! * This module does not retry or recover from backend failures.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(feature = "std")]
use std::error::Error;
#[cfg(feature = "std")]
use std::string::String;

// External dependencies
use core::fmt::{Display, Formatter, Result};

// ============================================================================
// Error Type
// ============================================================================

/// Error type for operator construction.
#[derive(Debug, Clone, PartialEq)]
pub enum NufftError {
    /// The trajectory carries more than one channel; callers loop per channel.
    InvalidTrajectoryChannels(usize),

    /// The image dimensions carry more than one channel.
    InvalidImageChannels(usize),

    /// Sector width must be at least 1.
    InvalidSectorWidth(usize),

    /// Kernel width must be at least 1.
    InvalidKernelWidth(usize),

    /// Oversampling ratio must be positive and finite.
    InvalidOversampling(f64),

    /// Balanced chunks need a payload of at least one sample.
    InvalidMaximumPayload(usize),

    /// A buffer does not have the length implied by the other inputs.
    MismatchedLength {
        /// Name of the offending buffer.
        name: &'static str,
        /// Expected number of elements.
        expected: usize,
        /// Actual number of elements.
        got: usize,
    },

    /// Input data contains NaN or infinite values.
    InvalidNumericValue(String),

    /// Precomputed operator state is internally inconsistent.
    InvalidPrecomputed(String),

    /// The selected operator or backend does not support the requested feature.
    UnsupportedFeature {
        /// Operator variant or backend name.
        target: &'static str,
        /// Name of the unsupported feature.
        feature: &'static str,
    },

    /// Parameter was set multiple times in the builder.
    DuplicateParameter {
        /// Name of the parameter that was set multiple times.
        parameter: &'static str,
    },

    /// An accelerated pass failed; construction is aborted.
    Backend(String),
}

// ============================================================================
// Display Implementation
// ============================================================================

impl Display for NufftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::InvalidTrajectoryChannels(c) => write!(
                f,
                "Trajectory dimension must not contain a channel size greater than 1 (got {c})"
            ),
            Self::InvalidImageChannels(c) => write!(
                f,
                "Image dimensions must not contain a channel size greater than 1 (got {c})"
            ),
            Self::InvalidSectorWidth(w) => write!(f, "Invalid sector width: {w} (must be > 0)"),
            Self::InvalidKernelWidth(w) => write!(f, "Invalid kernel width: {w} (must be > 0)"),
            Self::InvalidOversampling(osf) => {
                write!(f, "Invalid oversampling ratio: {osf} (must be > 0 and finite)")
            }
            Self::InvalidMaximumPayload(p) => {
                write!(f, "Invalid maximum payload: {p} (must be > 0)")
            }
            Self::MismatchedLength {
                name,
                expected,
                got,
            } => write!(
                f,
                "Length mismatch: {name} has {got} elements, expected {expected}"
            ),
            Self::InvalidNumericValue(s) => write!(f, "Invalid numeric value: {s}"),
            Self::InvalidPrecomputed(s) => write!(f, "Invalid precomputed operator: {s}"),
            Self::UnsupportedFeature { target, feature } => {
                write!(f, "'{target}' does not support feature: {feature}")
            }
            Self::DuplicateParameter { parameter } => write!(
                f,
                "Parameter '{parameter}' was set multiple times. Each parameter can only be configured once."
            ),
            Self::Backend(msg) => write!(f, "Backend failure: {msg}"),
        }
    }
}

// ============================================================================
// Standard Error Trait
// ============================================================================

#[cfg(feature = "std")]
impl Error for NufftError {}
