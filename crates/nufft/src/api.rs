//! High-level API for operator construction.
//!
//! ## Purpose
//!
//! This module provides the user-facing entry point: a fluent builder that
//! fixes the variant-selecting options once, and the factory it produces,
//! which builds operators from trajectories (forward path) or from
//! precomputed state (load path).
//!
//! ## Design notes
//!
//! * **Ergonomic**: Every option has a default; `OperatorFactoryBuilder::new().build()`
//!   yields a factory for the default lookup-table variant.
//! * **Validated**: Options are validated when `.build()` is called.
//! * **Extensible**: Extension crates inject accelerated passes through hidden
//!   setters before calling `.build()`.
//!
//! ## Key concepts
//!
//! ### Configuration Flow
//!
//! 1. Create an [`OperatorFactoryBuilder`].
//! 2. Chain configuration methods (`.interpolation_type()`, `.balance_workload()`, ...).
//! 3. Call `.build()` to obtain an [`OperatorFactory`].
//! 4. Call `.create_operator()` or `.load_precomputed()` per trajectory.

// External dependencies
use num_complex::Complex;
use num_traits::Float;

// Internal dependencies
use crate::engine::executor::{
    AssignPassFn, OperatorConfig, OperatorExecutor, PermutePassFn, SortPassFn,
};
use crate::engine::validator::Validator;
use crate::primitives::backend::Backend;

// Publicly re-exported types
pub use crate::algorithms::processing_order::{DEFAULT_MAXIMUM_PAYLOAD, ProcessingChunk};
pub use crate::operator::core::OperatorParams;
pub use crate::operator::precomputed::PrecomputedOperator;
pub use crate::operator::transform::{GriddingPlan, TransformExecutor};
pub use crate::operator::{GriddingOperator, InterpolationType, Operator, OperatorType};
pub use crate::primitives::buffer::Array;
pub use crate::primitives::dimensions::Dimensions;
pub use crate::primitives::errors::NufftError;

// ============================================================================
// Builder
// ============================================================================

/// Fluent builder for configuring an operator factory.
#[derive(Debug, Clone)]
pub struct OperatorFactoryBuilder<T> {
    /// Kernel interpolation mode (default: const lookup).
    pub interpolation_type: Option<InterpolationType>,

    /// Build balanced variants (default: false).
    pub balance_workload: Option<bool>,

    /// Upper bound on samples per balanced chunk.
    pub maximum_payload: Option<usize>,

    // ++++++++++++++++++++++++++++++++++++++
    // +               DEV                  +
    // ++++++++++++++++++++++++++++++++++++++
    /// Custom assignment pass function.
    #[doc(hidden)]
    pub custom_assign_pass: Option<AssignPassFn<T>>,

    /// Custom sort pass function.
    #[doc(hidden)]
    pub custom_sort_pass: Option<SortPassFn>,

    /// Custom permutation pass function.
    #[doc(hidden)]
    pub custom_permute_pass: Option<PermutePassFn<T>>,

    /// Execution backend hint.
    #[doc(hidden)]
    pub backend: Option<Backend>,

    /// Parallel execution hint.
    #[doc(hidden)]
    pub parallel: Option<bool>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl<T: Float> Default for OperatorFactoryBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> OperatorFactoryBuilder<T> {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            interpolation_type: None,
            balance_workload: None,
            maximum_payload: None,
            custom_assign_pass: None,
            custom_sort_pass: None,
            custom_permute_pass: None,
            backend: None,
            parallel: None,
            duplicate_param: None,
        }
    }

    /// Set the kernel interpolation mode.
    pub fn interpolation_type(mut self, interpolation: InterpolationType) -> Self {
        if self.interpolation_type.is_some() {
            self.duplicate_param = Some("interpolation_type");
        }
        self.interpolation_type = Some(interpolation);
        self
    }

    /// Enable or disable balanced chunk scheduling.
    pub fn balance_workload(mut self, balance: bool) -> Self {
        if self.balance_workload.is_some() {
            self.duplicate_param = Some("balance_workload");
        }
        self.balance_workload = Some(balance);
        self
    }

    /// Set the upper bound on samples per balanced chunk.
    pub fn maximum_payload(mut self, payload: usize) -> Self {
        if self.maximum_payload.is_some() {
            self.duplicate_param = Some("maximum_payload");
        }
        self.maximum_payload = Some(payload);
        self
    }

    /// Set the execution backend hint.
    #[doc(hidden)]
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set parallel execution hint.
    #[doc(hidden)]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Set a custom assignment pass function.
    #[doc(hidden)]
    pub fn custom_assign_pass(mut self, pass: AssignPassFn<T>) -> Self {
        self.custom_assign_pass = Some(pass);
        self
    }

    /// Set a custom sort pass function.
    #[doc(hidden)]
    pub fn custom_sort_pass(mut self, pass: SortPassFn) -> Self {
        self.custom_sort_pass = Some(pass);
        self
    }

    /// Set a custom permutation pass function.
    #[doc(hidden)]
    pub fn custom_permute_pass(mut self, pass: PermutePassFn<T>) -> Self {
        self.custom_permute_pass = Some(pass);
        self
    }

    /// Validate the configuration and build the factory.
    pub fn build(self) -> Result<OperatorFactory<T>, NufftError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;

        let maximum_payload = self.maximum_payload.unwrap_or(DEFAULT_MAXIMUM_PAYLOAD);
        Validator::validate_maximum_payload(maximum_payload)?;

        let config = OperatorConfig {
            interpolation: self.interpolation_type.unwrap_or_default(),
            balance_workload: self.balance_workload.unwrap_or(false),
            maximum_payload,
            custom_assign_pass: self.custom_assign_pass,
            custom_sort_pass: self.custom_sort_pass,
            custom_permute_pass: self.custom_permute_pass,
        };

        Ok(OperatorFactory {
            executor: OperatorExecutor::new(config),
        })
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Builds gridding operators of one configured variant.
#[derive(Debug, Clone)]
pub struct OperatorFactory<T> {
    executor: OperatorExecutor<T>,
}

impl<T: Float> OperatorFactory<T> {
    /// Variant this factory creates.
    pub fn operator_type(&self) -> OperatorType {
        self.executor.config().operator_type()
    }

    /// Upper bound on samples per balanced chunk.
    pub fn maximum_payload(&self) -> usize {
        self.executor.config().maximum_payload
    }

    /// Build an operator from an unordered trajectory.
    ///
    /// `trajectory` is component-major (all x, then all y, then all z) with
    /// its logical length set to the sample count. `density` holds one weight
    /// per sample; `sensitivity` holds one complex value per image element and
    /// coil.
    pub fn create_operator(
        &self,
        trajectory: &Array<T>,
        density: Option<&Array<T>>,
        sensitivity: Option<Array<Complex<T>>>,
        params: OperatorParams<T>,
    ) -> Result<Operator<T>, NufftError> {
        self.executor
            .build_operator(trajectory, density, sensitivity, params)
    }

    /// Build an operator from precomputed state, without recomputation.
    pub fn load_precomputed(
        &self,
        precomputed: PrecomputedOperator<T>,
        params: OperatorParams<T>,
    ) -> Result<Operator<T>, NufftError> {
        self.executor.load_operator(precomputed, params)
    }
}
