//! High-level API for operator construction with parallel execution support.
//!
//! ## Purpose
//!
//! This module wraps the `nufft` factory builder and injects accelerated
//! construction passes: rayon passes on the CPU backend (default) or wgpu
//! passes on the GPU backend.
//!
//! ## Design notes
//!
//! * **Fluent Integration**: Re-uses the base `nufft` builder pattern.
//! * **Parallel-First**: Defaults to parallel execution.
//! * **Injected once**: Passes are resolved in `build()`, so every operator
//!   of a factory is built the same way.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`ParallelOperatorFactoryBuilder`] via `Nufft::new()`.
//! 2. Chain configuration methods (`.balance_workload()`, `.backend()`, ...).
//! 3. Call `.build()` and create operators from slices, vectors or ndarrays.

// Feature-gated imports
#[cfg(feature = "cpu")]
use crate::engine::executor::{assign_pass_parallel, permute_pass_parallel, sort_pass_parallel};
#[cfg(feature = "gpu")]
use crate::engine::gpu::{assign_pass_gpu, permute_pass_gpu};

// External dependencies
use log::debug;
use num_complex::Complex;
use num_traits::Float;

// Export dependencies from nufft crate
use nufft::internals::api::OperatorFactory;
use nufft::internals::api::OperatorFactoryBuilder;

// Publicly re-exported types
pub use nufft::internals::api::{
    Array, DEFAULT_MAXIMUM_PAYLOAD, Dimensions, GriddingOperator, GriddingPlan,
    InterpolationType, NufftError, Operator, OperatorParams, OperatorType, PrecomputedOperator,
    ProcessingChunk, TransformExecutor,
};
pub use nufft::internals::primitives::backend::Backend;

// Internal dependencies
use crate::input::NufftInput;

// ============================================================================
// Extended Factory Builder
// ============================================================================

/// Builder for an operator factory with parallel support.
#[derive(Debug, Clone)]
pub struct ParallelOperatorFactoryBuilder<T: Float> {
    /// Base builder from the nufft crate
    pub base: OperatorFactoryBuilder<T>,
}

impl<T: Float> Default for ParallelOperatorFactoryBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> ParallelOperatorFactoryBuilder<T> {
    /// Create a new builder.
    ///
    /// # Defaults
    ///
    /// * All base parameters from the nufft `OperatorFactoryBuilder`
    /// * parallel: true (fastNufft extension)
    pub fn new() -> Self {
        let base = OperatorFactoryBuilder::new().parallel(true);
        Self { base }
    }

    /// Set parallel execution mode.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.base = self.base.parallel(parallel);
        self
    }

    /// Set the execution backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.base = self.base.backend(backend);
        self
    }

    /// Set the kernel interpolation mode.
    pub fn interpolation_type(mut self, interpolation: InterpolationType) -> Self {
        self.base = self.base.interpolation_type(interpolation);
        self
    }

    /// Enable or disable balanced chunk scheduling.
    pub fn balance_workload(mut self, balance: bool) -> Self {
        self.base = self.base.balance_workload(balance);
        self
    }

    /// Set the upper bound on samples per balanced chunk.
    pub fn maximum_payload(mut self, payload: usize) -> Self {
        self.base = self.base.maximum_payload(payload);
        self
    }
}

impl<T: Float + Send + Sync + 'static> ParallelOperatorFactoryBuilder<T> {
    /// Inject the passes for the selected backend and build the factory.
    pub fn build(self) -> Result<ParallelOperatorFactory<T>, NufftError> {
        let mut builder = self.base;
        let backend = builder.backend.unwrap_or(Backend::CPU);

        match backend {
            Backend::CPU => {
                #[cfg(feature = "cpu")]
                {
                    if builder.parallel.unwrap_or(true) {
                        builder = builder
                            .custom_assign_pass(assign_pass_parallel)
                            .custom_sort_pass(sort_pass_parallel)
                            .custom_permute_pass(permute_pass_parallel);
                    } else {
                        builder.custom_assign_pass = None;
                        builder.custom_sort_pass = None;
                        builder.custom_permute_pass = None;
                    }
                }
                #[cfg(not(feature = "cpu"))]
                {
                    // Fallback to sequential if cpu feature is disabled
                    builder.custom_assign_pass = None;
                    builder.custom_sort_pass = None;
                    builder.custom_permute_pass = None;
                }
            }
            Backend::GPU => {
                #[cfg(feature = "gpu")]
                {
                    builder = builder
                        .custom_assign_pass(assign_pass_gpu)
                        .custom_sort_pass(sort_pass_parallel)
                        .custom_permute_pass(permute_pass_gpu);
                }
                #[cfg(not(feature = "gpu"))]
                {
                    return Err(NufftError::UnsupportedFeature {
                        target: "OperatorFactory",
                        feature: "GPU backend (requires 'gpu' feature)",
                    });
                }
            }
        }

        debug!(
            "operator factory uses {:?} backend (parallel: {})",
            backend,
            builder.parallel.unwrap_or(true)
        );

        Ok(ParallelOperatorFactory {
            factory: builder.build()?,
        })
    }
}

// ============================================================================
// Extended Factory
// ============================================================================

/// Operator factory with accelerated construction passes.
#[derive(Debug, Clone)]
pub struct ParallelOperatorFactory<T: Float> {
    factory: OperatorFactory<T>,
}

impl<T: Float> ParallelOperatorFactory<T> {
    /// Variant this factory creates.
    pub fn operator_type(&self) -> OperatorType {
        self.factory.operator_type()
    }

    /// Build an operator from a component-major trajectory.
    pub fn create_operator<I>(
        &self,
        trajectory: &I,
        params: OperatorParams<T>,
    ) -> Result<Operator<T>, NufftError>
    where
        I: NufftInput<T> + ?Sized,
    {
        let trajectory = Self::to_trajectory(trajectory, &params)?;
        self.factory
            .create_operator(&trajectory, None, None, params)
    }

    /// Build an operator with density compensation and optional sensitivities.
    pub fn create_operator_with<I1, I2>(
        &self,
        trajectory: &I1,
        density: &I2,
        sensitivity: Option<Array<Complex<T>>>,
        params: OperatorParams<T>,
    ) -> Result<Operator<T>, NufftError>
    where
        I1: NufftInput<T> + ?Sized,
        I2: NufftInput<T> + ?Sized,
    {
        let trajectory = Self::to_trajectory(trajectory, &params)?;
        let density = Array::linear(density.as_nufft_slice()?.to_vec());
        self.factory
            .create_operator(&trajectory, Some(&density), sensitivity, params)
    }

    /// Build an operator from precomputed state, without recomputation.
    pub fn load_precomputed(
        &self,
        precomputed: PrecomputedOperator<T>,
        params: OperatorParams<T>,
    ) -> Result<Operator<T>, NufftError> {
        self.factory.load_precomputed(precomputed, params)
    }

    fn to_trajectory<I>(trajectory: &I, params: &OperatorParams<T>) -> Result<Array<T>, NufftError>
    where
        I: NufftInput<T> + ?Sized,
    {
        let coords = trajectory.as_nufft_slice()?;
        let components = params.img_dims.coordinate_components();
        // An (N, d) array would be read as scrambled component-major data
        if let Some(rows) = trajectory.component_rows() {
            if rows != components {
                return Err(NufftError::MismatchedLength {
                    name: "trajectory rows",
                    expected: components,
                    got: rows,
                });
            }
        }
        if coords.len() % components != 0 {
            return Err(NufftError::MismatchedLength {
                name: "trajectory",
                expected: coords.len().next_multiple_of(components),
                got: coords.len(),
            });
        }
        Ok(Array::trajectory(coords.to_vec(), coords.len() / components))
    }
}
