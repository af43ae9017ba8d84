//! # fastNufft — Parallel and GPU operator construction
//!
//! Extends the `nufft` operator factory with accelerated construction passes:
//!
//! - **`cpu`** (default): sector assignment, the sort by sector id and the
//!   sample permutation run on all cores via `rayon`.
//! - **`gpu`**: sector assignment and sample permutation run as `wgpu` compute
//!   shaders; the sort stays on the host.
//!
//! Trajectories and density weights may be passed as slices, vectors or
//! `ndarray` arrays. A 2D trajectory array has shape `(d, N)` in standard
//! layout.
//!
//! ## Quick Start
//!
//! ```rust
//! use fastNufft::prelude::*;
//! use ndarray::array;
//!
//! // Four samples, rows are the x and y components
//! let trajectory = array![[-0.4, -0.3, 0.2, 0.3], [-0.4, -0.2, 0.3, 0.4]];
//! let params = OperatorParams::new(3, 4, 1.0, Dimensions::new_2d(8, 8));
//!
//! let factory = Nufft::new()
//!     .balance_workload(true)   // Balanced variant
//!     .build()?;                // Parallel CPU passes by default
//! let operator = factory.create_operator(&trajectory, params)?;
//!
//! assert_eq!(operator.operator_type(), OperatorType::Balanced);
//! assert_eq!(operator.sector_data_count().as_slice(), &[0, 2, 2, 2, 4]);
//! # Result::<(), NufftError>::Ok(())
//! ```
//!
//! Sequential, parallel and GPU construction produce identical operators.

#![allow(non_snake_case)]

/// GPU-accelerated construction passes.
#[cfg(feature = "gpu")]
pub mod gpu {
    pub use crate::engine::gpu::{
        assign_pass_gpu, near_sector_boundary, permute_pass_gpu, refine_boundary_samples,
    };
}

// Layer 5: Engine - accelerated construction passes.
mod engine;

// High-level fluent API for operator construction.
mod api;

// Input data handling.
mod input;

// Standard fastNufft prelude.
pub mod prelude {
    pub use crate::api::{
        Array, Backend::CPU, Backend::GPU, DEFAULT_MAXIMUM_PAYLOAD, Dimensions,
        GriddingOperator, GriddingPlan, InterpolationType, NufftError, Operator, OperatorParams,
        OperatorType, ParallelOperatorFactory, ParallelOperatorFactoryBuilder as Nufft,
        PrecomputedOperator, ProcessingChunk, TransformExecutor,
    };
    pub use crate::input::NufftInput;
}

// Internal modules for development and testing.
#[doc(hidden)]
pub mod internals {
    pub mod engine {
        pub use crate::engine::*;
    }
    pub mod api {
        pub use crate::api::*;
    }
    pub mod input {
        pub use crate::input::*;
    }
}
