//! # nufft — Sector-partitioned NUFFT operator construction for Rust
//!
//! Builds the data layout a GPU gridding kernel needs to convert between
//! irregularly sampled k-space data and a regular image grid (forward and
//! adjoint non-uniform FFT).
//!
//! ## What is an operator?
//!
//! Gridding kernels process the oversampled image grid in cubic **sectors**.
//! Before a transform can run, every k-space sample has to be assigned to the
//! sector it falls into, the samples have to be sorted so that each sector's
//! samples are contiguous, and per-sector offsets have to be recorded. An
//! operator owns the result of that preprocessing:
//!
//! - the sector-sorted trajectory and the permutation back to caller order,
//! - CSR-style per-sector offsets,
//! - the integer center of every sector,
//! - for balanced variants, a list of bounded-size work chunks.
//!
//! ## Quick Start
//!
//! ```rust
//! use nufft::prelude::*;
//!
//! // Four samples in an 8x8 image, component-major (all x, then all y)
//! let coords = vec![-0.4, -0.3, 0.2, 0.3, -0.4, -0.2, 0.3, 0.4];
//! let trajectory = Array::trajectory(coords, 4);
//! let params = OperatorParams::new(3, 4, 1.0, Dimensions::new_2d(8, 8));
//!
//! let factory = Nufft::new().build()?;
//! let operator = factory.create_operator(&trajectory, None, None, params)?;
//!
//! assert_eq!(operator.operator_type(), OperatorType::Default);
//! assert_eq!(operator.sector_data_count().as_slice(), &[0, 2, 2, 2, 4]);
//! # Result::<(), NufftError>::Ok(())
//! ```
//!
//! ### Balanced Workload
//!
//! ```rust
//! use nufft::prelude::*;
//!
//! let coords = vec![-0.4; 6].into_iter().chain(vec![-0.3; 6]).collect::<Vec<f64>>();
//! let trajectory = Array::trajectory(coords, 6);
//! let params = OperatorParams::new(3, 4, 1.0, Dimensions::new_2d(8, 8));
//!
//! let factory = Nufft::new()
//!     .balance_workload(true)   // Split heavy sectors into chunks
//!     .maximum_payload(4)       // At most 4 samples per chunk
//!     .build()?;
//! let operator = factory.create_operator(&trajectory, None, None, params)?;
//!
//! let order = operator.sector_processing_order().unwrap();
//! assert_eq!(order.as_slice(), &[ProcessingChunk::new(0, 0), ProcessingChunk::new(0, 4)]);
//! # Result::<(), NufftError>::Ok(())
//! ```
//!
//! ### Result and Error Handling
//!
//! Construction returns `Result<Operator<T>, NufftError>`. Construction is
//! all-or-nothing: invalid inputs (multi-channel trajectories, zero sector
//! width, mismatched buffer lengths, non-finite coordinates) are rejected
//! before any work is done.
//!
//! ## Running Transforms
//!
//! The convolution and FFT kernels are not part of this crate. Implement
//! [`prelude::TransformExecutor`] for them and call
//! `perform_adjoint`/`perform_forward` on the operator, which take care of
//! moving data between caller order and sector-sorted order.
//!
//! ## Logging
//!
//! Construction stages emit `debug!`/`trace!` records through the `log`
//! facade. No logger is installed by the library.
//!
//! ## Minimal Usage (no_std)
//!
//! ```toml
//! [dependencies]
//! nufft = { version = "0.3", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

// Layer 1: Primitives - data structures and basic utilities.
mod primitives;

// Layer 2: Math - sector grid geometry.
mod math;

// Layer 3: Algorithms - construction stages.
mod algorithms;

// Layer 4: Operator - the operator family.
mod operator;

// Layer 5: Engine - orchestration and validation.
mod engine;

// High-level fluent API for operator construction.
mod api;

// Standard nufft prelude.
pub mod prelude {
    pub use crate::api::{
        Array, DEFAULT_MAXIMUM_PAYLOAD, Dimensions, GriddingOperator, GriddingPlan,
        InterpolationType, NufftError, Operator, OperatorFactory,
        OperatorFactoryBuilder as Nufft, OperatorParams, OperatorType, PrecomputedOperator,
        ProcessingChunk, TransformExecutor,
    };
}

// Internal modules for extension crates and integration tests.
#[doc(hidden)]
pub mod internals {
    pub mod primitives {
        pub use crate::primitives::*;
    }
    pub mod math {
        pub use crate::math::*;
    }
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    pub mod operator {
        pub use crate::operator::*;
    }
    pub mod engine {
        pub use crate::engine::*;
    }
    pub mod api {
        pub use crate::api::*;
    }
}
