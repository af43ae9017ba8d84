//! Layer 1: Primitives
//!
//! # Purpose
//!
//! This layer provides the shapes, buffers, errors and sorting utilities used
//! throughout the crate. It has zero internal dependencies within the crate.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Operator
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Image, grid and buffer shapes.
pub mod dimensions;

/// Owned buffers with a logical shape.
pub mod buffer;

/// Sector sorting and permutation.
pub mod sorting;

/// Shared error types.
pub mod errors;

/// Execution backend configuration.
pub mod backend;
