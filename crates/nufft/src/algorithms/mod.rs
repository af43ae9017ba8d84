//! Layer 3: Algorithms
//!
//! # Purpose
//!
//! This layer implements the individual stages of operator construction:
//! sample-to-sector assignment, permutation of per-sample arrays, the
//! per-sector offset histogram and the balanced processing order.
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
//! Layer 3: Algorithms ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Sample-to-sector assignment.
pub mod assignment;

/// Sorted reordering of per-sample arrays.
pub mod permutation;

/// Per-sector offsets.
pub mod histogram;

/// Balanced chunk scheduling.
pub mod processing_order;
