//! Layer 5: Engine
//!
//! # Purpose
//!
//! This layer orchestrates operator construction. It validates inputs,
//! resolves the execution strategy and runs the assignment, sort,
//! permutation, histogram and planning stages before handing the derived
//! arrays to the operator layer.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine ← You are here
//!   ↓
//! Layer 4: Operator
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Construction pipeline.
pub mod executor;

/// Validation utilities.
pub mod validator;
