//! Execution backend configuration for extension crates.
//!
//! ## Purpose
//!
//! This module defines the `Backend` enum used by extension crates (like
//! `fastNufft`) to select where sector assignment and sample permutation run.
//! The core `nufft` crate only ships the sequential passes; the enum is a
//! configuration hint the extension resolves into concrete passes.
//!
//! ## Invariants
//!
//! * The default backend is always `CPU`.

/// Execution backend hint for extension crates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::upper_case_acronyms)]
pub enum Backend {
    /// CPU execution (may still use parallelism via rayon).
    #[default]
    CPU,

    /// GPU execution (requires extension crate with GPU support).
    GPU,
}
