//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides pure mathematical functions over the sector grid:
//! sector counts, coordinate-to-sector mapping, linearisation and sector
//! centers. Nothing here allocates except the center tables.
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
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Sector grid geometry.
pub mod geometry;
