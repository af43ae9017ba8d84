//! Layer 5: Engine
//!
//! This layer provides the accelerated construction passes injected into the
//! `nufft` pipeline. It distributes per-sample work across CPU cores or GPU
//! hardware.

// Parallel construction passes using CPU threads
pub mod executor;

// GPU-accelerated construction passes using wgpu
#[cfg(feature = "gpu")]
pub mod gpu;
