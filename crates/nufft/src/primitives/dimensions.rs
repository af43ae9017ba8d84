//! Logical shapes for images, grids and linear buffers.
//!
//! ## Purpose
//!
//! `Dimensions` describes the extent of an image (width × height × depth),
//! of the oversampled grid, of the sector grid, or of a linear buffer
//! (length). A zero extent means "unused": a zero depth selects 2D
//! processing and counts as 1 when computing element counts.
//!
//! ## Invariants
//!
//! * `count()` is the product of the non-zero spatial extents, or 0 when
//!   every extent is zero.
//! * `channels` never contributes to `count()`.

use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Logical extent of an array, image or grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dimensions {
    /// Element count of a linear buffer (0 for image-shaped dims).
    pub length: usize,

    /// Extent along x.
    pub width: usize,

    /// Extent along y.
    pub height: usize,

    /// Extent along z (0 in 2D).
    pub depth: usize,

    /// Channel (coil) count; 0 and 1 both mean a single channel.
    pub channels: usize,
}

impl Dimensions {
    /// Shape of a 2D image.
    pub fn new_2d(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Shape of a 3D volume.
    pub fn new_3d(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
            ..Self::default()
        }
    }

    /// Shape of a linear buffer holding `length` logical elements.
    pub fn linear(length: usize) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }

    /// Replace the channel count.
    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    /// Number of logical elements, treating zero extents as 1.
    pub fn count(&self) -> usize {
        let extents = [self.length, self.width, self.height, self.depth];
        if extents.iter().all(|&e| e == 0) {
            return 0;
        }
        extents.iter().map(|&e| e.max(1)).product()
    }

    /// Effective channel count (at least 1).
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channels.max(1)
    }

    /// Whether these dims describe a 2D image (no depth).
    #[inline]
    pub fn is_2d(&self) -> bool {
        self.depth == 0
    }

    /// Number of coordinate components per sample for this image shape.
    #[inline]
    pub fn coordinate_components(&self) -> usize {
        if self.is_2d() { 2 } else { 3 }
    }

    /// Scale the spatial extents by the oversampling ratio, truncating.
    ///
    /// A zero depth stays zero so the oversampled grid keeps the image's
    /// dimensionality.
    pub fn oversampled<T: Float>(&self, osf: T) -> Self {
        let scale = |e: usize| -> usize {
            T::from(e)
                .map(|v| (v * osf).floor())
                .and_then(|v| v.to_usize())
                .unwrap_or(0)
        };
        Self {
            length: self.length,
            width: scale(self.width),
            height: scale(self.height),
            depth: scale(self.depth),
            channels: self.channels,
        }
    }
}
