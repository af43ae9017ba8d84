//! Tests for sector grid geometry.
//!
//! These tests verify the geometric helpers used during operator construction:
//! - Sector counts per axis and total sector counts
//! - Mapping of normalised coordinates to sector indices
//! - Row-major linearisation
//! - Sector centers
//!
//! ## Test Organization
//!
//! 1. **Dimensions** - Element counts and oversampling
//! 2. **Sector Counts** - Ceil division and sector grid shapes
//! 3. **Coordinate Mapping** - Clamping and edge values
//! 4. **Centers** - Per-sector center tables

use nufft::internals::math::geometry::{
    linearize_2d, linearize_3d, sector_center, sector_centers_2d, sector_centers_3d,
    sector_count_per_dim, sector_dims, sector_mapping, sector_of_2d, sector_of_3d,
    total_sector_count,
};
use nufft::internals::primitives::dimensions::Dimensions;

// ============================================================================
// Dimensions Tests
// ============================================================================

/// Test element counts for image, volume and linear shapes.
#[test]
fn test_dimensions_count() {
    assert_eq!(Dimensions::new_2d(8, 8).count(), 64);
    assert_eq!(Dimensions::new_3d(4, 5, 6).count(), 120);
    assert_eq!(Dimensions::linear(10).count(), 10);
    assert_eq!(Dimensions::default().count(), 0);

    // Channels never contribute
    assert_eq!(Dimensions::new_2d(8, 8).with_channels(4).count(), 64);
}

/// Test dimensionality and channel helpers.
#[test]
fn test_dimensions_helpers() {
    let img = Dimensions::new_2d(8, 8);
    assert!(img.is_2d());
    assert_eq!(img.coordinate_components(), 2);
    assert_eq!(img.channel_count(), 1);

    let vol = Dimensions::new_3d(8, 8, 8).with_channels(3);
    assert!(!vol.is_2d());
    assert_eq!(vol.coordinate_components(), 3);
    assert_eq!(vol.channel_count(), 3);
}

/// Test that oversampling truncates each extent and keeps 2D shapes 2D.
#[test]
fn test_dimensions_oversampled() {
    let grid = Dimensions::new_2d(8, 7).oversampled(1.5);
    assert_eq!(grid.width, 12);
    assert_eq!(grid.height, 10);
    assert_eq!(grid.depth, 0);

    let grid = Dimensions::new_3d(10, 10, 10).oversampled(1.25_f32);
    assert_eq!((grid.width, grid.height, grid.depth), (12, 12, 12));
}

// ============================================================================
// Sector Count Tests
// ============================================================================

/// Test ceil division of grid extents by the sector width.
#[test]
fn test_sector_count_per_dim() {
    assert_eq!(sector_count_per_dim(8, 4), 2);
    assert_eq!(sector_count_per_dim(10, 4), 3);
    assert_eq!(sector_count_per_dim(1, 4), 1);
    assert_eq!(sector_count_per_dim(0, 4), 0);
}

/// Test sector grid shapes and totals.
#[test]
fn test_sector_dims_and_totals() {
    let dims = sector_dims(&Dimensions::new_2d(8, 8), 4);
    assert_eq!((dims.width, dims.height, dims.depth), (2, 2, 0));
    assert!(dims.is_2d());

    assert_eq!(total_sector_count(&Dimensions::new_2d(8, 8), 4), 4);
    assert_eq!(total_sector_count(&Dimensions::new_2d(12, 12), 4), 9);
    assert_eq!(total_sector_count(&Dimensions::new_3d(8, 8, 8), 4), 8);
    assert_eq!(total_sector_count(&Dimensions::new_3d(64, 64, 64), 8), 512);
}

// ============================================================================
// Coordinate Mapping Tests
// ============================================================================

/// Test mapping of in-range coordinates.
#[test]
fn test_sector_mapping_in_range() {
    assert_eq!(sector_mapping(-0.5, 2), 0);
    assert_eq!(sector_mapping(-0.01, 2), 0);
    assert_eq!(sector_mapping(0.0, 2), 1);
    assert_eq!(sector_mapping(0.49, 2), 1);

    assert_eq!(sector_mapping(-0.5, 8), 0);
    assert_eq!(sector_mapping(-0.3, 8), 1);
    assert_eq!(sector_mapping(0.3, 8), 6);
}

/// Test clamping of out-of-range and non-finite coordinates.
#[test]
fn test_sector_mapping_clamps() {
    assert_eq!(sector_mapping(0.5, 4), 3);
    assert_eq!(sector_mapping(7.0, 4), 3);
    assert_eq!(sector_mapping(f64::INFINITY, 4), 3);
    assert_eq!(sector_mapping(-3.0, 4), 0);
    assert_eq!(sector_mapping(f64::NEG_INFINITY, 4), 0);
    assert_eq!(sector_mapping(f64::NAN, 4), 0);
    assert_eq!(sector_mapping(0.2, 0), 0);
}

/// Test row-major linearisation.
#[test]
fn test_linearize() {
    let dims2 = Dimensions::new_2d(2, 2);
    assert_eq!(linearize_2d(0, 0, &dims2), 0);
    assert_eq!(linearize_2d(1, 0, &dims2), 1);
    assert_eq!(linearize_2d(0, 1, &dims2), 2);
    assert_eq!(linearize_2d(1, 1, &dims2), 3);

    let dims3 = Dimensions::new_3d(2, 3, 4);
    assert_eq!(linearize_3d(1, 2, 3, &dims3), 1 + 2 * (2 + 3 * 3));
}

/// Test full 2D and 3D sample-to-sector mapping.
#[test]
fn test_sector_of_sample() {
    let dims2 = Dimensions::new_2d(2, 2);
    assert_eq!(sector_of_2d(-0.25, -0.25, &dims2), 0);
    assert_eq!(sector_of_2d(0.25, -0.25, &dims2), 1);
    assert_eq!(sector_of_2d(-0.25, 0.25, &dims2), 2);
    assert_eq!(sector_of_2d(0.25, 0.25, &dims2), 3);

    let dims3 = Dimensions::new_3d(2, 2, 2);
    assert_eq!(sector_of_3d(-0.25, -0.25, -0.25, &dims3), 0);
    assert_eq!(sector_of_3d(0.25, 0.25, 0.25, &dims3), 7);
    assert_eq!(sector_of_3d(0.25, -0.25, 0.25, &dims3), 5);
}

// ============================================================================
// Center Tests
// ============================================================================

/// Test single-axis centers.
#[test]
fn test_sector_center() {
    assert_eq!(sector_center(0, 4), 2);
    assert_eq!(sector_center(1, 4), 6);
    assert_eq!(sector_center(1, 5), 7);
    assert_eq!(sector_center(3, 1), 3);
}

/// Test 2D center table layout by linear sector id.
#[test]
fn test_sector_centers_2d() {
    let dims = Dimensions::new_2d(2, 2);
    assert_eq!(sector_centers_2d(&dims, 4), vec![2, 2, 6, 2, 2, 6, 6, 6]);
}

/// Test 3D center table layout by linear sector id.
#[test]
fn test_sector_centers_3d() {
    let dims = Dimensions::new_3d(2, 2, 2);
    let centers = sector_centers_3d(&dims, 8);

    assert_eq!(centers.len(), 24);
    assert_eq!(&centers[0..3], &[4, 4, 4]);
    // Sector 5 is (1, 0, 1)
    assert_eq!(&centers[15..18], &[12, 4, 12]);
    assert_eq!(&centers[21..24], &[12, 12, 12]);
}
