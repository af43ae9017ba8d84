//! Tests for the operator factory.
//!
//! These tests verify the forward and load paths end to end:
//! - Sorting, offsets and centers of created operators
//! - Variant selection from the factory options
//! - Rejection of invalid configuration, parameters and inputs
//! - Round trips through precomputed state
//!
//! ## Test Organization
//!
//! 1. **Forward Path** - Operators built from trajectories
//! 2. **Variant Selection** - Interpolation and balancing options
//! 3. **Validation** - Builder, parameter and input errors
//! 4. **Load Path** - Precomputed state and its consistency checks
//! 5. **Processing Order** - Replacing the balanced chunk list

use approx::assert_relative_eq;
use num_complex::Complex;

use nufft::prelude::*;

// ============================================================================
// Helper Functions
// ============================================================================

/// Sector pattern of ten samples over a 2x2 sector grid.
const PATTERN: [usize; 10] = [0, 3, 0, 0, 3, 0, 3, 0, 0, 3];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Component-major trajectory whose samples follow [`PATTERN`].
fn patterned_trajectory() -> Array<f64> {
    let xs = PATTERN
        .iter()
        .enumerate()
        .map(|(i, &s)| if s == 0 { -0.25 - 0.01 * i as f64 } else { 0.25 + 0.01 * i as f64 });
    let ys = PATTERN
        .iter()
        .map(|&s| if s == 0 { -0.3 } else { 0.3 });
    Array::trajectory(xs.chain(ys).collect(), PATTERN.len())
}

fn params_8x8() -> OperatorParams<f64> {
    OperatorParams::new(3, 4, 1.0, Dimensions::new_2d(8, 8))
}

fn factory(balance: bool, payload: usize) -> OperatorFactory<f64> {
    Nufft::new()
        .balance_workload(balance)
        .maximum_payload(payload)
        .build()
        .unwrap()
}

// ============================================================================
// Forward Path Tests
// ============================================================================

/// Test sorting and offsets for the patterned trajectory.
#[test]
fn test_create_default_operator() {
    init_logging();
    let op = Nufft::new()
        .build()
        .unwrap()
        .create_operator(&patterned_trajectory(), None, None, params_8x8())
        .unwrap();

    assert_eq!(op.operator_type(), OperatorType::Default);
    assert_eq!(
        op.data_indices().as_slice(),
        &[0, 2, 3, 5, 7, 8, 1, 4, 6, 9]
    );
    assert_eq!(op.sector_data_count().as_slice(), &[0, 6, 6, 6, 10]);
    assert_eq!(op.sector_centers().as_slice(), &[2, 2, 6, 2, 2, 6, 6, 6]);
    assert!(op.sector_processing_order().is_none());
    assert!(op.maximum_payload().is_none());
    assert!(op.dens().is_none());
    assert!(op.sens().is_none());
}

/// Test that the sorted trajectory is the original one gathered by `data_indices`.
#[test]
fn test_sorted_trajectory_matches_indices() {
    let traj = patterned_trajectory();
    let op = factory(false, DEFAULT_MAXIMUM_PAYLOAD)
        .create_operator(&traj, None, None, params_8x8())
        .unwrap();

    let n = traj.count();
    let sorted = op.k_space_traj();
    assert_eq!(sorted.count(), n);
    for (j, &i) in op.data_indices().iter().enumerate() {
        for c in 0..2 {
            assert_relative_eq!(sorted[c * n + j], traj[c * n + i]);
        }
    }
}

/// Test geometry accessors of a created operator.
#[test]
fn test_operator_geometry() {
    let op = factory(false, DEFAULT_MAXIMUM_PAYLOAD)
        .create_operator(&patterned_trajectory(), None, None, params_8x8())
        .unwrap();

    assert!(op.is_2d());
    assert!(!op.is_3d());
    assert_eq!(op.kernel_width(), 3);
    assert_eq!(op.sector_width(), 4);
    assert_relative_eq!(op.osf(), 1.0);
    assert_eq!(op.img_dims(), Dimensions::new_2d(8, 8));
    assert_eq!(op.grid_dims(), Dimensions::new_2d(8, 8));
    assert_eq!(op.grid_sector_dims(), Dimensions::new_2d(2, 2));
}

/// Test that the balanced variant records the chunk list.
#[test]
fn test_create_balanced_operator() {
    let op = factory(true, 4)
        .create_operator(&patterned_trajectory(), None, None, params_8x8())
        .unwrap();

    assert_eq!(op.operator_type(), OperatorType::Balanced);
    assert_eq!(op.maximum_payload(), Some(4));
    assert_eq!(
        op.sector_processing_order().unwrap().as_slice(),
        &[
            ProcessingChunk::new(0, 0),
            ProcessingChunk::new(0, 4),
            ProcessingChunk::new(3, 0),
        ]
    );

    let op = factory(true, DEFAULT_MAXIMUM_PAYLOAD)
        .create_operator(&patterned_trajectory(), None, None, params_8x8())
        .unwrap();
    assert_eq!(
        op.sector_processing_order().unwrap().as_slice(),
        &[ProcessingChunk::new(0, 0), ProcessingChunk::new(3, 0)]
    );
}

/// Test that density is permuted alongside the trajectory and sensitivities are kept.
#[test]
fn test_density_and_sensitivity() {
    let density = Array::linear((0..10).map(|i| i as f64).collect());
    let sens_dims = Dimensions::new_2d(8, 8).with_channels(2);
    let sens = Array::new(vec![Complex::new(1.0, -1.0); 128], sens_dims);

    let op = factory(false, DEFAULT_MAXIMUM_PAYLOAD)
        .create_operator(
            &patterned_trajectory(),
            Some(&density),
            Some(sens.clone()),
            params_8x8(),
        )
        .unwrap();

    let expected: Vec<f64> = op.data_indices().iter().map(|&i| i as f64).collect();
    assert_eq!(op.dens().unwrap().as_slice(), expected.as_slice());
    assert_eq!(op.sens(), Some(&sens));
}

/// Test oversampling enlarges the sector grid.
#[test]
fn test_oversampled_grid() {
    let traj = Array::trajectory(vec![0.0, 0.0], 1);
    let params = OperatorParams::new(3, 4, 1.5, Dimensions::new_2d(8, 8));
    let op = factory(false, DEFAULT_MAXIMUM_PAYLOAD)
        .create_operator(&traj, None, None, params)
        .unwrap();

    assert_eq!(op.grid_dims(), Dimensions::new_2d(12, 12));
    assert_eq!(op.grid_sector_dims(), Dimensions::new_2d(3, 3));
    assert_eq!(op.sector_data_count().len(), 10);
    // The center sample falls in the middle sector
    assert_eq!(
        op.sector_data_count().as_slice(),
        &[0, 0, 0, 0, 0, 1, 1, 1, 1, 1]
    );
    assert_eq!(&op.sector_centers()[8..10], &[6, 6]);
}

/// Test a 3D volume.
#[test]
fn test_create_3d_operator() {
    let traj = Array::trajectory(vec![0.25, -0.25, -0.25, -0.25, 0.25, -0.25], 2);
    let params = OperatorParams::new(3, 4, 1.0, Dimensions::new_3d(8, 8, 8));
    let op = factory(false, DEFAULT_MAXIMUM_PAYLOAD)
        .create_operator(&traj, None, None, params)
        .unwrap();

    assert!(op.is_3d());
    assert_eq!(op.sector_centers().len(), 24);
    // Sample 1 is sector 0, sample 0 is sector 5
    assert_eq!(op.data_indices().as_slice(), &[1, 0]);
    assert_eq!(
        op.sector_data_count().as_slice(),
        &[0, 1, 1, 1, 1, 1, 2, 2, 2]
    );
    assert_eq!(op.core().sector_center(5), &[6, 2, 6]);
}

/// Test an empty trajectory.
#[test]
fn test_empty_trajectory() {
    let traj = Array::trajectory(Vec::<f64>::new(), 0);
    let op = factory(true, 4)
        .create_operator(&traj, None, None, params_8x8())
        .unwrap();

    assert_eq!(op.sector_data_count().as_slice(), &[0, 0, 0, 0, 0]);
    assert!(op.data_indices().is_empty());
    assert!(op.sector_processing_order().unwrap().is_empty());
}

/// Test single-precision construction.
#[test]
fn test_create_operator_f32() {
    let traj = Array::trajectory(vec![-0.25_f32, 0.25, -0.25, 0.25], 2);
    let params = OperatorParams::new(3, 4, 1.0_f32, Dimensions::new_2d(8, 8));
    let op = Nufft::<f32>::new()
        .build()
        .unwrap()
        .create_operator(&traj, None, None, params)
        .unwrap();

    assert_eq!(op.sector_data_count().as_slice(), &[0, 1, 1, 1, 2]);
}

// ============================================================================
// Variant Selection Tests
// ============================================================================

/// Test all four variants from the interpolation and balancing options.
#[test]
fn test_variant_selection() {
    let cases = [
        (InterpolationType::ConstLookup, false, OperatorType::Default),
        (InterpolationType::TextureLookup, false, OperatorType::Texture),
        (InterpolationType::ConstLookup, true, OperatorType::Balanced),
        (
            InterpolationType::Texture2dLookup,
            true,
            OperatorType::BalancedTexture,
        ),
    ];

    for (interp, balance, expected) in cases {
        let factory = Nufft::<f64>::new()
            .interpolation_type(interp)
            .balance_workload(balance)
            .build()
            .unwrap();
        assert_eq!(factory.operator_type(), expected);

        let op = factory
            .create_operator(&patterned_trajectory(), None, None, params_8x8())
            .unwrap();
        assert_eq!(op.operator_type(), expected);
        assert_eq!(op.interpolation_type(), interp);
        assert_eq!(op.sector_processing_order().is_some(), balance);
    }
}

/// Test integer interpolation codes.
#[test]
fn test_interpolation_from_code() {
    assert_eq!(InterpolationType::from(0), InterpolationType::ConstLookup);
    assert_eq!(InterpolationType::from(1), InterpolationType::TextureLookup);
    assert_eq!(InterpolationType::from(2), InterpolationType::Texture2dLookup);
    assert_eq!(InterpolationType::from(3), InterpolationType::Texture3dLookup);
    assert_eq!(InterpolationType::from(9), InterpolationType::ConstLookup);
    assert!(InterpolationType::Texture3dLookup.is_texture());
    assert!(!InterpolationType::ConstLookup.is_texture());
}

/// Test variant names.
#[test]
fn test_operator_type_display() {
    assert_eq!(OperatorType::Default.to_string(), "default");
    assert_eq!(OperatorType::BalancedTexture.to_string(), "balanced texture");
    assert!(OperatorType::Balanced.is_balanced());
    assert!(!OperatorType::Texture.is_balanced());
}

// ============================================================================
// Validation Tests
// ============================================================================

/// Test builder rejections.
#[test]
fn test_builder_errors() {
    let err = Nufft::<f64>::new()
        .balance_workload(true)
        .balance_workload(false)
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        NufftError::DuplicateParameter {
            parameter: "balance_workload"
        }
    );

    let err = Nufft::<f64>::new().maximum_payload(0).build().unwrap_err();
    assert_eq!(err, NufftError::InvalidMaximumPayload(0));
}

/// Test that a multi-channel trajectory is rejected.
#[test]
fn test_multichannel_trajectory_rejected() {
    let traj = patterned_trajectory();
    let traj = Array::new(traj.data, Dimensions::linear(10).with_channels(2));

    let err = factory(false, DEFAULT_MAXIMUM_PAYLOAD)
        .create_operator(&traj, None, None, params_8x8())
        .unwrap_err();
    assert_eq!(err, NufftError::InvalidTrajectoryChannels(2));
}

/// Test that the channel count is reported ahead of other invalid parameters.
#[test]
fn test_trajectory_channels_checked_first() {
    let traj = patterned_trajectory();
    let traj = Array::new(traj.data, Dimensions::linear(10).with_channels(2));
    let bad_sector = OperatorParams::new(3, 0, 1.0, Dimensions::new_2d(8, 8));

    let err = factory(false, DEFAULT_MAXIMUM_PAYLOAD)
        .create_operator(&traj, None, None, bad_sector)
        .unwrap_err();
    assert_eq!(err, NufftError::InvalidTrajectoryChannels(2));

    let f = factory(true, 4);
    let mut pre = f
        .create_operator(&patterned_trajectory(), None, None, params_8x8())
        .unwrap()
        .to_precomputed();
    pre.k_space_traj.dim = pre.k_space_traj.dim.with_channels(2);
    let err = f.load_precomputed(pre, bad_sector).unwrap_err();
    assert_eq!(err, NufftError::InvalidTrajectoryChannels(2));
}

/// Test parameter rejections.
#[test]
fn test_invalid_params_rejected() {
    let f = factory(false, DEFAULT_MAXIMUM_PAYLOAD);
    let traj = patterned_trajectory();
    let img = Dimensions::new_2d(8, 8);

    let err = f
        .create_operator(&traj, None, None, OperatorParams::new(3, 0, 1.0, img))
        .unwrap_err();
    assert_eq!(err, NufftError::InvalidSectorWidth(0));

    let err = f
        .create_operator(&traj, None, None, OperatorParams::new(0, 4, 1.0, img))
        .unwrap_err();
    assert_eq!(err, NufftError::InvalidKernelWidth(0));

    let err = f
        .create_operator(&traj, None, None, OperatorParams::new(3, 4, 0.0, img))
        .unwrap_err();
    assert_eq!(err, NufftError::InvalidOversampling(0.0));

    let err = f
        .create_operator(
            &traj,
            None,
            None,
            OperatorParams::new(3, 4, 1.0, img.with_channels(2)),
        )
        .unwrap_err();
    assert_eq!(err, NufftError::InvalidImageChannels(2));
}

/// Test input length and value rejections.
#[test]
fn test_invalid_inputs_rejected() {
    let f = factory(false, DEFAULT_MAXIMUM_PAYLOAD);

    let short = Array::trajectory(vec![0.0; 19], 10);
    let err = f.create_operator(&short, None, None, params_8x8()).unwrap_err();
    assert_eq!(
        err,
        NufftError::MismatchedLength {
            name: "trajectory",
            expected: 20,
            got: 19
        }
    );

    let mut coords = patterned_trajectory().data;
    coords[3] = f64::NAN;
    let err = f
        .create_operator(&Array::trajectory(coords, 10), None, None, params_8x8())
        .unwrap_err();
    assert!(matches!(err, NufftError::InvalidNumericValue(_)));

    let density = Array::linear(vec![1.0; 9]);
    let err = f
        .create_operator(&patterned_trajectory(), Some(&density), None, params_8x8())
        .unwrap_err();
    assert!(matches!(
        err,
        NufftError::MismatchedLength { name: "density", .. }
    ));

    let sens = Array::new(vec![Complex::new(0.0, 0.0); 63], Dimensions::new_2d(8, 8));
    let err = f
        .create_operator(&patterned_trajectory(), None, Some(sens), params_8x8())
        .unwrap_err();
    assert!(matches!(
        err,
        NufftError::MismatchedLength { name: "sensitivity", .. }
    ));
}

// ============================================================================
// Load Path Tests
// ============================================================================

/// Test that loading exported state reproduces the operator.
#[test]
fn test_load_round_trip() {
    let density = Array::linear(vec![0.5; 10]);
    let sens = Array::new(vec![Complex::new(1.0, 0.0); 64], Dimensions::new_2d(8, 8));

    for balance in [false, true] {
        let f = factory(balance, 4);
        let op = f
            .create_operator(
                &patterned_trajectory(),
                Some(&density),
                Some(sens.clone()),
                params_8x8(),
            )
            .unwrap();

        let loaded = f.load_precomputed(op.to_precomputed(), params_8x8()).unwrap();
        assert_eq!(loaded, op);
    }
}

/// Test that non-balanced variants ignore a supplied processing order.
#[test]
fn test_load_ignores_order_for_non_balanced() {
    let f = factory(false, DEFAULT_MAXIMUM_PAYLOAD);
    let op = f
        .create_operator(&patterned_trajectory(), None, None, params_8x8())
        .unwrap();

    let mut pre = op.to_precomputed();
    pre.sector_processing_order = Array::linear(vec![ProcessingChunk::new(99, 0)]);

    let loaded = f.load_precomputed(pre, params_8x8()).unwrap();
    assert!(loaded.sector_processing_order().is_none());
    assert_eq!(loaded, op);
}

/// Test that balanced loads check the processing order.
#[test]
fn test_load_rejects_bad_processing_order() {
    let f = factory(true, 4);
    let op = f
        .create_operator(&patterned_trajectory(), None, None, params_8x8())
        .unwrap();

    let mut pre = op.to_precomputed();
    // Sector 1 is empty
    pre.sector_processing_order = Array::linear(vec![ProcessingChunk::new(1, 0)]);
    let err = f.load_precomputed(pre, params_8x8()).unwrap_err();
    assert!(matches!(err, NufftError::InvalidPrecomputed(_)));
}

/// Test that an order built for another payload is rejected.
#[test]
fn test_load_rejects_payload_mismatch() {
    let pre = factory(true, 4)
        .create_operator(&patterned_trajectory(), None, None, params_8x8())
        .unwrap()
        .to_precomputed();
    assert_eq!(pre.sector_processing_order.len(), 3);

    for payload in [DEFAULT_MAXIMUM_PAYLOAD, 2] {
        let err = factory(true, payload)
            .load_precomputed(pre.clone(), params_8x8())
            .unwrap_err();
        assert!(matches!(err, NufftError::InvalidPrecomputed(_)), "{payload}");
    }
}

/// Test that a balanced load needs every sample scheduled.
#[test]
fn test_load_rejects_incomplete_order() {
    let f = factory(true, 4);
    let op = f
        .create_operator(&patterned_trajectory(), None, None, params_8x8())
        .unwrap();

    let mut pre = op.to_precomputed();
    pre.sector_processing_order = Array::linear(Vec::new());
    let err = f.load_precomputed(pre, params_8x8()).unwrap_err();
    assert!(matches!(err, NufftError::InvalidPrecomputed(_)));

    let mut pre = op.to_precomputed();
    pre.sector_processing_order.data.pop();
    let err = f.load_precomputed(pre, params_8x8()).unwrap_err();
    assert!(matches!(err, NufftError::InvalidPrecomputed(_)));

    // Chunks may arrive in any order
    let mut pre = op.to_precomputed();
    pre.sector_processing_order.data.reverse();
    assert!(f.load_precomputed(pre, params_8x8()).is_ok());
}

/// Test that inconsistent offsets and permutations are rejected.
#[test]
fn test_load_rejects_inconsistent_state() {
    let f = factory(false, DEFAULT_MAXIMUM_PAYLOAD);
    let op = f
        .create_operator(&patterned_trajectory(), None, None, params_8x8())
        .unwrap();

    let mut pre = op.to_precomputed();
    pre.sector_data_count = Array::linear(vec![0, 7, 5, 6, 10]);
    let err = f.load_precomputed(pre, params_8x8()).unwrap_err();
    assert!(matches!(err, NufftError::InvalidPrecomputed(_)));

    let mut pre = op.to_precomputed();
    pre.sector_data_count = Array::linear(vec![0, 6, 6, 6, 9]);
    let err = f.load_precomputed(pre, params_8x8()).unwrap_err();
    assert!(matches!(err, NufftError::InvalidPrecomputed(_)));

    let mut pre = op.to_precomputed();
    pre.data_indices.data[1] = pre.data_indices.data[0];
    let err = f.load_precomputed(pre, params_8x8()).unwrap_err();
    assert!(matches!(err, NufftError::InvalidPrecomputed(_)));
}

/// Test that mis-shaped state is rejected.
#[test]
fn test_load_rejects_mismatched_shapes() {
    let f = factory(false, DEFAULT_MAXIMUM_PAYLOAD);
    let op = f
        .create_operator(&patterned_trajectory(), None, None, params_8x8())
        .unwrap();

    let mut pre = op.to_precomputed();
    pre.sector_data_count = Array::linear(vec![0, 10]);
    let err = f.load_precomputed(pre, params_8x8()).unwrap_err();
    assert_eq!(
        err,
        NufftError::MismatchedLength {
            name: "sector_data_count",
            expected: 5,
            got: 2
        }
    );

    let mut pre = op.to_precomputed();
    pre.k_space_traj.dim = pre.k_space_traj.dim.with_channels(2);
    let err = f.load_precomputed(pre, params_8x8()).unwrap_err();
    assert_eq!(err, NufftError::InvalidTrajectoryChannels(2));

    let mut pre = op.to_precomputed();
    pre.sector_centers = Array::linear(vec![0; 6]);
    let err = f.load_precomputed(pre, params_8x8()).unwrap_err();
    assert!(matches!(
        err,
        NufftError::MismatchedLength { name: "sector_centers", .. }
    ));
}

// ============================================================================
// Processing Order Tests
// ============================================================================

/// Test replacing the chunk list on each kind of variant.
#[test]
fn test_set_sector_processing_order() {
    let order = Array::linear(vec![
        ProcessingChunk::new(3, 0),
        ProcessingChunk::new(0, 0),
        ProcessingChunk::new(0, 4),
    ]);

    let mut op = factory(true, 4)
        .create_operator(&patterned_trajectory(), None, None, params_8x8())
        .unwrap();
    op.set_sector_processing_order(order.clone()).unwrap();
    assert_eq!(op.sector_processing_order(), Some(&order));

    let mut op = factory(false, 4)
        .create_operator(&patterned_trajectory(), None, None, params_8x8())
        .unwrap();
    let err = op.set_sector_processing_order(order).unwrap_err();
    assert!(matches!(err, NufftError::UnsupportedFeature { .. }));
    assert!(op.sector_processing_order().is_none());
}

/// Test that a replacement order must schedule every sample once.
#[test]
fn test_set_sector_processing_order_rejects_invalid() {
    let mut op = factory(true, 4)
        .create_operator(&patterned_trajectory(), None, None, params_8x8())
        .unwrap();
    let before = op.sector_processing_order().cloned();

    let out_of_range = vec![ProcessingChunk::new(99, 0)];
    let partial = vec![ProcessingChunk::new(3, 0)];
    let oversized = vec![ProcessingChunk::new(0, 0), ProcessingChunk::new(3, 0)];
    for bad in [out_of_range, partial, oversized] {
        let err = op
            .set_sector_processing_order(Array::linear(bad))
            .unwrap_err();
        assert!(matches!(err, NufftError::InvalidPrecomputed(_)));
        assert_eq!(op.sector_processing_order().cloned(), before);
    }

    // Chunks of the texture variant are checked the same way
    let mut op = Nufft::new()
        .interpolation_type(InterpolationType::TextureLookup)
        .balance_workload(true)
        .maximum_payload(4)
        .build()
        .unwrap()
        .create_operator(&patterned_trajectory(), None, None, params_8x8())
        .unwrap();
    assert_eq!(op.operator_type(), OperatorType::BalancedTexture);
    let err = op
        .set_sector_processing_order(Array::linear(vec![ProcessingChunk::new(99, 0)]))
        .unwrap_err();
    assert!(matches!(err, NufftError::InvalidPrecomputed(_)));
}
