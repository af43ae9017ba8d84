//! Tests for trajectory and density input containers.
//!
//! ## Test Organization
//!
//! 1. **Containers** - Slices, vectors and ndarrays
//! 2. **Layout Errors** - Non-contiguous arrays, sample-major rows and partial
//!    samples
//! 3. **Backend Selection** - GPU requests without the `gpu` feature

use approx::assert_relative_eq;
use ndarray::{Array1, array, s};

use fastNufft::prelude::*;

fn params() -> OperatorParams<f64> {
    OperatorParams::new(3, 4, 1.0, Dimensions::new_2d(8, 8))
}

// ============================================================================
// Container Tests
// ============================================================================

/// Test that every container yields the same operator.
#[test]
fn test_containers_agree() {
    let flat = vec![-0.4, -0.3, 0.2, 0.3, -0.4, -0.2, 0.3, 0.4];
    let rows = array![[-0.4, -0.3, 0.2, 0.3], [-0.4, -0.2, 0.3, 0.4]];
    let column = Array1::from(flat.clone());

    let factory = Nufft::new().build().unwrap();
    let from_vec = factory.create_operator(&flat, params()).unwrap();
    let from_slice = factory.create_operator(&flat[..], params()).unwrap();
    let from_rows = factory.create_operator(&rows, params()).unwrap();
    let from_column = factory.create_operator(&column, params()).unwrap();

    assert_eq!(from_vec.sector_data_count().as_slice(), &[0, 2, 2, 2, 4]);
    assert_eq!(from_vec, from_slice);
    assert_eq!(from_vec, from_rows);
    assert_eq!(from_vec, from_column);
}

/// Test density passed as an ndarray.
#[test]
fn test_density_from_ndarray() {
    let rows = array![[0.3, -0.3], [0.3, -0.3]];
    let density = array![2.0, 4.0];

    let op = Nufft::new()
        .build()
        .unwrap()
        .create_operator_with(&rows, &density, None, params())
        .unwrap();

    assert_eq!(op.data_indices().as_slice(), &[1, 0]);
    let dens = op.dens().unwrap();
    assert_relative_eq!(dens[0], 4.0);
    assert_relative_eq!(dens[1], 2.0);
}

// ============================================================================
// Layout Error Tests
// ============================================================================

/// Test that non-contiguous arrays are rejected.
#[test]
fn test_non_contiguous_rejected() {
    let factory = Nufft::new().build().unwrap();

    // (N, d) transposed view is not in standard layout
    let samples_by_row = array![[-0.4, -0.4], [0.3, 0.4]];
    let err = factory
        .create_operator(&samples_by_row.t(), params())
        .unwrap_err();
    assert!(matches!(err, NufftError::UnsupportedFeature { .. }));

    let strided = Array1::from(vec![0.1; 8]);
    let err = factory
        .create_operator(&strided.slice(s![..;2]), params())
        .unwrap_err();
    assert!(matches!(err, NufftError::UnsupportedFeature { .. }));
}

/// Test that an (N, d) array is rejected instead of read component-major.
#[test]
fn test_sample_major_rows_rejected() {
    let factory = Nufft::new().build().unwrap();

    // Three samples, one per row
    let samples_by_row = array![[-0.4, 0.4], [-0.4, 0.4], [0.4, -0.4]];
    let err = factory
        .create_operator(&samples_by_row, params())
        .unwrap_err();
    assert_eq!(
        err,
        NufftError::MismatchedLength {
            name: "trajectory rows",
            expected: 2,
            got: 3
        }
    );

    // The same samples laid out one component per row
    let op = factory
        .create_operator(&samples_by_row.t().to_owned(), params())
        .unwrap();
    assert_eq!(op.sector_data_count().as_slice(), &[0, 0, 1, 3, 3]);
}

/// Test that a partial sample is rejected.
#[test]
fn test_partial_sample_rejected() {
    let err = Nufft::new()
        .build()
        .unwrap()
        .create_operator(&vec![0.1, 0.2, 0.3], params())
        .unwrap_err();
    assert_eq!(
        err,
        NufftError::MismatchedLength {
            name: "trajectory",
            expected: 4,
            got: 3
        }
    );
}

// ============================================================================
// Backend Selection Tests
// ============================================================================

/// Test that the GPU backend requires the `gpu` feature.
#[cfg(not(feature = "gpu"))]
#[test]
fn test_gpu_backend_requires_feature() {
    let err = Nufft::<f64>::new().backend(GPU).build().unwrap_err();
    assert!(matches!(err, NufftError::UnsupportedFeature { .. }));
}

/// Test explicit CPU backend selection.
#[test]
fn test_cpu_backend() {
    let factory = Nufft::<f64>::new()
        .backend(CPU)
        .balance_workload(true)
        .build()
        .unwrap();
    assert_eq!(factory.operator_type(), OperatorType::Balanced);
}
