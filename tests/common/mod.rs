//! Common test utilities
#![allow(dead_code)]

use sparsering::container::{Matrix, Vector};
use sparsering::descriptor::IOMode;
use sparsering::dtype::Element;
use sparsering::runtime::{Config, CpuClient};

/// Create a CPU client with the default configuration
pub fn create_client() -> CpuClient {
    CpuClient::new(Config::default()).expect("default client")
}

/// Create a CPU client that splits work into very small rayon tasks, so
/// even tiny inputs take the parallel code paths
pub fn create_parallel_client() -> CpuClient {
    CpuClient::new(Config::default().with_parallel_min_len(2)).expect("parallel client")
}

/// Both clients, for tests that must agree across code paths
pub fn clients() -> [CpuClient; 2] {
    [create_client(), create_parallel_client()]
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        if x == y {
            continue;
        }
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Build a matrix from unique triples
pub fn matrix<T: Element>(nrows: usize, ncols: usize, entries: Vec<(usize, usize, T)>) -> Matrix<T> {
    let mut m = Matrix::new(nrows, ncols);
    m.build_matrix_unique(entries, IOMode::Sequential).expect("build matrix");
    m
}

/// n×n identity over `T`
pub fn identity<T: Element>(n: usize) -> Matrix<T> {
    matrix(n, n, (0..n).map(|i| (i, i, T::one())).collect())
}

/// Build a sparse vector from `(index, value)` pairs
pub fn sparse<T: Element>(n: usize, entries: &[(usize, T)]) -> Vector<T> {
    let mut v = Vector::new(n);
    v.build(entries.iter().copied(), IOMode::Sequential).expect("build vector");
    v
}

/// Dense view of a vector with `fill` at absent positions
pub fn dense<T: Element>(v: &Vector<T>, fill: T) -> Vec<T> {
    v.iter_dense(fill).collect()
}
