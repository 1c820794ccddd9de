//! Vector, matrix, and pinned-vector behaviour

mod common;

use common::{matrix, sparse};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sparsering::container::ContainerState;
use sparsering::prelude::*;
use std::collections::BTreeSet;

fn random_triples(rng: &mut StdRng, m: usize, n: usize, count: usize) -> Vec<(usize, usize, f64)> {
    let mut coords = BTreeSet::new();
    while coords.len() < count {
        coords.insert((rng.random_range(0..m), rng.random_range(0..n)));
    }
    let mut triples: Vec<_> = coords
        .into_iter()
        .map(|(i, j)| (i, j, rng.random_range(-10.0..10.0)))
        .collect();
    triples.shuffle(rng);
    triples
}

#[test]
fn test_build_matrix_unique_invariants() {
    let mut rng = StdRng::seed_from_u64(7);
    for (m, n, count) in [(1, 1, 1), (5, 8, 20), (40, 30, 300), (100, 100, 1)] {
        let triples = random_triples(&mut rng, m, n, count);
        for mode in [IOMode::Sequential, IOMode::Parallel] {
            let mut a = Matrix::<f64>::new(m, n);
            a.build_matrix_unique(triples.clone(), mode).unwrap();
            assert_eq!(a.nonzeroes(), count);
            assert!(a.crs().is_canonical(), "CRS rows sorted");
            assert!(a.ccs().is_canonical(), "CCS columns sorted");

            let mut expected = triples.clone();
            expected.sort_by_key(|&(i, j, _)| (i, j));
            let from_crs: Vec<_> = a.iter().map(|((i, j), v)| (i, j, v)).collect();
            assert_eq!(from_crs, expected);

            let mut from_ccs: Vec<_> = a.iter_ccs().map(|((i, j), v)| (i, j, v)).collect();
            from_ccs.sort_by_key(|&(i, j, _)| (i, j));
            assert_eq!(from_ccs, expected);
        }
    }
}

#[test]
fn test_build_matrix_errors_leave_matrix_unchanged() {
    let mut a = matrix(3, 3, vec![(0, 0, 1.0)]);
    let err = a
        .build_matrix_unique(vec![(0, 1, 1.0), (0, 1, 2.0)], IOMode::Sequential)
        .unwrap_err();
    assert_eq!(err.rc(), Rc::Illegal);
    let err = a
        .build_matrix_unique(vec![(3, 0, 1.0)], IOMode::Sequential)
        .unwrap_err();
    assert_eq!(err.rc(), Rc::Mismatch);
    assert_eq!(a.iter().collect::<Vec<_>>(), vec![((0, 0), 1.0)]);
}

#[test]
fn test_set_then_iterate_round_trip() {
    let mut rng = StdRng::seed_from_u64(11);
    let n = 500;
    let mut positions: Vec<usize> = (0..n).collect();
    positions.shuffle(&mut rng);
    positions.truncate(120);

    let mut x = Vector::<i64>::new(n);
    let mut expected = Vec::new();
    for &i in &positions {
        let v = rng.random_range(-1000..1000);
        x.set_element(v, i).unwrap();
        expected.push((i, v));
    }
    let mut seen: Vec<_> = x.iter().collect();
    seen.sort_unstable();
    expected.sort_unstable();
    assert_eq!(seen, expected);
    assert_eq!(x.nonzeroes(), 120);
}

#[test]
fn test_vector_capacity_and_dense_view() {
    let mut x = Vector::<f32>::with_capacity(4, 2).unwrap();
    x.set_element(1.0, 0).unwrap();
    x.set_element(2.0, 3).unwrap();
    let err = x.set_element(3.0, 1).unwrap_err();
    assert_eq!(err.rc(), Rc::Illegal);
    x.set_element(5.0, 3).unwrap();
    assert_eq!(common::dense(&x, 0.0), vec![1.0, 0.0, 0.0, 5.0]);
    assert!(!x.is_dense());
    x.clear();
    assert_eq!(x.nonzeroes(), 0);
    assert_eq!(x.size(), 4);
}

#[test]
fn test_pinned_vector_survives_owner() {
    let x = sparse(10, &[(2, 0.5), (7, -1.0), (9, 3.0)]);
    let pinned = x.pin(IOMode::Sequential);
    drop(x);
    assert_eq!(pinned.size(), 10);
    assert_eq!(pinned.nonzeroes(), 3);
    let mut entries: Vec<_> = pinned.iter().collect();
    entries.sort_by_key(|&(i, _)| i);
    assert_eq!(entries, vec![(2, 0.5), (7, -1.0), (9, 3.0)]);
    assert_eq!(pinned.get(7), Some(-1.0));
    assert_eq!(pinned.get(3), None);
}

#[test]
fn test_pin_is_a_snapshot() {
    let mut x = sparse(4, &[(1, 1u32)]);
    let pinned = x.pin(IOMode::Parallel);
    x.set_element(9, 1).unwrap();
    x.set_element(4, 2).unwrap();
    assert_eq!(pinned.get(1), Some(1));
    assert_eq!(pinned.nonzeroes(), 1);
    assert_eq!(pinned.mode(), IOMode::Parallel);
    assert_eq!(x.nonzeroes(), 2);
}

#[test]
fn test_pattern_containers() {
    let mut a = Matrix::<()>::new(4, 4);
    a.build_pattern(vec![(0, 3), (2, 1), (3, 3)], IOMode::Sequential)
        .unwrap();
    assert_eq!(a.nonzeroes(), 3);
    assert_eq!(a.get(2, 1), Some(()));
    assert_eq!(a.get(1, 2), None);

    let mut v = Vector::<()>::new(3);
    v.set_element((), 1).unwrap();
    assert_eq!(v.to_sorted_vec(), vec![(1, ())]);
}

#[test]
fn test_matrix_resize_and_clear() {
    let mut a = matrix(3, 3, vec![(0, 0, 1.0), (1, 1, 2.0), (2, 2, 3.0)]);
    assert_eq!(a.resize(2).unwrap_err().rc(), Rc::Illegal);
    a.resize(10).unwrap();
    assert_eq!(a.capacity(), 10);
    a.clear();
    assert_eq!(a.nonzeroes(), 0);
    assert_eq!(a.state(), ContainerState::Clean);
}

