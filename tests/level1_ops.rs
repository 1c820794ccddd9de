//! Level-1 primitives: set, fold, element-wise, dot

mod common;

use approx::assert_abs_diff_eq;
use common::{clients, create_client, dense, sparse};
use sparsering::algebra::{
    Add, AnyOr, Infinity, LogicalAnd, LogicalFalse, LogicalTrue, Max, Min, Mul, NegativeInfinity, One,
    Subtract, Zero,
};
use sparsering::dtype::{Complex64, Complex128};
use sparsering::prelude::*;

const NONE: Descriptor = Descriptor::NO_OPERATION;

#[test]
fn test_set_value_fills_every_position() {
    for client in clients() {
        let mut y = sparse(6, &[(2, 9.0)]);
        client.set_value(&mut y, 1.5f64, NONE, Phase::Execute).unwrap();
        assert!(y.is_dense());
        assert_eq!(dense(&y, 0.0), vec![1.5; 6]);
    }
}

#[test]
fn test_set_value_masked() {
    let client = create_client();
    let mask = sparse(5, &[(0, true), (1, false), (3, true)]);
    let mut y = sparse(5, &[(4, 7i32)]);
    client
        .set_value_masked(&mut y, &mask, 2i32, NONE, Phase::Execute)
        .unwrap();
    assert_eq!(y.to_sorted_vec(), vec![(0, 2), (3, 2)]);

    client
        .set_value_masked(&mut y, &mask, 5i32, Descriptor::STRUCTURAL, Phase::Execute)
        .unwrap();
    assert_eq!(y.to_sorted_vec(), vec![(0, 5), (1, 5), (3, 5)]);

    client
        .set_value_masked(&mut y, &mask, 1i32, Descriptor::INVERT_MASK, Phase::Execute)
        .unwrap();
    assert_eq!(y.to_sorted_vec(), vec![(1, 1), (2, 1), (4, 1)]);
}

#[test]
fn test_set_use_index() {
    let client = create_client();
    let mut y = sparse(5, &[(1, 0u64), (4, 0)]);
    client
        .set_value(&mut y, 0u64, Descriptor::USE_INDEX, Phase::Execute)
        .unwrap();
    assert_eq!(y.to_sorted_vec(), vec![(1, 1), (4, 4)]);

    client
        .set_value(&mut y, 0u64, Descriptor::USE_INDEX | Descriptor::DENSE, Phase::Execute)
        .unwrap();
    assert_eq!(dense(&y, 99), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_set_use_index_rejects_unrepresentable_indices() {
    let client = create_client();
    let mut y = Vector::<u8>::new(301);
    y.set_element(7, 300).unwrap();
    let err = client
        .set_value(&mut y, 0u8, Descriptor::USE_INDEX, Phase::Execute)
        .unwrap_err();
    assert_eq!(err.rc(), Rc::Illegal);
    assert_eq!(y.to_sorted_vec(), vec![(300, 7)]);

    // only index 255 is written, which still fits
    let mut y = Vector::<u8>::new(301);
    y.set_element(7, 255).unwrap();
    client
        .set_value(&mut y, 0u8, Descriptor::USE_INDEX, Phase::Execute)
        .unwrap();
    assert_eq!(y.to_sorted_vec(), vec![(255, 255)]);

    let x = Vector::from_dense(&[1.0f64; 3]);
    let mut flags = Vector::<bool>::new(3);
    let err = client
        .set(&mut flags, &x, Descriptor::USE_INDEX, Phase::Execute)
        .unwrap_err();
    assert_eq!(err.rc(), Rc::Illegal);
}

#[test]
fn test_set_casts_exactly_across_domains() {
    let client = create_client();
    let big = (1u64 << 53) + 1;
    let x = sparse(3, &[(0, big), (2, u64::MAX)]);
    let mut y = Vector::<i64>::new(3);
    client.set(&mut y, &x, NONE, Phase::Execute).unwrap();
    assert_eq!(y.to_sorted_vec(), vec![(0, 9_007_199_254_740_993), (2, -1)]);

    let z = sparse(2, &[(0, Complex64::new(0.0, 1.0)), (1, Complex64::new(-1.5, 2.0))]);
    let mut w = Vector::<Complex128>::new(2);
    client.set(&mut w, &z, NONE, Phase::Execute).unwrap();
    assert_eq!(
        w.to_sorted_vec(),
        vec![(0, Complex128::new(0.0, 1.0)), (1, Complex128::new(-1.5, 2.0))]
    );

    let mut re = Vector::<f32>::new(2);
    client.set(&mut re, &w, NONE, Phase::Execute).unwrap();
    assert_eq!(re.to_sorted_vec(), vec![(0, 0.0), (1, -1.5)]);
}

#[test]
fn test_set_copy_keeps_pattern() {
    for client in clients() {
        let x = sparse(8, &[(0, 1.0f32), (5, -2.0)]);
        let mut y = sparse(8, &[(3, 4.0f64)]);
        client.set(&mut y, &x, NONE, Phase::Execute).unwrap();
        assert_eq!(y.to_sorted_vec(), vec![(0, 1.0), (5, -2.0)]);
    }
}

#[test]
fn test_set_copy_masked_and_overlap() {
    let client = create_client();
    let x = Vector::from_dense(&[1, 2, 3, 4]);
    let mask = sparse(4, &[(1, ()), (2, ())]);
    let mut y = Vector::<i32>::new(4);
    client.set_masked(&mut y, &mask, &x, NONE, Phase::Execute).unwrap();
    assert_eq!(y.to_sorted_vec(), vec![(1, 2), (2, 3)]);

    let mut same = x.clone();
    let err = client.set(&mut same, &x, NONE, Phase::Execute).unwrap_err();
    assert_eq!(err.rc(), Rc::Overlap);
    client
        .set(&mut same, &x, Descriptor::SAFE_OVERLAP, Phase::Execute)
        .unwrap();
    assert_eq!(same.to_sorted_vec(), x.to_sorted_vec());
}

#[test]
fn test_set_size_and_domain_checks() {
    let client = create_client();
    let x = Vector::<f32>::new(3);
    let mut y = Vector::<f64>::new(4);
    let err = client.set(&mut y, &x, NONE, Phase::Execute).unwrap_err();
    assert_eq!(err.rc(), Rc::Mismatch);

    let x = Vector::<f32>::new(4);
    let err = client
        .set(&mut y, &x, Descriptor::NO_CASTING, Phase::Execute)
        .unwrap_err();
    assert_eq!(err.rc(), Rc::Mismatch);
    assert!(matches!(err, Error::DomainMismatch { .. }));
}

#[test]
fn test_clear() {
    let mut y = Vector::from_dense(&[1u8, 2, 3]);
    y.clear();
    assert_eq!(y.nonzeroes(), 0);
}

#[test]
fn test_scalar_folds() {
    for client in clients() {
        let x = sparse(100, &[(3, 2.0), (50, 5.0), (99, -1.0)]);
        let sum = MonoidOf::<Add<f64>, Zero>::new();
        let mut alpha = 10.0;
        client.foldl_scalar(&mut alpha, &x, sum, NONE).unwrap();
        assert_eq!(alpha, 16.0);

        let max = MonoidOf::<Max<f64>, NegativeInfinity>::new();
        let mut alpha = 0.0;
        client.foldr_scalar(&x, &mut alpha, max, NONE).unwrap();
        assert_eq!(alpha, 5.0);

        let err = client.foldl_scalar(&mut alpha, &x, sum, Descriptor::DENSE).unwrap_err();
        assert_eq!(err.rc(), Rc::Illegal);
    }
}

#[test]
fn test_fold_respects_order_of_non_commutative_monoid() {
    // left-to-right subtraction is not a monoid, but it exposes the visit order
    let client = create_client();
    let mut x = Vector::<i64>::new(4);
    for i in [3, 0, 2, 1] {
        x.set_element(i as i64 + 1, i).unwrap();
    }
    let sub = MonoidOf::<Subtract<i64>, Zero>::new();
    let mut alpha = 100i64;
    client.foldl_scalar(&mut alpha, &x, sub, NONE).unwrap();
    // 0 - 1 - 2 - 3 - 4 = -10; 100 - (-10) = 110
    assert_eq!(alpha, 110);
}

#[test]
fn test_vector_fold_intersection_vs_union() {
    for client in clients() {
        let x = sparse(5, &[(0, 1), (2, 2), (4, 4)]);

        let mut y = sparse(5, &[(0, 10), (1, 10)]);
        client.foldl(&mut y, &x, Add::<i32>::new(), NONE, Phase::Execute).unwrap();
        assert_eq!(y.to_sorted_vec(), vec![(0, 11), (1, 10)]);

        let mut y = sparse(5, &[(0, 10), (1, 10)]);
        let sum = MonoidOf::<Add<i32>, Zero>::new();
        client.foldl_monoid(&mut y, &x, sum, NONE, Phase::Execute).unwrap();
        assert_eq!(y.to_sorted_vec(), vec![(0, 11), (1, 10), (2, 2), (4, 4)]);

        let mut y = sparse(5, &[(2, 10)]);
        client.foldr(&x, &mut y, Subtract::<i32>::new(), NONE, Phase::Execute).unwrap();
        assert_eq!(y.to_sorted_vec(), vec![(2, -8)]);

        let mut y = sparse(5, &[(2, 10)]);
        client.foldr_monoid(&x, &mut y, sum, NONE, Phase::Execute).unwrap();
        assert_eq!(y.to_sorted_vec(), vec![(0, 1), (2, 12), (4, 4)]);
    }
}

#[test]
fn test_fold_union_needs_capacity() {
    let client = create_client();
    let x = Vector::from_dense(&[1, 1, 1, 1]);
    let mut y = Vector::<i32>::with_capacity(4, 1).unwrap();
    y.set_element(5, 0).unwrap();
    let sum = MonoidOf::<Add<i32>, Zero>::new();
    let err = client.foldl_monoid(&mut y, &x, sum, NONE, Phase::Execute).unwrap_err();
    assert_eq!(err.rc(), Rc::Illegal);
    assert_eq!(y.to_sorted_vec(), vec![(0, 5)]);

    client.foldl_monoid(&mut y, &x, sum, NONE, Phase::Resize).unwrap();
    client.foldl_monoid(&mut y, &x, sum, NONE, Phase::Execute).unwrap();
    assert_eq!(dense(&y, 0), vec![6, 1, 1, 1]);
}

#[test]
fn test_ewise_apply_intersection_vs_union() {
    for client in clients() {
        let x = sparse(6, &[(0, 1.0), (2, 2.0), (3, 3.0)]);
        let y = sparse(6, &[(2, 10.0), (3, 20.0), (5, 30.0)]);

        let mut z = Vector::<f64>::new(6);
        client
            .ewise_apply(&mut z, &x, &y, Mul::<f64>::new(), NONE, Phase::Execute)
            .unwrap();
        assert_eq!(z.to_sorted_vec(), vec![(2, 20.0), (3, 60.0)]);

        let prod = MonoidOf::<Mul<f64>, One>::new();
        client
            .ewise_apply_monoid(&mut z, &x, &y, prod, NONE, Phase::Execute)
            .unwrap();
        assert_eq!(
            z.to_sorted_vec(),
            vec![(0, 1.0), (2, 20.0), (3, 60.0), (5, 30.0)]
        );
    }
}

#[test]
fn test_ewise_apply_masked() {
    let client = create_client();
    let x = Vector::from_dense(&[1, 2, 3, 4]);
    let y = Vector::from_dense(&[10, 20, 30, 40]);
    let mask = sparse(4, &[(1, 1u8), (3, 0)]);
    let mut z = Vector::<i32>::new(4);
    client
        .ewise_apply_masked(&mut z, &mask, &x, &y, Add::<i32>::new(), NONE, Phase::Execute)
        .unwrap();
    assert_eq!(z.to_sorted_vec(), vec![(1, 22)]);

    let min = MonoidOf::<Min<i32>, Infinity>::new();
    client
        .ewise_apply_monoid_masked(&mut z, &mask, &x, &y, min, Descriptor::INVERT_MASK, Phase::Execute)
        .unwrap();
    assert_eq!(z.to_sorted_vec(), vec![(0, 1), (2, 3), (3, 4)]);
}

#[test]
fn test_ewise_mul_and_add_accumulate() {
    for client in clients() {
        let ring = PlusTimes::<i64>::new();
        let x = sparse(4, &[(0, 2), (1, 3)]);
        let y = sparse(4, &[(1, 5), (2, 7)]);

        let mut z = sparse(4, &[(1, 100), (3, 1)]);
        client.ewise_mul(&mut z, &x, &y, ring, NONE, Phase::Execute).unwrap();
        assert_eq!(z.to_sorted_vec(), vec![(1, 115), (3, 1)]);

        let mut z = sparse(4, &[(0, 1000)]);
        client.ewise_add(&mut z, &x, &y, ring, NONE, Phase::Execute).unwrap();
        assert_eq!(z.to_sorted_vec(), vec![(0, 1002), (1, 8), (2, 7)]);
    }
}

#[test]
fn test_ewise_mul_boolean_pattern() {
    let client = create_client();
    let x = sparse(3, &[(0, ()), (2, ())]);
    let y = sparse(3, &[(2, true)]);
    let mut z = Vector::<bool>::new(3);
    client
        .ewise_mul(&mut z, &x, &y, LorLand::<bool>::new(), NONE, Phase::Execute)
        .unwrap();
    assert_eq!(z.to_sorted_vec(), vec![(2, true)]);
}

#[test]
fn test_dot_of_ones_within_tolerance() {
    for client in clients() {
        let x = Vector::from_dense(&vec![1.0f64; 1024]);
        let y = x.clone();
        let mut alpha = 0.0;
        client
            .dot(&mut alpha, &x, &y, PlusTimes::<f64>::new(), NONE)
            .unwrap();
        assert_abs_diff_eq!(alpha, 1024.0, epsilon = 1024.0 * f64::EPSILON);

        let mut alpha = 0.0;
        client
            .dot(&mut alpha, &x, &y, PlusTimes::<f64>::new(), Descriptor::DENSE)
            .unwrap();
        assert_abs_diff_eq!(alpha, 1024.0, epsilon = 1024.0 * f64::EPSILON);
    }
}

#[test]
fn test_dot_over_other_semirings() {
    let client = create_client();
    let x = sparse(5, &[(0, 3), (1, 1), (4, 2)]);
    let y = sparse(5, &[(1, 4), (3, 9), (4, 8)]);

    let mut shortest = i32::MAX;
    client.dot(&mut shortest, &x, &y, MinPlus::<i32>::new(), NONE).unwrap();
    assert_eq!(shortest, 5);

    let mut any = false;
    let ring = SemiringOf::<AnyOr<bool>, LogicalAnd<bool>, LogicalFalse, LogicalTrue>::new();
    let xb = sparse(5, &[(2, true)]);
    let yb = sparse(5, &[(2, true), (3, true)]);
    client.dot(&mut any, &xb, &yb, ring, NONE).unwrap();
    assert!(any);

    let err = client
        .dot(&mut shortest, &x, &Vector::<i32>::new(4), MinPlus::<i32>::new(), NONE)
        .unwrap_err();
    assert_eq!(err.rc(), Rc::Mismatch);
}

#[test]
fn test_complex_dot() {

    let client = create_client();
    let x = Vector::from_dense(&[Complex128::new(1.0, 1.0), Complex128::new(0.0, 2.0)]);
    let y = Vector::from_dense(&[Complex128::new(1.0, -1.0), Complex128::ONE]);
    let mut alpha = Complex128::ZERO;
    client
        .dot(&mut alpha, &x, &y, PlusTimes::<Complex128>::new(), NONE)
        .unwrap();
    // (1+i)(1-i) + 2i·1
    assert_eq!(alpha, Complex128::new(2.0, 2.0));
}

#[test]
fn test_norm2_ignores_incoming_value() {
    for client in clients() {
        let x = sparse(5, &[(0, 3.0f64), (3, -4.0)]);
        let mut alpha = 100.0f64;
        client.norm2(&mut alpha, &x, PlusTimes::<f64>::new(), NONE).unwrap();
        assert_abs_diff_eq!(alpha, 5.0, epsilon = 1e-12);

        let ints = Vector::from_dense(&[1i32, 2, 2]);
        let mut beta = -1.0f32;
        client.norm2(&mut beta, &ints, PlusTimes::<i32>::new(), NONE).unwrap();
        assert_abs_diff_eq!(beta, 3.0, epsilon = 1e-6);

        let mut empty = 7.0f64;
        client
            .norm2(&mut empty, &Vector::<f64>::new(4), PlusTimes::<f64>::new(), NONE)
            .unwrap();
        assert_eq!(empty, 0.0);
    }
}

#[test]
fn test_ewise_lambda_visits_present_entries() {
    for client in clients() {
        let mut y = sparse(8, &[(1, 1.0f64), (4, 2.0), (6, 3.0)]);
        client
            .ewise_lambda(&mut y, |i, v| *v = *v * 10.0 + i as f64, NONE)
            .unwrap();
        assert_eq!(y.to_sorted_vec(), vec![(1, 11.0), (4, 24.0), (6, 36.0)]);

        let err = client
            .ewise_lambda(&mut y, |_, v| *v = 0.0, Descriptor::DENSE)
            .unwrap_err();
        assert_eq!(err.rc(), Rc::Illegal);
        assert_eq!(y.get(4), Some(24.0));
    }
}

#[test]
fn test_ewise_lambda_detaches_shared_storage() {
    let client = create_client();
    let x = Vector::from_dense(&[1u32, 2, 3]);
    let mut y = x.clone();
    client.ewise_lambda(&mut y, |_, v| *v += 1, NONE).unwrap();
    assert_eq!(dense(&x, 0), vec![1, 2, 3]);
    assert_eq!(dense(&y, 0), vec![2, 3, 4]);
}
