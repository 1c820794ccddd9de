//! CPU implementation of the level-2 operations.
//!
//! `mxv` pulls over the rows of `A` (or of `Aᵀ`, which are the columns of
//! the CCS store) and `vxm` over its columns. When `x` is very sparse the
//! push kernel scatters from the support of `x` through the opposite store
//! instead. Results are computed in full before `y` is touched.

use super::common::{check_dense, check_domain, check_overlap, check_size, lift};
use crate::algebra::{Accum, MulLeft, MulRight, Operator, Product, Semiring};
use crate::container::mask::{MaskEval, NoMask, VectorMask};
use crate::container::{CompressedStorage, Matrix, Vector};
use crate::descriptor::{Descriptor, Phase};
use crate::dtype::Element;
use crate::error::{Result, log_failure};
use crate::ops::Level2Ops;
use crate::runtime::cpu::CpuClient;
use crate::runtime::cpu::kernels::scatter::accumulate_results;
use crate::runtime::cpu::kernels::spmv::{prefer_push, spmv_bound, spmv_pull, spmv_push};

impl Level2Ops for CpuClient {
    fn mxv<Y, A, X, R>(
        &self,
        y: &mut Vector<Y>,
        a: &Matrix<A>,
        x: &Vector<X>,
        ring: R,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        Y: Element,
        A: Element,
        X: Element,
        R: Semiring,
    {
        mxv_impl(self, y, &NoMask, a, x, ring, desc, phase).inspect_err(|e| log_failure("mxv", e))
    }

    fn mxv_masked<Y, M, A, X, R>(
        &self,
        y: &mut Vector<Y>,
        mask: &Vector<M>,
        a: &Matrix<A>,
        x: &Vector<X>,
        ring: R,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        Y: Element,
        M: Element,
        A: Element,
        X: Element,
        R: Semiring,
    {
        check_size("mxv", y.size(), mask.size())
            .and_then(|_| mxv_impl(self, y, &VectorMask::new(mask, desc), a, x, ring, desc, phase))
            .inspect_err(|e| log_failure("mxv", e))
    }

    fn vxm<Y, X, A, R>(
        &self,
        y: &mut Vector<Y>,
        x: &Vector<X>,
        a: &Matrix<A>,
        ring: R,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        Y: Element,
        X: Element,
        A: Element,
        R: Semiring,
    {
        vxm_impl(self, y, &NoMask, x, a, ring, desc, phase).inspect_err(|e| log_failure("vxm", e))
    }

    fn vxm_masked<Y, M, X, A, R>(
        &self,
        y: &mut Vector<Y>,
        mask: &Vector<M>,
        x: &Vector<X>,
        a: &Matrix<A>,
        ring: R,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        Y: Element,
        M: Element,
        X: Element,
        A: Element,
        R: Semiring,
    {
        check_size("vxm", y.size(), mask.size())
            .and_then(|_| vxm_impl(self, y, &VectorMask::new(mask, desc), x, a, ring, desc, phase))
            .inspect_err(|e| log_failure("vxm", e))
    }
}

#[allow(clippy::too_many_arguments)]
fn mxv_impl<Y, Mk, A, X, R>(
    client: &CpuClient,
    y: &mut Vector<Y>,
    mask: &Mk,
    a: &Matrix<A>,
    x: &Vector<X>,
    ring: R,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    Y: Element,
    Mk: MaskEval,
    A: Element,
    X: Element,
    R: Semiring,
{
    let transposed = desc.transpose_matrix();
    let (m, n) = a.dims(transposed);
    check_size("mxv", n, x.size())?;
    check_size("mxv", m, y.size())?;
    check_domain::<A, MulLeft<R>>("mxv", desc)?;
    check_domain::<X, MulRight<R>>("mxv", desc)?;
    check_domain::<Y, Accum<R>>("mxv", desc)?;

    let (one_l, one_r): (MulLeft<R>, MulRight<R>) = (ring.one(), ring.one());
    let product = |av: Option<A>, xv: X| -> Product<R> {
        ring.mul(av.map_or(one_l, |av| lift(av, one_l)), lift(xv, one_r))
    };
    multiply(
        client,
        "mxv",
        y,
        mask,
        a.row_lanes(transposed),
        a.col_lanes(transposed),
        x,
        &ring,
        desc,
        phase,
        product,
    )
}

#[allow(clippy::too_many_arguments)]
fn vxm_impl<Y, Mk, X, A, R>(
    client: &CpuClient,
    y: &mut Vector<Y>,
    mask: &Mk,
    x: &Vector<X>,
    a: &Matrix<A>,
    ring: R,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    Y: Element,
    Mk: MaskEval,
    X: Element,
    A: Element,
    R: Semiring,
{
    let transposed = desc.transpose_matrix();
    let (m, n) = a.dims(transposed);
    check_size("vxm", m, x.size())?;
    check_size("vxm", n, y.size())?;
    check_domain::<X, MulLeft<R>>("vxm", desc)?;
    check_domain::<A, MulRight<R>>("vxm", desc)?;
    check_domain::<Y, Accum<R>>("vxm", desc)?;

    let (one_l, one_r): (MulLeft<R>, MulRight<R>) = (ring.one(), ring.one());
    let product = |av: Option<A>, xv: X| -> Product<R> {
        ring.mul(lift(xv, one_l), av.map_or(one_r, |av| lift(av, one_r)))
    };
    multiply(
        client,
        "vxm",
        y,
        mask,
        a.col_lanes(transposed),
        a.row_lanes(transposed),
        x,
        &ring,
        desc,
        phase,
        product,
    )
}

/// Shared body of `mxv` and `vxm` once the lane stores are chosen.
///
/// `pull` has one lane per output index; `push` one lane per input index.
#[allow(clippy::too_many_arguments)]
fn multiply<Y, Mk, A, X, R, C>(
    client: &CpuClient,
    name: &'static str,
    y: &mut Vector<Y>,
    mask: &Mk,
    pull: &CompressedStorage<A>,
    push: &CompressedStorage<A>,
    x: &Vector<X>,
    ring: &R,
    desc: Descriptor,
    phase: Phase,
    product: C,
) -> Result<()>
where
    Y: Element,
    Mk: MaskEval,
    A: Element,
    X: Element,
    R: Semiring,
    C: Fn(Option<A>, X) -> Product<R> + Sync + Send,
{
    check_overlap(name, desc, y.shares_storage(x))?;
    check_dense(desc, x)?;
    check_dense(desc, y)?;
    let add_identity = desc.add_identity();

    if phase == Phase::Resize {
        let bound = spmv_bound(pull, y, mask, add_identity);
        y.reserve(bound);
        return Ok(());
    }

    let results = if desc.dense() {
        spmv_pull::<_, _, _, _, _, true>(client, ring, pull, x, mask, add_identity, product)
    } else if prefer_push(x) {
        spmv_push(ring, push, y.size(), x, mask, add_identity, product)
    } else {
        spmv_pull::<_, _, _, _, _, false>(client, ring, pull, x, mask, add_identity, product)
    };
    let results: Vec<Option<Y>> = results.into_iter().map(|r| r.map(|v| v.cast())).collect();
    let add = ring.additive_operator();
    accumulate_results(client, y, &results, |new, old| add.apply(new.cast(), old.cast()).cast())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::semirings::{LorLand, PlusTimes};
    use crate::descriptor::IOMode;
    use crate::error::Rc;
    use crate::runtime::Config;

    fn client() -> CpuClient {
        CpuClient::new(Config::default().with_parallel_min_len(2)).unwrap()
    }

    // [[1, 2, 0],
    //  [0, 0, 3]]
    fn matrix() -> Matrix<f64> {
        let mut a = Matrix::new(2, 3);
        a.build_matrix_unique(vec![(0, 0, 1.0), (0, 1, 2.0), (1, 2, 3.0)], IOMode::Sequential)
            .unwrap();
        a
    }

    #[test]
    fn test_mxv_and_transpose() {
        let c = client();
        let a = matrix();
        let ring = PlusTimes::<f64>::new();
        let x = Vector::from_dense(&[1.0, 1.0, 1.0]);
        let mut y = Vector::<f64>::new(2);
        c.mxv(&mut y, &a, &x, ring, Descriptor::NO_OPERATION, Phase::Execute)
            .unwrap();
        assert_eq!(y.to_sorted_vec(), vec![(0, 3.0), (1, 3.0)]);

        let x = Vector::from_dense(&[1.0, 10.0]);
        let mut y = Vector::<f64>::new(3);
        c.mxv(&mut y, &a, &x, ring, Descriptor::TRANSPOSE_MATRIX, Phase::Execute)
            .unwrap();
        assert_eq!(y.to_sorted_vec(), vec![(0, 1.0), (1, 2.0), (2, 30.0)]);
    }

    #[test]
    fn test_vxm_matches_transposed_mxv() {
        let c = client();
        let a = matrix();
        let ring = PlusTimes::<f64>::new();
        let x = Vector::from_dense(&[2.0, 5.0]);
        let mut via_vxm = Vector::<f64>::new(3);
        let mut via_mxv = Vector::<f64>::new(3);
        c.vxm(&mut via_vxm, &x, &a, ring, Descriptor::NO_OPERATION, Phase::Execute)
            .unwrap();
        c.mxv(&mut via_mxv, &a, &x, ring, Descriptor::TRANSPOSE_MATRIX, Phase::Execute)
            .unwrap();
        assert_eq!(via_vxm.to_sorted_vec(), via_mxv.to_sorted_vec());
    }

    #[test]
    fn test_pattern_matrix_reachability() {
        let c = client();
        let mut a = Matrix::<()>::new(3, 3);
        a.build_pattern(vec![(0, 1), (1, 2)], IOMode::Sequential).unwrap();
        let mut frontier = Vector::<bool>::new(3);
        frontier.set_element(true, 0).unwrap();
        let mut next = Vector::<bool>::new(3);
        c.vxm(
            &mut next,
            &frontier,
            &a,
            LorLand::<bool>::new(),
            Descriptor::NO_OPERATION,
            Phase::Execute,
        )
        .unwrap();
        assert_eq!(next.to_sorted_vec(), vec![(1, true)]);
    }

    #[test]
    fn test_dimension_and_overlap_errors() {
        let c = client();
        let a = matrix();
        let ring = PlusTimes::<f64>::new();
        let mut y = Vector::<f64>::new(2);
        let short = Vector::<f64>::new(2);
        let err = c
            .mxv(&mut y, &a, &short, ring, Descriptor::NO_OPERATION, Phase::Execute)
            .unwrap_err();
        assert_eq!(err.rc(), Rc::Mismatch);

        let mut sq = Matrix::<f64>::new(2, 2);
        sq.build_matrix_unique(vec![(0, 0, 1.0)], IOMode::Sequential).unwrap();
        let mut v = Vector::from_dense(&[1.0, 2.0]);
        let alias = v.clone();
        let err = c
            .mxv(&mut v, &sq, &alias, ring, Descriptor::NO_OPERATION, Phase::Execute)
            .unwrap_err();
        assert_eq!(err.rc(), Rc::Overlap);
        c.mxv(&mut v, &sq, &alias, ring, Descriptor::SAFE_OVERLAP, Phase::Execute)
            .unwrap();
        assert_eq!(v.get(0), Some(2.0));
        assert_eq!(alias.get(0), Some(1.0));
    }
}
