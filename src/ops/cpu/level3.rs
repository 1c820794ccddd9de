//! CPU implementation of the level-3 operations.

use super::common::{check_domain, check_overlap, check_size, coordinate_of, lift};
use crate::algebra::{Accum, Monoid, MulLeft, MulRight, Operator, Semiring};
use crate::container::{CompressedStorage, Matrix, Vector};
use crate::descriptor::{Descriptor, Phase};
use crate::dtype::Element;
use crate::error::{Error, Result, log_failure};
use crate::ops::Level3Ops;
use crate::runtime::cpu::CpuClient;
use crate::runtime::cpu::kernels::merge::{MergeStrategy, filter_store, merge_stores};
use crate::runtime::cpu::kernels::reduce::reduce_values;
use crate::runtime::cpu::kernels::scatter::map_indices;
use crate::runtime::cpu::kernels::spgemm::{numeric_rows, symbolic_nnz};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

impl Level3Ops for CpuClient {
    fn mxm<C, A, B, R>(
        &self,
        c: &mut Matrix<C>,
        a: &Matrix<A>,
        b: &Matrix<B>,
        ring: R,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        C: Element,
        A: Element,
        B: Element,
        R: Semiring,
    {
        mxm_impl(self, c, a, b, ring, desc, phase).inspect_err(|e| log_failure("mxm", e))
    }

    fn ewise_apply_matrix<C, A, B, Op>(
        &self,
        c: &mut Matrix<C>,
        a: &Matrix<A>,
        b: &Matrix<B>,
        op: Op,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        C: Element,
        A: Element,
        B: Element,
        Op: Operator,
    {
        (|| -> Result<()> {
            check_domain::<A, Op::D1>("eWiseApply", desc)?;
            check_domain::<B, Op::D2>("eWiseApply", desc)?;
            check_domain::<C, Op::D3>("eWiseApply", desc)?;
            let (one_a, one_b) = (<Op::D1 as Element>::one(), <Op::D2 as Element>::one());
            ewise_matrix(
                self,
                c,
                a,
                b,
                MergeStrategy::Intersection,
                desc,
                phase,
                |x: A, y: B| op.apply(lift(x, one_a), lift(y, one_b)).cast(),
                |_: A| C::zero(),
                |_: B| C::zero(),
            )
        })()
        .inspect_err(|e| log_failure("eWiseApply", e))
    }

    fn ewise_apply_matrix_monoid<C, A, B, Mo>(
        &self,
        c: &mut Matrix<C>,
        a: &Matrix<A>,
        b: &Matrix<B>,
        monoid: Mo,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        C: Element,
        A: Element,
        B: Element,
        Mo: Monoid,
    {
        (|| -> Result<()> {
            check_domain::<A, <Mo::Op as Operator>::D1>("eWiseApply", desc)?;
            check_domain::<B, <Mo::Op as Operator>::D2>("eWiseApply", desc)?;
            check_domain::<C, <Mo::Op as Operator>::D3>("eWiseApply", desc)?;
            let op = monoid.operator();
            let one_a: <Mo::Op as Operator>::D1 = Element::one();
            let one_b: <Mo::Op as Operator>::D2 = Element::one();
            ewise_matrix(
                self,
                c,
                a,
                b,
                MergeStrategy::Union,
                desc,
                phase,
                |x: A, y: B| op.apply(lift(x, one_a), lift(y, one_b)).cast(),
                |x: A| op.apply(lift(x, one_a), monoid.identity()).cast(),
                |y: B| op.apply(monoid.identity(), lift(y, one_b)).cast(),
            )
        })()
        .inspect_err(|e| log_failure("eWiseApply", e))
    }

    fn triu<U, A>(&self, u: &mut Matrix<U>, a: &Matrix<A>, k: isize, desc: Descriptor, phase: Phase) -> Result<()>
    where
        U: Element,
        A: Element,
    {
        (|| -> Result<()> {
            check_domain::<A, U>("triu", desc)?;
            let upper = |i: usize, j: usize| j as i128 - i as i128 >= k as i128;
            select(self, "triu", u, a, desc.transpose_matrix(), desc, phase, upper)
        })()
        .inspect_err(|e| log_failure("triu", e))
    }

    fn outer<T, U, V, Op>(
        &self,
        m: &mut Matrix<T>,
        u: &Vector<U>,
        v: &Vector<V>,
        op: Op,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        T: Element,
        U: Element,
        V: Element,
        Op: Operator,
    {
        outer_impl(self, m, u, v, op, desc, phase).inspect_err(|e| log_failure("outer", e))
    }

    fn set_matrix<C, A>(&self, c: &mut Matrix<C>, a: &Matrix<A>, desc: Descriptor, phase: Phase) -> Result<()>
    where
        C: Element,
        A: Element,
    {
        (|| -> Result<()> {
            check_domain::<A, C>("set", desc)?;
            select(self, "set", c, a, desc.transpose_matrix(), desc, phase, |_, _| true)
        })()
        .inspect_err(|e| log_failure("set", e))
    }

    fn foldl_matrix<S, A, Mo>(&self, alpha: &mut S, a: &Matrix<A>, monoid: Mo, desc: Descriptor) -> Result<()>
    where
        S: Element,
        A: Element,
        Mo: Monoid,
    {
        (|| -> Result<()> {
            check_domain::<A, <Mo::Op as Operator>::D2>("foldl", desc)?;
            check_domain::<S, <Mo::Op as Operator>::D3>("foldl", desc)?;
            let op = monoid.operator();
            let reduced: <Mo::Op as Operator>::D3 = reduce_values(
                self,
                a.crs().values(),
                monoid.identity(),
                |v| lift(v, Element::one()),
                |x, y| op.apply(x.cast(), y.cast()),
            );
            *alpha = op.apply(alpha.cast(), reduced.cast()).cast();
            Ok(())
        })()
        .inspect_err(|e| log_failure("foldl", e))
    }

    fn ewise_lambda_matrix<T, F>(&self, a: &mut Matrix<T>, f: F) -> Result<()>
    where
        T: Element,
        F: Fn(usize, usize, &mut T) + Sync + Send,
    {
        lambda_matrix(self, a, f).inspect_err(|e| log_failure("eWiseLambda", e))
    }

    fn zip<T, I, J, V>(
        &self,
        a: &mut Matrix<T>,
        rows: &Vector<I>,
        cols: &Vector<J>,
        vals: &Vector<V>,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        T: Element,
        I: Element,
        J: Element,
        V: Element,
    {
        (|| -> Result<()> {
            check_size("zip", rows.size(), vals.size())?;
            check_domain::<V, T>("zip", desc)?;
            if vals.nonzeroes() != rows.nonzeroes() {
                return Err(pattern_error(vals.nonzeroes(), rows.nonzeroes()));
            }
            zip_impl(a, rows, cols, |k| vals.get(k).map(|v| lift(v, T::one())), phase)
        })()
        .inspect_err(|e| log_failure("zip", e))
    }

    fn zip_pattern<I, J>(
        &self,
        a: &mut Matrix<()>,
        rows: &Vector<I>,
        cols: &Vector<J>,
        _desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        I: Element,
        J: Element,
    {
        zip_impl(a, rows, cols, |_| Some(()), phase).inspect_err(|e| log_failure("zip", e))
    }
}

fn mxm_impl<C, A, B, R>(
    client: &CpuClient,
    c: &mut Matrix<C>,
    a: &Matrix<A>,
    b: &Matrix<B>,
    ring: R,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    C: Element,
    A: Element,
    B: Element,
    R: Semiring,
{
    let (ta, tb) = (desc.transpose_left(), desc.transpose_right());
    let (m, k) = a.dims(ta);
    let (kb, n) = b.dims(tb);
    check_size("mxm", k, kb)?;
    check_size("mxm", m, c.nrows())?;
    check_size("mxm", n, c.ncols())?;
    check_overlap("mxm", desc, c.shares_storage(a) || c.shares_storage(b))?;
    check_domain::<A, MulLeft<R>>("mxm", desc)?;
    check_domain::<B, MulRight<R>>("mxm", desc)?;
    check_domain::<C, Accum<R>>("mxm", desc)?;

    let (a_rows, b_rows) = (a.row_lanes(ta), b.row_lanes(tb));
    if phase == Phase::Resize {
        let bound = symbolic_nnz(client, a_rows, b_rows, c.crs());
        return c.reserve_for(bound);
    }

    let (one_l, one_r): (MulLeft<R>, MulRight<R>) = (ring.one(), ring.one());
    let add = ring.additive_operator();
    let rows = numeric_rows(
        client,
        &ring,
        a_rows,
        b_rows,
        c.crs(),
        |x, y| ring.mul(lift(x, one_l), lift(y, one_r)),
        |acc, old| match old {
            Some(old) => add.apply(acc.cast(), old.cast()).cast(),
            None => acc.cast(),
        },
    );
    let crs = CompressedStorage::from_lanes(rows)?;
    c.commit(crs)
}

/// Merge `A` and `B` lane by lane into `C`.
#[allow(clippy::too_many_arguments)]
fn ewise_matrix<C, A, B, F, FA, FB>(
    client: &CpuClient,
    c: &mut Matrix<C>,
    a: &Matrix<A>,
    b: &Matrix<B>,
    strategy: MergeStrategy,
    desc: Descriptor,
    phase: Phase,
    op: F,
    only_a: FA,
    only_b: FB,
) -> Result<()>
where
    C: Element,
    A: Element,
    B: Element,
    F: Fn(A, B) -> C + Sync + Send,
    FA: Fn(A) -> C + Sync + Send,
    FB: Fn(B) -> C + Sync + Send,
{
    let (ta, tb) = (desc.transpose_left(), desc.transpose_right());
    let (m, n) = a.dims(ta);
    let (mb, nb) = b.dims(tb);
    check_size("eWiseApply", m, mb)?;
    check_size("eWiseApply", n, nb)?;
    check_size("eWiseApply", m, c.nrows())?;
    check_size("eWiseApply", n, c.ncols())?;
    check_overlap("eWiseApply", desc, c.shares_storage(a) || c.shares_storage(b))?;

    if phase == Phase::Resize {
        let bound = match strategy {
            MergeStrategy::Union => a.nonzeroes() + b.nonzeroes(),
            MergeStrategy::Intersection => a.nonzeroes().min(b.nonzeroes()),
        };
        return c.reserve_for(bound.min(m.saturating_mul(n)));
    }
    let crs = merge_stores(client, a.row_lanes(ta), b.row_lanes(tb), strategy, op, only_a, only_b)?;
    c.commit(crs)
}

/// Copy into `out` the entries of `A` (read transposed or not) for which
/// `keep(i, j)` holds.
#[allow(clippy::too_many_arguments)]
fn select<T, A, P>(
    client: &CpuClient,
    name: &'static str,
    out: &mut Matrix<T>,
    a: &Matrix<A>,
    transposed: bool,
    desc: Descriptor,
    phase: Phase,
    keep: P,
) -> Result<()>
where
    T: Element,
    A: Element,
    P: Fn(usize, usize) -> bool + Sync + Send,
{
    let (m, n) = a.dims(transposed);
    check_size(name, m, out.nrows())?;
    check_size(name, n, out.ncols())?;
    check_overlap(name, desc, out.shares_storage(a))?;

    let lanes = a.row_lanes(transposed);
    if phase == Phase::Resize {
        return out.reserve_for(lanes.nonzeroes());
    }
    let crs = filter_store(client, lanes, keep, |v| lift(v, T::one()))?;
    out.commit(crs)
}

fn outer_impl<T, U, V, Op>(
    client: &CpuClient,
    m: &mut Matrix<T>,
    u: &Vector<U>,
    v: &Vector<V>,
    op: Op,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    T: Element,
    U: Element,
    V: Element,
    Op: Operator,
{
    check_size("outer", u.size(), m.nrows())?;
    check_size("outer", v.size(), m.ncols())?;
    check_domain::<U, Op::D1>("outer", desc)?;
    check_domain::<V, Op::D2>("outer", desc)?;
    check_domain::<T, Op::D3>("outer", desc)?;

    if phase == Phase::Resize {
        return m.reserve_for(u.nonzeroes().saturating_mul(v.nonzeroes()));
    }
    let (one_u, one_v) = (<Op::D1 as Element>::one(), <Op::D2 as Element>::one());
    let row: Vec<(usize, Op::D2)> = v
        .to_sorted_vec()
        .into_iter()
        .map(|(j, vj)| (j, lift(vj, one_v)))
        .collect();
    let lanes = map_indices(client, u.size(), |i| {
        let ui = u.get(i).map(|ui| lift(ui, one_u));
        Some(match ui {
            Some(ui) => row.iter().map(|&(j, vj)| (j, op.apply(ui, vj).cast())).collect(),
            None => Vec::new(),
        })
    });
    let crs = CompressedStorage::from_lanes(lanes.into_iter().flatten().collect())?;
    m.commit(crs)
}

/// Apply `f` to the values of the row store and reinstall it, which
/// regenerates the column store.
fn lambda_matrix<T, F>(client: &CpuClient, a: &mut Matrix<T>, f: F) -> Result<()>
where
    T: Element,
    F: Fn(usize, usize, &mut T) + Sync + Send,
{
    if a.nonzeroes() == 0 {
        return Ok(());
    }
    let mut crs = a.crs().clone();
    let rows: Vec<usize> = (0..crs.major_dim())
        .flat_map(|r| std::iter::repeat(r).take(crs.offsets[r + 1] - crs.offsets[r]))
        .collect();
    let (indices, values) = (&crs.indices, &mut crs.values);

    #[cfg(feature = "rayon")]
    if client.parallel_for(values.len()) {
        let min_len = client.rayon_min_len();
        client.install_parallelism(|| {
            values
                .par_iter_mut()
                .zip(rows.par_iter().zip(indices.par_iter()))
                .with_min_len(min_len)
                .for_each(|(v, (&i, &j))| f(i, j, v));
        });
        return a.commit(crs);
    }
    #[cfg(not(feature = "rayon"))]
    let _ = client;

    for (v, (&i, &j)) in values.iter_mut().zip(rows.iter().zip(indices.iter())) {
        f(i, j, v);
    }
    a.commit(crs)
}

fn pattern_error(got: usize, expected: usize) -> Error {
    Error::invalid_argument(
        "zip",
        format!("inputs hold {got} and {expected} entries; their patterns must match"),
    )
}

/// Gather `(rows[k], cols[k], value(k))` for every `k` present in `rows`
/// into the row store of `A`.
fn zip_impl<T, I, J, G>(a: &mut Matrix<T>, rows: &Vector<I>, cols: &Vector<J>, value: G, phase: Phase) -> Result<()>
where
    T: Element,
    I: Element,
    J: Element,
    G: Fn(usize) -> Option<T>,
{
    check_size("zip", rows.size(), cols.size())?;
    let nz = rows.nonzeroes();
    if cols.nonzeroes() != nz {
        return Err(pattern_error(cols.nonzeroes(), nz));
    }
    if phase == Phase::Resize {
        return a.reserve_for(nz);
    }

    let (m, n) = (a.nrows(), a.ncols());
    let mut lanes: Vec<Vec<(usize, T)>> = vec![Vec::new(); m];
    for (k, i) in rows.to_sorted_vec() {
        let (Some(j), Some(v)) = (cols.get(k), value(k)) else {
            return Err(Error::invalid_argument(
                "zip",
                format!("position {k} is not present in every input"),
            ));
        };
        let (i, j) = (coordinate_of("zip", i, m)?, coordinate_of("zip", j, n)?);
        lanes[i].push((j, v));
    }
    for (i, lane) in lanes.iter_mut().enumerate() {
        lane.sort_unstable_by_key(|&(j, _)| j);
        if let Some(w) = lane.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(Error::DuplicateEntry { row: i, col: w[0].0 });
        }
    }
    tracing::debug!(nrows = m, ncols = n, nz, "zip");
    let crs = CompressedStorage::from_lanes(lanes)?;
    a.commit(crs)
}
