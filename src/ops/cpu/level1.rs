//! CPU implementation of the level-1 operations.

use super::common::{check_dense, check_domain, check_index_domain, check_overlap, check_size, index_as, lift};
use crate::algebra::{Accum, Monoid, MulLeft, MulRight, Operator, Semiring};
use crate::container::Vector;
use crate::container::mask::{MaskEval, NoMask, VectorMask};
use crate::descriptor::{Descriptor, Phase};
use crate::dtype::Element;
use crate::error::{Result, log_failure};
use crate::ops::Level1Ops;
use crate::runtime::cpu::CpuClient;
use crate::runtime::cpu::kernels::reduce::reduce_positions;
use crate::runtime::cpu::kernels::scatter::{accumulate_results, assign_results, map_indices, update_present};
use num_traits::Float;

impl Level1Ops for CpuClient {
    fn set_value<T, S>(&self, y: &mut Vector<T>, value: S, desc: Descriptor, phase: Phase) -> Result<()>
    where
        T: Element,
        S: Element,
    {
        set_value_impl(self, y, &NoMask, value, desc, phase).inspect_err(|e| log_failure("set", e))
    }

    fn set_value_masked<T, M, S>(
        &self,
        y: &mut Vector<T>,
        mask: &Vector<M>,
        value: S,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        T: Element,
        M: Element,
        S: Element,
    {
        check_size("set", y.size(), mask.size())
            .and_then(|_| set_value_impl(self, y, &VectorMask::new(mask, desc), value, desc, phase))
            .inspect_err(|e| log_failure("set", e))
    }

    fn set<T, U>(&self, y: &mut Vector<T>, x: &Vector<U>, desc: Descriptor, phase: Phase) -> Result<()>
    where
        T: Element,
        U: Element,
    {
        copy_impl(self, y, &NoMask, x, desc, phase).inspect_err(|e| log_failure("set", e))
    }

    fn set_masked<T, M, U>(
        &self,
        y: &mut Vector<T>,
        mask: &Vector<M>,
        x: &Vector<U>,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        T: Element,
        M: Element,
        U: Element,
    {
        check_size("set", y.size(), mask.size())
            .and_then(|_| copy_impl(self, y, &VectorMask::new(mask, desc), x, desc, phase))
            .inspect_err(|e| log_failure("set", e))
    }

    fn foldl_scalar<S, T, Mo>(&self, alpha: &mut S, x: &Vector<T>, monoid: Mo, desc: Descriptor) -> Result<()>
    where
        S: Element,
        T: Element,
        Mo: Monoid,
    {
        (|| -> Result<()> {
            check_domain::<T, <Mo::Op as Operator>::D2>("foldl", desc)?;
            check_domain::<S, <Mo::Op as Operator>::D3>("foldl", desc)?;
            let reduced = reduce_vector(self, x, monoid, desc)?;
            *alpha = monoid.operator().apply(alpha.cast(), reduced.cast()).cast();
            Ok(())
        })()
        .inspect_err(|e| log_failure("foldl", e))
    }

    fn foldr_scalar<T, S, Mo>(&self, x: &Vector<T>, alpha: &mut S, monoid: Mo, desc: Descriptor) -> Result<()>
    where
        T: Element,
        S: Element,
        Mo: Monoid,
    {
        (|| -> Result<()> {
            check_domain::<T, <Mo::Op as Operator>::D1>("foldr", desc)?;
            check_domain::<S, <Mo::Op as Operator>::D3>("foldr", desc)?;
            let reduced = reduce_vector(self, x, monoid, desc)?;
            *alpha = monoid.operator().apply(reduced.cast(), alpha.cast()).cast();
            Ok(())
        })()
        .inspect_err(|e| log_failure("foldr", e))
    }

    fn foldl<T, U, Op>(&self, y: &mut Vector<T>, x: &Vector<U>, op: Op, desc: Descriptor, phase: Phase) -> Result<()>
    where
        T: Element,
        U: Element,
        Op: Operator,
    {
        (|| -> Result<()> {
            check_domain::<T, Op::D1>("foldl", desc)?;
            check_domain::<U, Op::D2>("foldl", desc)?;
            fold_vector(self, "foldl", y, x, false, desc, phase, |old, xv| {
                let old = old.map_or_else(<Op::D1 as Element>::zero, |o| o.cast());
                op.apply(old, lift(xv, <Op::D2 as Element>::one())).cast()
            })
        })()
        .inspect_err(|e| log_failure("foldl", e))
    }

    fn foldl_monoid<T, U, Mo>(
        &self,
        y: &mut Vector<T>,
        x: &Vector<U>,
        monoid: Mo,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        T: Element,
        U: Element,
        Mo: Monoid,
    {
        let op = monoid.operator();
        (|| -> Result<()> {
            check_domain::<T, <Mo::Op as Operator>::D1>("foldl", desc)?;
            check_domain::<U, <Mo::Op as Operator>::D2>("foldl", desc)?;
            fold_vector(self, "foldl", y, x, true, desc, phase, |old, xv| {
                let old = old.map_or_else(|| monoid.identity(), |o| o.cast());
                op.apply(old, lift(xv, Element::one())).cast()
            })
        })()
        .inspect_err(|e| log_failure("foldl", e))
    }

    fn foldr<U, T, Op>(&self, x: &Vector<U>, y: &mut Vector<T>, op: Op, desc: Descriptor, phase: Phase) -> Result<()>
    where
        U: Element,
        T: Element,
        Op: Operator,
    {
        (|| -> Result<()> {
            check_domain::<U, Op::D1>("foldr", desc)?;
            check_domain::<T, Op::D2>("foldr", desc)?;
            fold_vector(self, "foldr", y, x, false, desc, phase, |old, xv| {
                let old = old.map_or_else(<Op::D2 as Element>::zero, |o| o.cast());
                op.apply(lift(xv, <Op::D1 as Element>::one()), old).cast()
            })
        })()
        .inspect_err(|e| log_failure("foldr", e))
    }

    fn foldr_monoid<U, T, Mo>(
        &self,
        x: &Vector<U>,
        y: &mut Vector<T>,
        monoid: Mo,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        U: Element,
        T: Element,
        Mo: Monoid,
    {
        let op = monoid.operator();
        (|| -> Result<()> {
            check_domain::<U, <Mo::Op as Operator>::D1>("foldr", desc)?;
            check_domain::<T, <Mo::Op as Operator>::D2>("foldr", desc)?;
            fold_vector(self, "foldr", y, x, true, desc, phase, |old, xv| {
                let old = old.map_or_else(|| monoid.identity(), |o| o.cast());
                op.apply(lift(xv, Element::one()), old).cast()
            })
        })()
        .inspect_err(|e| log_failure("foldr", e))
    }

    fn ewise_apply<Z, X, Y, Op>(
        &self,
        z: &mut Vector<Z>,
        x: &Vector<X>,
        y: &Vector<Y>,
        op: Op,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        Z: Element,
        X: Element,
        Y: Element,
        Op: Operator,
    {
        ewise_apply_op(self, z, &NoMask, x, y, op, desc, phase).inspect_err(|e| log_failure("eWiseApply", e))
    }

    fn ewise_apply_monoid<Z, X, Y, Mo>(
        &self,
        z: &mut Vector<Z>,
        x: &Vector<X>,
        y: &Vector<Y>,
        monoid: Mo,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        Z: Element,
        X: Element,
        Y: Element,
        Mo: Monoid,
    {
        ewise_apply_union(self, z, &NoMask, x, y, monoid, desc, phase)
            .inspect_err(|e| log_failure("eWiseApply", e))
    }

    fn ewise_apply_masked<Z, M, X, Y, Op>(
        &self,
        z: &mut Vector<Z>,
        mask: &Vector<M>,
        x: &Vector<X>,
        y: &Vector<Y>,
        op: Op,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        Z: Element,
        M: Element,
        X: Element,
        Y: Element,
        Op: Operator,
    {
        check_size("eWiseApply", z.size(), mask.size())
            .and_then(|_| ewise_apply_op(self, z, &VectorMask::new(mask, desc), x, y, op, desc, phase))
            .inspect_err(|e| log_failure("eWiseApply", e))
    }

    fn ewise_apply_monoid_masked<Z, M, X, Y, Mo>(
        &self,
        z: &mut Vector<Z>,
        mask: &Vector<M>,
        x: &Vector<X>,
        y: &Vector<Y>,
        monoid: Mo,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        Z: Element,
        M: Element,
        X: Element,
        Y: Element,
        Mo: Monoid,
    {
        check_size("eWiseApply", z.size(), mask.size())
            .and_then(|_| ewise_apply_union(self, z, &VectorMask::new(mask, desc), x, y, monoid, desc, phase))
            .inspect_err(|e| log_failure("eWiseApply", e))
    }

    fn ewise_mul<Z, X, Y, R>(
        &self,
        z: &mut Vector<Z>,
        x: &Vector<X>,
        y: &Vector<Y>,
        ring: R,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        Z: Element,
        X: Element,
        Y: Element,
        R: Semiring,
    {
        (|| -> Result<()> {
            check_domain::<X, MulLeft<R>>("eWiseMul", desc)?;
            check_domain::<Y, MulRight<R>>("eWiseMul", desc)?;
            check_domain::<Z, Accum<R>>("eWiseMul", desc)?;
            let (one_l, one_r): (MulLeft<R>, MulRight<R>) = (ring.one(), ring.one());
            accumulate_ewise(self, "eWiseMul", z, x, y, ring, false, desc, phase, |a, b| {
                match (a, b) {
                    (Some(a), Some(b)) => Some(ring.mul(lift(a, one_l), lift(b, one_r)).cast()),
                    _ => None,
                }
            })
        })()
        .inspect_err(|e| log_failure("eWiseMul", e))
    }

    fn ewise_add<Z, X, Y, R>(
        &self,
        z: &mut Vector<Z>,
        x: &Vector<X>,
        y: &Vector<Y>,
        ring: R,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        Z: Element,
        X: Element,
        Y: Element,
        R: Semiring,
    {
        (|| -> Result<()> {
            check_domain::<X, Accum<R>>("eWiseAdd", desc)?;
            check_domain::<Y, Accum<R>>("eWiseAdd", desc)?;
            check_domain::<Z, Accum<R>>("eWiseAdd", desc)?;
            let add = ring.additive_operator();
            let one: Accum<R> = ring.one();
            accumulate_ewise(self, "eWiseAdd", z, x, y, ring, true, desc, phase, |a, b| {
                match (a, b) {
                    (Some(a), Some(b)) => Some(add.apply(lift(a, one).cast(), lift(b, one).cast()).cast()),
                    (Some(a), None) => Some(lift(a, one).cast()),
                    (None, Some(b)) => Some(lift(b, one).cast()),
                    (None, None) => None,
                }
            })
        })()
        .inspect_err(|e| log_failure("eWiseAdd", e))
    }

    fn dot<S, X, Y, R>(&self, alpha: &mut S, x: &Vector<X>, y: &Vector<Y>, ring: R, desc: Descriptor) -> Result<()>
    where
        S: Element,
        X: Element,
        Y: Element,
        R: Semiring,
    {
        dot_impl(self, alpha, x, y, ring, desc).inspect_err(|e| log_failure("dot", e))
    }

    fn norm2<S, X, R>(&self, alpha: &mut S, x: &Vector<X>, ring: R, desc: Descriptor) -> Result<()>
    where
        S: Element + Float,
        X: Element,
        R: Semiring,
    {
        let mut squares = <S as Element>::zero();
        dot_impl(self, &mut squares, x, x, ring, desc).inspect_err(|e| log_failure("norm2", e))?;
        *alpha = Float::sqrt(squares);
        Ok(())
    }

    fn ewise_lambda<T, F>(&self, y: &mut Vector<T>, f: F, desc: Descriptor) -> Result<()>
    where
        T: Element,
        F: Fn(usize, &mut T) + Sync + Send,
    {
        check_dense(desc, y).inspect_err(|e| log_failure("eWiseLambda", e))?;
        update_present(self, y, f);
        Ok(())
    }
}

fn set_value_impl<T, S, Mk>(
    client: &CpuClient,
    y: &mut Vector<T>,
    mask: &Mk,
    value: S,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    T: Element,
    S: Element,
    Mk: MaskEval,
{
    check_domain::<S, T>("set", desc)?;
    let n = y.size();
    let use_index = desc.use_index();
    // index form over the unmasked vector keeps the current pattern
    let keep_pattern = use_index && !desc.dense() && mask.is_trivial();
    if phase == Phase::Resize {
        let bound = if keep_pattern {
            y.nonzeroes()
        } else if mask.is_trivial() {
            n
        } else {
            (0..n).filter(|&i| mask.allows(i)).count()
        };
        y.reserve(bound);
        return Ok(());
    }
    let value: T = value.cast();
    let results = {
        let present = y.coords();
        let written = |i: usize| mask.allows(i) && (!keep_pattern || present.assigned(i));
        if use_index {
            check_index_domain::<T>(n, written)?;
        }
        map_indices(client, n, |i| {
            if !written(i) {
                return None;
            }
            Some(if use_index { index_as(i) } else { value })
        })
    };
    assign_results(client, y, &results)
}

fn copy_impl<T, U, Mk>(
    client: &CpuClient,
    y: &mut Vector<T>,
    mask: &Mk,
    x: &Vector<U>,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    T: Element,
    U: Element,
    Mk: MaskEval,
{
    check_size("set", y.size(), x.size())?;
    check_domain::<U, T>("set", desc)?;
    check_overlap("set", desc, y.shares_storage(x))?;
    check_dense(desc, x)?;
    check_dense(desc, y)?;
    if phase == Phase::Resize {
        y.reserve(x.nonzeroes());
        return Ok(());
    }
    let use_index = desc.use_index();
    if use_index {
        check_index_domain::<T>(x.size(), |i| mask.allows(i) && x.get(i).is_some())?;
    }
    let results = map_indices(client, x.size(), |i| {
        if !mask.allows(i) {
            return None;
        }
        x.get(i).map(|v| if use_index { index_as(i) } else { lift(v, T::one()) })
    });
    assign_results(client, y, &results)
}

/// `⊕_i x[i]` in the monoid's output domain.
///
/// Entries are combined in index order unless the operator commutes.
fn reduce_vector<T, Mo>(client: &CpuClient, x: &Vector<T>, monoid: Mo, desc: Descriptor) -> Result<<Mo::Op as Operator>::D3>
where
    T: Element,
    Mo: Monoid,
{
    check_dense(desc, x)?;
    let op = monoid.operator();
    let mut positions = x.coords().indices().to_vec();
    if !<Mo::Op as Operator>::COMMUTATIVE {
        positions.sort_unstable();
    }
    let values = x.raw_values();
    Ok(reduce_positions(
        client,
        &positions,
        monoid.identity(),
        |i| Some(lift(values[i], Element::one())),
        |a, b| op.apply(a.cast(), b.cast()),
    ))
}

/// In-place vector fold: `f(y[i], x[i])` for every present `x[i]`.
///
/// Without `union`, positions missing from `y` are skipped.
#[allow(clippy::too_many_arguments)]
fn fold_vector<T, U, F>(
    client: &CpuClient,
    name: &'static str,
    y: &mut Vector<T>,
    x: &Vector<U>,
    union: bool,
    desc: Descriptor,
    phase: Phase,
    f: F,
) -> Result<()>
where
    T: Element,
    U: Element,
    F: Fn(Option<T>, U) -> T + Sync + Send,
{
    check_size(name, y.size(), x.size())?;
    check_dense(desc, x)?;
    check_dense(desc, y)?;
    if phase == Phase::Resize {
        if union {
            let fresh = x.iter().filter(|&(i, _)| !y.coords().assigned(i)).count();
            y.reserve(y.nonzeroes() + fresh);
        }
        return Ok(());
    }
    let results = {
        let present = y.coords();
        let old = y.raw_values();
        map_indices(client, y.size(), |i| {
            let xv = x.get(i)?;
            let cur = present.assigned(i).then(|| old[i]);
            if cur.is_none() && !union {
                return None;
            }
            Some(f(cur, xv))
        })
    };
    accumulate_results(client, y, &results, |new, _| new)
}

/// Out-of-place element-wise kernel: `z[i] = f(x[i], y[i])` wherever the
/// mask allows and `f` yields a value.
#[allow(clippy::too_many_arguments)]
fn ewise_out_of_place<Z, X, Y, Mk, F>(
    client: &CpuClient,
    z: &mut Vector<Z>,
    mask: &Mk,
    x: &Vector<X>,
    y: &Vector<Y>,
    bound: usize,
    desc: Descriptor,
    phase: Phase,
    f: F,
) -> Result<()>
where
    Z: Element,
    X: Element,
    Y: Element,
    Mk: MaskEval,
    F: Fn(Option<X>, Option<Y>) -> Option<Z> + Sync + Send,
{
    check_size("eWiseApply", z.size(), x.size())?;
    check_size("eWiseApply", z.size(), y.size())?;
    check_overlap("eWiseApply", desc, z.shares_storage(x) || z.shares_storage(y))?;
    check_dense(desc, x)?;
    check_dense(desc, y)?;
    check_dense(desc, z)?;
    if phase == Phase::Resize {
        z.reserve(bound);
        return Ok(());
    }
    let results = map_indices(client, z.size(), |i| {
        if mask.allows(i) { f(x.get(i), y.get(i)) } else { None }
    });
    assign_results(client, z, &results)
}

#[allow(clippy::too_many_arguments)]
fn ewise_apply_op<Z, X, Y, Mk, Op>(
    client: &CpuClient,
    z: &mut Vector<Z>,
    mask: &Mk,
    x: &Vector<X>,
    y: &Vector<Y>,
    op: Op,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    Z: Element,
    X: Element,
    Y: Element,
    Mk: MaskEval,
    Op: Operator,
{
    check_domain::<X, Op::D1>("eWiseApply", desc)?;
    check_domain::<Y, Op::D2>("eWiseApply", desc)?;
    check_domain::<Z, Op::D3>("eWiseApply", desc)?;
    let bound = x.nonzeroes().min(y.nonzeroes());
    ewise_out_of_place(client, z, mask, x, y, bound, desc, phase, |a, b| match (a, b) {
        (Some(a), Some(b)) => Some(op.apply(lift(a, <Op::D1 as Element>::one()), lift(b, <Op::D2 as Element>::one())).cast()),
        _ => None,
    })
}

#[allow(clippy::too_many_arguments)]
fn ewise_apply_union<Z, X, Y, Mk, Mo>(
    client: &CpuClient,
    z: &mut Vector<Z>,
    mask: &Mk,
    x: &Vector<X>,
    y: &Vector<Y>,
    monoid: Mo,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    Z: Element,
    X: Element,
    Y: Element,
    Mk: MaskEval,
    Mo: Monoid,
{
    check_domain::<X, <Mo::Op as Operator>::D1>("eWiseApply", desc)?;
    check_domain::<Y, <Mo::Op as Operator>::D2>("eWiseApply", desc)?;
    check_domain::<Z, <Mo::Op as Operator>::D3>("eWiseApply", desc)?;
    let op = monoid.operator();
    let bound = x.nonzeroes() + y.nonzeroes();
    ewise_out_of_place(client, z, mask, x, y, bound, desc, phase, |a, b| {
        if a.is_none() && b.is_none() {
            return None;
        }
        let a = a.map_or_else(|| monoid.identity(), |a| lift(a, Element::one()));
        let b = b.map_or_else(|| monoid.identity(), |b| lift(b, Element::one()));
        Some(op.apply(a, b).cast())
    })
}

/// In-place element-wise kernel: `z[i] ← f(x[i], y[i]) ⊕ z[i]`.
#[allow(clippy::too_many_arguments)]
fn accumulate_ewise<Z, X, Y, R, F>(
    client: &CpuClient,
    name: &'static str,
    z: &mut Vector<Z>,
    x: &Vector<X>,
    y: &Vector<Y>,
    ring: R,
    union: bool,
    desc: Descriptor,
    phase: Phase,
    f: F,
) -> Result<()>
where
    Z: Element,
    X: Element,
    Y: Element,
    R: Semiring,
    F: Fn(Option<X>, Option<Y>) -> Option<Z> + Sync + Send,
{
    check_size(name, z.size(), x.size())?;
    check_size(name, z.size(), y.size())?;
    check_overlap(name, desc, z.shares_storage(x) || z.shares_storage(y))?;
    check_dense(desc, x)?;
    check_dense(desc, y)?;
    check_dense(desc, z)?;
    if phase == Phase::Resize {
        let incoming = if union {
            x.nonzeroes() + y.nonzeroes()
        } else {
            x.nonzeroes().min(y.nonzeroes())
        };
        z.reserve(z.nonzeroes() + incoming);
        return Ok(());
    }
    let results = map_indices(client, z.size(), |i| f(x.get(i), y.get(i)));
    let add = ring.additive_operator();
    accumulate_results(client, z, &results, |new, old| add.apply(new.cast(), old.cast()).cast())
}

fn dot_impl<S, X, Y, R>(
    client: &CpuClient,
    alpha: &mut S,
    x: &Vector<X>,
    y: &Vector<Y>,
    ring: R,
    desc: Descriptor,
) -> Result<()>
where
    S: Element,
    X: Element,
    Y: Element,
    R: Semiring,
{
    check_size("dot", x.size(), y.size())?;
    check_domain::<X, MulLeft<R>>("dot", desc)?;
    check_domain::<Y, MulRight<R>>("dot", desc)?;
    check_domain::<S, Accum<R>>("dot", desc)?;
    check_dense(desc, x)?;
    check_dense(desc, y)?;

    let add = ring.additive_operator();
    let (one_l, one_r): (MulLeft<R>, MulRight<R>) = (ring.one(), ring.one());
    let (xs, ys) = (x.raw_values(), y.raw_values());
    let (xc, yc) = (x.coords(), y.coords());
    // walk the sparser support, look up the other
    let positions = if x.nonzeroes() <= y.nonzeroes() {
        xc.indices().to_vec()
    } else {
        yc.indices().to_vec()
    };
    let sum: Accum<R> = reduce_positions(
        client,
        &positions,
        ring.zero(),
        |i| {
            (xc.assigned(i) && yc.assigned(i))
                .then(|| ring.mul(lift(xs[i], one_l), lift(ys[i], one_r)).cast())
        },
        |a, b| add.apply(a.cast(), b.cast()),
    );
    *alpha = add.apply(sum.cast(), alpha.cast()).cast();
    Ok(())
}
