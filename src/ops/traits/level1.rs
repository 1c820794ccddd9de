//! Level-1 operations: vector-vector and vector-scalar

use crate::algebra::{Monoid, Operator, Semiring};
use crate::container::Vector;
use crate::descriptor::{Descriptor, Phase};
use crate::dtype::Element;
use crate::error::Result;
use num_traits::Float;

/// Vector kernels.
///
/// Output arguments come first. Kernels that write a vector take a
/// [`Phase`]: RESIZE only makes sure the output can hold the result,
/// EXECUTE computes it. Out-of-place kernels (`set*`, `ewise_apply*`)
/// replace the output's contents; in-place kernels (`fold*`, `ewise_mul`,
/// `ewise_add`) combine with what is already there.
///
/// Sizes of all vector arguments must agree (MISMATCH otherwise). Under
/// [`Descriptor::DENSE`] every vector argument must hold all its entries
/// (ILLEGAL otherwise). An output that shares storage with an input is
/// reported as OVERLAP unless [`Descriptor::SAFE_OVERLAP`] is given.
pub trait Level1Ops {
    /// `y[i] = value` at every position; the result is dense.
    ///
    /// With [`Descriptor::USE_INDEX`] the index `i` is written instead,
    /// and only at positions already present in `y` unless
    /// [`Descriptor::DENSE`] is also set.
    fn set_value<T, S>(&self, y: &mut Vector<T>, value: S, desc: Descriptor, phase: Phase) -> Result<()>
    where
        T: Element,
        S: Element;

    /// `y[i] = value` where the mask allows; `y` holds nothing else after.
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
        S: Element;

    /// Copy: `y` gets exactly the entries of `x`.
    fn set<T, U>(&self, y: &mut Vector<T>, x: &Vector<U>, desc: Descriptor, phase: Phase) -> Result<()>
    where
        T: Element,
        U: Element;

    /// Copy restricted to the positions the mask allows.
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
        U: Element;

    /// `α ← α ⊕ (⊕_i x[i])`.
    fn foldl_scalar<S, T, Mo>(&self, alpha: &mut S, x: &Vector<T>, monoid: Mo, desc: Descriptor) -> Result<()>
    where
        S: Element,
        T: Element,
        Mo: Monoid;

    /// `α ← (⊕_i x[i]) ⊕ α`.
    fn foldr_scalar<T, S, Mo>(&self, x: &Vector<T>, alpha: &mut S, monoid: Mo, desc: Descriptor) -> Result<()>
    where
        T: Element,
        S: Element,
        Mo: Monoid;

    /// `y[i] ← y[i] ⊙ x[i]` where both are present.
    fn foldl<T, U, Op>(&self, y: &mut Vector<T>, x: &Vector<U>, op: Op, desc: Descriptor, phase: Phase) -> Result<()>
    where
        T: Element,
        U: Element,
        Op: Operator;

    /// `y[i] ← y[i] ⊕ x[i]` wherever `x` is present; a missing `y[i]`
    /// counts as the identity.
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
        Mo: Monoid;

    /// `y[i] ← x[i] ⊙ y[i]` where both are present.
    fn foldr<U, T, Op>(&self, x: &Vector<U>, y: &mut Vector<T>, op: Op, desc: Descriptor, phase: Phase) -> Result<()>
    where
        U: Element,
        T: Element,
        Op: Operator;

    /// `y[i] ← x[i] ⊕ y[i]` wherever `x` is present.
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
        Mo: Monoid;

    /// `z[i] = x[i] ⊙ y[i]` over the intersection of supports.
    #[allow(clippy::too_many_arguments)]
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
        Op: Operator;

    /// `z[i] = x[i] ⊕ y[i]` over the union of supports, a missing side
    /// replaced by the identity.
    #[allow(clippy::too_many_arguments)]
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
        Mo: Monoid;

    /// [`Level1Ops::ewise_apply`] restricted to the positions the mask
    /// allows.
    #[allow(clippy::too_many_arguments)]
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
        Op: Operator;

    /// [`Level1Ops::ewise_apply_monoid`] restricted to the positions the
    /// mask allows.
    #[allow(clippy::too_many_arguments)]
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
        Mo: Monoid;

    /// `z[i] ← z[i] ⊕ (x[i] ⊗ y[i])` over the intersection of `x` and `y`.
    #[allow(clippy::too_many_arguments)]
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
        R: Semiring;

    /// `z[i] ← z[i] ⊕ (x[i] ⊕ y[i])` over the union of `x` and `y`.
    #[allow(clippy::too_many_arguments)]
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
        R: Semiring;

    /// `α ← α ⊕ ⊕_i (x[i] ⊗ y[i])` over the intersection of supports.
    fn dot<S, X, Y, R>(&self, alpha: &mut S, x: &Vector<X>, y: &Vector<Y>, ring: R, desc: Descriptor) -> Result<()>
    where
        S: Element,
        X: Element,
        Y: Element,
        R: Semiring;

    /// `α = √(x · x)` under `ring`, for floating-point `α`.
    ///
    /// Unlike [`Level1Ops::dot`] the incoming value of `α` is ignored.
    fn norm2<S, X, R>(&self, alpha: &mut S, x: &Vector<X>, ring: R, desc: Descriptor) -> Result<()>
    where
        S: Element + Float,
        X: Element,
        R: Semiring;

    /// Call `f(i, &mut y[i])` at every present entry of `y`.
    ///
    /// The pattern of `y` is unchanged; entries may be visited
    /// concurrently and in any order.
    fn ewise_lambda<T, F>(&self, y: &mut Vector<T>, f: F, desc: Descriptor) -> Result<()>
    where
        T: Element,
        F: Fn(usize, &mut T) + Sync + Send;
}
