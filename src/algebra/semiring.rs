//! Semirings
//!
//! A semiring pairs an additive monoid (⊕, 0) with a multiplicative operator
//! and identity (⊗, 1). Domains are wired as `mul: D1 × D2 → D3` and
//! `add: D3 × D4 → D4`, so a kernel multiplies matrix and vector entries in
//! the multiplicative domain and accumulates in the additive one.
//!
//! Type parameters list the additive half first:
//! `SemiringOf<AddOp, MulOp, AddIdentity, MulIdentity>`. The named aliases in
//! [`semirings`](super::semirings) all follow that order.
//!
//! The laws below are trusted, not checked:
//!
//! - ⊕ is associative and commutative with identity 0
//! - ⊗ is associative with identity 1
//! - `x ⊗ 0 == 0 ⊗ x == 0`
//! - ⊗ distributes over ⊕

use super::identity::Identity;
use super::monoid::MonoidOf;
use super::operator::Operator;
use crate::dtype::Element;
use std::fmt::Debug;
use std::marker::PhantomData;

/// Multiplicative input domains of a semiring.
pub type MulLeft<R> = <<R as Semiring>::MulOp as Operator>::D1;
/// Right multiplicative input domain.
pub type MulRight<R> = <<R as Semiring>::MulOp as Operator>::D2;
/// Product domain.
pub type Product<R> = <<R as Semiring>::MulOp as Operator>::D3;
/// Accumulation domain.
pub type Accum<R> = <<R as Semiring>::AddOp as Operator>::D3;

/// An additive monoid and a multiplicative operator with identities.
pub trait Semiring: Copy + Default + Debug + Send + Sync + 'static {
    /// ⊕
    type AddOp: Operator;
    /// ⊗
    type MulOp: Operator;
    /// Identity of ⊕, annihilator of ⊗
    type Zero: Identity;
    /// Identity of ⊗
    type One: Identity;

    /// The additive operator.
    #[inline]
    fn additive_operator(&self) -> Self::AddOp {
        Self::AddOp::default()
    }

    /// The multiplicative operator.
    #[inline]
    fn multiplicative_operator(&self) -> Self::MulOp {
        Self::MulOp::default()
    }

    /// (⊕, 0) as a monoid.
    #[inline]
    fn additive_monoid(&self) -> MonoidOf<Self::AddOp, Self::Zero> {
        MonoidOf::new()
    }

    /// (⊗, 1) as a monoid.
    #[inline]
    fn multiplicative_monoid(&self) -> MonoidOf<Self::MulOp, Self::One> {
        MonoidOf::new()
    }

    /// The semiring zero in domain `D`.
    #[inline]
    fn zero<D: Element>(&self) -> D {
        <Self::Zero as Identity>::value::<D>()
    }

    /// The semiring one in domain `D`.
    #[inline]
    fn one<D: Element>(&self) -> D {
        <Self::One as Identity>::value::<D>()
    }

    /// `a ⊗ b`
    #[inline]
    fn mul(&self, a: MulLeft<Self>, b: MulRight<Self>) -> Product<Self> {
        self.multiplicative_operator().apply(a, b)
    }

    /// `acc ← p ⊕ acc`, with `p` cast into the additive domain.
    #[inline]
    fn accumulate(&self, acc: &mut Accum<Self>, p: Product<Self>) {
        let add = self.additive_operator();
        *acc = add.apply(p.cast(), acc.cast());
    }
}

/// The semiring with additive operator `AddOp`, multiplicative operator
/// `MulOp`, additive identity `ZeroId`, and multiplicative identity `OneId`.
///
/// ```
/// use sparsering::algebra::{Add, Infinity, Min, Semiring, SemiringOf, Zero};
///
/// let min_plus = SemiringOf::<Min<f64>, Add<f64>, Infinity, Zero>::new();
/// assert_eq!(min_plus.zero::<f64>(), f64::INFINITY);
/// assert_eq!(min_plus.mul(2.0, 3.0), 5.0);
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct SemiringOf<AddOp, MulOp, ZeroId, OneId>(
    PhantomData<fn() -> (AddOp, MulOp, ZeroId, OneId)>,
);

impl<AddOp, MulOp, ZeroId, OneId> SemiringOf<AddOp, MulOp, ZeroId, OneId>
where
    AddOp: Operator,
    MulOp: Operator,
    ZeroId: Identity,
    OneId: Identity,
{
    /// Create the semiring
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<AddOp, MulOp, ZeroId, OneId> Semiring for SemiringOf<AddOp, MulOp, ZeroId, OneId>
where
    AddOp: Operator,
    MulOp: Operator,
    ZeroId: Identity,
    OneId: Identity,
{
    type AddOp = AddOp;
    type MulOp = MulOp;
    type Zero = ZeroId;
    type One = OneId;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::semirings::{MaxTimes, MinPlus, PlusTimes};
    use crate::algebra::{Add, Max, Monoid, Mul, NegativeInfinity, One};

    #[test]
    fn test_components() {
        let r = PlusTimes::<f64>::new();
        assert_eq!(r.zero::<f64>(), 0.0);
        assert_eq!(r.one::<f64>(), 1.0);
        assert_eq!(r.additive_operator().apply(2.0, 3.0), 5.0);
        assert_eq!(r.multiplicative_operator().apply(2.0, 3.0), 6.0);
        assert_eq!(r.additive_monoid().identity::<f64>(), 0.0);
        assert_eq!(r.multiplicative_monoid().identity::<f64>(), 1.0);
    }

    #[test]
    fn test_accumulate() {
        let r = MinPlus::<i32>::new();
        let mut acc = r.zero::<i32>();
        r.accumulate(&mut acc, r.mul(2, 3));
        r.accumulate(&mut acc, r.mul(1, 1));
        assert_eq!(acc, 2);
    }

    #[test]
    fn test_additive_first_convention() {
        // most reliable path: max over products, identities (-inf, 1)
        let reliable = SemiringOf::<Max<f64>, Mul<f64>, NegativeInfinity, One>::new();
        let alias = MaxTimes::<f64>::new();
        assert_eq!(reliable.zero::<f64>(), alias.zero::<f64>());
        assert_eq!(reliable.one::<f64>(), alias.one::<f64>());
        let mut acc = reliable.zero::<f64>();
        reliable.accumulate(&mut acc, reliable.mul(0.9, 0.5));
        reliable.accumulate(&mut acc, reliable.mul(0.8, 0.8));
        assert_eq!(acc, 0.8 * 0.8);
        let _: SemiringOf<Add<f64>, Mul<f64>, crate::algebra::Zero, One> = PlusTimes::new();
    }
}
