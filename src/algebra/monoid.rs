//! Monoids: an operator paired with its identity

use super::identity::Identity;
use super::operator::Operator;
use crate::dtype::Element;
use std::fmt::Debug;
use std::marker::PhantomData;

/// An associative operator with an identity.
///
/// `op.apply(x, id) == op.apply(id, x) == x` for every `x`.
pub trait Monoid: Copy + Default + Debug + Send + Sync + 'static {
    /// The underlying operator
    type Op: Operator;
    /// The identity tag
    type Id: Identity;

    /// The underlying operator.
    #[inline]
    fn operator(&self) -> Self::Op {
        Self::Op::default()
    }

    /// Identity in an arbitrary domain.
    #[inline]
    fn identity<D: Element>(&self) -> D {
        <Self::Id as Identity>::value::<D>()
    }

    /// Shorthand for `self.operator().apply(a, b)`.
    #[inline]
    fn apply(
        &self,
        a: <Self::Op as Operator>::D1,
        b: <Self::Op as Operator>::D2,
    ) -> <Self::Op as Operator>::D3 {
        self.operator().apply(a, b)
    }
}

/// The monoid built from operator `Op` and identity `Id`.
///
/// ```
/// use sparsering::algebra::{Add, Monoid, MonoidOf, Zero};
///
/// let sum = MonoidOf::<Add<f64>, Zero>::new();
/// assert_eq!(sum.apply(sum.identity(), 4.0), 4.0);
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct MonoidOf<Op, Id>(PhantomData<fn() -> (Op, Id)>);

impl<Op: Operator, Id: Identity> MonoidOf<Op, Id> {
    /// Create the monoid
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<Op: Operator, Id: Identity> Monoid for MonoidOf<Op, Id> {
    type Op = Op;
    type Id = Id;
}
