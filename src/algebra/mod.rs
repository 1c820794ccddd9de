//! Algebraic structures: operators, identities, monoids, semirings
//!
//! Every kernel is parameterised by one of these objects. They are
//! zero-sized and `Copy`; all their information lives in the type.

mod identity;
mod monoid;
mod operator;
mod semiring;
pub mod semirings;

pub use identity::{Identity, Infinity, LogicalFalse, LogicalTrue, NegativeInfinity, One, Zero};
pub use monoid::{Monoid, MonoidOf};
pub use operator::{
    AbsDiff, Add, AnyOr, ArgMax, ArgMin, Divide, DivideReverse, Equal, EqualFirst, ExtendedAdd,
    ExtendedMul, Geq, GreaterThan, LeftAssign, Leq, LessThan, LogicalAnd, LogicalOr, Max, Min, Mul,
    NotEqual, Operator, Relu, RightAssign, SquareDiff, Subtract, Zip,
};
pub use semiring::{Accum, MulLeft, MulRight, Product, Semiring, SemiringOf};

use crate::dtype::Element;

/// Level-0 apply: `c = a ⊙ b` with all three values cast through the
/// operator's domains.
#[inline]
pub fn apply<Op, A, B, C>(op: &Op, a: A, b: B) -> C
where
    Op: Operator,
    A: Element,
    B: Element,
    C: Element,
{
    op.apply(a.cast(), b.cast()).cast()
}

/// Level-0 left fold: `acc ← acc ⊙ b`.
#[inline]
pub fn foldl<Op, A, B>(acc: &mut A, b: B, op: &Op)
where
    Op: Operator,
    A: Element,
    B: Element,
{
    *acc = op.apply(acc.cast(), b.cast()).cast();
}

/// Level-0 right fold: `acc ← a ⊙ acc`.
#[inline]
pub fn foldr<Op, A, B>(a: A, acc: &mut B, op: &Op)
where
    Op: Operator,
    A: Element,
    B: Element,
{
    *acc = op.apply(a.cast(), acc.cast()).cast();
}
