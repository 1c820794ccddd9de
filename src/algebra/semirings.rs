//! Named reference semirings
//!
//! | Alias | ⊕ | ⊗ | 0 | 1 | Typical use |
//! |-------|---|---|---|---|-------------|
//! | `PlusTimes` | + | × | 0 | 1 | linear algebra |
//! | `MinPlus` | min | + | +∞ | 0 | shortest paths |
//! | `MaxPlus` | max | + | −∞ | 0 | longest paths |
//! | `MinTimes` | min | × | +∞ | 1 | |
//! | `MaxTimes` | max | × | −∞ | 1 | most reliable paths |
//! | `MinMax` | min | max | +∞ | −∞ | minimax paths |
//! | `MaxMin` | max | min | −∞ | +∞ | bottleneck capacity |
//! | `PlusMin` | + | min | 0 | +∞ | |
//! | `LorLand` | ∨ | ∧ | false | true | reachability |
//! | `LandLor` | ∧ | ∨ | true | false | |
//! | `LxorLand` | ≠ | ∧ | false | true | GF(2) |
//! | `LxnorLor` | = | ∨ | true | false | |
//!
//! `EqOr` and `NeqAnd` are the same structures as `LxnorLor` and `LxorLand`.
//!
//! The tropical semirings multiply with [`ExtendedAdd`] or [`ExtendedMul`]
//! so that integer ±∞ stays absorbing. `PlusTimes` uses ordinary (wrapping)
//! integer arithmetic.

use super::identity::{Infinity, LogicalFalse, LogicalTrue, NegativeInfinity, One, Zero};
use super::operator::{
    Add, Equal, ExtendedAdd, ExtendedMul, LogicalAnd, LogicalOr, Max, Min, Mul, NotEqual,
};
use super::semiring::SemiringOf;

/// (+, ×, 0, 1)
pub type PlusTimes<D> = SemiringOf<Add<D>, Mul<D>, Zero, One>;
/// (min, +, +∞, 0)
pub type MinPlus<D> = SemiringOf<Min<D>, ExtendedAdd<D>, Infinity, Zero>;
/// (max, +, −∞, 0)
pub type MaxPlus<D> = SemiringOf<Max<D>, ExtendedAdd<D>, NegativeInfinity, Zero>;
/// (min, ×, +∞, 1)
pub type MinTimes<D> = SemiringOf<Min<D>, ExtendedMul<D>, Infinity, One>;
/// (max, ×, −∞, 1)
pub type MaxTimes<D> = SemiringOf<Max<D>, ExtendedMul<D>, NegativeInfinity, One>;
/// (min, max, +∞, −∞)
pub type MinMax<D> = SemiringOf<Min<D>, Max<D>, Infinity, NegativeInfinity>;
/// (max, min, −∞, +∞)
pub type MaxMin<D> = SemiringOf<Max<D>, Min<D>, NegativeInfinity, Infinity>;
/// (+, min, 0, +∞)
pub type PlusMin<D> = SemiringOf<Add<D>, Min<D>, Zero, Infinity>;
/// (∨, ∧, false, true)
pub type LorLand<D = bool> = SemiringOf<LogicalOr<D>, LogicalAnd<D>, LogicalFalse, LogicalTrue>;
/// (∧, ∨, true, false)
pub type LandLor<D = bool> = SemiringOf<LogicalAnd<D>, LogicalOr<D>, LogicalTrue, LogicalFalse>;
/// (≠, ∧, false, true)
pub type LxorLand = SemiringOf<NotEqual<bool>, LogicalAnd<bool>, LogicalFalse, LogicalTrue>;
/// (=, ∨, true, false)
pub type LxnorLor = SemiringOf<Equal<bool>, LogicalOr<bool>, LogicalTrue, LogicalFalse>;
/// Same structure as [`LxnorLor`]
pub type EqOr = LxnorLor;
/// Same structure as [`LxorLand`]
pub type NeqAnd = LxorLand;
