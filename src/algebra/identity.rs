//! Identity traits
//!
//! An identity is a zero-sized tag that produces a special value in any
//! domain. Monoids and semirings carry identities as type parameters, so the
//! same `MinPlus` structure yields `f64::INFINITY` over `f64` and `i32::MAX`
//! over `i32`.

use crate::dtype::Element;
use std::fmt::Debug;

/// A type-parameterised special value.
pub trait Identity: Copy + Default + Debug + Send + Sync + 'static {
    /// Name used in diagnostics
    const NAME: &'static str;

    /// The identity in domain `D`.
    fn value<D: Element>() -> D;
}

macro_rules! identity {
    ($(#[$doc:meta])* $name:ident, $label:literal, $value:expr) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
        pub struct $name;

        impl Identity for $name {
            const NAME: &'static str = $label;

            #[inline]
            fn value<D: Element>() -> D {
                $value
            }
        }
    };
}

identity!(
    /// Additive zero: `0`, `false`, `0+0i`.
    Zero,
    "zero",
    D::zero()
);
identity!(
    /// Multiplicative one: `1`, `true`, `1+0i`.
    One,
    "one",
    D::one()
);
identity!(
    /// Greatest value: `+inf` for floats, `MAX` for integers, `true` for bool.
    Infinity,
    "infinity",
    D::infinity()
);
identity!(
    /// Least value: `-inf` for floats, `MIN` for integers, `false` for bool.
    NegativeInfinity,
    "negative_infinity",
    D::neg_infinity()
);
identity!(
    /// Logical truth, cast into `D`.
    LogicalTrue,
    "logical_true",
    D::from_bool(true)
);
identity!(
    /// Logical falsehood, cast into `D`.
    LogicalFalse,
    "logical_false",
    D::from_bool(false)
);
