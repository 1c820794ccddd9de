//! Binary operators
//!
//! An operator is a pure function `D1 × D2 → D3`. Built-in operators cast
//! both inputs into the output domain before combining them, so
//! `Add<i32, f64, f64>` adds an integer to a double in double precision.
//! Casting between identical domains is free.
//!
//! Associativity and commutativity are declared through
//! [`Operator::ASSOCIATIVE`] and [`Operator::COMMUTATIVE`]. They are trusted,
//! never checked.

use crate::dtype::Element;
use std::fmt::Debug;
use std::marker::PhantomData;

/// A binary function over a domain triple.
pub trait Operator: Copy + Default + Debug + Send + Sync + 'static {
    /// Left input domain
    type D1: Element;
    /// Right input domain
    type D2: Element;
    /// Output domain
    type D3: Element;

    /// `apply(apply(a, b), c) == apply(a, apply(b, c))`
    const ASSOCIATIVE: bool;
    /// `apply(a, b) == apply(b, a)`
    const COMMUTATIVE: bool;
    /// Name used in diagnostics
    const NAME: &'static str;

    /// Compute `a ⊙ b`.
    fn apply(&self, a: Self::D1, b: Self::D2) -> Self::D3;

    /// In-place left fold: `acc ← acc ⊙ b`.
    #[inline]
    fn foldl(&self, acc: &mut Self::D3, b: Self::D2) {
        *acc = self.apply(acc.cast(), b);
    }

    /// In-place right fold: `acc ← a ⊙ acc`.
    #[inline]
    fn foldr(&self, a: Self::D1, acc: &mut Self::D3) {
        *acc = self.apply(a, acc.cast());
    }
}

macro_rules! operator {
    (
        $(#[$doc:meta])*
        $name:ident<D3 = $out:ty>, $label:literal,
        associative: $assoc:literal, commutative: $comm:literal,
        |$a:ident, $b:ident| $body:expr
    ) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Debug, Default)]
        pub struct $name<D1, D2 = D1, D3 = $out>(PhantomData<fn() -> (D1, D2, D3)>);

        impl<D1: Element, D2: Element, D3: Element> $name<D1, D2, D3> {
            /// Create the operator
            pub fn new() -> Self {
                Self(PhantomData)
            }
        }

        impl<D1: Element, D2: Element, D3: Element> Operator for $name<D1, D2, D3> {
            type D1 = D1;
            type D2 = D2;
            type D3 = D3;

            const ASSOCIATIVE: bool = $assoc;
            const COMMUTATIVE: bool = $comm;
            const NAME: &'static str = $label;

            #[inline]
            fn apply(&self, $a: D1, $b: D2) -> D3 {
                $body
            }
        }
    };
}

operator!(
    /// `c = a`
    LeftAssign<D3 = D1>, "left_assign",
    associative: true, commutative: false,
    |a, _b| a.cast()
);

operator!(
    /// `c = b`
    RightAssign<D3 = D1>, "right_assign",
    associative: true, commutative: false,
    |_a, b| b.cast()
);

operator!(
    /// `c = a + b`
    Add<D3 = D1>, "add",
    associative: true, commutative: true,
    |a, b| a.cast::<D3>().plus(b.cast())
);

operator!(
    /// `c = a * b`
    Mul<D3 = D1>, "mul",
    associative: true, commutative: true,
    |a, b| a.cast::<D3>().times(b.cast())
);

operator!(
    /// `c = a + b` with the domain's infinities absorbing.
    ///
    /// Integer sums saturate instead of wrapping, so `MAX` and `MIN` behave
    /// as ±∞. This is the multiplicative operator of the tropical semirings.
    ExtendedAdd<D3 = D1>, "extended_add",
    associative: true, commutative: true,
    |a, b| a.cast::<D3>().extended_plus(b.cast())
);

operator!(
    /// `c = a * b` with the domain's infinities absorbing and saturating
    /// integer products.
    ExtendedMul<D3 = D1>, "extended_mul",
    associative: true, commutative: true,
    |a, b| a.cast::<D3>().extended_times(b.cast())
);

operator!(
    /// `c = max(a, b)`
    Max<D3 = D1>, "max",
    associative: true, commutative: true,
    |a, b| a.cast::<D3>().maximum(b.cast())
);

operator!(
    /// `c = min(a, b)`
    Min<D3 = D1>, "min",
    associative: true, commutative: true,
    |a, b| a.cast::<D3>().minimum(b.cast())
);

operator!(
    /// `c = a - b`
    Subtract<D3 = D1>, "subtract",
    associative: false, commutative: false,
    |a, b| a.cast::<D3>().minus(b.cast())
);

operator!(
    /// `c = a / b`
    Divide<D3 = D1>, "divide",
    associative: false, commutative: false,
    |a, b| a.cast::<D3>().divide(b.cast())
);

operator!(
    /// `c = b / a`
    DivideReverse<D3 = D1>, "divide_reverse",
    associative: false, commutative: false,
    |a, b| b.cast::<D3>().divide(a.cast())
);

operator!(
    /// `c = (a == b)`, comparing in the left domain
    Equal<D3 = bool>, "equal",
    associative: true, commutative: true,
    |a, b| D3::from_bool(a == b.cast::<D1>())
);

operator!(
    /// `c = (a != b)`, comparing in the left domain
    NotEqual<D3 = bool>, "not_equal",
    associative: true, commutative: true,
    |a, b| D3::from_bool(a != b.cast::<D1>())
);

operator!(
    /// `c = a` if `a` is nonzero, else `b`
    AnyOr<D3 = D1>, "any_or",
    associative: true, commutative: true,
    |a, b| if a.is_nonzero() { a.cast() } else { b.cast() }
);

operator!(
    /// `c = a || b` on truthiness
    LogicalOr<D3 = D1>, "logical_or",
    associative: true, commutative: true,
    |a, b| D3::from_bool(a.is_nonzero() || b.is_nonzero())
);

operator!(
    /// `c = a && b` on truthiness
    LogicalAnd<D3 = D1>, "logical_and",
    associative: true, commutative: true,
    |a, b| D3::from_bool(a.is_nonzero() && b.is_nonzero())
);

operator!(
    /// `c = b` if `a < b`, else `a`; with `b = 0` this is the rectifier
    Relu<D3 = D1>, "relu",
    associative: true, commutative: true,
    |a, b| {
        let (x, y) = (a.cast::<D3>(), b.cast::<D3>());
        if x.less_than(y) { y } else { x }
    }
);

operator!(
    /// `c = |a - b|`
    AbsDiff<D3 = D1>, "abs_diff",
    associative: false, commutative: true,
    |a, b| {
        let (x, y) = (a.cast::<D3>(), b.cast::<D3>());
        if x.less_than(y) { y.minus(x) } else { x.minus(y) }
    }
);

operator!(
    /// `c = (a - b)²`
    SquareDiff<D3 = D1>, "square_diff",
    associative: false, commutative: true,
    |a, b| {
        let (x, y) = (a.cast::<D3>(), b.cast::<D3>());
        let d = if x.less_than(y) { y.minus(x) } else { x.minus(y) };
        d.times(d)
    }
);

operator!(
    /// `c = a < b`
    LessThan<D3 = bool>, "less_than",
    associative: false, commutative: false,
    |a, b| D3::from_bool(a.less_than(b.cast()))
);

operator!(
    /// `c = a <= b`
    Leq<D3 = bool>, "leq",
    associative: false, commutative: false,
    |a, b| D3::from_bool(!b.cast::<D1>().less_than(a))
);

operator!(
    /// `c = a > b`
    GreaterThan<D3 = bool>, "greater_than",
    associative: false, commutative: false,
    |a, b| D3::from_bool(b.cast::<D1>().less_than(a))
);

operator!(
    /// `c = a >= b`
    Geq<D3 = bool>, "geq",
    associative: false, commutative: false,
    |a, b| D3::from_bool(!a.less_than(b.cast()))
);

/// `c = (a, b)`
#[derive(Copy, Clone, Debug, Default)]
pub struct Zip<D1, D2>(PhantomData<fn() -> (D1, D2)>);

impl<D1: Element, D2: Element> Zip<D1, D2> {
    /// Create the operator
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<D1: Element, D2: Element> Operator for Zip<D1, D2> {
    type D1 = D1;
    type D2 = D2;
    type D3 = (D1, D2);

    const ASSOCIATIVE: bool = false;
    const COMMUTATIVE: bool = false;
    const NAME: &'static str = "zip";

    #[inline]
    fn apply(&self, a: D1, b: D2) -> (D1, D2) {
        (a, b)
    }
}

macro_rules! arg_operator {
    ($(#[$doc:meta])* $name:ident, $label:literal, |$a:ident, $b:ident| $pick_left:expr) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Debug, Default)]
        pub struct $name<I, V>(PhantomData<fn() -> (I, V)>);

        impl<I: Element, V: Element> $name<I, V> {
            /// Create the operator
            pub fn new() -> Self {
                Self(PhantomData)
            }
        }

        impl<I: Element, V: Element> Operator for $name<I, V> {
            type D1 = (I, V);
            type D2 = (I, V);
            type D3 = (I, V);

            const ASSOCIATIVE: bool = true;
            const COMMUTATIVE: bool = true;
            const NAME: &'static str = $label;

            #[inline]
            fn apply(&self, $a: (I, V), $b: (I, V)) -> (I, V) {
                if $pick_left { $a } else { $b }
            }
        }
    };
}

arg_operator!(
    /// Keeps the `(index, value)` pair with the smaller value.
    ArgMin, "argmin",
    |a, b| a.1.less_than(b.1)
);

arg_operator!(
    /// Keeps the `(index, value)` pair with the larger value.
    ArgMax, "argmax",
    |a, b| b.1.less_than(a.1)
);

/// `c = (a.0 == b.0)` on pairs
#[derive(Copy, Clone, Debug, Default)]
pub struct EqualFirst<A, B, D3 = bool>(PhantomData<fn() -> (A, B, D3)>);

impl<A: Element, B: Element, D3: Element> EqualFirst<A, B, D3> {
    /// Create the operator
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<A: Element, B: Element, D3: Element> Operator for EqualFirst<A, B, D3> {
    type D1 = (A, B);
    type D2 = (A, B);
    type D3 = D3;

    const ASSOCIATIVE: bool = false;
    const COMMUTATIVE: bool = false;
    const NAME: &'static str = "equal_first";

    #[inline]
    fn apply(&self, a: (A, B), b: (A, B)) -> D3 {
        D3::from_bool(a.0 == b.0)
    }
}
