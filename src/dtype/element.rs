//! Element trait mapping Rust types to scalar domains

use super::{Complex64, Complex128, DType};
use num_traits::{AsPrimitive, PrimInt, SaturatingAdd, SaturatingMul, Signed, Unsigned};
use std::any::Any;
use std::fmt::Debug;

/// Widest lossless carrier for a value moving between domains.
///
/// Every primitive integer fits in `Int`, so integer to integer conversion
/// never passes through floating point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Scalar {
    /// Any integer, `bool` and the pattern value
    Int(i128),
    /// Real floating point
    Float(f64),
    /// Real and imaginary part
    Complex(f64, f64),
}

impl Scalar {
    /// True if this is exactly the integer `i`.
    pub fn is_exactly(self, i: i128) -> bool {
        match self {
            Self::Int(v) => v == i,
            Self::Float(f) => f.fract() == 0.0 && f as i128 == i,
            Self::Complex(re, im) => im == 0.0 && re.fract() == 0.0 && re as i128 == i,
        }
    }
}

/// Trait for types that can be stored in containers and combined by operators.
///
/// It connects Rust's type system to the runtime [`DType`] tag and supplies
/// the primitive arithmetic the built-in operators are written in terms of,
/// along with the special values the identity traits hand out.
///
/// # Integer domains
///
/// [`Element::plus`], [`Element::minus`] and [`Element::times`] wrap, so the
/// integers form the ring ℤ/2ⁿ. The extreme values double as ±∞ only under
/// [`Element::extended_plus`] and [`Element::extended_times`], where they are
/// absorbing and finite results saturate. The tropical semirings are built on
/// those.
///
/// # Boolean domain
///
/// `plus` is OR, `times` is AND, `minus` is XOR; `false < true`.
///
/// # Pattern domain
///
/// `()` is the value type of pattern containers. Every arithmetic operation
/// returns `()`; kernels substitute the semiring's one for pattern inputs.
pub trait Element: Copy + Send + Sync + Debug + PartialEq + Default + 'static {
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Convert to f64.
    ///
    /// Complex values convert to their magnitude; pairs to their first
    /// component; `()` to `1.0`.
    fn to_f64(self) -> f64;

    /// Convert from f64. Integer conversion saturates.
    fn from_f64(v: f64) -> Self;

    /// Lift into the conversion carrier.
    fn to_scalar(self) -> Scalar;

    /// Lower from the conversion carrier.
    ///
    /// Follows `as` semantics: integers truncate to the target width, floats
    /// saturate into integers, complex values keep their real part when the
    /// target is real.
    fn from_scalar(v: Scalar) -> Self;

    /// Additive zero
    fn zero() -> Self;

    /// Multiplicative one
    fn one() -> Self;

    /// Greatest value of the domain
    fn infinity() -> Self;

    /// Least value of the domain
    fn neg_infinity() -> Self;

    /// Value-based truthiness, used for non-structural masks.
    fn is_nonzero(self) -> bool;

    /// `a + b`
    fn plus(self, rhs: Self) -> Self;

    /// `a - b`
    fn minus(self, rhs: Self) -> Self;

    /// `a * b`
    fn times(self, rhs: Self) -> Self;

    /// `a / b`
    fn divide(self, rhs: Self) -> Self;

    /// Strict ordering used by min/max style operators.
    fn less_than(self, rhs: Self) -> bool;

    /// `a + b` with [`Element::infinity`] and [`Element::neg_infinity`]
    /// absorbing.
    #[inline]
    fn extended_plus(self, rhs: Self) -> Self {
        self.plus(rhs)
    }

    /// `a * b` with [`Element::infinity`] and [`Element::neg_infinity`]
    /// absorbing, signed by the other operand.
    #[inline]
    fn extended_times(self, rhs: Self) -> Self {
        self.times(rhs)
    }

    /// `one` for true, `zero` for false
    #[inline]
    fn from_bool(b: bool) -> Self {
        if b { Self::one() } else { Self::zero() }
    }

    /// Smaller of two values; ties keep `self`.
    #[inline]
    fn minimum(self, rhs: Self) -> Self {
        if rhs.less_than(self) { rhs } else { self }
    }

    /// Larger of two values; ties keep `self`.
    #[inline]
    fn maximum(self, rhs: Self) -> Self {
        if self.less_than(rhs) { rhs } else { self }
    }

    /// Convert into another domain.
    ///
    /// The identity conversion is a copy; anything else goes through
    /// [`Scalar`], which is exact for every integer and for complex values.
    #[inline]
    fn cast<U: Element>(self) -> U {
        match (&self as &dyn Any).downcast_ref::<U>() {
            Some(v) => *v,
            None => U::from_scalar(self.to_scalar()),
        }
    }
}

#[inline]
fn signed_extended_plus<T: PrimInt + Signed + SaturatingAdd>(a: T, b: T) -> T {
    let (max, min) = (T::max_value(), T::min_value());
    if a == max || b == max {
        max
    } else if a == min || b == min {
        min
    } else {
        SaturatingAdd::saturating_add(&a, &b)
    }
}

#[inline]
fn signed_extended_times<T: PrimInt + Signed + SaturatingMul>(a: T, b: T) -> T {
    let (max, min) = (T::max_value(), T::min_value());
    let infinite = |v: T| v == max || v == min;
    if (infinite(a) || infinite(b)) && a != T::zero() && b != T::zero() {
        if (a < T::zero()) == (b < T::zero()) { max } else { min }
    } else {
        SaturatingMul::saturating_mul(&a, &b)
    }
}

#[inline]
fn unsigned_extended_plus<T: PrimInt + Unsigned + SaturatingAdd>(a: T, b: T) -> T {
    SaturatingAdd::saturating_add(&a, &b)
}

#[inline]
fn unsigned_extended_times<T: PrimInt + Unsigned + SaturatingMul>(a: T, b: T) -> T {
    SaturatingMul::saturating_mul(&a, &b)
}

// Division by zero maps onto the extremes; MIN / -1 wraps like the other
// integer operators.
#[inline]
fn int_divide<T: PrimInt>(a: T, b: T) -> T {
    if b == T::zero() {
        if a == T::zero() {
            T::zero()
        } else if a < T::zero() {
            T::min_value()
        } else {
            T::max_value()
        }
    } else {
        a.checked_div(&b).unwrap_or_else(T::min_value)
    }
}

macro_rules! impl_int_element {
    ($t:ty, $dtype:ident, $extended_plus:expr, $extended_times:expr) => {
        impl Element for $t {
            const DTYPE: DType = DType::$dtype;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }

            #[inline]
            fn to_scalar(self) -> Scalar {
                Scalar::Int(self.as_())
            }

            #[inline]
            fn from_scalar(v: Scalar) -> Self {
                match v {
                    Scalar::Int(i) => i.as_(),
                    Scalar::Float(f) | Scalar::Complex(f, _) => f.as_(),
                }
            }

            #[inline]
            fn zero() -> Self {
                0
            }

            #[inline]
            fn one() -> Self {
                1
            }

            #[inline]
            fn infinity() -> Self {
                <$t>::MAX
            }

            #[inline]
            fn neg_infinity() -> Self {
                <$t>::MIN
            }

            #[inline]
            fn is_nonzero(self) -> bool {
                self != 0
            }

            #[inline]
            fn plus(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            #[inline]
            fn minus(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }

            #[inline]
            fn times(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }

            #[inline]
            fn divide(self, rhs: Self) -> Self {
                int_divide(self, rhs)
            }

            #[inline]
            fn less_than(self, rhs: Self) -> bool {
                self < rhs
            }

            #[inline]
            fn extended_plus(self, rhs: Self) -> Self {
                $extended_plus(self, rhs)
            }

            #[inline]
            fn extended_times(self, rhs: Self) -> Self {
                $extended_times(self, rhs)
            }
        }
    };
}

impl_int_element!(i8, I8, signed_extended_plus, signed_extended_times);
impl_int_element!(i16, I16, signed_extended_plus, signed_extended_times);
impl_int_element!(i32, I32, signed_extended_plus, signed_extended_times);
impl_int_element!(i64, I64, signed_extended_plus, signed_extended_times);
impl_int_element!(u8, U8, unsigned_extended_plus, unsigned_extended_times);
impl_int_element!(u16, U16, unsigned_extended_plus, unsigned_extended_times);
impl_int_element!(u32, U32, unsigned_extended_plus, unsigned_extended_times);
impl_int_element!(u64, U64, unsigned_extended_plus, unsigned_extended_times);
impl_int_element!(usize, Usize, unsigned_extended_plus, unsigned_extended_times);

macro_rules! impl_float_element {
    ($t:ty, $dtype:ident) => {
        impl Element for $t {
            const DTYPE: DType = DType::$dtype;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }

            #[inline]
            fn to_scalar(self) -> Scalar {
                Scalar::Float(self.as_())
            }

            #[inline]
            fn from_scalar(v: Scalar) -> Self {
                match v {
                    Scalar::Int(i) => i.as_(),
                    Scalar::Float(f) | Scalar::Complex(f, _) => f.as_(),
                }
            }

            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            fn one() -> Self {
                1.0
            }

            #[inline]
            fn infinity() -> Self {
                <$t>::INFINITY
            }

            #[inline]
            fn neg_infinity() -> Self {
                <$t>::NEG_INFINITY
            }

            #[inline]
            fn is_nonzero(self) -> bool {
                self != 0.0
            }

            #[inline]
            fn plus(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline]
            fn minus(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline]
            fn times(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline]
            fn divide(self, rhs: Self) -> Self {
                self / rhs
            }

            #[inline]
            fn less_than(self, rhs: Self) -> bool {
                self < rhs
            }
        }
    };
}

impl_float_element!(f32, F32);
impl_float_element!(f64, F64);

#[cfg(feature = "f16")]
macro_rules! impl_half_element {
    ($t:ty, $dtype:ident) => {
        impl Element for $t {
            const DTYPE: DType = DType::$dtype;

            #[inline]
            fn to_f64(self) -> f64 {
                <$t>::to_f64(self)
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                <$t>::from_f64(v)
            }

            #[inline]
            fn to_scalar(self) -> Scalar {
                Scalar::Float(<$t>::to_f64(self))
            }

            #[inline]
            fn from_scalar(v: Scalar) -> Self {
                match v {
                    Scalar::Int(i) => <$t>::from_f64(i as f64),
                    Scalar::Float(f) | Scalar::Complex(f, _) => <$t>::from_f64(f),
                }
            }

            #[inline]
            fn zero() -> Self {
                <$t>::ZERO
            }

            #[inline]
            fn one() -> Self {
                <$t>::ONE
            }

            #[inline]
            fn infinity() -> Self {
                <$t>::INFINITY
            }

            #[inline]
            fn neg_infinity() -> Self {
                <$t>::NEG_INFINITY
            }

            #[inline]
            fn is_nonzero(self) -> bool {
                self != <$t>::ZERO
            }

            #[inline]
            fn plus(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline]
            fn minus(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline]
            fn times(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline]
            fn divide(self, rhs: Self) -> Self {
                self / rhs
            }

            #[inline]
            fn less_than(self, rhs: Self) -> bool {
                self < rhs
            }
        }
    };
}

#[cfg(feature = "f16")]
impl_half_element!(half::f16, F16);
#[cfg(feature = "f16")]
impl_half_element!(half::bf16, BF16);

impl Element for bool {
    const DTYPE: DType = DType::Bool;

    #[inline]
    fn to_f64(self) -> f64 {
        if self { 1.0 } else { 0.0 }
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v != 0.0
    }

    #[inline]
    fn to_scalar(self) -> Scalar {
        Scalar::Int(self as i128)
    }

    #[inline]
    fn from_scalar(v: Scalar) -> Self {
        match v {
            Scalar::Int(i) => i != 0,
            Scalar::Float(f) => f != 0.0,
            Scalar::Complex(re, im) => re != 0.0 || im != 0.0,
        }
    }

    #[inline]
    fn zero() -> Self {
        false
    }

    #[inline]
    fn one() -> Self {
        true
    }

    #[inline]
    fn infinity() -> Self {
        true
    }

    #[inline]
    fn neg_infinity() -> Self {
        false
    }

    #[inline]
    fn is_nonzero(self) -> bool {
        self
    }

    #[inline]
    fn plus(self, rhs: Self) -> Self {
        self || rhs
    }

    #[inline]
    fn minus(self, rhs: Self) -> Self {
        self ^ rhs
    }

    #[inline]
    fn times(self, rhs: Self) -> Self {
        self && rhs
    }

    #[inline]
    fn divide(self, rhs: Self) -> Self {
        self && rhs
    }

    #[inline]
    fn less_than(self, rhs: Self) -> bool {
        !self && rhs
    }
}

macro_rules! impl_complex_element {
    ($t:ty, $float:ty, $dtype:ident) => {
        /// Ordering is by magnitude, so the least element is zero and
        /// `neg_infinity` returns it.
        impl Element for $t {
            const DTYPE: DType = DType::$dtype;

            #[inline]
            fn to_f64(self) -> f64 {
                self.magnitude() as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                Self::new(v as $float, 0.0)
            }

            #[inline]
            fn to_scalar(self) -> Scalar {
                Scalar::Complex(self.re as f64, self.im as f64)
            }

            #[inline]
            fn from_scalar(v: Scalar) -> Self {
                match v {
                    Scalar::Int(i) => Self::new(i as $float, 0.0),
                    Scalar::Float(f) => Self::new(f as $float, 0.0),
                    Scalar::Complex(re, im) => Self::new(re as $float, im as $float),
                }
            }

            #[inline]
            fn zero() -> Self {
                Self::ZERO
            }

            #[inline]
            fn one() -> Self {
                Self::ONE
            }

            #[inline]
            fn infinity() -> Self {
                Self::new(<$float>::INFINITY, 0.0)
            }

            #[inline]
            fn neg_infinity() -> Self {
                Self::ZERO
            }

            #[inline]
            fn is_nonzero(self) -> bool {
                self != Self::ZERO
            }

            #[inline]
            fn plus(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline]
            fn minus(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline]
            fn times(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline]
            fn divide(self, rhs: Self) -> Self {
                self / rhs
            }

            #[inline]
            fn less_than(self, rhs: Self) -> bool {
                self.magnitude_squared() < rhs.magnitude_squared()
            }
        }
    };
}

impl_complex_element!(Complex64, f32, Complex64);
impl_complex_element!(Complex128, f64, Complex128);

impl Element for () {
    const DTYPE: DType = DType::Void;

    #[inline]
    fn to_f64(self) -> f64 {
        1.0
    }

    #[inline]
    fn from_f64(_: f64) -> Self {}

    #[inline]
    fn to_scalar(self) -> Scalar {
        Scalar::Int(1)
    }

    #[inline]
    fn from_scalar(_: Scalar) -> Self {}

    #[inline]
    fn zero() -> Self {}

    #[inline]
    fn one() -> Self {}

    #[inline]
    fn infinity() -> Self {}

    #[inline]
    fn neg_infinity() -> Self {}

    #[inline]
    fn is_nonzero(self) -> bool {
        true
    }

    #[inline]
    fn plus(self, _: Self) -> Self {}

    #[inline]
    fn minus(self, _: Self) -> Self {}

    #[inline]
    fn times(self, _: Self) -> Self {}

    #[inline]
    fn divide(self, _: Self) -> Self {}

    #[inline]
    fn less_than(self, _: Self) -> bool {
        false
    }
}

/// Componentwise arithmetic, lexicographic order.
impl<A: Element, B: Element> Element for (A, B) {
    const DTYPE: DType = DType::Pair;

    #[inline]
    fn to_f64(self) -> f64 {
        self.0.to_f64()
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        (A::from_f64(v), B::from_f64(v))
    }

    #[inline]
    fn to_scalar(self) -> Scalar {
        self.0.to_scalar()
    }

    #[inline]
    fn from_scalar(v: Scalar) -> Self {
        (A::from_scalar(v), B::from_scalar(v))
    }

    #[inline]
    fn zero() -> Self {
        (A::zero(), B::zero())
    }

    #[inline]
    fn one() -> Self {
        (A::one(), B::one())
    }

    #[inline]
    fn infinity() -> Self {
        (A::infinity(), B::infinity())
    }

    #[inline]
    fn neg_infinity() -> Self {
        (A::neg_infinity(), B::neg_infinity())
    }

    #[inline]
    fn is_nonzero(self) -> bool {
        self.0.is_nonzero() || self.1.is_nonzero()
    }

    #[inline]
    fn plus(self, rhs: Self) -> Self {
        (self.0.plus(rhs.0), self.1.plus(rhs.1))
    }

    #[inline]
    fn minus(self, rhs: Self) -> Self {
        (self.0.minus(rhs.0), self.1.minus(rhs.1))
    }

    #[inline]
    fn times(self, rhs: Self) -> Self {
        (self.0.times(rhs.0), self.1.times(rhs.1))
    }

    #[inline]
    fn divide(self, rhs: Self) -> Self {
        (self.0.divide(rhs.0), self.1.divide(rhs.1))
    }

    #[inline]
    fn less_than(self, rhs: Self) -> bool {
        self.0.less_than(rhs.0) || (self.0 == rhs.0 && self.1.less_than(rhs.1))
    }

    #[inline]
    fn extended_plus(self, rhs: Self) -> Self {
        (self.0.extended_plus(rhs.0), self.1.extended_plus(rhs.1))
    }

    #[inline]
    fn extended_times(self, rhs: Self) -> Self {
        (self.0.extended_times(rhs.0), self.1.extended_times(rhs.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_arithmetic_wraps() {
        assert_eq!(i32::MAX.plus(-1), i32::MAX - 1);
        assert_eq!(i32::MAX.plus(1), i32::MIN);
        assert_eq!(u8::MAX.plus(1), 0);
        assert_eq!(3u16.minus(5), u16::MAX - 1);
        assert_eq!(2i32.times(1 << 30).plus(2i32.times(-(1 << 30))), 0);
        assert_eq!(usize::MAX.times(2), usize::MAX - 1);
    }

    #[test]
    fn test_extended_arithmetic_absorbs_infinities() {
        assert_eq!(i32::MAX.extended_plus(-5), i32::MAX);
        assert_eq!((-5i32).extended_plus(i32::MIN), i32::MIN);
        assert_eq!(100i8.extended_plus(100), i8::MAX);
        assert_eq!(u8::MAX.extended_plus(1), u8::MAX);
        assert_eq!(i64::MAX.extended_times(-2), i64::MIN);
        assert_eq!(i64::MIN.extended_times(-2), i64::MAX);
        assert_eq!(i16::MAX.extended_times(0), 0);
        assert_eq!(1000i16.extended_times(1000), i16::MAX);
        assert_eq!(usize::MAX.extended_times(2), usize::MAX);
        assert_eq!(2.5f64.extended_plus(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_integer_division_by_zero() {
        assert_eq!(5i32.divide(0), i32::MAX);
        assert_eq!((-5i32).divide(0), i32::MIN);
        assert_eq!(0u8.divide(0), 0);
        assert_eq!(i16::MIN.divide(-1), i16::MIN);
        assert_eq!(7i16.divide(-2), -3);
    }

    #[test]
    fn test_bool_arithmetic() {
        assert!(true.plus(false));
        assert!(!true.times(false));
        assert!(!true.minus(true));
        assert!(false.less_than(true));
        assert_eq!(bool::infinity(), true);
    }

    #[test]
    fn test_cast_identity_and_conversion() {
        assert_eq!(2.5f64.cast::<f64>(), 2.5);
        assert_eq!(2.5f64.cast::<i32>(), 2);
        assert_eq!(true.cast::<u8>(), 1);
        assert_eq!(0.0f32.cast::<bool>(), false);
        assert_eq!(f64::INFINITY.cast::<i64>(), i64::MAX);
        assert_eq!(300i32.cast::<u8>(), 44);
        assert_eq!((-1i8).cast::<f32>(), -1.0);
    }

    #[test]
    fn test_cast_is_exact_between_wide_integers() {
        let big = (1u64 << 53) + 1;
        assert_eq!(big.cast::<i64>(), 9_007_199_254_740_993);
        assert_eq!(u64::MAX.cast::<usize>(), u64::MAX as usize);
        assert_eq!(i64::MIN.cast::<i64>(), i64::MIN);
        assert_eq!((i64::MAX - 1).cast::<u64>(), (i64::MAX - 1) as u64);
    }

    #[test]
    fn test_cast_keeps_imaginary_part() {
        let z = Complex64::new(0.0, 1.0).cast::<Complex128>();
        assert_eq!(z, Complex128::new(0.0, 1.0));
        let w = Complex128::new(-2.0, 0.5).cast::<Complex64>();
        assert_eq!(w, Complex64::new(-2.0, 0.5));
        assert_eq!(Complex128::new(3.0, 4.0).cast::<f64>(), 3.0);
        assert_eq!(7u32.cast::<Complex64>(), Complex64::new(7.0, 0.0));
        assert!(Complex64::new(0.0, 1.0).cast::<bool>());
    }

    #[test]
    fn test_scalar_is_exactly() {
        assert!(Scalar::Int(300).is_exactly(300));
        assert!(Scalar::Float(300.0).is_exactly(300));
        assert!(!Scalar::Float(300.5).is_exactly(300));
        assert!(!Scalar::Complex(300.0, 1.0).is_exactly(300));
        assert!(!255u8.to_scalar().is_exactly(300));
    }

    #[test]
    fn test_min_max() {
        assert_eq!(3.0f64.minimum(2.0), 2.0);
        assert_eq!(3i32.maximum(9), 9);
        assert_eq!(Complex128::new(0.0, 3.0).maximum(Complex128::new(2.0, 0.0)).im, 3.0);
    }

    #[test]
    fn test_pair_order() {
        assert!((1u32, 9.0f64).less_than((2, 0.0)));
        assert!((1u32, 0.0f64).less_than((1, 0.5)));
        assert_eq!((1i32, 2.0f32).plus((3, 4.0)), (4, 6.0));
    }

    #[test]
    fn test_void() {
        assert_eq!(<()>::DTYPE, DType::Void);
        assert!(().is_nonzero());
    }
}
