//! Complex scalar domains
//!
//! `Complex64` and `Complex128` are interleaved `(re, im)` pairs that can be
//! stored in containers and combined under the plus-times semiring. Ordering
//! (used by min/max operators) compares magnitudes.
//!
//! # Examples
//!
//! ```
//! use sparsering::dtype::Complex128;
//!
//! let z = Complex128::new(3.0, 4.0);
//! assert_eq!(z.magnitude(), 5.0);
//! assert_eq!(z * Complex128::ONE, z);
//! ```

use bytemuck::{Pod, Zeroable};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

macro_rules! impl_complex {
    ($name:ident, $float:ty, $doc_bits:literal, $doc_float:literal) => {
        #[doc = concat!($doc_bits, "-bit complex number with ", $doc_float, " real and imaginary parts")]
        #[repr(C)]
        #[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
        pub struct $name {
            /// Real part
            pub re: $float,
            /// Imaginary part
            pub im: $float,
        }

        impl $name {
            /// Additive identity
            pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

            /// Multiplicative identity
            pub const ONE: Self = Self { re: 1.0, im: 0.0 };

            /// Imaginary unit
            pub const I: Self = Self { re: 0.0, im: 1.0 };

            /// Create a new complex number
            #[inline]
            pub const fn new(re: $float, im: $float) -> Self {
                Self { re, im }
            }

            /// |z|
            #[inline]
            pub fn magnitude(self) -> $float {
                self.re.hypot(self.im)
            }

            /// |z|², cheaper than [`Self::magnitude`] when only ordering matters
            #[inline]
            pub fn magnitude_squared(self) -> $float {
                self.re * self.re + self.im * self.im
            }

            /// Complex conjugate
            #[inline]
            pub fn conj(self) -> Self {
                Self {
                    re: self.re,
                    im: -self.im,
                }
            }
        }

        impl Add for $name {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self {
                    re: self.re + rhs.re,
                    im: self.im + rhs.im,
                }
            }
        }

        impl Sub for $name {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self {
                    re: self.re - rhs.re,
                    im: self.im - rhs.im,
                }
            }
        }

        impl Mul for $name {
            type Output = Self;

            /// (a+bi)(c+di) = (ac-bd) + (ad+bc)i
            #[inline]
            fn mul(self, rhs: Self) -> Self {
                Self {
                    re: self.re * rhs.re - self.im * rhs.im,
                    im: self.re * rhs.im + self.im * rhs.re,
                }
            }
        }

        impl Div for $name {
            type Output = Self;

            #[inline]
            fn div(self, rhs: Self) -> Self {
                let denom = rhs.magnitude_squared();
                if denom == 0.0 {
                    Self {
                        re: <$float>::NAN,
                        im: <$float>::NAN,
                    }
                } else {
                    Self {
                        re: (self.re * rhs.re + self.im * rhs.im) / denom,
                        im: (self.im * rhs.re - self.re * rhs.im) / denom,
                    }
                }
            }
        }

        impl Neg for $name {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                Self {
                    re: -self.re,
                    im: -self.im,
                }
            }
        }

        impl PartialOrd for $name {
            /// Compares by magnitude.
            #[inline]
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                self.magnitude_squared()
                    .partial_cmp(&other.magnitude_squared())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.im >= 0.0 {
                    write!(f, "{}+{}i", self.re, self.im)
                } else {
                    write!(f, "{}{}i", self.re, self.im)
                }
            }
        }

        impl From<$float> for $name {
            #[inline]
            fn from(re: $float) -> Self {
                Self { re, im: 0.0 }
            }
        }
    };
}

impl_complex!(Complex64, f32, "64", "f32");
impl_complex!(Complex128, f64, "128", "f64");

impl From<Complex64> for Complex128 {
    #[inline]
    fn from(c: Complex64) -> Self {
        Self {
            re: c.re as f64,
            im: c.im as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Complex128::new(1.0, 2.0);
        let b = Complex128::new(3.0, -1.0);
        assert_eq!(a + b, Complex128::new(4.0, 1.0));
        assert_eq!(a - b, Complex128::new(-2.0, 3.0));
        assert_eq!(a * b, Complex128::new(5.0, 5.0));
        let q = (a * b) / b;
        assert!((q.re - a.re).abs() < 1e-12 && (q.im - a.im).abs() < 1e-12);
    }

    #[test]
    fn test_ordering_by_magnitude() {
        let small = Complex64::new(0.0, 1.0);
        let large = Complex64::new(-2.0, 0.0);
        assert!(small < large);
    }

    #[test]
    fn test_division_by_zero_is_nan() {
        let z = Complex64::ONE / Complex64::ZERO;
        assert!(z.re.is_nan() && z.im.is_nan());
    }

    #[test]
    fn test_widening() {
        let z: Complex128 = Complex64::new(1.5, -0.5).into();
        assert_eq!(z, Complex128::new(1.5, -0.5));
    }
}
