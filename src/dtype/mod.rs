//! Scalar domains for container values
//!
//! Every value stored in a [`Vector`](crate::container::Vector) or
//! [`Matrix`](crate::container::Matrix) implements [`Element`]. The
//! [`DType`] tag is the runtime name of that domain; kernels use it for
//! diagnostics and to detect pattern (value-less) containers.

pub mod complex;
mod element;

pub use complex::{Complex64, Complex128};
pub use element::{Element, Scalar};

use std::fmt;

/// Runtime tag for a scalar domain.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DType {
    /// 64-bit floating point
    F64,
    /// 32-bit floating point
    F32,
    /// 16-bit floating point (IEEE 754)
    F16,
    /// 16-bit brain floating point
    BF16,
    /// 64-bit signed integer
    I64,
    /// 32-bit signed integer
    I32,
    /// 16-bit signed integer
    I16,
    /// 8-bit signed integer
    I8,
    /// 64-bit unsigned integer
    U64,
    /// 32-bit unsigned integer
    U32,
    /// 16-bit unsigned integer
    U16,
    /// 8-bit unsigned integer
    U8,
    /// Pointer-sized unsigned integer (indices)
    Usize,
    /// Boolean
    Bool,
    /// Complex number with f32 components
    Complex64,
    /// Complex number with f64 components
    Complex128,
    /// Unit domain of pattern containers: only presence is stored
    Void,
    /// Ordered pair of two domains
    Pair,
}

impl DType {
    /// Size of one element in bytes.
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F64 | Self::I64 | Self::U64 | Self::Complex64 => 8,
            Self::F32 | Self::I32 | Self::U32 => 4,
            Self::F16 | Self::BF16 | Self::I16 | Self::U16 => 2,
            Self::I8 | Self::U8 | Self::Bool => 1,
            Self::Usize => std::mem::size_of::<usize>(),
            Self::Complex128 => 16,
            Self::Void => 0,
            // pairs have no fixed size
            Self::Pair => 0,
        }
    }

    /// Returns true for floating point domains.
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F64 | Self::F32 | Self::F16 | Self::BF16)
    }

    /// Returns true for complex domains.
    pub const fn is_complex(self) -> bool {
        matches!(self, Self::Complex64 | Self::Complex128)
    }

    /// Returns true for signed integers.
    pub const fn is_signed_int(self) -> bool {
        matches!(self, Self::I64 | Self::I32 | Self::I16 | Self::I8)
    }

    /// Returns true for unsigned integers, including `usize`.
    pub const fn is_unsigned_int(self) -> bool {
        matches!(
            self,
            Self::U64 | Self::U32 | Self::U16 | Self::U8 | Self::Usize
        )
    }

    /// Returns true for any integer domain.
    pub const fn is_int(self) -> bool {
        self.is_signed_int() || self.is_unsigned_int()
    }

    /// Returns true for the pattern domain.
    pub const fn is_void(self) -> bool {
        matches!(self, Self::Void)
    }

    /// Short name used in diagnostics.
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::F32 => "f32",
            Self::F16 => "f16",
            Self::BF16 => "bf16",
            Self::I64 => "i64",
            Self::I32 => "i32",
            Self::I16 => "i16",
            Self::I8 => "i8",
            Self::U64 => "u64",
            Self::U32 => "u32",
            Self::U16 => "u16",
            Self::U8 => "u8",
            Self::Usize => "usize",
            Self::Bool => "bool",
            Self::Complex64 => "c64",
            Self::Complex128 => "c128",
            Self::Void => "void",
            Self::Pair => "pair",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}
