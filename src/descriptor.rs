//! Descriptors, execution phases, and I/O modes
//!
//! A [`Descriptor`] is a bitset that modifies how a kernel reads its inputs
//! and writes its output. Bits combine with `|`; the effect of a combination
//! is the conjunction of the per-bit effects. Kernels inspect the bits once on
//! entry and select an inner loop, never per element.
//!
//! ```
//! use sparsering::descriptor::Descriptor;
//!
//! let d = Descriptor::TRANSPOSE_MATRIX | Descriptor::STRUCTURAL;
//! assert!(d.transpose_matrix());
//! assert!(d.structural());
//! assert!(!d.invert_mask());
//! ```

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bitset altering kernel behaviour.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Descriptor(u32);

impl Descriptor {
    /// Default behaviour.
    pub const NO_OPERATION: Self = Self(0);
    /// Write where the mask evaluates false instead of true.
    pub const INVERT_MASK: Self = Self(1);
    /// Read a matrix argument as its transpose.
    pub const TRANSPOSE_MATRIX: Self = Self(2);
    /// Input iterators yield no repeated coordinates.
    pub const NO_DUPLICATES: Self = Self(4);
    /// The mask is evaluated by presence alone.
    pub const STRUCTURAL: Self = Self(8);
    /// Structural and inverted.
    pub const STRUCTURAL_COMPLEMENT: Self = Self(8 | 1);
    /// All vector arguments are dense.
    pub const DENSE: Self = Self(16);
    /// Matrix arguments behave as if the identity were added to them.
    pub const ADD_IDENTITY: Self = Self(32);
    /// Write indices instead of values.
    pub const USE_INDEX: Self = Self(64);
    /// Reject calls whose domains do not match exactly.
    pub const NO_CASTING: Self = Self(256);
    /// Keep explicit zeroes produced by a kernel.
    pub const EXPLICIT_ZERO: Self = Self(512);
    /// The caller guarantees an aliased input and output are safe.
    pub const SAFE_OVERLAP: Self = Self(1024);
    /// Read the left matrix of `mxm` as its transpose.
    pub const TRANSPOSE_LEFT: Self = Self(2048);
    /// Read the right matrix of `mxm` as its transpose.
    pub const TRANSPOSE_RIGHT: Self = Self(4096);

    const NAMES: [(Self, &'static str); 13] = [
        (Self::INVERT_MASK, "invert_mask"),
        (Self::TRANSPOSE_MATRIX, "transpose_matrix"),
        (Self::NO_DUPLICATES, "no_duplicates"),
        (Self::STRUCTURAL, "structural"),
        (Self::DENSE, "dense"),
        (Self::ADD_IDENTITY, "add_identity"),
        (Self::USE_INDEX, "use_index"),
        (Self::NO_CASTING, "no_casting"),
        (Self::EXPLICIT_ZERO, "explicit_zero"),
        (Self::SAFE_OVERLAP, "safe_overlap"),
        (Self::TRANSPOSE_LEFT, "transpose_left"),
        (Self::TRANSPOSE_RIGHT, "transpose_right"),
        (Self::NO_OPERATION, "no_operation"),
    ];

    /// Build from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True when every bit of `other` is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// `self` with the bits of `other` cleared.
    #[inline]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Whether `invert_mask` is set.
    #[inline]
    pub const fn invert_mask(self) -> bool {
        self.contains(Self::INVERT_MASK)
    }

    /// Whether `transpose_matrix` is set.
    #[inline]
    pub const fn transpose_matrix(self) -> bool {
        self.contains(Self::TRANSPOSE_MATRIX)
    }

    /// Whether `no_duplicates` is set.
    #[inline]
    pub const fn no_duplicates(self) -> bool {
        self.contains(Self::NO_DUPLICATES)
    }

    /// Whether `structural` is set.
    #[inline]
    pub const fn structural(self) -> bool {
        self.contains(Self::STRUCTURAL)
    }

    /// Whether `dense` is set.
    #[inline]
    pub const fn dense(self) -> bool {
        self.contains(Self::DENSE)
    }

    /// Whether `add_identity` is set.
    #[inline]
    pub const fn add_identity(self) -> bool {
        self.contains(Self::ADD_IDENTITY)
    }

    /// Whether `use_index` is set.
    #[inline]
    pub const fn use_index(self) -> bool {
        self.contains(Self::USE_INDEX)
    }

    /// Whether `no_casting` is set.
    #[inline]
    pub const fn no_casting(self) -> bool {
        self.contains(Self::NO_CASTING)
    }

    /// Whether `explicit_zero` is set.
    #[inline]
    pub const fn explicit_zero(self) -> bool {
        self.contains(Self::EXPLICIT_ZERO)
    }

    /// Whether `safe_overlap` is set.
    #[inline]
    pub const fn safe_overlap(self) -> bool {
        self.contains(Self::SAFE_OVERLAP)
    }

    /// Whether `transpose_left` is set.
    #[inline]
    pub const fn transpose_left(self) -> bool {
        self.contains(Self::TRANSPOSE_LEFT)
    }

    /// Whether `transpose_right` is set.
    #[inline]
    pub const fn transpose_right(self) -> bool {
        self.contains(Self::TRANSPOSE_RIGHT)
    }
}

impl BitOr for Descriptor {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Descriptor {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("Descriptor(no_operation)");
        }
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(d, _)| d.0 != 0 && self.contains(*d))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "Descriptor({})", names.join(" | "))
    }
}

/// Phase of a two-phase kernel call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Compute an upper bound on output nonzeroes and reserve capacity.
    Resize,
    /// Perform the computation within the reserved capacity.
    #[default]
    Execute,
}

/// How an input iterator is distributed over processes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum IOMode {
    /// Every process sees the entire input.
    #[default]
    Sequential,
    /// Each process sees a disjoint part of the input.
    Parallel,
}
