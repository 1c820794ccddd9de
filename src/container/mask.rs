//! Mask evaluation
//!
//! A mask position evaluates true when it is present and, unless the
//! `structural` bit is set, its value is nonzero. `invert_mask` flips the
//! outcome; absent positions of an inverted mask therefore evaluate true.

use super::{Coordinates, Vector};
use crate::descriptor::Descriptor;
use crate::dtype::Element;

/// Decides per output index whether a kernel may write there.
pub(crate) trait MaskEval: Sync {
    fn allows(&self, i: usize) -> bool;

    /// True when every index is allowed.
    fn is_trivial(&self) -> bool {
        false
    }
}

/// Every position allowed.
pub(crate) struct NoMask;

impl MaskEval for NoMask {
    #[inline]
    fn allows(&self, _i: usize) -> bool {
        true
    }

    fn is_trivial(&self) -> bool {
        true
    }
}

/// A vector mask interpreted under a descriptor.
pub(crate) struct VectorMask<'a, M: Element> {
    coords: &'a Coordinates,
    values: &'a [M],
    structural: bool,
    invert: bool,
}

impl<'a, M: Element> VectorMask<'a, M> {
    pub(crate) fn new(mask: &'a Vector<M>, desc: Descriptor) -> Self {
        Self {
            coords: mask.coords(),
            values: mask.raw_values(),
            // pattern masks carry no values to test
            structural: desc.structural() || M::DTYPE.is_void(),
            invert: desc.invert_mask(),
        }
    }
}

impl<M: Element> MaskEval for VectorMask<'_, M> {
    #[inline]
    fn allows(&self, i: usize) -> bool {
        let present =
            self.coords.assigned(i) && (self.structural || self.values[i].is_nonzero());
        present != self.invert
    }
}
