//! Level-2 operations: matrix-vector

use crate::algebra::Semiring;
use crate::container::{Matrix, Vector};
use crate::descriptor::{Descriptor, Phase};
use crate::dtype::Element;
use crate::error::Result;

/// Sparse matrix-vector multiplication over a semiring.
///
/// Both products accumulate into the output:
/// `y[i] ← y[i] ⊕ ⊕_j (A[i,j] ⊗ x[j])`. An output entry appears only
/// where at least one product was formed.
///
/// Descriptor bits honoured:
///
/// - `TRANSPOSE_MATRIX`: multiply by `Aᵀ`
/// - `ADD_IDENTITY`: multiply by `A + I`
/// - `DENSE`: every vector must be dense (ILLEGAL otherwise)
/// - `INVERT_MASK` and `STRUCTURAL` on the masked variants
/// - `NO_CASTING`: all domains must match the semiring's exactly
/// - `SAFE_OVERLAP`: allow `y` to share storage with `x`
pub trait Level2Ops {
    /// `y ← y ⊕ A·x`
    #[allow(clippy::too_many_arguments)]
    fn mxv<Y, A, X, R>(
        &self,
        y: &mut Vector<Y>,
        a: &Matrix<A>,
        x: &Vector<X>,
        ring: R,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        Y: Element,
        A: Element,
        X: Element,
        R: Semiring;

    /// `y ← y ⊕ A·x` at the positions the mask allows.
    #[allow(clippy::too_many_arguments)]
    fn mxv_masked<Y, M, A, X, R>(
        &self,
        y: &mut Vector<Y>,
        mask: &Vector<M>,
        a: &Matrix<A>,
        x: &Vector<X>,
        ring: R,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        Y: Element,
        M: Element,
        A: Element,
        X: Element,
        R: Semiring;

    /// `y ← y ⊕ x·A`
    #[allow(clippy::too_many_arguments)]
    fn vxm<Y, X, A, R>(
        &self,
        y: &mut Vector<Y>,
        x: &Vector<X>,
        a: &Matrix<A>,
        ring: R,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        Y: Element,
        X: Element,
        A: Element,
        R: Semiring;

    /// `y ← y ⊕ x·A` at the positions the mask allows.
    #[allow(clippy::too_many_arguments)]
    fn vxm_masked<Y, M, X, A, R>(
        &self,
        y: &mut Vector<Y>,
        mask: &Vector<M>,
        x: &Vector<X>,
        a: &Matrix<A>,
        ring: R,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        Y: Element,
        M: Element,
        X: Element,
        A: Element,
        R: Semiring;
}
