//! Level-3 operations: matrix-matrix

use crate::algebra::{Monoid, Operator, Semiring};
use crate::container::{Matrix, Vector};
use crate::descriptor::{Descriptor, Phase};
use crate::dtype::Element;
use crate::error::Result;

/// Matrix kernels.
///
/// Matrix outputs follow the two-phase protocol strictly. RESIZE computes
/// an upper bound on the result's nonzeroes and raises the output capacity
/// to it; EXECUTE computes the result and fails with ILLEGAL, leaving the
/// output untouched, when it does not fit.
pub trait Level3Ops {
    /// `C ← C ⊕ A·B`
    ///
    /// `TRANSPOSE_LEFT` and `TRANSPOSE_RIGHT` read `A` and `B` transposed.
    #[allow(clippy::too_many_arguments)]
    fn mxm<C, A, B, R>(
        &self,
        c: &mut Matrix<C>,
        a: &Matrix<A>,
        b: &Matrix<B>,
        ring: R,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        C: Element,
        A: Element,
        B: Element,
        R: Semiring;

    /// `C[i,j] = A[i,j] ⊙ B[i,j]` over the intersection of patterns.
    #[allow(clippy::too_many_arguments)]
    fn ewise_apply_matrix<C, A, B, Op>(
        &self,
        c: &mut Matrix<C>,
        a: &Matrix<A>,
        b: &Matrix<B>,
        op: Op,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        C: Element,
        A: Element,
        B: Element,
        Op: Operator;

    /// `C[i,j] = A[i,j] ⊕ B[i,j]` over the union of patterns, a missing
    /// side replaced by the identity.
    #[allow(clippy::too_many_arguments)]
    fn ewise_apply_matrix_monoid<C, A, B, Mo>(
        &self,
        c: &mut Matrix<C>,
        a: &Matrix<A>,
        b: &Matrix<B>,
        monoid: Mo,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        C: Element,
        A: Element,
        B: Element,
        Mo: Monoid;

    /// Upper triangle: `U[i,j] = A[i,j]` where `j ≥ i + k`.
    ///
    /// `TRANSPOSE_MATRIX` selects from `Aᵀ`. `U` and `A` must be distinct
    /// containers.
    fn triu<U, A>(&self, u: &mut Matrix<U>, a: &Matrix<A>, k: isize, desc: Descriptor, phase: Phase) -> Result<()>
    where
        U: Element,
        A: Element;

    /// Outer product: `M[i,j] = u[i] ⊙ v[j]` for present `u[i]` and `v[j]`.
    #[allow(clippy::too_many_arguments)]
    fn outer<T, U, V, Op>(
        &self,
        m: &mut Matrix<T>,
        u: &Vector<U>,
        v: &Vector<V>,
        op: Op,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        T: Element,
        U: Element,
        V: Element,
        Op: Operator;

    /// Copy `A` (or `Aᵀ` under `TRANSPOSE_MATRIX`) into `C`.
    fn set_matrix<C, A>(&self, c: &mut Matrix<C>, a: &Matrix<A>, desc: Descriptor, phase: Phase) -> Result<()>
    where
        C: Element,
        A: Element;

    /// `α ← α ⊕ (⊕_{i,j} A[i,j])`, entries visited in row-major order.
    fn foldl_matrix<S, A, Mo>(&self, alpha: &mut S, a: &Matrix<A>, monoid: Mo, desc: Descriptor) -> Result<()>
    where
        S: Element,
        A: Element,
        Mo: Monoid;

    /// Call `f(i, j, &mut A[i,j])` at every nonzero of `A`.
    ///
    /// The pattern of `A` is unchanged and both stores see the new values.
    fn ewise_lambda_matrix<T, F>(&self, a: &mut Matrix<T>, f: F) -> Result<()>
    where
        T: Element,
        F: Fn(usize, usize, &mut T) + Sync + Send;

    /// Build `A` from coordinate vectors: for every position `k` present in
    /// `rows`, `A[rows[k], cols[k]] = vals[k]`.
    ///
    /// The three vectors must have the same length (MISMATCH) and the same
    /// pattern (ILLEGAL). Indices must be non-negative integers below the
    /// matching dimension; a fractional or negative one is ILLEGAL and one
    /// out of range is MISMATCH. A repeated coordinate is ILLEGAL.
    #[allow(clippy::too_many_arguments)]
    fn zip<T, I, J, V>(
        &self,
        a: &mut Matrix<T>,
        rows: &Vector<I>,
        cols: &Vector<J>,
        vals: &Vector<V>,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        T: Element,
        I: Element,
        J: Element,
        V: Element;

    /// [`Level3Ops::zip`] into a pattern matrix.
    fn zip_pattern<I, J>(
        &self,
        a: &mut Matrix<()>,
        rows: &Vector<I>,
        cols: &Vector<J>,
        desc: Descriptor,
        phase: Phase,
    ) -> Result<()>
    where
        I: Element,
        J: Element;
}
