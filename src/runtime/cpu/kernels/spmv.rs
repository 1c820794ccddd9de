//! Sparse matrix-vector kernels over a semiring
//!
//! # Pull
//!
//! ```text
//! For each output index i allowed by the mask:
//!   acc = 0
//!   For each (j, a) in lane i of the row store:
//!     if x[j] present: acc = acc ⊕ (a ⊗ x[j])
//!   emit acc if at least one product was formed
//! ```
//!
//! # Push
//!
//! ```text
//! For each present x[j]:
//!   For each (i, a) in lane j of the column store:
//!     if mask allows i: out[i] = out[i] ⊕ (a ⊗ x[j])
//! ```
//!
//! Push touches only the support of `x` and is chosen for very sparse
//! inputs. Both variants serve `mxv` and `vxm`; the caller decides which
//! compressed store plays the row role and how a product is formed.

use super::scatter::map_indices;
use crate::algebra::{Accum, Product, Semiring};
use crate::container::mask::MaskEval;
use crate::container::{CompressedStorage, Vector};
use crate::dtype::Element;
use crate::runtime::cpu::CpuClient;

/// Below this fill ratio of `x` the push kernel is used.
const PUSH_DENSITY: usize = 16;

/// Whether `x` is sparse enough for the push kernel.
#[inline]
pub(crate) fn prefer_push<X: Element>(x: &Vector<X>) -> bool {
    x.nonzeroes() * PUSH_DENSITY < x.size()
}

/// Row-parallel pull kernel.
///
/// `product(Some(a), xj)` forms the product of a stored entry with `x[j]`;
/// `product(None, xi)` forms the implicit identity diagonal used when
/// `add_identity` is set. With `DENSE` the presence checks on `x` are
/// skipped.
pub(crate) fn spmv_pull<R, A, X, Mk, C, const DENSE: bool>(
    client: &CpuClient,
    ring: &R,
    rows: &CompressedStorage<A>,
    x: &Vector<X>,
    mask: &Mk,
    add_identity: bool,
    product: C,
) -> Vec<Option<Accum<R>>>
where
    R: Semiring,
    A: Element,
    X: Element,
    Mk: MaskEval,
    C: Fn(Option<A>, X) -> Product<R> + Sync + Send,
{
    let xs = x.raw_values();
    let present = x.coords();
    let zero: Accum<R> = ring.zero();
    map_indices(client, rows.major_dim(), |i| {
        if !mask.allows(i) {
            return None;
        }
        let mut acc = zero;
        let mut hit = false;
        let (idx, vals) = rows.lane(i);
        for (&j, &a) in idx.iter().zip(vals) {
            if DENSE || present.assigned(j) {
                ring.accumulate(&mut acc, product(Some(a), xs[j]));
                hit = true;
            }
        }
        if add_identity && i < xs.len() && (DENSE || present.assigned(i)) {
            ring.accumulate(&mut acc, product(None, xs[i]));
            hit = true;
        }
        hit.then_some(acc)
    })
}

/// Sequential push kernel producing `nout` results.
pub(crate) fn spmv_push<R, A, X, Mk, C>(
    ring: &R,
    cols: &CompressedStorage<A>,
    nout: usize,
    x: &Vector<X>,
    mask: &Mk,
    add_identity: bool,
    product: C,
) -> Vec<Option<Accum<R>>>
where
    R: Semiring,
    A: Element,
    X: Element,
    Mk: MaskEval,
    C: Fn(Option<A>, X) -> Product<R>,
{
    let zero: Accum<R> = ring.zero();
    let mut out: Vec<Option<Accum<R>>> = vec![None; nout];
    for (j, xv) in x.iter() {
        let (idx, vals) = cols.lane(j);
        for (&i, &a) in idx.iter().zip(vals) {
            if mask.allows(i) {
                let slot = out[i].get_or_insert(zero);
                ring.accumulate(slot, product(Some(a), xv));
            }
        }
        if add_identity && j < nout && mask.allows(j) {
            let slot = out[j].get_or_insert(zero);
            ring.accumulate(slot, product(None, xv));
        }
    }
    out
}

/// RESIZE estimate: allowed indices whose lane is nonempty and not yet
/// present in `y`.
pub(crate) fn spmv_bound<A, Y, Mk>(
    rows: &CompressedStorage<A>,
    y: &Vector<Y>,
    mask: &Mk,
    add_identity: bool,
) -> usize
where
    A: Element,
    Y: Element,
    Mk: MaskEval,
{
    let present = y.coords();
    let fresh = (0..rows.major_dim())
        .filter(|&i| {
            !present.assigned(i)
                && mask.allows(i)
                && (add_identity || rows.offsets[i] < rows.offsets[i + 1])
        })
        .count();
    y.nonzeroes() + fresh
}
