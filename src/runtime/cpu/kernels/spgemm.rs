//! ESC SpGEMM (Exact Symbolic Computation) over a semiring
//!
//! ## Phase 1: Symbolic (RESIZE)
//! ```text
//! For each output row i:
//!   HashSet of the columns of C[i,:] and of every B[k,:] with A[i,k] present
//!   row_nnz[i] = |set|
//! bound = Σ row_nnz
//! ```
//!
//! ## Phase 2: Numeric (EXECUTE)
//! ```text
//! For each output row i:
//!   HashMap<column, accumulator> sized by the row's symbolic count
//!   For each A[i,k], for each B[k,j]: map[j] = map[j] ⊕ (A[i,k] ⊗ B[k,j])
//!   Fold existing C[i,j] in: C[i,j] = map[j] ⊕ C[i,j]
//!   Sort entries by column
//! ```
//!
//! Both phases are row-parallel. The symbolic count is exact for the
//! pattern, so an EXECUTE following a RESIZE on the same inputs always fits.

use super::scatter::map_indices;
use crate::algebra::{Accum, Product, Semiring};
use crate::container::CompressedStorage;
use crate::dtype::Element;
use crate::runtime::cpu::CpuClient;
use std::collections::{HashMap, HashSet};

/// Nonzeroes of `C ⊕ A·B` per the sparsity patterns alone.
pub(crate) fn symbolic_nnz<A, B, C>(
    client: &CpuClient,
    a_rows: &CompressedStorage<A>,
    b_rows: &CompressedStorage<B>,
    c_rows: &CompressedStorage<C>,
) -> usize
where
    A: Element,
    B: Element,
    C: Element,
{
    let counts = map_indices(client, a_rows.major_dim(), |i| {
        let mut cols: HashSet<usize> = c_rows.lane(i).0.iter().copied().collect();
        for &k in a_rows.lane(i).0 {
            cols.extend(b_rows.lane(k).0.iter().copied());
        }
        Some(cols.len())
    });
    counts.into_iter().flatten().sum()
}

/// Rows of `C ⊕ A·B`, each sorted by column.
///
/// `product` forms `A[i,k] ⊗ B[k,j]` from raw stored values; `fold_into`
/// combines an accumulated sum with the existing `C[i,j]`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn numeric_rows<R, A, B, C, P, F>(
    client: &CpuClient,
    ring: &R,
    a_rows: &CompressedStorage<A>,
    b_rows: &CompressedStorage<B>,
    c_rows: &CompressedStorage<C>,
    product: P,
    fold_into: F,
) -> Vec<Vec<(usize, C)>>
where
    R: Semiring,
    A: Element,
    B: Element,
    C: Element,
    P: Fn(A, B) -> Product<R> + Sync + Send,
    F: Fn(Accum<R>, Option<C>) -> C + Sync + Send,
{
    let zero: Accum<R> = ring.zero();
    let rows = map_indices(client, a_rows.major_dim(), |i| {
        let (a_idx, a_val) = a_rows.lane(i);
        let mut row_accum: HashMap<usize, Accum<R>> = HashMap::new();
        for (&k, &a) in a_idx.iter().zip(a_val) {
            let (b_idx, b_val) = b_rows.lane(k);
            for (&j, &b) in b_idx.iter().zip(b_val) {
                let acc = row_accum.entry(j).or_insert(zero);
                ring.accumulate(acc, product(a, b));
            }
        }

        let (c_idx, c_val) = c_rows.lane(i);
        let mut row: Vec<(usize, C)> = Vec::with_capacity(row_accum.len() + c_idx.len());
        for (&j, &c) in c_idx.iter().zip(c_val) {
            match row_accum.remove(&j) {
                Some(acc) => row.push((j, fold_into(acc, Some(c)))),
                None => row.push((j, c)),
            }
        }
        row.extend(row_accum.into_iter().map(|(j, acc)| (j, fold_into(acc, None))));
        row.sort_unstable_by_key(|&(j, _)| j);
        Some(row)
    });
    rows.into_iter().flatten().collect()
}
