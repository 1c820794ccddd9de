//! Sorted-lane merge for element-wise matrix kernels
//!
//! One merge routine serves both element-wise flavours. The strategy decides
//! which positions survive; closures decide what is written there:
//!
//! ```text
//! Union:         a only -> only_a(a)   b only -> only_b(b)   both -> op(a, b)
//! Intersection:  a only -> skip        b only -> skip        both -> op(a, b)
//! ```
//!
//! The operator flavour of `eWiseApply` is an intersection; the monoid
//! flavour is a union with the missing side replaced by the identity.

use super::scatter::map_indices;
use crate::container::CompressedStorage;
use crate::dtype::Element;
use crate::error::Result;
use crate::runtime::cpu::CpuClient;

/// Which positions a merge keeps.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum MergeStrategy {
    /// Positions present in either input
    Union,
    /// Positions present in both inputs
    Intersection,
}

/// Merge two sorted lanes into `out`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn merge_lane<A, B, C, F, FA, FB>(
    (a_idx, a_val): (&[usize], &[A]),
    (b_idx, b_val): (&[usize], &[B]),
    strategy: MergeStrategy,
    op: &F,
    only_a: &FA,
    only_b: &FB,
    out: &mut Vec<(usize, C)>,
) where
    A: Copy,
    B: Copy,
    F: Fn(A, B) -> C,
    FA: Fn(A) -> C,
    FB: Fn(B) -> C,
{
    let (mut i, mut j) = (0, 0);
    while i < a_idx.len() && j < b_idx.len() {
        let (ca, cb) = (a_idx[i], b_idx[j]);
        if ca < cb {
            if strategy == MergeStrategy::Union {
                out.push((ca, only_a(a_val[i])));
            }
            i += 1;
        } else if ca > cb {
            if strategy == MergeStrategy::Union {
                out.push((cb, only_b(b_val[j])));
            }
            j += 1;
        } else {
            out.push((ca, op(a_val[i], b_val[j])));
            i += 1;
            j += 1;
        }
    }
    if strategy == MergeStrategy::Union {
        out.extend((i..a_idx.len()).map(|k| (a_idx[k], only_a(a_val[k]))));
        out.extend((j..b_idx.len()).map(|k| (b_idx[k], only_b(b_val[k]))));
    }
}

/// Merge every lane of `a` with the same lane of `b`.
pub(crate) fn merge_stores<A, B, C, F, FA, FB>(
    client: &CpuClient,
    a: &CompressedStorage<A>,
    b: &CompressedStorage<B>,
    strategy: MergeStrategy,
    op: F,
    only_a: FA,
    only_b: FB,
) -> Result<CompressedStorage<C>>
where
    A: Element,
    B: Element,
    C: Element,
    F: Fn(A, B) -> C + Sync + Send,
    FA: Fn(A) -> C + Sync + Send,
    FB: Fn(B) -> C + Sync + Send,
{
    debug_assert_eq!(a.major_dim(), b.major_dim());
    let lanes = map_indices(client, a.major_dim(), |r| {
        let mut lane = Vec::new();
        merge_lane(a.lane(r), b.lane(r), strategy, &op, &only_a, &only_b, &mut lane);
        Some(lane)
    });
    CompressedStorage::from_lanes(lanes.into_iter().flatten().collect())
}

/// Keep the entries of every lane for which `keep(lane, index)` holds,
/// transforming each value through `f`.
pub(crate) fn filter_store<A, C, P, F>(
    client: &CpuClient,
    a: &CompressedStorage<A>,
    keep: P,
    f: F,
) -> Result<CompressedStorage<C>>
where
    A: Element,
    C: Element,
    P: Fn(usize, usize) -> bool + Sync + Send,
    F: Fn(A) -> C + Sync + Send,
{
    let lanes = map_indices(client, a.major_dim(), |r| {
        let (idx, vals) = a.lane(r);
        Some(
            idx.iter()
                .zip(vals)
                .filter(|&(&j, _)| keep(r, j))
                .map(|(&j, &v)| (j, f(v)))
                .collect::<Vec<_>>(),
        )
    });
    CompressedStorage::from_lanes(lanes.into_iter().flatten().collect())
}
