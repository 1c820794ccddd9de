//! Parallel reductions under a monoid

use crate::runtime::cpu::CpuClient;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Reduce `f(p)` over `positions`, skipping `None`, starting from
/// `identity`. `combine` must be associative with `identity` as its identity.
pub(crate) fn reduce_positions<S, F, G>(
    client: &CpuClient,
    positions: &[usize],
    identity: S,
    f: F,
    combine: G,
) -> S
where
    S: Copy + Send + Sync,
    F: Fn(usize) -> Option<S> + Sync + Send,
    G: Fn(S, S) -> S + Sync + Send,
{
    #[cfg(feature = "rayon")]
    if client.parallel_for(positions.len()) {
        let min_len = client.rayon_min_len();
        return client.install_parallelism(|| {
            positions
                .par_iter()
                .with_min_len(min_len)
                .filter_map(|&p| f(p))
                .reduce(|| identity, &combine)
        });
    }
    #[cfg(not(feature = "rayon"))]
    let _ = client;
    positions
        .iter()
        .filter_map(|&p| f(p))
        .fold(identity, combine)
}

/// Reduce `f(v)` over every value of a slice.
pub(crate) fn reduce_values<T, S, F, G>(
    client: &CpuClient,
    values: &[T],
    identity: S,
    f: F,
    combine: G,
) -> S
where
    T: Copy + Send + Sync,
    S: Copy + Send + Sync,
    F: Fn(T) -> S + Sync + Send,
    G: Fn(S, S) -> S + Sync + Send,
{
    #[cfg(feature = "rayon")]
    if client.parallel_for(values.len()) {
        let min_len = client.rayon_min_len();
        return client.install_parallelism(|| {
            values
                .par_iter()
                .with_min_len(min_len)
                .map(|&v| f(v))
                .reduce(|| identity, &combine)
        });
    }
    #[cfg(not(feature = "rayon"))]
    let _ = client;
    values.iter().map(|&v| f(v)).fold(identity, combine)
}
