//! Computing per-index results and writing them into an output vector
//!
//! Vector kernels first compute one `Option` per output index, which needs
//! no access to the output's coordinate engine, and only then write. The
//! split lets capacity be checked before anything is modified.

use crate::container::{LocalUpdate, Vector};
use crate::dtype::Element;
use crate::error::Result;
use crate::runtime::cpu::CpuClient;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Evaluate `f` at every index in `0..n`.
pub(crate) fn map_indices<T, F>(client: &CpuClient, n: usize, f: F) -> Vec<Option<T>>
where
    T: Send,
    F: Fn(usize) -> Option<T> + Sync + Send,
{
    #[cfg(feature = "rayon")]
    if client.parallel_for(n) {
        let min_len = client.rayon_min_len();
        return client.install_parallelism(|| {
            (0..n)
                .into_par_iter()
                .with_min_len(min_len)
                .map(&f)
                .collect()
        });
    }
    #[cfg(not(feature = "rayon"))]
    let _ = client;
    (0..n).map(f).collect()
}

/// Out-of-place write: `y` ends up holding exactly the `Some` entries.
pub(crate) fn assign_results<T: Element>(
    client: &CpuClient,
    y: &mut Vector<T>,
    results: &[Option<T>],
) -> Result<()> {
    let required = results.iter().filter(|r| r.is_some()).count();
    y.begin_write(required, true)?;
    write(client, y, results, |new, _| new);
    y.finish_write();
    Ok(())
}

/// In-place write: new entries are inserted, present ones become
/// `combine(new, old)`, and entries without a result are untouched.
pub(crate) fn accumulate_results<T, F>(
    client: &CpuClient,
    y: &mut Vector<T>,
    results: &[Option<T>],
    combine: F,
) -> Result<()>
where
    T: Element,
    F: Fn(T, T) -> T + Sync,
{
    y.begin_write(y.nonzeroes() + fresh_entries(y, results), false)?;
    write(client, y, results, combine);
    y.finish_write();
    Ok(())
}

/// Number of `Some` results at indices `y` does not hold yet.
pub(crate) fn fresh_entries<T: Element, U>(y: &Vector<T>, results: &[Option<U>]) -> usize {
    let coords = y.coords();
    results
        .iter()
        .enumerate()
        .filter(|(i, r)| r.is_some() && !coords.assigned(*i))
        .count()
}

fn write<T, F>(client: &CpuClient, y: &mut Vector<T>, results: &[Option<T>], combine: F)
where
    T: Element,
    F: Fn(T, T) -> T + Sync,
{
    debug_assert_eq!(results.len(), y.size());
    let parallel = client.parallel_for(results.len());
    let min_len = client.rayon_min_len();
    let (values, coords) = y.parts_mut();

    #[cfg(feature = "rayon")]
    if parallel {
        let coords = &*coords;
        client.install_parallelism(|| {
            values
                .par_chunks_mut(min_len)
                .zip(results.par_chunks(min_len))
                .enumerate()
                .for_each(|(chunk, (vals, res))| {
                    let base = chunk * min_len;
                    let mut local = LocalUpdate::new();
                    for (k, r) in res.iter().enumerate() {
                        if let Some(v) = *r {
                            vals[k] = if coords.async_assign(base + k, &mut local) {
                                v
                            } else {
                                combine(v, vals[k])
                            };
                        }
                    }
                    coords.join_update(&mut local);
                });
        });
        return;
    }

    let _ = (parallel, min_len);
    for (i, r) in results.iter().enumerate() {
        if let Some(v) = *r {
            values[i] = if coords.assign(i) {
                v
            } else {
                combine(v, values[i])
            };
        }
    }
}

/// Apply `f(i, &mut y[i])` at every present entry of `y`, in place.
///
/// The pattern of `y` does not change.
pub(crate) fn update_present<T, F>(client: &CpuClient, y: &mut Vector<T>, f: F)
where
    T: Element,
    F: Fn(usize, &mut T) + Sync + Send,
{
    let parallel = client.parallel_for(y.size());
    let min_len = client.rayon_min_len();
    let (values, coords) = y.parts_mut();
    let coords = &*coords;

    #[cfg(feature = "rayon")]
    if parallel {
        client.install_parallelism(|| {
            values
                .par_chunks_mut(min_len)
                .enumerate()
                .for_each(|(chunk, vals)| {
                    let base = chunk * min_len;
                    for (k, v) in vals.iter_mut().enumerate() {
                        if coords.assigned(base + k) {
                            f(base + k, v);
                        }
                    }
                });
        });
        return;
    }

    let _ = (parallel, min_len);
    for (i, v) in values.iter_mut().enumerate() {
        if coords.assigned(i) {
            f(i, v);
        }
    }
}
