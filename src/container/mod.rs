//! Containers: vectors, matrices and pinned vectors
//!
//! All containers are handles over reference-counted storage. Cloning a
//! container is cheap and yields a second handle onto the same storage; the
//! first write through either handle detaches it. Kernels use this to detect
//! an output that overlaps one of its inputs.

mod coordinates;
pub(crate) mod mask;
mod matrix;
mod pinned;
mod vector;

pub use coordinates::{Coordinates, LocalUpdate};
pub use matrix::{CompressedStorage, Matrix};
pub use pinned::PinnedVector;
pub use vector::{Vector, VectorIter};

use crate::error::{Result, try_reserve};

/// Two-phase state of a container used as a kernel output.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ContainerState {
    /// Freshly constructed, or the last kernel call was a full EXECUTE or
    /// an EXECUTE that failed before writing.
    #[default]
    Clean,
    /// The last kernel call was a RESIZE that reserved this many nonzeroes.
    Reserved(usize),
    /// A write began but did not finish; contents are undefined.
    Dirty,
}

/// `vec![value; n]` reporting allocation failure as OUTOFMEM.
pub(crate) fn alloc_filled<T: Clone>(n: usize, value: T) -> Result<Vec<T>> {
    let mut v = Vec::new();
    try_reserve(&mut v, n)?;
    v.resize(n, value);
    Ok(v)
}
