//! Sparse matrix container with paired CRS and CCS stores
//!
//! Both stores always describe the same set of nonzeroes and are kept in
//! canonical form: minor indices strictly increase within every lane.
//! Kernels that produce a matrix build a new CRS and derive the CCS from it
//! by a counting transpose, then swap both in together.

use super::{ContainerState, alloc_filled};
use crate::descriptor::IOMode;
use crate::dtype::Element;
use crate::error::{Error, Result, try_reserve};
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// One compressed store: `offsets` has one entry per major index plus one,
/// and lane `r` is `indices[offsets[r]..offsets[r + 1]]` with the matching
/// `values`.
///
/// For CRS the major index is the row; for CCS it is the column. Pattern
/// matrices (`T = ()`) store no values.
#[derive(Clone, Debug, PartialEq)]
pub struct CompressedStorage<T> {
    pub(crate) offsets: Vec<usize>,
    pub(crate) indices: Vec<usize>,
    pub(crate) values: Vec<T>,
}

impl<T: Element> CompressedStorage<T> {
    pub(crate) fn empty(major: usize) -> Self {
        Self {
            offsets: vec![0; major + 1],
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Number of lanes.
    #[inline]
    pub fn major_dim(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of stored entries.
    #[inline]
    pub fn nonzeroes(&self) -> usize {
        self.indices.len()
    }

    /// Lane offsets, length `major_dim() + 1`.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Minor indices of all lanes, concatenated.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Values of all lanes, concatenated.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Minor indices and values of lane `r`.
    #[inline]
    pub fn lane(&self, r: usize) -> (&[usize], &[T]) {
        let (start, end) = (self.offsets[r], self.offsets[r + 1]);
        (&self.indices[start..end], &self.values[start..end])
    }

    /// True when every lane is strictly increasing and the offsets are
    /// consistent with the entry count.
    pub fn is_canonical(&self) -> bool {
        self.offsets.first() == Some(&0)
            && self.offsets.last() == Some(&self.indices.len())
            && self.offsets.windows(2).all(|w| w[0] <= w[1])
            && self.indices.len() == self.values.len()
            && (0..self.major_dim()).all(|r| self.lane(r).0.windows(2).all(|w| w[0] < w[1]))
    }

    /// Assemble from per-lane sorted entries.
    pub(crate) fn from_lanes(lanes: Vec<Vec<(usize, T)>>) -> Result<Self> {
        let nnz: usize = lanes.iter().map(Vec::len).sum();
        let mut offsets = Vec::new();
        try_reserve(&mut offsets, lanes.len() + 1)?;
        let mut indices = Vec::new();
        try_reserve(&mut indices, nnz)?;
        let mut values = Vec::new();
        try_reserve(&mut values, nnz)?;
        offsets.push(0);
        for lane in lanes {
            for (j, v) in lane {
                indices.push(j);
                values.push(v);
            }
            offsets.push(indices.len());
        }
        Ok(Self {
            offsets,
            indices,
            values,
        })
    }

    /// Swap the roles of major and minor index.
    ///
    /// Lanes of the result come out sorted because source lanes are visited
    /// in increasing order.
    pub(crate) fn transpose(&self, minor: usize) -> Result<Self> {
        let nnz = self.nonzeroes();
        let mut offsets = alloc_filled(minor + 1, 0usize)?;
        for &j in &self.indices {
            offsets[j + 1] += 1;
        }
        for j in 0..minor {
            offsets[j + 1] += offsets[j];
        }
        let mut next = offsets[..minor].to_vec();
        let mut indices = alloc_filled(nnz, 0usize)?;
        let mut values = alloc_filled(nnz, T::default())?;
        for r in 0..self.major_dim() {
            for k in self.offsets[r]..self.offsets[r + 1] {
                let j = self.indices[k];
                let pos = next[j];
                next[j] += 1;
                indices[pos] = r;
                values[pos] = self.values[k];
            }
        }
        Ok(Self {
            offsets,
            indices,
            values,
        })
    }

    fn reserve(&mut self, capacity: usize) -> Result<()> {
        let (stored_indices, stored_values) = (self.indices.len(), self.values.len());
        try_reserve(&mut self.indices, capacity.saturating_sub(stored_indices))?;
        try_reserve(&mut self.values, capacity.saturating_sub(stored_values))
    }
}

#[derive(Clone, Debug)]
struct Stores<T> {
    crs: CompressedStorage<T>,
    ccs: CompressedStorage<T>,
}

/// Sparse `m × n` matrix.
///
/// Capacity is the maximum number of nonzeroes the matrix may hold; kernels
/// writing into a matrix never grow it during EXECUTE. Cloning is O(1) and
/// shares storage until the next write, like [`Vector`](super::Vector).
///
/// ```
/// use sparsering::container::Matrix;
/// use sparsering::descriptor::IOMode;
///
/// let mut a = Matrix::<f64>::new(3, 3);
/// a.build_matrix_unique(vec![(2, 0, 1.0), (0, 1, 2.0)], IOMode::Sequential)?;
/// let entries: Vec<_> = a.iter().collect();
/// assert_eq!(entries, vec![((0, 1), 2.0), ((2, 0), 1.0)]);
/// # Ok::<(), sparsering::error::Error>(())
/// ```
#[derive(Clone)]
pub struct Matrix<T: Element> {
    nrows: usize,
    ncols: usize,
    capacity: usize,
    state: ContainerState,
    stores: Arc<Stores<T>>,
}

impl<T: Element> Matrix<T> {
    /// Empty matrix with the default capacity `max(m, n)`.
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            capacity: nrows.max(ncols),
            state: ContainerState::Clean,
            stores: Arc::new(Stores {
                crs: CompressedStorage::empty(nrows),
                ccs: CompressedStorage::empty(ncols),
            }),
        }
    }

    /// Empty matrix able to hold `capacity` nonzeroes.
    pub fn with_capacity(nrows: usize, ncols: usize, capacity: usize) -> Result<Self> {
        let mut a = Self::new(nrows, ncols);
        a.capacity = 0;
        a.resize(capacity)?;
        Ok(a)
    }

    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of stored nonzeroes.
    #[inline]
    pub fn nonzeroes(&self) -> usize {
        self.stores.crs.nonzeroes()
    }

    /// Maximum number of nonzeroes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Two-phase state.
    #[inline]
    pub fn state(&self) -> ContainerState {
        self.state
    }

    /// Grow both stores so each can hold `capacity` nonzeroes.
    ///
    /// Fails with ILLEGAL when `capacity` is below the current nonzero count
    /// and with OUTOFMEM when the allocation fails; the matrix is unchanged
    /// in both cases.
    pub fn resize(&mut self, capacity: usize) -> Result<()> {
        let nnz = self.nonzeroes();
        if capacity < nnz {
            return Err(Error::InsufficientCapacity {
                required: nnz,
                capacity,
            });
        }
        if capacity > self.capacity {
            let stores = Arc::make_mut(&mut self.stores);
            stores.crs.reserve(capacity)?;
            stores.ccs.reserve(capacity)?;
        }
        self.capacity = capacity;
        Ok(())
    }

    /// Remove every nonzero.
    pub fn clear(&mut self) {
        self.stores = Arc::new(Stores {
            crs: CompressedStorage::empty(self.nrows),
            ccs: CompressedStorage::empty(self.ncols),
        });
        self.state = ContainerState::Clean;
    }

    /// Replace the contents with the triples `(i, j, v)` of `iter`.
    ///
    /// Coordinates must be unique: a repeated `(i, j)` fails with ILLEGAL.
    /// Out-of-range indices fail with MISMATCH. The capacity grows to the
    /// number of triples if needed. On error the matrix is unchanged.
    ///
    /// With [`IOMode::Parallel`] the triples are sorted in parallel.
    pub fn build_matrix_unique<I>(&mut self, iter: I, mode: IOMode) -> Result<()>
    where
        I: IntoIterator<Item = (usize, usize, T)>,
    {
        let mut triples: Vec<(usize, usize, T)> = iter.into_iter().collect();
        for &(i, j, _) in &triples {
            if i >= self.nrows {
                return Err(Error::IndexOutOfBounds {
                    index: i,
                    size: self.nrows,
                });
            }
            if j >= self.ncols {
                return Err(Error::IndexOutOfBounds {
                    index: j,
                    size: self.ncols,
                });
            }
        }

        match mode {
            #[cfg(feature = "rayon")]
            IOMode::Parallel => triples.par_sort_unstable_by_key(|t| (t.0, t.1)),
            _ => triples.sort_unstable_by_key(|t| (t.0, t.1)),
        }
        if let Some(w) = triples
            .windows(2)
            .find(|w| (w[0].0, w[0].1) == (w[1].0, w[1].1))
        {
            return Err(Error::DuplicateEntry {
                row: w[0].0,
                col: w[0].1,
            });
        }

        let nnz = triples.len();
        let mut offsets = alloc_filled(self.nrows + 1, 0usize)?;
        let mut indices = Vec::new();
        try_reserve(&mut indices, nnz)?;
        let mut values = Vec::new();
        try_reserve(&mut values, nnz)?;
        for (i, j, v) in triples {
            offsets[i + 1] += 1;
            indices.push(j);
            values.push(v);
        }
        for i in 0..self.nrows {
            offsets[i + 1] += offsets[i];
        }

        tracing::debug!(
            nrows = self.nrows,
            ncols = self.ncols,
            nnz,
            ?mode,
            "build matrix"
        );
        let capacity = self.capacity.max(nnz);
        let crs = CompressedStorage {
            offsets,
            indices,
            values,
        };
        let ccs = crs.transpose(self.ncols)?;
        self.stores = Arc::new(Stores { crs, ccs });
        self.capacity = capacity;
        self.state = ContainerState::Clean;
        Ok(())
    }

    /// Value at `(i, j)`, if present.
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        if i >= self.nrows {
            return None;
        }
        let (cols, vals) = self.stores.crs.lane(i);
        cols.binary_search(&j).ok().map(|k| vals[k])
    }

    /// Entries `((i, j), v)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), T)> + '_ {
        let crs = &self.stores.crs;
        (0..self.nrows).flat_map(move |i| {
            let (cols, vals) = crs.lane(i);
            cols.iter().zip(vals).map(move |(&j, &v)| ((i, j), v))
        })
    }

    /// Entries `((i, j), v)` in column-major order.
    pub fn iter_ccs(&self) -> impl Iterator<Item = ((usize, usize), T)> + '_ {
        let ccs = &self.stores.ccs;
        (0..self.ncols).flat_map(move |j| {
            let (rows, vals) = ccs.lane(j);
            rows.iter().zip(vals).map(move |(&i, &v)| ((i, j), v))
        })
    }

    /// Row-major store.
    pub fn crs(&self) -> &CompressedStorage<T> {
        &self.stores.crs
    }

    /// Column-major store.
    pub fn ccs(&self) -> &CompressedStorage<T> {
        &self.stores.ccs
    }

    /// True when `self` and `other` share storage.
    pub fn shares_storage<U: Element>(&self, other: &Matrix<U>) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.stores).cast::<()>(),
            Arc::as_ptr(&other.stores).cast::<()>(),
        )
    }

    /// Shape of the matrix as read under an optional transpose.
    #[inline]
    pub(crate) fn dims(&self, transposed: bool) -> (usize, usize) {
        if transposed {
            (self.ncols, self.nrows)
        } else {
            (self.nrows, self.ncols)
        }
    }

    /// Row lanes of the matrix as read under an optional transpose.
    #[inline]
    pub(crate) fn row_lanes(&self, transposed: bool) -> &CompressedStorage<T> {
        if transposed {
            &self.stores.ccs
        } else {
            &self.stores.crs
        }
    }

    /// Column lanes of the matrix as read under an optional transpose.
    #[inline]
    pub(crate) fn col_lanes(&self, transposed: bool) -> &CompressedStorage<T> {
        if transposed {
            &self.stores.crs
        } else {
            &self.stores.ccs
        }
    }

    /// RESIZE bookkeeping: make room for `bound` nonzeroes.
    pub(crate) fn reserve_for(&mut self, bound: usize) -> Result<()> {
        if bound > self.capacity {
            self.resize(bound)?;
        }
        tracing::debug!(bound, capacity = self.capacity, "matrix reserved");
        self.state = ContainerState::Reserved(bound);
        Ok(())
    }

    /// EXECUTE commit: install `crs` and its transpose.
    ///
    /// Fails with ILLEGAL before touching the matrix when `crs` exceeds the
    /// capacity. A failure before the write leaves the matrix `Clean`.
    pub(crate) fn commit(&mut self, crs: CompressedStorage<T>) -> Result<()> {
        if crs.major_dim() != self.nrows {
            return Err(Error::mismatch("commit", self.nrows, crs.major_dim()));
        }
        let nnz = crs.nonzeroes();
        if nnz > self.capacity {
            self.state = ContainerState::Clean;
            return Err(Error::InsufficientCapacity {
                required: nnz,
                capacity: self.capacity,
            });
        }
        let ccs = match crs.transpose(self.ncols) {
            Ok(ccs) => ccs,
            Err(e) => {
                self.state = ContainerState::Clean;
                return Err(e);
            }
        };
        if ccs.nonzeroes() != nnz {
            self.state = ContainerState::Dirty;
            return Err(Error::Panic {
                reason: format!(
                    "row and column stores disagree: {nnz} vs {}",
                    ccs.nonzeroes()
                ),
            });
        }
        self.stores = Arc::new(Stores { crs, ccs });
        self.state = ContainerState::Clean;
        Ok(())
    }
}

impl Matrix<()> {
    /// Build a pattern matrix from coordinates.
    pub fn build_pattern<I>(&mut self, iter: I, mode: IOMode) -> Result<()>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        self.build_matrix_unique(iter.into_iter().map(|(i, j)| (i, j, ())), mode)
    }
}

impl<T: Element> fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("dtype", &T::DTYPE)
            .field("nrows", &self.nrows)
            .field("ncols", &self.ncols)
            .field("capacity", &self.capacity)
            .field("nonzeroes", &self.nonzeroes())
            .field("state", &self.state)
            .finish()
    }
}
