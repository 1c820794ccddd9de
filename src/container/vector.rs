//! Sparse vector container

use super::ContainerState;
use super::coordinates::Coordinates;
use super::pinned::PinnedVector;
use crate::descriptor::IOMode;
use crate::dtype::Element;
use crate::error::{Error, Result};
use parking_lot::MappedRwLockReadGuard;
use std::fmt;
use std::sync::Arc;

/// A vector of logical length `n` with a set of present entries.
///
/// Values live in a dense backing array of length `n`; the coordinate engine
/// records which positions hold an entry. Entries at absent positions are
/// unspecified and never observed.
///
/// Cloning is O(1): the clone shares storage with the original until either
/// is written, at which point the writer detaches its own copy. Primitives
/// that forbid aliasing between an output and an input detect shared storage
/// and report [`Rc::Overlap`](crate::error::Rc::Overlap).
///
/// ```
/// use sparsering::container::Vector;
///
/// let mut x = Vector::<f64>::new(5);
/// x.set_element(2.5, 3)?;
/// assert_eq!(x.nonzeroes(), 1);
/// assert_eq!(x.get(3), Some(2.5));
/// assert_eq!(x.get(0), None);
/// # Ok::<(), sparsering::error::Error>(())
/// ```
#[derive(Clone)]
pub struct Vector<T: Element> {
    values: Arc<Vec<T>>,
    coords: Arc<Coordinates>,
    capacity: usize,
    state: ContainerState,
}

impl<T: Element> Vector<T> {
    /// Empty vector of length `n` with capacity `n`.
    pub fn new(n: usize) -> Self {
        Self {
            values: Arc::new(vec![T::default(); n]),
            coords: Arc::new(Coordinates::new(n)),
            capacity: n,
            state: ContainerState::Clean,
        }
    }

    /// Empty vector of length `n` holding at most `capacity` entries.
    ///
    /// Fails with ILLEGAL when `capacity > n`.
    pub fn with_capacity(n: usize, capacity: usize) -> Result<Self> {
        if capacity > n {
            return Err(Error::invalid_argument(
                "capacity",
                format!("capacity {capacity} exceeds vector length {n}"),
            ));
        }
        let mut v = Self::new(n);
        v.capacity = capacity;
        Ok(v)
    }

    /// Dense vector holding `values`.
    pub fn from_dense(values: &[T]) -> Self {
        Self {
            values: Arc::new(values.to_vec()),
            coords: Arc::new(Coordinates::dense(values.len())),
            capacity: values.len(),
            state: ContainerState::Clean,
        }
    }

    /// Logical length.
    #[inline]
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of present entries.
    #[inline]
    pub fn nonzeroes(&self) -> usize {
        self.coords.nonzeroes()
    }

    /// Two-phase state.
    #[inline]
    pub fn state(&self) -> ContainerState {
        self.state
    }

    /// True when every position holds an entry.
    #[inline]
    pub fn is_dense(&self) -> bool {
        self.coords.is_dense()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.clear_entries();
        self.state = ContainerState::Clean;
    }

    fn clear_entries(&mut self) {
        if self.coords.nonzeroes() > 0 {
            Arc::make_mut(&mut self.coords).clear();
        }
    }

    /// Stage a single entry `x[i] = value`, overwriting an existing one.
    ///
    /// Fails with MISMATCH when `i` is out of range and with ILLEGAL when a
    /// new entry would exceed the capacity.
    pub fn set_element(&mut self, value: T, i: usize) -> Result<()> {
        let n = self.size();
        if i >= n {
            return Err(Error::IndexOutOfBounds { index: i, size: n });
        }
        if !self.coords.assigned(i) && self.nonzeroes() >= self.capacity {
            return Err(Error::InsufficientCapacity {
                required: self.nonzeroes() + 1,
                capacity: self.capacity,
            });
        }
        let (values, coords) = self.parts_mut();
        values[i] = value;
        coords.assign(i);
        Ok(())
    }

    /// Replace the contents with the `(index, value)` pairs of `iter`.
    ///
    /// A repeated index keeps its last value. On error the vector is
    /// unchanged. `mode` is accepted for symmetry with
    /// [`Matrix::build_matrix_unique`](super::Matrix::build_matrix_unique);
    /// a single process always sees the whole input.
    pub fn build<I>(&mut self, iter: I, mode: IOMode) -> Result<()>
    where
        I: IntoIterator<Item = (usize, T)>,
    {
        self.build_entries(iter.into_iter().collect(), false, mode)
    }

    /// Like [`Vector::build`], but a repeated index fails with ILLEGAL.
    ///
    /// ```
    /// use sparsering::container::Vector;
    /// use sparsering::descriptor::IOMode;
    /// use sparsering::error::Rc;
    ///
    /// let mut x = Vector::<i32>::new(4);
    /// let err = x.build_unique(vec![(1, 5), (1, 6)], IOMode::Sequential).unwrap_err();
    /// assert_eq!(err.rc(), Rc::Illegal);
    /// assert_eq!(x.nonzeroes(), 0);
    /// ```
    pub fn build_unique<I>(&mut self, iter: I, mode: IOMode) -> Result<()>
    where
        I: IntoIterator<Item = (usize, T)>,
    {
        self.build_entries(iter.into_iter().collect(), true, mode)
    }

    fn build_entries(&mut self, entries: Vec<(usize, T)>, unique: bool, mode: IOMode) -> Result<()> {
        let n = self.size();
        if let Some(&(i, _)) = entries.iter().find(|(i, _)| *i >= n) {
            return Err(Error::IndexOutOfBounds { index: i, size: n });
        }
        let mut seen = Coordinates::new(n);
        for &(i, _) in &entries {
            if !seen.assign(i) && unique {
                return Err(Error::DuplicateIndex { index: i });
            }
        }
        if seen.nonzeroes() > self.capacity {
            return Err(Error::InsufficientCapacity {
                required: seen.nonzeroes(),
                capacity: self.capacity,
            });
        }
        tracing::debug!(n, entries = entries.len(), unique, ?mode, "build vector");
        let values = Arc::make_mut(&mut self.values);
        for (i, v) in entries {
            values[i] = v;
        }
        self.coords = Arc::new(seen);
        self.state = ContainerState::Clean;
        Ok(())
    }

    /// Value at `i`, if present.
    #[inline]
    pub fn get(&self, i: usize) -> Option<T> {
        self.coords.assigned(i).then(|| self.values[i])
    }

    /// Present entries as `(index, value)` in the engine's order.
    pub fn iter(&self) -> VectorIter<'_, T> {
        VectorIter {
            indices: self.coords.indices(),
            values: self.values.as_slice(),
            pos: 0,
        }
    }

    /// All `n` positions in order, `fill` standing in for absent ones.
    pub fn iter_dense(&self, fill: T) -> impl Iterator<Item = T> + '_ {
        (0..self.size()).map(move |i| self.get(i).unwrap_or(fill))
    }

    /// Present entries sorted by index.
    pub fn to_sorted_vec(&self) -> Vec<(usize, T)> {
        let mut out: Vec<(usize, T)> = self.iter().collect();
        out.sort_unstable_by_key(|&(i, _)| i);
        out
    }

    /// Snapshot sharing this vector's storage.
    pub fn pin(&self, mode: IOMode) -> PinnedVector<T> {
        PinnedVector::new(Arc::clone(&self.values), Arc::clone(&self.coords), mode)
    }

    /// True when `self` and `other` share storage.
    pub fn shares_storage<U: Element>(&self, other: &Vector<U>) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.values).cast::<()>(),
            Arc::as_ptr(&other.values).cast::<()>(),
        )
    }

    pub(crate) fn coords(&self) -> &Coordinates {
        &self.coords
    }

    pub(crate) fn raw_values(&self) -> &[T] {
        &self.values
    }

    /// Mutable storage, detaching from any clone or pin first.
    pub(crate) fn parts_mut(&mut self) -> (&mut [T], &mut Coordinates) {
        (
            Arc::make_mut(&mut self.values).as_mut_slice(),
            Arc::make_mut(&mut self.coords),
        )
    }

    /// RESIZE bookkeeping: raise the capacity to at least `required`, up
    /// to the length.
    pub(crate) fn reserve(&mut self, required: usize) {
        self.capacity = self.capacity.max(required.min(self.size()));
        tracing::debug!(required, capacity = self.capacity, "vector reserved");
        self.state = ContainerState::Reserved(required);
    }

    /// Start an EXECUTE write of `required` entries in total.
    ///
    /// Fails with ILLEGAL, leaving the vector untouched and `Clean`, when
    /// they do not fit. Otherwise the vector is `Dirty` until
    /// [`Vector::finish_write`]. With `replace` the current entries are
    /// dropped first.
    pub(crate) fn begin_write(&mut self, required: usize, replace: bool) -> Result<()> {
        if required > self.capacity {
            self.state = ContainerState::Clean;
            return Err(Error::InsufficientCapacity {
                required,
                capacity: self.capacity,
            });
        }
        self.state = ContainerState::Dirty;
        if replace {
            self.clear_entries();
        }
        Ok(())
    }

    pub(crate) fn finish_write(&mut self) {
        self.state = ContainerState::Clean;
    }
}

impl<T: Element> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("dtype", &T::DTYPE)
            .field("size", &self.size())
            .field("capacity", &self.capacity)
            .field("nonzeroes", &self.nonzeroes())
            .finish()
    }
}

/// Iterator over the present entries of a [`Vector`].
pub struct VectorIter<'a, T> {
    indices: MappedRwLockReadGuard<'a, [usize]>,
    values: &'a [T],
    pos: usize,
}

impl<T: Copy> Iterator for VectorIter<'_, T> {
    type Item = (usize, T);

    #[inline]
    fn next(&mut self) -> Option<(usize, T)> {
        let i = *self.indices.get(self.pos)?;
        self.pos += 1;
        Some((i, self.values[i]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.indices.len() - self.pos;
        (rest, Some(rest))
    }
}

impl<T: Copy> ExactSizeIterator for VectorIter<'_, T> {}
