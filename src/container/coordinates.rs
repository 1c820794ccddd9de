//! Coordinate engine: the set of present indices of a container
//!
//! Presence is tracked twice: a bitmap answers `assigned(i)` in O(1), and a
//! packed stack of present indices makes iteration O(nnz). Both views agree
//! after every sequential call and after all pending [`LocalUpdate`]s have
//! been joined.
//!
//! Parallel kernels call [`Coordinates::async_assign`] from many threads at
//! once; each thread buffers newly added indices in its own `LocalUpdate` and
//! merges them with [`Coordinates::join_update`] when its chunk is done.

use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};
use smallvec::SmallVec;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Thread-local scratch of indices added by [`Coordinates::async_assign`].
#[derive(Debug, Default)]
pub struct LocalUpdate {
    pending: SmallVec<[usize; 32]>,
}

impl LocalUpdate {
    /// Empty scratch
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buffered additions
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Presence bitmap plus packed index stack for a container of length `n`.
pub struct Coordinates {
    assigned: Vec<AtomicBool>,
    stack: RwLock<Vec<usize>>,
}

impl Coordinates {
    /// All positions absent.
    pub fn new(size: usize) -> Self {
        Self {
            assigned: (0..size).map(|_| AtomicBool::new(false)).collect(),
            stack: RwLock::new(Vec::new()),
        }
    }

    /// All positions present.
    pub fn dense(size: usize) -> Self {
        Self {
            assigned: (0..size).map(|_| AtomicBool::new(true)).collect(),
            stack: RwLock::new((0..size).collect()),
        }
    }

    /// Logical length.
    #[inline]
    pub fn size(&self) -> usize {
        self.assigned.len()
    }

    /// Number of present indices.
    #[inline]
    pub fn nonzeroes(&self) -> usize {
        self.stack.read().len()
    }

    /// True when every position is present.
    #[inline]
    pub fn is_dense(&self) -> bool {
        self.nonzeroes() == self.size()
    }

    /// Whether `i` is present. Out-of-range indices are absent.
    #[inline]
    pub fn assigned(&self, i: usize) -> bool {
        self.assigned
            .get(i)
            .is_some_and(|b| b.load(Ordering::Acquire))
    }

    /// Mark `i` present; returns true if it was newly added.
    ///
    /// `i` must be in range.
    #[inline]
    pub fn assign(&mut self, i: usize) -> bool {
        let bit = self.assigned[i].get_mut();
        if *bit {
            false
        } else {
            *bit = true;
            self.stack.get_mut().push(i);
            true
        }
    }

    /// Mark `i` present from inside a parallel region.
    ///
    /// The index is recorded in `local` and only becomes visible to
    /// iteration after [`Coordinates::join_update`]. Returns true if this call
    /// added `i`.
    #[inline]
    pub fn async_assign(&self, i: usize, local: &mut LocalUpdate) -> bool {
        if self.assigned[i].swap(true, Ordering::AcqRel) {
            false
        } else {
            local.pending.push(i);
            true
        }
    }

    /// Merge a thread-local scratch into the packed stack.
    pub fn join_update(&self, local: &mut LocalUpdate) {
        if local.pending.is_empty() {
            return;
        }
        self.stack.write().extend(local.pending.drain(..));
    }

    /// Mark every position present.
    pub fn assign_all(&mut self) {
        if self.is_dense() {
            return;
        }
        for bit in self.assigned.iter_mut() {
            *bit.get_mut() = true;
        }
        let stack = self.stack.get_mut();
        stack.clear();
        stack.extend(0..self.assigned.len());
    }

    /// Remove every index.
    pub fn clear(&mut self) {
        let stack = self.stack.get_mut();
        if stack.len() * 4 < self.assigned.len() {
            for &i in stack.iter() {
                *self.assigned[i].get_mut() = false;
            }
        } else {
            for bit in self.assigned.iter_mut() {
                *bit.get_mut() = false;
            }
        }
        stack.clear();
    }

    /// The `k`-th present index in iteration order.
    #[inline]
    pub fn index(&self, k: usize) -> Option<usize> {
        self.stack.read().get(k).copied()
    }

    /// Present indices in iteration order.
    pub fn indices(&self) -> MappedRwLockReadGuard<'_, [usize]> {
        RwLockReadGuard::map(self.stack.read(), |s| s.as_slice())
    }

    /// Sort the packed stack ascending.
    pub fn sort(&mut self) {
        self.stack.get_mut().sort_unstable();
    }
}

impl Clone for Coordinates {
    fn clone(&self) -> Self {
        Self {
            assigned: self
                .assigned
                .iter()
                .map(|b| AtomicBool::new(b.load(Ordering::Acquire)))
                .collect(),
            stack: RwLock::new(self.stack.read().clone()),
        }
    }
}

impl fmt::Debug for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinates")
            .field("size", &self.size())
            .field("nonzeroes", &self.nonzeroes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_and_query() {
        let mut c = Coordinates::new(8);
        assert!(c.assign(3));
        assert!(!c.assign(3));
        assert!(c.assign(0));
        assert_eq!(c.nonzeroes(), 2);
        assert!(c.assigned(3));
        assert!(!c.assigned(4));
        assert!(!c.assigned(100));
        assert_eq!(&*c.indices(), &[3, 0]);
        assert_eq!(c.index(1), Some(0));
        assert_eq!(c.index(2), None);
    }

    #[test]
    fn test_clear_sparse_and_dense() {
        let mut c = Coordinates::new(100);
        c.assign(7);
        c.clear();
        assert_eq!(c.nonzeroes(), 0);
        assert!(!c.assigned(7));

        let mut d = Coordinates::dense(10);
        assert!(d.is_dense());
        d.clear();
        assert!((0..10).all(|i| !d.assigned(i)));
    }

    #[test]
    fn test_assign_all() {
        let mut c = Coordinates::new(5);
        c.assign(2);
        c.assign_all();
        assert!(c.is_dense());
        let mut idx = c.indices().to_vec();
        idx.sort();
        assert_eq!(idx, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_async_assign_then_join() {
        let c = Coordinates::new(16);
        let mut a = LocalUpdate::new();
        let mut b = LocalUpdate::new();
        assert!(c.async_assign(1, &mut a));
        assert!(c.async_assign(5, &mut b));
        assert!(!c.async_assign(1, &mut b));
        // bitmap is updated immediately, the stack only after joining
        assert!(c.assigned(5));
        assert_eq!(c.nonzeroes(), 0);
        c.join_update(&mut a);
        c.join_update(&mut b);
        assert_eq!(c.nonzeroes(), 2);
        assert!(a.is_empty() && b.is_empty());
    }

    #[test]
    fn test_concurrent_async_assign() {
        let c = Coordinates::new(1000);
        std::thread::scope(|s| {
            for t in 0..4 {
                let c = &c;
                s.spawn(move || {
                    let mut local = LocalUpdate::new();
                    for i in (t..1000).step_by(3) {
                        c.async_assign(i, &mut local);
                    }
                    c.join_update(&mut local);
                });
            }
        });
        let mut idx = c.indices().to_vec();
        idx.sort();
        idx.dedup();
        assert_eq!(idx.len(), c.nonzeroes());
        assert_eq!(c.nonzeroes(), 1000);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut c = Coordinates::new(4);
        c.assign(1);
        let mut d = c.clone();
        d.assign(2);
        assert_eq!(c.nonzeroes(), 1);
        assert_eq!(d.nonzeroes(), 2);
    }
}
