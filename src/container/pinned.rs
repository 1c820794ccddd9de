//! Pinned vectors
//!
//! A [`PinnedVector`] holds a reference-counted share of a vector's backing
//! array and coordinate engine. The storage is released only after the vector
//! and every pin are dropped, so a result produced inside a
//! [`Launcher`](crate::runtime::Launcher) program stays readable after the
//! execution context is torn down. Later writes to the source vector detach
//! it from the pin; the pin keeps observing the snapshot.

use super::coordinates::Coordinates;
use crate::descriptor::IOMode;
use crate::dtype::Element;
use std::fmt;
use std::sync::Arc;

/// Read-only snapshot of a [`Vector`](super::Vector).
#[derive(Clone)]
pub struct PinnedVector<T: Element> {
    values: Arc<Vec<T>>,
    coords: Arc<Coordinates>,
    mode: IOMode,
}

impl<T: Element> PinnedVector<T> {
    pub(crate) fn new(values: Arc<Vec<T>>, coords: Arc<Coordinates>, mode: IOMode) -> Self {
        Self {
            values,
            coords,
            mode,
        }
    }

    /// Length of the pinned vector.
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Number of pinned entries.
    pub fn nonzeroes(&self) -> usize {
        self.coords.nonzeroes()
    }

    /// How the pin was taken.
    pub fn mode(&self) -> IOMode {
        self.mode
    }

    /// Index of the `k`-th entry, for `k < nonzeroes()`.
    pub fn index(&self, k: usize) -> Option<usize> {
        self.coords.index(k)
    }

    /// Value of the `k`-th entry, for `k < nonzeroes()`.
    pub fn value(&self, k: usize) -> Option<T> {
        self.coords.index(k).map(|i| self.values[i])
    }

    /// Value at position `i`, if present.
    pub fn get(&self, i: usize) -> Option<T> {
        self.coords.assigned(i).then(|| self.values[i])
    }

    /// Pinned entries as `(index, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        (0..self.nonzeroes()).filter_map(move |k| Some((self.index(k)?, self.value(k)?)))
    }
}

impl<T: Element> fmt::Debug for PinnedVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinnedVector")
            .field("size", &self.size())
            .field("nonzeroes", &self.nonzeroes())
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::container::Vector;
    use crate::descriptor::IOMode;

    #[test]
    fn test_pin_survives_vector_drop() {
        let mut v = Vector::<f64>::new(6);
        v.set_element(1.5, 4).unwrap();
        v.set_element(-2.0, 1).unwrap();
        let pinned = v.pin(IOMode::Sequential);
        drop(v);
        assert_eq!(pinned.size(), 6);
        assert_eq!(pinned.nonzeroes(), 2);
        let mut pairs: Vec<_> = pinned.iter().collect();
        pairs.sort_by_key(|p| p.0);
        assert_eq!(pairs, vec![(1, -2.0), (4, 1.5)]);
        assert_eq!(pinned.index(2), None);
    }

    #[test]
    fn test_pin_is_a_snapshot() {
        let mut v = Vector::<i32>::new(3);
        v.set_element(1, 0).unwrap();
        let pinned = v.pin(IOMode::Sequential);
        v.set_element(5, 0).unwrap();
        v.set_element(6, 2).unwrap();
        assert_eq!(pinned.nonzeroes(), 1);
        assert_eq!(pinned.get(0), Some(1));
        assert_eq!(pinned.get(2), None);
        assert_eq!(v.get(0), Some(5));
    }

    #[test]
    fn test_index_value_agree() {
        let v = Vector::from_dense(&[3u8, 4, 5]);
        let p = v.pin(IOMode::Parallel);
        for k in 0..p.nonzeroes() {
            let i = p.index(k).unwrap();
            assert_eq!(p.value(k), p.get(i));
        }
        assert_eq!(p.mode(), IOMode::Parallel);
    }
}
