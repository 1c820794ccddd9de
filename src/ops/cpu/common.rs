//! Argument validation shared by the CPU operations

use crate::container::Vector;
use crate::descriptor::Descriptor;
use crate::dtype::{Element, Scalar};
use crate::error::{Error, Result};
use std::any::TypeId;

/// Value of a stored entry in domain `D`; pattern entries read as `one`.
#[inline]
pub(crate) fn lift<T: Element, D: Element>(v: T, one: D) -> D {
    if T::DTYPE.is_void() { one } else { v.cast() }
}

/// MISMATCH unless `got == expected`.
#[inline]
pub(super) fn check_size(op: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(Error::mismatch(op, expected, got))
    }
}

/// Under `NO_CASTING`, MISMATCH unless `Got` is exactly `Want`.
///
/// Pattern containers carry no values and always pass.
pub(super) fn check_domain<Got: Element, Want: Element>(op: &'static str, desc: Descriptor) -> Result<()> {
    if desc.no_casting() && !Got::DTYPE.is_void() && TypeId::of::<Got>() != TypeId::of::<Want>() {
        return Err(Error::DomainMismatch {
            op,
            expected: Want::DTYPE,
            got: Got::DTYPE,
        });
    }
    Ok(())
}

/// OVERLAP when the output shares storage with an input, unless the
/// descriptor allows it.
#[inline]
pub(super) fn check_overlap(op: &'static str, desc: Descriptor, shares: bool) -> Result<()> {
    if shares && !desc.safe_overlap() {
        Err(Error::Overlap { op })
    } else {
        Ok(())
    }
}

/// Under `DENSE`, ILLEGAL unless the vector holds every entry.
pub(super) fn check_dense<T: Element>(desc: Descriptor, v: &Vector<T>) -> Result<()> {
    if desc.dense() && !v.is_dense() {
        return Err(Error::invalid_argument(
            "dense",
            format!("vector holds {} of {} entries", v.nonzeroes(), v.size()),
        ));
    }
    Ok(())
}

/// Index `i` as a value of `T`. Only meaningful after
/// [`check_index_domain`] accepted an index at least as large.
#[inline]
pub(super) fn index_as<T: Element>(i: usize) -> T {
    T::from_scalar(Scalar::Int(i as i128))
}

/// ILLEGAL unless the largest index below `n` for which `written` holds is
/// exactly representable in `T`. Representable indices of every domain form
/// a prefix of `0..`, so checking the largest suffices.
pub(super) fn check_index_domain<T: Element>(n: usize, written: impl Fn(usize) -> bool) -> Result<()> {
    if T::DTYPE.is_void() {
        return Ok(());
    }
    match (0..n).rev().find(|&i| written(i)) {
        Some(i) if !index_as::<T>(i).to_scalar().is_exactly(i as i128) => Err(Error::invalid_argument(
            "use_index",
            format!("index {i} is not representable in {}", T::DTYPE),
        )),
        _ => Ok(()),
    }
}

/// A matrix coordinate read from an index vector entry.
///
/// ILLEGAL unless `v` is a non-negative whole number, MISMATCH unless it is
/// below `dim`.
pub(super) fn coordinate_of<I: Element>(op: &'static str, v: I, dim: usize) -> Result<usize> {
    let whole = match v.to_scalar() {
        Scalar::Int(i) if i >= 0 => i,
        Scalar::Float(f) if f >= 0.0 && f.fract() == 0.0 => f as i128,
        _ => return Err(Error::invalid_argument(op, format!("{v:?} is not a coordinate"))),
    };
    match usize::try_from(whole) {
        Ok(i) if i < dim => Ok(i),
        Ok(i) => Err(Error::IndexOutOfBounds { index: i, size: dim }),
        Err(_) => Err(Error::IndexOutOfBounds {
            index: usize::MAX,
            size: dim,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Rc;

    #[test]
    fn test_lift_pattern() {
        assert_eq!(lift::<(), f64>((), 1.0), 1.0);
        assert_eq!(lift::<i32, f64>(3, 1.0), 3.0);
    }

    #[test]
    fn test_checks() {
        assert!(check_size("x", 3, 3).is_ok());
        assert_eq!(check_size("x", 3, 4).unwrap_err().rc(), Rc::Mismatch);

        assert!(check_domain::<f32, f64>("x", Descriptor::NO_OPERATION).is_ok());
        assert_eq!(
            check_domain::<f32, f64>("x", Descriptor::NO_CASTING).unwrap_err().rc(),
            Rc::Mismatch
        );
        assert!(check_domain::<(), f64>("x", Descriptor::NO_CASTING).is_ok());

        assert_eq!(
            check_overlap("x", Descriptor::NO_OPERATION, true).unwrap_err().rc(),
            Rc::Overlap
        );
        assert!(check_overlap("x", Descriptor::SAFE_OVERLAP, true).is_ok());

        let sparse = Vector::<f64>::new(2);
        assert_eq!(check_dense(Descriptor::DENSE, &sparse).unwrap_err().rc(), Rc::Illegal);
        assert!(check_dense(Descriptor::NO_OPERATION, &sparse).is_ok());
    }

    #[test]
    fn test_index_domain() {
        assert!(check_index_domain::<u8>(256, |_| true).is_ok());
        assert_eq!(check_index_domain::<u8>(301, |_| true).unwrap_err().rc(), Rc::Illegal);
        assert!(check_index_domain::<u8>(301, |i| i < 200).is_ok());
        assert_eq!(check_index_domain::<bool>(3, |_| true).unwrap_err().rc(), Rc::Illegal);
        assert!(check_index_domain::<f32>(1 << 24, |_| true).is_ok());
        assert!(check_index_domain::<()>(1000, |_| true).is_ok());
        assert_eq!(index_as::<f64>(300), 300.0);
    }

    #[test]
    fn test_coordinate_of() {
        assert_eq!(coordinate_of("zip", 3u8, 4).unwrap(), 3);
        assert_eq!(coordinate_of("zip", 2.0f64, 4).unwrap(), 2);
        assert_eq!(coordinate_of("zip", 4i32, 4).unwrap_err().rc(), Rc::Mismatch);
        assert_eq!(coordinate_of("zip", -1i64, 4).unwrap_err().rc(), Rc::Illegal);
        assert_eq!(coordinate_of("zip", 1.5f32, 4).unwrap_err().rc(), Rc::Illegal);
    }
}
