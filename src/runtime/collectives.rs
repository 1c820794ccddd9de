//! Collective communication supplied by the launch harness
//!
//! Kernels in this crate run within one process. A harness that runs the
//! same program on `P` processes supplies these collectives; with `P = 1`
//! every one of them is a no-op, which is what [`SingleProcess`] does.

use crate::error::{Error, Result};
use std::fmt::Debug;

/// Reduction applied by the `allreduce_*` collectives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReduceOp {
    /// Sum of all contributions
    Sum,
    /// Largest contribution
    Max,
    /// Nonzero if any contribution is nonzero
    AnyOr,
}

impl ReduceOp {
    /// Combine two `f64` contributions.
    pub fn combine_f64(self, a: f64, b: f64) -> f64 {
        match self {
            ReduceOp::Sum => a + b,
            ReduceOp::Max => a.max(b),
            ReduceOp::AnyOr => {
                if a != 0.0 || b != 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Combine two `u64` contributions.
    pub fn combine_u64(self, a: u64, b: u64) -> u64 {
        match self {
            ReduceOp::Sum => a.saturating_add(b),
            ReduceOp::Max => a.max(b),
            ReduceOp::AnyOr => u64::from(a != 0 || b != 0),
        }
    }
}

/// Process identity and collectives of a single-program multiple-data run.
///
/// Every process must call the same collectives in the same order.
pub trait Collectives: Debug + Send + Sync {
    /// Zero-based identity of this process.
    fn process_id(&self) -> usize;

    /// Number of processes, at least one.
    fn num_processes(&self) -> usize;

    /// Overwrite `buf` on every process with the contents held by `root`.
    fn broadcast_bytes(&self, buf: &mut [u8], root: usize) -> Result<()>;

    /// Reduce `value` over all processes and return the result everywhere.
    fn allreduce_f64(&self, value: f64, op: ReduceOp) -> Result<f64>;

    /// Integer counterpart of [`Collectives::allreduce_f64`].
    fn allreduce_u64(&self, value: u64, op: ReduceOp) -> Result<u64>;

    /// Wait until every process has arrived.
    fn barrier(&self) -> Result<()>;
}

/// The trivial harness: one process.
#[derive(Copy, Clone, Debug, Default)]
pub struct SingleProcess;

impl SingleProcess {
    fn check_root(root: usize) -> Result<()> {
        if root == 0 {
            Ok(())
        } else {
            Err(Error::IndexOutOfBounds {
                index: root,
                size: 1,
            })
        }
    }
}

impl Collectives for SingleProcess {
    fn process_id(&self) -> usize {
        0
    }

    fn num_processes(&self) -> usize {
        1
    }

    fn broadcast_bytes(&self, _buf: &mut [u8], root: usize) -> Result<()> {
        Self::check_root(root)
    }

    fn allreduce_f64(&self, value: f64, _op: ReduceOp) -> Result<f64> {
        Ok(value)
    }

    fn allreduce_u64(&self, value: u64, _op: ReduceOp) -> Result<u64> {
        Ok(value)
    }

    fn barrier(&self) -> Result<()> {
        Ok(())
    }
}
