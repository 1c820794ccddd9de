//! # sparsering
//!
//! **Sparse linear algebra over arbitrary semirings, in the GraphBLAS style.**
//!
//! sparsering provides sparse vectors and matrices together with the
//! primitives graph and linear-algebra algorithms are written in: element-wise
//! operations, folds, dot products, sparse matrix-vector and matrix-matrix
//! products. Every primitive is generic over the algebra it computes in, so
//! the same `vxm` runs a PageRank step under plus-times and a shortest-path
//! relaxation under min-plus.
//!
//! ## Pieces
//!
//! - **Algebra**: operators, monoids and semirings as zero-sized types
//! - **Containers**: [`Vector`](container::Vector) on a sparse coordinate
//!   engine, [`Matrix`](container::Matrix) held in paired CRS and CCS form
//! - **Descriptors**: a bitset that transposes, masks, or relaxes a call
//! - **Two-phase execution**: RESIZE reserves output capacity, EXECUTE
//!   computes within it
//! - **Return codes**: every failure maps onto one [`Rc`](error::Rc)
//!
//! ## Quick Start
//!
//! ```
//! use sparsering::prelude::*;
//!
//! # fn main() -> sparsering::error::Result<()> {
//! let client = CpuClient::new(Config::default())?;
//!
//! let mut a = Matrix::<f64>::new(3, 3);
//! a.build_matrix_unique(vec![(0, 0, 1.0), (1, 1, 1.0), (2, 2, 1.0)], IOMode::Sequential)?;
//! let x = Vector::from_dense(&[1.0, 2.0, 3.0]);
//! let mut y = Vector::<f64>::new(3);
//!
//! client.mxv(&mut y, &a, &x, PlusTimes::<f64>::new(), Descriptor::NO_OPERATION, Phase::Execute)?;
//! assert_eq!(y.to_sorted_vec(), vec![(0, 1.0), (1, 2.0), (2, 3.0)]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): multi-threaded kernels
//! - `f16`: half-precision element types (F16, BF16)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod algebra;
pub mod container;
pub mod descriptor;
pub mod dtype;
pub mod error;
pub mod ops;
pub mod runtime;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algebra::semirings::*;
    pub use crate::algebra::{Monoid, MonoidOf, Operator, Semiring, SemiringOf};
    pub use crate::container::{Matrix, PinnedVector, Vector};
    pub use crate::descriptor::{Descriptor, IOMode, Phase};
    pub use crate::dtype::{DType, Element};
    pub use crate::error::{Error, Rc, Result};
    pub use crate::ops::{Level1Ops, Level2Ops, Level3Ops};
    pub use crate::runtime::{Config, CpuClient, Launcher};
}
