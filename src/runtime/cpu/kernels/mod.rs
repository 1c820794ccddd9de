//! CPU kernel implementations
//!
//! Low-level compute kernels behind the level-1/2/3 operations. Kernels
//! are generic over the element types and the algebra; they validate
//! nothing and never touch the return-code machinery, which lives in
//! `ops::cpu`.

pub(crate) mod merge;
pub(crate) mod reduce;
pub(crate) mod scatter;
pub(crate) mod spgemm;
pub(crate) mod spmv;
