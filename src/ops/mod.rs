//! Sparse linear algebra primitives
//!
//! Operations are defined as traits implemented by the runtime client, so a
//! call reads `client.mxv(&mut y, &a, &x, ring, desc, phase)`.
//!
//! ```text
//! CpuClient
//!   ├── Level1Ops   set, fold, eWiseApply, eWiseMul, eWiseAdd, dot
//!   ├── Level2Ops   mxv, vxm
//!   └── Level3Ops   mxm, eWiseApply, triu, outer, set, fold
//! ```
//!
//! # Return codes
//!
//! Every operation returns a [`Result`](crate::error::Result); the return
//! code is [`Error::rc`](crate::error::Error::rc) of the error, or SUCCESS.
//! Argument checks run before any output is touched, so a failing call
//! leaves its output as it was. Failures are also logged at `warn` level
//! under the `primitive` field.
//!
//! # Algebra
//!
//! The operator, monoid, or semiring is passed by value; they are
//! zero-sized. Stored values are cast into the algebra's domains, and
//! pattern (`()`) entries take the value one of the relevant domain.

mod cpu;
mod traits;

pub use traits::{Level1Ops, Level2Ops, Level3Ops};
