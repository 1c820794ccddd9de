//! CPU implementation of the primitives.
//!
//! Each operation type has its own module. Public trait methods validate
//! their arguments, dispatch on the phase, and report failures through
//! `log_failure`; the numeric work lives in `runtime::cpu::kernels`.

mod common;
mod level1;
mod level2;
mod level3;
