//! CPU runtime
//!
//! Kernels run on the calling thread or, with the `rayon` feature, fork-join
//! across a thread pool. Every call is externally synchronous: when it
//! returns, all its writes are visible.

mod client;
pub(crate) mod kernels;

pub use client::CpuClient;
