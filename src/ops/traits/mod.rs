//! Operation traits.
//!
//! This module contains the trait definitions for the level-1, level-2
//! and level-3 primitives. Implementations live in the backend module
//! (`cpu/`).

mod level1;
mod level2;
mod level3;

pub use level1::Level1Ops;
pub use level2::Level2Ops;
pub use level3::Level3Ops;
