//! Execution context
//!
//! ```text
//! Launcher (runs one program in a fresh context)
//! └── CpuClient (parallelism + collectives; receiver of all kernel calls)
//!     ├── Config (threads, chunking, I/O mode)
//!     └── Collectives (process identity, broadcast, allreduce, barrier)
//! ```

mod collectives;
mod config;
pub mod cpu;
mod launcher;

pub use collectives::{Collectives, ReduceOp, SingleProcess};
pub use config::{Config, ENV_NUM_THREADS, ENV_PARALLEL_MIN_LEN};
pub use cpu::CpuClient;
pub use launcher::Launcher;
