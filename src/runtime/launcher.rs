//! Program launcher
//!
//! A launcher runs a program in a fresh execution context: it creates the
//! client, broadcasts the program input from process 0, runs the program,
//! and tears the context down. Results that must outlive the context are
//! returned as [`PinnedVector`](crate::container::PinnedVector)s or plain
//! values.

use super::{Collectives, Config, CpuClient, SingleProcess};
use crate::error::{Result, log_failure};
use bytemuck::Pod;
use std::sync::Arc;

/// Runs programs in their own execution context.
#[derive(Clone, Debug)]
pub struct Launcher {
    config: Config,
    collectives: Arc<dyn Collectives>,
}

impl Default for Launcher {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Launcher {
    /// Single-process launcher.
    pub fn new(config: Config) -> Self {
        Self::with_collectives(config, Arc::new(SingleProcess))
    }

    /// Launcher over harness-provided collectives.
    pub fn with_collectives(config: Config, collectives: Arc<dyn Collectives>) -> Self {
        Self {
            config,
            collectives,
        }
    }

    /// Run `program` on `input` and return its output.
    ///
    /// Process 0's `input` is broadcast to every process before the program
    /// starts. The client is dropped before this returns.
    ///
    /// ```
    /// use sparsering::container::Vector;
    /// use sparsering::runtime::Launcher;
    ///
    /// let pinned = Launcher::default().exec(4u64, |client, &n| {
    ///     let x = Vector::from_dense(&vec![1.0f64; n as usize]);
    ///     Ok(x.pin(client.config().default_io_mode))
    /// })?;
    /// assert_eq!(pinned.nonzeroes(), 4);
    /// # Ok::<(), sparsering::error::Error>(())
    /// ```
    pub fn exec<T, U, F>(&self, input: T, program: F) -> Result<U>
    where
        T: Pod,
        F: FnOnce(&CpuClient, &T) -> Result<U>,
    {
        let result = self.run(input, program);
        if let Err(e) = &result {
            log_failure("exec", e);
        }
        result
    }

    fn run<T, U, F>(&self, mut input: T, program: F) -> Result<U>
    where
        T: Pod,
        F: FnOnce(&CpuClient, &T) -> Result<U>,
    {
        let client = CpuClient::with_collectives(self.config.clone(), Arc::clone(&self.collectives))?;
        client.broadcast(&mut input, 0)?;
        tracing::debug!(
            process = client.collectives().process_id(),
            "launcher entering program"
        );
        let output = program(&client, &input)?;
        client.collectives().barrier()?;
        drop(client);
        tracing::debug!("launcher context torn down");
        Ok(output)
    }
}
