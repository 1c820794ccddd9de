//! CPU client: the execution context kernels run in

use crate::container::{Matrix, Vector};
use crate::dtype::Element;
use crate::error::Result;
use crate::runtime::{Collectives, Config, SingleProcess};
use bytemuck::Pod;
use std::sync::Arc;

/// Execution context for kernel calls.
///
/// Owns the parallelism configuration and the harness collectives. Cloning
/// is cheap and yields a handle onto the same pool.
#[derive(Clone, Debug)]
pub struct CpuClient {
    config: Config,
    #[cfg(feature = "rayon")]
    pool: Option<Arc<rayon::ThreadPool>>,
    collectives: Arc<dyn Collectives>,
}

impl CpuClient {
    /// Create a single-process client.
    ///
    /// Builds a dedicated thread pool when `config.num_threads` is set; a
    /// pool that cannot be built is reported as UNSUPPORTED.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_collectives(config, Arc::new(SingleProcess))
    }

    /// Create a client whose collectives come from a harness.
    pub fn with_collectives(config: Config, collectives: Arc<dyn Collectives>) -> Result<Self> {
        config.validate()?;
        #[cfg(feature = "rayon")]
        let pool = match config.num_threads {
            Some(n) => Some(Arc::new(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| crate::error::Error::unsupported(format!("thread pool: {e}")))?,
            )),
            None => None,
        };
        tracing::debug!(
            num_threads = ?config.num_threads,
            parallel_min_len = config.parallel_min_len,
            process = collectives.process_id(),
            processes = collectives.num_processes(),
            "cpu client created"
        );
        Ok(Self {
            config,
            #[cfg(feature = "rayon")]
            pool,
            collectives,
        })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Harness collectives.
    pub fn collectives(&self) -> &dyn Collectives {
        self.collectives.as_ref()
    }

    /// Minimum number of items per parallel task.
    #[inline]
    pub fn rayon_min_len(&self) -> usize {
        self.config.parallel_min_len
    }

    /// Number of worker threads kernels may use.
    pub fn num_threads(&self) -> usize {
        #[cfg(feature = "rayon")]
        {
            match &self.pool {
                Some(pool) => pool.current_num_threads(),
                None => rayon::current_num_threads(),
            }
        }
        #[cfg(not(feature = "rayon"))]
        {
            1
        }
    }

    /// Run `f` inside the configured pool.
    pub fn install_parallelism<R, F>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        #[cfg(feature = "rayon")]
        if let Some(pool) = &self.pool {
            return pool.install(f);
        }
        f()
    }

    /// True when a loop over `len` items is worth splitting.
    #[inline]
    pub(crate) fn parallel_for(&self, len: usize) -> bool {
        cfg!(feature = "rayon") && len >= 2 * self.config.parallel_min_len
    }

    /// Broadcast a plain-old-data value from process `root`.
    pub fn broadcast<T: Pod>(&self, value: &mut T, root: usize) -> Result<()> {
        self.collectives
            .broadcast_bytes(bytemuck::bytes_of_mut(value), root)
    }

    /// Drain pending work on `x`. Kernels complete before returning, so
    /// this only checks that the vector is readable.
    pub fn wait<T: Element>(&self, x: &Vector<T>) -> Result<()> {
        let _ = x.nonzeroes();
        Ok(())
    }

    /// Matrix counterpart of [`CpuClient::wait`].
    pub fn wait_matrix<T: Element>(&self, a: &Matrix<T>) -> Result<()> {
        let _ = a.nonzeroes();
        Ok(())
    }
}
