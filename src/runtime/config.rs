//! Execution context configuration

use crate::descriptor::IOMode;
use crate::error::{Error, Result};
use std::env;

/// Environment variable overriding [`Config::num_threads`].
pub const ENV_NUM_THREADS: &str = "SPARSERING_NUM_THREADS";
/// Environment variable overriding [`Config::parallel_min_len`].
pub const ENV_PARALLEL_MIN_LEN: &str = "SPARSERING_PARALLEL_MIN_LEN";

/// Configuration of a [`CpuClient`](super::CpuClient)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Worker threads of a dedicated pool; `None` uses the global pool
    pub num_threads: Option<usize>,
    /// Minimum number of work items per parallel task
    pub parallel_min_len: usize,
    /// Mode used by [`Launcher`](super::Launcher) when pinning results
    pub default_io_mode: IOMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_threads: None,
            parallel_min_len: 1024,
            default_io_mode: IOMode::Sequential,
        }
    }
}

impl Config {
    /// Defaults overridden by `SPARSERING_NUM_THREADS` and
    /// `SPARSERING_PARALLEL_MIN_LEN` when set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_NUM_THREADS) {
            config.num_threads = Some(parse_positive(ENV_NUM_THREADS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_PARALLEL_MIN_LEN) {
            config.parallel_min_len = parse_positive(ENV_PARALLEL_MIN_LEN, &raw)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Set the number of worker threads.
    pub fn with_num_threads(mut self, n: usize) -> Self {
        self.num_threads = Some(n);
        self
    }

    /// Set the parallel chunking threshold.
    pub fn with_parallel_min_len(mut self, n: usize) -> Self {
        self.parallel_min_len = n;
        self
    }

    /// Set the default I/O mode.
    pub fn with_io_mode(mut self, mode: IOMode) -> Self {
        self.default_io_mode = mode;
        self
    }

    /// ILLEGAL when a count is zero.
    pub fn validate(&self) -> Result<()> {
        if self.num_threads == Some(0) {
            return Err(Error::invalid_argument("num_threads", "must be positive"));
        }
        if self.parallel_min_len == 0 {
            return Err(Error::invalid_argument(
                "parallel_min_len",
                "must be positive",
            ));
        }
        Ok(())
    }
}

fn parse_positive(name: &'static str, raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(Error::invalid_argument(name, "must be positive")),
        Ok(n) => Ok(n),
        Err(e) => Err(Error::invalid_argument(name, format!("'{raw}': {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Rc;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.num_threads, None);
        assert_eq!(config.parallel_min_len, 1024);
        assert_eq!(config.default_io_mode, IOMode::Sequential);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup() {
        let config = Config::from_lookup(lookup(&[
            (ENV_NUM_THREADS, "3"),
            (ENV_PARALLEL_MIN_LEN, " 64 "),
        ]))
        .unwrap();
        assert_eq!(config.num_threads, Some(3));
        assert_eq!(config.parallel_min_len, 64);

        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_values_are_illegal() {
        let err = Config::from_lookup(lookup(&[(ENV_NUM_THREADS, "many")])).unwrap_err();
        assert_eq!(err.rc(), Rc::Illegal);
        let err = Config::from_lookup(lookup(&[(ENV_PARALLEL_MIN_LEN, "0")])).unwrap_err();
        assert_eq!(err.rc(), Rc::Illegal);
    }

    #[test]
    fn test_builders() {
        let config = Config::default()
            .with_num_threads(2)
            .with_parallel_min_len(8)
            .with_io_mode(IOMode::Parallel);
        assert_eq!(config.num_threads, Some(2));
        assert_eq!(config.parallel_min_len, 8);
        assert_eq!(config.default_io_mode, IOMode::Parallel);
        assert!(Config::default().with_num_threads(0).validate().is_err());
    }
}
