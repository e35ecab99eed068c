use crate::error::{Error, Result};

pub const DEFAULT_PREFIX_BYTES: usize = 16 * 1024 * 1024;
pub const DEFAULT_CAPACITY: usize = 10_000;

/// How keys are discovered before the parallel scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discovery {
    /// Intern keys seen in the discovery prefix only. A key first seen later
    /// is rejected with [`Error::UnknownKey`].
    Prefix,
    /// Intern the prefix, then sweep the rest of the buffer for keys before
    /// the workers start.
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedPolicy {
    Abort,
    Skip,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub workers: usize,
    /// Length of the discovery prefix before record alignment.
    pub prefix_bytes: usize,
    pub discovery: Discovery,
    pub capacity: usize,
    pub seed: u64,
    pub malformed: MalformedPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(usize::from)
            .unwrap_or(1);
        Self {
            workers,
            prefix_bytes: DEFAULT_PREFIX_BYTES,
            discovery: Discovery::Prefix,
            capacity: DEFAULT_CAPACITY,
            seed: fastrand::u64(..),
            malformed: MalformedPolicy::Abort,
        }
    }
}

impl RunConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_prefix_bytes(mut self, prefix_bytes: usize) -> Self {
        self.prefix_bytes = prefix_bytes;
        self
    }

    pub fn with_discovery(mut self, discovery: Discovery) -> Self {
        self.discovery = discovery;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_malformed(mut self, malformed: MalformedPolicy) -> Self {
        self.malformed = malformed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::Config("worker count must be at least 1".into()));
        }
        if self.capacity == 0 {
            return Err(Error::Config("key capacity must be at least 1".into()));
        }
        if self.prefix_bytes == 0 {
            return Err(Error::Config("discovery prefix must be non-empty".into()));
        }
        Ok(())
    }
}
