use std::fmt;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to map {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Malformed(#[from] MalformedRecord),

    #[error("more than {capacity} distinct keys")]
    CapacityExceeded { capacity: usize },

    #[error("unknown key {key:?} at byte {offset}: first seen after the discovery prefix")]
    UnknownKey { key: String, offset: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    MissingDelimiter,
    EmptyKey,
    InvalidValue,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MalformedReason::MissingDelimiter => "missing ';' delimiter",
            MalformedReason::EmptyKey => "empty key",
            MalformedReason::InvalidValue => "value is not of the form -?D(D).D",
        };
        f.write_str(text)
    }
}

/// A record that could not be parsed, located by the absolute byte offset of
/// its first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("malformed record at byte {offset}: {reason}")]
pub struct MalformedRecord {
    pub offset: usize,
    pub reason: MalformedReason,
}
