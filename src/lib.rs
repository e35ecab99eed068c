pub mod buffer;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod interner;
pub mod merge;
pub mod parse;
pub mod planner;
pub mod table;
pub mod worker;

pub use buffer::MappedBuffer;
pub use config::{Discovery, MalformedPolicy, RunConfig};
pub use engine::{aggregate, run_file, Aggregation, RunSummary};
pub use error::{Error, MalformedReason, MalformedRecord, Result};
