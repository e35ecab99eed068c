use std::io::Write;
use std::iter;
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::buffer::MappedBuffer;
use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::format::render;
use crate::interner::{discover, Discovered, KeyId, KeyRegistry};
use crate::merge::merge;
use crate::planner::plan;
use crate::table::AggregateTable;
use crate::worker::{scan_chunk, WorkerOutcome};

/// Final, merged result of one run over a buffer.
#[derive(Debug)]
pub struct Aggregation<'a> {
    pub registry: KeyRegistry<'a>,
    /// Key ids in byte-lexicographic key order.
    pub order: Vec<KeyId>,
    pub table: AggregateTable,
    pub records: u64,
    pub malformed: u64,
}

impl Aggregation<'_> {
    pub fn render(&self) -> Vec<u8> {
        render(&self.registry, &self.order, &self.table)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub bytes: usize,
    pub keys: usize,
    pub records: u64,
    pub malformed: u64,
}

pub fn aggregate<'a>(bytes: &'a [u8], config: &RunConfig) -> Result<Aggregation<'a>> {
    config.validate()?;
    let started = Instant::now();

    let Discovered {
        symbols,
        registry,
        prefix,
        prefix_end,
        records: prefix_records,
        malformed: prefix_malformed,
    } = discover(bytes, config)?;
    let discovered_at = started.elapsed();

    let chunks = plan(bytes, prefix_end, config.workers);
    debug!(workers = config.workers, prefix_end, ?chunks, "planned chunks");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()?;
    let (order, outcomes) = pool.install(|| {
        rayon::join(
            || registry.sorted_ids(),
            || {
                chunks
                    .par_iter()
                    .map(|chunk| scan_chunk(bytes, chunk.clone(), &symbols, config))
                    .collect::<Result<Vec<WorkerOutcome>>>()
            },
        )
    });
    let outcomes = outcomes?;
    let scanned_at = started.elapsed();

    let table = merge(
        config.capacity,
        iter::once(&prefix).chain(outcomes.iter().map(|o| &o.table)),
    );
    let records = prefix_records + outcomes.iter().map(|o| o.records).sum::<u64>();
    let malformed = prefix_malformed + outcomes.iter().map(|o| o.malformed).sum::<u64>();

    if malformed > 0 {
        warn!(malformed, "skipped malformed records");
    }
    info!(
        bytes = bytes.len(),
        keys = registry.len(),
        records,
        discovery_ms = discovered_at.as_millis() as u64,
        scan_ms = (scanned_at - discovered_at).as_millis() as u64,
        merge_ms = (started.elapsed() - scanned_at).as_millis() as u64,
        "aggregation finished"
    );

    Ok(Aggregation {
        registry,
        order,
        table,
        records,
        malformed,
    })
}

/// Maps `path`, aggregates it and writes the rendered line to `sink` in one
/// write.
pub fn run_file(
    path: impl AsRef<Path>,
    config: &RunConfig,
    sink: &mut impl Write,
) -> Result<RunSummary> {
    let buffer = MappedBuffer::open(path)?;
    let aggregation = aggregate(&buffer, config)?;

    let mut out = aggregation.render();
    out.push(b'\n');
    sink.write_all(&out).map_err(Error::Output)?;
    sink.flush().map_err(Error::Output)?;

    Ok(RunSummary {
        bytes: buffer.len(),
        keys: aggregation.registry.len(),
        records: aggregation.records,
        malformed: aggregation.malformed,
    })
}
