use std::ops::Range;

use tracing::debug;

use crate::config::{MalformedPolicy, RunConfig};
use crate::error::{Error, Result};
use crate::interner::SymbolTable;
use crate::parse::Records;
use crate::table::AggregateTable;

#[derive(Debug)]
pub struct WorkerOutcome {
    pub table: AggregateTable,
    pub records: u64,
    pub malformed: u64,
}

/// Aggregates one record-aligned chunk into a private table.
pub fn scan_chunk(
    bytes: &[u8],
    chunk: Range<usize>,
    symbols: &SymbolTable<'_>,
    config: &RunConfig,
) -> Result<WorkerOutcome> {
    let base = chunk.start;
    let span = bytes
        .get(chunk.clone())
        .ok_or_else(|| Error::Config(format!("chunk {chunk:?} is outside the buffer")))?;
    let mut table = AggregateTable::new(config.capacity);
    let mut records = 0;
    let mut malformed = 0;

    for record in Records::new(span, base) {
        let record = match record {
            Ok(record) => record,
            Err(_) if config.malformed == MalformedPolicy::Skip => {
                malformed += 1;
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        let Some(id) = symbols.lookup(record.key) else {
            return Err(Error::UnknownKey {
                key: String::from_utf8_lossy(record.key).into_owned(),
                offset: record.offset,
            });
        };
        table.observe(id, record.tenths)?;
        records += 1;
    }

    debug!(start = chunk.start, end = chunk.end, records, malformed, "chunk scanned");
    Ok(WorkerOutcome {
        table,
        records,
        malformed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interner::Interner;

    fn symbols<'a>(keys: &[&'a [u8]]) -> SymbolTable<'a> {
        let mut interner = Interner::new(3, 8);
        for &key in keys {
            interner.intern(key).unwrap();
        }
        interner.finish().0
    }

    #[test]
    fn aggregates_chunk() {
        let bytes = b"X;9.9\nA;1.0\nB;-2.5\nA;3.0\n";
        let symbols = symbols(&[b"A", b"B"]);
        let config = RunConfig::default().with_capacity(8);
        let outcome = scan_chunk(bytes, 6..bytes.len(), &symbols, &config).unwrap();
        assert_eq!(outcome.records, 3);
        let a = outcome.table.get(0).unwrap();
        assert_eq!((a.count, a.min, a.max, a.sum), (2, 10, 30, 40));
        let b = outcome.table.get(1).unwrap();
        assert_eq!((b.count, b.min, b.max, b.sum), (1, -25, -25, -25));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let bytes = b"A;1.0\nZ;2.0\n";
        let symbols = symbols(&[b"A"]);
        let config = RunConfig::default().with_capacity(8);
        match scan_chunk(bytes, 0..bytes.len(), &symbols, &config) {
            Err(Error::UnknownKey { key, offset }) => {
                assert_eq!(key, "Z");
                assert_eq!(offset, 6);
            }
            other => panic!("expected unknown key, got {other:?}"),
        }
    }

    #[test]
    fn malformed_policy() {
        let bytes = b"A;1.0\nA;1.00\nA;2.0\n";
        let symbols = symbols(&[b"A"]);
        let abort = RunConfig::default().with_capacity(8);
        assert!(matches!(
            scan_chunk(bytes, 0..bytes.len(), &symbols, &abort),
            Err(Error::Malformed(m)) if m.offset == 6
        ));

        let skip = abort.with_malformed(MalformedPolicy::Skip);
        let outcome = scan_chunk(bytes, 0..bytes.len(), &symbols, &skip).unwrap();
        assert_eq!(outcome.malformed, 1);
        assert_eq!(outcome.table.get(0).unwrap().count, 2);
    }
}
