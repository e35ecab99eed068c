use std::time::Instant;

use ahash::RandomState;
use hashbrown::HashMap;
use tracing::debug;

use crate::config::{Discovery, MalformedPolicy, RunConfig};
use crate::error::{Error, Result};
use crate::parse::Records;
use crate::planner::align_to_record;
use crate::table::AggregateTable;

/// Dense key id, assigned in first-discovery order starting at 0.
pub type KeyId = u32;

/// Seeded key → id lookup. Read-only once discovery is done.
pub struct SymbolTable<'a> {
    ids: HashMap<&'a [u8], KeyId, RandomState>,
}

impl<'a> SymbolTable<'a> {
    pub fn with_seed(seed: u64) -> Self {
        let state = RandomState::with_seeds(
            seed,
            seed.rotate_left(16) ^ 0x243f_6a88_85a3_08d3,
            seed.rotate_left(32) ^ 0x1319_8a2e_0370_7344,
            !seed,
        );
        Self {
            ids: HashMap::with_hasher(state),
        }
    }

    #[inline]
    pub fn lookup(&self, key: &[u8]) -> Option<KeyId> {
        self.ids.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// id → key bytes of the first occurrence.
#[derive(Debug, Default, Clone)]
pub struct KeyRegistry<'a> {
    keys: Vec<&'a [u8]>,
}

impl<'a> KeyRegistry<'a> {
    pub fn key(&self, id: KeyId) -> Option<&'a [u8]> {
        self.keys.get(id as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Ids ordered by their key bytes. The registry itself is left untouched.
    pub fn sorted_ids(&self) -> Vec<KeyId> {
        let mut ids: Vec<KeyId> = (0..self.keys.len() as KeyId).collect();
        ids.sort_unstable_by(|&a, &b| self.keys[a as usize].cmp(self.keys[b as usize]));
        ids
    }
}

pub struct Interner<'a> {
    symbols: SymbolTable<'a>,
    registry: KeyRegistry<'a>,
    capacity: usize,
}

impl<'a> Interner<'a> {
    pub fn new(seed: u64, capacity: usize) -> Self {
        Self {
            symbols: SymbolTable::with_seed(seed),
            registry: KeyRegistry::default(),
            capacity,
        }
    }

    pub fn intern(&mut self, key: &'a [u8]) -> Result<KeyId> {
        if let Some(id) = self.symbols.lookup(key) {
            return Ok(id);
        }
        if self.registry.len() >= self.capacity {
            return Err(Error::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let id = self.registry.len() as KeyId;
        self.symbols.ids.insert(key, id);
        self.registry.keys.push(key);
        Ok(id)
    }

    pub fn finish(self) -> (SymbolTable<'a>, KeyRegistry<'a>) {
        (self.symbols, self.registry)
    }
}

/// Output of the sequential discovery pass.
pub struct Discovered<'a> {
    pub symbols: SymbolTable<'a>,
    pub registry: KeyRegistry<'a>,
    /// Aggregates of the records inside the prefix.
    pub prefix: AggregateTable,
    /// First byte not covered by the prefix; always a record start.
    pub prefix_end: usize,
    pub records: u64,
    pub malformed: u64,
}

/// Interns every key in the discovery prefix and aggregates the prefix
/// records. With [`Discovery::Full`] the remainder is swept for keys as well.
pub fn discover<'a>(bytes: &'a [u8], config: &RunConfig) -> Result<Discovered<'a>> {
    let start = Instant::now();
    let prefix_end = align_to_record(bytes, config.prefix_bytes);
    let mut interner = Interner::new(config.seed, config.capacity);
    let mut prefix = AggregateTable::new(config.capacity);
    let mut records = 0;
    let mut malformed = 0;

    for record in Records::new(&bytes[..prefix_end], 0) {
        match record {
            Ok(record) => {
                let id = interner.intern(record.key)?;
                prefix.observe(id, record.tenths)?;
                records += 1;
            }
            Err(err) if config.malformed == MalformedPolicy::Skip => {
                debug!(offset = err.offset, reason = %err.reason, "skipping malformed record");
                malformed += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }

    if config.discovery == Discovery::Full {
        // Malformed records are left for the workers to report.
        for record in Records::new(&bytes[prefix_end..], prefix_end).flatten() {
            interner.intern(record.key)?;
        }
    }

    let (symbols, registry) = interner.finish();
    debug!(
        prefix_end,
        keys = registry.len(),
        records,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "discovery finished"
    );
    Ok(Discovered {
        symbols,
        registry,
        prefix,
        prefix_end,
        records,
        malformed,
    })
}
