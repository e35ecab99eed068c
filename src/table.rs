use crate::error::{Error, Result};
use crate::interner::KeyId;

/// Running statistics for one key, in tenths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateRecord {
    pub count: i64,
    pub min: i64,
    pub max: i64,
    pub sum: i64,
}

impl AggregateRecord {
    #[inline]
    pub fn observe(&mut self, tenths: i64) {
        if self.count == 0 {
            *self = AggregateRecord {
                count: 1,
                min: tenths,
                max: tenths,
                sum: tenths,
            };
            return;
        }
        self.count += 1;
        self.sum += tenths;
        if tenths < self.min {
            self.min = tenths;
        }
        if tenths > self.max {
            self.max = tenths;
        }
    }

    #[inline]
    pub fn merge(&mut self, other: &AggregateRecord) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        self.count += other.count;
        self.sum += other.sum;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }
}

/// Fixed-capacity array of aggregates indexed by interned key id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateTable {
    slots: Vec<AggregateRecord>,
}

impl AggregateTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![AggregateRecord::default(); capacity],
        }
    }

    #[inline]
    pub fn observe(&mut self, id: KeyId, tenths: i64) -> Result<()> {
        let capacity = self.slots.len();
        self.slots
            .get_mut(id as usize)
            .ok_or_else(|| Error::CapacityExceeded { capacity })?
            .observe(tenths);
        Ok(())
    }

    pub fn get(&self, id: KeyId) -> Option<&AggregateRecord> {
        self.slots.get(id as usize)
    }

    pub fn merge_from(&mut self, other: &AggregateTable) {
        for (slot, theirs) in self.slots.iter_mut().zip(&other.slots) {
            slot.merge(theirs);
        }
    }
}
