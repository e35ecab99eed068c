use crate::table::AggregateTable;

/// Folds every table into one. Order does not affect the result.
pub fn merge<'t>(
    capacity: usize,
    tables: impl IntoIterator<Item = &'t AggregateTable>,
) -> AggregateTable {
    tables
        .into_iter()
        .fold(AggregateTable::new(capacity), |mut acc, table| {
            acc.merge_from(table);
            acc
        })
}
