use crate::interner::{KeyId, KeyRegistry};
use crate::table::{AggregateRecord, AggregateTable};

/// Mean in tenths, rounded half away from zero.
pub fn mean_tenths(record: &AggregateRecord) -> i64 {
    if record.count == 0 {
        return 0;
    }
    let sum = record.sum as i128;
    let count = record.count as i128;
    let rounded = (2 * sum.abs() + count) / (2 * count);
    (if sum < 0 { -rounded } else { rounded }) as i64
}

/// Appends a tenths value with exactly one fractional digit. Zero is always
/// written as `0.0`.
pub fn write_tenths(out: &mut Vec<u8>, tenths: i64) {
    if tenths < 0 {
        out.push(b'-');
    }
    let magnitude = tenths.unsigned_abs();
    out.extend_from_slice((magnitude / 10).to_string().as_bytes());
    out.push(b'.');
    out.push(b'0' + (magnitude % 10) as u8);
}

/// Renders `{key=min/avg/max, ...}` in the given order. Keys without
/// observations are left out.
pub fn render(registry: &KeyRegistry<'_>, order: &[KeyId], table: &AggregateTable) -> Vec<u8> {
    let mut out = Vec::with_capacity(order.len() * 32 + 2);
    out.push(b'{');
    let mut first = true;
    for &id in order {
        let (Some(key), Some(record)) = (registry.key(id), table.get(id)) else {
            continue;
        };
        if record.count == 0 {
            continue;
        }
        if !first {
            out.extend_from_slice(b", ");
        }
        first = false;
        out.extend_from_slice(key);
        out.push(b'=');
        write_tenths(&mut out, record.min);
        out.push(b'/');
        write_tenths(&mut out, mean_tenths(record));
        out.push(b'/');
        write_tenths(&mut out, record.max);
    }
    out.push(b'}');
    out
}
