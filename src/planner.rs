use std::ops::Range;

use memchr::memchr;

/// Moves `offset` forward to the start of the next record. Offsets that
/// already sit on a record start are returned unchanged.
#[inline]
pub fn align_to_record(bytes: &[u8], offset: usize) -> usize {
    if offset == 0 {
        return 0;
    }
    if offset >= bytes.len() {
        return bytes.len();
    }
    if bytes[offset - 1] == b'\n' {
        return offset;
    }
    memchr(b'\n', &bytes[offset..])
        .map(|x| offset + x + 1)
        .unwrap_or(bytes.len())
}

/// Splits `bytes[start..]` into `workers` record-aligned ranges. Ranges are
/// contiguous, may be empty, and the last one ends at `bytes.len()`.
pub fn plan(bytes: &[u8], start: usize, workers: usize) -> Vec<Range<usize>> {
    let start = align_to_record(bytes, start);
    let len = bytes.len() - start;
    let workers = workers.max(1);

    let mut bounds = Vec::with_capacity(workers + 1);
    bounds.push(start);
    for i in 1..workers {
        let candidate = start + i * len / workers;
        let prev = bounds[bounds.len() - 1];
        bounds.push(align_to_record(bytes, candidate).max(prev));
    }
    bounds.push(bytes.len());

    bounds.windows(2).map(|w| w[0]..w[1]).collect()
}
