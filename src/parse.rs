use memchr::memchr;

use crate::error::{MalformedReason, MalformedRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub key: &'a [u8],
    /// Value scaled by ten.
    pub tenths: i64,
    /// Absolute offset of the record's first byte.
    pub offset: usize,
}

/// Parses `-?D.D` or `-?DD.D` into tenths. Any other shape is rejected.
#[inline]
pub fn parse_tenths(bytes: &[u8]) -> Option<i64> {
    let (negative, digits) = match bytes {
        [b'-', rest @ ..] => (true, rest),
        _ => (false, bytes),
    };
    let magnitude = match *digits {
        [a, b'.', c] => digit(a)? * 10 + digit(c)?,
        [a, b, b'.', c] => digit(a)? * 100 + digit(b)? * 10 + digit(c)?,
        _ => return None,
    };
    Some(if negative { -magnitude } else { magnitude })
}

#[inline]
fn digit(b: u8) -> Option<i64> {
    b.is_ascii_digit().then(|| (b - b'0') as i64)
}

/// Iterates the records of one record-aligned span. `base` is the span's
/// offset in the whole buffer and is only used for reporting.
pub struct Records<'a> {
    bytes: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> Records<'a> {
    pub fn new(bytes: &'a [u8], base: usize) -> Self {
        Self { bytes, pos: 0, base }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<Record<'a>, MalformedRecord>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.bytes.len() {
            return None;
        }
        let start = self.pos;
        let rest = &self.bytes[start..];
        let line = match memchr(b'\n', rest) {
            Some(end) => {
                self.pos = start + end + 1;
                &rest[..end]
            }
            None => {
                self.pos = self.bytes.len();
                rest
            }
        };
        let offset = self.base + start;
        let malformed = |reason| Some(Err(MalformedRecord { offset, reason }));

        let Some(semicolon) = memchr(b';', line) else {
            return malformed(MalformedReason::MissingDelimiter);
        };
        if semicolon == 0 {
            return malformed(MalformedReason::EmptyKey);
        }
        let Some(tenths) = parse_tenths(&line[semicolon + 1..]) else {
            return malformed(MalformedReason::InvalidValue);
        };
        Some(Ok(Record {
            key: &line[..semicolon],
            tenths,
            offset,
        }))
    }
}
