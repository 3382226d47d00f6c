//! Byte-range negotiation for a single object of known size.
//!
//! Only single-range requests are supported. A multi-range request
//! (`bytes=0-99,200-299`) is honored for its FIRST range only; multipart
//! responses are out of scope.

#[cfg(test)]
mod tests;

/// An inclusive byte span within an object, zero-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64, // inclusive
}

impl ByteRange {
    /// Number of bytes covered. Never zero: `start <= end` holds by
    /// construction.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Outcome of range negotiation for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeDecision {
    /// No range requested: serve the entire object.
    Full(u64),
    /// A satisfiable single range: serve the slice, report the total size.
    Partial(ByteRange, u64),
    /// Malformed header, start past the last byte, or empty object.
    Unsatisfiable,
}

/// Resolve an optional raw `Range` header value against the object size.
///
/// Pure and deterministic; no I/O. Follows RFC 9110 single-range semantics:
/// `bytes=<start>-<end>`, `bytes=<start>-` (to end of object) and
/// `bytes=-<n>` (last `n` bytes). An `end` past the last byte is clamped
/// rather than rejected.
pub fn resolve(total_size: u64, raw: Option<&str>) -> RangeDecision {
    let raw = match raw.map(str::trim) {
        None | Some("") => return RangeDecision::Full(total_size),
        Some(r) => r,
    };

    match parse_single_range(raw, total_size) {
        Some(range) => RangeDecision::Partial(range, total_size),
        None => RangeDecision::Unsatisfiable,
    }
}

fn parse_single_range(header: &str, size: u64) -> Option<ByteRange> {
    let ranges = header.strip_prefix("bytes=")?;

    // Multi-range requests degrade to their first range.
    let first = ranges.split(',').next()?.trim();

    if size == 0 {
        return None;
    }

    let (start_part, end_part) = first.split_once('-')?;
    let start_part = start_part.trim();
    let end_part = end_part.trim();

    if start_part.is_empty() {
        // Suffix form: the last `n` bytes of the object.
        let n = end_part.parse::<u64>().ok()?;
        if n == 0 {
            return None;
        }
        let n = n.min(size);
        return Some(ByteRange {
            start: size - n,
            end: size - 1,
        });
    }

    let start = start_part.parse::<u64>().ok()?;
    if start > size - 1 {
        return None;
    }

    let end = if end_part.is_empty() {
        size - 1
    } else {
        end_part.parse::<u64>().ok()?.min(size - 1)
    };

    if start > end {
        return None;
    }

    Some(ByteRange { start, end })
}
