use crate::range::{ByteRange, RangeDecision, resolve};
use pretty_assertions::assert_eq;

fn partial(start: u64, end: u64, size: u64) -> RangeDecision {
    RangeDecision::Partial(ByteRange { start, end }, size)
}

#[test]
fn absent_header_serves_full_object() {
    assert_eq!(resolve(1000, None), RangeDecision::Full(1000));
}

#[test]
fn empty_header_serves_full_object() {
    assert_eq!(resolve(1000, Some("")), RangeDecision::Full(1000));
    assert_eq!(resolve(1000, Some("   ")), RangeDecision::Full(1000));
}

#[test]
fn absent_header_on_empty_object_serves_full_object() {
    assert_eq!(resolve(0, None), RangeDecision::Full(0));
}

#[test]
fn bounded_range_within_object() {
    assert_eq!(resolve(1000, Some("bytes=0-499")), partial(0, 499, 1000));
    assert_eq!(resolve(1000, Some("bytes=500-999")), partial(500, 999, 1000));
}

#[test]
fn single_byte_range() {
    assert_eq!(resolve(1000, Some("bytes=42-42")), partial(42, 42, 1000));
}

#[test]
fn open_ended_range_runs_to_last_byte() {
    assert_eq!(resolve(1000, Some("bytes=200-")), partial(200, 999, 1000));
}

#[test]
fn end_past_object_is_clamped() {
    assert_eq!(resolve(1000, Some("bytes=900-5000")), partial(900, 999, 1000));
}

#[test]
fn suffix_range_maps_to_tail() {
    assert_eq!(resolve(1000, Some("bytes=-100")), partial(900, 999, 1000));
}

#[test]
fn suffix_equal_to_object_size_covers_whole_object() {
    assert_eq!(resolve(1000, Some("bytes=-1000")), partial(0, 999, 1000));
}

#[test]
fn suffix_longer_than_object_covers_whole_object() {
    assert_eq!(resolve(1000, Some("bytes=-5000")), partial(0, 999, 1000));
}

#[test]
fn suffix_of_zero_is_unsatisfiable() {
    assert_eq!(resolve(1000, Some("bytes=-0")), RangeDecision::Unsatisfiable);
}

#[test]
fn start_past_object_is_unsatisfiable() {
    assert_eq!(
        resolve(1000, Some("bytes=1000-1500")),
        RangeDecision::Unsatisfiable
    );
    assert_eq!(
        resolve(1000, Some("bytes=2000000-3000000")),
        RangeDecision::Unsatisfiable
    );
}

#[test]
fn any_range_on_empty_object_is_unsatisfiable() {
    assert_eq!(resolve(0, Some("bytes=0-0")), RangeDecision::Unsatisfiable);
    assert_eq!(resolve(0, Some("bytes=-1")), RangeDecision::Unsatisfiable);
}

#[test]
fn inverted_range_is_unsatisfiable() {
    assert_eq!(resolve(1000, Some("bytes=500-400")), RangeDecision::Unsatisfiable);
}

#[test]
fn malformed_headers_are_unsatisfiable() {
    for raw in [
        "bytes",
        "bytes=",
        "bytes=-",
        "bytes=abc-def",
        "bytes=10",
        "bytes=10-x",
        "items=0-10",
        "0-10",
    ] {
        assert_eq!(resolve(1000, Some(raw)), RangeDecision::Unsatisfiable, "{raw}");
    }
}

#[test]
fn multi_range_honors_first_range_only() {
    assert_eq!(
        resolve(1000, Some("bytes=0-99,200-299")),
        partial(0, 99, 1000)
    );
    assert_eq!(
        resolve(1000, Some("bytes=800-, 0-10")),
        partial(800, 999, 1000)
    );
}

#[test]
fn surrounding_whitespace_is_tolerated() {
    assert_eq!(resolve(1000, Some(" bytes=0-9 ")), partial(0, 9, 1000));
    assert_eq!(resolve(1000, Some("bytes= 0 - 9 ")), partial(0, 9, 1000));
}

#[test]
fn resolve_is_deterministic() {
    for raw in [None, Some("bytes=0-10"), Some("bytes=-5"), Some("junk")] {
        assert_eq!(resolve(1000, raw), resolve(1000, raw));
    }
}

#[test]
fn resolved_length_matches_bounds() {
    match resolve(1_000_000, Some("bytes=999999-2000000")) {
        RangeDecision::Partial(range, size) => {
            assert_eq!(range.start, 999_999);
            assert_eq!(range.end, 999_999);
            assert_eq!(range.len(), 1);
            assert_eq!(size, 1_000_000);
        }
        other => panic!("Expected Partial, got {other:?}"),
    }
}
