//! Violation line ranges
//!
//! The engine may report a range with its bounds inverted, or with a missing
//! (zero or negative) begin line. Issues always span whole lines, so a
//! reported range is normalized to valid line bounds before an issue is
//! created.

use serde::Serialize;

/// A line range with `start_line <= end_line`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NormalizedRange {
    pub start_line: i64,
    pub end_line: i64,
}

/// Normalize an engine-reported line range.
///
/// The end line is the larger bound. The begin line is the smaller bound
/// when it is positive; otherwise the range collapses onto the end line.
pub fn normalize(begin_line: i64, end_line: i64) -> NormalizedRange {
    let end = begin_line.max(end_line);
    let min = begin_line.min(end_line);
    let start = if min > 0 { min } else { end };
    NormalizedRange {
        start_line: start,
        end_line: end,
    }
}
