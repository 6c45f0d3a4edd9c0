//! Interval algebra primitives shared by the whole pipeline. Intervals are
//! small plain values; every operation rebuilds its result list instead of
//! mutating in place.

use crate::models::TimeInterval;

/// Pairwise overlap of two interval sets. A single working-hours row makes
/// this degenerate to simple clipping, but the general Cartesian form is
/// what the pipeline relies on.
pub fn intersect(a: &[TimeInterval], b: &[TimeInterval]) -> Vec<TimeInterval> {
    let mut result = Vec::new();
    for left in a {
        for right in b {
            let start = left.start.max(right.start);
            let end = left.end.min(right.end);
            if start < end {
                result.push(TimeInterval { start, end });
            }
        }
    }
    result
}

/// Remove every `to_remove` interval from `intervals`, splitting survivors
/// into before/after pieces as needed. Handles removals that fully cover,
/// are fully covered by, or partially overlap either edge of a target.
pub fn subtract(intervals: Vec<TimeInterval>, to_remove: &[TimeInterval]) -> Vec<TimeInterval> {
    let mut remaining = intervals;
    for removal in to_remove {
        let mut next = Vec::with_capacity(remaining.len() + 1);
        for interval in remaining {
            if !interval.overlaps(removal) {
                next.push(interval);
                continue;
            }
            if interval.start < removal.start {
                next.push(TimeInterval {
                    start: interval.start,
                    end: removal.start,
                });
            }
            if removal.end < interval.end {
                next.push(TimeInterval {
                    start: removal.end,
                    end: interval.end,
                });
            }
        }
        remaining = next;
    }
    remaining
}
