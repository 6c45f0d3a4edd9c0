//! Candidate slot enumeration inside a cleared interval.

use chrono::{Duration, NaiveDateTime, Timelike};

use crate::models::TimeInterval;

/// Enumerate candidate start times at the granularity grid. The first
/// candidate is the interval start rounded **up** to the next grid boundary
/// (never down, which would propose a start before the true earliest
/// availability); candidates are emitted while the whole booking still fits.
pub fn candidate_starts(
    interval: TimeInterval,
    granularity_minutes: i32,
    duration_minutes: i32,
) -> Vec<NaiveDateTime> {
    let step = Duration::minutes(granularity_minutes as i64);
    let duration = Duration::minutes(duration_minutes as i64);

    let mut start = round_up_to_grid(interval.start, granularity_minutes as i64);
    let mut starts = Vec::new();
    while start < interval.end && start + duration <= interval.end {
        starts.push(start);
        start += step;
    }
    starts
}

fn round_up_to_grid(instant: NaiveDateTime, granularity_minutes: i64) -> NaiveDateTime {
    let mut rounded = instant;
    let seconds = rounded.time().second() as i64;
    if seconds > 0 {
        rounded += Duration::seconds(60 - seconds);
    }
    let minute_of_day = rounded.time().hour() as i64 * 60 + rounded.time().minute() as i64;
    let remainder = minute_of_day % granularity_minutes;
    if remainder > 0 {
        rounded += Duration::minutes(granularity_minutes - remainder);
    }
    rounded
}
