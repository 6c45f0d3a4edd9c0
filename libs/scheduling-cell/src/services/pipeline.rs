//! Per-day constraint pipeline: booking window gate plus the ordered
//! composition that turns opening hours, working hours, absences, blocks
//! and existing appointments into cleared bookable intervals.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use shared_models::{DayOpeningHours, StaffWorkingHours};

use crate::models::{BookingRules, TimeInterval};
use crate::services::intervals;

/// Cheap pre-filter: a day is considered at all only when its end is still
/// reachable after the lead time and its start is inside the horizon.
pub fn within_booking_window(
    date: NaiveDate,
    now_local: NaiveDateTime,
    rules: &BookingRules,
) -> bool {
    let start_of_day = date.and_hms_opt(0, 0, 0).unwrap();
    let end_of_day = date.and_hms_opt(23, 59, 59).unwrap();

    let earliest_bookable = now_local + Duration::minutes(rules.lead_time_minutes as i64);
    let horizon_limit = now_local.date().and_hms_opt(0, 0, 0).unwrap()
        + Duration::days(rules.horizon_days as i64);

    end_of_day >= earliest_bookable && start_of_day <= horizon_limit
}

/// Everything the pipeline needs to know about one staff member on one day.
/// Absence, block and appointment intervals are salon-local; the appointment
/// intervals are raw occupied time, the buffer is applied here.
pub struct StaffDaySchedule<'a> {
    pub opening: Option<&'a DayOpeningHours>,
    pub working: Option<&'a StaffWorkingHours>,
    pub absences: &'a [TimeInterval],
    pub blocks: &'a [TimeInterval],
    pub appointments: &'a [TimeInterval],
}

/// Compute the cleared intervals able to host a booking of
/// `required_minutes` for one staff member on one day.
pub fn open_intervals(
    date: NaiveDate,
    schedule: &StaffDaySchedule<'_>,
    rules: &BookingRules,
    now_local: NaiveDateTime,
    required_minutes: i32,
) -> Vec<TimeInterval> {
    // 1. Salon opening hours; closed or missing row short-circuits the day.
    let opening = match schedule.opening {
        Some(row) if !row.is_closed => row,
        _ => return Vec::new(),
    };
    let salon_window = match TimeInterval::new(
        date.and_time(opening.open_time),
        date.and_time(opening.close_time),
    ) {
        Some(interval) => interval,
        None => return Vec::new(),
    };

    // 2. Intersect with the staff member's working hours; no row means the
    //    staff member is off that day.
    let working = match schedule.working {
        Some(row) => row,
        None => return Vec::new(),
    };
    let staff_window = match TimeInterval::new(
        date.and_time(working.start_time),
        date.and_time(working.end_time),
    ) {
        Some(interval) => interval,
        None => return Vec::new(),
    };
    let mut open = intervals::intersect(&[salon_window], &[staff_window]);

    let day = TimeInterval {
        start: date.and_hms_opt(0, 0, 0).unwrap(),
        end: date.and_hms_opt(0, 0, 0).unwrap() + Duration::days(1),
    };

    // 3. Subtract absences, clipped to the day boundary.
    open = intervals::subtract(open, &intervals::intersect(schedule.absences, &[day]));

    // 4. Subtract blocked times (staff-specific and salon-wide alike).
    open = intervals::subtract(open, &intervals::intersect(schedule.blocks, &[day]));

    // 5. Subtract existing appointments expanded by the buffer on both
    //    sides, so adjacent bookings keep their spacing.
    let buffer = Duration::minutes(rules.buffer_between_minutes as i64);
    let occupied: Vec<TimeInterval> = schedule
        .appointments
        .iter()
        .map(|appointment| TimeInterval {
            start: appointment.start - buffer,
            end: appointment.end + buffer,
        })
        .collect();
    open = intervals::subtract(open, &occupied);

    // 6. Today only: clip interval starts forward to now + lead time.
    if date == now_local.date() {
        let earliest = now_local + Duration::minutes(rules.lead_time_minutes as i64);
        open = open
            .into_iter()
            .filter_map(|interval| TimeInterval::new(interval.start.max(earliest), interval.end))
            .collect();
    }

    // 7. Drop intervals too short to host the booking.
    open.retain(|interval| interval.duration_minutes() >= required_minutes as i64);
    open
}
