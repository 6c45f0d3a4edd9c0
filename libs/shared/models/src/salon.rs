use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A service customers can book. Duration and price are reference data;
/// the booking write-path snapshots them at booking time, not the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookableService {
    pub id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub price_cents: i64,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookableStaff {
    pub id: Uuid,
    pub name: String,
    pub is_bookable: bool,
    /// Service ids this staff member is qualified to perform.
    pub service_ids: Vec<Uuid>,
}

impl BookableStaff {
    /// True when every requested service is in this staff member's skill set.
    pub fn can_perform_all(&self, requested: &[Uuid]) -> bool {
        requested.iter().all(|id| self.service_ids.contains(id))
    }
}

/// Salon opening hours for one weekday. A missing row or `is_closed = true`
/// means the salon produces no slots that day for anyone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayOpeningHours {
    pub day_of_week: i32, // 0 = Sunday, 1 = Monday, etc.
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub is_closed: bool,
}

/// Recurring weekly working hours for one staff member on one weekday.
/// No row for a weekday means the staff member does not work that day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffWorkingHours {
    pub staff_id: Uuid,
    pub day_of_week: i32, // 0 = Sunday, 1 = Monday, etc.
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Planned unavailability (vacation, sick leave) over an arbitrary range,
/// not bound to a weekday pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffAbsence {
    pub staff_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: Option<String>,
}

/// Ad-hoc unavailability window. `staff_id = None` is a salon-wide block
/// (holiday, renovation) applying to every staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedTime {
    pub staff_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Cancelled and no-show appointments free their time slot.
    pub fn occupies_time(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled | AppointmentStatus::NoShow)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::InProgress => write!(f, "in_progress"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::NoShow => write!(f, "no_show"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingAppointment {
    pub staff_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
}

/// Day-of-week numbering used by `DayOpeningHours` and `StaffWorkingHours`
/// rows (0 = Sunday, 1 = Monday, ..., 6 = Saturday).
pub fn day_of_week(date: NaiveDate) -> i32 {
    match date.weekday() {
        Weekday::Sun => 0,
        Weekday::Mon => 1,
        Weekday::Tue => 2,
        Weekday::Wed => 3,
        Weekday::Thu => 4,
        Weekday::Fri => 5,
        Weekday::Sat => 6,
    }
}

/// Monday-first weekday labels for settings-style display lists only.
/// Schedule matching always uses the Sunday-first `day_of_week` numbering.
pub const WEEKDAY_LABELS_MONDAY_FIRST: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];
