use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::{
    BlockedTime, BookableService, BookableStaff, DayOpeningHours, ExistingAppointment,
    StaffAbsence, StaffWorkingHours,
};

/// Salon booking configuration. Every field is concrete internally; callers
/// supply overrides through [`BookingRulesOverride`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRules {
    /// Rounding grid (minutes) for proposed slot start times.
    pub slot_granularity_minutes: i32,
    /// Minimum notice before the earliest bookable start.
    pub lead_time_minutes: i32,
    /// How many days ahead booking is allowed.
    pub horizon_days: i32,
    /// Padding enforced around existing appointments and between multiple
    /// services within one booking.
    pub buffer_between_minutes: i32,
    pub allow_multiple_services: bool,
    /// Pass-through for the checkout flow; never interpreted by the engine.
    pub require_deposit: bool,
    pub deposit_amount_cents: i64,
    /// Pass-through for the cancellation flow; never interpreted here.
    pub cancellation_deadline_hours: i32,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            slot_granularity_minutes: 15,
            lead_time_minutes: 60,
            horizon_days: 30,
            buffer_between_minutes: 0,
            allow_multiple_services: true,
            require_deposit: false,
            deposit_amount_cents: 0,
            cancellation_deadline_hours: 24,
        }
    }
}

impl BookingRules {
    /// Merge caller-supplied overrides over the documented defaults.
    pub fn with_overrides(overrides: BookingRulesOverride) -> Self {
        let defaults = Self::default();
        Self {
            slot_granularity_minutes: overrides
                .slot_granularity_minutes
                .unwrap_or(defaults.slot_granularity_minutes),
            lead_time_minutes: overrides
                .lead_time_minutes
                .unwrap_or(defaults.lead_time_minutes),
            horizon_days: overrides.horizon_days.unwrap_or(defaults.horizon_days),
            buffer_between_minutes: overrides
                .buffer_between_minutes
                .unwrap_or(defaults.buffer_between_minutes),
            allow_multiple_services: overrides
                .allow_multiple_services
                .unwrap_or(defaults.allow_multiple_services),
            require_deposit: overrides.require_deposit.unwrap_or(defaults.require_deposit),
            deposit_amount_cents: overrides
                .deposit_amount_cents
                .unwrap_or(defaults.deposit_amount_cents),
            cancellation_deadline_hours: overrides
                .cancellation_deadline_hours
                .unwrap_or(defaults.cancellation_deadline_hours),
        }
    }
}

/// Partial rule set merged over [`BookingRules::default`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingRulesOverride {
    pub slot_granularity_minutes: Option<i32>,
    pub lead_time_minutes: Option<i32>,
    pub horizon_days: Option<i32>,
    pub buffer_between_minutes: Option<i32>,
    pub allow_multiple_services: Option<bool>,
    pub require_deposit: Option<bool>,
    pub deposit_amount_cents: Option<i64>,
    pub cancellation_deadline_hours: Option<i32>,
}

/// A customer's availability request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotQuery {
    pub service_ids: Vec<Uuid>,
    pub date_range_start: DateTime<Utc>,
    pub date_range_end: DateTime<Utc>,
    /// Ordering preference only: a qualified preferred staff member is moved
    /// to the front of the roster, an unqualified one is ignored.
    pub preferred_staff_id: Option<Uuid>,
}

/// The pre-fetched schedule facts the engine computes against. The engine
/// performs no I/O; the caller loads this bundle from wherever it lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    pub services: Vec<BookableService>,
    pub opening_hours: Vec<DayOpeningHours>,
    pub staff: Vec<BookableStaff>,
    pub staff_working_hours: Vec<StaffWorkingHours>,
    pub staff_absences: Vec<StaffAbsence>,
    pub blocked_times: Vec<BlockedTime>,
    pub existing_appointments: Vec<ExistingAppointment>,
}

/// Half-open time range in salon-local time, the currency of the interval
/// algebra. Every interval kept during computation satisfies start < end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeInterval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Price/duration snapshot of one requested service, carried on every slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedServiceSnapshot {
    pub service_id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub price_cents: i64,
}

impl From<&BookableService> for BookedServiceSnapshot {
    fn from(service: &BookableService) -> Self {
        Self {
            service_id: service.id,
            name: service.name.clone(),
            duration_minutes: service.duration_minutes,
            price_cents: service.price_cents,
        }
    }
}

/// One bookable (staff, start time) candidate. A computation result, not a
/// stored entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableSlot {
    pub staff_id: Uuid,
    pub staff_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub services: Vec<BookedServiceSnapshot>,
}

/// Presentation grouping of sorted slots by salon-local calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsByDate {
    pub date: NaiveDate,
    pub display_date: String,
    pub slots: Vec<AvailableSlot>,
}

/// Caller contract violations. Legitimately empty results (no qualified
/// staff, fully blocked calendar, range outside the booking window) are
/// `Ok(vec![])`, never errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotEngineError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unknown service id: {0}")]
    UnknownService(Uuid),

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}
