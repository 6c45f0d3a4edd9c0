//! The slot engine entry point: validates the request, walks the requested
//! date range per qualified staff member and assembles the sorted,
//! date-groupable slot list. Pure with respect to its inputs plus the
//! injected `now` instant; performs no I/O.

use std::collections::HashMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::debug;
use uuid::Uuid;

use shared_models::day_of_week;

use crate::models::{
    AvailableSlot, BookedServiceSnapshot, BookingRules, BookingRulesOverride, ScheduleSnapshot,
    SlotEngineError, SlotQuery, SlotsByDate, TimeInterval,
};
use crate::services::pipeline::{self, StaffDaySchedule};
use crate::services::{qualification, slots};

pub struct SlotEngine {
    rules: BookingRules,
    /// All day-boundary math runs in the salon's local time; inputs and
    /// `now` are normalized into this offset, slot instants are converted
    /// back to UTC on output.
    salon_offset: FixedOffset,
}

impl SlotEngine {
    pub fn new(rules: BookingRules, salon_offset: FixedOffset) -> Self {
        Self {
            rules,
            salon_offset,
        }
    }

    /// Merge caller overrides over the documented rule defaults.
    pub fn with_overrides(overrides: BookingRulesOverride, salon_offset: FixedOffset) -> Self {
        Self::new(BookingRules::with_overrides(overrides), salon_offset)
    }

    pub fn rules(&self) -> &BookingRules {
        &self.rules
    }

    /// Compute every bookable (staff, start time) slot for the request,
    /// sorted ascending by start time with staff name as tie-break.
    pub fn available_slots(
        &self,
        query: &SlotQuery,
        snapshot: &ScheduleSnapshot,
        now: DateTime<Utc>,
    ) -> Result<Vec<AvailableSlot>, SlotEngineError> {
        self.validate_rules()?;

        if query.date_range_start > query.date_range_end {
            return Err(SlotEngineError::InvalidDateRange {
                start: query.date_range_start,
                end: query.date_range_end,
            });
        }

        // An empty selection is an ordinary negative result.
        if query.service_ids.is_empty() {
            return Ok(Vec::new());
        }
        if !self.rules.allow_multiple_services && query.service_ids.len() > 1 {
            return Err(SlotEngineError::ValidationError(
                "multiple services requested but booking rules allow only one".to_string(),
            ));
        }

        let services = qualification::resolve_services(&query.service_ids, &snapshot.services)?;
        if let Some(service) = services.iter().find(|s| s.duration_minutes <= 0) {
            return Err(SlotEngineError::ValidationError(format!(
                "service {} has non-positive duration {}",
                service.id, service.duration_minutes
            )));
        }
        let total_minutes = qualification::total_duration_minutes(&services, &self.rules);
        let service_snapshots: Vec<BookedServiceSnapshot> = services
            .iter()
            .map(|service| BookedServiceSnapshot::from(*service))
            .collect();

        let staff = qualification::qualified_staff(
            &snapshot.staff,
            &query.service_ids,
            query.preferred_staff_id,
        );
        if staff.is_empty() {
            debug!("no qualified staff for requested services, returning no slots");
            return Ok(Vec::new());
        }

        let now_local = self.to_local(now);
        let range_start = self.to_local(query.date_range_start).date();
        let range_end = self.to_local(query.date_range_end).date();

        let (absences_by_staff, blocks_by_staff, salon_blocks, booked_by_staff) =
            self.index_unavailability(snapshot);

        let mut result = Vec::new();
        let mut date = range_start;
        while date <= range_end {
            if pipeline::within_booking_window(date, now_local, &self.rules) {
                let weekday = day_of_week(date);
                let opening = snapshot
                    .opening_hours
                    .iter()
                    .find(|row| row.day_of_week == weekday);

                for member in &staff {
                    let working = snapshot.staff_working_hours.iter().find(|row| {
                        row.staff_id == member.id && row.day_of_week == weekday
                    });

                    let mut blocks = salon_blocks.clone();
                    if let Some(staff_blocks) = blocks_by_staff.get(&member.id) {
                        blocks.extend_from_slice(staff_blocks);
                    }

                    let schedule = StaffDaySchedule {
                        opening,
                        working,
                        absences: slice_for(&absences_by_staff, &member.id),
                        blocks: &blocks,
                        appointments: slice_for(&booked_by_staff, &member.id),
                    };

                    for cleared in
                        pipeline::open_intervals(date, &schedule, &self.rules, now_local, total_minutes)
                    {
                        for start in slots::candidate_starts(
                            cleared,
                            self.rules.slot_granularity_minutes,
                            total_minutes,
                        ) {
                            result.push(AvailableSlot {
                                staff_id: member.id,
                                staff_name: member.name.clone(),
                                start_time: self.to_utc(start),
                                end_time: self
                                    .to_utc(start + Duration::minutes(total_minutes as i64)),
                                duration_minutes: total_minutes,
                                services: service_snapshots.clone(),
                            });
                        }
                    }
                }
            }
            date = match date.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        result.sort_by(|a, b| {
            a.start_time
                .cmp(&b.start_time)
                .then_with(|| a.staff_name.cmp(&b.staff_name))
        });

        debug!(
            "generated {} slots across {} staff members",
            result.len(),
            staff.len()
        );
        Ok(result)
    }

    /// `available_slots` partitioned by salon-local calendar date for
    /// presentation. Purely cosmetic; the slot list inside each group keeps
    /// the guaranteed ordering.
    pub fn available_slots_by_date(
        &self,
        query: &SlotQuery,
        snapshot: &ScheduleSnapshot,
        now: DateTime<Utc>,
    ) -> Result<Vec<SlotsByDate>, SlotEngineError> {
        let slots = self.available_slots(query, snapshot, now)?;
        Ok(self.group_by_date(slots, now))
    }

    /// Group an already-sorted slot list by salon-local date.
    pub fn group_by_date(&self, slots: Vec<AvailableSlot>, now: DateTime<Utc>) -> Vec<SlotsByDate> {
        let today = self.to_local(now).date();
        let mut groups: Vec<SlotsByDate> = Vec::new();
        for slot in slots {
            let date = slot.start_time.with_timezone(&self.salon_offset).date_naive();
            match groups.last_mut() {
                Some(group) if group.date == date => group.slots.push(slot),
                _ => groups.push(SlotsByDate {
                    date,
                    display_date: display_date(date, today),
                    slots: vec![slot],
                }),
            }
        }
        groups
    }

    fn validate_rules(&self) -> Result<(), SlotEngineError> {
        if self.rules.slot_granularity_minutes <= 0 {
            return Err(SlotEngineError::ValidationError(format!(
                "slot granularity must be positive, got {}",
                self.rules.slot_granularity_minutes
            )));
        }
        if self.rules.lead_time_minutes < 0
            || self.rules.horizon_days < 0
            || self.rules.buffer_between_minutes < 0
        {
            return Err(SlotEngineError::ValidationError(
                "lead time, horizon and buffer must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Convert absences, blocks and occupying appointments into salon-local
    /// intervals, keyed per staff member where applicable.
    #[allow(clippy::type_complexity)]
    fn index_unavailability(
        &self,
        snapshot: &ScheduleSnapshot,
    ) -> (
        HashMap<Uuid, Vec<TimeInterval>>,
        HashMap<Uuid, Vec<TimeInterval>>,
        Vec<TimeInterval>,
        HashMap<Uuid, Vec<TimeInterval>>,
    ) {
        let mut absences: HashMap<Uuid, Vec<TimeInterval>> = HashMap::new();
        for absence in &snapshot.staff_absences {
            if let Some(interval) = self.to_local_interval(absence.start_time, absence.end_time) {
                absences.entry(absence.staff_id).or_default().push(interval);
            }
        }

        let mut staff_blocks: HashMap<Uuid, Vec<TimeInterval>> = HashMap::new();
        let mut salon_blocks = Vec::new();
        for block in &snapshot.blocked_times {
            if let Some(interval) = self.to_local_interval(block.start_time, block.end_time) {
                match block.staff_id {
                    Some(staff_id) => staff_blocks.entry(staff_id).or_default().push(interval),
                    None => salon_blocks.push(interval),
                }
            }
        }

        let mut booked: HashMap<Uuid, Vec<TimeInterval>> = HashMap::new();
        for appointment in &snapshot.existing_appointments {
            if !appointment.status.occupies_time() {
                continue;
            }
            if let Some(interval) =
                self.to_local_interval(appointment.start_time, appointment.end_time)
            {
                booked.entry(appointment.staff_id).or_default().push(interval);
            }
        }

        (absences, staff_blocks, salon_blocks, booked)
    }

    fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.salon_offset).naive_local()
    }

    fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        // A fixed offset maps every local instant uniquely.
        self.salon_offset
            .from_local_datetime(&local)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn to_local_interval(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<TimeInterval> {
        TimeInterval::new(self.to_local(start), self.to_local(end))
    }
}

fn slice_for<'a>(map: &'a HashMap<Uuid, Vec<TimeInterval>>, id: &Uuid) -> &'a [TimeInterval] {
    map.get(id).map(Vec::as_slice).unwrap_or(&[])
}

fn display_date(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if Some(date) == today.succ_opt() {
        "Tomorrow".to_string()
    } else {
        date.format("%a %-d %b").to_string()
    }
}
