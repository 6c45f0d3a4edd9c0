//! Service resolution, total-duration calculation and staff qualification.

use tracing::debug;
use uuid::Uuid;

use shared_models::{BookableService, BookableStaff};

use crate::models::{BookingRules, SlotEngineError};

/// Resolve requested service ids against the loaded catalogue, preserving
/// the request order. An id absent from the catalogue is a caller contract
/// violation, not an empty result.
pub fn resolve_services<'a>(
    requested: &[Uuid],
    services: &'a [BookableService],
) -> Result<Vec<&'a BookableService>, SlotEngineError> {
    requested
        .iter()
        .map(|id| {
            services
                .iter()
                .find(|service| service.id == *id)
                .ok_or(SlotEngineError::UnknownService(*id))
        })
        .collect()
}

/// Total booked duration: the service durations plus one inter-service
/// buffer between each consecutive pair when several services are booked
/// together.
pub fn total_duration_minutes(services: &[&BookableService], rules: &BookingRules) -> i32 {
    let base: i32 = services.iter().map(|service| service.duration_minutes).sum();
    if services.len() > 1 {
        base + (services.len() as i32 - 1) * rules.buffer_between_minutes
    } else {
        base
    }
}

/// Staff members who are bookable and can perform every requested service.
/// A qualified preferred staff member is moved to the front of the roster;
/// an unqualified one gets no special treatment.
pub fn qualified_staff<'a>(
    staff: &'a [BookableStaff],
    requested: &[Uuid],
    preferred_staff_id: Option<Uuid>,
) -> Vec<&'a BookableStaff> {
    let mut qualified: Vec<&BookableStaff> = staff
        .iter()
        .filter(|member| member.is_bookable && member.can_perform_all(requested))
        .collect();

    if let Some(preferred) = preferred_staff_id {
        if let Some(position) = qualified.iter().position(|member| member.id == preferred) {
            let member = qualified.remove(position);
            qualified.insert(0, member);
        }
    }

    debug!(
        "{} of {} staff members qualified for {} requested services",
        qualified.len(),
        staff.len(),
        requested.len()
    );

    qualified
}
