use chrono::{Duration, NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;

use crate::error::AvailabilityError;
use crate::models::{DoctorSchedule, TimeSlot};
use crate::services::generator::generate_slots;
use crate::services::store::{ScheduleStore, SlotStore, StoreBackedSchedules, StoreBackedSlots};

const DEFAULT_RANGE_DAYS: i64 = 7;

/// Availability engine: looks up persisted bookable slots for a date range
/// and falls back to on-demand generation from the doctor's weekly schedule
/// when none are persisted.
///
/// The two stores are injected so the engine can be exercised without a real
/// document store.
pub struct AvailabilityService<D, S> {
    schedules: D,
    slots: S,
}

impl AvailabilityService<StoreBackedSchedules, StoreBackedSlots> {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_stores(
            StoreBackedSchedules::new(config),
            StoreBackedSlots::new(config),
        )
    }
}

impl<D: ScheduleStore, S: SlotStore> AvailabilityService<D, S> {
    pub fn with_stores(schedules: D, slots: S) -> Self {
        Self { schedules, slots }
    }

    /// Bookable slots for the doctor over an inclusive date range.
    ///
    /// Defaults: `start` = today, `end` = start + 7 days. Persisted slots
    /// always win over synthesis: a non-empty store result is returned
    /// as-is, even when it covers only part of the range.
    pub async fn get_doctor_availability(
        &self,
        doctor_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<TimeSlot>, AvailabilityError> {
        let start = start_date.unwrap_or_else(|| Utc::now().date_naive());
        let end = end_date.unwrap_or(start + Duration::days(DEFAULT_RANGE_DAYS));

        if end < start {
            return Err(AvailabilityError::InvalidRange { start, end });
        }

        debug!(
            "Fetching availability for doctor {} from {} to {}",
            doctor_id, start, end
        );

        let schedule = self
            .schedules
            .fetch_schedule(doctor_id)
            .await?
            .ok_or(AvailabilityError::DoctorNotFound(doctor_id))?;

        let persisted = self.slots.find_available_slots(doctor_id, start, end).await?;
        if !persisted.is_empty() {
            debug!(
                "Returning {} persisted slots for doctor {}",
                persisted.len(),
                doctor_id
            );
            return Ok(persisted);
        }

        let generated = generate_slots(&schedule, start, end);
        debug!(
            "Generated {} slots for doctor {}",
            generated.len(),
            doctor_id
        );
        Ok(generated)
    }

    /// The doctor's schedule aggregate (weekly availability, vacation days,
    /// slot parameters).
    pub async fn get_doctor_schedule(
        &self,
        doctor_id: Uuid,
    ) -> Result<DoctorSchedule, AvailabilityError> {
        self.schedules
            .fetch_schedule(doctor_id)
            .await?
            .ok_or(AvailabilityError::DoctorNotFound(doctor_id))
    }
}
