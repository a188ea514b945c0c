use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::store::DocumentStoreClient;

use crate::models::{DoctorSchedule, TimeSlot};

/// Read access to the doctor document holding the schedule aggregate.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Returns `None` when no doctor document exists for the id.
    async fn fetch_schedule(&self, doctor_id: Uuid) -> Result<Option<DoctorSchedule>>;
}

/// Read access to persisted, already-materialized bookable slots.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Slots for the inclusive date range, filtered to status `available`,
    /// ordered by (date asc, start_time asc).
    async fn find_available_slots(
        &self,
        doctor_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TimeSlot>>;
}

pub struct StoreBackedSchedules {
    store: DocumentStoreClient,
}

impl StoreBackedSchedules {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: DocumentStoreClient::new(config),
        }
    }
}

#[async_trait]
impl ScheduleStore for StoreBackedSchedules {
    async fn fetch_schedule(&self, doctor_id: Uuid) -> Result<Option<DoctorSchedule>> {
        debug!("Fetching schedule for doctor: {}", doctor_id);

        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let result: Vec<Value> = self.store.request(Method::GET, &path, None).await?;

        match result.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }
}

pub struct StoreBackedSlots {
    store: DocumentStoreClient,
}

impl StoreBackedSlots {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: DocumentStoreClient::new(config),
        }
    }
}

#[async_trait]
impl SlotStore for StoreBackedSlots {
    async fn find_available_slots(
        &self,
        doctor_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TimeSlot>> {
        debug!(
            "Querying persisted slots for doctor {} between {} and {}",
            doctor_id, start, end
        );

        let path = format!(
            "/rest/v1/time_slots?doctor_id=eq.{}&date=gte.{}&date=lte.{}&status=eq.available&order=date.asc,start_time.asc",
            doctor_id, start, end
        );
        let result: Vec<Value> = self.store.request(Method::GET, &path, None).await?;

        let slots: Vec<TimeSlot> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<TimeSlot>, _>>()?;

        Ok(slots)
    }
}
