use anyhow::{anyhow, Result};
use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use mockall::mock;
use mockall::predicate::eq;
use uuid::Uuid;

use availability_cell::error::AvailabilityError;
use availability_cell::models::{
    DaySchedule, DoctorSchedule, SlotStatus, TimeOfDay, TimeSlot, VacationDay,
};
use availability_cell::services::availability::AvailabilityService;
use availability_cell::services::store::{ScheduleStore, SlotStore};

mock! {
    Schedules {}

    #[async_trait]
    impl ScheduleStore for Schedules {
        async fn fetch_schedule(&self, doctor_id: Uuid) -> Result<Option<DoctorSchedule>>;
    }
}

mock! {
    Slots {}

    #[async_trait]
    impl SlotStore for Slots {
        async fn find_available_slots(
            &self,
            doctor_id: Uuid,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<TimeSlot>>;
    }
}

fn weekday_schedule(doctor_id: Uuid) -> DoctorSchedule {
    DoctorSchedule {
        doctor_id,
        weekly_availability: (1..=5)
            .map(|d| DaySchedule {
                day_of_week: d,
                is_available: true,
                start_time: "09:00".parse().unwrap(),
                end_time: "12:00".parse().unwrap(),
            })
            .collect(),
        vacation_days: vec![],
        appointment_duration: Some(30),
        max_appointments_per_day: None,
    }
}

fn persisted_slot(doctor_id: Uuid, date: NaiveDate, start: &str, end: &str) -> TimeSlot {
    TimeSlot {
        doctor_id,
        date,
        start_time: start.parse::<TimeOfDay>().unwrap(),
        end_time: end.parse::<TimeOfDay>().unwrap(),
        status: SlotStatus::Available,
        generated: false,
    }
}

// Monday through the following Sunday
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
}

fn sunday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
}

#[tokio::test]
async fn generates_slots_when_store_is_empty() {
    let doctor_id = Uuid::new_v4();
    let schedule = weekday_schedule(doctor_id);

    let mut schedules = MockSchedules::new();
    schedules
        .expect_fetch_schedule()
        .with(eq(doctor_id))
        .times(1)
        .returning(move |_| Ok(Some(schedule.clone())));

    let mut slots = MockSlots::new();
    slots
        .expect_find_available_slots()
        .with(eq(doctor_id), eq(monday()), eq(sunday()))
        .times(1)
        .returning(|_, _, _| Ok(vec![]));

    let service = AvailabilityService::with_stores(schedules, slots);
    let result = service
        .get_doctor_availability(doctor_id, Some(monday()), Some(sunday()))
        .await
        .unwrap();

    assert_eq!(result.len(), 30); // 5 working days x 6 slots
    assert!(result.iter().all(|s| s.generated));
    assert_eq!(result[0].start_time.to_string(), "09:00");
    assert_eq!(result[0].end_time.to_string(), "09:30");
}

#[tokio::test]
async fn persisted_slots_win_over_generation() {
    let doctor_id = Uuid::new_v4();
    let schedule = weekday_schedule(doctor_id);

    // Sparse persistence: only one day of the week has materialized slots.
    // The engine must return it as-is instead of generating the full week.
    let persisted = vec![
        persisted_slot(doctor_id, monday(), "09:00", "09:30"),
        persisted_slot(doctor_id, monday(), "09:30", "10:00"),
    ];

    let mut schedules = MockSchedules::new();
    schedules
        .expect_fetch_schedule()
        .times(1)
        .returning(move |_| Ok(Some(schedule.clone())));

    let mut slots = MockSlots::new();
    let returned = persisted.clone();
    slots
        .expect_find_available_slots()
        .times(1)
        .returning(move |_, _, _| Ok(returned.clone()));

    let service = AvailabilityService::with_stores(schedules, slots);
    let result = service
        .get_doctor_availability(doctor_id, Some(monday()), Some(sunday()))
        .await
        .unwrap();

    assert_eq!(result, persisted);
    assert!(result.iter().all(|s| !s.generated));
}

#[tokio::test]
async fn unknown_doctor_aborts_without_querying_slots() {
    let doctor_id = Uuid::new_v4();

    let mut schedules = MockSchedules::new();
    schedules
        .expect_fetch_schedule()
        .times(1)
        .returning(|_| Ok(None));

    // No expectation on the slot store: any call would fail the test.
    let slots = MockSlots::new();

    let service = AvailabilityService::with_stores(schedules, slots);
    let result = service
        .get_doctor_availability(doctor_id, Some(monday()), Some(sunday()))
        .await;

    assert_matches!(result, Err(AvailabilityError::DoctorNotFound(id)) if id == doctor_id);
}

#[tokio::test]
async fn inverted_range_fails_fast() {
    let doctor_id = Uuid::new_v4();

    // Neither store may be touched when the range is invalid.
    let schedules = MockSchedules::new();
    let slots = MockSlots::new();

    let service = AvailabilityService::with_stores(schedules, slots);
    let result = service
        .get_doctor_availability(doctor_id, Some(sunday()), Some(monday()))
        .await;

    assert_matches!(
        result,
        Err(AvailabilityError::InvalidRange { start, end }) if start == sunday() && end == monday()
    );
}

#[tokio::test]
async fn storage_failure_surfaces_as_storage_error() {
    let doctor_id = Uuid::new_v4();
    let schedule = weekday_schedule(doctor_id);

    let mut schedules = MockSchedules::new();
    schedules
        .expect_fetch_schedule()
        .times(1)
        .returning(move |_| Ok(Some(schedule.clone())));

    let mut slots = MockSlots::new();
    slots
        .expect_find_available_slots()
        .times(1)
        .returning(|_, _, _| Err(anyhow!("connection reset")));

    let service = AvailabilityService::with_stores(schedules, slots);
    let result = service
        .get_doctor_availability(doctor_id, Some(monday()), Some(sunday()))
        .await;

    assert_matches!(result, Err(AvailabilityError::Storage(_)));
}

#[tokio::test]
async fn omitted_range_defaults_to_the_next_seven_days() {
    let doctor_id = Uuid::new_v4();
    let schedule = weekday_schedule(doctor_id);

    let mut schedules = MockSchedules::new();
    schedules
        .expect_fetch_schedule()
        .times(1)
        .returning(move |_| Ok(Some(schedule.clone())));

    let today = Utc::now().date_naive();
    let mut slots = MockSlots::new();
    slots
        .expect_find_available_slots()
        .withf(move |_, start, end| *start == today && *end == today + Duration::days(7))
        .times(1)
        .returning(|_, _, _| Ok(vec![]));

    let service = AvailabilityService::with_stores(schedules, slots);
    let result = service.get_doctor_availability(doctor_id, None, None).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn vacation_day_excluded_from_generated_availability() {
    let doctor_id = Uuid::new_v4();
    let wednesday = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();

    let mut schedule = weekday_schedule(doctor_id);
    schedule.vacation_days.push(VacationDay {
        date: wednesday,
        is_work_day: false,
    });

    let mut schedules = MockSchedules::new();
    schedules
        .expect_fetch_schedule()
        .times(1)
        .returning(move |_| Ok(Some(schedule.clone())));

    let mut slots = MockSlots::new();
    slots
        .expect_find_available_slots()
        .times(1)
        .returning(|_, _, _| Ok(vec![]));

    let service = AvailabilityService::with_stores(schedules, slots);
    let result = service
        .get_doctor_availability(doctor_id, Some(monday()), Some(sunday()))
        .await
        .unwrap();

    assert_eq!(result.len(), 24);
    assert!(result.iter().all(|s| s.date != wednesday));
}

#[tokio::test]
async fn get_doctor_schedule_returns_aggregate() {
    let doctor_id = Uuid::new_v4();
    let schedule = weekday_schedule(doctor_id);

    let mut schedules = MockSchedules::new();
    schedules
        .expect_fetch_schedule()
        .with(eq(doctor_id))
        .times(1)
        .returning(move |_| Ok(Some(schedule.clone())));

    let slots = MockSlots::new();

    let service = AvailabilityService::with_stores(schedules, slots);
    let result = service.get_doctor_schedule(doctor_id).await.unwrap();

    assert_eq!(result.doctor_id, doctor_id);
    assert_eq!(result.weekly_availability.len(), 5);
}
