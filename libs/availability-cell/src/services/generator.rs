use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate, Weekday};
use uuid::Uuid;

use crate::models::{DaySchedule, DoctorSchedule, SlotStatus, TimeOfDay, TimeSlot};

/// Synthesize bookable windows from a doctor's weekly schedule for an
/// inclusive date range.
///
/// Pure projection of (schedule, vacation days, range): nothing is persisted,
/// every day is evaluated independently, and identical inputs always produce
/// the identical ordered slot list. Output is ordered (date, start_time)
/// ascending and slots never overlap per day by construction.
pub fn generate_slots(schedule: &DoctorSchedule, start: NaiveDate, end: NaiveDate) -> Vec<TimeSlot> {
    let week = weekly_by_day(&schedule.weekly_availability);
    let vacations: HashSet<NaiveDate> = schedule
        .vacation_days
        .iter()
        .filter(|v| !v.is_work_day)
        .map(|v| v.date)
        .collect();
    let duration = schedule.slot_duration_minutes();

    let mut slots = Vec::new();
    for date in start.iter_days().take_while(|d| *d <= end) {
        let Some(day) = week.get(&day_of_week(date)) else {
            continue;
        };
        if vacations.contains(&date) {
            continue;
        }
        emit_day_slots(schedule.doctor_id, date, day, duration, &mut slots);
    }

    slots
}

/// Keys the week by day_of_week, keeping only `is_available` entries.
/// Duplicate entries for the same day are a data-integrity issue upstream;
/// the first entry wins.
fn weekly_by_day(entries: &[DaySchedule]) -> BTreeMap<u8, &DaySchedule> {
    let mut week = BTreeMap::new();
    for entry in entries.iter().filter(|e| e.is_available) {
        week.entry(entry.day_of_week).or_insert(entry);
    }
    week
}

/// Day of week with the 0 = Sunday convention used by the schedule data.
pub fn day_of_week(date: NaiveDate) -> u8 {
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

/// Walks the day's window in `duration`-minute steps. A slot is only emitted
/// when it fits entirely before the window's end; there is no partial
/// trailing slot. A window with `start_time >= end_time` (including an
/// overnight shift) yields zero slots.
fn emit_day_slots(
    doctor_id: Uuid,
    date: NaiveDate,
    day: &DaySchedule,
    duration: u16,
    out: &mut Vec<TimeSlot>,
) {
    let mut cursor = day.start_time;

    loop {
        let end_minutes = u32::from(cursor.minutes()) + u32::from(duration);
        if end_minutes > u32::from(day.end_time.minutes()) {
            break;
        }
        let Some(slot_end) = TimeOfDay::from_minutes(end_minutes as u16) else {
            break;
        };

        out.push(TimeSlot {
            doctor_id,
            date,
            start_time: cursor,
            end_time: slot_end,
            status: SlotStatus::Available,
            generated: true,
        });

        cursor = slot_end;
    }
}
