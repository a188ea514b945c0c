use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

/// Slot width used when a doctor has no explicit appointment duration, or
/// when the stored value is zero/negative.
pub const DEFAULT_APPOINTMENT_MINUTES: i32 = 30;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Wall-clock time of day as minutes since midnight, always `< 1440`.
///
/// Slot arithmetic happens on this immutable value instead of on datetime
/// objects; dates and times are only combined when formatting output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Some(Self(hour * 60 + minute))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

#[derive(Debug, Error)]
#[error("Invalid time of day: {0:?}")]
pub struct ParseTimeOfDayError(pub String);

impl FromStr for TimeOfDay {
    type Err = ParseTimeOfDayError;

    /// Parses `"HH:MM"`. A trailing seconds component (`"HH:MM:SS"`, as the
    /// store's time columns carry) is accepted and ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTimeOfDayError(s.to_string());

        let mut parts = s.splitn(3, ':');
        let hour = parts
            .next()
            .and_then(|p| p.parse::<u16>().ok())
            .ok_or_else(err)?;
        let minute = parts
            .next()
            .and_then(|p| p.parse::<u16>().ok())
            .ok_or_else(err)?;

        TimeOfDay::from_hm(hour, minute).ok_or_else(err)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A doctor's recurring availability window for one weekday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day_of_week: u8, // 0 = Sunday, 1 = Monday, etc.
    pub is_available: bool,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

/// Calendar-date exception overriding the recurring weekly schedule.
///
/// `is_work_day = false` blocks slot generation for that date. Entries with
/// `is_work_day = true` are accepted but currently have no effect; they are
/// reserved for partial-day overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacationDay {
    pub date: NaiveDate,
    pub is_work_day: bool,
}

/// Schedule aggregate embedded in the doctor document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorSchedule {
    #[serde(alias = "id")]
    pub doctor_id: Uuid,
    #[serde(default)]
    pub weekly_availability: Vec<DaySchedule>,
    #[serde(default)]
    pub vacation_days: Vec<VacationDay>,
    pub appointment_duration: Option<i32>,
    /// Soft cap enforced by the booking layer, not by slot generation.
    pub max_appointments_per_day: Option<i32>,
}

impl DoctorSchedule {
    /// Effective slot width in minutes. Zero or negative stored values are
    /// clamped to the default so the generation loop always terminates.
    pub fn slot_duration_minutes(&self) -> u16 {
        match self.appointment_duration {
            Some(d) if d > 0 => d.min(i32::from(u16::MAX)) as u16,
            _ => DEFAULT_APPOINTMENT_MINUTES as u16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Booked,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// A fixed-duration bookable appointment window on a given date.
///
/// Persisted slots come from the slot store; slots with `generated = true`
/// are synthesized placeholders that were never written to storage and need
/// a downstream booking step to materialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub status: SlotStatus,
    #[serde(default)]
    pub generated: bool,
}

impl TimeSlot {
    /// Stable synthetic key for a slot. A booking call can use it to
    /// re-request the exact same window deterministically.
    pub fn slot_key(&self) -> String {
        format!("{}:{}:{}", self.doctor_id, self.date, self.start_time)
    }
}
