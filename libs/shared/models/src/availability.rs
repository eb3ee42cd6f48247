use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

const LABEL_FORMAT: &str = "%I:%M %p";

/// A discrete time label such as `"10:00 AM"`.
///
/// Labels are stored and compared as wall-clock times so "9:00 am",
/// "09:00 AM" and "09:00" all name the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotTime(NaiveTime);

impl SlotTime {
    pub fn new(time: NaiveTime) -> Self {
        Self(time)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    pub fn label(&self) -> String {
        self.0.format(LABEL_FORMAT).to_string()
    }
}

impl FromStr for SlotTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut normalized = s.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err("Time slot label is empty".to_string());
        }

        // "10:00AM" -> "10:00 AM"
        if (normalized.ends_with("AM") || normalized.ends_with("PM"))
            && !normalized.ends_with(" AM")
            && !normalized.ends_with(" PM")
        {
            let split = normalized.len() - 2;
            normalized.insert(split, ' ');
        }

        NaiveTime::parse_from_str(&normalized, LABEL_FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&normalized, "%H:%M"))
            .map(SlotTime)
            .map_err(|_| format!("Invalid time slot label: '{}'", s.trim()))
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for SlotTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub time: SlotTime,
    pub is_booked: bool,
    pub patient_id: Option<Uuid>,
    pub appointment_id: Option<Uuid>,
}

impl TimeSlot {
    pub fn open(time: SlotTime) -> Self {
        Self {
            time,
            is_booked: false,
            patient_id: None,
            appointment_id: None,
        }
    }
}

/// One doctor's slot set for a single calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time_slots: Vec<TimeSlot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Availability {
    pub fn slot(&self, time: SlotTime) -> Option<&TimeSlot> {
        self.time_slots.iter().find(|slot| slot.time == time)
    }

    pub fn has_bookings(&self) -> bool {
        self.time_slots.iter().any(|slot| slot.is_booked)
    }

    pub fn sort_slots(&mut self) {
        self.time_slots.sort_by_key(|slot| slot.time);
    }
}

/// Request to take one time slot on behalf of an appointment.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotClaim {
    pub availability_id: Uuid,
    pub time: SlotTime,
    pub patient_id: Uuid,
    pub appointment_id: Uuid,
}

/// Result of the atomic check-and-set on a time slot.
#[derive(Debug, Clone, PartialEq)]
pub enum ReserveOutcome {
    Reserved(TimeSlot),
    AlreadyBooked,
    UnknownSlot,
}
