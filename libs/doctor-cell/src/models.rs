use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::availability::SlotTime;
use shared_models::error::AppError;

/// Profile fields supplied when a doctor account is created.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDoctor {
    pub full_name: String,
    pub email: String,
    pub specialization: String,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorListQuery {
    pub specialization: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAvailabilityRequest {
    #[serde(alias = "date")]
    pub start_date: NaiveDate,
    /// Defaults to `start_date` for single-day schedules.
    pub end_date: Option<NaiveDate>,
    pub time_slots: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimeSlotsRequest {
    pub time_slots: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Only doctors have a doctor profile")]
    NotDoctor,

    #[error("Doctor has booked appointments and cannot be removed")]
    HasBookings,

    #[error("{0}")]
    Validation(String),
}

impl From<DoctorError> for AppError {
    fn from(e: DoctorError) -> Self {
        match e {
            DoctorError::NotFound => AppError::NotFound(e.to_string()),
            DoctorError::NotDoctor => AppError::Forbidden(e.to_string()),
            DoctorError::HasBookings => AppError::Conflict(e.to_string()),
            DoctorError::Validation(msg) => AppError::ValidationError(msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AvailabilityError {
    #[error("End date must not be before start date")]
    InvalidRange,

    #[error("Date range spans {days} days, the maximum is {max}")]
    RangeTooLong { days: i64, max: i64 },

    #[error("At least one time slot is required")]
    NoTimeSlots,

    #[error("{0}")]
    InvalidTimeSlot(String),

    #[error("Availability not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Only doctors can manage availability")]
    NotDoctor,

    #[error("Only the owning doctor or an admin can change this availability")]
    NotOwner,
}

impl From<AvailabilityError> for AppError {
    fn from(e: AvailabilityError) -> Self {
        match e {
            AvailabilityError::InvalidRange
            | AvailabilityError::RangeTooLong { .. }
            | AvailabilityError::NoTimeSlots
            | AvailabilityError::InvalidTimeSlot(_) => AppError::ValidationError(e.to_string()),
            AvailabilityError::NotFound | AvailabilityError::DoctorNotFound => {
                AppError::NotFound(e.to_string())
            }
            AvailabilityError::NotDoctor | AvailabilityError::NotOwner => {
                AppError::Forbidden(e.to_string())
            }
        }
    }
}

/// Parse, normalise and de-duplicate time labels. Result is chronological.
pub fn parse_time_labels(labels: &[String]) -> Result<Vec<SlotTime>, AvailabilityError> {
    let mut times = labels
        .iter()
        .map(|label| label.parse::<SlotTime>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(AvailabilityError::InvalidTimeSlot)?;

    times.sort();
    times.dedup();

    if times.is_empty() {
        return Err(AvailabilityError::NoTimeSlots);
    }
    Ok(times)
}
