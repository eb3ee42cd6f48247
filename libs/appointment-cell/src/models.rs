use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::appointment::AppointmentStatus;
use shared_models::error::AppError;

/// Booking form. Patient fields default to empty so that missing values are
/// reported as validation errors rather than body rejections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    #[serde(alias = "availabilitySlotId")]
    pub availability_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default, alias = "name")]
    pub patient_name: String,
    #[serde(default, alias = "email")]
    pub patient_email: String,
    #[serde(default, alias = "phoneNo", alias = "phone")]
    pub patient_phone: String,
    #[serde(default)]
    pub symptoms: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelAppointmentRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub doctor_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Availability slot not found for this doctor and date")]
    SlotNotFound,

    #[error("Time slot {0} is not offered on this date")]
    TimeNotOffered(String),

    #[error("Time slot is already booked")]
    SlotAlreadyBooked,

    #[error("Appointment is now {0}; reload and try again")]
    StatusChanged(AppointmentStatus),

    #[error("Cannot change appointment status from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("{0}")]
    InvalidStatus(String),

    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized access to appointment")]
    Unauthorized,
}

impl From<AppointmentError> for AppError {
    fn from(e: AppointmentError) -> Self {
        match e {
            AppointmentError::NotFound
            | AppointmentError::DoctorNotFound
            | AppointmentError::SlotNotFound
            | AppointmentError::TimeNotOffered(_) => AppError::NotFound(e.to_string()),
            AppointmentError::SlotAlreadyBooked | AppointmentError::StatusChanged(_) => {
                AppError::Conflict(e.to_string())
            }
            AppointmentError::InvalidStatusTransition { .. }
            | AppointmentError::InvalidStatus(_)
            | AppointmentError::Validation(_) => AppError::ValidationError(e.to_string()),
            AppointmentError::Unauthorized => AppError::Forbidden(e.to_string()),
        }
    }
}
