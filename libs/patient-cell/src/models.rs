use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientListQuery {
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Only patients have a patient profile")]
    NotPatient,

    #[error("Patient has upcoming appointments; cancel them first")]
    HasUpcomingAppointments,

    #[error("{0}")]
    Validation(String),
}

impl From<PatientError> for AppError {
    fn from(e: PatientError) -> Self {
        match e {
            PatientError::NotFound => AppError::NotFound(e.to_string()),
            PatientError::NotPatient => AppError::Forbidden(e.to_string()),
            PatientError::HasUpcomingAppointments => AppError::Conflict(e.to_string()),
            PatientError::Validation(msg) => AppError::ValidationError(msg),
        }
    }
}
