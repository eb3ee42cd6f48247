use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use doctor_cell::models::NewDoctor;
use patient_cell::models::NewPatient;
use shared_models::error::AppError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

impl RegisterPatientRequest {
    pub fn profile(&self) -> NewPatient {
        NewPatient {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            gender: self.gender.clone(),
            date_of_birth: self.date_of_birth,
            address: self.address.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDoctorRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub specialization: String,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
}

impl RegisterDoctorRequest {
    pub fn profile(&self) -> NewDoctor {
        NewDoctor {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            specialization: self.specialization.clone(),
            bio: self.bio.clone(),
            profile_image_url: self.profile_image_url.clone(),
            phone: self.phone.clone(),
            gender: self.gender.clone(),
            address: self.address.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    /// Returned for both an unknown email and a wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Missing authorization header")]
    MissingToken,

    #[error("{0}")]
    InvalidToken(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e.to_string())
    }
}
