use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::repositories::{AccountRepository, AppointmentRepository, PatientRepository};
use shared_database::AppState;
use shared_models::appointment::{AppointmentFilter, AppointmentStatus};
use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_models::patient::{Patient, PatientUpdate};
use shared_utils::extractor::{require_admin, require_role};
use shared_utils::validation::{is_valid_phone, require_email, required};

use crate::models::{NewPatient, PatientError};

pub struct PatientService {
    patients: Arc<dyn PatientRepository>,
    accounts: Arc<dyn AccountRepository>,
    appointments: Arc<dyn AppointmentRepository>,
}

impl PatientService {
    pub fn new(state: &AppState) -> Self {
        Self {
            patients: state.store.patients.clone(),
            accounts: state.store.accounts.clone(),
            appointments: state.store.appointments.clone(),
        }
    }

    /// Persist a patient profile under the id of its freshly created account.
    pub async fn create_patient(&self, id: Uuid, request: NewPatient) -> Result<Patient, AppError> {
        debug!("Creating patient profile for: {}", request.email);

        let first_name = required(&request.first_name, "First name")?.to_string();
        let last_name = required(&request.last_name, "Last name")?.to_string();
        let email = require_email(&request.email)?;
        check_phone(request.phone.as_deref())?;

        let now = Utc::now();
        let patient = Patient {
            id,
            first_name,
            last_name,
            email,
            phone: request.phone.map(|p| p.trim().to_string()),
            gender: request.gender,
            date_of_birth: request.date_of_birth,
            address: request.address,
            created_at: now,
            updated_at: now,
        };

        let patient = self.patients.insert(patient).await?;
        info!("Patient profile created with ID: {}", patient.id);
        Ok(patient)
    }

    pub async fn get_profile(&self, user: &User) -> Result<Patient, AppError> {
        if !user.is_patient() {
            return Err(PatientError::NotPatient.into());
        }
        self.find(user.id).await
    }

    pub async fn update_profile(&self, user: &User, update: PatientUpdate) -> Result<Patient, AppError> {
        if !user.is_patient() {
            return Err(PatientError::NotPatient.into());
        }
        self.apply_update(user.id, update).await
    }

    pub async fn delete_profile(&self, user: &User) -> Result<(), AppError> {
        if !user.is_patient() {
            return Err(PatientError::NotPatient.into());
        }
        self.remove(user.id).await
    }

    /// Staff view of a single patient. Patients may only read themselves.
    pub async fn get_patient(&self, user: &User, patient_id: Uuid) -> Result<Patient, AppError> {
        if !(user.is_patient() && user.id == patient_id) {
            require_role(user, &[Role::Admin, Role::Doctor])?;
        }
        self.find(patient_id).await
    }

    pub async fn list_patients(&self, user: &User, search: Option<String>) -> Result<Vec<Patient>, AppError> {
        require_admin(user)?;
        let search = search.filter(|s| !s.trim().is_empty());
        debug!("Listing patients: search={:?}", search);
        self.patients.list(search.as_deref().map(str::trim)).await
    }

    pub async fn search_patients(&self, user: &User, query: &str) -> Result<Vec<Patient>, AppError> {
        require_role(user, &[Role::Admin, Role::Doctor])?;
        let query = query.trim();
        if query.is_empty() {
            return Err(PatientError::Validation("Search query is required".to_string()).into());
        }
        self.patients.list(Some(query)).await
    }

    pub async fn admin_update(&self, user: &User, patient_id: Uuid, update: PatientUpdate) -> Result<Patient, AppError> {
        require_admin(user)?;
        self.apply_update(patient_id, update).await
    }

    pub async fn admin_delete(&self, user: &User, patient_id: Uuid) -> Result<(), AppError> {
        require_admin(user)?;
        self.remove(patient_id).await
    }

    async fn find(&self, patient_id: Uuid) -> Result<Patient, AppError> {
        self.patients
            .get(patient_id)
            .await?
            .ok_or_else(|| PatientError::NotFound.into())
    }

    async fn apply_update(&self, patient_id: Uuid, update: PatientUpdate) -> Result<Patient, AppError> {
        debug!("Updating patient profile: {}", patient_id);

        if update.first_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(PatientError::Validation("First name cannot be empty".to_string()).into());
        }
        if update.last_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(PatientError::Validation("Last name cannot be empty".to_string()).into());
        }
        check_phone(update.phone.as_deref())?;

        self.patients
            .update(patient_id, update)
            .await?
            .ok_or_else(|| PatientError::NotFound.into())
    }

    /// Remove the profile and its login. Refused while the patient still
    /// holds a pending or confirmed appointment.
    async fn remove(&self, patient_id: Uuid) -> Result<(), AppError> {
        self.find(patient_id).await?;

        let filter = AppointmentFilter {
            patient_id: Some(patient_id),
            ..Default::default()
        };
        let upcoming = self
            .appointments
            .list(&filter)
            .await?
            .into_iter()
            .any(|a| matches!(a.status, AppointmentStatus::Pending | AppointmentStatus::Confirmed));
        if upcoming {
            warn!("Refusing to delete patient {} with upcoming appointments", patient_id);
            return Err(PatientError::HasUpcomingAppointments.into());
        }

        self.patients.delete(patient_id).await?;
        self.accounts.delete(patient_id).await?;

        info!("Patient {} deleted", patient_id);
        Ok(())
    }
}

fn check_phone(phone: Option<&str>) -> Result<(), AppError> {
    match phone {
        Some(p) if !is_valid_phone(p.trim()) => {
            Err(PatientError::Validation("Invalid phone number".to_string()).into())
        }
        _ => Ok(()),
    }
}
