use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::repositories::{AccountRepository, AvailabilityRepository, DoctorRepository};
use shared_database::AppState;
use shared_models::auth::User;
use shared_models::doctor::{Doctor, DoctorFilter, DoctorSummary, DoctorUpdate};
use shared_models::error::AppError;
use shared_utils::extractor::require_admin;
use shared_utils::validation::{require_email, required};

use crate::models::{DoctorError, NewDoctor};

pub struct DoctorService {
    doctors: Arc<dyn DoctorRepository>,
    accounts: Arc<dyn AccountRepository>,
    availability: Arc<dyn AvailabilityRepository>,
}

impl DoctorService {
    pub fn new(state: &AppState) -> Self {
        Self {
            doctors: state.store.doctors.clone(),
            accounts: state.store.accounts.clone(),
            availability: state.store.availability.clone(),
        }
    }

    /// Persist a doctor profile under an id that was already allocated for
    /// the matching account.
    pub async fn create_doctor(&self, id: Uuid, request: NewDoctor) -> Result<Doctor, AppError> {
        debug!("Creating doctor profile for: {}", request.email);

        let full_name = required(&request.full_name, "Full name")?.to_string();
        let specialization = required(&request.specialization, "Specialization")?.to_string();
        let email = require_email(&request.email)?;

        let now = Utc::now();
        let doctor = Doctor {
            id,
            full_name,
            email,
            specialization,
            bio: request.bio,
            profile_image_url: request.profile_image_url,
            phone: request.phone,
            gender: request.gender,
            address: request.address,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let doctor = self.doctors.insert(doctor).await?;
        info!("Doctor profile created with ID: {}", doctor.id);
        Ok(doctor)
    }

    /// Public directory listing, optionally narrowed by specialization
    /// (case-insensitive) and free text.
    pub async fn list_doctors(
        &self,
        specialization: Option<String>,
        search: Option<String>,
    ) -> Result<Vec<DoctorSummary>, AppError> {
        debug!("Listing doctors: specialization={:?} search={:?}", specialization, search);

        let filter = DoctorFilter {
            specialization: specialization.filter(|s| !s.trim().is_empty()),
            search: search.filter(|s| !s.trim().is_empty()),
            active_only: true,
        };

        let doctors = self.doctors.list(&filter).await?;
        Ok(doctors.iter().map(Doctor::summary).collect())
    }

    pub async fn search_doctors(&self, query: &str) -> Result<Vec<DoctorSummary>, AppError> {
        self.list_doctors(None, Some(query.to_string())).await
    }

    pub async fn list_by_specialization(&self, specialization: &str) -> Result<Vec<DoctorSummary>, AppError> {
        self.list_doctors(Some(specialization.to_string()), None).await
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, AppError> {
        debug!("Fetching doctor profile: {}", doctor_id);

        self.doctors
            .get(doctor_id)
            .await?
            .ok_or_else(|| DoctorError::NotFound.into())
    }

    pub async fn get_profile(&self, user: &User) -> Result<Doctor, AppError> {
        if !user.is_doctor() {
            return Err(DoctorError::NotDoctor.into());
        }
        self.get_doctor(user.id).await
    }

    /// Self-service update. Activation is left to admins.
    pub async fn update_profile(&self, user: &User, mut update: DoctorUpdate) -> Result<Doctor, AppError> {
        if !user.is_doctor() {
            return Err(DoctorError::NotDoctor.into());
        }
        update.is_active = None;
        self.apply_update(user.id, update).await
    }

    pub async fn delete_profile(&self, user: &User) -> Result<(), AppError> {
        if !user.is_doctor() {
            return Err(DoctorError::NotDoctor.into());
        }
        self.remove(user.id).await
    }

    pub async fn admin_update(&self, user: &User, doctor_id: Uuid, update: DoctorUpdate) -> Result<Doctor, AppError> {
        require_admin(user)?;
        self.apply_update(doctor_id, update).await
    }

    pub async fn admin_delete(&self, user: &User, doctor_id: Uuid) -> Result<(), AppError> {
        require_admin(user)?;
        self.remove(doctor_id).await
    }

    async fn apply_update(&self, doctor_id: Uuid, update: DoctorUpdate) -> Result<Doctor, AppError> {
        debug!("Updating doctor profile: {}", doctor_id);

        if update.full_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(DoctorError::Validation("Full name cannot be empty".to_string()).into());
        }
        if update.specialization.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(DoctorError::Validation("Specialization cannot be empty".to_string()).into());
        }

        self.doctors
            .update(doctor_id, update)
            .await?
            .ok_or_else(|| DoctorError::NotFound.into())
    }

    /// Remove the profile, its login and its open schedule. Refused while any
    /// of its slots is booked.
    async fn remove(&self, doctor_id: Uuid) -> Result<(), AppError> {
        self.get_doctor(doctor_id).await?;

        let days = self.availability.list_for_doctor(doctor_id, None, None).await?;
        if days.iter().any(|day| day.has_bookings()) {
            warn!("Refusing to delete doctor {} with booked slots", doctor_id);
            return Err(DoctorError::HasBookings.into());
        }

        for day in days {
            self.availability.delete(day.id).await?;
        }
        self.doctors.delete(doctor_id).await?;
        self.accounts.delete(doctor_id).await?;

        info!("Doctor {} deleted", doctor_id);
        Ok(())
    }
}
