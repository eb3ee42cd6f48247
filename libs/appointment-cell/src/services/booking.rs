use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use shared_database::repositories::{AppointmentRepository, AvailabilityRepository, DoctorRepository};
use shared_database::AppState;
use shared_models::appointment::{Appointment, AppointmentFilter, AppointmentStatus};
use shared_models::auth::{Role, User};
use shared_models::availability::{ReserveOutcome, SlotClaim, SlotTime};
use shared_models::error::AppError;
use shared_utils::extractor::{require_admin, require_role};
use shared_utils::validation::{require_email, require_phone, required};

use crate::models::{AppointmentError, AppointmentListQuery, BookAppointmentRequest};
use crate::services::lifecycle::AppointmentLifecycleService;

const CODE_PREFIX: &str = "APT-";
const CODE_LENGTH: usize = 7;
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Which appointments a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// Every appointment (admin).
    All,
    /// The calling doctor's appointments.
    Doctor,
    /// The calling patient's appointments.
    Patient,
}

pub fn generate_appointment_code() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..CODE_LENGTH)
        .map(|_| CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())] as char)
        .collect();
    format!("{}{}", CODE_PREFIX, suffix)
}

pub struct BookingService {
    doctors: Arc<dyn DoctorRepository>,
    availability: Arc<dyn AvailabilityRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    lifecycle: AppointmentLifecycleService,
}

impl BookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            doctors: state.store.doctors.clone(),
            availability: state.store.availability.clone(),
            appointments: state.store.appointments.clone(),
            lifecycle: AppointmentLifecycleService::new(),
        }
    }

    /// Book one open slot.
    ///
    /// Validation and lookups run before anything is written. The slot is
    /// then taken with a single check-and-set; if persisting the appointment
    /// fails afterwards the slot is handed back.
    pub async fn book_appointment(
        &self,
        user: &User,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppError> {
        require_role(user, &[Role::Patient])?;
        debug!(
            "Booking appointment for patient {} with doctor {} on {} at {}",
            user.id, request.doctor_id, request.date, request.time
        );

        let patient_name = required(&request.patient_name, "Patient name")?.to_string();
        let patient_email = require_email(&request.patient_email)?;
        let patient_phone = require_phone(&request.patient_phone)?;
        let symptoms = required(&request.symptoms, "Symptoms")?.to_string();
        let time: SlotTime = request
            .time
            .parse()
            .map_err(AppointmentError::Validation)?;

        let doctor = self
            .doctors
            .get(request.doctor_id)
            .await?
            .filter(|d| d.is_active)
            .ok_or(AppointmentError::DoctorNotFound)?;

        let day = self
            .availability
            .get(request.availability_id)
            .await?
            .filter(|day| day.doctor_id == doctor.id && day.date == request.date)
            .ok_or(AppointmentError::SlotNotFound)?;

        if day.slot(time).is_none() {
            return Err(AppointmentError::TimeNotOffered(time.label()).into());
        }

        let appointment_id = Uuid::new_v4();
        let claim = SlotClaim {
            availability_id: day.id,
            time,
            patient_id: user.id,
            appointment_id,
        };

        match self.availability.reserve_slot(&claim).await? {
            ReserveOutcome::Reserved(_) => {}
            ReserveOutcome::AlreadyBooked => {
                warn!("Slot {} {} of availability {} already booked", day.date, time, day.id);
                return Err(AppointmentError::SlotAlreadyBooked.into());
            }
            ReserveOutcome::UnknownSlot => {
                return Err(AppointmentError::TimeNotOffered(time.label()).into());
            }
        }

        let now = Utc::now();
        let appointment = Appointment {
            id: appointment_id,
            appointment_code: generate_appointment_code(),
            doctor_id: doctor.id,
            patient_id: user.id,
            availability_id: day.id,
            date: day.date,
            time,
            patient_name,
            patient_email,
            patient_phone,
            symptoms,
            doctor_name: doctor.full_name.clone(),
            department: doctor.specialization.clone(),
            status: AppointmentStatus::Pending,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        };

        match self.appointments.insert(appointment).await {
            Ok(saved) => {
                info!("Appointment {} ({}) booked", saved.appointment_code, saved.id);
                Ok(saved)
            }
            Err(e) => {
                error!("Failed to persist appointment {}: {}", appointment_id, e);
                if let Err(release_err) = self.availability.release_slot(day.id, time, appointment_id).await {
                    error!(
                        "Failed to release slot {} of availability {} after booking failure: {}",
                        time, day.id, release_err
                    );
                }
                Err(e)
            }
        }
    }

    pub async fn get_appointment(&self, user: &User, appointment_id: Uuid) -> Result<Appointment, AppError> {
        debug!("Fetching appointment: {}", appointment_id);

        let appointment = self.load(appointment_id).await?;
        if !Self::can_view(user, &appointment) {
            return Err(AppointmentError::Unauthorized.into());
        }
        Ok(appointment)
    }

    pub async fn list_appointments(
        &self,
        user: &User,
        scope: ListScope,
        query: AppointmentListQuery,
    ) -> Result<Vec<Appointment>, AppError> {
        debug!("Listing appointments for {} with scope {:?}", user.id, scope);

        let status = match query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) if raw.eq_ignore_ascii_case("all") => None,
            Some(raw) => Some(raw.parse::<AppointmentStatus>().map_err(AppointmentError::InvalidStatus)?),
            None => None,
        };

        let mut filter = AppointmentFilter {
            doctor_id: None,
            patient_id: None,
            status,
            search: query.search.filter(|s| !s.trim().is_empty()),
        };

        match scope {
            ListScope::All => {
                require_admin(user)?;
                filter.doctor_id = query.doctor_id;
                filter.patient_id = query.patient_id;
            }
            ListScope::Doctor => {
                require_role(user, &[Role::Doctor])?;
                filter.doctor_id = Some(user.id);
            }
            ListScope::Patient => {
                require_role(user, &[Role::Patient])?;
                filter.patient_id = Some(user.id);
            }
        }

        self.appointments.list(&filter).await
    }

    /// Doctor (own appointments) or admin. Setting `cancelled` behaves like
    /// [`BookingService::cancel_appointment`].
    pub async fn update_status(
        &self,
        user: &User,
        appointment_id: Uuid,
        status: &str,
        reason: Option<String>,
    ) -> Result<Appointment, AppError> {
        let new_status: AppointmentStatus = status.parse().map_err(AppointmentError::InvalidStatus)?;
        debug!("Updating appointment {} to {}", appointment_id, new_status);

        let appointment = self.load(appointment_id).await?;
        let is_own_doctor = user.is_doctor() && appointment.doctor_id == user.id;
        if !user.is_admin() && !is_own_doctor {
            return Err(AppointmentError::Unauthorized.into());
        }

        if new_status == AppointmentStatus::Cancelled {
            return self.cancel_loaded(appointment, reason).await;
        }

        self.lifecycle.validate_status_transition(appointment.status, new_status)?;
        if appointment.status == new_status {
            return Ok(appointment);
        }

        let updated = match self
            .appointments
            .update_status(appointment_id, appointment.status, new_status, None)
            .await?
        {
            Some(updated) => updated,
            None => return Err(self.status_changed(appointment_id).await),
        };

        info!("Appointment {} moved from {} to {}", appointment_id, appointment.status, new_status);
        Ok(updated)
    }

    /// Owner patient, the appointment's doctor or an admin. Cancelling twice
    /// is allowed and re-runs the slot release.
    pub async fn cancel_appointment(
        &self,
        user: &User,
        appointment_id: Uuid,
        reason: Option<String>,
    ) -> Result<Appointment, AppError> {
        debug!("Cancelling appointment: {}", appointment_id);

        let appointment = self.load(appointment_id).await?;
        if !Self::can_view(user, &appointment) {
            return Err(AppointmentError::Unauthorized.into());
        }

        self.cancel_loaded(appointment, reason).await
    }

    pub async fn delete_appointment(&self, user: &User, appointment_id: Uuid) -> Result<(), AppError> {
        require_admin(user)?;
        debug!("Deleting appointment: {}", appointment_id);

        let appointment = self.load(appointment_id).await?;

        // Release before deleting so a failed release leaves a record to retry on.
        if appointment.is_active() {
            self.release(&appointment).await?;
        }

        if !self.appointments.delete(appointment_id).await? {
            return Err(AppointmentError::NotFound.into());
        }

        info!("Appointment {} deleted", appointment_id);
        Ok(())
    }

    async fn cancel_loaded(&self, appointment: Appointment, reason: Option<String>) -> Result<Appointment, AppError> {
        if appointment.status == AppointmentStatus::Cancelled {
            self.release(&appointment).await?;
            return Ok(appointment);
        }

        self.lifecycle
            .validate_status_transition(appointment.status, AppointmentStatus::Cancelled)?;

        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        let cancelled = match self
            .appointments
            .update_status(appointment.id, appointment.status, AppointmentStatus::Cancelled, reason)
            .await?
        {
            Some(cancelled) => cancelled,
            None => {
                // Lost a race; a concurrent cancel still counts.
                let current = self.load(appointment.id).await?;
                if current.status != AppointmentStatus::Cancelled {
                    warn!("Appointment {} moved to {} during cancel", current.id, current.status);
                    return Err(AppointmentError::StatusChanged(current.status).into());
                }
                current
            }
        };

        self.release(&cancelled).await?;

        info!("Appointment {} cancelled", cancelled.id);
        Ok(cancelled)
    }

    async fn release(&self, appointment: &Appointment) -> Result<(), AppError> {
        let released = self
            .availability
            .release_slot(appointment.availability_id, appointment.time, appointment.id)
            .await?;

        if released {
            info!(
                "Released slot {} of availability {}",
                appointment.time, appointment.availability_id
            );
        } else {
            debug!("Slot of appointment {} was not held", appointment.id);
        }
        Ok(())
    }

    /// Error for a status write whose expected status no longer holds.
    async fn status_changed(&self, appointment_id: Uuid) -> AppError {
        match self.load(appointment_id).await {
            Ok(current) => {
                warn!("Appointment {} moved to {} before the write", appointment_id, current.status);
                AppointmentError::StatusChanged(current.status).into()
            }
            Err(e) => e,
        }
    }

    async fn load(&self, appointment_id: Uuid) -> Result<Appointment, AppError> {
        self.appointments
            .get(appointment_id)
            .await?
            .ok_or_else(|| AppointmentError::NotFound.into())
    }

    fn can_view(user: &User, appointment: &Appointment) -> bool {
        match user.role {
            Role::Admin => true,
            Role::Doctor => appointment.doctor_id == user.id,
            Role::Patient => appointment.patient_id == user.id,
        }
    }
}
