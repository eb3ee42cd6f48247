use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::repositories::{AvailabilityRepository, DoctorRepository};
use shared_database::AppState;
use shared_models::auth::User;
use shared_models::availability::Availability;
use shared_models::error::AppError;

use crate::models::{parse_time_labels, AvailabilityError, CreateAvailabilityRequest};

pub struct AvailabilityService {
    availability: Arc<dyn AvailabilityRepository>,
    doctors: Arc<dyn DoctorRepository>,
    max_days: i64,
}

impl AvailabilityService {
    pub fn new(state: &AppState) -> Self {
        Self {
            availability: state.store.availability.clone(),
            doctors: state.store.doctors.clone(),
            max_days: state.config.max_availability_days,
        }
    }

    /// Create (or merge into) one slot set per date of the requested range.
    pub async fn create_availability(
        &self,
        user: &User,
        request: CreateAvailabilityRequest,
    ) -> Result<Vec<Availability>, AppError> {
        if !user.is_doctor() {
            return Err(AvailabilityError::NotDoctor.into());
        }
        let doctor_id = user.id;
        debug!("Creating availability for doctor: {}", doctor_id);

        let end_date = request.end_date.unwrap_or(request.start_date);
        let dates = self.date_range(request.start_date, end_date)?;
        let times = parse_time_labels(&request.time_slots)?;

        self.require_doctor(doctor_id).await?;

        let mut created = Vec::with_capacity(dates.len());
        for date in dates {
            created.push(self.availability.upsert_day(doctor_id, date, &times).await?);
        }

        info!(
            "Availability saved for doctor {}: {} day(s), {} slot(s) per day",
            doctor_id,
            created.len(),
            times.len()
        );
        Ok(created)
    }

    /// Slot sets of one doctor, date-ordered and limited to `[start, end]`.
    pub async fn get_availability(
        &self,
        doctor_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Availability>, AppError> {
        debug!("Fetching availability for doctor {} between {:?} and {:?}", doctor_id, start, end);

        self.require_doctor(doctor_id).await?;
        self.availability.list_for_doctor(doctor_id, start, end).await
    }

    pub async fn get_my_availability(
        &self,
        user: &User,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Availability>, AppError> {
        if !user.is_doctor() {
            return Err(AvailabilityError::NotDoctor.into());
        }
        self.get_availability(user.id, start, end).await
    }

    pub async fn update_time_slots(
        &self,
        user: &User,
        availability_id: Uuid,
        labels: &[String],
    ) -> Result<Availability, AppError> {
        debug!("Replacing time slots of availability {}", availability_id);

        let times = parse_time_labels(labels)?;
        self.require_owned(user, availability_id).await?;

        let updated = self.availability.replace_times(availability_id, &times).await?;
        info!("Availability {} now has {} slot(s)", availability_id, updated.time_slots.len());
        Ok(updated)
    }

    pub async fn delete_availability(&self, user: &User, availability_id: Uuid) -> Result<(), AppError> {
        debug!("Deleting availability {}", availability_id);

        self.require_owned(user, availability_id).await?;

        if !self.availability.delete(availability_id).await? {
            return Err(AvailabilityError::NotFound.into());
        }
        info!("Availability {} deleted", availability_id);
        Ok(())
    }

    fn date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, AvailabilityError> {
        if end < start {
            return Err(AvailabilityError::InvalidRange);
        }

        let days = (end - start).num_days() + 1;
        if days > self.max_days {
            return Err(AvailabilityError::RangeTooLong {
                days,
                max: self.max_days,
            });
        }

        Ok((0..days).map(|offset| start + Duration::days(offset)).collect())
    }

    async fn require_doctor(&self, doctor_id: Uuid) -> Result<(), AppError> {
        match self.doctors.get(doctor_id).await? {
            Some(_) => Ok(()),
            None => Err(AvailabilityError::DoctorNotFound.into()),
        }
    }

    async fn require_owned(&self, user: &User, availability_id: Uuid) -> Result<Availability, AppError> {
        let day = self
            .availability
            .get(availability_id)
            .await?
            .ok_or(AvailabilityError::NotFound)?;

        if !user.is_admin() && !(user.is_doctor() && day.doctor_id == user.id) {
            warn!("User {} tried to modify availability {} owned by {}", user.id, availability_id, day.doctor_id);
            return Err(AvailabilityError::NotOwner.into());
        }
        Ok(day)
    }
}
