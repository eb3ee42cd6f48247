use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use shared_models::account::Account;
use shared_models::appointment::{Appointment, AppointmentFilter, AppointmentStatus};
use shared_models::auth::Role;
use shared_models::availability::{Availability, ReserveOutcome, SlotClaim, SlotTime};
use shared_models::doctor::{Doctor, DoctorFilter, DoctorUpdate};
use shared_models::error::AppError;
use shared_models::patient::{Patient, PatientUpdate};

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_email(&self, email: &str, role: Role) -> Result<Option<Account>, AppError>;

    /// Fails with `AppError::Conflict` when the (email, role) pair is taken.
    async fn insert(&self, account: Account) -> Result<Account, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait DoctorRepository: Send + Sync {
    async fn insert(&self, doctor: Doctor) -> Result<Doctor, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Doctor>, AppError>;

    /// Ordered by full name.
    async fn list(&self, filter: &DoctorFilter) -> Result<Vec<Doctor>, AppError>;

    async fn update(&self, id: Uuid, update: DoctorUpdate) -> Result<Option<Doctor>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn insert(&self, patient: Patient) -> Result<Patient, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Patient>, AppError>;

    async fn list(&self, search: Option<&str>) -> Result<Vec<Patient>, AppError>;

    async fn update(&self, id: Uuid, update: PatientUpdate) -> Result<Option<Patient>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Create the slot set for (doctor, date) or merge `times` into the
    /// existing one. Booked slots keep their state.
    async fn upsert_day(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        times: &[SlotTime],
    ) -> Result<Availability, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Availability>, AppError>;

    /// Date-ordered, bounds inclusive.
    async fn list_for_doctor(
        &self,
        doctor_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Availability>, AppError>;

    /// Replace the labels of one date. Fails with `AppError::Conflict` if a
    /// booked label would be dropped, `AppError::NotFound` if `id` is unknown.
    async fn replace_times(&self, id: Uuid, times: &[SlotTime]) -> Result<Availability, AppError>;

    /// Fails with `AppError::Conflict` while any slot is booked.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Atomic check-and-set: mark the slot booked only if it is currently free.
    async fn reserve_slot(&self, claim: &SlotClaim) -> Result<ReserveOutcome, AppError>;

    /// Free the slot, but only while it is still held by `appointment_id`.
    /// Returns whether anything was released.
    async fn release_slot(
        &self,
        availability_id: Uuid,
        time: SlotTime,
        appointment_id: Uuid,
    ) -> Result<bool, AppError>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn insert(&self, appointment: Appointment) -> Result<Appointment, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>, AppError>;

    /// Newest first.
    async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, AppError>;

    /// Compare-and-set: writes `status` only while the stored status is still
    /// `expected`. `None` when no appointment with that id is in `expected`.
    async fn update_status(
        &self,
        id: Uuid,
        expected: AppointmentStatus,
        status: AppointmentStatus,
        cancellation_reason: Option<String>,
    ) -> Result<Option<Appointment>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
