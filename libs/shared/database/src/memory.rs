use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use shared_models::account::Account;
use shared_models::appointment::{Appointment, AppointmentFilter, AppointmentStatus};
use shared_models::auth::Role;
use shared_models::availability::{Availability, ReserveOutcome, SlotClaim, SlotTime, TimeSlot};
use shared_models::doctor::{Doctor, DoctorFilter, DoctorUpdate};
use shared_models::error::AppError;
use shared_models::patient::{Patient, PatientUpdate};

use crate::repositories::{
    AccountRepository, AppointmentRepository, AvailabilityRepository, DoctorRepository,
    PatientRepository,
};

#[derive(Default)]
struct Tables {
    accounts: HashMap<Uuid, Account>,
    doctors: HashMap<Uuid, Doctor>,
    patients: HashMap<Uuid, Patient>,
    availability: HashMap<Uuid, Availability>,
    appointments: HashMap<Uuid, Appointment>,
}

/// In-process store. Every mutation runs under a single write lock, so the
/// slot check-and-set cannot interleave with another booking.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn find_by_email(&self, email: &str, role: Role) -> Result<Option<Account>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .find(|a| a.role == role && a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert(&self, account: Account) -> Result<Account, AppError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .accounts
            .values()
            .any(|a| a.role == account.role && a.email.eq_ignore_ascii_case(&account.email));
        if taken {
            return Err(AppError::Conflict(format!(
                "An account with email {} already exists",
                account.email
            )));
        }
        tables.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tables.write().await.accounts.remove(&id).is_some())
    }
}

#[async_trait]
impl DoctorRepository for MemoryStore {
    async fn insert(&self, doctor: Doctor) -> Result<Doctor, AppError> {
        let mut tables = self.tables.write().await;
        tables.doctors.insert(doctor.id, doctor.clone());
        Ok(doctor)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Doctor>, AppError> {
        Ok(self.tables.read().await.doctors.get(&id).cloned())
    }

    async fn list(&self, filter: &DoctorFilter) -> Result<Vec<Doctor>, AppError> {
        let tables = self.tables.read().await;
        let mut doctors: Vec<Doctor> = tables
            .doctors
            .values()
            .filter(|d| !filter.active_only || d.is_active)
            .filter(|d| {
                filter
                    .specialization
                    .as_deref()
                    .map_or(true, |s| d.specialization.eq_ignore_ascii_case(s))
            })
            .filter(|d| filter.search.as_deref().map_or(true, |q| d.matches_text(q)))
            .cloned()
            .collect();
        doctors.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(doctors)
    }

    async fn update(&self, id: Uuid, update: DoctorUpdate) -> Result<Option<Doctor>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.doctors.get_mut(&id).map(|doctor| {
            update.apply_to(doctor);
            doctor.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tables.write().await.doctors.remove(&id).is_some())
    }
}

#[async_trait]
impl PatientRepository for MemoryStore {
    async fn insert(&self, patient: Patient) -> Result<Patient, AppError> {
        let mut tables = self.tables.write().await;
        tables.patients.insert(patient.id, patient.clone());
        Ok(patient)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Patient>, AppError> {
        Ok(self.tables.read().await.patients.get(&id).cloned())
    }

    async fn list(&self, search: Option<&str>) -> Result<Vec<Patient>, AppError> {
        let tables = self.tables.read().await;
        let mut patients: Vec<Patient> = tables
            .patients
            .values()
            .filter(|p| search.map_or(true, |q| p.matches_text(q)))
            .cloned()
            .collect();
        patients.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(patients)
    }

    async fn update(&self, id: Uuid, update: PatientUpdate) -> Result<Option<Patient>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.patients.get_mut(&id).map(|patient| {
            update.apply_to(patient);
            patient.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tables.write().await.patients.remove(&id).is_some())
    }
}

#[async_trait]
impl AvailabilityRepository for MemoryStore {
    async fn upsert_day(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        times: &[SlotTime],
    ) -> Result<Availability, AppError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        let existing_id = tables
            .availability
            .values()
            .find(|a| a.doctor_id == doctor_id && a.date == date)
            .map(|a| a.id);

        let id = existing_id.unwrap_or_else(Uuid::new_v4);
        let day = tables.availability.entry(id).or_insert_with(|| Availability {
            id,
            doctor_id,
            date,
            time_slots: Vec::new(),
            created_at: now,
            updated_at: now,
        });

        for time in times {
            if day.slot(*time).is_none() {
                day.time_slots.push(TimeSlot::open(*time));
            }
        }
        day.sort_slots();
        day.updated_at = now;

        Ok(day.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Availability>, AppError> {
        Ok(self.tables.read().await.availability.get(&id).cloned())
    }

    async fn list_for_doctor(
        &self,
        doctor_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Availability>, AppError> {
        let tables = self.tables.read().await;
        let mut days: Vec<Availability> = tables
            .availability
            .values()
            .filter(|a| a.doctor_id == doctor_id)
            .filter(|a| start.map_or(true, |s| a.date >= s))
            .filter(|a| end.map_or(true, |e| a.date <= e))
            .cloned()
            .collect();
        days.sort_by_key(|a| a.date);
        Ok(days)
    }

    async fn replace_times(&self, id: Uuid, times: &[SlotTime]) -> Result<Availability, AppError> {
        let mut tables = self.tables.write().await;
        let day = tables
            .availability
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Availability not found".to_string()))?;

        if let Some(dropped) = day
            .time_slots
            .iter()
            .find(|slot| slot.is_booked && !times.contains(&slot.time))
        {
            return Err(AppError::Conflict(format!(
                "Time slot {} is booked and cannot be removed",
                dropped.time
            )));
        }

        day.time_slots.retain(|slot| slot.is_booked || times.contains(&slot.time));
        for time in times {
            if day.slot(*time).is_none() {
                day.time_slots.push(TimeSlot::open(*time));
            }
        }
        day.sort_slots();
        day.updated_at = Utc::now();

        Ok(day.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let has_bookings = match tables.availability.get(&id) {
            None => return Ok(false),
            Some(day) => day.has_bookings(),
        };

        if has_bookings {
            return Err(AppError::Conflict(
                "Availability has booked time slots and cannot be deleted".to_string(),
            ));
        }

        Ok(tables.availability.remove(&id).is_some())
    }

    async fn reserve_slot(&self, claim: &SlotClaim) -> Result<ReserveOutcome, AppError> {
        let mut tables = self.tables.write().await;
        let Some(day) = tables.availability.get_mut(&claim.availability_id) else {
            return Ok(ReserveOutcome::UnknownSlot);
        };
        let Some(slot) = day.time_slots.iter_mut().find(|s| s.time == claim.time) else {
            return Ok(ReserveOutcome::UnknownSlot);
        };

        if slot.is_booked {
            return Ok(ReserveOutcome::AlreadyBooked);
        }

        slot.is_booked = true;
        slot.patient_id = Some(claim.patient_id);
        slot.appointment_id = Some(claim.appointment_id);
        let reserved = slot.clone();
        day.updated_at = Utc::now();

        Ok(ReserveOutcome::Reserved(reserved))
    }

    async fn release_slot(
        &self,
        availability_id: Uuid,
        time: SlotTime,
        appointment_id: Uuid,
    ) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .availability
            .get_mut(&availability_id)
            .and_then(|day| day.time_slots.iter_mut().find(|s| s.time == time))
            .filter(|slot| slot.appointment_id == Some(appointment_id));

        match slot {
            Some(slot) => {
                *slot = TimeSlot::open(time);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl AppointmentRepository for MemoryStore {
    async fn insert(&self, appointment: Appointment) -> Result<Appointment, AppError> {
        let mut tables = self.tables.write().await;
        if tables.appointments.contains_key(&appointment.id) {
            return Err(AppError::Conflict("Appointment already exists".to_string()));
        }
        tables.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>, AppError> {
        Ok(self.tables.read().await.appointments.get(&id).cloned())
    }

    async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, AppError> {
        let tables = self.tables.read().await;
        let mut appointments: Vec<Appointment> = tables
            .appointments
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        appointments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(appointments)
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: AppointmentStatus,
        status: AppointmentStatus,
        cancellation_reason: Option<String>,
    ) -> Result<Option<Appointment>, AppError> {
        let mut tables = self.tables.write().await;
        let current = tables
            .appointments
            .get_mut(&id)
            .filter(|appointment| appointment.status == expected);
        Ok(current.map(|appointment| {
            appointment.status = status;
            if cancellation_reason.is_some() {
                appointment.cancellation_reason = cancellation_reason;
            }
            appointment.updated_at = Utc::now();
            appointment.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tables.write().await.appointments.remove(&id).is_some())
    }
}
