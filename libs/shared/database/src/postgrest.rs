use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};
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
use crate::supabase::SupabaseClient;

const AVAILABILITY_SELECT: &str = "select=*,availability_time_slots(*)";

/// Repositories backed by Supabase's PostgREST interface.
///
/// Tables: `accounts`, `doctors`, `patients`, `availabilities`,
/// `availability_time_slots` (unique on `availability_id, slot_time`) and
/// `appointments`.
pub struct SupabaseStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    async fn fetch_one<T>(&self, path: &str) -> Result<Option<T>, AppError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let rows: Vec<T> = self.supabase.request(Method::GET, path, None).await?;
        Ok(rows.into_iter().next())
    }

    async fn find_day(&self, doctor_id: Uuid, date: NaiveDate) -> Result<Option<AvailabilityRow>, AppError> {
        let path = format!(
            "/rest/v1/availabilities?doctor_id=eq.{}&date=eq.{}&{}",
            doctor_id, date, AVAILABILITY_SELECT
        );
        self.fetch_one(&path).await
    }

    async fn insert_missing_times(&self, availability_id: Uuid, times: &[SlotTime]) -> Result<(), AppError> {
        if times.is_empty() {
            return Ok(());
        }

        let rows: Vec<Value> = times
            .iter()
            .map(|time| {
                json!({
                    "availability_id": availability_id,
                    "slot_time": slot_param(*time),
                    "is_booked": false,
                    "patient_id": null,
                    "appointment_id": null
                })
            })
            .collect();

        let _: Vec<Value> = self
            .supabase
            .returning_with_prefer(
                Method::POST,
                "/rest/v1/availability_time_slots?on_conflict=availability_id,slot_time",
                Some(Value::Array(rows)),
                "resolution=ignore-duplicates,return=representation",
            )
            .await?;

        let touch = format!("/rest/v1/availabilities?id=eq.{}", availability_id);
        let _: Vec<Value> = self
            .supabase
            .returning(
                Method::PATCH,
                &touch,
                Some(json!({ "updated_at": Utc::now().to_rfc3339() })),
            )
            .await?;

        Ok(())
    }

    async fn require_day(&self, id: Uuid) -> Result<Availability, AppError> {
        AvailabilityRepository::get(self, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Availability not found".to_string()))
    }
}

fn slot_param(time: SlotTime) -> String {
    time.time().format("%H:%M:%S").to_string()
}

/// Strip characters that carry meaning in PostgREST filter syntax.
fn search_term(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '*' | '"'))
        .collect();
    urlencoding::encode(&cleaned).into_owned()
}

fn ilike_any(columns: &[&str], raw: &str) -> String {
    let term = search_term(raw);
    let clauses: Vec<String> = columns
        .iter()
        .map(|column| format!("{}.ilike.*{}*", column, term))
        .collect();
    format!("or=({})", clauses.join(","))
}

// ---------------------------------------------------------------------------
// Row shapes (snake_case columns)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DoctorRow {
    id: Uuid,
    full_name: String,
    email: String,
    specialization: String,
    bio: Option<String>,
    profile_image_url: Option<String>,
    phone: Option<String>,
    gender: Option<String>,
    address: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DoctorRow> for Doctor {
    fn from(row: DoctorRow) -> Self {
        Doctor {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            specialization: row.specialization,
            bio: row.bio,
            profile_image_url: row.profile_image_url,
            phone: row.phone,
            gender: row.gender,
            address: row.address,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PatientRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    gender: Option<String>,
    date_of_birth: Option<NaiveDate>,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PatientRow> for Patient {
    fn from(row: PatientRow) -> Self {
        Patient {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            gender: row.gender,
            date_of_birth: row.date_of_birth,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TimeSlotRow {
    slot_time: NaiveTime,
    is_booked: bool,
    patient_id: Option<Uuid>,
    appointment_id: Option<Uuid>,
}

impl From<TimeSlotRow> for TimeSlot {
    fn from(row: TimeSlotRow) -> Self {
        TimeSlot {
            time: SlotTime::new(row.slot_time),
            is_booked: row.is_booked,
            patient_id: row.patient_id,
            appointment_id: row.appointment_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AvailabilityRow {
    id: Uuid,
    doctor_id: Uuid,
    date: NaiveDate,
    #[serde(default)]
    availability_time_slots: Vec<TimeSlotRow>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AvailabilityRow> for Availability {
    fn from(row: AvailabilityRow) -> Self {
        let mut availability = Availability {
            id: row.id,
            doctor_id: row.doctor_id,
            date: row.date,
            time_slots: row.availability_time_slots.into_iter().map(TimeSlot::from).collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        };
        availability.sort_slots();
        availability
    }
}

#[derive(Debug, Deserialize)]
struct AppointmentRow {
    id: Uuid,
    appointment_code: String,
    doctor_id: Uuid,
    patient_id: Uuid,
    availability_id: Uuid,
    date: NaiveDate,
    slot_time: NaiveTime,
    patient_name: String,
    patient_email: String,
    patient_phone: String,
    symptoms: String,
    doctor_name: String,
    department: String,
    status: AppointmentStatus,
    cancellation_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AppointmentRow> for Appointment {
    fn from(row: AppointmentRow) -> Self {
        Appointment {
            id: row.id,
            appointment_code: row.appointment_code,
            doctor_id: row.doctor_id,
            patient_id: row.patient_id,
            availability_id: row.availability_id,
            date: row.date,
            time: SlotTime::new(row.slot_time),
            patient_name: row.patient_name,
            patient_email: row.patient_email,
            patient_phone: row.patient_phone,
            symptoms: row.symptoms,
            doctor_name: row.doctor_name,
            department: row.department,
            status: row.status,
            cancellation_reason: row.cancellation_reason,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[async_trait]
impl AccountRepository for SupabaseStore {
    async fn find_by_email(&self, email: &str, role: Role) -> Result<Option<Account>, AppError> {
        let path = format!(
            "/rest/v1/accounts?email=eq.{}&role=eq.{}",
            urlencoding::encode(&email.to_lowercase()),
            role
        );
        self.fetch_one(&path).await
    }

    async fn insert(&self, account: Account) -> Result<Account, AppError> {
        let body = json!({
            "id": account.id,
            "email": account.email.to_lowercase(),
            "role": account.role,
            "password_hash": account.password_hash,
            "created_at": account.created_at.to_rfc3339()
        });

        let rows: Vec<Account> = self
            .supabase
            .returning(Method::POST, "/rest/v1/accounts", Some(body))
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => AppError::Conflict(format!(
                    "An account with email {} already exists",
                    account.email
                )),
                other => other,
            })?;

        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::Database("Failed to create account".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let path = format!("/rest/v1/accounts?id=eq.{}", id);
        let rows: Vec<Value> = self.supabase.returning(Method::DELETE, &path, None).await?;
        Ok(!rows.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Doctors
// ---------------------------------------------------------------------------

#[async_trait]
impl DoctorRepository for SupabaseStore {
    async fn insert(&self, doctor: Doctor) -> Result<Doctor, AppError> {
        debug!("Persisting doctor {}", doctor.id);

        let body = json!({
            "id": doctor.id,
            "full_name": doctor.full_name,
            "email": doctor.email,
            "specialization": doctor.specialization,
            "bio": doctor.bio,
            "profile_image_url": doctor.profile_image_url,
            "phone": doctor.phone,
            "gender": doctor.gender,
            "address": doctor.address,
            "is_active": doctor.is_active,
            "created_at": doctor.created_at.to_rfc3339(),
            "updated_at": doctor.updated_at.to_rfc3339()
        });

        let rows: Vec<DoctorRow> = self.supabase.returning(Method::POST, "/rest/v1/doctors", Some(body)).await?;
        rows.into_iter()
            .next()
            .map(Doctor::from)
            .ok_or_else(|| AppError::Database("Failed to create doctor profile".to_string()))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Doctor>, AppError> {
        let path = format!("/rest/v1/doctors?id=eq.{}", id);
        Ok(self.fetch_one::<DoctorRow>(&path).await?.map(Doctor::from))
    }

    async fn list(&self, filter: &DoctorFilter) -> Result<Vec<Doctor>, AppError> {
        let mut query_parts = vec!["order=full_name.asc".to_string()];

        if filter.active_only {
            query_parts.push("is_active=eq.true".to_string());
        }
        if let Some(specialization) = &filter.specialization {
            query_parts.push(format!("specialization=ilike.{}", search_term(specialization)));
        }
        if let Some(search) = &filter.search {
            query_parts.push(ilike_any(&["full_name", "email", "specialization", "phone"], search));
        }

        let path = format!("/rest/v1/doctors?{}", query_parts.join("&"));
        let rows: Vec<DoctorRow> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().map(Doctor::from).collect())
    }

    async fn update(&self, id: Uuid, update: DoctorUpdate) -> Result<Option<Doctor>, AppError> {
        let mut update_data = Map::new();

        if let Some(full_name) = update.full_name {
            update_data.insert("full_name".to_string(), json!(full_name));
        }
        if let Some(specialization) = update.specialization {
            update_data.insert("specialization".to_string(), json!(specialization));
        }
        if let Some(bio) = update.bio {
            update_data.insert("bio".to_string(), json!(bio));
        }
        if let Some(url) = update.profile_image_url {
            update_data.insert("profile_image_url".to_string(), json!(url));
        }
        if let Some(phone) = update.phone {
            update_data.insert("phone".to_string(), json!(phone));
        }
        if let Some(gender) = update.gender {
            update_data.insert("gender".to_string(), json!(gender));
        }
        if let Some(address) = update.address {
            update_data.insert("address".to_string(), json!(address));
        }
        if let Some(is_active) = update.is_active {
            update_data.insert("is_active".to_string(), json!(is_active));
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/doctors?id=eq.{}", id);
        let rows: Vec<DoctorRow> = self
            .supabase
            .returning(Method::PATCH, &path, Some(Value::Object(update_data)))
            .await?;
        Ok(rows.into_iter().next().map(Doctor::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let path = format!("/rest/v1/doctors?id=eq.{}", id);
        let rows: Vec<Value> = self.supabase.returning(Method::DELETE, &path, None).await?;
        Ok(!rows.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Patients
// ---------------------------------------------------------------------------

#[async_trait]
impl PatientRepository for SupabaseStore {
    async fn insert(&self, patient: Patient) -> Result<Patient, AppError> {
        let body = json!({
            "id": patient.id,
            "first_name": patient.first_name,
            "last_name": patient.last_name,
            "email": patient.email,
            "phone": patient.phone,
            "gender": patient.gender,
            "date_of_birth": patient.date_of_birth,
            "address": patient.address,
            "created_at": patient.created_at.to_rfc3339(),
            "updated_at": patient.updated_at.to_rfc3339()
        });

        let rows: Vec<PatientRow> = self.supabase.returning(Method::POST, "/rest/v1/patients", Some(body)).await?;
        rows.into_iter()
            .next()
            .map(Patient::from)
            .ok_or_else(|| AppError::Database("Failed to create patient profile".to_string()))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Patient>, AppError> {
        let path = format!("/rest/v1/patients?id=eq.{}", id);
        Ok(self.fetch_one::<PatientRow>(&path).await?.map(Patient::from))
    }

    async fn list(&self, search: Option<&str>) -> Result<Vec<Patient>, AppError> {
        let mut path = "/rest/v1/patients?order=created_at.desc".to_string();
        if let Some(search) = search {
            path.push('&');
            path.push_str(&ilike_any(&["first_name", "last_name", "email", "phone"], search));
        }

        let rows: Vec<PatientRow> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().map(Patient::from).collect())
    }

    async fn update(&self, id: Uuid, update: PatientUpdate) -> Result<Option<Patient>, AppError> {
        let mut update_data = Map::new();

        if let Some(first_name) = update.first_name {
            update_data.insert("first_name".to_string(), json!(first_name));
        }
        if let Some(last_name) = update.last_name {
            update_data.insert("last_name".to_string(), json!(last_name));
        }
        if let Some(phone) = update.phone {
            update_data.insert("phone".to_string(), json!(phone));
        }
        if let Some(gender) = update.gender {
            update_data.insert("gender".to_string(), json!(gender));
        }
        if let Some(dob) = update.date_of_birth {
            update_data.insert("date_of_birth".to_string(), json!(dob));
        }
        if let Some(address) = update.address {
            update_data.insert("address".to_string(), json!(address));
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/patients?id=eq.{}", id);
        let rows: Vec<PatientRow> = self
            .supabase
            .returning(Method::PATCH, &path, Some(Value::Object(update_data)))
            .await?;
        Ok(rows.into_iter().next().map(Patient::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let path = format!("/rest/v1/patients?id=eq.{}", id);
        let rows: Vec<Value> = self.supabase.returning(Method::DELETE, &path, None).await?;
        Ok(!rows.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

#[async_trait]
impl AvailabilityRepository for SupabaseStore {
    async fn upsert_day(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        times: &[SlotTime],
    ) -> Result<Availability, AppError> {
        let availability_id = match self.find_day(doctor_id, date).await? {
            Some(existing) => existing.id,
            None => {
                let now = Utc::now().to_rfc3339();
                let body = json!({
                    "id": Uuid::new_v4(),
                    "doctor_id": doctor_id,
                    "date": date,
                    "created_at": now,
                    "updated_at": now
                });

                match self
                    .supabase
                    .returning::<AvailabilityRow>(Method::POST, "/rest/v1/availabilities", Some(body))
                    .await
                {
                    Ok(rows) => rows
                        .into_iter()
                        .next()
                        .map(|row| row.id)
                        .ok_or_else(|| AppError::Database("Failed to create availability".to_string()))?,
                    // Another request created the same day first.
                    Err(AppError::Conflict(_)) => {
                        warn!("Availability for doctor {} on {} created concurrently", doctor_id, date);
                        self.find_day(doctor_id, date)
                            .await?
                            .map(|row| row.id)
                            .ok_or_else(|| AppError::Database("Failed to create availability".to_string()))?
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        self.insert_missing_times(availability_id, times).await?;
        self.require_day(availability_id).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Availability>, AppError> {
        let path = format!("/rest/v1/availabilities?id=eq.{}&{}", id, AVAILABILITY_SELECT);
        Ok(self.fetch_one::<AvailabilityRow>(&path).await?.map(Availability::from))
    }

    async fn list_for_doctor(
        &self,
        doctor_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Availability>, AppError> {
        let mut path = format!(
            "/rest/v1/availabilities?doctor_id=eq.{}&{}&order=date.asc",
            doctor_id, AVAILABILITY_SELECT
        );
        if let Some(start) = start {
            path.push_str(&format!("&date=gte.{}", start));
        }
        if let Some(end) = end {
            path.push_str(&format!("&date=lte.{}", end));
        }

        let rows: Vec<AvailabilityRow> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().map(Availability::from).collect())
    }

    async fn replace_times(&self, id: Uuid, times: &[SlotTime]) -> Result<Availability, AppError> {
        let current = self.require_day(id).await?;

        if let Some(dropped) = current
            .time_slots
            .iter()
            .find(|slot| slot.is_booked && !times.contains(&slot.time))
        {
            return Err(AppError::Conflict(format!(
                "Time slot {} is booked and cannot be removed",
                dropped.time
            )));
        }

        let keep: Vec<String> = times.iter().map(|t| slot_param(*t)).collect();
        // `is_booked=eq.false` keeps a slot booked in the meantime.
        let path = format!(
            "/rest/v1/availability_time_slots?availability_id=eq.{}&is_booked=eq.false&slot_time=not.in.({})",
            id,
            keep.join(",")
        );
        let _: Vec<Value> = self.supabase.returning(Method::DELETE, &path, None).await?;

        let missing: Vec<SlotTime> = times
            .iter()
            .copied()
            .filter(|t| current.slot(*t).is_none())
            .collect();
        self.insert_missing_times(id, &missing).await?;

        self.require_day(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let Some(current) = AvailabilityRepository::get(self, id).await? else {
            return Ok(false);
        };
        if current.has_bookings() {
            return Err(AppError::Conflict(
                "Availability has booked time slots and cannot be deleted".to_string(),
            ));
        }

        let slots_path = format!(
            "/rest/v1/availability_time_slots?availability_id=eq.{}&is_booked=eq.false",
            id
        );
        let _: Vec<Value> = self.supabase.returning(Method::DELETE, &slots_path, None).await?;

        let path = format!("/rest/v1/availabilities?id=eq.{}", id);
        let rows: Vec<Value> = self.supabase.returning(Method::DELETE, &path, None).await?;
        Ok(!rows.is_empty())
    }

    async fn reserve_slot(&self, claim: &SlotClaim) -> Result<ReserveOutcome, AppError> {
        let slot_path = format!(
            "/rest/v1/availability_time_slots?availability_id=eq.{}&slot_time=eq.{}",
            claim.availability_id,
            slot_param(claim.time)
        );

        // Conditional update: only matches while the slot is still free.
        let cas_path = format!("{}&is_booked=eq.false", slot_path);
        let body = json!({
            "is_booked": true,
            "patient_id": claim.patient_id,
            "appointment_id": claim.appointment_id
        });
        let updated: Vec<TimeSlotRow> = self.supabase.returning(Method::PATCH, &cas_path, Some(body)).await?;

        if let Some(row) = updated.into_iter().next() {
            return Ok(ReserveOutcome::Reserved(row.into()));
        }

        let existing: Option<TimeSlotRow> = self.fetch_one(&slot_path).await?;
        Ok(match existing {
            Some(_) => ReserveOutcome::AlreadyBooked,
            None => ReserveOutcome::UnknownSlot,
        })
    }

    async fn release_slot(
        &self,
        availability_id: Uuid,
        time: SlotTime,
        appointment_id: Uuid,
    ) -> Result<bool, AppError> {
        let path = format!(
            "/rest/v1/availability_time_slots?availability_id=eq.{}&slot_time=eq.{}&appointment_id=eq.{}",
            availability_id,
            slot_param(time),
            appointment_id
        );
        let body = json!({
            "is_booked": false,
            "patient_id": null,
            "appointment_id": null
        });

        let rows: Vec<Value> = self.supabase.returning(Method::PATCH, &path, Some(body)).await?;
        Ok(!rows.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

#[async_trait]
impl AppointmentRepository for SupabaseStore {
    async fn insert(&self, appointment: Appointment) -> Result<Appointment, AppError> {
        let body = json!({
            "id": appointment.id,
            "appointment_code": appointment.appointment_code,
            "doctor_id": appointment.doctor_id,
            "patient_id": appointment.patient_id,
            "availability_id": appointment.availability_id,
            "date": appointment.date,
            "slot_time": slot_param(appointment.time),
            "patient_name": appointment.patient_name,
            "patient_email": appointment.patient_email,
            "patient_phone": appointment.patient_phone,
            "symptoms": appointment.symptoms,
            "doctor_name": appointment.doctor_name,
            "department": appointment.department,
            "status": appointment.status,
            "cancellation_reason": appointment.cancellation_reason,
            "created_at": appointment.created_at.to_rfc3339(),
            "updated_at": appointment.updated_at.to_rfc3339()
        });

        let rows: Vec<AppointmentRow> = self
            .supabase
            .returning(Method::POST, "/rest/v1/appointments", Some(body))
            .await?;
        rows.into_iter()
            .next()
            .map(Appointment::from)
            .ok_or_else(|| AppError::Database("Failed to create appointment".to_string()))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>, AppError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        Ok(self.fetch_one::<AppointmentRow>(&path).await?.map(Appointment::from))
    }

    async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, AppError> {
        let mut query_parts = vec!["order=created_at.desc".to_string()];

        if let Some(doctor_id) = filter.doctor_id {
            query_parts.push(format!("doctor_id=eq.{}", doctor_id));
        }
        if let Some(patient_id) = filter.patient_id {
            query_parts.push(format!("patient_id=eq.{}", patient_id));
        }
        if let Some(status) = filter.status {
            query_parts.push(format!("status=eq.{}", status));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query_parts.push(ilike_any(
                &["patient_name", "patient_email", "doctor_name", "appointment_code"],
                search,
            ));
        }

        let path = format!("/rest/v1/appointments?{}", query_parts.join("&"));
        let rows: Vec<AppointmentRow> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: AppointmentStatus,
        status: AppointmentStatus,
        cancellation_reason: Option<String>,
    ) -> Result<Option<Appointment>, AppError> {
        let mut update_data = Map::new();
        update_data.insert("status".to_string(), json!(status));
        if let Some(reason) = cancellation_reason {
            update_data.insert("cancellation_reason".to_string(), json!(reason));
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/appointments?id=eq.{}&status=eq.{}", id, expected);
        let rows: Vec<AppointmentRow> = self
            .supabase
            .returning(Method::PATCH, &path, Some(Value::Object(update_data)))
            .await?;
        Ok(rows.into_iter().next().map(Appointment::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let rows: Vec<Value> = self.supabase.returning(Method::DELETE, &path, None).await?;
        Ok(!rows.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_terms_drop_filter_syntax() {
        assert_eq!(search_term("smith, (jr)"), "smith%20jr");
    }

    #[test]
    fn ilike_any_builds_or_clause() {
        assert_eq!(
            ilike_any(&["full_name", "email"], "ann"),
            "or=(full_name.ilike.*ann*,email.ilike.*ann*)"
        );
    }

    #[test]
    fn slot_times_use_sql_time_format() {
        let time: SlotTime = "2:30 PM".parse().unwrap();
        assert_eq!(slot_param(time), "14:30:00");
    }
}
