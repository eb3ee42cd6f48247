#![allow(dead_code)]

use chrono::NaiveDate;
use uuid::Uuid;

use appointment_cell::models::BookAppointmentRequest;
use doctor_cell::models::{CreateAvailabilityRequest, NewDoctor};
use doctor_cell::services::{AvailabilityService, DoctorService};
use shared_database::AppState;
use shared_models::availability::Availability;
use shared_utils::test_utils::TestUser;

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
}

pub async fn seed_doctor(state: &AppState, name: &str, specialization: &str) -> TestUser {
    let user = TestUser::doctor(&format!("{}@clinic.test", name.to_lowercase().replace(' ', ".")));
    DoctorService::new(state)
        .create_doctor(
            user.id,
            NewDoctor {
                full_name: name.to_string(),
                email: user.email.clone(),
                specialization: specialization.to_string(),
                ..NewDoctor::default()
            },
        )
        .await
        .unwrap();
    user
}

pub async fn seed_day(state: &AppState, doctor: &TestUser, day: u32, labels: &[&str]) -> Availability {
    AvailabilityService::new(state)
        .create_availability(
            &doctor.to_user(),
            CreateAvailabilityRequest {
                start_date: date(day),
                end_date: None,
                time_slots: labels.iter().map(|s| s.to_string()).collect(),
            },
        )
        .await
        .unwrap()
        .remove(0)
}

pub fn booking(doctor_id: Uuid, day: &Availability, time: &str, name: &str) -> BookAppointmentRequest {
    BookAppointmentRequest {
        doctor_id,
        availability_id: day.id,
        date: day.date,
        time: time.to_string(),
        patient_name: name.to_string(),
        patient_email: format!("{}@mail.test", name.to_lowercase()),
        patient_phone: "+1 555 010 2030".to_string(),
        symptoms: "Chest pain".to_string(),
    }
}
