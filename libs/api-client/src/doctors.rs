use chrono::NaiveDate;
use reqwest::Method;
use uuid::Uuid;

use doctor_cell::models::{AvailabilityQuery, CreateAvailabilityRequest, UpdateTimeSlotsRequest};
use shared_models::availability::Availability;
use shared_models::doctor::{Doctor, DoctorSummary, DoctorUpdate};

use crate::client::{ClinicClient, Session};
use crate::error::ClientError;

impl ClinicClient {
    // ==========================================================================
    // DIRECTORY
    // ==========================================================================

    pub async fn list_doctors(
        &self,
        specialization: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<DoctorSummary>, ClientError> {
        let mut query = Vec::new();
        if let Some(specialization) = specialization {
            query.push(("specialization", specialization));
        }
        if let Some(search) = search {
            query.push(("search", search));
        }

        self.execute_list(self.request(Method::GET, "/doctors", None).query(&query), "doctors")
            .await
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, ClientError> {
        self.execute(self.request(Method::GET, &format!("/doctors/{}", doctor_id), None))
            .await
    }

    pub async fn search_doctors(&self, query: &str) -> Result<Vec<DoctorSummary>, ClientError> {
        let path = format!("/doctors/search/{}", urlencoding::encode(query));
        self.execute_list(self.request(Method::GET, &path, None), "doctors").await
    }

    pub async fn doctors_by_specialization(&self, specialization: &str) -> Result<Vec<DoctorSummary>, ClientError> {
        let path = format!("/doctors/specialization/{}", urlencoding::encode(specialization));
        self.execute_list(self.request(Method::GET, &path, None), "doctors").await
    }

    // ==========================================================================
    // PROFILE
    // ==========================================================================

    pub async fn doctor_profile(&self, session: &Session) -> Result<Doctor, ClientError> {
        self.execute(self.request(Method::GET, "/doctors/profile", Some(session)))
            .await
    }

    pub async fn update_doctor_profile(&self, session: &Session, update: &DoctorUpdate) -> Result<Doctor, ClientError> {
        self.execute(self.request(Method::PUT, "/doctors/profile", Some(session)).json(update))
            .await
    }

    pub async fn delete_doctor_profile(&self, session: Session) -> Result<(), ClientError> {
        self.execute_ack(self.request(Method::DELETE, "/doctors/profile", Some(&session)))
            .await
    }

    pub async fn admin_update_doctor(
        &self,
        session: &Session,
        doctor_id: Uuid,
        update: &DoctorUpdate,
    ) -> Result<Doctor, ClientError> {
        let path = format!("/doctors/admin/{}", doctor_id);
        self.execute(self.request(Method::PUT, &path, Some(session)).json(update))
            .await
    }

    pub async fn admin_delete_doctor(&self, session: &Session, doctor_id: Uuid) -> Result<(), ClientError> {
        let path = format!("/doctors/admin/{}", doctor_id);
        self.execute_ack(self.request(Method::DELETE, &path, Some(session)))
            .await
    }

    // ==========================================================================
    // AVAILABILITY
    // ==========================================================================

    pub async fn get_availability(
        &self,
        doctor_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Availability>, ClientError> {
        let path = format!("/availability/doctor/{}", doctor_id);
        let query = AvailabilityQuery { start_date, end_date };

        self.execute_list(self.request(Method::GET, &path, None).query(&query), "availability")
            .await
    }

    pub async fn my_availability(
        &self,
        session: &Session,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Availability>, ClientError> {
        let query = AvailabilityQuery { start_date, end_date };

        self.execute_list(
            self.request(Method::GET, "/availability", Some(session)).query(&query),
            "availability",
        )
        .await
    }

    pub async fn create_availability(
        &self,
        session: &Session,
        request: &CreateAvailabilityRequest,
    ) -> Result<Vec<Availability>, ClientError> {
        self.execute_list(
            self.request(Method::POST, "/availability", Some(session)).json(request),
            "availability",
        )
        .await
    }

    pub async fn update_time_slots(
        &self,
        session: &Session,
        availability_id: Uuid,
        time_slots: Vec<String>,
    ) -> Result<Availability, ClientError> {
        let path = format!("/availability/{}", availability_id);
        let body = UpdateTimeSlotsRequest { time_slots };

        self.execute(self.request(Method::PUT, &path, Some(session)).json(&body))
            .await
    }

    pub async fn delete_availability(&self, session: &Session, availability_id: Uuid) -> Result<(), ClientError> {
        let path = format!("/availability/{}", availability_id);
        self.execute_ack(self.request(Method::DELETE, &path, Some(session)))
            .await
    }
}
