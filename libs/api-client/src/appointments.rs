use reqwest::Method;
use uuid::Uuid;

use appointment_cell::models::{
    AppointmentListQuery, BookAppointmentRequest, CancelAppointmentRequest, UpdateStatusRequest,
};
use shared_models::appointment::{Appointment, AppointmentStatus};

use crate::client::{ClinicClient, Session};
use crate::error::ClientError;

impl ClinicClient {
    /// A new appointment starts out `pending` and holds its slot.
    pub async fn book_appointment(
        &self,
        session: &Session,
        request: &BookAppointmentRequest,
    ) -> Result<Appointment, ClientError> {
        self.execute(self.request(Method::POST, "/appointments", Some(session)).json(request))
            .await
    }

    pub async fn get_appointment(&self, session: &Session, appointment_id: Uuid) -> Result<Appointment, ClientError> {
        let path = format!("/appointments/{}", appointment_id);
        self.execute(self.request(Method::GET, &path, Some(session)))
            .await
    }

    /// Admin-wide listing.
    pub async fn list_appointments(
        &self,
        session: &Session,
        query: &AppointmentListQuery,
    ) -> Result<Vec<Appointment>, ClientError> {
        self.list_at("/appointments", session, query).await
    }

    /// The calling doctor's appointments.
    pub async fn doctor_appointments(
        &self,
        session: &Session,
        query: &AppointmentListQuery,
    ) -> Result<Vec<Appointment>, ClientError> {
        self.list_at("/appointments/doctor", session, query).await
    }

    /// The calling patient's appointments.
    pub async fn patient_appointments(
        &self,
        session: &Session,
        query: &AppointmentListQuery,
    ) -> Result<Vec<Appointment>, ClientError> {
        self.list_at("/appointments/patient", session, query).await
    }

    pub async fn update_appointment_status(
        &self,
        session: &Session,
        appointment_id: Uuid,
        status: AppointmentStatus,
        reason: Option<String>,
    ) -> Result<Appointment, ClientError> {
        let path = format!("/appointments/{}/status", appointment_id);
        let body = UpdateStatusRequest {
            status: status.to_string(),
            reason,
        };

        self.execute(self.request(Method::PUT, &path, Some(session)).json(&body))
            .await
    }

    pub async fn cancel_appointment(
        &self,
        session: &Session,
        appointment_id: Uuid,
        reason: Option<String>,
    ) -> Result<Appointment, ClientError> {
        let path = format!("/appointments/{}/cancel", appointment_id);
        let body = CancelAppointmentRequest { reason };

        self.execute(self.request(Method::PUT, &path, Some(session)).json(&body))
            .await
    }

    pub async fn delete_appointment(&self, session: &Session, appointment_id: Uuid) -> Result<(), ClientError> {
        let path = format!("/appointments/{}", appointment_id);
        self.execute_ack(self.request(Method::DELETE, &path, Some(session)))
            .await
    }

    async fn list_at(
        &self,
        path: &str,
        session: &Session,
        query: &AppointmentListQuery,
    ) -> Result<Vec<Appointment>, ClientError> {
        self.execute_list(
            self.request(Method::GET, path, Some(session)).query(query),
            "appointments",
        )
        .await
    }
}
