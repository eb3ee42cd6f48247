use reqwest::Method;
use uuid::Uuid;

use shared_models::patient::{Patient, PatientUpdate};

use crate::client::{ClinicClient, Session};
use crate::error::ClientError;

impl ClinicClient {
    pub async fn patient_profile(&self, session: &Session) -> Result<Patient, ClientError> {
        self.execute(self.request(Method::GET, "/patients/profile", Some(session)))
            .await
    }

    pub async fn update_patient_profile(
        &self,
        session: &Session,
        update: &PatientUpdate,
    ) -> Result<Patient, ClientError> {
        self.execute(self.request(Method::PUT, "/patients/profile", Some(session)).json(update))
            .await
    }

    /// Deleting the profile also removes the login, so the session is consumed.
    pub async fn delete_patient_profile(&self, session: Session) -> Result<(), ClientError> {
        self.execute_ack(self.request(Method::DELETE, "/patients/profile", Some(&session)))
            .await
    }

    pub async fn list_patients(&self, session: &Session, search: Option<&str>) -> Result<Vec<Patient>, ClientError> {
        let query: Vec<(&str, &str)> = search.map(|s| vec![("search", s)]).unwrap_or_default();

        self.execute_list(
            self.request(Method::GET, "/patients", Some(session)).query(&query),
            "patients",
        )
        .await
    }

    pub async fn get_patient(&self, session: &Session, patient_id: Uuid) -> Result<Patient, ClientError> {
        let path = format!("/patients/{}", patient_id);
        self.execute(self.request(Method::GET, &path, Some(session)))
            .await
    }

    pub async fn search_patients(&self, session: &Session, query: &str) -> Result<Vec<Patient>, ClientError> {
        let path = format!("/patients/search/{}", urlencoding::encode(query));
        self.execute_list(self.request(Method::GET, &path, Some(session)), "patients")
            .await
    }

    pub async fn admin_update_patient(
        &self,
        session: &Session,
        patient_id: Uuid,
        update: &PatientUpdate,
    ) -> Result<Patient, ClientError> {
        let path = format!("/patients/admin/{}", patient_id);
        self.execute(self.request(Method::PUT, &path, Some(session)).json(update))
            .await
    }

    pub async fn admin_delete_patient(&self, session: &Session, patient_id: Uuid) -> Result<(), ClientError> {
        let path = format!("/patients/admin/{}", patient_id);
        self.execute_ack(self.request(Method::DELETE, &path, Some(session)))
            .await
    }
}
