use reqwest::Method;
use serde_json::Value;

use auth_cell::models::{RegisterDoctorRequest, RegisterPatientRequest};
use shared_models::auth::{AuthResponse, LoginRequest, SessionUser, TokenResponse};

use crate::client::{ClinicClient, Session};
use crate::error::ClientError;

impl ClinicClient {
    pub async fn register_patient(&self, request: &RegisterPatientRequest) -> Result<Session, ClientError> {
        self.authenticate("/patients/register", request).await
    }

    pub async fn register_doctor(&self, request: &RegisterDoctorRequest) -> Result<Session, ClientError> {
        self.authenticate("/doctors/register", request).await
    }

    pub async fn login_patient(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        self.authenticate("/patients/login", &credentials(email, password)).await
    }

    pub async fn login_doctor(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        self.authenticate("/doctors/login", &credentials(email, password)).await
    }

    pub async fn login_admin(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        self.authenticate("/admin/login", &credentials(email, password)).await
    }

    pub async fn admin_profile(&self, session: &Session) -> Result<SessionUser, ClientError> {
        self.execute(self.request(Method::GET, "/admin/profile", Some(session)))
            .await
    }

    pub async fn validate_token(&self, session: &Session) -> Result<TokenResponse, ClientError> {
        self.execute(self.request(Method::POST, "/auth/validate", Some(session)))
            .await
    }

    /// `false` for any token the server would reject.
    pub async fn verify_token(&self, session: &Session) -> Result<bool, ClientError> {
        let body: Value = self
            .execute(self.request(Method::POST, "/auth/verify", Some(session)))
            .await?;
        Ok(body["valid"].as_bool().unwrap_or(false))
    }

    async fn authenticate<B>(&self, path: &str, body: &B) -> Result<Session, ClientError>
    where
        B: serde::Serialize + ?Sized,
    {
        let response: AuthResponse = self
            .execute(self.request(Method::POST, path, None).json(body))
            .await?;
        Ok(response.into())
    }
}

fn credentials(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

