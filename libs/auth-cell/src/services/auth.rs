use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use doctor_cell::services::DoctorService;
use patient_cell::services::PatientService;
use shared_config::AppConfig;
use shared_database::repositories::{AccountRepository, DoctorRepository, PatientRepository};
use shared_database::AppState;
use shared_models::account::Account;
use shared_models::auth::{AuthResponse, LoginRequest, Role, SessionUser, TokenResponse, User};
use shared_models::error::AppError;
use shared_utils::extractor::require_admin;
use shared_utils::jwt::{issue_token, validate_token};
use shared_utils::password::{check_password_length, hash_password, verify_password};
use shared_utils::validation::require_email;

use crate::models::{AuthError, RegisterDoctorRequest, RegisterPatientRequest};

pub struct AuthService<'a> {
    state: &'a AppState,
    config: Arc<AppConfig>,
    accounts: Arc<dyn AccountRepository>,
    patients: Arc<dyn PatientRepository>,
    doctors: Arc<dyn DoctorRepository>,
}

impl<'a> AuthService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            state,
            config: state.config.clone(),
            accounts: state.store.accounts.clone(),
            patients: state.store.patients.clone(),
            doctors: state.store.doctors.clone(),
        }
    }

    pub async fn register_patient(&self, request: RegisterPatientRequest) -> Result<AuthResponse, AppError> {
        debug!("Registering patient: {}", request.email);

        let account = self.create_account(&request.email, &request.password, Role::Patient).await?;

        let created = PatientService::new(self.state)
            .create_patient(account.id, request.profile())
            .await;
        let patient = match created {
            Ok(patient) => patient,
            Err(e) => {
                self.discard_account(account.id).await;
                return Err(e);
            }
        };

        info!("Patient registered: {}", patient.id);
        self.session(&account, Some(patient.full_name()))
    }

    pub async fn register_doctor(&self, request: RegisterDoctorRequest) -> Result<AuthResponse, AppError> {
        debug!("Registering doctor: {}", request.email);

        let account = self.create_account(&request.email, &request.password, Role::Doctor).await?;

        let created = DoctorService::new(self.state)
            .create_doctor(account.id, request.profile())
            .await;
        let doctor = match created {
            Ok(doctor) => doctor,
            Err(e) => {
                self.discard_account(account.id).await;
                return Err(e);
            }
        };

        info!("Doctor registered: {}", doctor.id);
        self.session(&account, Some(doctor.full_name))
    }

    /// Check credentials for one role and issue a session token.
    pub async fn login(&self, role: Role, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let email = request.email.trim().to_lowercase();
        debug!("Login attempt for {} as {}", email, role);

        let Some(account) = self.accounts.find_by_email(&email, role).await? else {
            warn!("Login failed for {}: unknown account", email);
            return Err(AuthError::InvalidCredentials.into());
        };

        if !verify_password(&request.password, &account.password_hash)? {
            warn!("Login failed for {}: wrong password", email);
            return Err(AuthError::InvalidCredentials.into());
        }

        let full_name = self.display_name(&account).await?;
        info!("User {} logged in as {}", account.id, role);
        self.session(&account, full_name)
    }

    pub fn admin_profile(&self, user: &User) -> Result<SessionUser, AppError> {
        require_admin(user)?;
        Ok(SessionUser {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            full_name: None,
        })
    }

    pub fn validate(&self, token: &str) -> Result<TokenResponse, AppError> {
        let user = validate_token(token, &self.config.jwt_secret).map_err(AuthError::InvalidToken)?;
        Ok(TokenResponse {
            valid: true,
            user_id: user.id,
            email: user.email,
            role: user.role,
        })
    }

    /// Create the admin account from configuration unless it already exists.
    /// Returns whether an account was created.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<bool, AppError> {
        let email = require_email(email)?;
        if self.accounts.find_by_email(&email, Role::Admin).await?.is_some() {
            debug!("Admin account {} already present", email);
            return Ok(false);
        }

        match self.create_account(&email, password, Role::Admin).await {
            Ok(account) => {
                info!("Admin account {} created", account.email);
                Ok(true)
            }
            // Another instance won the race.
            Err(AppError::Conflict(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create_account(&self, email: &str, password: &str, role: Role) -> Result<Account, AppError> {
        let email = require_email(email)?;
        check_password_length(password)?;

        let account = Account {
            id: Uuid::new_v4(),
            email,
            role,
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        };

        self.accounts.insert(account).await
    }

    /// Best effort; the profile insert already failed.
    async fn discard_account(&self, id: Uuid) {
        if let Err(e) = self.accounts.delete(id).await {
            warn!("Failed to remove orphaned account {}: {}", id, e);
        }
    }

    async fn display_name(&self, account: &Account) -> Result<Option<String>, AppError> {
        Ok(match account.role {
            Role::Patient => self.patients.get(account.id).await?.map(|p| p.full_name()),
            Role::Doctor => self.doctors.get(account.id).await?.map(|d| d.full_name),
            Role::Admin => None,
        })
    }

    fn session(&self, account: &Account, full_name: Option<String>) -> Result<AuthResponse, AppError> {
        let token = issue_token(
            account.id,
            &account.email,
            account.role,
            &self.config.jwt_secret,
            self.config.token_ttl_hours,
        )?;

        Ok(AuthResponse {
            token,
            user: SessionUser {
                id: account.id,
                email: account.email.clone(),
                role: account.role,
                full_name,
            },
        })
    }
}

/// Seed the admin login from `ADMIN_EMAIL` / `ADMIN_PASSWORD` when both are set.
pub async fn bootstrap_admin(state: &AppState) -> Result<(), AppError> {
    let (Some(email), Some(password)) = (&state.config.admin_email, &state.config.admin_password) else {
        debug!("No admin credentials configured; skipping bootstrap");
        return Ok(());
    };

    AuthService::new(state).ensure_admin(email, password).await?;
    Ok(())
}
