use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use uuid::Uuid;

use shared_config::{AppConfig, StorageBackend};
use shared_database::{AppState, ClinicStore};
use shared_models::auth::{JwtClaims, Role, User};

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub max_availability_days: i64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
            max_availability_days: 90,
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            storage_backend: StorageBackend::Memory,
            max_availability_days: self.max_availability_days,
            ..AppConfig::default()
        }
    }

    /// Fresh state over an empty in-memory store.
    pub fn to_state(&self) -> Arc<AppState> {
        Arc::new(AppState::new(self.to_app_config(), ClinicStore::in_memory()))
    }

    /// State over the Supabase store pointed at `base_url` (a wiremock server).
    pub fn to_supabase_state(&self, base_url: &str) -> Arc<AppState> {
        let config = AppConfig {
            supabase_url: base_url.to_string(),
            storage_backend: StorageBackend::Supabase,
            ..self.to_app_config()
        };
        let store = ClinicStore::supabase(&config).expect("supabase store");
        Arc::new(AppState::new(config, store))
    }
}

pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl Default for TestUser {
    fn default() -> Self {
        Self::new("test@example.com", Role::Patient)
    }
}

impl TestUser {
    pub fn new(email: &str, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            role,
        }
    }

    pub fn with_id(id: Uuid, email: &str, role: Role) -> Self {
        Self {
            id,
            email: email.to_string(),
            role,
        }
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, Role::Doctor)
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, Role::Patient)
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, Role::Admin)
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
            issued_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let claims = JwtClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
            .expect("HMAC can take key of any size")
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }

    pub fn bearer(user: &TestUser, secret: &str) -> String {
        format!("Bearer {}", Self::create_test_token(user, secret, Some(1)))
    }
}

/// Row shapes as PostgREST returns them.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn doctor_row(id: Uuid, full_name: &str, specialization: &str) -> serde_json::Value {
        json!({
            "id": id,
            "full_name": full_name,
            "email": format!("{}@clinic.test", full_name.to_lowercase().replace(' ', ".")),
            "specialization": specialization,
            "bio": null,
            "profile_image_url": null,
            "phone": null,
            "gender": null,
            "address": null,
            "is_active": true,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn availability_row(id: Uuid, doctor_id: Uuid, date: &str, times: &[&str]) -> serde_json::Value {
        let slots: Vec<serde_json::Value> = times
            .iter()
            .map(|time| {
                json!({
                    "availability_id": id,
                    "slot_time": time,
                    "is_booked": false,
                    "patient_id": null,
                    "appointment_id": null
                })
            })
            .collect();

        json!({
            "id": id,
            "doctor_id": doctor_id,
            "date": date,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "availability_time_slots": slots
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code
        })
    }
}
