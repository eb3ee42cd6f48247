use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use tracing::debug;

use shared_database::AppState;
use shared_models::auth::{AuthResponse, LoginRequest, Role, TokenResponse, User};
use shared_models::error::AppError;
use shared_utils::extractor::JsonBody;

use crate::models::{AuthError, RegisterDoctorRequest, RegisterPatientRequest};
use crate::services::AuthService;

// ==============================================================================
// REGISTRATION & LOGIN
// ==============================================================================

#[axum::debug_handler]
pub async fn register_patient(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<RegisterPatientRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthService::new(&state).register_patient(request).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn register_doctor(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<RegisterDoctorRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthService::new(&state).register_doctor(request).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn patient_login(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthService::new(&state).login(Role::Patient, request).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn doctor_login(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthService::new(&state).login(Role::Doctor, request).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthService::new(&state).login(Role::Admin, request).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn admin_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let profile = AuthService::new(&state).admin_profile(&user)?;
    Ok(Json(json!(profile)))
}

// ==============================================================================
// TOKEN INTROSPECTION
// ==============================================================================

#[axum::debug_handler]
pub async fn validate_token(
    State(state): State<Arc<AppState>>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AuthError::MissingToken)?;
    let response = AuthService::new(&state).validate(bearer.token())?;

    Ok(Json(response))
}

/// Like `validate_token`, but never fails: answers `{ "valid": bool }`.
#[axum::debug_handler]
pub async fn verify_token(
    State(state): State<Arc<AppState>>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Json<Value> {
    debug!("Verifying token");

    let valid = bearer
        .map(|TypedHeader(Authorization(bearer))| AuthService::new(&state).validate(bearer.token()).is_ok())
        .unwrap_or(false);

    Json(json!({ "valid": valid }))
}
