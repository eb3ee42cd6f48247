use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_models::patient::PatientUpdate;
use shared_utils::extractor::JsonBody;

use crate::models::PatientListQuery;
use crate::services::PatientService;

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let patient = PatientService::new(&state).get_profile(&user).await?;
    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    JsonBody(update): JsonBody<PatientUpdate>,
) -> Result<Json<Value>, AppError> {
    let patient = PatientService::new(&state).update_profile(&user, update).await?;
    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    PatientService::new(&state).delete_profile(&user).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Patient account deleted"
    })))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Query(query): Query<PatientListQuery>,
) -> Result<Json<Value>, AppError> {
    let patients = PatientService::new(&state).list_patients(&user, query.search).await?;

    Ok(Json(json!({
        "patients": patients,
        "total": patients.len()
    })))
}

#[axum::debug_handler]
pub async fn search_patients(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(query): Path<String>,
) -> Result<Json<Value>, AppError> {
    let patients = PatientService::new(&state).search_patients(&user, &query).await?;

    Ok(Json(json!({
        "patients": patients,
        "total": patients.len()
    })))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let patient = PatientService::new(&state).get_patient(&user, patient_id).await?;
    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn admin_update_patient(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(patient_id): Path<Uuid>,
    JsonBody(update): JsonBody<PatientUpdate>,
) -> Result<Json<Value>, AppError> {
    let patient = PatientService::new(&state).admin_update(&user, patient_id, update).await?;
    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn admin_delete_patient(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    PatientService::new(&state).admin_delete(&user, patient_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Patient deleted"
    })))
}
