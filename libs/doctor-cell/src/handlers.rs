use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::auth::User;
use shared_models::doctor::DoctorUpdate;
use shared_models::error::AppError;
use shared_utils::extractor::JsonBody;

use crate::models::{AvailabilityQuery, CreateAvailabilityRequest, DoctorListQuery, UpdateTimeSlotsRequest};
use crate::services::{availability::AvailabilityService, doctor::DoctorService};

// ==============================================================================
// PUBLIC DIRECTORY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DoctorListQuery>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service.list_doctors(query.specialization, query.search).await?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.get_doctor(doctor_id).await?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn search_doctors(
    State(state): State<Arc<AppState>>,
    Path(query): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service.search_doctors(&query).await?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn doctors_by_specialization(
    State(state): State<Arc<AppState>>,
    Path(specialization): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service.list_by_specialization(&specialization).await?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

// ==============================================================================
// DOCTOR PROFILE HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let doctor = DoctorService::new(&state).get_profile(&user).await?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    JsonBody(update): JsonBody<DoctorUpdate>,
) -> Result<Json<Value>, AppError> {
    let doctor = DoctorService::new(&state).update_profile(&user, update).await?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    DoctorService::new(&state).delete_profile(&user).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Doctor account deleted"
    })))
}

#[axum::debug_handler]
pub async fn admin_update_doctor(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(doctor_id): Path<Uuid>,
    JsonBody(update): JsonBody<DoctorUpdate>,
) -> Result<Json<Value>, AppError> {
    let doctor = DoctorService::new(&state).admin_update(&user, doctor_id, update).await?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn admin_delete_doctor(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    DoctorService::new(&state).admin_delete(&user, doctor_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Doctor deleted"
    })))
}

// ==============================================================================
// AVAILABILITY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_doctor_availability(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let availability = availability_service
        .get_availability(doctor_id, query.start_date, query.end_date)
        .await?;

    Ok(Json(json!({
        "availability": availability,
        "total": availability.len()
    })))
}

#[axum::debug_handler]
pub async fn get_my_availability(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let availability = availability_service
        .get_my_availability(&user, query.start_date, query.end_date)
        .await?;

    Ok(Json(json!({
        "availability": availability,
        "total": availability.len()
    })))
}

#[axum::debug_handler]
pub async fn create_availability(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    JsonBody(request): JsonBody<CreateAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let availability = availability_service.create_availability(&user, request).await?;

    Ok(Json(json!({
        "availability": availability,
        "total": availability.len()
    })))
}

#[axum::debug_handler]
pub async fn update_availability(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(availability_id): Path<Uuid>,
    JsonBody(request): JsonBody<UpdateTimeSlotsRequest>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let availability = availability_service
        .update_time_slots(&user, availability_id, &request.time_slots)
        .await?;

    Ok(Json(json!(availability)))
}

#[axum::debug_handler]
pub async fn delete_availability(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(availability_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    AvailabilityService::new(&state)
        .delete_availability(&user, availability_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Availability deleted"
    })))
}
