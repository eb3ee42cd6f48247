use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::extractor::JsonBody;

use crate::models::{AppointmentListQuery, BookAppointmentRequest, CancelAppointmentRequest, UpdateStatusRequest};
use crate::services::booking::{BookingService, ListScope};

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    JsonBody(request): JsonBody<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let appointment = booking_service.book_appointment(&user, request).await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn list_all_appointments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<Value>, AppError> {
    list_scoped(&state, &user, ListScope::All, query).await
}

#[axum::debug_handler]
pub async fn list_doctor_appointments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<Value>, AppError> {
    list_scoped(&state, &user, ListScope::Doctor, query).await
}

#[axum::debug_handler]
pub async fn list_patient_appointments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<Value>, AppError> {
    list_scoped(&state, &user, ListScope::Patient, query).await
}

async fn list_scoped(
    state: &AppState,
    user: &User,
    scope: ListScope,
    query: AppointmentListQuery,
) -> Result<Json<Value>, AppError> {
    let appointments = BookingService::new(state).list_appointments(user, scope, query).await?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = BookingService::new(&state).get_appointment(&user, appointment_id).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
    JsonBody(request): JsonBody<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = BookingService::new(&state)
        .update_status(&user, appointment_id, &request.status, request.reason)
        .await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    // The reason is optional, so an empty body is accepted.
    let request: CancelAppointmentRequest = if body.is_empty() {
        CancelAppointmentRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid cancellation body: {}", e)))?
    };
    let reason = request.reason;

    let appointment = BookingService::new(&state)
        .cancel_appointment(&user, appointment_id, reason)
        .await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    BookingService::new(&state).delete_appointment(&user, appointment_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment deleted"
    })))
}
