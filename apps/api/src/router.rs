use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use appointment_cell::router::appointment_routes;
use auth_cell::router::{admin_routes, auth_routes, doctor_auth_routes, patient_auth_routes};
use doctor_cell::router::{availability_routes, doctor_routes};
use patient_cell::router::patient_routes;
use shared_database::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic API is running!" }))
        .route("/health", get(health).with_state(state.clone()))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/admin", admin_routes(state.clone()))
        .nest(
            "/doctors",
            doctor_routes(state.clone()).merge(doctor_auth_routes(state.clone())),
        )
        .nest(
            "/patients",
            patient_routes(state.clone()).merge(patient_auth_routes(state.clone())),
        )
        .nest("/availability", availability_routes(state.clone()))
        .nest("/appointments", appointment_routes(state))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "storage": state.config.storage_backend.to_string()
    }))
}
