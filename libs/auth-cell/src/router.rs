use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Mounted under `/patients` next to the patient cell's routes.
pub fn patient_auth_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(handlers::register_patient))
        .route("/login", post(handlers::patient_login))
        .with_state(state)
}

/// Mounted under `/doctors` next to the doctor cell's routes.
pub fn doctor_auth_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(handlers::register_doctor))
        .route("/login", post(handlers::doctor_login))
        .with_state(state)
}

pub fn admin_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new().route("/login", post(handlers::admin_login));

    let protected_routes = Router::new()
        .route("/profile", get(handlers::admin_profile))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

pub fn auth_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/validate", post(handlers::validate_token))
        .route("/verify", post(handlers::verify_token))
        .with_state(state)
}
