use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppState>) -> Router {
    // Every appointment operation requires authentication
    let protected_routes = Router::new()
        .route(
            "/",
            get(handlers::list_all_appointments).post(handlers::book_appointment),
        )
        .route("/doctor", get(handlers::list_doctor_appointments))
        .route("/patient", get(handlers::list_patient_appointments))
        .route(
            "/{appointment_id}",
            get(handlers::get_appointment).delete(handlers::delete_appointment),
        )
        .route("/{appointment_id}/status", put(handlers::update_appointment_status))
        .route("/{appointment_id}/cancel", put(handlers::cancel_appointment))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(protected_routes)
        .with_state(state)
}
