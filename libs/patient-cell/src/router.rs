use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Every patient route needs a session; registration and login live with the
/// auth cell and are merged in by the API.
pub fn patient_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::list_patients))
        .route(
            "/profile",
            get(handlers::get_profile)
                .put(handlers::update_profile)
                .delete(handlers::delete_profile),
        )
        .route("/search/{query}", get(handlers::search_patients))
        .route("/{patient_id}", get(handlers::get_patient))
        .route(
            "/admin/{patient_id}",
            put(handlers::admin_update_patient).delete(handlers::admin_delete_patient),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
