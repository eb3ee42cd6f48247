use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/search/{query}", get(handlers::search_doctors))
        .route("/specialization/{specialization}", get(handlers::doctors_by_specialization))
        .route("/{doctor_id}", get(handlers::get_doctor));

    let protected_routes = Router::new()
        .route(
            "/profile",
            get(handlers::get_profile)
                .put(handlers::update_profile)
                .delete(handlers::delete_profile),
        )
        .route(
            "/admin/{doctor_id}",
            put(handlers::admin_update_doctor).delete(handlers::admin_delete_doctor),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

pub fn availability_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/doctor/{doctor_id}", get(handlers::get_doctor_availability));

    let protected_routes = Router::new()
        .route(
            "/",
            get(handlers::get_my_availability).post(handlers::create_availability),
        )
        .route(
            "/{availability_id}",
            put(handlers::update_availability).delete(handlers::delete_availability),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
