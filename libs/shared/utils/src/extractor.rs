use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequest, State},
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use shared_database::AppState;
use shared_models::auth::{Role, User};
use shared_models::error::AppError;

use crate::jwt::validate_token;

/// Validate the bearer token and make the caller available to handlers as
/// `Extension<User>`.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    let token = auth_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Auth("Invalid authorization header format".to_string()))?;

    let user = validate_token(token, &state.config.jwt_secret).map_err(AppError::Auth)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// `Json` body whose rejections (bad syntax, missing fields, wrong content
/// type) surface as a 400 `AppError::ValidationError`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                let message = rejection.body_text();
                debug!("Rejected request body: {}", message);
                Err(AppError::ValidationError(message))
            }
        }
    }
}

pub fn require_role(user: &User, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Role '{}' is not allowed to perform this action",
            user.role
        )))
    }
}

pub fn require_admin(user: &User) -> Result<(), AppError> {
    require_role(user, &[Role::Admin])
}
