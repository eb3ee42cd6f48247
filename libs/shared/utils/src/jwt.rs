use chrono::{Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::{JwtClaims, Role, User};
use shared_models::error::AppError;

/// Sign an HS256 session token for the given identity.
pub fn issue_token(
    user_id: Uuid,
    email: &str,
    role: Role,
    jwt_secret: &str,
    ttl_hours: i64,
) -> Result<String, AppError> {
    if jwt_secret.is_empty() {
        return Err(AppError::Internal("JWT secret is not set".to_string()));
    }

    let now = Utc::now();
    let claims = JwtClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        iat: now.timestamp(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<User, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        debug!("Token rejected: {}", e);
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token expired".to_string(),
            jsonwebtoken::errors::ErrorKind::InvalidSignature => "Invalid token signature".to_string(),
            _ => "Invalid token format".to_string(),
        }
    })?;

    let claims = data.claims;
    let id = Uuid::parse_str(&claims.sub).map_err(|_| "Invalid subject claim".to_string())?;

    let user = User {
        id,
        email: claims.email,
        role: claims.role,
        issued_at: Utc.timestamp_opt(claims.iat, 0).single(),
    };

    debug!("Token validated successfully for user: {}", user.id);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{JwtTestUtils, TestUser};

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn issued_tokens_validate() {
        let id = Uuid::new_v4();
        let token = issue_token(id, "doc@clinic.test", Role::Doctor, SECRET, 1).unwrap();

        let user = validate_token(&token, SECRET).unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.role, Role::Doctor);
        assert!(user.issued_at.is_some());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let user = TestUser::patient("p@clinic.test");
        let token = JwtTestUtils::create_expired_token(&user, SECRET);
        assert_eq!(validate_token(&token, SECRET), Err("Token expired".to_string()));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let user = TestUser::patient("p@clinic.test");
        let token = JwtTestUtils::create_invalid_signature_token(&user);
        assert_eq!(validate_token(&token, SECRET), Err("Invalid token signature".to_string()));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        assert!(validate_token(&JwtTestUtils::create_malformed_token(), SECRET).is_err());
        assert!(issue_token(Uuid::new_v4(), "a@b.c", Role::Admin, "", 1).is_err());
    }
}
