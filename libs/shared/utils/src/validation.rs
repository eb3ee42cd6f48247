use std::sync::LazyLock;

use regex::Regex;

use shared_models::error::AppError;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9\s\-()]{5,19}$").unwrap());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone.trim())
}

/// Trimmed value of a mandatory text field.
pub fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{} is required", field)));
    }
    Ok(trimmed)
}

pub fn require_email(email: &str) -> Result<String, AppError> {
    let email = required(email, "Email")?;
    if !is_valid_email(email) {
        return Err(AppError::ValidationError(format!("Invalid email address: {}", email)));
    }
    Ok(email.to_lowercase())
}

pub fn require_phone(phone: &str) -> Result<String, AppError> {
    let phone = required(phone, "Phone number")?;
    if !is_valid_phone(phone) {
        return Err(AppError::ValidationError(format!("Invalid phone number: {}", phone)));
    }
    Ok(phone.to_string())
}
