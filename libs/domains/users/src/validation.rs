//! Field rules shared by the command types.

use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;
use uuid::Uuid;
use validator::ValidationError;

use crate::models::Role;

/// Letters, digits and underscore
static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").unwrap());

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !USERNAME_PATTERN.is_match(username) {
        return Err(rule(
            "username_charset",
            "Username may only contain letters, digits and underscores",
        ));
    }
    Ok(())
}

/// At least one lowercase letter, one uppercase letter and one digit
pub fn validate_password_complexity(password: &str) -> Result<(), ValidationError> {
    let lower = password.chars().any(|c| c.is_ascii_lowercase());
    let upper = password.chars().any(|c| c.is_ascii_uppercase());
    let digit = password.chars().any(|c| c.is_ascii_digit());

    if !(lower && upper && digit) {
        return Err(rule(
            "password_complexity",
            "Password must contain upper and lower case letters and a digit",
        ));
    }
    Ok(())
}

pub fn validate_role(role: &str) -> Result<(), ValidationError> {
    Role::from_str(role)
        .map(|_| ())
        .map_err(|_| rule("role", "Role must be one of: admin, user"))
}

pub fn validate_not_nil(id: &Uuid) -> Result<(), ValidationError> {
    if id.is_nil() {
        return Err(rule("required", "User id must not be empty"));
    }
    Ok(())
}
