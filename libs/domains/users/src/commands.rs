use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{UserError, UserResult};
use crate::models::Role;
use crate::validation::{
    validate_not_nil, validate_password_complexity, validate_role, validate_username,
};

/// Role arrives as text so an unknown value is reported alongside the other
/// field violations instead of failing deserialization.
fn parse_role(raw: &str) -> UserResult<Role> {
    Role::from_str(raw).map_err(|_| {
        let mut errors = ValidationErrors::new();
        errors.add("role", ValidationError::new("role"));
        UserError::Validation(errors)
    })
}

/// Register a new account
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserCommand {
    #[validate(
        length(min = 3, max = 50, message = "Username must be 3 to 50 characters"),
        custom(function = "validate_username")
    )]
    #[schema(example = "alice_01")]
    pub username: String,
    #[validate(
        email(message = "Email must be a valid address"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "validate_password_complexity")
    )]
    #[schema(example = "Sup3rSecret")]
    pub password: String,
    #[validate(custom(function = "validate_role"))]
    #[schema(value_type = Role)]
    pub role: String,
}

impl CreateUserCommand {
    pub fn role(&self) -> UserResult<Role> {
        parse_role(&self.role)
    }
}

/// Request body for replacing a user's profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(
        length(min = 3, max = 50, message = "Username must be 3 to 50 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(
        email(message = "Email must be a valid address"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    pub email: String,
    #[validate(custom(function = "validate_role"))]
    #[schema(value_type = Role)]
    pub role: String,
    pub is_active: bool,
}

/// Replace a user's profile fields
#[derive(Debug, Clone, Validate)]
pub struct UpdateUserCommand {
    #[validate(custom(function = "validate_not_nil"))]
    pub user_id: Uuid,
    #[validate(
        length(min = 3, max = 50, message = "Username must be 3 to 50 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(
        email(message = "Email must be a valid address"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    pub email: String,
    #[validate(custom(function = "validate_role"))]
    pub role: String,
    pub is_active: bool,
}

impl UpdateUserCommand {
    pub fn new(user_id: Uuid, request: UpdateUserRequest) -> Self {
        Self {
            user_id,
            username: request.username,
            email: request.email,
            role: request.role,
            is_active: request.is_active,
        }
    }

    pub fn role(&self) -> UserResult<Role> {
        parse_role(&self.role)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteUserCommand {
    pub user_id: Uuid,
}

/// Request body for a password change
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "validate_password_complexity")
    )]
    pub new_password: String,
}

#[derive(Debug, Clone, Validate)]
pub struct ChangePasswordCommand {
    #[validate(custom(function = "validate_not_nil"))]
    pub user_id: Uuid,
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "validate_password_complexity")
    )]
    pub new_password: String,
}

impl ChangePasswordCommand {
    pub fn new(user_id: Uuid, request: ChangePasswordRequest) -> Self {
        Self {
            user_id,
            current_password: request.current_password,
            new_password: request.new_password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(username: &str, email: &str, password: &str, role: &str) -> CreateUserCommand {
        CreateUserCommand {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn test_valid_create_command() {
        let cmd = create("alice_01", "alice@example.com", "Sup3rSecret", "admin");
        assert!(cmd.validate().is_ok());
        assert_eq!(cmd.role().unwrap(), Role::Admin);
    }

    #[test]
    fn test_create_reports_every_violation() {
        let cmd = create("a!", "not-an-email", "short", "root");
        let errors = cmd.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("role"));
        assert!(matches!(cmd.role(), Err(UserError::Validation(_))));
    }

    #[test]
    fn test_username_length_bounds() {
        let password = "Sup3rSecret";
        assert!(create("ab", "a@example.com", password, "user").validate().is_err());
        assert!(create("abc", "a@example.com", password, "user").validate().is_ok());
        assert!(
            create(&"a".repeat(50), "a@example.com", password, "user")
                .validate()
                .is_ok()
        );
        assert!(
            create(&"a".repeat(51), "a@example.com", password, "user")
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_email_max_length() {
        let email = format!("{}@example.com", "a".repeat(90));
        let cmd = create("alice", &email, "Sup3rSecret", "user");

        let errors = cmd.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_update_command_requires_id() {
        let request = UpdateUserRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            role: "user".to_string(),
            is_active: true,
        };

        let nil = UpdateUserCommand::new(Uuid::nil(), request.clone());
        assert!(nil.validate().unwrap_err().field_errors().contains_key("user_id"));

        let ok = UpdateUserCommand::new(Uuid::now_v7(), request);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_change_password_rules() {
        let weak = ChangePasswordCommand::new(
            Uuid::now_v7(),
            ChangePasswordRequest {
                current_password: String::new(),
                new_password: "weakpass".to_string(),
            },
        );

        let errors = weak.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("current_password"));
        assert!(errors.field_errors().contains_key("new_password"));
    }

    #[test]
    fn test_rules_carry_messages() {
        let cmd = create("ab", "not-an-email", "Sh0rt", "user");
        let errors = cmd.validate().unwrap_err();
        let fields = errors.field_errors();

        let message = |field: &str| {
            fields[field]
                .iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        };
        assert_eq!(
            message("username").as_deref(),
            Some("Username must be 3 to 50 characters")
        );
        assert_eq!(message("email").as_deref(), Some("Email must be a valid address"));
        assert_eq!(
            message("password").as_deref(),
            Some("Password must be at least 8 characters")
        );

        let blank = ChangePasswordRequest {
            current_password: String::new(),
            new_password: "Sup3rSecret".to_string(),
        };
        let errors = blank.validate().unwrap_err();
        assert_eq!(
            errors.field_errors()["current_password"][0]
                .message
                .as_deref(),
            Some("Current password is required")
        );
    }
}
