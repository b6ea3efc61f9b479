use domain_users::{CreateUserCommand, Role, UpdateUserRequest, UserResponse};
use serde::Deserialize;
use uuid::Uuid;

/// Fields posted by the create and edit pages.
///
/// Everything is kept as submitted text so a rejected form re-renders exactly
/// as typed. `is_active` is an HTML checkbox: present means checked.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UserForm {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub is_active: Option<String>,
}

impl UserForm {
    /// Blank form for the create page
    pub fn blank() -> Self {
        Self {
            role: Role::User.to_string(),
            is_active: Some("on".to_string()),
            ..Default::default()
        }
    }

    /// Edit form pre-filled from the stored user
    pub fn from_user(user: &UserResponse) -> Self {
        Self {
            user_id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            password: String::new(),
            role: user.role.to_string(),
            is_active: user.is_active.then(|| "on".to_string()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active.is_some()
    }

    /// The hidden id must name the user in the URL
    pub fn matches_id(&self, id: Uuid) -> bool {
        self.user_id.parse::<Uuid>().is_ok_and(|form_id| form_id == id)
    }

    pub fn to_create_command(&self) -> CreateUserCommand {
        CreateUserCommand {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            role: self.role.clone(),
        }
    }

    pub fn to_update_request(&self) -> UpdateUserRequest {
        UpdateUserRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            role: self.role.clone(),
            is_active: self.is_active(),
        }
    }

    /// Drops the password so it is never echoed back into the page
    pub fn without_password(mut self) -> Self {
        self.password.clear();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::{Form, FromRequest},
        http::{Request, header},
    };

    fn sample_user(is_active: bool) -> UserResponse {
        serde_json::from_value(serde_json::json!({
            "id": "0193b7a0-0000-7000-8000-000000000001",
            "username": "alice",
            "email": "alice@example.com",
            "role": "admin",
            "is_active": is_active,
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": null
        }))
        .unwrap()
    }

    async fn parse(body: &'static str) -> UserForm {
        let request = Request::post("/users")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        let Form(form) = Form::<UserForm>::from_request(request, &()).await.unwrap();
        form
    }

    #[tokio::test]
    async fn test_unchecked_checkbox_means_inactive() {
        let form = parse("username=bob&email=bob%40example.com&role=user").await;
        assert!(!form.is_active());
        assert!(!form.to_update_request().is_active);

        let form = parse("username=bob&email=bob%40example.com&role=user&is_active=on").await;
        assert!(form.is_active());
    }

    #[tokio::test]
    async fn test_create_command_trims_identity_fields() {
        let form =
            parse("username=+bob+&email=bob%40example.com+&password=Passw0rd!&role=admin").await;
        let cmd = form.to_create_command();
        assert_eq!(cmd.username, "bob");
        assert_eq!(cmd.email, "bob@example.com");
        assert_eq!(cmd.password, "Passw0rd!");
        assert_eq!(cmd.role, "admin");
    }

    #[test]
    fn test_from_user_prefills_edit_form() {
        let stored = sample_user(false);
        let form = UserForm::from_user(&stored);
        assert!(form.matches_id(stored.id));
        assert_eq!(form.role, "admin");
        assert!(!form.is_active());
        assert!(form.password.is_empty());
    }

    #[test]
    fn test_matches_id_rejects_mismatch_and_garbage() {
        let stored = sample_user(true);
        let mut form = UserForm::from_user(&stored);
        assert!(!form.matches_id(Uuid::now_v7()));

        form.user_id = "not-a-uuid".to_string();
        assert!(!form.matches_id(stored.id));
    }

    #[test]
    fn test_blank_form_defaults() {
        let form = UserForm::blank();
        assert_eq!(form.role, "user");
        assert!(form.is_active());
        assert!(form.user_id.is_empty());
        assert!(UserForm::blank().without_password().password.is_empty());
    }
}
