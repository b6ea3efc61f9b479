//! Server-side HTML rendering with Handlebars
//!
//! Pages render their body first and are then wrapped in the shared layout.
//! Double-stash values are HTML-escaped by the engine; only the rendered body
//! is inserted raw.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use domain_users::{PagedResult, Role, UserResponse};
use eyre::{Result, eyre};
use handlebars::{Handlebars, RenderError};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::forms::UserForm;

const LAYOUT: &str = "layout";
const INDEX: &str = "index";
const DETAILS: &str = "details";
const USER_FORM: &str = "user_form";
const ERROR: &str = "error";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

const LAYOUT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{title}} - Accounts</title>
</head>
<body>
<header><a href="/users">Accounts</a></header>
<main>
<h1>{{title}}</h1>
{{#if notice}}<p class="notice">{{notice}}</p>{{/if}}
{{#if error}}<p class="error">{{error}}</p>{{/if}}
{{{content}}}
</main>
</body>
</html>
"#;

const INDEX_TEMPLATE: &str = r#"<p><a href="/users/new">New user</a></p>
{{#if users}}
<table>
<thead><tr><th>Username</th><th>Email</th><th>Role</th><th>Status</th><th>Created</th><th></th></tr></thead>
<tbody>
{{#each users}}
<tr><td><a href="/users/{{id}}">{{username}}</a></td><td>{{email}}</td><td>{{role}}</td><td>{{status}}</td><td>{{created}}</td><td><a href="/users/{{id}}/edit">Edit</a></td></tr>
{{/each}}
</tbody>
</table>
{{else}}
<p>No users found.</p>
{{/if}}
<nav class="pager">
{{#if previous}}<a href="/users?page_number={{previous}}&amp;page_size={{page_size}}">Previous</a>{{/if}}
<span>Page {{page_number}} of {{total_pages}} ({{total_count}} users)</span>
{{#if next}}<a href="/users?page_number={{next}}&amp;page_size={{page_size}}">Next</a>{{/if}}
</nav>
"#;

const DETAILS_TEMPLATE: &str = r#"<dl>
<dt>Username</dt><dd>{{username}}</dd>
<dt>Email</dt><dd>{{email}}</dd>
<dt>Role</dt><dd>{{role}}</dd>
<dt>Status</dt><dd>{{status}}</dd>
<dt>Created</dt><dd>{{created}}</dd>
<dt>Updated</dt><dd>{{updated}}</dd>
</dl>
<p><a href="/users/{{id}}/edit">Edit</a> | <a href="/users">Back to list</a></p>
<form method="post" action="/users/{{id}}/delete">
<button type="submit">Delete</button>
</form>
"#;

const USER_FORM_TEMPLATE: &str = r#"<form method="post" action="{{action}}">
{{#if user_id}}
<input type="hidden" name="user_id" value="{{user_id}}">
{{/if}}
<p><label>Username <input name="username" value="{{username}}" required></label>{{#each errors.username}}<span class="field-error">{{this}}</span>{{/each}}</p>
<p><label>Email <input type="email" name="email" value="{{email}}" required></label>{{#each errors.email}}<span class="field-error">{{this}}</span>{{/each}}</p>
{{#if user_id}}
<p><label><input type="checkbox" name="is_active"{{#if is_active}} checked{{/if}}> Active</label></p>
{{else}}
<p><label>Password <input type="password" name="password" required></label>{{#each errors.password}}<span class="field-error">{{this}}</span>{{/each}}</p>
{{/if}}
<p><label>Role <select name="role">{{#each roles}}<option value="{{value}}"{{#if selected}} selected{{/if}}>{{value}}</option>{{/each}}</select></label>{{#each errors.role}}<span class="field-error">{{this}}</span>{{/each}}</p>
<p><button type="submit">Save</button> <a href="/users">Cancel</a></p>
</form>
"#;

const ERROR_TEMPLATE: &str = r#"<p><a href="/users">Back to list</a></p>
"#;

/// Status line carried across a redirect
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flash {
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl Flash {
    fn error(message: impl Into<String>) -> Self {
        Self {
            notice: None,
            error: Some(message.into()),
        }
    }
}

/// Which page a [`Views::user_form`] belongs to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormMode {
    Create,
    Edit(Uuid),
}

#[derive(Debug, Error)]
#[error("Failed to render {page}: {source}")]
pub struct ViewError {
    page: &'static str,
    source: RenderError,
}

impl IntoResponse for ViewError {
    fn into_response(self) -> Response {
        error!(page = self.page, error = %self.source, "Template rendering failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<h1>Something went wrong</h1>"),
        )
            .into_response()
    }
}

pub type ViewResult = std::result::Result<Html<String>, ViewError>;

fn status_label(is_active: bool) -> &'static str {
    if is_active { "Active" } else { "Inactive" }
}

fn user_context(user: &UserResponse) -> Value {
    json!({
        "id": user.id,
        "username": user.username,
        "email": user.email,
        "role": user.role.to_string(),
        "status": status_label(user.is_active),
        "created": user.created_at.format(DATE_FORMAT).to_string(),
        "updated": user
            .updated_at
            .map(|t| t.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| "Never".to_string()),
    })
}

/// Handlebars page renderer shared by every controller
pub struct Views {
    handlebars: Handlebars<'static>,
}

impl Views {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        for (name, template) in [
            (LAYOUT, LAYOUT_TEMPLATE),
            (INDEX, INDEX_TEMPLATE),
            (DETAILS, DETAILS_TEMPLATE),
            (USER_FORM, USER_FORM_TEMPLATE),
            (ERROR, ERROR_TEMPLATE),
        ] {
            handlebars
                .register_template_string(name, template)
                .map_err(|e| eyre!("Failed to register {} template: {}", name, e))?;
        }

        Ok(Self { handlebars })
    }

    fn render(&self, page: &'static str, title: &str, flash: &Flash, data: &Value) -> ViewResult {
        let content = self
            .handlebars
            .render(page, data)
            .map_err(|source| ViewError { page, source })?;

        let html = self
            .handlebars
            .render(
                LAYOUT,
                &json!({
                    "title": title,
                    "notice": flash.notice,
                    "error": flash.error,
                    "content": content,
                }),
            )
            .map_err(|source| ViewError {
                page: LAYOUT,
                source,
            })?;

        Ok(Html(html))
    }

    pub fn index(&self, page: &PagedResult<UserResponse>, flash: &Flash) -> ViewResult {
        let data = json!({
            "users": page.items.iter().map(user_context).collect::<Vec<_>>(),
            "page_number": page.page_number,
            "page_size": page.page_size,
            "total_pages": page.total_pages.max(1),
            "total_count": page.total_count,
            "previous": page.has_previous().then(|| page.page_number - 1),
            "next": page.has_next().then(|| page.page_number + 1),
        });

        self.render(INDEX, "Users", flash, &data)
    }

    pub fn details(&self, user: &UserResponse) -> ViewResult {
        self.render(DETAILS, &user.username, &Flash::default(), &user_context(user))
    }

    /// Create or edit form, re-rendered with `errors` when the API rejects it
    pub fn user_form(
        &self,
        mode: FormMode,
        form: &UserForm,
        errors: &BTreeMap<String, Vec<String>>,
        message: Option<&str>,
    ) -> ViewResult {
        let (title, action, user_id) = match mode {
            FormMode::Create => ("New user", "/users".to_string(), None),
            FormMode::Edit(id) => ("Edit user", format!("/users/{}/edit", id), Some(id)),
        };

        let roles: Vec<Value> = Role::all()
            .map(|role| {
                let value = role.to_string();
                let selected = value.eq_ignore_ascii_case(&form.role);
                json!({ "value": value, "selected": selected })
            })
            .collect();

        let data = json!({
            "action": action,
            "user_id": user_id,
            "username": form.username,
            "email": form.email,
            "is_active": form.is_active(),
            "roles": roles,
            "errors": errors,
        });

        let flash = Flash {
            notice: None,
            error: message.map(str::to_string),
        };
        self.render(USER_FORM, title, &flash, &data)
    }

    pub fn error_page(&self, title: &str, message: &str) -> ViewResult {
        self.render(ERROR, title, &Flash::error(message), &json!({}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn views() -> Views {
        Views::new().unwrap()
    }

    fn user(username: &str, is_active: bool) -> UserResponse {
        serde_json::from_value(serde_json::json!({
            "id": Uuid::now_v7(),
            "username": username,
            "email": format!("{}@example.com", username),
            "role": "user",
            "is_active": is_active,
            "created_at": "2026-03-01T09:30:00Z",
            "updated_at": null
        }))
        .unwrap()
    }

    #[test]
    fn test_index_lists_users_and_pager() {
        let page = PagedResult::new(vec![user("alice", true), user("bob", false)], 25, 2, 10);
        let Html(html) = views().index(&page, &Flash::default()).unwrap();

        assert!(html.contains("alice@example.com"));
        assert!(html.contains("Inactive"));
        assert!(html.contains("2026-03-01 09:30"));
        assert!(html.contains("Page 2 of 3 (25 users)"));
        assert!(html.contains("page_number=1&amp;page_size=10\">Previous"));
        assert!(html.contains("page_number=3&amp;page_size=10\">Next"));
        assert!(!html.contains(r#"class="notice""#));
    }

    #[test]
    fn test_index_empty_page_with_error() {
        let flash = Flash::error("Service <down>");
        let Html(html) = views().index(&PagedResult::empty(1, 10), &flash).unwrap();

        assert!(html.contains("No users found."));
        assert!(html.contains("Service &lt;down&gt;"));
        assert!(html.contains("Page 1 of 1 (0 users)"));
        assert!(!html.contains("Previous"));
        assert!(!html.contains("Next"));
    }

    #[test]
    fn test_user_values_are_escaped() {
        let mut hostile = user("mallory", true);
        hostile.email = "<img src=x>@example.com".to_string();
        let Html(html) = views().details(&hostile).unwrap();

        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src&#x3D;x&gt;@example.com"));
        assert!(html.contains("Never"));
    }

    #[test]
    fn test_create_form_renders_field_errors_without_password() {
        let form = UserForm {
            username: "ab".to_string(),
            password: "secret".to_string(),
            role: "admin".to_string(),
            ..Default::default()
        };
        let errors = BTreeMap::from([(
            "username".to_string(),
            vec!["Username must be 3 to 50 characters".to_string()],
        )]);
        let Html(html) = views()
            .user_form(FormMode::Create, &form, &errors, Some("Validation failed"))
            .unwrap();

        assert!(html.contains(r#"action="/users""#));
        assert!(html.contains(
            r#"<span class="field-error">Username must be 3 to 50 characters</span>"#
        ));
        assert!(html.contains("Validation failed"));
        assert!(html.contains(r#"<option value="admin" selected>"#));
        assert!(html.contains(r#"<option value="user">"#));
        assert!(html.contains(r#"name="password""#));
        assert!(!html.contains("secret"));
        assert!(!html.contains("user_id"));
    }

    #[test]
    fn test_edit_form_carries_hidden_id_and_checkbox() {
        let stored = user("carol", true);
        let Html(html) = views()
            .user_form(
                FormMode::Edit(stored.id),
                &UserForm::from_user(&stored),
                &BTreeMap::new(),
                None,
            )
            .unwrap();

        assert!(html.contains(&format!(r#"name="user_id" value="{}""#, stored.id)));
        assert!(html.contains(&format!(r#"action="/users/{}/edit""#, stored.id)));
        assert!(html.contains(r#"name="is_active" checked"#));
        assert!(!html.contains(r#"name="password""#));
        assert!(!html.contains("field-error"));
    }

    #[test]
    fn test_error_page() {
        let Html(html) = views()
            .error_page("Bad request", "Form & URL disagree")
            .unwrap();

        assert!(html.contains("<title>Bad request - Accounts</title>"));
        assert!(html.contains(r#"<p class="error">Form &amp; URL disagree</p>"#));
    }

    #[test]
    fn test_render_failure_is_internal_error() {
        let err = views()
            .handlebars
            .render("missing", &json!({}))
            .map_err(|source| ViewError {
                page: "missing",
                source,
            })
            .unwrap_err();

        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
