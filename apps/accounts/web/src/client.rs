//! HTTP client for the accounts REST API

use axum::http::StatusCode;
use axum_helpers::ErrorResponse;
use domain_users::{
    CreateUserCommand, CreatedResponse, ListUsersQuery, PagedResult, UpdateUserRequest,
    UserResponse,
};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{instrument, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Accounts API unreachable: {0}")]
    Unreachable(String),

    #[error("Accounts API returned {status}: {}", .body.message)]
    Api {
        status: StatusCode,
        body: ErrorResponse,
    },

    #[error("Unexpected response from accounts API: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message suitable for showing to the person using the site
    pub fn message(&self) -> String {
        match self {
            ApiError::Api { body, .. } => body.message.clone(),
            ApiError::Unreachable(_) => {
                "The accounts service is unavailable. Please try again later.".to_string()
            }
            ApiError::Decode(_) => "The accounts service sent an unexpected response.".to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Field-level messages from a validation failure, keyed by field name.
    ///
    /// Entries without a message fall back to the rule code.
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        let ApiError::Api { body, .. } = self else {
            return BTreeMap::new();
        };
        let Some(serde_json::Value::Object(fields)) = &body.details else {
            return BTreeMap::new();
        };

        fields
            .iter()
            .filter_map(|(field, failures)| {
                let messages: Vec<String> = failures
                    .as_array()?
                    .iter()
                    .filter_map(|failure| {
                        failure
                            .get("message")
                            .and_then(|m| m.as_str())
                            .or_else(|| failure.get("code").and_then(|c| c.as_str()))
                            .map(str::to_string)
                    })
                    .collect();
                (!messages.is_empty()).then(|| (field.clone(), messages))
            })
            .collect()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Unreachable(e.to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Typed wrapper over the `/api/users` endpoints
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn users_url(&self, suffix: &str) -> String {
        format!("{}/api/users{}", self.base_url, suffix)
    }

    #[instrument(skip(self))]
    pub async fn list_users(
        &self,
        page_number: u64,
        page_size: u64,
    ) -> ApiResult<PagedResult<UserResponse>> {
        let response = self
            .client
            .get(self.users_url(""))
            .query(&ListUsersQuery::new(page_number, page_size))
            .send()
            .await?;
        decode(response).await
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> ApiResult<UserResponse> {
        let response = self
            .client
            .get(self.users_url(&format!("/{}", id)))
            .send()
            .await?;
        decode(response).await
    }

    #[instrument(skip(self, command), fields(username = %command.username))]
    pub async fn create_user(&self, command: &CreateUserCommand) -> ApiResult<Uuid> {
        let response = self
            .client
            .post(self.users_url(""))
            .json(command)
            .send()
            .await?;
        let created: CreatedResponse = decode(response).await?;
        Ok(created.id)
    }

    #[instrument(skip(self, request))]
    pub async fn update_user(&self, id: Uuid, request: &UpdateUserRequest) -> ApiResult<()> {
        let response = self
            .client
            .put(self.users_url(&format!("/{}", id)))
            .json(request)
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: Uuid) -> ApiResult<()> {
        let response = self
            .client
            .delete(self.users_url(&format!("/{}", id)))
            .send()
            .await?;
        check(response).await.map(|_| ())
    }
}

/// Pass successful responses through, turn everything else into [`ApiError::Api`]
async fn check(response: reqwest::Response) -> ApiResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ErrorResponse>(&text).unwrap_or_else(|_| {
        warn!(status = %status, body = %text, "Non-standard error body from accounts API");
        ErrorResponse {
            code: i32::from(status.as_u16()),
            error: status
                .canonical_reason()
                .unwrap_or("UNKNOWN")
                .to_uppercase()
                .replace(' ', "_"),
            message: if text.is_empty() {
                status.to_string()
            } else {
                text
            },
            details: None,
        }
    });

    Err(ApiError::Api { status, body })
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let response = check(response).await?;
    response
        .json()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}
