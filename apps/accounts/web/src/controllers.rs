use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use domain_users::PagedResult;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::client::{ApiClient, ApiError};
use crate::forms::UserForm;
use crate::views::{Flash, FormMode, ViewError, ViewResult, Views};

const MAX_PAGE_NUMBER: u64 = 1_000_000;
const MAX_PAGE_SIZE: u64 = 100;

/// Index query: paging plus the flash message left by a redirect
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IndexParams {
    pub page_number: Option<u64>,
    pub page_size: Option<u64>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl IndexParams {
    /// Out-of-range values are clamped rather than bounced back by the API
    fn paging(&self) -> (u64, u64) {
        let page_number = self.page_number.unwrap_or(1).clamp(1, MAX_PAGE_NUMBER);
        let page_size = self.page_size.unwrap_or(10).clamp(1, MAX_PAGE_SIZE);
        (page_number, page_size)
    }
}

/// Shared by every handler
#[derive(Clone)]
pub struct WebState {
    pub client: ApiClient,
    pub views: Arc<Views>,
}

pub fn router(client: ApiClient, views: Views) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/users") }))
        .route("/users", get(index).post(create))
        .route("/users/new", get(new_user))
        .route("/users/{id}", get(show))
        .route("/users/{id}/edit", get(edit).post(update))
        .route("/users/{id}/delete", post(delete))
        .with_state(WebState {
            client,
            views: Arc::new(views),
        })
}

fn redirect_with_notice(message: &str) -> Redirect {
    Redirect::to(&format!("/users?notice={}", urlencoding::encode(message)))
}

fn redirect_with_error(message: &str) -> Redirect {
    Redirect::to(&format!("/users?error={}", urlencoding::encode(message)))
}

/// Status for a page rendered after a failed API call
fn failure_status(err: &ApiError) -> StatusCode {
    match err {
        ApiError::Api { status, .. } if status.is_client_error() => *status,
        ApiError::Unreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn rejected_form(
    views: &Views,
    mode: FormMode,
    form: UserForm,
    err: &ApiError,
) -> Result<Response, ViewError> {
    warn!(error = %err, "Accounts API rejected form");
    let page = views.user_form(
        mode,
        &form.without_password(),
        &err.field_errors(),
        Some(&err.message()),
    )?;
    Ok((failure_status(err), page).into_response())
}

async fn index(State(state): State<WebState>, Query(params): Query<IndexParams>) -> ViewResult {
    let (page_number, page_size) = params.paging();
    let mut flash = Flash {
        notice: params.notice,
        error: params.error,
    };

    let page = match state.client.list_users(page_number, page_size).await {
        Ok(page) => page,
        Err(e) => {
            warn!(error = %e, "Failed to load users");
            flash.error = Some(e.message());
            PagedResult::empty(page_number, page_size)
        }
    };

    state.views.index(&page, &flash)
}

async fn new_user(State(state): State<WebState>) -> ViewResult {
    state
        .views
        .user_form(FormMode::Create, &UserForm::blank(), &BTreeMap::new(), None)
}

async fn create(
    State(state): State<WebState>,
    Form(form): Form<UserForm>,
) -> Result<Response, ViewError> {
    let command = form.to_create_command();
    match state.client.create_user(&command).await {
        Ok(id) => {
            info!(user_id = %id, "User created");
            Ok(redirect_with_notice(&format!("User {} created", command.username)).into_response())
        }
        Err(e) => rejected_form(&state.views, FormMode::Create, form, &e),
    }
}

async fn show(
    State(state): State<WebState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ViewError> {
    match state.client.get_user(id).await {
        Ok(user) => Ok(state.views.details(&user)?.into_response()),
        Err(e) => Ok(redirect_with_error(&e.message()).into_response()),
    }
}

async fn edit(
    State(state): State<WebState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ViewError> {
    match state.client.get_user(id).await {
        Ok(user) => {
            let page = state.views.user_form(
                FormMode::Edit(id),
                &UserForm::from_user(&user),
                &BTreeMap::new(),
                None,
            )?;
            Ok(page.into_response())
        }
        Err(e) => Ok(redirect_with_error(&e.message()).into_response()),
    }
}

async fn update(
    State(state): State<WebState>,
    Path(id): Path<Uuid>,
    Form(form): Form<UserForm>,
) -> Result<Response, ViewError> {
    if !form.matches_id(id) {
        warn!(user_id = %id, form_id = %form.user_id, "Edit form does not match URL");
        let page = state
            .views
            .error_page("Bad request", "The submitted form does not match this user.")?;
        return Ok((StatusCode::BAD_REQUEST, page).into_response());
    }

    match state.client.update_user(id, &form.to_update_request()).await {
        Ok(()) => {
            info!(user_id = %id, "User updated");
            Ok(redirect_with_notice("User updated").into_response())
        }
        Err(e) if e.is_not_found() => Ok(redirect_with_error(&e.message()).into_response()),
        Err(e) => rejected_form(&state.views, FormMode::Edit(id), form, &e),
    }
}

async fn delete(State(state): State<WebState>, Path(id): Path<Uuid>) -> Redirect {
    match state.client.delete_user(id).await {
        Ok(()) => {
            info!(user_id = %id, "User deleted");
            redirect_with_notice("User deleted")
        }
        Err(e) => {
            warn!(user_id = %id, error = %e, "Delete failed");
            redirect_with_error(&e.message())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, header};
    use domain_users::{
        CreateUserCommand, InMemoryUserRepository, PasswordHasher, UserResult, UserService,
        handlers,
    };
    use http_body_util::BodyExt;
    use std::time::Duration;
    use tower::ServiceExt;

    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash(&self, plaintext: &str) -> UserResult<String> {
            Ok(format!("plain${}", plaintext))
        }

        fn verify(&self, plaintext: &str, hash: &str) -> bool {
            hash.strip_prefix("plain$") == Some(plaintext)
        }
    }

    /// Serve the users API on an ephemeral port and return its base URL
    async fn spawn_api() -> String {
        let service = UserService::new(InMemoryUserRepository::new(), PlainHasher);
        let api = Router::new().nest("/api/users", handlers::router(service));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, api).await.unwrap() });
        format!("http://{}", addr)
    }

    async fn web() -> (Router, ApiClient) {
        let client = ApiClient::new(spawn_api().await, Duration::from_secs(5)).unwrap();
        (router(client.clone(), Views::new().unwrap()), client)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn html(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    async fn create_alice(client: &ApiClient) -> Uuid {
        let command = CreateUserCommand {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "Passw0rd!".to_string(),
            role: "admin".to_string(),
        };
        client.create_user(&command).await.unwrap()
    }

    #[tokio::test]
    async fn test_root_redirects_to_index() {
        let (app, _) = web().await;
        let response = app.oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/users");
    }

    #[tokio::test]
    async fn test_create_redirects_with_notice_and_lists_user() {
        let (app, _) = web().await;

        let response = app
            .clone()
            .oneshot(post_form(
                "/users",
                "username=alice&email=alice%40example.com&password=Passw0rd!&role=admin",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/users?notice=User%20alice%20created");

        let response = app
            .oneshot(get("/users?notice=User%20alice%20created"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = html(response).await;
        assert!(body.contains("User alice created"));
        assert!(body.contains("alice@example.com"));
        assert!(body.contains("Page 1 of 1 (1 users)"));
    }

    #[tokio::test]
    async fn test_create_rerenders_with_field_errors() {
        let (app, _) = web().await;

        let response = app
            .oneshot(post_form(
                "/users",
                "username=a%21&email=nope&password=weakpass&role=owner",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = html(response).await;
        assert!(body.contains(r#"class="field-error""#));
        assert!(body.contains("Username must be 3 to 50 characters"));
        assert!(body.contains("Email must be a valid address"));
        assert!(body.contains(r#"value="a!""#));
        assert!(!body.contains("weakpass"));
    }

    #[tokio::test]
    async fn test_duplicate_create_shows_conflict() {
        let (app, client) = web().await;
        create_alice(&client).await;

        let response = app
            .oneshot(post_form(
                "/users",
                "username=alice&email=other%40example.com&password=Passw0rd!&role=user",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(html(response).await.contains(r#"class="error""#));
    }

    #[tokio::test]
    async fn test_details_and_edit_pages() {
        let (app, client) = web().await;
        let id = create_alice(&client).await;

        let details = html(
            app.clone()
                .oneshot(get(&format!("/users/{}", id)))
                .await
                .unwrap(),
        )
        .await;
        assert!(details.contains("<dd>admin</dd>"));
        assert!(details.contains(&format!(r#"action="/users/{}/delete""#, id)));

        let edit = html(
            app.oneshot(get(&format!("/users/{}/edit", id)))
                .await
                .unwrap(),
        )
        .await;
        assert!(edit.contains(&format!(r#"name="user_id" value="{}""#, id)));
        assert!(edit.contains(r#"value="alice@example.com""#));
    }

    #[tokio::test]
    async fn test_missing_user_redirects_with_error() {
        let (app, _) = web().await;

        let response = app
            .oneshot(get(&format!("/users/{}", Uuid::now_v7())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(location(&response).starts_with("/users?error="));
    }

    #[tokio::test]
    async fn test_update_flow() {
        let (app, client) = web().await;
        let id = create_alice(&client).await;

        let response = app
            .clone()
            .oneshot(post_form(
                &format!("/users/{}/edit", id),
                &format!(
                    "user_id={}&username=alice2&email=alice2%40example.com&role=user",
                    id
                ),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/users?notice=User%20updated");

        let details = html(
            app.oneshot(get(&format!("/users/{}", id)))
                .await
                .unwrap(),
        )
        .await;
        assert!(details.contains("alice2@example.com"));
        assert!(details.contains("Inactive"));
    }

    #[tokio::test]
    async fn test_update_rejects_mismatched_form_id() {
        let (app, client) = web().await;
        let id = create_alice(&client).await;

        let response = app
            .oneshot(post_form(
                &format!("/users/{}/edit", id),
                &format!(
                    "user_id={}&username=alice&email=alice%40example.com&role=user",
                    Uuid::now_v7()
                ),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_flow() {
        let (app, client) = web().await;
        let id = create_alice(&client).await;

        let response = app
            .clone()
            .oneshot(post_form(&format!("/users/{}/delete", id), ""))
            .await
            .unwrap();
        assert_eq!(location(&response), "/users?notice=User%20deleted");

        let again = app
            .oneshot(post_form(&format!("/users/{}/delete", id), ""))
            .await
            .unwrap();
        assert!(location(&again).starts_with("/users?error="));
    }

    #[tokio::test]
    async fn test_index_survives_unreachable_api() {
        // Nothing listens on the discard port
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let app = router(client, Views::new().unwrap());

        let response = app
            .oneshot(get("/users?page_number=3&page_size=500"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = html(response).await;
        assert!(body.contains("unavailable"));
        assert!(body.contains("No users found."));
        assert!(body.contains("Page 3 of 1"));
    }

    #[test]
    fn test_paging_is_clamped() {
        let params = IndexParams {
            page_number: Some(0),
            page_size: Some(1000),
            ..Default::default()
        };
        assert_eq!(params.paging(), (1, MAX_PAGE_SIZE));

        let far = IndexParams {
            page_number: Some(100_000_000_000_000_000),
            ..Default::default()
        };
        assert_eq!(far.paging(), (MAX_PAGE_NUMBER, 10));
        assert_eq!(IndexParams::default().paging(), (1, 10));
    }
}
