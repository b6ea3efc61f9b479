use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    RequestCancellation, UuidPath, ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, ServiceUnavailableResponse,
        UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::commands::{
    ChangePasswordCommand, ChangePasswordRequest, CreateUserCommand, DeleteUserCommand,
    UpdateUserCommand, UpdateUserRequest,
};
use crate::entity;
use crate::error::UserResult;
use crate::models::{CreatedResponse, PagedResult, Role, UserResponse};
use crate::password::PasswordHasher;
use crate::queries::{GetUserByUsernameQuery, GetUserQuery, ListUsersQuery};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_users,
        create_user,
        get_user,
        get_user_by_username,
        update_user,
        delete_user,
        change_password,
        activate_user,
        deactivate_user,
    ),
    components(
        schemas(
            UserResponse,
            CreatedResponse,
            CreateUserCommand,
            UpdateUserRequest,
            ChangePasswordRequest,
            Role
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            UnauthorizedResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = entity::Model::TAG, description = "User account management")
    )
)]
pub struct ApiDoc;

type SharedService<R, H> = Arc<UserService<R, H>>;

/// Create the user router with all HTTP endpoints
pub fn router<R, H>(service: UserService<R, H>) -> Router
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users::<R, H>).post(create_user::<R, H>))
        .route("/by-username/{username}", get(get_user_by_username::<R, H>))
        .route(
            "/{id}",
            get(get_user::<R, H>)
                .put(update_user::<R, H>)
                .delete(delete_user::<R, H>),
        )
        .route("/{id}/password", post(change_password::<R, H>))
        .route("/{id}/activate", post(activate_user::<R, H>))
        .route("/{id}/deactivate", post(deactivate_user::<R, H>))
        .with_state(shared_service)
}

/// List users one page at a time, oldest first
#[utoipa::path(
    get,
    path = "",
    tag = entity::Model::TAG,
    params(ListUsersQuery),
    responses(
        (status = 200, description = "One page of users", body = PagedResult<UserResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository, H: PasswordHasher>(
    State(service): State<SharedService<R, H>>,
    cancel: RequestCancellation,
    ValidatedQuery(query): ValidatedQuery<ListUsersQuery>,
) -> UserResult<Json<PagedResult<UserResponse>>> {
    let page = service.list_users(query, cancel.token()).await?;
    Ok(Json(page))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = entity::Model::TAG,
    request_body = CreateUserCommand,
    responses(
        (status = 201, description = "User created", body = CreatedResponse,
            headers(("Location" = String, description = "URL of the new user"))),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository, H: PasswordHasher>(
    State(service): State<SharedService<R, H>>,
    cancel: RequestCancellation,
    ValidatedJson(cmd): ValidatedJson<CreateUserCommand>,
) -> UserResult<impl IntoResponse> {
    let id = service.create_user(cmd, cancel.token()).await?;
    let location = format!("/api{}/{}", entity::Model::URL, id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CreatedResponse { id }),
    ))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository, H: PasswordHasher>(
    State(service): State<SharedService<R, H>>,
    cancel: RequestCancellation,
    UuidPath(id): UuidPath,
) -> UserResult<Json<UserResponse>> {
    let user = service.get_user(GetUserQuery { id }, cancel.token()).await?;
    Ok(Json(user))
}

/// Get a user by exact username
#[utoipa::path(
    get,
    path = "/by-username/{username}",
    tag = entity::Model::TAG,
    params(
        ("username" = String, Path, description = "Username (case-sensitive)")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user_by_username<R: UserRepository, H: PasswordHasher>(
    State(service): State<SharedService<R, H>>,
    cancel: RequestCancellation,
    Path(username): Path<String>,
) -> UserResult<Json<UserResponse>> {
    let user = service
        .get_user_by_username(GetUserByUsernameQuery { username }, cancel.token())
        .await?;
    Ok(Json(user))
}

/// Replace a user's profile
#[utoipa::path(
    put,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 204, description = "User updated"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository, H: PasswordHasher>(
    State(service): State<SharedService<R, H>>,
    cancel: RequestCancellation,
    UuidPath(id): UuidPath,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> UserResult<StatusCode> {
    service
        .update_user(UpdateUserCommand::new(id, request), cancel.token())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository, H: PasswordHasher>(
    State(service): State<SharedService<R, H>>,
    cancel: RequestCancellation,
    UuidPath(id): UuidPath,
) -> UserResult<StatusCode> {
    service
        .delete_user(DeleteUserCommand { user_id: id }, cancel.token())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Change a user's password
#[utoipa::path(
    post,
    path = "/{id}/password",
    tag = entity::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn change_password<R: UserRepository, H: PasswordHasher>(
    State(service): State<SharedService<R, H>>,
    cancel: RequestCancellation,
    UuidPath(id): UuidPath,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> UserResult<StatusCode> {
    service
        .change_password(ChangePasswordCommand::new(id, request), cancel.token())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Activate a user (no-op when already active)
#[utoipa::path(
    post,
    path = "/{id}/activate",
    tag = entity::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User is active"),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn activate_user<R: UserRepository, H: PasswordHasher>(
    State(service): State<SharedService<R, H>>,
    cancel: RequestCancellation,
    UuidPath(id): UuidPath,
) -> UserResult<StatusCode> {
    service.activate_user(id, cancel.token()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deactivate a user (no-op when already inactive)
#[utoipa::path(
    post,
    path = "/{id}/deactivate",
    tag = entity::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User is inactive"),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn deactivate_user<R: UserRepository, H: PasswordHasher>(
    State(service): State<SharedService<R, H>>,
    cancel: RequestCancellation,
    UuidPath(id): UuidPath,
) -> UserResult<StatusCode> {
    service.deactivate_user(id, cancel.token()).await?;
    Ok(StatusCode::NO_CONTENT)
}
