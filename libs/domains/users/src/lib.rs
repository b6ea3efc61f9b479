//! Users Domain
//!
//! Account management: creation, profile updates, password changes,
//! activation, deletion and paged listing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, request validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌────────────────┐
//! │   Service   │ ──► │ PasswordHasher │  ← argon2id
//! └──────┬──────┘     └────────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory and Postgres implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← User entity, projections, paging envelope
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{
//!     handlers,
//!     password::Argon2PasswordHasher,
//!     repository::InMemoryUserRepository,
//!     service::UserService,
//! };
//!
//! let service = UserService::new(InMemoryUserRepository::new(), Argon2PasswordHasher::new());
//! let router = handlers::router(service);
//! ```

pub mod commands;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod password;
pub mod postgres;
pub mod queries;
pub mod repository;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use commands::{
    ChangePasswordCommand, ChangePasswordRequest, CreateUserCommand, DeleteUserCommand,
    UpdateUserCommand, UpdateUserRequest,
};
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{CreatedResponse, PagedResult, Role, User, UserResponse};
pub use password::{Argon2PasswordHasher, PasswordHasher};
pub use postgres::PgUserRepository;
pub use queries::{GetUserByUsernameQuery, GetUserQuery, ListUsersQuery};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
