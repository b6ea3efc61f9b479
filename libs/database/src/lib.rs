//! PostgreSQL plumbing for the accounts services.
//!
//! - connection pool setup from [`postgres::PostgresConfig`], with retry on startup
//! - migration runner generic over any sea-orm `MigratorTrait`
//! - health probes for readiness endpoints
//! - [`BaseRepository`], the entity-generic CRUD core that domain repositories wrap
//!
//! # Features
//!
//! - `postgres` (default): SeaORM-backed PostgreSQL support
//! - `config`: `core_config::FromEnv` for [`postgres::PostgresConfig`] and [`RetryConfig`]
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "accounts_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod repository;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};

#[cfg(feature = "postgres")]
pub use repository::BaseRepository;
