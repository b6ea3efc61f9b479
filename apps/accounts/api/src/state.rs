//! Shared application state.

use database::postgres::DatabaseConnection;

/// Cloned into each router that needs it (the connection is an `Arc`'d pool)
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: DatabaseConnection,
}
