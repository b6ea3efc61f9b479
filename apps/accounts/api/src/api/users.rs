use axum::Router;
use domain_users::{Argon2PasswordHasher, PgUserRepository, UserService, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgUserRepository::new(state.db.clone());
    let service = UserService::new(repository, Argon2PasswordHasher::new());
    handlers::router(service)
}
