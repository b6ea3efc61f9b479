//! Custom extractors for Axum handlers.
//!
//! All of them reject with [`AppError`](crate::errors::AppError), so a bad path,
//! body or query string produces the same error body as a domain failure.

pub mod cancellation;
pub mod uuid_path;
pub mod validated_json;
pub mod validated_query;

pub use cancellation::RequestCancellation;
pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
pub use validated_query::ValidatedQuery;
