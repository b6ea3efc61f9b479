//! Query-string extractor with validation.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Query parameters that have passed `Validate::validate`.
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state).await?;
        params.validate()?;
        Ok(ValidatedQuery(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Page {
        #[validate(range(min = 1))]
        #[serde(default = "first")]
        page: u64,
    }

    fn first() -> u64 {
        1
    }

    fn app() -> Router {
        Router::new().route(
            "/items",
            get(|ValidatedQuery(q): ValidatedQuery<Page>| async move { q.page.to_string() }),
        )
    }

    async fn status_of(uri: &str) -> StatusCode {
        app()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_defaults_apply() {
        assert_eq!(status_of("/items").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_out_of_range_is_rejected() {
        assert_eq!(status_of("/items?page=0").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unparseable_is_rejected() {
        assert_eq!(status_of("/items?page=abc").await, StatusCode::BAD_REQUEST);
    }
}
