//! Per-request cancellation token.

use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;
use tokio_util::sync::{CancellationToken, DropGuard};

/// A [`CancellationToken`] tied to the lifetime of the handler future.
///
/// Hyper drops the handler future when the client disconnects; the drop guard
/// held here then cancels the token, so storage calls awaiting
/// `token.cancelled()` stop instead of running to completion for nobody.
///
/// ```ignore
/// async fn get_user(cancel: RequestCancellation, UuidPath(id): UuidPath) -> ... {
///     service.get_user(GetUserQuery { id }, cancel.token()).await
/// }
/// ```
pub struct RequestCancellation {
    token: CancellationToken,
    _guard: DropGuard,
}

impl RequestCancellation {
    pub fn new() -> Self {
        let token = CancellationToken::new();
        let guard = token.clone().drop_guard();
        Self {
            token,
            _guard: guard,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Default for RequestCancellation {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> FromRequestParts<S> for RequestCancellation
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::new())
    }
}
