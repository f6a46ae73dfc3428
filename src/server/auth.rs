//! Shared-secret header authentication.
//!
//! Every cover request must carry the configured secret in the
//! `x-upload-token` header:
//!
//! ```text
//! curl -X DELETE -H "x-upload-token: $COVER_API_KEY" http://localhost:8081/cover.png
//! ```
//!
//! The check runs as middleware, before any extractor touches the request
//! body, so a rejected request never causes file I/O.
//!
//! # Example
//!
//! ```rust
//! use cover_store::server::auth::TokenAuth;
//!
//! let auth = TokenAuth::new("my-secret");
//! assert!(auth.verify(Some("my-secret".as_bytes())).is_ok());
//! assert!(auth.verify(Some("wrong".as_bytes())).is_err());
//! assert!(auth.verify(None).is_err());
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;
use tracing::warn;

use super::handlers::ErrorResponse;

/// Header carrying the shared secret.
pub const UPLOAD_TOKEN_HEADER: &str = "x-upload-token";

// =============================================================================
// Types
// =============================================================================

/// Authentication error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// The token header is absent
    MissingToken,

    /// The token header does not match the secret
    InvalidToken,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Missing {} header", UPLOAD_TOKEN_HEADER),
            AuthError::InvalidToken => write!(f, "Invalid token"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        warn!(reason = %self, "Rejected unauthenticated request");

        // Clients get the same message either way
        let body = ErrorResponse::new("Invalid token");
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

// =============================================================================
// Token Authenticator
// =============================================================================

/// Static shared-secret authenticator.
#[derive(Clone)]
pub struct TokenAuth {
    secret: Arc<[u8]>,
}

impl std::fmt::Debug for TokenAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuth").finish_non_exhaustive()
    }
}

impl TokenAuth {
    /// Create an authenticator for the given secret.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: Arc::from(secret.as_ref()),
        }
    }

    /// Check a presented token against the secret.
    ///
    /// Comparison is constant-time in the token contents.
    pub fn verify(&self, presented: Option<&[u8]>) -> Result<(), AuthError> {
        let presented = presented.ok_or(AuthError::MissingToken)?;

        if bool::from(presented.ct_eq(&self.secret)) {
            Ok(())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Axum middleware rejecting requests without the correct token header.
///
/// # Example
///
/// ```ignore
/// use axum::{middleware, routing::delete, Router};
/// use cover_store::server::auth::{token_middleware, TokenAuth};
///
/// let app = Router::new()
///     .route("/{filename}", delete(delete_handler))
///     .layer(middleware::from_fn_with_state(TokenAuth::new("secret"), token_middleware));
/// ```
pub async fn token_middleware(
    State(auth): State<TokenAuth>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let presented = request
        .headers()
        .get(UPLOAD_TOKEN_HEADER)
        .map(|value| value.as_bytes());

    auth.verify(presented)?;

    Ok(next.run(request).await)
}
