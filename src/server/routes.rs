//! Router configuration for the cover API.
//!
//! # Route Structure
//!
//! ```text
//! /health/live     GET     - Health check (public)
//! /                POST    - Upload a cover (token required)
//! /{filename}      DELETE  - Delete a cover (token required)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use cover_store::server::routes::{create_router, RouterConfig};
//! use cover_store::storage::FsTierStore;
//!
//! let store = FsTierStore::new("/var/lib/covers");
//! store.ensure_dirs().await?;
//!
//! let router = create_router(store, RouterConfig::new("my-secret-key"));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8081").await?;
//! axum::serve(listener, router).await?;
//! ```

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::auth::{token_middleware, TokenAuth};
use super::handlers::{
    delete_handler, health_handler, upload_handler, AppState, DEFAULT_MAX_FILE_SIZE,
};
use crate::storage::TierStore;

/// Room left in the request body limit for multipart boundaries, part
/// headers and small non-file fields.
pub const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Public liveness route.
pub const HEALTH_PATH: &str = "/health/live";

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Shared secret expected in the `x-upload-token` header
    pub api_key: String,

    /// Upload cap in bytes for the file part
    pub max_file_size: usize,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl std::fmt::Debug for RouterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterConfig")
            .field("max_file_size", &self.max_file_size)
            .field("enable_tracing", &self.enable_tracing)
            .finish_non_exhaustive()
    }
}

impl RouterConfig {
    /// Create a new router configuration with the given shared secret.
    ///
    /// By default:
    /// - Uploads are capped at 10,000,000 bytes
    /// - Tracing is enabled
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            enable_tracing: true,
        }
    }

    /// Set the upload cap in bytes.
    pub fn with_max_file_size(mut self, bytes: usize) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }

    /// Transport-level request body limit for uploads.
    pub fn body_limit(&self) -> usize {
        self.max_file_size.saturating_add(MULTIPART_OVERHEAD)
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// Cover routes sit behind the token middleware. The health check is public
/// and lives under two segments so no cover filename can collide with it.
pub fn create_router<S>(store: S, config: RouterConfig) -> Router
where
    S: TierStore + 'static,
{
    let app_state = AppState::with_max_file_size(store, config.max_file_size);
    let auth = TokenAuth::new(&config.api_key);

    // Auth is layered on the cover routes only, and runs before any body
    // extractor
    let cover_routes = Router::new()
        .route(
            "/",
            post(upload_handler::<S>).layer(DefaultBodyLimit::max(config.body_limit())),
        )
        .route("/{filename}", delete(delete_handler::<S>))
        .with_state(app_state)
        .layer(middleware::from_fn_with_state(auth, token_middleware));

    let router = Router::new()
        .route(HEALTH_PATH, get(health_handler))
        .merge(cover_routes);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

// =============================================================================
// Tests
// =============================================================================
