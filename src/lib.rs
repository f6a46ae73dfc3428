//! # Cover Store
//!
//! An authenticated HTTP service that stores uploaded cover images on local
//! disk together with two downscaled variants.
//!
//! ## Features
//!
//! - **Three storage tiers**: `original/` keeps the uploaded bytes, `mid/` and
//!   `low/` hold copies bounded to 768×768 and 384×384
//! - **Streaming size cap**: uploads are rejected as soon as they cross the
//!   limit, before anything is written
//! - **Shared-secret gate**: every cover request must carry `x-upload-token`
//! - **Best-effort delete**: removes a cover from whichever tiers hold it
//!
//! ## Architecture
//!
//! - [`storage`] - Tier layout and the filesystem store
//! - [`resize`] - Decoding and bounding-box resizing
//! - [`server`] - Axum handlers, token middleware and router
//! - [`config`] - CLI and environment configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use cover_store::{create_router, FsTierStore, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let store = FsTierStore::new("/var/lib/covers");
//!     store.ensure_dirs().await?;
//!
//!     let router = create_router(store, RouterConfig::new("my-secret"));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8081").await?;
//!     axum::serve(listener, router).await
//! }
//! ```

pub mod config;
pub mod error;
pub mod resize;
pub mod server;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use error::{CoverError, ResizeError, StoreError};
pub use resize::{fit_within, Resizer, Variant};
pub use server::{
    create_router, delete_handler, health_handler, token_middleware, upload_handler, AppState,
    AuthError, BoundedBuffer, DeleteResponse, ErrorResponse, HealthResponse, LimitExceeded,
    RouterConfig, TokenAuth, UploadResponse, ACCEPTED_CONTENT_TYPES, DEFAULT_MAX_FILE_SIZE,
    UPLOAD_TOKEN_HEADER,
};
pub use storage::{validate_filename, FsTierStore, Removal, Tier, TierStore};
