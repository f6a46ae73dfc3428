//! HTTP server layer for the cover API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │              POST /        DELETE /{filename}                   │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │    auth     │  │  handlers   │  │        routes           │  │
//! │  │ (token gate)│  │ (upload,    │  │  (router config)        │  │
//! │  │             │  │  delete)    │  │                         │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod limit;
pub mod routes;

pub use auth::{token_middleware, AuthError, TokenAuth, UPLOAD_TOKEN_HEADER};
pub use handlers::{
    delete_handler, health_handler, is_accepted_content_type, upload_handler, AppState,
    DeleteResponse, ErrorResponse, HealthResponse, UploadResponse, ACCEPTED_CONTENT_TYPES,
    DEFAULT_MAX_FILE_SIZE,
};
pub use limit::{BoundedBuffer, LimitExceeded};
pub use routes::{create_router, RouterConfig, HEALTH_PATH, MULTIPART_OVERHEAD};
