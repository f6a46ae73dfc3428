//! HTTP request handlers for the cover API.
//!
//! # Endpoints
//!
//! - `POST /` - Upload a cover and derive its resized tiers
//! - `DELETE /{filename}` - Remove a cover from every tier
//! - `GET /health/live` - Health check endpoint

use std::sync::Arc;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::CoverError;
use crate::resize::Resizer;
use crate::storage::{validate_filename, Removal, Tier, TierStore};

use super::limit::BoundedBuffer;

/// Content types accepted for uploads.
pub const ACCEPTED_CONTENT_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/jpg"];

/// Default upload cap in bytes.
pub const DEFAULT_MAX_FILE_SIZE: usize = 10_000_000;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state passed to the cover handlers.
pub struct AppState<S: TierStore> {
    /// Where tier files live
    pub store: Arc<S>,

    /// Variant generator
    pub resizer: Resizer,

    /// Upload cap in bytes
    pub max_file_size: usize,
}

impl<S: TierStore> AppState<S> {
    /// Create application state with the default upload cap.
    pub fn new(store: S) -> Self {
        Self::with_max_file_size(store, DEFAULT_MAX_FILE_SIZE)
    }

    /// Create application state with a custom upload cap.
    pub fn with_max_file_size(store: S, max_file_size: usize) -> Self {
        Self {
            store: Arc::new(store),
            resizer: Resizer::new(),
            max_file_size,
        }
    }
}

impl<S: TierStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            resizer: self.resizer.clone(),
            max_file_size: self.max_file_size,
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,

    /// Human-readable error message
    pub error: String,
}

impl ErrorResponse {
    /// Create a failure envelope.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Successful upload response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,

    /// Stored filename, identical across tiers
    pub file: String,
}

/// Successful delete response.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,

    /// Number of tiers a file was actually removed from
    pub deleted: usize,

    /// Human-readable summary
    pub message: String,
}

impl DeleteResponse {
    fn new(filename: &str, deleted: usize) -> Self {
        Self {
            success: true,
            deleted,
            message: format!("{} removed from {} folders", filename, deleted),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

impl CoverError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            CoverError::NotMultipart
            | CoverError::NoFile
            | CoverError::TooLarge { .. }
            | CoverError::InvalidType { .. }
            | CoverError::InvalidFilename { .. } => StatusCode::BAD_REQUEST,
            CoverError::NotFound { .. } => StatusCode::NOT_FOUND,
            CoverError::Resize(_)
            | CoverError::Write(_)
            | CoverError::Delete(_)
            | CoverError::Probe(_)
            | CoverError::Task { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert CoverError to HTTP response.
///
/// - 5xx errors are logged at ERROR level with the underlying cause
/// - 404 is logged at DEBUG level
/// - other 4xx errors are logged at WARN level
impl IntoResponse for CoverError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            let cause = std::error::Error::source(&self)
                .map(|source| source.to_string())
                .unwrap_or_default();
            error!(status = status.as_u16(), cause = %cause, "Server error: {}", message);
        } else if status == StatusCode::NOT_FOUND {
            debug!(status = status.as_u16(), "Cover not found: {}", message);
        } else {
            match &self {
                CoverError::InvalidType { content_type } => warn!(
                    status = status.as_u16(),
                    content_type = content_type.as_deref().unwrap_or("<none>"),
                    "Client error: {}",
                    message
                ),
                CoverError::InvalidFilename { filename } => warn!(
                    status = status.as_u16(),
                    filename = %filename.escape_debug(),
                    "Client error: {}",
                    message
                ),
                _ => warn!(status = status.as_u16(), "Client error: {}", message),
            }
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// =============================================================================
// Upload
// =============================================================================

/// The file part of an upload, fully read under the size cap.
struct UploadedFile {
    filename: String,
    content_type: Option<String>,
    data: Bytes,
}

/// Read the first multipart part that carries a filename.
///
/// Non-file parts before it are skipped, and anything after it is ignored.
async fn read_file_part(
    multipart: &mut Multipart,
    limit: usize,
) -> Result<UploadedFile, CoverError> {
    let to_cover_error = |err: MultipartError| {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            CoverError::TooLarge { limit }
        } else {
            debug!(error = %err, "Malformed multipart body");
            CoverError::NotMultipart
        }
    };

    while let Some(mut field) = multipart.next_field().await.map_err(to_cover_error)? {
        let Some(filename) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
        else {
            continue;
        };
        let content_type = field.content_type().map(str::to_owned);

        let mut buffer = BoundedBuffer::new(limit);
        while let Some(chunk) = field.chunk().await.map_err(to_cover_error)? {
            buffer
                .push(&chunk)
                .map_err(|exceeded| CoverError::TooLarge {
                    limit: exceeded.limit,
                })?;
        }

        return Ok(UploadedFile {
            filename,
            content_type,
            data: buffer.into_bytes(),
        });
    }

    Err(CoverError::NoFile)
}

/// Whether a declared content type is one of [`ACCEPTED_CONTENT_TYPES`].
///
/// Parameters such as `; charset=binary` are ignored and the comparison is
/// case-insensitive.
pub fn is_accepted_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    ACCEPTED_CONTENT_TYPES.contains(&essence.as_str())
}

/// Handle cover uploads.
///
/// # Endpoint
///
/// `POST /` with a `multipart/form-data` body carrying one file part.
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// { "success": true, "file": "cover.png" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: not multipart, no file, file too large, invalid
///   file type, or a filename that could escape its tier directory
/// - `500 Internal Server Error`: image decode/encode or write failure. Tiers
///   written before the failure are left in place.
pub async fn upload_handler<S: TierStore + 'static>(
    State(state): State<AppState<S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, CoverError> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!(rejection = %rejection, "Upload is not multipart");
        CoverError::NotMultipart
    })?;

    let upload = read_file_part(&mut multipart, state.max_file_size).await?;

    let content_type = upload.content_type.as_deref().unwrap_or_default();
    if !is_accepted_content_type(content_type) {
        return Err(CoverError::InvalidType {
            content_type: upload.content_type,
        });
    }

    let filename = validate_filename(&upload.filename)?;

    state
        .store
        .write(Tier::Original, filename, upload.data.clone())
        .await
        .map_err(CoverError::Write)?;

    let resizer = state.resizer.clone();
    let source = upload.data.clone();
    let variants = tokio::task::spawn_blocking(move || resizer.derive(&source))
        .await
        .map_err(|e| CoverError::Task {
            message: e.to_string(),
        })??;

    for variant in variants {
        debug!(
            tier = %variant.tier,
            width = variant.width,
            height = variant.height,
            "Derived variant"
        );
        state
            .store
            .write(variant.tier, filename, variant.data)
            .await
            .map_err(CoverError::Write)?;
    }

    info!(file = %filename, bytes = upload.data.len(), "Stored cover");

    Ok(Json(UploadResponse {
        success: true,
        file: filename.to_string(),
    }))
}

// =============================================================================
// Delete
// =============================================================================

/// Handle cover deletion.
///
/// # Endpoint
///
/// `DELETE /{filename}`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// { "success": true, "deleted": 3, "message": "cover.png removed from 3 folders" }
/// ```
///
/// A file that disappears between the existence probe and its removal is
/// skipped rather than treated as a failure.
///
/// # Errors
///
/// - `400 Bad Request`: filename could escape its tier directory
/// - `404 Not Found`: filename exists in no tier
/// - `500 Internal Server Error`: a removal failed. Tiers removed before the
///   failure stay removed.
pub async fn delete_handler<S: TierStore + 'static>(
    State(state): State<AppState<S>>,
    Path(filename): Path<String>,
) -> Result<Json<DeleteResponse>, CoverError> {
    let filename = validate_filename(&filename)?;

    let mut present = Vec::with_capacity(Tier::ALL.len());
    for tier in Tier::ALL {
        if state
            .store
            .exists(tier, filename)
            .await
            .map_err(CoverError::Probe)?
        {
            present.push(tier);
        }
    }

    if present.is_empty() {
        return Err(CoverError::NotFound {
            filename: filename.to_string(),
        });
    }

    let mut deleted = 0;
    for tier in present {
        match state
            .store
            .remove(tier, filename)
            .await
            .map_err(CoverError::Delete)?
        {
            Removal::Removed => deleted += 1,
            Removal::Missing => debug!(tier = %tier, file = %filename, "Already gone"),
        }
    }

    info!(file = %filename, deleted, "Deleted cover");

    Ok(Json(DeleteResponse::new(filename, deleted)))
}

// =============================================================================
// Health
// =============================================================================

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health/live`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
