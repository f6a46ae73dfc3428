use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by a tier store while touching the filesystem
#[derive(Debug, Error)]
pub enum StoreError {
    /// Writing a tier file failed
    #[error("Failed writing {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Removing a tier file failed for a reason other than it being absent
    #[error("Failed deleting {}: {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Probing a tier file failed
    #[error("Failed probing {}: {source}", .path.display())]
    Probe {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Path of the file the failed operation targeted.
    pub fn path(&self) -> &Path {
        match self {
            StoreError::Write { path, .. }
            | StoreError::Remove { path, .. }
            | StoreError::Probe { path, .. } => path,
        }
    }
}

/// Errors that can occur while deriving resized variants
#[derive(Debug, Clone, Error)]
pub enum ResizeError {
    /// Source bytes are not a PNG or JPEG image the decoder understands
    #[error("Unsupported image format: {reason}")]
    UnsupportedFormat { reason: String },

    /// Source bytes could not be decoded
    #[error("Failed to decode image: {message}")]
    Decode { message: String },

    /// A variant could not be re-encoded
    #[error("Failed to encode {bound}px variant: {message}")]
    Encode { bound: u32, message: String },
}

/// Request-level failures of the cover endpoints.
///
/// Every variant maps to exactly one HTTP status and client-visible message.
#[derive(Debug, Error)]
pub enum CoverError {
    /// Request body is not `multipart/form-data`
    #[error("Request must be multipart/form-data with a file")]
    NotMultipart,

    /// Multipart body carries no file part, or the file part has no filename
    #[error("No file uploaded")]
    NoFile,

    /// File bytes crossed the configured cap while streaming
    #[error("File too big! Cover should be smaller than {}.", limit_label(.limit))]
    TooLarge { limit: usize },

    /// Declared content type is not an accepted image type
    #[error("Invalid file type")]
    InvalidType { content_type: Option<String> },

    /// Filename could escape its tier directory
    #[error("Invalid file name")]
    InvalidFilename { filename: String },

    /// Filename is present in no tier
    #[error("Cover '{filename}' does not exist")]
    NotFound { filename: String },

    /// Uploaded image could not be decoded or re-encoded
    #[error("Failed processing image: {0}")]
    Resize(#[from] ResizeError),

    /// A tier file could not be written
    #[error("Failed writing {}", .0.path().display())]
    Write(#[source] StoreError),

    /// A tier file could not be removed
    #[error("Failed deleting {}", .0.path().display())]
    Delete(#[source] StoreError),

    /// Existence probe failed before any deletion happened
    #[error("Failed probing {}", .0.path().display())]
    Probe(#[source] StoreError),

    /// Blocking resize task panicked or was cancelled
    #[error("Image processing task failed: {message}")]
    Task { message: String },
}

/// Human-readable upload cap: whole megabytes when exact, bytes otherwise.
fn limit_label(limit: &usize) -> String {
    if *limit >= 1_000_000 && *limit % 1_000_000 == 0 {
        format!("{}MB", limit / 1_000_000)
    } else {
        format!("{} bytes", limit)
    }
}
