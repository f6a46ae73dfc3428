//! Configuration management for the cover service.
//!
//! Settings come from command-line arguments or environment variables. A
//! `.env` file in the working directory is loaded before parsing, so both
//! styles of deployment work unchanged.
//!
//! # Environment Variables
//!
//! - `UPLOAD_DIR` - Base directory holding `original/`, `mid/` and `low/` (required)
//! - `COVER_API_KEY` - Shared secret expected in `x-upload-token` (required)
//! - `COVER_HOST` - Server bind address (default: 0.0.0.0)
//! - `COVER_PORT` - Server port (default: 8081)
//! - `COVER_MAX_FILE_SIZE` - Upload cap in bytes (default: 10000000)

use std::path::PathBuf;

use clap::Parser;

use crate::server::DEFAULT_MAX_FILE_SIZE;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8081;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Cover Store - stores uploaded cover images with resized variants.
#[derive(Parser, Clone)]
#[command(name = "cover-store")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "COVER_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "COVER_PORT")]
    pub port: u16,

    /// Base directory for stored covers.
    ///
    /// The `original`, `mid` and `low` subdirectories are created at startup
    /// if they do not exist.
    #[arg(long, env = "UPLOAD_DIR")]
    pub upload_dir: PathBuf,

    /// Shared secret clients must send in the `x-upload-token` header.
    #[arg(long, env = "COVER_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Maximum accepted file size in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE, env = "COVER_MAX_FILE_SIZE")]
    pub max_file_size: usize,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("upload_dir", &self.upload_dir)
            .field("api_key", &"<redacted>")
            .field("max_file_size", &self.max_file_size)
            .field("verbose", &self.verbose)
            .field("no_tracing", &self.no_tracing)
            .finish()
    }
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err(
                "API key must not be empty. Set --api-key or COVER_API_KEY".to_string(),
            );
        }

        if self.upload_dir.as_os_str().is_empty() {
            return Err(
                "Upload directory is required. Set --upload-dir or UPLOAD_DIR".to_string(),
            );
        }

        if self.max_file_size == 0 {
            return Err("max_file_size must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================
