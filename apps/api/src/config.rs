use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Default lifetime of a PDF nobody downloads.
pub const DEFAULT_OUTPUT_TTL_SECS: u64 = 60 * 60;

/// Default cap on a single upload.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 500 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every setting has a default, so the service starts with an empty environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Where uploads are staged and generated PDFs wait for download.
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Undelivered PDFs older than this are swept.
    pub output_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            upload_dir: std::env::var_os("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join("sheetpress")),
            max_upload_bytes: optional_env("MAX_UPLOAD_BYTES")
                .map(|v| {
                    v.parse::<usize>()
                        .context("MAX_UPLOAD_BYTES must be a byte count")
                })
                .transpose()?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            output_ttl: Duration::from_secs(
                optional_env("OUTPUT_TTL_SECS")
                    .map(|v| {
                        v.parse::<u64>()
                            .context("OUTPUT_TTL_SECS must be a number of seconds")
                    })
                    .transpose()?
                    .unwrap_or(DEFAULT_OUTPUT_TTL_SECS),
            ),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
