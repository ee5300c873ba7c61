//! Configuration module
//!
//! Everything is read once at start-up from the process environment (after
//! loading `.env`), then shared read-only through the application state.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

// Common constants
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MEDIA_TOOL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_THUMBNAIL_TIMESTAMP_SECS: f64 = 1.0;
const DEFAULT_MAX_UPLOAD_SIZE_MB: usize = 500;
const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 10;
const DEFAULT_WEBHOOK_RATE_LIMIT_RETRIES: u32 = 3;
const DEFAULT_HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Application configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Public base URL, no trailing slash
    pub base_url: String,
    /// Upload root, no trailing slash
    pub upload_dir: PathBuf,
    pub webhook_url: String,
    pub server_port: u16,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub media_tool_timeout: Duration,
    pub thumbnail_timestamp_secs: f64,
    pub max_upload_size_bytes: usize,
    pub webhook_timeout: Duration,
    pub webhook_rate_limit_retries: u32,
    pub http_concurrency_limit: usize,
    pub environment: String,
}

impl AppConfig {
    /// Load configuration from `.env` and the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = required(&lookup, "BASE_URL", Some("SERVE_DOMAIN"))?
            .trim_end_matches('/')
            .to_string();

        let upload_dir = required(&lookup, "UPLOAD_DIR", Some("UPLOAD_FOLDER"))?;
        let upload_dir = PathBuf::from(trim_dir(&upload_dir));

        let webhook_url = required(&lookup, "WEBHOOK_URL", None)?;

        let server_port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;

        let ffmpeg_path = non_empty(&lookup, "FFMPEG_PATH").unwrap_or_else(|| "ffmpeg".to_string());
        let ffprobe_path =
            non_empty(&lookup, "FFPROBE_PATH").unwrap_or_else(|| "ffprobe".to_string());

        let media_tool_timeout = Duration::from_secs(parse_or(
            &lookup,
            "MEDIA_TOOL_TIMEOUT_SECS",
            DEFAULT_MEDIA_TOOL_TIMEOUT_SECS,
        )?);

        let thumbnail_timestamp_secs: f64 = parse_or(
            &lookup,
            "THUMBNAIL_TIMESTAMP_SECS",
            DEFAULT_THUMBNAIL_TIMESTAMP_SECS,
        )?;
        if !thumbnail_timestamp_secs.is_finite() || thumbnail_timestamp_secs < 0.0 {
            return Err(AppError::Configuration(
                "THUMBNAIL_TIMESTAMP_SECS must be a non-negative number".to_string(),
            ));
        }

        let max_upload_size_mb: usize =
            parse_or(&lookup, "MAX_UPLOAD_SIZE_MB", DEFAULT_MAX_UPLOAD_SIZE_MB)?;

        let webhook_timeout = Duration::from_secs(parse_or(
            &lookup,
            "WEBHOOK_TIMEOUT_SECS",
            DEFAULT_WEBHOOK_TIMEOUT_SECS,
        )?);

        let webhook_rate_limit_retries = parse_or(
            &lookup,
            "WEBHOOK_RATE_LIMIT_RETRIES",
            DEFAULT_WEBHOOK_RATE_LIMIT_RETRIES,
        )?;

        let http_concurrency_limit = parse_or(
            &lookup,
            "HTTP_CONCURRENCY_LIMIT",
            DEFAULT_HTTP_CONCURRENCY_LIMIT,
        )?
        .max(1);

        let environment = non_empty(&lookup, "ENVIRONMENT")
            .or_else(|| non_empty(&lookup, "APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        Ok(Self {
            base_url,
            upload_dir,
            webhook_url,
            server_port,
            ffmpeg_path,
            ffprobe_path,
            media_tool_timeout,
            thumbnail_timestamp_secs,
            max_upload_size_bytes: max_upload_size_mb.saturating_mul(1024 * 1024),
            webhook_timeout,
            webhook_rate_limit_retries,
            http_concurrency_limit,
            environment,
        })
    }

    /// Directory holding video originals.
    pub fn video_dir(&self) -> PathBuf {
        self.upload_dir.join("video")
    }

    pub fn is_production(&self) -> bool {
        is_production_environment(&self.environment)
    }
}

/// Whether an `ENVIRONMENT`/`APP_ENV` value names production.
pub fn is_production_environment(name: &str) -> bool {
    let name = name.trim();
    name.eq_ignore_ascii_case("production") || name.eq_ignore_ascii_case("prod")
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, key: &str, legacy: Option<&str>) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, key)
        .or_else(|| legacy.and_then(|alias| non_empty(lookup, alias)))
        .ok_or_else(|| AppError::Configuration(format!("{} must be set", key)))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match non_empty(lookup, key) {
        Some(raw) => raw.parse().map_err(|_| {
            AppError::Configuration(format!("{} has an invalid value: {:?}", key, raw))
        }),
        None => Ok(default),
    }
}

// Keep "/" itself intact when it is the whole path.
fn trim_dir(raw: &str) -> &str {
    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() && raw.starts_with('/') {
        "/"
    } else {
        trimmed
    }
}
