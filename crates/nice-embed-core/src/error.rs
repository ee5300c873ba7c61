//! Error types module
//!
//! Every failure a request can run into is folded into [`AppError`]. Each variant
//! self-describes its HTTP presentation through [`ErrorMetadata`], so the API layer
//! never has to match on variants to pick a status code.

use std::io;
use std::time::Duration;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors caused by the client (bad uploads)
    Debug,
    /// Recoverable or non-client-facing problems (webhook delivery)
    Warn,
    /// Unexpected server-side failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "NO_VIDEO_STREAM")
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same request may succeed
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("No video stream found: {0}")]
    NoVideoStream(String),

    #[error("Thumbnail generation failed: {0}")]
    ThumbnailGeneration(String),

    #[error("{tool} did not finish within {timeout:?}")]
    MediaProcessingTimeout { tool: String, timeout: Duration },

    #[error("Media tool error: {0}")]
    MediaTool(String),

    #[error("IO error: {0}")]
    Io(#[source] io::Error),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Io(err)
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::Configuration(_) => (
            500,
            "CONFIGURATION_ERROR",
            false,
            Some("Contact the server operator"),
            true,
            LogLevel::Error,
        ),
        AppError::InvalidUpload(_) => (
            400,
            "INVALID_UPLOAD",
            false,
            Some("Send a multipart form with a named, non-empty 'file' field"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Upload a smaller file"),
            false,
            LogLevel::Debug,
        ),
        AppError::NoVideoStream(_) => (
            400,
            "NO_VIDEO_STREAM",
            false,
            Some("Upload a playable video file or use a non-video content type"),
            false,
            LogLevel::Debug,
        ),
        AppError::ThumbnailGeneration(_) => (
            500,
            "THUMBNAIL_GENERATION_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::MediaProcessingTimeout { .. } => (
            504,
            "MEDIA_PROCESSING_TIMEOUT",
            true,
            Some("Retry with a smaller file"),
            false,
            LogLevel::Warn,
        ),
        AppError::MediaTool(_) => (
            500,
            "MEDIA_TOOL_ERROR",
            false,
            Some("Contact the server operator"),
            true,
            LogLevel::Error,
        ),
        AppError::Io(_) => (
            500,
            "IO_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Notification(_) => (
            502,
            "NOTIFICATION_ERROR",
            true,
            None,
            true,
            LogLevel::Warn,
        ),
        AppError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Configuration(_) => "Configuration",
            AppError::InvalidUpload(_) => "InvalidUpload",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::NoVideoStream(_) => "NoVideoStream",
            AppError::ThumbnailGeneration(_) => "ThumbnailGeneration",
            AppError::MediaProcessingTimeout { .. } => "MediaProcessingTimeout",
            AppError::MediaTool(_) => "MediaTool",
            AppError::Io(_) => "Io",
            AppError::Notification(_) => "Notification",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Configuration(_) => "Server is misconfigured".to_string(),
            AppError::InvalidUpload(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(_) => "Uploaded file is too large".to_string(),
            AppError::NoVideoStream(_) => "Uploaded file contains no video stream".to_string(),
            AppError::ThumbnailGeneration(_) => "Failed to generate video thumbnail".to_string(),
            AppError::MediaProcessingTimeout { tool, timeout } => {
                format!("Media processing timed out ({} after {:?})", tool, timeout)
            }
            AppError::MediaTool(_) => "Media processing is unavailable".to_string(),
            AppError::Io(_) => "Failed to store file".to_string(),
            AppError::Notification(_) => "Failed to deliver notification".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}
