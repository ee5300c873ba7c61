//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`; anything convertible into
//! [`AppError`] renders as a JSON [`ErrorResponse`] with the status and code the
//! error's [`ErrorMetadata`] declares.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nice_embed_core::{is_production_environment, AppError, ErrorMetadata, LogLevel};
use nice_embed_processing::MediaError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether retrying the same request may succeed
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: both the trait and AppError live in other crates)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<MediaError> for HttpAppError {
    fn from(err: MediaError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        HttpAppError(multipart_error(err))
    }
}

/// Classify a multipart read failure: oversized bodies are 413, anything else is a bad upload.
pub fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::InvalidUpload(format!("Failed to read multipart body: {}", err.body_text()))
    }
}

/// A request whose body is not `multipart/form-data` never reaches the field reader.
pub fn multipart_rejection(rejection: MultipartRejection) -> AppError {
    AppError::InvalidUpload(format!(
        "Expected a multipart/form-data body: {}",
        rejection.body_text()
    ))
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error.detailed_message(), error_type = error_type, "Request failed");
        }
    }
}

// Same lookup order as `AppConfig`: blank values fall through to the next key.
fn is_production_env() -> bool {
    ["ENVIRONMENT", "APP_ENV"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.trim().is_empty())
        .is_some_and(|env| is_production_environment(&env))
}

impl HttpAppError {
    pub fn to_error_response(&self, hide_details: bool) -> ErrorResponse {
        let app_error = &self.0;
        let show_details = !hide_details && !app_error.is_sensitive();

        ErrorResponse {
            error: app_error.client_message(),
            details: show_details.then(|| app_error.detailed_message()),
            error_type: show_details.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(&self.0);

        let body = self.to_error_response(is_production_env());
        (status, Json(body)).into_response()
    }
}
