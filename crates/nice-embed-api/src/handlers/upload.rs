use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use futures::TryStreamExt;
use nice_embed_core::{AppError, ErrorMetadata};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{multipart_error, multipart_rejection, ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Multipart field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Public URL to share: the embed page for videos, the file itself otherwise
    pub html_url: String,
}

#[utoipa::path(
    post,
    path = "/uploadfiles/",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "Single field named `file`"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Not a multipart body, missing file, unusable filename or no video stream", body = ErrorResponse),
        (status = 413, description = "Body larger than MAX_UPLOAD_SIZE_MB"),
        (status = 500, description = "Storage or media tool failure", body = ErrorResponse),
        (status = 504, description = "ffprobe or ffmpeg timed out", body = ErrorResponse)
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let mut raw_filename = None;
    let outcome = match multipart {
        Ok(multipart) => receive_and_publish(&state, multipart, &mut raw_filename).await,
        Err(rejection) => Err(multipart_rejection(rejection).into()),
    };

    let message = match &outcome {
        Ok(html_url) => format!("{} was uploaded.", html_url),
        Err(HttpAppError(err)) => format!(
            "Failed to upload {}: {}",
            raw_filename.as_deref().unwrap_or("<unnamed file>"),
            err.client_message()
        ),
    };
    let notifier = state.notifier.clone();
    tokio::spawn(async move {
        if let Err(e) = notifier.notify(&message).await {
            tracing::warn!(error = %e, "Failed to send upload notification");
        }
    });

    outcome.map(|html_url| Json(UploadResponse { html_url }))
}

async fn receive_and_publish(
    state: &AppState,
    mut multipart: Multipart,
    raw_filename: &mut Option<String>,
) -> Result<String, HttpAppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::InvalidUpload("File field has no filename".to_string()))?;
        *raw_filename = Some(filename.clone());

        let content_type = field
            .content_type()
            .map(str::to_string)
            .ok_or_else(|| AppError::InvalidUpload("File field has no content type".to_string()))?;

        tracing::debug!(filename = %filename, content_type = %content_type, "Receiving upload");

        let body = field.map_err(multipart_error);
        let stored = state.uploads.store(&filename, &content_type, body).await?;
        let html_url = state.uploads.publish(&stored).await?;
        return Ok(html_url);
    }

    Err(AppError::InvalidUpload("No file provided".to_string()).into())
}
