use std::io;
use std::time::Duration;

use nice_embed_core::AppError;

/// Errors raised while probing videos, extracting thumbnails or writing embed pages.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("no video stream: {0}")]
    NoVideoStream(String),

    #[error("thumbnail generation failed: {0}")]
    ThumbnailGeneration(String),

    #[error("{tool} did not finish within {timeout:?}")]
    Timeout { tool: &'static str, timeout: Duration },

    #[error("failed to run {tool}: {source}")]
    Tool {
        tool: &'static str,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::NoVideoStream(msg) => AppError::NoVideoStream(msg),
            MediaError::ThumbnailGeneration(msg) => AppError::ThumbnailGeneration(msg),
            MediaError::Timeout { tool, timeout } => AppError::MediaProcessingTimeout {
                tool: tool.to_string(),
                timeout,
            },
            MediaError::Tool { tool, source } => {
                AppError::MediaTool(format!("{}: {}", tool, source))
            }
            MediaError::Io(e) => AppError::Io(e),
        }
    }
}
