//! Thumbnail extraction through ffmpeg

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use nice_embed_core::join_url;

use super::command::{run_tool, stderr_tail};
use crate::error::MediaError;

/// A JPEG frame written next to the embed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailArtifact {
    pub path: PathBuf,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct ThumbnailExtractor {
    ffmpeg_path: String,
    timeout: Duration,
    timestamp_secs: f64,
    output_dir: PathBuf,
    base_url: String,
}

impl ThumbnailExtractor {
    pub fn new(
        ffmpeg_path: impl Into<String>,
        timeout: Duration,
        timestamp_secs: f64,
        output_dir: impl Into<PathBuf>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            timeout,
            timestamp_secs,
            output_dir: output_dir.into(),
            base_url: base_url.into(),
        }
    }

    /// Grab one frame from `video_path` into `<output_dir>/<output_base_name>.jpg`.
    ///
    /// The frame is rendered under a hidden partial name and renamed into place
    /// only once it is known to be good, so a failed run leaves any earlier
    /// thumbnail untouched.
    #[tracing::instrument(skip(self), fields(
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "thumbnail"
    ))]
    pub async fn extract(
        &self,
        video_path: &Path,
        output_base_name: &str,
    ) -> Result<ThumbnailArtifact, MediaError> {
        let start = Instant::now();
        let file_name = format!("{}.jpg", output_base_name);
        let target = self.output_dir.join(&file_name);
        // ffmpeg picks the muxer from the extension, so the partial name keeps `.jpg`.
        let partial = self
            .output_dir
            .join(format!(".{}.partial.jpg", output_base_name));

        remove_if_exists(&partial).await?;

        let size = match self.render_frame(video_path, &partial).await {
            Ok(size) => size,
            Err(e) => {
                if let Err(cleanup) = remove_if_exists(&partial).await {
                    tracing::warn!(error = %cleanup, "Failed to remove partial thumbnail");
                }
                return Err(e);
            }
        };
        tokio::fs::rename(&partial, &target).await?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis() as u64,
            size_bytes = size,
            thumbnail = %file_name,
            "Thumbnail extracted"
        );

        Ok(ThumbnailArtifact {
            url: join_url(&self.base_url, &[&file_name]),
            path: target,
        })
    }

    /// Run ffmpeg into `output` and return the size of the written frame.
    async fn render_frame(&self, video_path: &Path, output: &Path) -> Result<u64, MediaError> {
        let args: Vec<OsString> = vec![
            "-y".into(),
            "-ss".into(),
            self.timestamp_secs.to_string().into(),
            "-i".into(),
            video_path.as_os_str().to_owned(),
            "-frames:v".into(),
            "1".into(),
            "-q:v".into(),
            "2".into(),
            output.as_os_str().to_owned(),
        ];
        let result = run_tool("ffmpeg", &self.ffmpeg_path, args, self.timeout).await?;

        if !result.status.success() {
            return Err(MediaError::ThumbnailGeneration(format!(
                "ffmpeg exited with {}: {}",
                result.status,
                stderr_tail(&result)
            )));
        }

        // ffmpeg exits 0 without writing a frame when the seek lands past the end.
        let size = match tokio::fs::metadata(output).await {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => return Err(MediaError::Io(e)),
        };
        if size == 0 {
            return Err(MediaError::ThumbnailGeneration(
                "ffmpeg produced no frame".to_string(),
            ));
        }
        Ok(size)
    }
}

async fn remove_if_exists(path: &Path) -> Result<(), MediaError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(MediaError::Io(e)),
    }
}
