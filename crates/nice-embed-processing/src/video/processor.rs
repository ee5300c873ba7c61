//! Video prober - resolution lookup through ffprobe

use std::ffi::OsStr;
use std::path::Path;
use std::time::{Duration, Instant};

use serde::Deserialize;

use super::command::{run_tool, stderr_tail};
use crate::error::MediaError;
use crate::metadata::VideoMetadata;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u64>,
    height: Option<u64>,
}

/// Extract the dimensions of the first video stream from `ffprobe -print_format json` output.
pub fn parse_probe_output(stdout: &[u8]) -> Result<VideoMetadata, MediaError> {
    let probe: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| MediaError::NoVideoStream(format!("unreadable ffprobe output: {}", e)))?;

    let stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| MediaError::NoVideoStream("file has no video stream".to_string()))?;

    let dimension = |value: Option<u64>, name: &str| {
        value
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| *v > 0)
            .ok_or_else(|| MediaError::NoVideoStream(format!("video stream has no valid {}", name)))
    };

    Ok(VideoMetadata {
        width: dimension(stream.width, "width")?,
        height: dimension(stream.height, "height")?,
    })
}

#[derive(Debug, Clone)]
pub struct VideoProber {
    ffprobe_path: String,
    timeout: Duration,
}

impl VideoProber {
    pub fn new(ffprobe_path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
            timeout,
        }
    }

    /// Read the width and height of a stored video.
    #[tracing::instrument(skip(self), fields(
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    pub async fn probe(&self, video_path: &Path) -> Result<VideoMetadata, MediaError> {
        let start = Instant::now();

        let mut args: Vec<&OsStr> = ["-v", "quiet", "-print_format", "json", "-show_streams"]
            .into_iter()
            .map(OsStr::new)
            .collect();
        args.push(video_path.as_os_str());

        let output = run_tool("ffprobe", &self.ffprobe_path, args, self.timeout).await?;

        if !output.status.success() {
            return Err(MediaError::NoVideoStream(format!(
                "ffprobe exited with {}: {}",
                output.status,
                stderr_tail(&output)
            )));
        }

        let metadata = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis() as u64,
            width = metadata.width,
            height = metadata.height,
            "Video probe completed"
        );

        Ok(metadata)
    }
}
