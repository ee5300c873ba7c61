//! Upload pipeline: store the bytes, then publish them.
//!
//! Generic files are published as-is. Videos are probed, get a thumbnail and an
//! embed page, and are published through that page.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use nice_embed_core::filename::is_storable;
use nice_embed_core::{join_url, sanitize_filename, AppConfig, AppError};
use nice_embed_processing::{EmbedPageGenerator, ThumbnailExtractor, VideoProber};
use tokio::io::AsyncWriteExt;

/// How an upload is published, decided from its declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Video,
    Generic,
}

impl UploadKind {
    pub fn from_content_type(content_type: &str) -> Self {
        let is_video = content_type
            .trim()
            .get(..6)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("video/"));
        if is_video {
            UploadKind::Video
        } else {
            UploadKind::Generic
        }
    }
}

/// An upload that has been fully written to disk.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub filename: String,
    pub path: PathBuf,
    pub kind: UploadKind,
    pub size_bytes: u64,
}

#[derive(Clone)]
pub struct UploadService {
    config: Arc<AppConfig>,
    prober: VideoProber,
    thumbnails: ThumbnailExtractor,
    pages: EmbedPageGenerator,
}

impl UploadService {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let prober = VideoProber::new(config.ffprobe_path.clone(), config.media_tool_timeout);
        let thumbnails = ThumbnailExtractor::new(
            config.ffmpeg_path.clone(),
            config.media_tool_timeout,
            config.thumbnail_timestamp_secs,
            config.upload_dir.clone(),
            config.base_url.clone(),
        );
        let pages = EmbedPageGenerator::new(config.upload_dir.clone(), config.base_url.clone());

        Self {
            config,
            prober,
            thumbnails,
            pages,
        }
    }

    /// Stream an upload body to its final location.
    ///
    /// Videos land in `<upload_dir>/video/`, everything else in `<upload_dir>/`.
    /// An existing file with the same sanitized name is replaced.
    #[tracing::instrument(skip(self, body))]
    pub async fn store<S, E>(
        &self,
        raw_filename: &str,
        content_type: &str,
        body: S,
    ) -> Result<StoredFile, AppError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<AppError>,
    {
        let filename = sanitize_filename(raw_filename);
        if !is_storable(&filename) {
            return Err(AppError::InvalidUpload(format!(
                "Filename {:?} has no usable characters",
                raw_filename
            )));
        }

        let kind = UploadKind::from_content_type(content_type);
        let dir = match kind {
            UploadKind::Video => self.config.video_dir(),
            UploadKind::Generic => self.config.upload_dir.clone(),
        };
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(&filename);
        let size_bytes = match write_body(&path, body).await {
            Ok(0) => {
                remove_partial(&path).await;
                return Err(AppError::InvalidUpload("Uploaded file is empty".to_string()));
            }
            Ok(size) => size,
            Err(e) => {
                remove_partial(&path).await;
                return Err(e);
            }
        };

        tracing::info!(
            filename = %filename,
            size_bytes,
            kind = ?kind,
            "Upload stored"
        );

        Ok(StoredFile {
            filename,
            path,
            kind,
            size_bytes,
        })
    }

    /// Produce the public URL for a stored upload, generating the video artifacts first.
    #[tracing::instrument(skip(self, stored), fields(filename = %stored.filename, kind = ?stored.kind))]
    pub async fn publish(&self, stored: &StoredFile) -> Result<String, AppError> {
        let base_url = &self.config.base_url;
        match stored.kind {
            UploadKind::Generic => Ok(join_url(base_url, &[&stored.filename])),
            UploadKind::Video => {
                let metadata = self.prober.probe(&stored.path).await?;
                let thumbnail = self.thumbnails.extract(&stored.path, &stored.filename).await?;
                let video_url = join_url(base_url, &["video", &stored.filename]);
                let page = self
                    .pages
                    .generate(
                        &video_url,
                        metadata.width,
                        metadata.height,
                        &thumbnail.url,
                        &stored.filename,
                    )
                    .await?;
                Ok(page.url)
            }
        }
    }
}

async fn write_body<S, E>(path: &Path, body: S) -> Result<u64, AppError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<AppError>,
{
    futures::pin_mut!(body);
    let mut file = tokio::fs::File::create(path).await?;
    let mut written: u64 = 0;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(Into::<AppError>::into)?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

async fn remove_partial(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial upload");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn service(upload_dir: &Path, tools: &[(&str, &Path)]) -> UploadService {
        let mut env: HashMap<&str, String> = HashMap::from([
            ("BASE_URL", "https://cdn.example.com".to_string()),
            ("UPLOAD_DIR", upload_dir.display().to_string()),
            ("WEBHOOK_URL", "http://127.0.0.1:9/hook".to_string()),
            ("MEDIA_TOOL_TIMEOUT_SECS", "5".to_string()),
        ]);
        for (key, path) in tools {
            env.insert(*key, path.display().to_string());
        }
        let config = AppConfig::from_lookup(|key| env.get(key).cloned()).unwrap();
        UploadService::new(Arc::new(config))
    }

    fn body(parts: &[&'static [u8]]) -> impl Stream<Item = Result<Bytes, AppError>> {
        stream::iter(
            parts
                .iter()
                .map(|p| Ok(Bytes::from_static(p)))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_classify_by_content_type() {
        assert_eq!(UploadKind::from_content_type("video/mp4"), UploadKind::Video);
        assert_eq!(UploadKind::from_content_type("Video/WebM"), UploadKind::Video);
        assert_eq!(UploadKind::from_content_type("image/png"), UploadKind::Generic);
        assert_eq!(UploadKind::from_content_type("text/plain"), UploadKind::Generic);
        assert_eq!(UploadKind::from_content_type("video"), UploadKind::Generic);
        assert_eq!(UploadKind::from_content_type(""), UploadKind::Generic);
    }

    #[tokio::test]
    async fn test_generic_upload_sanitized_and_published() {
        let dir = TempDir::new().unwrap();
        let uploads = service(dir.path(), &[]);

        let stored = uploads
            .store("my file?.txt", "text/plain", body(&[b"hello ", b"world"]))
            .await
            .unwrap();

        assert_eq!(stored.filename, "my.file.txt");
        assert_eq!(stored.path, dir.path().join("my.file.txt"));
        assert_eq!(stored.size_bytes, 11);
        assert_eq!(std::fs::read(&stored.path).unwrap(), b"hello world");
        assert_eq!(
            uploads.publish(&stored).await.unwrap(),
            "https://cdn.example.com/my.file.txt"
        );
    }

    #[tokio::test]
    async fn test_same_name_overwrites() {
        let dir = TempDir::new().unwrap();
        let uploads = service(dir.path(), &[]);

        uploads
            .store("a.txt", "text/plain", body(&[b"first"]))
            .await
            .unwrap();
        let stored = uploads
            .store("a.txt", "text/plain", body(&[b"second"]))
            .await
            .unwrap();

        assert_eq!(std::fs::read(stored.path).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_unusable_filename_rejected() {
        let dir = TempDir::new().unwrap();
        let uploads = service(dir.path(), &[]);

        for name in ["", "???", ".", ".."] {
            let err = uploads
                .store(name, "text/plain", body(&[b"x"]))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidUpload(_)), "{:?}", name);
        }
    }

    #[tokio::test]
    async fn test_empty_body_rejected_and_removed() {
        let dir = TempDir::new().unwrap();
        let uploads = service(dir.path(), &[]);

        let err = uploads
            .store("empty.bin", "application/octet-stream", body(&[]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidUpload(_)));
        assert!(!dir.path().join("empty.bin").exists());
    }

    #[tokio::test]
    async fn test_broken_stream_removes_partial_file() {
        let dir = TempDir::new().unwrap();
        let uploads = service(dir.path(), &[]);
        let broken = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(AppError::InvalidUpload("connection reset".to_string())),
        ]);

        let err = uploads
            .store("clip.txt", "text/plain", broken)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("connection reset"));
        assert!(!dir.path().join("clip.txt").exists());
    }

    #[cfg(unix)]
    mod video {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
            let path = dir.join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[tokio::test]
        async fn test_video_round_trip() {
            let tools = TempDir::new().unwrap();
            let dir = TempDir::new().unwrap();
            let ffprobe = script(
                tools.path(),
                "ffprobe",
                r#"echo '{"streams":[{"codec_type":"video","width":422,"height":422}]}'"#,
            );
            let ffmpeg = script(
                tools.path(),
                "ffmpeg",
                "for last; do :; done\nprintf 'jpeg' > \"$last\"",
            );
            let uploads = service(
                dir.path(),
                &[("FFPROBE_PATH", ffprobe.as_path()), ("FFMPEG_PATH", ffmpeg.as_path())],
            );

            let stored = uploads
                .store("test.mp4", "video/mp4", body(&[b"\x00\x00\x00\x18ftypmp42"]))
                .await
                .unwrap();
            assert_eq!(stored.kind, UploadKind::Video);
            assert_eq!(stored.path, dir.path().join("video").join("test.mp4"));

            let url = uploads.publish(&stored).await.unwrap();
            assert_eq!(url, "https://cdn.example.com/test.mp4");

            let html = std::fs::read_to_string(dir.path().join("test.mp4.html")).unwrap();
            assert!(html.contains(
                r#"<meta property="twitter:player" content="https://cdn.example.com/video/test.mp4">"#
            ));
            assert!(html.contains(
                r#"<meta name="twitter:image" content="https://cdn.example.com/test.mp4.jpg">"#
            ));
            assert!(html.contains(r#"<meta property="og:video:width" content="422">"#));
            assert!(html.contains(r#"<meta property="og:video:height" content="422">"#));
            assert!(dir.path().join("test.mp4.jpg").exists());
        }

        #[tokio::test]
        async fn test_video_without_stream_leaves_no_artifacts() {
            let tools = TempDir::new().unwrap();
            let dir = TempDir::new().unwrap();
            let ffprobe = script(
                tools.path(),
                "ffprobe",
                r#"echo '{"streams":[{"codec_type":"audio"}]}'"#,
            );
            let ffmpeg = script(
                tools.path(),
                "ffmpeg",
                "for last; do :; done\nprintf 'jpeg' > \"$last\"",
            );
            let uploads = service(
                dir.path(),
                &[("FFPROBE_PATH", ffprobe.as_path()), ("FFMPEG_PATH", ffmpeg.as_path())],
            );

            let stored = uploads
                .store("song.mp4", "video/mp4", body(&[b"audio"]))
                .await
                .unwrap();
            let err = uploads.publish(&stored).await.unwrap_err();

            assert!(matches!(err, AppError::NoVideoStream(_)));
            assert!(!dir.path().join("song.mp4.html").exists());
            assert!(!dir.path().join("song.mp4.jpg").exists());
        }
    }
}
