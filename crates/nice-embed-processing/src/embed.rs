//! Embed page generation
//!
//! Discord (and most other chat clients) only inline videos up to a small size.
//! Larger ones still get a player when the link points at an HTML page carrying
//! `twitter:player` metadata, so every video upload gets one of these pages.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use nice_embed_core::join_url;

use crate::error::MediaError;

/// An HTML page written to disk as `<filename>.html` and served as `<filename>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedPage {
    pub path: PathBuf,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct EmbedPageGenerator {
    output_dir: PathBuf,
    base_url: String,
}

impl EmbedPageGenerator {
    pub fn new(output_dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_url: base_url.into(),
        }
    }

    /// Render and write the page for `filename`, replacing any previous one.
    #[tracing::instrument(skip(self, thumbnail_url))]
    pub async fn generate(
        &self,
        video_url: &str,
        width: u32,
        height: u32,
        thumbnail_url: &str,
        filename: &str,
    ) -> Result<EmbedPage, MediaError> {
        let html = render_embed_page(video_url, width, height, thumbnail_url, &Local::now());

        let path = self.output_dir.join(format!("{}.html", filename));
        tokio::fs::write(&path, html).await?;

        let url = join_url(&self.base_url, &[filename]);
        tracing::debug!(page = %path.display(), url = %url, "Embed page written");

        Ok(EmbedPage { path, url })
    }
}

/// Render the embed page markup.
pub fn render_embed_page(
    video_url: &str,
    width: u32,
    height: u32,
    thumbnail_url: &str,
    generated_at: &DateTime<Local>,
) -> String {
    let video_url = escape_attr(video_url);
    let thumbnail_url = escape_attr(thumbnail_url);
    format!(
        r#"<!DOCTYPE html>
<html>
<!-- Generated at {generated} -->
<head>
    <meta property="og:type" content="video.other">
    <meta property="twitter:player" content="{video_url}">
    <meta property="og:video:type" content="text/html">
    <meta property="og:video:width" content="{width}">
    <meta property="og:video:height" content="{height}">
    <meta name="twitter:image" content="{thumbnail_url}">
    <meta http-equiv="refresh" content="0;url={video_url}">
</head>
</html>
"#,
        generated = generated_at.format("%Y-%m-%d %H:%M:%S"),
    )
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
