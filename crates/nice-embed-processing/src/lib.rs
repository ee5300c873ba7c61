//! nice-embed media processing
//!
//! Wraps the external ffprobe/ffmpeg tools and renders the embed pages that make
//! chat clients show an inline player.

pub mod embed;
pub mod error;
pub mod metadata;
pub mod video;

#[cfg(test)]
pub(crate) mod test_support;

pub use embed::{render_embed_page, EmbedPage, EmbedPageGenerator};
pub use error::MediaError;
pub use metadata::VideoMetadata;
pub use video::{parse_probe_output, ThumbnailArtifact, ThumbnailExtractor, VideoProber};
