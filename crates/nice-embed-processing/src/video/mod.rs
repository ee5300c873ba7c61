//! Video processing module

mod command;
pub mod processor;
pub mod thumbnail;

pub use processor::{parse_probe_output, VideoProber};
pub use thumbnail::{ThumbnailArtifact, ThumbnailExtractor};
