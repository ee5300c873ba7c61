//! Media metadata types

use serde::{Deserialize, Serialize};

/// Pixel dimensions of the first video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
}
