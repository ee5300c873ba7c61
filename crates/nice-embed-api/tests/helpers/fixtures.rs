//! Test fixtures: fake media tools and multipart bodies.

use std::fs;
use std::path::{Path, PathBuf};

/// ffmpeg stand-in writing a few bytes to its last argument (the output file).
pub const FFMPEG_WRITES_FRAME: &str = "for last; do :; done\nprintf 'jpeg' > \"$last\"";

/// ffprobe stand-in that fails like it does on a corrupt file.
pub const PROBE_FAILS: &str = "echo 'moov atom not found' >&2\nexit 1";

/// ffprobe stand-in reporting only an audio stream.
pub const PROBE_AUDIO_ONLY: &str =
    "echo '{\"streams\":[{\"index\":0,\"codec_type\":\"audio\",\"sample_rate\":\"44100\"}]}'";

/// ffprobe stand-in reporting one video stream of the given size.
pub fn probe_reporting(width: u32, height: u32) -> String {
    format!(
        "echo '{{\"streams\":[{{\"index\":0,\"codec_type\":\"video\",\"width\":{},\"height\":{}}}]}}'",
        width, height
    )
}

#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// First bytes of an MP4 file; the fake tools never look at them.
pub fn mp4_header() -> Vec<u8> {
    let mut data = vec![0x00, 0x00, 0x00, 0x18];
    data.extend_from_slice(b"ftypmp42");
    data.extend_from_slice(&[0x00; 12]);
    data
}

pub const BOUNDARY: &str = "nice-embed-test-boundary";

/// Hand-built multipart body, for parts axum-test cannot express (no filename, no content type).
pub fn raw_multipart(name: &str, filename: Option<&str>, content_type: Option<&str>, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", name);
    if let Some(filename) = filename {
        disposition.push_str(&format!("; filename=\"{}\"", filename));
    }
    body.extend_from_slice(disposition.as_bytes());
    body.extend_from_slice(b"\r\n");
    if let Some(content_type) = content_type {
        body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
