use std::fs;
use std::path::{Path, PathBuf};

/// Write an executable `/bin/sh` script standing in for ffprobe or ffmpeg.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// ffprobe stand-in reporting a single video stream of the given size.
#[cfg(unix)]
pub fn fake_ffprobe(dir: &Path, width: u32, height: u32) -> PathBuf {
    write_script(
        dir,
        "ffprobe",
        &format!(
            "cat <<'JSON'\n{{\"streams\":[{{\"index\":0,\"codec_type\":\"audio\"}},{{\"index\":1,\"codec_type\":\"video\",\"width\":{},\"height\":{}}}]}}\nJSON",
            width, height
        ),
    )
}

/// ffmpeg stand-in writing a few bytes to its last argument.
#[cfg(unix)]
pub fn fake_ffmpeg(dir: &Path) -> PathBuf {
    write_script(dir, "ffmpeg", "for last; do :; done\nprintf 'jpeg' > \"$last\"")
}
