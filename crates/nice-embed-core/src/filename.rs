//! Upload filename sanitizing

/// Characters removed from uploaded filenames.
pub const DENYLIST: &[char] = &[
    '"', ',', ';', ':', '?', '{', '}', '@', '*', '/', '&', '#', '%', '^', '+', '<', '=', '>', '|',
    '$', '「', '」', '△',
];

/// Map a raw uploaded filename to one that is safe on disk and inside a URL path.
///
/// Spaces become `.` first, then every [`DENYLIST`] character is dropped. The
/// result may be empty; callers decide whether that is acceptable.
pub fn sanitize_filename(raw: &str) -> String {
    raw.chars()
        .map(|c| if c == ' ' { '.' } else { c })
        .filter(|c| !DENYLIST.contains(c))
        .collect()
}

/// Whether a sanitized name can address a regular file inside a directory.
pub fn is_storable(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".."
}
