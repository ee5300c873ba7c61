//! Public URL construction

/// Join a base URL with path segments using single `/` separators.
///
/// Trailing slashes on the base and surrounding slashes on each segment are
/// trimmed. Segments are expected to be sanitized already and are not escaped.
pub fn join_url(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        url.push('/');
        url.push_str(segment);
    }
    url
}
