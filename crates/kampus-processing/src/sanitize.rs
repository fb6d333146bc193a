const MAX_FILENAME_LENGTH: usize = 255;

/// Sanitize a client filename for display and metadata.
///
/// Keeps the final path component only (either separator style), replaces anything
/// other than alphanumerics, `.`, `-` and `_` with `_`, and caps the length. Names
/// that still contain `..` or end up shorter than three characters become
/// `invalid_filename` or `file`. The result is never used to build an on-disk path.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();

    if base.contains("..") {
        return "invalid_filename".to_string();
    }

    let sanitized: String = base
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches('_').is_empty() || sanitized.len() < 3 {
        "file".to_string()
    } else {
        sanitized
    }
}
