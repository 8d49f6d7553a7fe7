/// Replaces each forbidden filename character and any whitespace with `_`.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if is_forbidden(c) || c.is_whitespace() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
}

/// Archive entry name for one grid image: `{code}_{original filename}`,
/// both parts sanitized.
pub fn entry_name(code: &str, original: &str) -> String {
    format!("{}_{}", sanitize(code), sanitize(original))
}

/// Name of the composite cover entry.
pub fn cover_name(code: &str) -> String {
    format!("{}_cover.jpg", sanitize(code))
}

/// Name of the delivered archive.
pub fn archive_file_name(code: &str) -> String {
    format!("sref_{}.zip", sanitize(code))
}

/// Swaps the extension after the last dot, or appends one when missing.
pub fn swap_extension(name: &str, ext: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, _)) => format!("{stem}.{ext}"),
        None => format!("{name}.{ext}"),
    }
}

/// Final path segment of a URL, used as the original filename.
pub fn last_path_segment(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
