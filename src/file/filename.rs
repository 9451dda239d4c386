//! Filename helpers for stored uploads.

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
///
/// Works per character, so the result has the same number of characters as
/// the input and safe characters keep their positions. Applying it twice is
/// the same as applying it once.
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| if is_safe_char(c) { c } else { '_' })
        .collect()
}

/// Whether `filename` is non-empty and already made only of safe characters.
pub fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty() && filename.chars().all(is_safe_char)
}

fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Extract the lowercased extension of a client-supplied filename.
///
/// Only the last `/`-separated component is considered, and the extension is
/// whatever follows its last `.`. A leading dot counts, so `.htaccess` has the
/// extension `htaccess`; a trailing dot yields an empty extension.
pub fn extract_extension(filename: &str) -> Option<String> {
    let basename = filename.rsplit('/').next().unwrap_or(filename);
    basename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
}
