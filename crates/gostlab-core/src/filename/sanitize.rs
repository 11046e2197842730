//! Filesystem-safe rendering of a resolved filename.

/// Linux NAME_MAX, in bytes.
pub(crate) const NAME_MAX: usize = 255;

/// Makes a server- or user-supplied name safe to join onto a directory.
///
/// - Replaces NUL, `/`, `\`, and control characters with `_`
/// - Collapses runs of replaced characters into one `_`
/// - Trims leading/trailing spaces and dots
/// - Limits length to 255 bytes on a char boundary
///
/// Unlike a plain slug, interior spaces are kept so `result file.bin` stays readable.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_replaced = false;

    for c in name.chars() {
        if c == '\0' || c == '/' || c == '\\' || c.is_control() {
            if !prev_replaced {
                out.push('_');
            }
            prev_replaced = true;
        } else {
            out.push(c);
            prev_replaced = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.');
    truncate_bytes(trimmed, NAME_MAX).to_string()
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char.
pub(crate) fn truncate_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut take = max;
    while take > 0 && !s.is_char_boundary(take) {
        take -= 1;
    }
    &s[..take]
}
