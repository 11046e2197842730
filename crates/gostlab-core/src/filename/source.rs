//! Filename derivation from the uploaded file's own name.

/// Extensions stripped from the source name, checked in order; only the first match is removed.
const STRIPPED_EXTENSIONS: [&str; 2] = [".gost", ".bin"];

/// Derives an output name from the uploaded file's name.
///
/// A trailing `.gost` or `.bin` (any case) is removed, so decrypting
/// `report.pdf.gost` yields `report.pdf`. Returns `None` when nothing is left.
pub fn derive_from_source(source_name: &str) -> Option<String> {
    let lowered = source_name.to_ascii_lowercase();
    let stem = STRIPPED_EXTENSIONS
        .iter()
        .find(|ext| lowered.ends_with(*ext))
        .map(|ext| &source_name[..source_name.len() - ext.len()])
        .unwrap_or(source_name);

    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}
