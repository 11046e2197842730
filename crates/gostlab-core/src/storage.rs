//! Saving returned blobs into the download directory.
//!
//! The resolved filename is sanitized before it touches the filesystem, and
//! existing files are never overwritten: `name.ext` becomes `name (1).ext`.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::filename::{sanitize_filename, truncate_bytes, DEFAULT_FILENAME, NAME_MAX};

/// Upper bound on `name (n).ext` attempts before giving up.
const MAX_SUFFIX: u32 = 1000;

/// Writes `data` into `dir` under a safe version of `name` and returns the final path.
///
/// Data goes to a temp file in `dir` first and is renamed into place, so a
/// partially written result never appears under the final name.
pub fn save_output(dir: &Path, name: &str, data: &[u8]) -> Result<PathBuf> {
    let mut safe = sanitize_filename(name);
    if safe.is_empty() {
        safe = DEFAULT_FILENAME.to_string();
    }

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    tmp.write_all(data)
        .with_context(|| format!("write temp file in {}", dir.display()))?;
    tmp.flush()?;

    for n in 0..=MAX_SUFFIX {
        let candidate = dir.join(numbered_name(&safe, n));
        match tmp.persist_noclobber(&candidate) {
            Ok(_) => {
                tracing::info!(path = %candidate.display(), bytes = data.len(), "saved output");
                return Ok(candidate);
            }
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                tmp = e.file;
            }
            Err(e) => {
                return Err(e.error).with_context(|| format!("save {}", candidate.display()));
            }
        }
    }
    anyhow::bail!(
        "no free name for {} in {} after {} attempts",
        safe,
        dir.display(),
        MAX_SUFFIX
    )
}

/// `report.pdf` with n=2 → `report (2).pdf`; n=0 leaves the name unchanged.
/// A leading dot is not treated as an extension separator.
///
/// The stem is shortened so the result stays within `NAME_MAX` bytes. An
/// extension too long to keep is treated as part of the stem.
fn numbered_name(name: &str, n: u32) -> String {
    if n == 0 {
        return name.to_string();
    }
    let suffix = format!(" ({})", n);
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot + suffix.len() < NAME_MAX => name.split_at(dot),
        _ => (name, ""),
    };
    let room = NAME_MAX - suffix.len() - ext.len();
    format!("{}{}{}", truncate_bytes(stem, room), suffix, ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn numbered_names() {
        assert_eq!(numbered_name("report.pdf", 0), "report.pdf");
        assert_eq!(numbered_name("report.pdf", 2), "report (2).pdf");
        assert_eq!(numbered_name("archive.tar.gz", 1), "archive.tar (1).gz");
        assert_eq!(numbered_name("README", 3), "README (3)");
        assert_eq!(numbered_name(".hidden", 1), ".hidden (1)");
    }

    #[test]
    fn numbered_name_fits_name_max() {
        let long = format!("{}.bin", "a".repeat(251));
        let numbered = numbered_name(&long, 1);
        assert_eq!(numbered.len(), NAME_MAX);
        assert!(numbered.ends_with(" (1).bin"));

        let wide = format!("{}.b", "é".repeat(126));
        let numbered = numbered_name(&wide, 12);
        assert!(numbered.len() <= NAME_MAX);
        assert!(numbered.ends_with(" (12).b"));

        let long_ext = format!("a.{}", "b".repeat(253));
        let numbered = numbered_name(&long_ext, 1);
        assert_eq!(numbered.len(), NAME_MAX);
        assert!(numbered.starts_with("a.b"));
        assert!(numbered.ends_with(" (1)"));
    }

    #[test]
    fn max_length_name_collides_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let name = format!("{}.bin", "x".repeat(251));
        let first = save_output(dir.path(), &name, b"one").unwrap();
        let second = save_output(dir.path(), &name, b"two").unwrap();
        assert_eq!(first, dir.path().join(&name));
        let second_name = second.file_name().unwrap().to_str().unwrap();
        assert!(second_name.len() <= NAME_MAX);
        assert!(second_name.ends_with(" (1).bin"));
        assert_eq!(fs::read(&second).unwrap(), b"two");
    }

    #[test]
    fn saves_under_resolved_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_output(dir.path(), "result file.bin", b"abc").unwrap();
        assert_eq!(path, dir.path().join("result file.bin"));
        assert_eq!(fs::read(&path).unwrap(), b"abc");
    }

    #[test]
    fn does_not_overwrite_existing() {
        let dir = tempfile::tempdir().unwrap();
        let first = save_output(dir.path(), "out.bin", b"one").unwrap();
        let second = save_output(dir.path(), "out.bin", b"two").unwrap();
        assert_eq!(second, dir.path().join("out (1).bin"));
        assert_eq!(fs::read(&first).unwrap(), b"one");
        assert_eq!(fs::read(&second).unwrap(), b"two");
    }

    #[test]
    fn path_traversal_stays_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_output(dir.path(), "../../escape.txt", b"x").unwrap();
        assert_eq!(path.parent().unwrap(), dir.path());
    }

    #[test]
    fn unusable_name_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_output(dir.path(), "..", b"x").unwrap();
        assert_eq!(path, dir.path().join(DEFAULT_FILENAME));
    }

    #[test]
    fn missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(save_output(&missing, "a.bin", b"x").is_err());
    }
}
