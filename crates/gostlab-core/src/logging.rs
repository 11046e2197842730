//! Tracing setup for the CLI: an append-only log file in the XDG state
//! directory, with stderr as the place of last resort.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "info,gostlab=debug,gostlab_core=debug";
const LOG_FILE_NAME: &str = "gostlab.log";

/// Destination of one log event.
enum LogSink {
    File(fs::File),
    Stderr,
}

impl io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::File(f) => f.write(buf),
            LogSink::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::File(f) => f.flush(),
            LogSink::Stderr => io::stderr().lock().flush(),
        }
    }
}

/// Hands each event a clone of the log file handle. A handle that cannot
/// be cloned sends that event to stderr instead.
struct SharedLogFile(fs::File);

impl<'a> MakeWriter<'a> for SharedLogFile {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        match self.0.try_clone() {
            Ok(f) => LogSink::File(f),
            Err(_) => LogSink::Stderr,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `$XDG_STATE_HOME/gostlab/gostlab.log`, creating the directory.
fn log_file_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("gostlab")?;
    let dir = dirs.get_state_home();
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir.join(LOG_FILE_NAME))
}

/// Sends tracing output to the gostlab log file.
///
/// Errors if the state directory or the file cannot be opened, or if a
/// global subscriber is already set. Callers fall back to
/// [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(BoxMakeWriter::new(SharedLogFile(file)))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install subscriber: {}", e))?;

    tracing::info!("gostlab logging initialized at {}", path.display());
    Ok(())
}

/// Sends tracing output to stderr. A subscriber that is already installed
/// is left in place.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Seek, SeekFrom, Write};

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn shared_log_file_appends_each_event() {
        let mut tmp = tempfile::tempfile().unwrap();
        let make = SharedLogFile(tmp.try_clone().unwrap());

        let mut first = make.make_writer();
        assert!(matches!(first, LogSink::File(_)));
        first.write_all(b"one\n").unwrap();
        make.make_writer().write_all(b"two\n").unwrap();

        tmp.seek(SeekFrom::Start(0)).unwrap();
        let mut text = String::new();
        tmp.read_to_string(&mut text).unwrap();
        assert_eq!(text, "one\ntwo\n");
    }

    #[test]
    fn stderr_init_twice_is_harmless() {
        init_logging_stderr();
        init_logging_stderr();
    }
}
