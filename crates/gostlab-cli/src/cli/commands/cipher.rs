//! `gostlab cipher <file> ...` – encrypt/decrypt via the service and save the result.

use super::progress;
use anyhow::{Context, Result};
use gostlab_core::client::cipher::{request_cipher, CipherMode, CipherRequest, KeySource};
use gostlab_core::config::GostlabConfig;
use gostlab_core::storage;
use std::path::PathBuf;

/// Arguments of the `cipher` subcommand.
#[derive(Debug, Clone)]
pub struct CipherArgs {
    pub path: PathBuf,
    pub mode: CipherMode,
    pub key_hex: Option<String>,
    pub key_file: Option<PathBuf>,
    pub counter: String,
    pub output_name: Option<String>,
    pub out_dir: Option<PathBuf>,
}

impl CipherArgs {
    fn into_request(self) -> CipherRequest {
        // clap guarantees exactly one of key_hex/key_file; an empty hex string is caught by validation.
        let key = match (self.key_file, self.key_hex) {
            (Some(file), _) => KeySource::File(file),
            (None, hex) => KeySource::Hex(hex.unwrap_or_default()),
        };
        CipherRequest {
            input: self.path,
            key,
            counter: self.counter,
            mode: self.mode,
            output_name: self.output_name,
        }
    }
}

pub async fn run_cipher(cfg: &GostlabConfig, args: CipherArgs) -> Result<()> {
    let out_dir = match args.out_dir.clone().or_else(|| cfg.download_dir.clone()) {
        Some(dir) => dir,
        None => std::env::current_dir().context("current directory")?,
    };
    let server = cfg.server_url.clone();
    let min_size = cfg.min_file_size;
    let opts = cfg.transport();
    let request = args.into_request();

    let saved = tokio::task::spawn_blocking(move || -> Result<PathBuf> {
        let output = request_cipher(&server, &request, min_size, &opts, &mut progress::render)?;
        storage::save_output(&out_dir, &output.filename, &output.data)
    })
    .await??;

    println!("{}", saved.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CipherArgs {
        CipherArgs {
            path: PathBuf::from("in.bin"),
            mode: CipherMode::Encrypt,
            key_hex: None,
            key_file: None,
            counter: "01".to_string(),
            output_name: None,
            out_dir: None,
        }
    }

    #[test]
    fn key_file_becomes_file_source() {
        let mut a = args();
        a.key_file = Some(PathBuf::from("k.key"));
        assert_eq!(a.into_request().key, KeySource::File(PathBuf::from("k.key")));
    }

    #[test]
    fn key_hex_becomes_hex_source() {
        let mut a = args();
        a.key_hex = Some("aa".repeat(32));
        assert_eq!(a.into_request().key, KeySource::Hex("aa".repeat(32)));
    }
}
