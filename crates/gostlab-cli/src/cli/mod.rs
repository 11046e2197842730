//! CLI for the gostlab hash/cipher client.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use gostlab_core::client::cipher::CipherMode;
use gostlab_core::config::{self, GostlabConfig};
use std::path::PathBuf;

use commands::{
    run_cipher, run_completions, run_hash, run_man, run_resolve_name, CipherArgs, ResolveArgs,
};

/// Top-level CLI for the gostlab client.
#[derive(Debug, Parser)]
#[command(name = "gostlab")]
#[command(about = "gostlab: client for the GOST hash and Magma cipher services", long_about = None)]
pub struct Cli {
    /// Service base URL (overrides `server_url` from config.toml).
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Upload a file and print the hash computed by the service.
    Hash {
        /// File to hash.
        path: PathBuf,
    },

    /// Encrypt or decrypt a file with the service and save the result.
    Cipher {
        /// File to process.
        path: PathBuf,
        /// encrypt or decrypt.
        #[arg(long)]
        mode: CipherMode,
        /// 256-bit key as 64 hex characters.
        #[arg(long, value_name = "HEX", conflicts_with = "key_file", required_unless_present = "key_file")]
        key_hex: Option<String>,
        /// File holding the key (32 raw bytes or hex text).
        #[arg(long, value_name = "PATH")]
        key_file: Option<PathBuf>,
        /// Initial counter value (up to 64 bits, hex).
        #[arg(long, value_name = "HEX")]
        counter: String,
        /// Name for the result when the server does not suggest one.
        #[arg(long, value_name = "NAME")]
        output_name: Option<String>,
        /// Directory to save the result in (default: config `download_dir` or current dir).
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },

    /// Show which filename a response would be saved under (no network).
    ResolveName {
        /// Raw Content-Disposition header value.
        #[arg(long, value_name = "VALUE")]
        header: Option<String>,
        /// Output name as the user would enter it.
        #[arg(long, value_name = "NAME")]
        output_name: Option<String>,
        /// Name of the uploaded file.
        #[arg(long, value_name = "NAME")]
        source: Option<String>,
    },

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        shell: Shell,
    },

    /// Print the man page (roff) to stdout.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Hash { path } => {
                let cfg = load_config(cli.server)?;
                run_hash(&cfg, path).await?;
            }
            CliCommand::Cipher {
                path,
                mode,
                key_hex,
                key_file,
                counter,
                output_name,
                out_dir,
            } => {
                let cfg = load_config(cli.server)?;
                let args = CipherArgs {
                    path,
                    mode,
                    key_hex,
                    key_file,
                    counter,
                    output_name,
                    out_dir,
                };
                run_cipher(&cfg, args).await?;
            }
            CliCommand::ResolveName {
                header,
                output_name,
                source,
            } => run_resolve_name(&ResolveArgs {
                header,
                output_name,
                source,
            })?,
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

/// Config from disk with the `--server` override applied.
fn load_config(server: Option<String>) -> Result<GostlabConfig> {
    let mut cfg = config::load_or_init()?;
    if let Some(server) = server {
        cfg.server_url = server;
    }
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests;
