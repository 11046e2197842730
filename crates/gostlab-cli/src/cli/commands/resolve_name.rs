//! `gostlab resolve-name` – run the filename resolver on given inputs.

use anyhow::Result;
use gostlab_core::filename::{resolve_filename, FilenameInputs};

/// Inputs of the `resolve-name` subcommand.
#[derive(Debug, Clone, Default)]
pub struct ResolveArgs {
    pub header: Option<String>,
    pub output_name: Option<String>,
    pub source: Option<String>,
}

pub fn run_resolve_name(args: &ResolveArgs) -> Result<()> {
    println!("{}", resolve(args));
    Ok(())
}

fn resolve(args: &ResolveArgs) -> String {
    resolve_filename(&FilenameInputs {
        content_disposition: args.header.as_deref(),
        output_name: args.output_name.as_deref(),
        source_name: args.source.as_deref(),
    })
}
