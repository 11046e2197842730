//! `gostlab hash <file>` – upload a file and print the service's hash.

use super::progress;
use anyhow::Result;
use gostlab_core::client::hash::request_hash;
use gostlab_core::config::GostlabConfig;
use std::path::PathBuf;

pub async fn run_hash(cfg: &GostlabConfig, path: PathBuf) -> Result<()> {
    let server = cfg.server_url.clone();
    let min_size = cfg.min_file_size;
    let opts = cfg.transport();
    let input = path.clone();

    let hash = tokio::task::spawn_blocking(move || {
        request_hash(&server, &input, min_size, &opts, &mut progress::render)
    })
    .await??;

    println!("{}  {}", hash, path.display());
    Ok(())
}
