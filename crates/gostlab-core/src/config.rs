use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::upload::TransportOptions;

/// Global configuration loaded from `~/.config/gostlab/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GostlabConfig {
    /// Base URL of the hash/cipher service; `/hash` and `/cipher` are joined onto it.
    pub server_url: String,
    /// Smallest file the service accepts, in bytes. Checked before uploading.
    pub min_file_size: u64,
    /// Seconds allowed for establishing the connection.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for the whole request (upload, processing, response).
    pub timeout_secs: u64,
    /// Directory results are saved to (None = current directory).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

impl Default for GostlabConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080/".to_string(),
            min_file_size: 1024,
            connect_timeout_secs: 15,
            timeout_secs: 300,
            download_dir: None,
        }
    }
}

impl GostlabConfig {
    /// curl timeouts derived from this config.
    pub fn transport(&self) -> TransportOptions {
        TransportOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("gostlab")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<GostlabConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = GostlabConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: GostlabConfig = toml::from_str(&data)?;
    Ok(cfg)
}
