// Configuration module: the service endpoint and credentials live in a
// YAML file in the user's home directory (`~/.fbin.yml`).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Endpoint and credentials for the sharing service. Missing keys
/// deserialize to empty strings; the client reports them field by field
/// before any operation runs.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Config {
    /// Read and parse `~/.fbin.yml`.
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let cfg: Config = serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(cfg)
    }
}

fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("unable to locate home directory")?;
    Ok(home.join(".fbin.yml"))
}
