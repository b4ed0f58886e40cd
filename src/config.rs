//! TOML configuration for the `shelf` CLI.
//!
//! ```toml
//! [gateway]
//! base_url = "http://127.0.0.1:8080"
//! timeout_secs = 10
//! max_retries = 0
//!
//! [state]
//! path = "./data/shelf-state.json"
//!
//! [display]
//! default_sort = "none"
//! default_order = "asc"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use shelf_core::models::{SortField, SortOrder, SortState};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub max_retries: u32,
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct StateConfig {
    #[serde(default = "default_state_path")]
    pub path: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: default_state_path(),
        }
    }
}

fn default_state_path() -> PathBuf {
    PathBuf::from("./data/shelf-state.json")
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DisplayConfig {
    #[serde(default)]
    pub default_sort: SortField,
    #[serde(default)]
    pub default_order: SortOrder,
}

impl DisplayConfig {
    pub fn sort_state(&self) -> SortState {
        SortState::new(self.default_sort, self.default_order)
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    let base_url = config.gateway.base_url.trim();
    if base_url.is_empty() {
        anyhow::bail!("gateway.base_url must not be empty");
    }
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        anyhow::bail!(
            "gateway.base_url must start with http:// or https:// (got '{}')",
            base_url
        );
    }
    if config.gateway.timeout_secs == 0 {
        anyhow::bail!("gateway.timeout_secs must be > 0");
    }

    Ok(config)
}
