use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use snaplink_crypto::LinkStyle;

pub const API_URL_ENV: &str = "SNAPLINK_API_URL";
pub const ORIGIN_ENV: &str = "SNAPLINK_ORIGIN";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub server: ServerConfig,
    pub link: LinkConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base of the storage API, including the `/api/v1` prefix.
    pub endpoint: String,
    /// Name of the environment variable holding the upload token, if any.
    pub api_key_env: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/api/v1".into(),
            api_key_env: "SNAPLINK_API_KEY".into(),
        }
    }
}

/// Where printed links point. Usually the web reader, not the API.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub origin: String,
    pub path: String,
    pub style: LinkStyle,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:8080".into(),
            path: "/".into(),
            style: LinkStyle::Query,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub download_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("."),
        }
    }
}

impl CliConfig {
    /// Read `config.toml` from the platform config directory, falling back to
    /// defaults when it does not exist, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "snaplink", "snaplink")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config file at {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("invalid config file at {}", path.display()))
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup(API_URL_ENV).filter(|v| !v.is_empty()) {
            self.server.endpoint = endpoint;
        }
        if let Some(origin) = lookup(ORIGIN_ENV).filter(|v| !v.is_empty()) {
            self.link.origin = origin;
        }
    }
}
