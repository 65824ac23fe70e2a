//! Client configuration: where the authority lives and where local state goes.
//!
//! The base URL is resolved in priority order:
//! 1. `--base-url` CLI flag
//! 2. `AGRO_API_URL` environment variable
//! 3. `base_url` in `<config dir>/agroyouth/config.json`
//! 4. the default (`http://localhost:5000/api`)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Default authority base URL, matching the platform's local deployment.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Environment variable overriding the authority base URL.
pub const BASE_URL_ENV: &str = "AGRO_API_URL";

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    base_url: Option<String>,
}

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    /// Resolve the configuration, giving `flag` (the CLI override) the
    /// highest priority.
    pub fn resolve(flag: Option<&str>) -> Result<Self> {
        if let Some(url) = flag {
            return Ok(Self {
                base_url: normalize_base_url(url),
            });
        }
        if let Ok(url) = env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                return Ok(Self {
                    base_url: normalize_base_url(&url),
                });
            }
        }
        if let Some(file) = load_config_file()? {
            if let Some(url) = file.base_url {
                return Ok(Self {
                    base_url: normalize_base_url(&url),
                });
            }
        }
        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }
}

fn load_config_file() -> Result<Option<ConfigFile>> {
    let Some(path) = config_file_path() else {
        return Ok(None);
    };
    if !path.is_file() {
        return Ok(None);
    }
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("read config {}", path.display()))?;
    let config: ConfigFile = serde_json::from_str(&raw)
        .with_context(|| format!("parse config {}", path.display()))?;
    Ok(Some(config))
}

/// Directory holding the config file and the persisted session token.
pub fn state_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("agroyouth"))
}

fn config_file_path() -> Option<PathBuf> {
    state_dir().map(|dir| dir.join("config.json"))
}

/// Path of the persisted bearer token.
pub fn token_path() -> Option<PathBuf> {
    state_dir().map(|dir| dir.join("token"))
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_overrides_everything() {
        let config = ClientConfig::resolve(Some("https://agroyouth.example/api/")).unwrap();
        assert_eq!(config.base_url, "https://agroyouth.example/api");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        assert_eq!(normalize_base_url("http://x/api///"), "http://x/api");
        assert_eq!(normalize_base_url(" http://x/api "), "http://x/api");
    }
}
