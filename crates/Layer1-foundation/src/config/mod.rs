//! Config - server settings
//!
//! Resolved in layers, later wins:
//! 1. built-in defaults
//! 2. global `config.json` under `<config_dir>/baseball-mcp/`
//! 3. environment variables
//!
//! CLI flags are applied on top by the binary.

use crate::storage::StoreLocation;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Directory name under the user's config directory
pub const APP_DIR: &str = "baseball-mcp";

/// Global config file name
pub const CONFIG_FILE: &str = "config.json";

/// Default durable cache file name
pub const CACHE_DB_FILE: &str = "baseball.db";

pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_CACHE: &str = "BASEBALL_MCP_CACHE";
pub const ENV_MLB_STATS_API_URL: &str = "MLB_STATS_API_URL";
pub const ENV_SAVANT_URL: &str = "BASEBALL_SAVANT_URL";
pub const ENV_TIMEOUT_SECS: &str = "BASEBALL_MCP_TIMEOUT_SECS";

/// `<config_dir>/baseball-mcp`, falling back to `~/.config/baseball-mcp`
pub fn app_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Default location of the durable cache
pub fn default_cache_path() -> PathBuf {
    app_dir().join(CACHE_DB_FILE)
}

// ============================================================================
// BaseballConfig
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseballConfig {
    /// Bind address for the HTTP transport
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the HTTP transport
    #[serde(default = "default_port")]
    pub port: u16,

    /// Cache location: a file path or `:memory:`. `None` uses the default path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<String>,

    #[serde(default)]
    pub upstream: UpstreamConfig,
}

impl Default for BaseballConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cache: None,
            upstream: UpstreamConfig::default(),
        }
    }
}

impl BaseballConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, then the global file, then the process environment
    pub fn load() -> Self {
        let mut config = Self::new();

        match Self::load_file(&app_dir().join(CONFIG_FILE)) {
            Ok(Some(file)) => config = file,
            Ok(None) => {}
            Err(e) => warn!("Ignoring config file: {}", e),
        }

        config.apply_env(|name| std::env::var(name).ok());
        config
    }

    /// Read a config file; a missing file is `Ok(None)`
    pub fn load_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Overlay environment variables read through `lookup`.
    ///
    /// Unparsable numeric values are logged and ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup(ENV_HOST).filter(|v| !v.trim().is_empty()) {
            self.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            match port.trim().parse() {
                Ok(port) => self.port = port,
                Err(_) => warn!("Ignoring invalid {}: {}", ENV_PORT, port),
            }
        }
        if let Some(cache) = lookup(ENV_CACHE).filter(|v| !v.trim().is_empty()) {
            self.cache = Some(cache);
        }
        if let Some(url) = lookup(ENV_MLB_STATS_API_URL).filter(|v| !v.trim().is_empty()) {
            self.upstream.mlb_stats_api_url = url;
        }
        if let Some(url) = lookup(ENV_SAVANT_URL).filter(|v| !v.trim().is_empty()) {
            self.upstream.savant_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            match secs.trim().parse() {
                Ok(secs) => self.upstream.timeout_secs = secs,
                Err(_) => warn!("Ignoring invalid {}: {}", ENV_TIMEOUT_SECS, secs),
            }
        }
    }

    /// Where the blob store should live
    pub fn cache_location(&self) -> StoreLocation {
        match &self.cache {
            Some(raw) => StoreLocation::parse(raw),
            None => StoreLocation::default(),
        }
    }

    // Builders used by CLI flag overrides

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_cache(mut self, cache: impl Into<String>) -> Self {
        self.cache = Some(cache.into());
        self
    }
}

// ============================================================================
// UpstreamConfig
// ============================================================================

/// Endpoints and limits for the upstream statistics services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamConfig {
    #[serde(default = "default_mlb_stats_api_url")]
    pub mlb_stats_api_url: String,

    #[serde(default = "default_savant_url")]
    pub savant_url: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            mlb_stats_api_url: default_mlb_stats_api_url(),
            savant_url: default_savant_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_mlb_stats_api_url() -> String {
    "https://statsapi.mlb.com".to_string()
}

fn default_savant_url() -> String {
    "https://baseballsavant.mlb.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = BaseballConfig::new();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert!(config.cache.is_none());
        assert_eq!(config.upstream.timeout_secs, 30);
        assert!(default_cache_path().ends_with("baseball-mcp/baseball.db"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("HOST", "127.0.0.1"),
            ("PORT", "8123"),
            ("BASEBALL_MCP_CACHE", ":memory:"),
            ("BASEBALL_MCP_TIMEOUT_SECS", "5"),
        ]
        .into_iter()
        .collect();

        let mut config = BaseballConfig::new();
        config.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8123);
        assert_eq!(config.cache_location(), StoreLocation::Memory);
        assert_eq!(config.upstream.timeout_secs, 5);
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = BaseballConfig::new();
        config.apply_env(|name| (name == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_load_file_partial_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"port": 9000, "upstream": {"timeoutSecs": 10}}"#).unwrap();

        let config = BaseballConfig::load_file(&path).unwrap().unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.upstream.timeout_secs, 10);
        assert_eq!(config.upstream.savant_url, "https://baseballsavant.mlb.com");
    }

    #[test]
    fn test_load_file_missing_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(BaseballConfig::load_file(&missing).unwrap().is_none());

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{not json").unwrap();
        assert!(matches!(BaseballConfig::load_file(&bad), Err(Error::Config(_))));
    }
}
