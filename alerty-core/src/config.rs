//! # Config — Loads and validates TOML configuration
//!
//! Reads `alerty.toml` (or a custom path) and deserializes into typed config
//! structs. A missing or unreadable file falls back to defaults so the
//! service can start against a local backend without any setup.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Top-level Alerty configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default log filter when RUST_LOG is unset.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the remote Alerty REST backend.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Sessions older than this are treated as expired and cleared.
    pub session_ttl_secs: i64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".into(),
            timeout_secs: 30,
            session_ttl_secs: 8 * 3600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the Alerty HTTP service.
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long fetched alert/shift lists stay fresh before a re-fetch.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 60 }
    }
}

impl AlertyConfig {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file is missing or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<AlertyConfig>(&raw) {
                Ok(cfg) => {
                    info!(path = %path.display(), "Loaded configuration");
                    cfg
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Bad config file, using defaults");
                    AlertyConfig::default()
                }
            },
            Err(_) => {
                warn!(path = %path.display(), "No config file found, using defaults");
                AlertyConfig::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AlertyConfig::default();
        assert_eq!(cfg.backend.timeout_secs, 30);
        assert_eq!(cfg.cache.ttl_secs, 60);
        assert_eq!(cfg.general.log_level, "info");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let raw = r#"
            [backend]
            base_url = "https://api.alerty.example"
            timeout_secs = 10
            session_ttl_secs = 3600
        "#;
        let cfg: AlertyConfig = toml::from_str(raw).unwrap();
        assert_eq!(cfg.backend.base_url, "https://api.alerty.example");
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_missing_file_falls_back() {
        let cfg = AlertyConfig::load_or_default(Path::new("/nonexistent/alerty.toml"));
        assert_eq!(cfg.backend.base_url, "http://localhost:3001");
    }
}
