//! Configuration management for the server
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (YAML/JSON/TOML)
//! - Environment variables
//! - Command-line arguments

use crate::error::{Error, Result};
use pokedex_core::UpstreamConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listener settings
    pub server: ServerConfig,

    /// PokeAPI / FunTranslations settings
    pub upstream: UpstreamConfig,

    /// Logging settings
    pub logging: LoggingSettings,
}

/// Listener configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: String,

    /// Inbound request timeout in seconds; exceeded requests get an empty 500
    pub request_timeout_secs: u64,
}

/// Logging configuration as written in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (compact, full, json)
    pub format: String,

    /// Log file path
    pub file: Option<PathBuf>,

    /// Include thread IDs
    pub thread_ids: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
            file: None,
            thread_ids: false,
        }
    }
}

impl ServerConfig {
    /// Parsed listen address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .map_err(|e| Error::config(format!("invalid bind address '{}': {}", self.bind, e)))
    }

    /// Inbound request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Config {
    /// Load configuration from a file, picking the format by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading configuration file");
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // Current directory
        for ext in ["yaml", "yml", "json", "toml"] {
            paths.push(PathBuf::from(format!("pokedex.{}", ext)));
        }

        // User config directory
        if let Some(config_dir) = dirs::config_dir() {
            let pokedex_dir = config_dir.join("pokedex");
            for ext in ["yaml", "json", "toml"] {
                paths.push(pokedex_dir.join(format!("config.{}", ext)));
            }
        }

        paths
    }

    /// Apply `POKEDEX_*` environment overrides
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn merge_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("POKEDEX_BIND") {
            self.server.bind = bind;
        }
        if let Some(url) = lookup("POKEDEX_POKEAPI_URL") {
            self.upstream.pokeapi_url = url;
        }
        if let Some(url) = lookup("POKEDEX_TRANSLATOR_URL") {
            self.upstream.translator_url = url;
        }
        if let Some(locale) = lookup("POKEDEX_LOCALE") {
            self.upstream.locale = locale;
        }
        if let Some(retries) = lookup("POKEDEX_MAX_RETRIES") {
            self.upstream.max_retries = retries.parse().map_err(|_| {
                Error::config(format!("POKEDEX_MAX_RETRIES must be a number, got '{}'", retries))
            })?;
        }
        if let Some(delay) = lookup("POKEDEX_RETRY_DELAY_MS") {
            self.upstream.retry_delay_ms = delay.parse().map_err(|_| {
                Error::config(format!("POKEDEX_RETRY_DELAY_MS must be a number, got '{}'", delay))
            })?;
        }

        Ok(())
    }

    /// Check everything that would otherwise fail at startup
    pub fn validate(&self) -> Result<()> {
        self.server.socket_addr()?;

        if self.server.request_timeout_secs == 0 {
            return Err(Error::config("server.request_timeout_secs must be greater than zero"));
        }

        if !matches!(self.logging.format.as_str(), "compact" | "full" | "json") {
            return Err(Error::config(format!(
                "unknown log format '{}', expected compact, full or json",
                self.logging.format
            )));
        }

        self.upstream.validate()?;

        // Translation must give up before the inbound timeout fires
        if self.upstream.translation_timeout() >= self.server.request_timeout() {
            return Err(Error::config(format!(
                "upstream.translation_timeout_ms ({}) must be shorter than server.request_timeout_secs ({}s)",
                self.upstream.translation_timeout_ms, self.server.request_timeout_secs
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.server.bind, "0.0.0.0:5000");
        assert_eq!(config.server.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.upstream, UpstreamConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_yaml() {
        let file = write_config(
            ".yaml",
            "server:\n  bind: 127.0.0.1:8080\nupstream:\n  locale: fr\n  max_retries: 1\n",
        );

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.upstream.locale, "fr");
        assert_eq!(config.upstream.max_retries, 1);
        assert_eq!(config.upstream.retry_delay_ms, 600);
    }

    #[test]
    fn test_load_toml() {
        let file = write_config(
            ".toml",
            "[upstream]\npokeapi_url = \"http://localhost:9000\"\n\n[logging]\nformat = \"json\"\n",
        );

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.upstream.pokeapi_url, "http://localhost:9000");
        assert_eq!(config.logging.format, "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_json() {
        let file = write_config(".json", r#"{"server": {"request_timeout_secs": 5}}"#);

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.server.request_timeout_secs, 5);
    }

    #[test]
    fn test_missing_and_malformed_files() {
        let missing = Config::from_file(Path::new("/nonexistent/pokedex.yaml"));
        assert!(matches!(missing, Err(Error::FileNotFound { .. })));

        let file = write_config(".toml", "[upstream\n");
        assert!(matches!(Config::from_file(file.path()), Err(Error::Toml(_))));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("POKEDEX_BIND", "127.0.0.1:7000"),
            ("POKEDEX_POKEAPI_URL", "http://pokeapi.local"),
            ("POKEDEX_TRANSLATOR_URL", "http://translator.local"),
            ("POKEDEX_LOCALE", "de"),
            ("POKEDEX_MAX_RETRIES", "0"),
            ("POKEDEX_RETRY_DELAY_MS", "50"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .merge_with(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:7000");
        assert_eq!(config.upstream.pokeapi_url, "http://pokeapi.local");
        assert_eq!(config.upstream.translator_url, "http://translator.local");
        assert_eq!(config.upstream.locale, "de");
        assert_eq!(config.upstream.max_retries, 0);
        assert_eq!(config.upstream.retry_delay_ms, 50);
    }

    #[test]
    fn test_env_override_rejects_non_numeric() {
        let mut config = Config::default();
        let result = config.merge_with(|key| {
            (key == "POKEDEX_MAX_RETRIES").then(|| "many".to_string())
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.server.bind = "not an address".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.upstream.translator_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(Error::Core(_))));

        let mut config = Config::default();
        config.server.request_timeout_secs = 10;
        config.upstream.translation_timeout_ms = 10_000;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.upstream.translation_timeout_ms = 9_000;
        assert!(config.validate().is_ok());
    }
}
