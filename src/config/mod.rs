//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/location-picker/config.toml

pub mod defaults;

use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Search input tuning
    #[serde(default)]
    pub search: SearchConfig,

    /// Geocoding provider settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Search input tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet interval in milliseconds before a search fires
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Minimum trimmed query length that triggers a search
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    /// Maximum number of candidates kept
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
}

/// Geocoding provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Nominatim-compatible base URL
    #[serde(default = "default_geocoder_url")]
    pub url: String,

    /// User-Agent header (required by public Nominatim)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Comma-separated ISO country codes scoping forward searches
    #[serde(default = "default_country_codes")]
    pub country_codes: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds a session may sit unused before it is dropped
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

// Default value functions for serde
fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
fn default_min_query_chars() -> usize {
    DEFAULT_MIN_QUERY_CHARS
}
fn default_result_limit() -> usize {
    DEFAULT_RESULT_LIMIT
}
fn default_geocoder_url() -> String {
    DEFAULT_GEOCODER_URL.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_country_codes() -> String {
    DEFAULT_COUNTRY_CODES.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_session_ttl_secs() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_chars: default_min_query_chars(),
            result_limit: default_result_limit(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            url: default_geocoder_url(),
            user_agent: default_user_agent(),
            country_codes: default_country_codes(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

impl SearchConfig {
    /// Quiet interval as a Duration
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl ServerConfig {
    /// Idle lifetime of a session as a Duration
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path
    ///
    /// Creates default config there if the file doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            let config: Config = toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Reject settings the picker cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.search.min_query_chars == 0 {
            return Err(Error::Config(
                "search.min_query_chars must be at least 1".to_string(),
            ));
        }
        if self.search.result_limit == 0 {
            return Err(Error::Config(
                "search.result_limit must be at least 1".to_string(),
            ));
        }
        if self.geocoder.timeout_secs == 0 {
            return Err(Error::Config(
                "geocoder.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.server.session_ttl_secs == 0 {
            return Err(Error::Config(
                "server.session_ttl_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["search", "debounce_ms"] => Some(self.search.debounce_ms.to_string()),
            ["search", "min_query_chars"] => Some(self.search.min_query_chars.to_string()),
            ["search", "result_limit"] => Some(self.search.result_limit.to_string()),

            ["geocoder", "url"] => Some(self.geocoder.url.clone()),
            ["geocoder", "user_agent"] => Some(self.geocoder.user_agent.clone()),
            ["geocoder", "country_codes"] => Some(self.geocoder.country_codes.clone()),
            ["geocoder", "timeout_secs"] => Some(self.geocoder.timeout_secs.to_string()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),
            ["server", "session_ttl_secs"] => Some(self.server.session_ttl_secs.to_string()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();
        let mut next = self.clone();

        match parts.as_slice() {
            ["search", "debounce_ms"] => {
                next.search.debounce_ms = parse_value(key, value)?;
            }
            ["search", "min_query_chars"] => {
                next.search.min_query_chars = parse_value(key, value)?;
            }
            ["search", "result_limit"] => {
                next.search.result_limit = parse_value(key, value)?;
            }

            ["geocoder", "url"] => {
                next.geocoder.url = value.to_string();
            }
            ["geocoder", "user_agent"] => {
                next.geocoder.user_agent = value.to_string();
            }
            ["geocoder", "country_codes"] => {
                next.geocoder.country_codes = value.to_string();
            }
            ["geocoder", "timeout_secs"] => {
                next.geocoder.timeout_secs = parse_value(key, value)?;
            }

            ["server", "host"] => {
                next.server.host = value.to_string();
            }
            ["server", "port"] => {
                next.server.port = parse_value(key, value)?;
            }
            ["server", "session_ttl_secs"] => {
                next.server.session_ttl_secs = parse_value(key, value)?;
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        next.validate()?;
        *self = next;
        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "search.debounce_ms",
            "search.min_query_chars",
            "search.result_limit",
            "geocoder.url",
            "geocoder.user_agent",
            "geocoder.country_codes",
            "geocoder.timeout_secs",
            "server.host",
            "server.port",
            "server.session_ttl_secs",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.search.debounce_ms, 500);
        assert_eq!(config.search.min_query_chars, 3);
        assert_eq!(config.search.result_limit, 5);
        assert_eq!(config.geocoder.country_codes, "in");
        assert_eq!(config.server.port, 7979);
        assert_eq!(config.search.debounce(), Duration::from_millis(500));
        assert_eq!(config.server.session_ttl(), Duration::from_secs(1800));
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("search.debounce_ms"), Some("500".to_string()));

        config.set("search.debounce_ms", "250").unwrap();
        assert_eq!(config.get("search.debounce_ms"), Some("250".to_string()));
        assert_eq!(config.search.debounce_ms, 250);

        config.set("geocoder.country_codes", "in,np").unwrap();
        assert_eq!(config.geocoder.country_codes, "in,np");
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("server.port", "not_a_number").is_err());
        assert!(config.set("search.result_limit", "0").is_err());
        assert_eq!(config.search.result_limit, 5);
        assert!(config.set("server.session_ttl_secs", "0").is_err());
        assert_eq!(config.server.session_ttl_secs, 1800);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = Config::default();
        config.search.debounce_ms = 300;
        config.geocoder.url = "http://localhost:8088".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.search.debounce_ms, 300);
        assert_eq!(loaded.geocoder.url, "http://localhost:8088");
    }

    #[test]
    fn test_load_creates_default_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.search.min_query_chars, 3);
    }

    #[test]
    fn test_load_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[search]\nresult_limit = 3\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.search.result_limit, 3);
        assert_eq!(config.search.debounce_ms, 500);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[search]\nmin_query_chars = 0\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_serialization_format() {
        let toml = toml::to_string_pretty(&Config::default()).unwrap();

        assert!(toml.contains("[search]"));
        assert!(toml.contains("[geocoder]"));
        assert!(toml.contains("[server]"));
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:7979");
    }

    #[test]
    fn test_available_keys() {
        let config = Config::default();
        for key in Config::available_keys() {
            assert!(config.get(key).is_some(), "missing getter for {}", key);
        }
    }
}
