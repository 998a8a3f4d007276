//! Configuration management for Flatwiki.
//!
//! This module provides configuration loading, saving, and defaults.
//! Configuration is stored in TOML format in a platform-appropriate location.

use crate::error::{FlatwikiError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the store root.
pub const STORE_ROOT_ENV: &str = "WIKI_DIR";

/// Store root used when nothing else names one.
pub const DEFAULT_STORE_ROOT: &str = "/wiki_data";

/// Main configuration structure for Flatwiki.
///
/// ## Example Configuration File (flatwiki.toml)
///
/// ```toml
/// [general]
/// log_level = "info"
///
/// [store]
/// root = "/var/lib/pmwiki/wiki.d"
///
/// [query]
/// max_search_results = 10
/// snippet_radius = 100
/// max_suggestions = 5
/// max_group_listing = 10
///
/// [performance]
/// parallel_search = true
/// parallel_threshold = 256
///
/// [resources]
/// scheme = "pmwiki"
/// mime_type = "text/plain"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Page store location
    pub store: StoreConfig,

    /// Result shaping for the query operations
    pub query: QueryConfig,

    /// Performance tuning
    pub performance: PerformanceConfig,

    /// Resource addressing
    pub resources: ResourcesConfig,
}

/// General configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            log_level: "info".to_string(),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the page records (None = environment or fallback)
    pub root: Option<PathBuf>,
}

/// Query result shaping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Search hits enumerated in a response; the total is always reported
    pub max_search_results: usize,

    /// Characters of context kept on each side of a search match
    pub snippet_radius: usize,

    /// Near-match suggestions offered when a page is missing
    pub max_suggestions: usize,

    /// Pages shown per group in a listing
    pub max_group_listing: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            max_search_results: 10,
            snippet_radius: 100,
            max_suggestions: 5,
            max_group_listing: 10,
        }
    }
}

/// Performance configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Decode search candidates on the rayon pool
    pub parallel_search: bool,

    /// Candidate count above which search goes parallel
    pub parallel_threshold: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        PerformanceConfig {
            parallel_search: true,
            parallel_threshold: 256,
        }
    }
}

/// Resource addressing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    /// URI scheme for page resources (`<scheme>://<filename>`)
    pub scheme: String,

    /// Content type advertised for every page
    pub mime_type: String,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        ResourcesConfig {
            scheme: "pmwiki".to_string(),
            mime_type: "text/plain".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default config if no config file exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Config::default());
        }

        info!(path = %path.display(), "Loading configuration");
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents).map_err(|e| FlatwikiError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        info!(path = %path.display(), "Saving configuration");
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| FlatwikiError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
        })
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> Result<PathBuf> {
        let dirs =
            ProjectDirs::from("", "", "flatwiki").ok_or_else(|| FlatwikiError::ConfigError {
                reason: "Could not determine config directory".to_string(),
            })?;

        Ok(dirs.config_dir().join("flatwiki.toml"))
    }

    /// Check values that would make the engine misbehave.
    pub fn validate(&self) -> Result<()> {
        let scheme = &self.resources.scheme;
        let scheme_ok = scheme
            .chars()
            .next()
            .map_or(false, |c| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !scheme_ok {
            return Err(FlatwikiError::ConfigError {
                reason: format!("invalid resource scheme: {:?}", scheme),
            });
        }

        if self.resources.mime_type.trim().is_empty() {
            return Err(FlatwikiError::ConfigError {
                reason: "resource mime_type must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Resolve the store root.
    ///
    /// Precedence: explicit override, the `WIKI_DIR` environment variable,
    /// `store.root` from the file, then [`DEFAULT_STORE_ROOT`].
    pub fn store_root(&self, explicit: Option<&Path>) -> PathBuf {
        let env = std::env::var(STORE_ROOT_ENV).ok();
        self.store_root_with(explicit, env.as_deref())
    }

    fn store_root_with(&self, explicit: Option<&Path>, env: Option<&str>) -> PathBuf {
        if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
            return path.to_path_buf();
        }
        if let Some(env) = env.filter(|v| !v.is_empty()) {
            return PathBuf::from(env);
        }
        if let Some(ref root) = self.store.root {
            return root.clone();
        }
        PathBuf::from(DEFAULT_STORE_ROOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.query.max_search_results, 10);
        assert_eq!(config.query.snippet_radius, 100);
        assert_eq!(config.query.max_suggestions, 5);
        assert_eq!(config.query.max_group_listing, 10);
        assert_eq!(config.resources.scheme, "pmwiki");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let mut config = Config::default();
        config.query.max_search_results = 25;
        config.store.root = Some(PathBuf::from("/srv/wiki.d"));

        config.save_to(&config_path).unwrap();
        let loaded = Config::load_from(&config_path).unwrap();

        assert_eq!(loaded.query.max_search_results, 25);
        assert_eq!(loaded.store.root, Some(PathBuf::from("/srv/wiki.d")));
    }

    #[test]
    fn test_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.query.max_search_results, 10); // Default value
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("partial.toml");
        fs::write(&config_path, "[query]\nsnippet_radius = 40\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.query.snippet_radius, 40);
        assert_eq!(config.query.max_suggestions, 5);
        assert_eq!(config.resources.mime_type, "text/plain");
    }

    #[test]
    fn test_invalid_scheme_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bad.toml");
        fs::write(&config_path, "[resources]\nscheme = \"wiki://\"\n").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(matches!(err, FlatwikiError::ConfigError { .. }));
    }

    #[test]
    fn test_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "[query\n").unwrap();

        assert!(Config::load_from(&config_path).is_err());
    }

    #[test]
    fn test_store_root_precedence() {
        let mut config = Config::default();
        assert_eq!(
            config.store_root_with(None, None),
            PathBuf::from(DEFAULT_STORE_ROOT)
        );

        config.store.root = Some(PathBuf::from("/from/file"));
        assert_eq!(
            config.store_root_with(None, None),
            PathBuf::from("/from/file")
        );
        assert_eq!(
            config.store_root_with(None, Some("/from/env")),
            PathBuf::from("/from/env")
        );
        assert_eq!(
            config.store_root_with(Some(Path::new("/from/cli")), Some("/from/env")),
            PathBuf::from("/from/cli")
        );
        assert_eq!(
            config.store_root_with(None, Some("")),
            PathBuf::from("/from/file")
        );
    }
}
