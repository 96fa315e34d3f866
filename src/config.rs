//! Client configuration and the settings file it is loaded from
//!
//! Settings live in `<XDG config dir>/distmatrix/settings.json`. A missing file
//! means defaults; the API key may also come from `DISTMATRIX_API_KEY`, which
//! wins over the file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{ApiError, DistanceMatrixClient, Transport};

/// Environment variable overriding the configured API key
pub const API_KEY_ENV: &str = "DISTMATRIX_API_KEY";

/// Default cache lifetime: one day
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 86_400;

/// TTLs must be at least this long and a multiple of it
pub const CACHE_TTL_STEP_SECONDS: u64 = 300;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Cache TTL must be a positive multiple of 300 seconds, got {0}")]
    InvalidTtl(u64),

    #[error("No API key configured; set DISTMATRIX_API_KEY or add api_key to the settings file")]
    MissingApiKey,

    #[error("Invalid default option in settings: {0}")]
    InvalidDefault(#[from] ApiError),
}

/// Settings the client needs to talk to the API
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub enable_cache: bool,
    pub cache_ttl_seconds: u64,
}

impl ClientConfig {
    /// Config with caching on and the default TTL
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            enable_cache: true,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }

    pub fn with_cache_enabled(mut self, enable_cache: bool) -> Self {
        self.enable_cache = enable_cache;
        self
    }

    /// Sets the cache TTL, rejecting values off the 300-second grid
    pub fn with_cache_ttl(mut self, ttl_seconds: u64) -> Result<Self, ConfigError> {
        validate_ttl(ttl_seconds)?;
        self.cache_ttl_seconds = ttl_seconds;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        validate_ttl(self.cache_ttl_seconds)
    }
}

// The key is a secret, keep it out of debug output and logs
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("enable_cache", &self.enable_cache)
            .field("cache_ttl_seconds", &self.cache_ttl_seconds)
            .finish()
    }
}

fn validate_ttl(ttl_seconds: u64) -> Result<(), ConfigError> {
    if ttl_seconds < CACHE_TTL_STEP_SECONDS || ttl_seconds % CACHE_TTL_STEP_SECONDS != 0 {
        return Err(ConfigError::InvalidTtl(ttl_seconds));
    }
    Ok(())
}

/// Default request options as written in the settings file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultOptions {
    pub mode: Option<String>,
    pub units: Option<String>,
    pub language: Option<String>,
    pub avoid: Option<String>,
    pub traffic_model: Option<String>,
    pub departure_time: Option<String>,
}

/// Contents of the settings file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_key: String,
    pub enable_cache: bool,
    pub cache_ttl_seconds: u64,
    pub defaults: DefaultOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            enable_cache: true,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            defaults: DefaultOptions::default(),
        }
    }
}

impl Settings {
    /// Default settings file location, if a home directory exists
    pub fn default_path() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", "distmatrix")?;
        Some(project_dirs.config_dir().join("settings.json"))
    }

    /// Loads settings from `path`, or from the default location when `None`
    ///
    /// A missing file yields `Settings::default()`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Client config with the environment override applied
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        self.resolve(std::env::var(API_KEY_ENV).ok())
    }

    /// Client config using `env_key` in place of the file's key when non-empty
    pub fn resolve(&self, env_key: Option<String>) -> Result<ClientConfig, ConfigError> {
        let api_key = env_key
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| self.api_key.clone());

        let config = ClientConfig {
            api_key,
            enable_cache: self.enable_cache,
            cache_ttl_seconds: self.cache_ttl_seconds,
        };
        config.validate()?;
        Ok(config)
    }

    /// Pushes the configured default options through the client's setters
    pub fn apply_defaults<T: Transport>(
        &self,
        client: &mut DistanceMatrixClient<T>,
    ) -> Result<(), ConfigError> {
        let defaults = &self.defaults;
        if let Some(mode) = &defaults.mode {
            client.set_mode(mode)?;
        }
        if let Some(units) = &defaults.units {
            client.set_units(units)?;
        }
        if let Some(language) = &defaults.language {
            client.set_language(language)?;
        }
        if defaults.avoid.is_some() {
            client.set_avoid(defaults.avoid.as_deref())?;
        }
        if defaults.traffic_model.is_some() {
            client.set_traffic_model(defaults.traffic_model.as_deref())?;
        }
        if defaults.departure_time.is_some() {
            client.set_departure_time(defaults.departure_time.as_deref())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ttl_validation() {
        assert!(ClientConfig::new("k").with_cache_ttl(300).is_ok());
        assert!(ClientConfig::new("k").with_cache_ttl(3600).is_ok());
        assert!(matches!(
            ClientConfig::new("k").with_cache_ttl(0),
            Err(ConfigError::InvalidTtl(0))
        ));
        assert!(matches!(
            ClientConfig::new("k").with_cache_ttl(450),
            Err(ConfigError::InvalidTtl(450))
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::new("super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load(Some(&temp_dir.path().join("absent.json"))).unwrap();

        assert_eq!(settings, Settings::default());
        assert!(settings.enable_cache);
        assert_eq!(settings.cache_ttl_seconds, 86_400);
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"api_key": "abc", "defaults": {"mode": "walking"}}"#,
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();

        assert_eq!(settings.api_key, "abc");
        assert!(settings.enable_cache);
        assert_eq!(settings.defaults.mode.as_deref(), Some("walking"));
    }

    #[test]
    fn test_load_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            Settings::load(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_resolve_prefers_environment_key() {
        let settings = Settings {
            api_key: "from-file".to_string(),
            ..Settings::default()
        };

        let config = settings.resolve(Some("from-env".to_string())).unwrap();
        assert_eq!(config.api_key, "from-env");

        let config = settings.resolve(Some("  ".to_string())).unwrap();
        assert_eq!(config.api_key, "from-file");
    }

    #[test]
    fn test_resolve_requires_api_key() {
        assert!(matches!(
            Settings::default().resolve(None),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_resolve_rejects_bad_ttl() {
        let settings = Settings {
            api_key: "k".to_string(),
            cache_ttl_seconds: 100,
            ..Settings::default()
        };

        assert!(matches!(settings.resolve(None), Err(ConfigError::InvalidTtl(100))));
    }
}
