//! Configuration for pickem, read from `~/.pickem/config.toml`.
//!
//! ```toml
//! [app]
//! ascii_only = false
//! high_contrast = false
//! report_vitals = false
//!
//! [api]
//! base_url = "https://pickem.example.com"
//! user_id = "${PICKEM_USER_ID}"
//!
//! [ergast]
//! base_url = "https://ergast.com"
//! timeout_seconds = 30
//! max_retries = 2
//! grid_size = 20
//! ```
//!
//! Every section is optional. String values may reference environment
//! variables with `${VAR}`; unset variables expand to the empty string.

use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;

use pickem_types::UiOptions;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "PICKEM_CONFIG";

pub const DEFAULT_ERGAST_BASE_URL: &str = "https://ergast.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_GRID_SIZE: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PickemConfig {
    pub app: AppConfig,
    pub api: ApiConfig,
    pub ergast: ErgastConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    /// Use ASCII-only glyphs for icons and spinners.
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    pub high_contrast: bool,
    /// Log startup vitals once the first data arrives.
    pub report_vitals: bool,
}

impl AppConfig {
    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        UiOptions {
            ascii_only: self.ascii_only,
            high_contrast: self.high_contrast,
        }
    }
}

/// Pick'em backend. Without a `base_url` the bundled offline leagues are shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ErgastConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    /// Number of classified finishers expected in a complete result set.
    pub grid_size: usize,
}

impl Default for ErgastConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ERGAST_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            grid_size: DEFAULT_GRID_SIZE,
        }
    }
}

pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                if !name.is_empty() {
                    out.push_str(&env::var(name).unwrap_or_default());
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

impl PickemConfig {
    /// Load from the default location. `Ok(None)` when no config file exists.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {:?}: {}", path, source);
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let config = Self::parse(&content).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.expand_env();
        config.validate()?;
        Ok(config)
    }

    fn expand_env(&mut self) {
        let expand = |value: &mut Option<String>| {
            if let Some(raw) = value.take() {
                let expanded = expand_env_vars(&raw);
                if !expanded.trim().is_empty() {
                    *value = Some(expanded);
                }
            }
        };
        expand(&mut self.api.base_url);
        expand(&mut self.api.user_id);
        self.ergast.base_url = expand_env_vars(&self.ergast.base_url);
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ergast.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("ergast.base_url must not be empty".into()));
        }
        if self.ergast.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "ergast.timeout_seconds must be > 0".into(),
            ));
        }
        if self.ergast.grid_size == 0 {
            return Err(ConfigError::Invalid("ergast.grid_size must be > 0".into()));
        }
        Ok(())
    }
}

/// `$PICKEM_CONFIG`, else `~/.pickem/config.toml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".pickem").join("config.toml"))
}
