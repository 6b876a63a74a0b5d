// Configuration loading and parsing (superleague.toml).

use chrono_tz::Tz;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use superleague_core::league::LeagueRegistry;
use superleague_core::report::ReportSettings;

/// Name of the config file inside `config/` (and `defaults/`).
pub const CONFIG_FILE: &str = "superleague.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// superleague.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub highlights: HighlightsConfig,
    /// League table, top tier first.
    #[serde(default)]
    pub leagues: Vec<LeagueEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    /// IANA zone for the "last updated" line.
    pub timezone: Tz,
    /// Seconds between rebuilds in `--watch` mode.
    pub refresh_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Super League".into(),
            timezone: chrono_tz::America::New_York,
            refresh_secs: 60 * 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub base_url: String,
    /// Sport key used for the live state endpoint.
    pub sport: String,
    pub request_timeout_secs: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.sleeper.app/v1".into(),
            sport: "nfl".into(),
            request_timeout_secs: 10,
        }
    }
}

/// How long fetched payloads are reused.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// League, roster and user data (slow-changing).
    pub league_ttl_secs: u64,
    /// Platform state and matchups.
    pub live_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            league_ttl_secs: 12 * 60 * 60,
            live_ttl_secs: 60 * 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HighlightsConfig {
    pub completeness_threshold: f64,
    pub lookback_weeks: u32,
    pub max_week: u32,
}

impl Default for HighlightsConfig {
    fn default() -> Self {
        let settings = ReportSettings::default();
        Self {
            completeness_threshold: settings.completeness_threshold,
            lookback_weeks: settings.lookback_weeks,
            max_week: settings.max_week,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueEntry {
    pub name: String,
    /// Platform league id. Empty or `YOUR_...` means not set up yet.
    #[serde(default)]
    pub id: String,
}

impl Config {
    /// The league hierarchy in table order.
    pub fn registry(&self) -> LeagueRegistry {
        LeagueRegistry::new(
            self.leagues
                .iter()
                .map(|l| (l.name.clone(), l.id.clone())),
        )
    }

    pub fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            completeness_threshold: self.highlights.completeness_threshold,
            lookback_weeks: self.highlights.lookback_weeks,
            max_week: self.highlights.max_week,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/superleague.toml` relative to `base_dir`.
///
/// Does not copy defaults; see [`load_config_in`].
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Copy `defaults/superleague.toml` into `config/` unless a config is
/// already there. Returns whether a copy was made.
pub fn ensure_config_file(base_dir: &Path) -> Result<bool, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(false);
    }

    let default = base_dir.join("defaults").join(CONFIG_FILE);
    if !default.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no config/{CONFIG_FILE} or defaults/{CONFIG_FILE} in {}; \
                 run from the project root or pass --base-dir",
                base_dir.display()
            ),
        });
    }

    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", dir.display()),
        })?;
    }
    std::fs::copy(&default, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", default.display(), target.display()),
    })?;

    info!(path = %target.display(), "copied default config");
    Ok(true)
}

/// Copy the default config into `base_dir/config` if needed, then load it.
pub fn load_config_in(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_file(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let threshold = config.highlights.completeness_threshold;
    if !(0.0..=1.0).contains(&threshold) {
        return Err(ConfigError::ValidationError {
            field: "highlights.completeness_threshold".into(),
            message: format!("must be between 0.0 and 1.0 inclusive, got {threshold}"),
        });
    }

    if config.highlights.max_week == 0 {
        return Err(ConfigError::ValidationError {
            field: "highlights.max_week".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.dashboard.refresh_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "dashboard.refresh_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.platform.request_timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "platform.request_timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.platform.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "platform.base_url".into(),
            message: "must not be empty".into(),
        });
    }

    if config.leagues.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "leagues".into(),
            message: "at least one league must be listed".into(),
        });
    }

    let mut seen = HashSet::new();
    for league in &config.leagues {
        if league.name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "leagues.name".into(),
                message: "must not be empty".into(),
            });
        }
        if !seen.insert(league.name.as_str()) {
            return Err(ConfigError::ValidationError {
                field: "leagues.name".into(),
                message: format!("duplicate league name `{}`", league.name),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
