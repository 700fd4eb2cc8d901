//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SHELFMAP_*)
//! 2. TOML config file (if SHELFMAP_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SHELFMAP_*)
/// 2. TOML config file (if SHELFMAP_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the JSON cache file.
    ///
    /// Set via SHELFMAP_CACHE_PATH environment variable.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via SHELFMAP_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Delay paid before every uncached request, in milliseconds.
    ///
    /// Set via SHELFMAP_PACING_MS environment variable.
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    /// HTTP request timeout in milliseconds. Unset means the client default.
    ///
    /// Set via SHELFMAP_TIMEOUT_MS environment variable.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via SHELFMAP_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Yelp Fusion API key for the restaurant search.
    ///
    /// Set via SHELFMAP_YELP_API_KEY environment variable.
    /// Required only when restaurants are looked up.
    #[serde(default)]
    pub yelp_api_key: Option<String>,

    /// Yelp business search endpoint.
    #[serde(default = "default_yelp_search_url")]
    pub yelp_search_url: String,

    /// Site root that relative library links resolve against.
    #[serde(default = "default_library_site_url")]
    pub library_site_url: String,

    /// Page listing every library location.
    #[serde(default = "default_library_index_url")]
    pub library_index_url: String,

    /// Detail page of the library the driver reports on.
    #[serde(default = "default_library_url")]
    pub library_url: String,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("./shelfmap-cache.json")
}

fn default_user_agent() -> String {
    "shelfmap/0.1".into()
}

fn default_pacing_ms() -> u64 {
    1_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_yelp_search_url() -> String {
    "https://api.yelp.com/v3/businesses/search".into()
}

fn default_library_site_url() -> String {
    "https://www.lib.umich.edu".into()
}

fn default_library_index_url() -> String {
    "https://www.lib.umich.edu/locations-and-hours".into()
}

fn default_library_url() -> String {
    "https://www.lib.umich.edu/locations-and-hours/shapiro-library".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_path: default_cache_path(),
            user_agent: default_user_agent(),
            pacing_ms: default_pacing_ms(),
            timeout_ms: None,
            max_bytes: default_max_bytes(),
            yelp_api_key: None,
            yelp_search_url: default_yelp_search_url(),
            library_site_url: default_library_site_url(),
            library_index_url: default_library_index_url(),
            library_url: default_library_url(),
        }
    }
}

impl AppConfig {
    /// Pacing interval as Duration for use with tokio.
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    /// Timeout as Duration for use with reqwest, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SHELFMAP_`
    /// 2. TOML file from `SHELFMAP_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment()
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SHELFMAP_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("SHELFMAP_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    /// Check if the Yelp API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the Yelp API key is not set.
    pub fn require_yelp_api_key(&self) -> Result<&str, ConfigError> {
        self.yelp_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "yelp_api_key".into(),
                hint: "Set SHELFMAP_YELP_API_KEY environment variable".into(),
            })
    }
}
