//! # Client Configuration
//!
//! Where the REST service lives and how results are shown.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PUNTO_API_URL=https://api.punto.example                            │
//! │     PUNTO_TIMEOUT_SECS=30                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/punto/punto.toml (Linux)                                 │
//! │     ~/Library/Application Support/co.punto.punto/punto.toml (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:3000, COP display                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # punto.toml
//! [api]
//! base_url = "http://192.168.0.173:3000"
//! timeout_secs = 30
//! max_retries = 3
//! initial_backoff_ms = 200
//! max_backoff_secs = 5
//!
//! [display]
//! currency_code = "COP"
//! currency_symbol = "$"
//! fraction_digits = 0
//! items_per_page = 6
//! ```

use punto_core::money::CurrencyFormat;
use punto_core::DEFAULT_ITEMS_PER_PAGE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// API Settings
// =============================================================================

/// How to reach the REST service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL, e.g. `http://localhost:3000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries for idempotent reads. 0 disables retrying.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff (milliseconds).
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff (seconds).
    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff() -> u64 {
    200
}

fn default_max_backoff() -> u64 {
    5
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_secs: default_max_backoff(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_secs(self.max_backoff_secs)
    }
}

// =============================================================================
// Display Settings
// =============================================================================

/// Currency and list presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: char,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,

    /// Fraction digits shown (0-2).
    #[serde(default)]
    pub fraction_digits: u8,

    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
}

fn default_currency_code() -> String {
    "COP".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_thousands_separator() -> char {
    '.'
}

fn default_decimal_separator() -> char {
    ','
}

fn default_items_per_page() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_code: default_currency_code(),
            currency_symbol: default_currency_symbol(),
            thousands_separator: default_thousands_separator(),
            decimal_separator: default_decimal_separator(),
            fraction_digits: 0,
            items_per_page: default_items_per_page(),
        }
    }
}

impl DisplaySettings {
    /// The currency format these settings describe.
    pub fn currency_format(&self) -> CurrencyFormat {
        CurrencyFormat {
            code: self.currency_code.clone(),
            symbol: self.currency_symbol.clone(),
            thousands_separator: self.thousands_separator,
            decimal_separator: self.decimal_separator,
            fraction_digits: self.fraction_digits,
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl ClientConfig {
    /// Creates a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (punto.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        self.base_url()?;

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.display.fraction_digits > 2 {
            return Err(ClientError::InvalidConfig(format!(
                "fraction_digits must be 0, 1 or 2, got {}",
                self.display.fraction_digits
            )));
        }

        if self.display.items_per_page == 0 {
            return Err(ClientError::InvalidConfig(
                "items_per_page must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// The parsed base URL. Only `http` and `https` are accepted.
    pub fn base_url(&self) -> ClientResult<Url> {
        let url = Url::parse(&self.api.base_url)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}://",
                other
            ))),
        }
    }

    /// Applies `PUNTO_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    ///
    /// Unparseable numeric values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("PUNTO_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(value) = lookup("PUNTO_TIMEOUT_SECS") {
            match value.parse() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %value, "Ignoring invalid PUNTO_TIMEOUT_SECS"),
            }
        }

        if let Some(value) = lookup("PUNTO_MAX_RETRIES") {
            match value.parse() {
                Ok(retries) => self.api.max_retries = retries,
                Err(_) => warn!(value = %value, "Ignoring invalid PUNTO_MAX_RETRIES"),
            }
        }

        if let Some(value) = lookup("PUNTO_CURRENCY_DIGITS") {
            match value.parse() {
                Ok(digits) => self.display.fraction_digits = digits,
                Err(_) => warn!(value = %value, "Ignoring invalid PUNTO_CURRENCY_DIGITS"),
            }
        }

        if let Some(value) = lookup("PUNTO_ITEMS_PER_PAGE") {
            match value.parse() {
                Ok(per_page) => self.display.items_per_page = per_page,
                Err(_) => warn!(value = %value, "Ignoring invalid PUNTO_ITEMS_PER_PAGE"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("co", "punto", "punto")
            .map(|dirs| dirs.config_dir().join("punto.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.api.max_retries, 3);
        assert_eq!(config.display.items_per_page, 6);
        assert_eq!(config.display.currency_format(), CurrencyFormat::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.api.base_url = "ws://localhost:3000".to_string();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.api.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.api.base_url = "https://api.punto.example".to_string();
        assert!(config.validate().is_ok());

        config.display.fraction_digits = 3;
        assert!(matches!(config.validate(), Err(ClientError::InvalidConfig(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ClientConfig::default();
        config.api.base_url = "http://192.168.0.173:3000".to_string();
        config.display.fraction_digits = 2;

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[display]"));

        let parsed: ClientConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: ClientConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://api.punto.example"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.api.base_url, "https://api.punto.example");
        assert_eq!(parsed.api.timeout_secs, 30);
        assert_eq!(parsed.display, DisplaySettings::default());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("PUNTO_API_URL", "https://pos.example"),
            ("PUNTO_TIMEOUT_SECS", "5"),
            ("PUNTO_MAX_RETRIES", "not-a-number"),
            ("PUNTO_CURRENCY_DIGITS", "2"),
            ("PUNTO_ITEMS_PER_PAGE", "10"),
        ]);

        let mut config = ClientConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://pos.example");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.max_retries, 3);
        assert_eq!(config.display.fraction_digits, 2);
        assert_eq!(config.display.items_per_page, 10);
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("punto-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("punto.toml");

        let mut config = ClientConfig::default();
        config.api.max_retries = 0;
        config.save(Some(path.clone())).unwrap();

        let loaded = ClientConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.api.max_retries, 0);

        std::fs::remove_dir_all(dir).unwrap();
    }
}
