//! # Kiosk Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PRICECHECK_BACKEND=sqlite                                          │
//! │     PRICECHECK_URL=https://abc.supabase.co                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path> or PRICECHECK_CONFIG                               │
//! │     ~/.config/pricecheck-kiosk/kiosk.toml (Linux)                      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     REST backend, productos table, 10 s dwell                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [kiosk]
//! title = "Price Check"
//! dwell_secs = 10
//! focus_interval_ms = 1000
//! currency_symbol = "$"
//!
//! [catalog]
//! backend = "rest"            # rest | sqlite
//! url = "https://abc.supabase.co"
//! api_key = "..."
//! table = "productos"
//! timeout_secs = 10
//! sqlite_path = "catalog.db"
//!
//! [catalog.columns]
//! id = "id"
//! name = "Producto"
//! price = "Precio"
//! codes = ["Codigo", "Codigo1", "Codigo2", "Codigo3", "Codigo4"]
//! ```

use pricecheck_catalog::{CatalogSchema, RestConfig, SqliteConfig};
use pricecheck_core::DEFAULT_DWELL_SECS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{KioskError, KioskResult};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "PRICECHECK_CONFIG";

/// Longest accepted dwell time (one hour).
pub const MAX_DWELL_SECS: u64 = 3600;

/// Longest accepted focus reclaim interval (one minute).
pub const MAX_FOCUS_INTERVAL_MS: u64 = 60_000;

// =============================================================================
// Backend
// =============================================================================

/// Which catalog the kiosk reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Hosted table over PostgREST.
    #[default]
    Rest,

    /// Local SQLite mirror.
    Sqlite,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Rest => write!(f, "rest"),
            Backend::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = KioskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rest" | "supabase" | "postgrest" => Ok(Backend::Rest),
            "sqlite" | "local" => Ok(Backend::Sqlite),
            other => Err(KioskError::Config(format!(
                "Unknown catalog backend: '{}'. Valid options: rest, sqlite",
                other
            ))),
        }
    }
}

// =============================================================================
// Kiosk Settings
// =============================================================================

/// Screen behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KioskSettings {
    /// Header shown at the top of every view.
    #[serde(default = "default_title")]
    pub title: String,

    /// Seconds a result stays on screen before resetting to idle.
    #[serde(default = "default_dwell_secs")]
    pub dwell_secs: u64,

    /// How often the scanner input reclaims focus (milliseconds).
    #[serde(default = "default_focus_interval")]
    pub focus_interval_ms: u64,

    /// Prefix for displayed prices.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_title() -> String {
    "Price Check".to_string()
}

fn default_dwell_secs() -> u64 {
    DEFAULT_DWELL_SECS
}

fn default_focus_interval() -> u64 {
    1000
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for KioskSettings {
    fn default() -> Self {
        KioskSettings {
            title: default_title(),
            dwell_secs: default_dwell_secs(),
            focus_interval_ms: default_focus_interval(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl KioskSettings {
    pub fn dwell(&self) -> Duration {
        Duration::from_secs(self.dwell_secs)
    }

    pub fn focus_interval(&self) -> Duration {
        Duration::from_millis(self.focus_interval_ms)
    }
}

// =============================================================================
// Catalog Settings
// =============================================================================

/// Column names inside the catalog table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSettings {
    #[serde(default = "default_id_column")]
    pub id: String,

    #[serde(default = "default_name_column")]
    pub name: String,

    #[serde(default = "default_price_column")]
    pub price: String,

    /// Columns matched against the scanned code; the first is the primary.
    #[serde(default = "default_code_columns")]
    pub codes: Vec<String>,
}

fn default_id_column() -> String {
    CatalogSchema::default().id_column
}

fn default_name_column() -> String {
    CatalogSchema::default().name_column
}

fn default_price_column() -> String {
    CatalogSchema::default().price_column
}

fn default_code_columns() -> Vec<String> {
    CatalogSchema::default().code_columns
}

impl Default for ColumnSettings {
    fn default() -> Self {
        ColumnSettings {
            id: default_id_column(),
            name: default_name_column(),
            price: default_price_column(),
            codes: default_code_columns(),
        }
    }
}

/// Where and how products are looked up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default)]
    pub backend: Backend,

    /// Project URL of the hosted catalog (REST backend).
    #[serde(default)]
    pub url: Option<String>,

    /// Anonymous API key of the hosted catalog (REST backend).
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_table")]
    pub table: String,

    /// Request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Mirror file (SQLite backend).
    #[serde(default)]
    pub sqlite_path: Option<PathBuf>,

    #[serde(default)]
    pub columns: ColumnSettings,
}

fn default_table() -> String {
    CatalogSchema::default().table
}

fn default_timeout() -> u64 {
    10
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            backend: Backend::default(),
            url: None,
            api_key: None,
            table: default_table(),
            timeout_secs: default_timeout(),
            sqlite_path: None,
            columns: ColumnSettings::default(),
        }
    }
}

impl CatalogSettings {
    /// Table and column names as the catalog crate expects them.
    pub fn schema(&self) -> CatalogSchema {
        CatalogSchema {
            table: self.table.clone(),
            id_column: self.columns.id.clone(),
            name_column: self.columns.name.clone(),
            price_column: self.columns.price.clone(),
            code_columns: self.columns.codes.clone(),
        }
    }

    /// Connection settings for the REST backend.
    pub fn rest_config(&self) -> KioskResult<RestConfig> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| KioskError::Config("catalog.url is required for the rest backend".into()))?;
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            KioskError::Config("catalog.api_key is required for the rest backend".into())
        })?;

        Ok(RestConfig::new(url, api_key).timeout(Duration::from_secs(self.timeout_secs)))
    }

    /// Connection settings for the SQLite backend.
    pub fn sqlite_config(&self) -> KioskResult<SqliteConfig> {
        let path = self.sqlite_path.as_ref().ok_or_else(|| {
            KioskError::Config("catalog.sqlite_path is required for the sqlite backend".into())
        })?;

        Ok(SqliteConfig::new(path).connect_timeout(Duration::from_secs(self.timeout_secs)))
    }
}

// =============================================================================
// Main Kiosk Configuration
// =============================================================================

/// Complete kiosk configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KioskConfig {
    #[serde(default)]
    pub kiosk: KioskSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl KioskConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, `PRICECHECK_CONFIG`, or kiosk.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> KioskResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading kiosk config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        // Override with environment variables
        config.apply_env_overrides();

        config.validate()?;

        Ok(config)
    }

    /// Parses a config file body.
    pub fn from_toml(contents: &str) -> KioskResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> KioskResult<()> {
        if !(1..=MAX_DWELL_SECS).contains(&self.kiosk.dwell_secs) {
            return Err(KioskError::Config(format!(
                "dwell_secs must be between 1 and {}, got: {}",
                MAX_DWELL_SECS, self.kiosk.dwell_secs
            )));
        }

        if !(1..=MAX_FOCUS_INTERVAL_MS).contains(&self.kiosk.focus_interval_ms) {
            return Err(KioskError::Config(format!(
                "focus_interval_ms must be between 1 and {}, got: {}",
                MAX_FOCUS_INTERVAL_MS, self.kiosk.focus_interval_ms
            )));
        }

        self.catalog
            .schema()
            .validate()
            .map_err(|e| KioskError::Config(e.to_string()))?;

        match self.catalog.backend {
            Backend::Rest => {
                let rest = self.catalog.rest_config()?;
                if !rest.base_url.starts_with("http://") && !rest.base_url.starts_with("https://") {
                    return Err(KioskError::Config(format!(
                        "Catalog URL must start with http:// or https://, got: {}",
                        rest.base_url
                    )));
                }
                if rest.api_key.trim().is_empty() {
                    return Err(KioskError::Config("catalog.api_key is empty".into()));
                }
            }
            Backend::Sqlite => {
                self.catalog.sqlite_config()?;
            }
        }

        Ok(())
    }

    /// Applies `PRICECHECK_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(backend) = var("PRICECHECK_BACKEND") {
            match backend.parse() {
                Ok(parsed) => {
                    debug!(backend = %backend, "Overriding catalog backend from environment");
                    self.catalog.backend = parsed;
                }
                Err(e) => warn!("{}", e),
            }
        }

        if let Some(url) = var("PRICECHECK_URL") {
            debug!(url = %url, "Overriding catalog URL from environment");
            self.catalog.url = Some(url);
        }

        if let Some(key) = var("PRICECHECK_API_KEY") {
            self.catalog.api_key = Some(key);
        }

        if let Some(table) = var("PRICECHECK_TABLE") {
            self.catalog.table = table;
        }

        if let Some(path) = var("PRICECHECK_SQLITE_PATH") {
            self.catalog.sqlite_path = Some(PathBuf::from(path));
        }

        if let Some(dwell) = var("PRICECHECK_DWELL_SECS") {
            match dwell.parse::<u64>() {
                Ok(secs) => self.kiosk.dwell_secs = secs,
                Err(_) => warn!(value = %dwell, "Ignoring invalid PRICECHECK_DWELL_SECS"),
            }
        }

        if let Some(title) = var("PRICECHECK_TITLE") {
            self.kiosk.title = title;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        crate::project_dirs().map(|dirs| dirs.config_dir().join("kiosk.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn rest_config() -> KioskConfig {
        let mut config = KioskConfig::default();
        config.catalog.url = Some("https://abc.supabase.co".to_string());
        config.catalog.api_key = Some("anon-key".to_string());
        config
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!("rest".parse::<Backend>().unwrap(), Backend::Rest);
        assert_eq!("SQLite".parse::<Backend>().unwrap(), Backend::Sqlite);
        assert_eq!("supabase".parse::<Backend>().unwrap(), Backend::Rest);
        assert!("mysql".parse::<Backend>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = KioskConfig::default();
        assert_eq!(config.kiosk.dwell(), Duration::from_secs(10));
        assert_eq!(config.kiosk.focus_interval(), Duration::from_secs(1));
        assert_eq!(config.catalog.backend, Backend::Rest);
        assert_eq!(config.catalog.schema(), CatalogSchema::default());
    }

    #[test]
    fn test_rest_backend_needs_url_and_key() {
        let mut config = KioskConfig::default();
        assert!(config.validate().is_err());

        config.catalog.url = Some("https://abc.supabase.co".to_string());
        assert!(config.validate().is_err());

        config.catalog.api_key = Some("anon-key".to_string());
        assert!(config.validate().is_ok());

        config.catalog.url = Some("ftp://abc".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sqlite_backend_needs_path() {
        let mut config = KioskConfig::default();
        config.catalog.backend = Backend::Sqlite;
        assert!(config.validate().is_err());

        config.catalog.sqlite_path = Some(PathBuf::from("catalog.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_dwell_rejected() {
        let mut config = rest_config();
        config.kiosk.dwell_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_timer_values_rejected() {
        let mut config = rest_config();
        config.apply_overrides(|name| match name {
            "PRICECHECK_DWELL_SECS" => Some(u64::MAX.to_string()),
            _ => None,
        });
        assert_eq!(config.kiosk.dwell_secs, u64::MAX);
        assert!(matches!(config.validate(), Err(KioskError::Config(_))));

        config.kiosk.dwell_secs = MAX_DWELL_SECS;
        assert!(config.validate().is_ok());

        config.kiosk.focus_interval_ms = MAX_FOCUS_INTERVAL_MS + 1;
        assert!(matches!(config.validate(), Err(KioskError::Config(_))));
    }

    #[test]
    fn test_too_many_code_columns_rejected() {
        let mut config = rest_config();
        config.catalog.columns.codes = (0..6).map(|i| format!("Codigo{}", i)).collect();
        assert!(matches!(config.validate(), Err(KioskError::Config(_))));
    }

    #[test]
    fn test_toml_file() {
        let config = KioskConfig::from_toml(
            r#"
            [kiosk]
            title = "Almacen Central"
            dwell_secs = 15

            [catalog]
            backend = "sqlite"
            sqlite_path = "/var/lib/pricecheck/catalog.db"

            [catalog.columns]
            codes = ["ean", "ean_alt"]
            "#,
        )
        .unwrap();

        assert_eq!(config.kiosk.title, "Almacen Central");
        assert_eq!(config.kiosk.dwell_secs, 15);
        assert_eq!(config.kiosk.currency_symbol, "$");
        assert_eq!(config.catalog.backend, Backend::Sqlite);
        assert_eq!(config.catalog.columns.name, "Producto");
        assert_eq!(config.catalog.schema().primary_code_column(), Some("ean"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PRICECHECK_BACKEND", "sqlite"),
            ("PRICECHECK_SQLITE_PATH", "/tmp/catalog.db"),
            ("PRICECHECK_DWELL_SECS", "5"),
            ("PRICECHECK_TITLE", "Caja 2"),
            ("PRICECHECK_TABLE", "products"),
        ]
        .into_iter()
        .collect();

        let mut config = KioskConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.catalog.backend, Backend::Sqlite);
        assert_eq!(config.catalog.sqlite_path, Some(PathBuf::from("/tmp/catalog.db")));
        assert_eq!(config.kiosk.dwell_secs, 5);
        assert_eq!(config.kiosk.title, "Caja 2");
        assert_eq!(config.catalog.schema().table, "products");
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut config = KioskConfig::default();
        config.apply_overrides(|key| match key {
            "PRICECHECK_BACKEND" => Some("mysql".to_string()),
            "PRICECHECK_DWELL_SECS" => Some("soon".to_string()),
            _ => None,
        });

        assert_eq!(config.catalog.backend, Backend::Rest);
        assert_eq!(config.kiosk.dwell_secs, 10);
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&rest_config()).unwrap();
        assert!(toml_str.contains("[kiosk]"));
        assert!(toml_str.contains("[catalog]"));
    }
}
