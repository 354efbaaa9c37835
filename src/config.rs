use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::core::{DistanceMethod, FoodTypePolicy, MatchPolicy};
use crate::models::{KitchenProfile, Position};
use crate::services::LinearEstimator;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub kitchen: KitchenSettings,
    #[serde(default)]
    pub estimator: EstimatorSettings,
    #[serde(default)]
    pub audit: AuditSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_path")]
    pub path: String,
    #[serde(default = "default_catalog_ttl")]
    pub ttl_secs: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            ttl_secs: default_catalog_ttl(),
        }
    }
}

fn default_catalog_path() -> String { "data/ngos_chennai.csv".to_string() }
fn default_catalog_ttl() -> u64 { 3600 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_shortlist_size")]
    pub shortlist_size: usize,
    #[serde(default)]
    pub distance_method: DistanceMethod,
    #[serde(default)]
    pub mixed_accepts_specific: bool,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            shortlist_size: default_shortlist_size(),
            distance_method: DistanceMethod::default(),
            mixed_accepts_specific: false,
        }
    }
}

fn default_shortlist_size() -> usize { crate::core::DEFAULT_SHORTLIST_SIZE }

impl MatchingSettings {
    pub fn policy(&self) -> MatchPolicy {
        MatchPolicy {
            distance: self.distance_method,
            food_types: FoodTypePolicy {
                mixed_accepts_specific: self.mixed_accepts_specific,
            },
            shortlist_size: self.shortlist_size,
        }
    }
}

/// Fallback kitchen identity used when a request omits it
#[derive(Debug, Clone, Deserialize)]
pub struct KitchenSettings {
    #[serde(default = "default_kitchen_name")]
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default = "default_kitchen_latitude")]
    pub latitude: f64,
    #[serde(default = "default_kitchen_longitude")]
    pub longitude: f64,
}

impl Default for KitchenSettings {
    fn default() -> Self {
        Self {
            name: default_kitchen_name(),
            contact: String::new(),
            latitude: default_kitchen_latitude(),
            longitude: default_kitchen_longitude(),
        }
    }
}

fn default_kitchen_name() -> String { "My Kitchen".to_string() }
fn default_kitchen_latitude() -> f64 { 13.0106 }
fn default_kitchen_longitude() -> f64 { 80.2336 }

impl KitchenSettings {
    pub fn profile(&self) -> KitchenProfile {
        KitchenProfile {
            name: self.name.clone(),
            contact: self.contact.clone(),
            position: Position::new(self.latitude, self.longitude),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimatorProvider {
    #[default]
    Linear,
    Remote,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EstimatorSettings {
    #[serde(default)]
    pub provider: EstimatorProvider,
    pub endpoint: Option<String>,
    #[serde(default = "default_estimator_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub linear: LinearEstimator,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            provider: EstimatorProvider::default(),
            endpoint: None,
            timeout_secs: default_estimator_timeout(),
            linear: LinearEstimator::default(),
        }
    }
}

fn default_estimator_timeout() -> u64 { 10 }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditBackend {
    #[default]
    Csv,
    Postgres,
    Disabled,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditSettings {
    #[serde(default)]
    pub backend: AuditBackend,
    #[serde(default = "default_audit_csv_path")]
    pub csv_path: String,
    pub database_url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            backend: AuditBackend::default(),
            csv_path: default_audit_csv_path(),
            database_url: None,
            max_connections: None,
            min_connections: None,
        }
    }
}

fn default_audit_csv_path() -> String { "waste_logs.csv".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SURPLUS__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SURPLUS__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SURPLUS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_database_url(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SURPLUS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Let the conventional DATABASE_URL variable feed the audit store
fn apply_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => Config::builder()
            .add_source(settings)
            .set_override("audit.database_url", url)?
            .build(),
        Err(_) => Ok(settings),
    }
}
