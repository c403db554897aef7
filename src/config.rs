use cannabot_strain::DiscoveryOptions;
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub strains: StrainsConfig,
    #[serde(default)]
    pub bot: BotConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct StrainsConfig {
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,
    #[serde(default = "default_pool_fraction")]
    pub pool_fraction: f64,
    #[serde(default = "default_type_bonus")]
    pub type_bonus: f64,
    #[serde(default = "default_medical_bonus")]
    pub medical_bonus: f64,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for StrainsConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            pool_fraction: default_pool_fraction(),
            type_bonus: default_type_bonus(),
            medical_bonus: default_medical_bonus(),
            default_limit: default_limit(),
        }
    }
}

impl StrainsConfig {
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            pool_fraction: self.pool_fraction,
            type_bonus: self.type_bonus,
            medical_bonus: self.medical_bonus,
            default_limit: self.default_limit,
        }
    }
}

fn default_dataset_path() -> String {
    "data/strains.csv".to_string()
}

fn default_pool_fraction() -> f64 {
    0.2
}

fn default_type_bonus() -> f64 {
    10.0
}

fn default_medical_bonus() -> f64 {
    20.0
}

fn default_limit() -> usize {
    3
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BotConfig {
    /// Bearer token the interaction relay must present. Open when unset.
    #[serde(default)]
    pub relay_token: Option<String>,
    /// Daily THC limit in mg for users who have not set their own.
    #[serde(default)]
    pub max_daily_thc_default: Option<f64>,
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy environment variables (DATABASE_URL, STRAINS_CSV, ...)
    /// 2. Environment variables (CANNABOT__DATABASE__URL, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite:cannabot.db")?
            .set_default("database.max_connections", 5)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("CANNABOT")
                .separator("__")
                .try_parsing(true),
        );

        for (var, key) in [
            ("DATABASE_URL", "database.url"),
            ("STRAINS_CSV", "strains.dataset_path"),
            ("RELAY_TOKEN", "bot.relay_token"),
            ("LOG_LEVEL", "observability.log_level"),
        ] {
            if let Ok(value) = env::var(var) {
                builder = builder.set_override(key, value)?;
            }
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if !(self.strains.pool_fraction > 0.0 && self.strains.pool_fraction <= 1.0) {
            return Err("Strains pool_fraction must be within (0, 1]".to_string());
        }
        if self.strains.default_limit == 0 {
            return Err("Strains default_limit must be at least 1".to_string());
        }
        if self.bot.max_daily_thc_default.is_some_and(|limit| limit < 0.0) {
            return Err("Bot max_daily_thc_default cannot be negative".to_string());
        }
        Ok(())
    }
}
