//! Configuration management for the dispatch gateway
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with DESPACHO_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::AssetScope;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Upstream back-office API
    pub backoffice: BackofficeConfig,

    /// Dispatch flow defaults
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Log output
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackofficeConfig {
    /// Base URL of the REST API, without trailing slash
    pub base_url: String,

    /// Service key sent as `X-Api-Key`, if the deployment requires one
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DispatchConfig {
    /// Asset scope offered when the browser does not ask for one
    #[serde(default)]
    pub default_asset_scope: Option<AssetScope>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("DESPACHO_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("backoffice.base_url", "http://localhost:8090/api")?
            .set_default("backoffice.timeout_secs", 30)?
            .set_default("logging.json", false)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (DESPACHO_ prefix)
            .add_source(
                Environment::with_prefix("DESPACHO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            backoffice: BackofficeConfig::default(),
            dispatch: DispatchConfig::default(),
            logging: LoggingConfig { json: false },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for BackofficeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8090/api".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}
