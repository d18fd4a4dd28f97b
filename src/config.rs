use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG_DIR: &str = "config";
const DEFAULT_ENV: &str = "development";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_json: bool,
    #[serde(default = "default_true")]
    pub auto_migrate: bool,
    #[serde(default = "default_true")]
    pub seed_on_start: bool,

    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Comma-separated list of allowed CORS origins; empty means permissive.
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,
    #[serde(default = "default_db_idle_timeout_secs")]
    pub db_idle_timeout_secs: u64,
    #[serde(default = "default_db_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3001
}
fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_uploads_dir() -> String {
    "uploads".to_string()
}
fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}
fn default_db_max_connections() -> u32 {
    10
}
fn default_db_min_connections() -> u32 {
    1
}
fn default_db_connect_timeout_secs() -> u64 {
    30
}
fn default_db_idle_timeout_secs() -> u64 {
    600
}
fn default_db_acquire_timeout_secs() -> u64 {
    8
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        self.environment == "development" || self.environment == "test"
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.is_empty() {
            return Err(ConfigError::Message("database_url must not be empty".into()));
        }
        if self.db_min_connections > self.db_max_connections {
            return Err(ConfigError::Message(
                "db_min_connections must not exceed db_max_connections".into(),
            ));
        }
        Ok(())
    }
}

/// Load configuration from defaults, optional `config/{env}` files and
/// `APP__*` environment variables, in increasing priority.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .set_default("database_url", "sqlite://printshop.db?mode=rwc")?
        .set_default("environment", DEFAULT_ENV)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;
    app_config.validate()?;

    Ok(app_config)
}

/// Initialise the global tracing subscriber. Honors `RUST_LOG` when set,
/// otherwise falls back to the configured level.
pub fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("printshop_api={0},tower_http={0}", log_level)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig {
            database_url: "sqlite://test.db".into(),
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: true,
            seed_on_start: true,
            uploads_dir: default_uploads_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            cors_allowed_origins: None,
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            db_connect_timeout_secs: default_db_connect_timeout_secs(),
            db_idle_timeout_secs: default_db_idle_timeout_secs(),
            db_acquire_timeout_secs: default_db_acquire_timeout_secs(),
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.port, 3001);
        assert!(cfg.is_development());
    }

    #[test]
    fn pool_bounds_are_checked() {
        let cfg = AppConfig {
            database_url: "sqlite://test.db".into(),
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: true,
            seed_on_start: true,
            uploads_dir: default_uploads_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            cors_allowed_origins: None,
            db_max_connections: 1,
            db_min_connections: 4,
            db_connect_timeout_secs: 30,
            db_idle_timeout_secs: 600,
            db_acquire_timeout_secs: 8,
        };
        assert!(cfg.validate().is_err());
    }
}
