//! Configuration management for the markdown generator.
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present) once at startup.

use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use mdgen_storage::StoreConfig;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Path prefix the generator routes are mounted under.
pub const ROUTE_PREFIX: &str = "/markdown-generator";

/// Get the global configuration
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Initialize configuration (call once at startup)
pub fn init() -> &'static Config {
    config()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Externally visible origin used to build download URLs.
    pub public_url: String,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub export_dir: PathBuf,
    pub retention_seconds: u64,
    pub sweep_interval_seconds: u64,
    /// Kick off a background sweep after each successful write.
    pub sweep_on_write: bool,
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Tool name written to front matter and the github-style footer.
    pub tool_name: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_source(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_source(get: impl Fn(&str) -> Option<String>) -> Self {
        let value_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        Self {
            server: ServerConfig {
                host: value_or("HOST", "0.0.0.0"),
                port: parse_or(&value_or("PORT", "8080"), 8080),
                public_url: value_or("PUBLIC_URL", "http://localhost:8080")
                    .trim_end_matches('/')
                    .to_string(),
                max_body_bytes: parse_or(&value_or("MAX_BODY_BYTES", "2097152"), 2 * 1024 * 1024), // 2MB
            },
            storage: StorageConfig {
                export_dir: PathBuf::from(value_or("EXPORT_DIR", "./data/exports")),
                retention_seconds: parse_or(&value_or("RETENTION_SECONDS", "3600"), 3600).max(1),
                sweep_interval_seconds: parse_or(&value_or("SWEEP_INTERVAL_SECONDS", "60"), 60)
                    .max(1),
                sweep_on_write: value_or("SWEEP_ON_WRITE", "true").to_lowercase() != "false",
            },
            generator: GeneratorConfig {
                tool_name: value_or("GENERATOR_NAME", "Markdown Generator"),
            },
        }
    }

    /// Base URL the artifact store builds download links from.
    pub fn download_base_url(&self) -> String {
        format!("{}{}", self.server.public_url, ROUTE_PREFIX)
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.storage.export_dir, self.download_base_url())
            .with_retention(Duration::from_secs(self.storage.retention_seconds))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.storage.sweep_interval_seconds)
    }
}

fn parse_or<T: std::str::FromStr>(raw: &str, default: T) -> T {
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(value = raw, "Invalid numeric config value, using default");
            default
        }
    }
}
