//! Server configuration: bind address, logging, upstream settings

use config::{Config, Environment, File};
use newsrank_core::HackerNewsConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Upstream feed and policy settings
    #[serde(default)]
    pub hacker_news: HackerNewsConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_address: default_bind_address(),
            port: default_port(),
            log_level: default_log_level(),
            hacker_news: HackerNewsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> ServerResult<()> {
        if self.bind_address.trim().is_empty() {
            return Err(ServerError::ConfigurationError(
                "bind_address must not be empty".to_string(),
            ));
        }
        self.hacker_news.validate()?;
        Ok(())
    }
}

/// Load configuration from the optional `newsrank.toml` file, layered
/// under `NEWSRANK_*` environment overrides. Nested keys use a double
/// underscore, e.g. `NEWSRANK_HACKER_NEWS__MAX_CONCURRENCY=4`.
pub fn load_config() -> ServerResult<ServerConfig> {
    let settings = Config::builder()
        .add_source(File::with_name("newsrank").required(false))
        .add_source(
            Environment::with_prefix("NEWSRANK")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let config: ServerConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
