use config::{Config, ConfigError, Environment, File};
use oracle_services::{IngestConfig, ProviderConfig};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub api_key: Option<String>,
    pub sport: String,
    pub poll_interval_secs: f64,
    pub base_url: String,
    pub regions: String,
    pub markets: String,
    pub odds_format: String,
    pub request_timeout_secs: u64,
    pub subscriber_buffer: usize,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration, reading plain variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let run_mode = lookup("RUN_MODE").unwrap_or_else(|| "development".into());

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("feed.sport", "soccer_epl")?
            .set_default("feed.poll_interval_secs", 5.0)?
            .set_default("feed.base_url", "https://api.the-odds-api.com/v4")?
            .set_default("feed.regions", "eu")?
            .set_default("feed.markets", "spreads,ou,1x2")?
            .set_default("feed.odds_format", "decimal")?
            .set_default("feed.request_timeout_secs", 20)?
            .set_default("feed.subscriber_buffer", 64)?
            // Add in settings from configuration file
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add in settings from environment variables
            .add_source(
                Environment::with_prefix("BET_ORACLE")
                    .separator("__")
                    .try_parsing(true),
            )
            // Plain variables understood by earlier deployments
            .set_override_option("feed.api_key", non_empty("ODDS_API_KEY"))?
            .set_override_option("feed.sport", non_empty("SPORT"))?
            .set_override_option("feed.poll_interval_secs", non_empty("POLL_INTERVAL"))?
            .build()?;

        config.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            api_key: self.feed.api_key.clone().filter(|key| !key.trim().is_empty()),
            sport: self.feed.sport.clone(),
            base_url: self.feed.base_url.clone(),
            regions: self.feed.regions.clone(),
            markets: self.feed.markets.clone(),
            odds_format: self.feed.odds_format.clone(),
            request_timeout: Duration::from_secs(self.feed.request_timeout_secs),
        }
    }

    pub fn ingest_config(&self) -> Result<IngestConfig, ConfigError> {
        let secs = self.feed.poll_interval_secs;
        if !secs.is_finite() || secs <= 0.0 {
            return Err(ConfigError::Message(format!(
                "poll interval must be a positive number of seconds, got {}",
                secs
            )));
        }

        Ok(IngestConfig {
            poll_interval: Duration::from_secs_f64(secs),
        })
    }
}
