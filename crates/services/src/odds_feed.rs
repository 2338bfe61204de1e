use crate::error::FeedError;
use async_trait::async_trait;
use oracle_models::demo_events;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://api.the-odds-api.com/v4";
pub const DEFAULT_SPORT: &str = "soccer_epl";

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Upstream credential. `None` or empty selects demo mode.
    pub api_key: Option<String>,
    pub sport: String,
    pub base_url: String,
    pub regions: String,
    pub markets: String,
    pub odds_format: String,
    pub request_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            sport: DEFAULT_SPORT.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            regions: "eu".to_string(),
            markets: "spreads,ou,1x2".to_string(),
            odds_format: "decimal".to_string(),
            request_timeout: Duration::from_secs(20),
        }
    }
}

impl ProviderConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}

/// Source of raw upstream records, one call per tick.
#[async_trait]
pub trait OddsProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetch the current list of raw event records.
    async fn fetch(&self) -> Result<Vec<Value>, FeedError>;
}

/// Pick the HTTP provider when a credential is configured, demo otherwise.
pub fn provider_from_config(config: &ProviderConfig) -> Result<Arc<dyn OddsProvider>, FeedError> {
    if config.is_configured() {
        info!("🌐 Polling {} for sport {}", config.base_url, config.sport);
        Ok(Arc::new(HttpOddsProvider::new(config.clone())?))
    } else {
        info!("🎮 No upstream credential configured, running in demo mode");
        Ok(Arc::new(DemoOddsProvider))
    }
}

/// Serves the two fixed demo events on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoOddsProvider;

#[async_trait]
impl OddsProvider for DemoOddsProvider {
    fn name(&self) -> &'static str {
        "demo"
    }

    async fn fetch(&self) -> Result<Vec<Value>, FeedError> {
        demo_events()
            .iter()
            .map(|event| serde_json::to_value(event).map_err(FeedError::from))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct HttpOddsProvider {
    http: Client,
    config: ProviderConfig,
    api_key: String,
}

impl HttpOddsProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, FeedError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| FeedError::Config("upstream API key is not set".to_string()))?;

        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| FeedError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config, api_key })
    }

    fn odds_url(&self) -> String {
        format!(
            "{}/sports/{}/odds/",
            self.config.base_url.trim_end_matches('/'),
            self.config.sport
        )
    }
}

#[async_trait]
impl OddsProvider for HttpOddsProvider {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self) -> Result<Vec<Value>, FeedError> {
        let url = self.odds_url();
        debug!("Fetching odds from: {}", url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("regions", self.config.regions.as_str()),
                ("markets", self.config.markets.as_str()),
                ("oddsFormat", self.config.odds_format.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FeedError::Status { status: status.as_u16() });
        }

        let body = response.bytes().await?;
        match serde_json::from_slice::<Value>(&body)? {
            Value::Array(records) => Ok(records),
            other => Err(FeedError::Decode(format!(
                "expected a list of events, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
