use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{instrument, warn};

use super::TtlCache;
use crate::domain::{
    ports::WeatherProvider, DailyForecast, DomainError, Location, PrecipitationClass, WeatherType,
};
use crate::infrastructure::config::IpmaConfig;

pub mod paths {
    pub const LOCATIONS: &str = "/distrits-islands.json";
    pub const WEATHER_TYPES: &str = "/weather-type-classe.json";
    pub const PRECIPITATION_CLASSES: &str = "/precipitation-classe.json";

    pub fn daily_forecast(global_id: u32) -> String {
        format!("/forecast/meteorology/cities/daily/{}.json", global_id)
    }
}

/// Every IPMA open-data payload wraps its records in `data`.
#[derive(Deserialize)]
struct Envelope {
    data: Value,
}

/// Client for the IPMA open-data API. Reference tables are cached,
/// forecasts are always fetched fresh.
pub struct IpmaClient {
    http: reqwest::Client,
    base_url: String,
    retries: usize,
    reference: TtlCache<&'static str, Value>,
}

impl IpmaClient {
    pub fn new(config: &IpmaConfig) -> Result<Self, DomainError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("tempo-chat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retries: config.retries,
            reference: TtlCache::new(config.cache_ttl()),
        })
    }

    fn retry_policy(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(200))
            .with_max_delay(Duration::from_secs(2))
            .with_max_times(self.retries)
            .with_jitter()
    }

    #[instrument(skip(self))]
    async fn fetch(&self, path: &str) -> Result<Value, DomainError> {
        let url = format!("{}{}", self.base_url, path);
        let http = &self.http;
        let target = url.as_str();

        let envelope = (|| async move {
            http.get(target)
                .send()
                .await?
                .error_for_status()?
                .json::<Envelope>()
                .await
        })
        .retry(self.retry_policy())
        .when(is_transient)
        .notify(|e: &reqwest::Error, delay: Duration| {
            warn!(error = %e, url = %target, delay_ms = delay.as_millis() as u64, "retrying IPMA request");
        })
        .await
        .map_err(|e| map_request_error(&url, e))?;

        Ok(envelope.data)
    }

    async fn reference<T: DeserializeOwned>(&self, path: &'static str) -> Result<T, DomainError> {
        let data = match self.reference.get(&path)? {
            Some(data) => data,
            None => {
                let data = self.fetch(path).await?;
                self.reference.insert(path, data.clone())?;
                data
            }
        };
        decode(path, data)
    }
}

fn decode<T: DeserializeOwned>(path: &str, data: Value) -> Result<T, DomainError> {
    serde_json::from_value(data)
        .map_err(|e| DomainError::external(format!("unexpected payload from {path}: {e}")))
}

fn is_transient(e: &reqwest::Error) -> bool {
    e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
}

fn map_request_error(url: &str, e: reqwest::Error) -> DomainError {
    if e.is_timeout() {
        DomainError::timeout(format!("IPMA request to {url} timed out"))
    } else if let Some(status) = e.status() {
        DomainError::external(format!("IPMA returned {status} for {url}"))
    } else {
        DomainError::external(format!("IPMA request to {url} failed: {e}"))
    }
}

#[async_trait]
impl WeatherProvider for IpmaClient {
    async fn locations(&self) -> Result<Vec<Location>, DomainError> {
        self.reference(paths::LOCATIONS).await
    }

    async fn daily_forecast(&self, global_id: u32) -> Result<Vec<DailyForecast>, DomainError> {
        let path = paths::daily_forecast(global_id);
        let data = self.fetch(&path).await?;
        decode(&path, data)
    }

    async fn weather_types(&self) -> Result<Vec<WeatherType>, DomainError> {
        self.reference(paths::WEATHER_TYPES).await
    }

    async fn precipitation_classes(&self) -> Result<Vec<PrecipitationClass>, DomainError> {
        self.reference(paths::PRECIPITATION_CLASSES).await
    }
}
