use crate::domain::errors::DomainError;
use crate::domain::{DailyForecast, Location, PrecipitationClass, WeatherType};
use async_trait::async_trait;

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn locations(&self) -> Result<Vec<Location>, DomainError>;
    async fn daily_forecast(&self, global_id: u32) -> Result<Vec<DailyForecast>, DomainError>;
    async fn weather_types(&self) -> Result<Vec<WeatherType>, DomainError>;
    async fn precipitation_classes(&self) -> Result<Vec<PrecipitationClass>, DomainError>;
}
