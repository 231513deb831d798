use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::WeatherProvider, DailyForecast, DaySummary, DomainError, ForecastBundle, Location,
};

/// Today's summary and the full forecast for one location.
#[derive(Debug, Clone)]
pub struct LocationForecast {
    pub location: Location,
    pub today: DaySummary,
    pub days: Vec<DailyForecast>,
}

pub struct ForecastService {
    weather: Arc<dyn WeatherProvider>,
    concurrency: usize,
}

impl ForecastService {
    pub fn new(weather: Arc<dyn WeatherProvider>, concurrency: usize) -> Self {
        Self {
            weather,
            concurrency: concurrency.max(1),
        }
    }

    #[instrument(skip(self))]
    pub async fn gather(&self, global_id: u32) -> Result<ForecastBundle, DomainError> {
        let (days, weather_types, precipitation_classes) = tokio::try_join!(
            self.weather.daily_forecast(global_id),
            self.weather.weather_types(),
            self.weather.precipitation_classes(),
        )?;

        Ok(ForecastBundle {
            days,
            weather_types,
            precipitation_classes,
        })
    }

    /// Summary of the first forecast day.
    pub fn today(bundle: &ForecastBundle) -> Result<DaySummary, DomainError> {
        let first = bundle
            .days
            .first()
            .ok_or_else(|| DomainError::external("IPMA returned no forecast days"))?;

        Ok(DaySummary::from_forecast(
            first,
            &bundle.weather_types,
            &bundle.precipitation_classes,
        ))
    }

    /// Forecasts for every location, in input order.
    #[instrument(skip(self, locations), fields(count = locations.len(), concurrency = self.concurrency))]
    pub async fn overview(
        &self,
        locations: &[Location],
    ) -> Result<Vec<LocationForecast>, DomainError> {
        let (weather_types, precipitation_classes) = tokio::try_join!(
            self.weather.weather_types(),
            self.weather.precipitation_classes(),
        )?;
        let weather_types = Arc::new(weather_types);
        let precipitation_classes = Arc::new(precipitation_classes);
        let provider = Arc::clone(&self.weather);

        stream::iter(locations.to_vec())
            .map(move |location| {
                let weather = Arc::clone(&provider);
                let weather_types = Arc::clone(&weather_types);
                let precipitation_classes = Arc::clone(&precipitation_classes);
                async move {
                    let days = weather.daily_forecast(location.global_id_local).await?;
                    let first = days.first().ok_or_else(|| {
                        DomainError::external(format!(
                            "IPMA returned no forecast days for {}",
                            location.local
                        ))
                    })?;
                    let today =
                        DaySummary::from_forecast(first, &weather_types, &precipitation_classes);

                    Ok::<_, DomainError>(LocationForecast {
                        location,
                        today,
                        days,
                    })
                }
            })
            .buffered(self.concurrency)
            .try_collect()
            .await
    }
}
