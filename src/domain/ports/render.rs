use crate::domain::{DailyForecast, MapMarker};

/// Turns forecast data into HTML fragments the chat page can embed.
pub trait ForecastRenderer: Send + Sync {
    fn temperature_chart(&self, days: &[DailyForecast]) -> String;

    /// Map centred on a single location with its popup opened.
    fn location_map(&self, marker: &MapMarker) -> String;

    /// Map of the whole country with one marker per location.
    fn overview_map(&self, markers: &[MapMarker]) -> String;
}
