use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::WeatherProvider, similarity, DomainError, Location, ParsedIntent,
};

const CHART_KEYWORDS: &[&str] = &["gráfico", "grafico"];
const FORECAST_KEYWORDS: &[&str] = &["tempo", "previsão"];
const MAP_KEYWORDS: &[&str] = &["mapa"];
const ALL_LOCATIONS_KEYWORDS: &[&str] = &["todas as cidades", "todas localidades", "all cities"];

const FUZZY_CUTOFF: f64 = 0.6;

pub struct IntentParser {
    weather: Arc<dyn WeatherProvider>,
}

impl IntentParser {
    pub fn new(weather: Arc<dyn WeatherProvider>) -> Self {
        Self { weather }
    }

    #[instrument(skip(self))]
    pub async fn parse(&self, text: &str) -> Result<ParsedIntent, DomainError> {
        let lower = text.to_lowercase();
        let locations = self.weather.locations().await?;

        Ok(ParsedIntent {
            city: find_city(&lower, &locations),
            include_chart: contains_any(&lower, CHART_KEYWORDS),
            wants_forecast: contains_any(&lower, FORECAST_KEYWORDS),
            show_map: contains_any(&lower, MAP_KEYWORDS),
            all_locations: contains_any(&lower, ALL_LOCATIONS_KEYWORDS),
        })
    }
}

/// First location named in `lower_text`, else the closest fuzzy match of the
/// whole text. Returns the location's own spelling.
pub fn find_city(lower_text: &str, locations: &[Location]) -> Option<String> {
    let names: Vec<String> = locations.iter().map(|l| l.local.to_lowercase()).collect();

    if let Some(i) = names.iter().position(|name| lower_text.contains(name.as_str())) {
        return Some(locations[i].local.clone());
    }

    let best = similarity::close_matches(
        lower_text,
        names.iter().map(String::as_str),
        1,
        FUZZY_CUTOFF,
    )
    .into_iter()
    .next()?;

    names
        .iter()
        .position(|name| name == best)
        .map(|i| locations[i].local.clone())
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}
