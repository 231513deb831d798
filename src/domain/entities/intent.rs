use serde::{Deserialize, Serialize};

/// What a chat message asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIntent {
    pub city: Option<String>,
    pub include_chart: bool,
    pub wants_forecast: bool,
    pub show_map: bool,
    pub all_locations: bool,
}

impl ParsedIntent {
    pub fn is_city_forecast(&self) -> bool {
        self.city.is_some() && self.wants_forecast
    }
}
