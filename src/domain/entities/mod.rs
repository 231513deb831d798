mod forecast;
mod intent;
mod location;
mod lenient;
mod marker;
mod summary;

pub use forecast::{DailyForecast, ForecastBundle, PrecipitationClass, WeatherType};
pub use intent::ParsedIntent;
pub use location::Location;
pub use marker::MapMarker;
pub use summary::{weather_emoji, DaySummary};
