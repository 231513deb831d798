mod chat;
mod forecast;
mod intent;

pub use chat::{build_prompt, replies, ChatReply, ChatService, CityPlot, DEFAULT_INSTRUCTION};
pub use forecast::{ForecastService, LocationForecast};
pub use intent::{find_city, IntentParser};
