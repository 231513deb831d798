mod llm;
mod render;
mod weather;

pub use llm::{LlmService, ModelStatus};
pub use render::ForecastRenderer;
pub use weather::WeatherProvider;
