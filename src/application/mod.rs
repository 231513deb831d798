//! Application layer - Use cases and orchestration.
//!
//! Services here depend on domain ports (`WeatherProvider`, `LlmService`)
//! rather than on the IPMA or Ollama clients directly.

pub mod services;

pub use services::{
    ChatReply, ChatService, CityPlot, ForecastService, IntentParser, DEFAULT_INSTRUCTION,
};
