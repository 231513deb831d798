pub mod config;
pub mod ipma;
pub mod llm;
pub mod render;

pub use config::{AppConfig, Config, ConfigError, PromptsConfig};
pub use ipma::IpmaClient;
pub use llm::OllamaLlm;
pub use render::{HtmlRenderer, TemplateContext, TemplateStore};
