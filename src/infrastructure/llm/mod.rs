mod ollama;

pub use ollama::{same_model, InstalledModel, OllamaLlm};
