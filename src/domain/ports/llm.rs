use crate::domain::errors::DomainError;
use async_trait::async_trait;
use serde::Serialize;

/// Whether the backing runtime is reachable and has the configured model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelStatus {
    pub model: String,
    pub installed: bool,
}

#[async_trait]
pub trait LlmService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError>;
    async fn complete_with_system(&self, system: &str, prompt: &str)
        -> Result<String, DomainError>;
    async fn health(&self) -> Result<ModelStatus, DomainError>;
}
