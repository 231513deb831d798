use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::domain::{
    ports::{LlmService, ModelStatus},
    DomainError,
};
use crate::infrastructure::config::OllamaConfig;

const PULL_TIMEOUT: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct PullRequest<'a> {
    model: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<InstalledModel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstalledModel {
    pub name: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Deserialize)]
struct OllamaErrorBody {
    error: String,
}

/// `LlmService` backed by a local Ollama runtime (`/api/generate`).
pub struct OllamaLlm {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaLlm {
    pub fn new(config: &OllamaConfig) -> Result<Self, DomainError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| DomainError::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    #[instrument(skip(self, prompt, system), fields(model = %self.model))]
    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, DomainError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            system,
        };

        let response = self
            .http
            .post(self.url("/api/generate"))
            .json(&request)
            .send()
            .await
            .map_err(map_request_error)?;
        let response = check_status(response, &self.model).await?;

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| DomainError::external(format!("invalid Ollama response: {e}")))?;

        Ok(body.response.trim().to_string())
    }

    pub async fn list_models(&self) -> Result<Vec<InstalledModel>, DomainError> {
        let response = self
            .http
            .get(self.url("/api/tags"))
            .send()
            .await
            .map_err(map_request_error)?;
        let response = check_status(response, &self.model).await?;

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| DomainError::external(format!("invalid Ollama tags response: {e}")))?;
        Ok(tags.models)
    }

    #[instrument(skip(self), fields(model = %self.model))]
    pub async fn pull_model(&self) -> Result<(), DomainError> {
        info!("pulling model, this can take a while");
        let response = self
            .http
            .post(self.url("/api/pull"))
            .timeout(PULL_TIMEOUT)
            .json(&PullRequest {
                model: &self.model,
                stream: false,
            })
            .send()
            .await
            .map_err(map_request_error)?;
        let response = check_status(response, &self.model).await?;

        let body: PullResponse = response
            .json()
            .await
            .map_err(|e| DomainError::external(format!("invalid Ollama pull response: {e}")))?;
        if body.status != "success" {
            return Err(DomainError::external(format!(
                "pulling {} ended with status {}",
                self.model, body.status
            )));
        }
        info!("model pulled");
        Ok(())
    }

    /// Waits for the runtime to answer and, if `pull` is set, pulls the
    /// model when it is not installed yet.
    pub async fn ensure_ready(&self, retries: usize, pull: bool) -> Result<ModelStatus, DomainError> {
        let policy = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(500))
            .with_max_delay(Duration::from_secs(5))
            .with_max_times(retries);

        let status = (|| async move { self.health().await })
            .retry(policy)
            .when(|e: &DomainError| matches!(e, DomainError::ExternalService(_) | DomainError::Timeout(_)))
            .notify(|e: &DomainError, delay: Duration| {
                warn!(error = %e, delay_ms = delay.as_millis() as u64, "Ollama not reachable yet");
            })
            .await?;

        if status.installed || !pull {
            return Ok(status);
        }

        self.pull_model().await?;
        self.health().await
    }
}

/// Compares model names treating a missing tag as `:latest`.
pub fn same_model(a: &str, b: &str) -> bool {
    fn normalize(name: &str) -> String {
        if name.contains(':') {
            name.to_string()
        } else {
            format!("{name}:latest")
        }
    }
    normalize(a) == normalize(b)
}

fn map_request_error(e: reqwest::Error) -> DomainError {
    if e.is_timeout() {
        DomainError::timeout("Ollama request timed out")
    } else {
        DomainError::external(format!("Ollama unreachable: {e}"))
    }
}

async fn check_status(
    response: reqwest::Response,
    model: &str,
) -> Result<reqwest::Response, DomainError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<OllamaErrorBody>()
        .await
        .map(|b| b.error)
        .unwrap_or_else(|_| status.to_string());

    if status == reqwest::StatusCode::NOT_FOUND {
        Err(DomainError::not_found(format!(
            "{message} (run `ollama pull {model}`)"
        )))
    } else {
        Err(DomainError::external(format!(
            "Ollama returned {status}: {message}"
        )))
    }
}

#[async_trait]
impl LlmService for OllamaLlm {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        self.generate(prompt, None).await
    }

    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, DomainError> {
        self.generate(prompt, Some(system)).await
    }

    async fn health(&self) -> Result<ModelStatus, DomainError> {
        let models = self.list_models().await?;
        Ok(ModelStatus {
            model: self.model.clone(),
            installed: models.iter().any(|m| same_model(&m.name, &self.model)),
        })
    }
}
