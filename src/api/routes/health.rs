use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub ollama: String,
    pub model: String,
    pub model_installed: bool,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Ready once Ollama answers and has the configured model.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let model = state.config.config.ollama.model.clone();

    let (ollama, installed) = match state.llm.health().await {
        Ok(status) => ("connected", status.installed),
        Err(e) => {
            tracing::warn!(error = %e, "Ollama health check failed");
            ("disconnected", false)
        }
    };

    let is_ready = ollama == "connected" && installed;
    let response = ReadinessResponse {
        status: if is_ready { "ready" } else { "not_ready" }.into(),
        ollama: ollama.into(),
        model,
        model_installed: installed,
    };

    let status = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}
