use std::net::SocketAddr;
use std::sync::Arc;
use tempo_chat::api::{create_router, AppState};
use tempo_chat::application::ChatService;
use tempo_chat::infrastructure::{AppConfig, HtmlRenderer, IpmaClient, OllamaLlm, TemplateStore};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tempo_chat=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::load()?;
    let settings = &config.config;

    let weather = Arc::new(IpmaClient::new(&settings.ipma)?);
    let ollama = Arc::new(OllamaLlm::new(&settings.ollama)?);
    info!(base_url = %settings.ollama.base_url, model = ollama.model(), "Ollama client initialized");

    // The compose file only orders startup; wait here until Ollama answers.
    match ollama
        .ensure_ready(settings.ollama.startup_retries, settings.ollama.pull_on_startup)
        .await
    {
        Ok(status) if status.installed => info!(model = %status.model, "model available"),
        Ok(status) => warn!(
            model = %status.model,
            "model not installed; run `ollama pull {}` or set ollama.pull_on_startup",
            status.model
        ),
        Err(e) => warn!(error = %e, "Ollama not ready, continuing; /ready will report it"),
    }

    let chat_service = ChatService::new(
        weather,
        ollama.clone(),
        Arc::new(HtmlRenderer),
        settings.ipma.concurrency,
    )
        .with_system_prompt(config.prompts.forecast.system.clone())
        .with_instruction(config.prompts.forecast.instruction.clone());

    let templates = TemplateStore::load(&settings.server.templates_dir)?;
    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);

    let state = AppState::new(Arc::new(chat_service), ollama, config).with_templates(templates);
    let app = create_router(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    info!("shutting down");
}
