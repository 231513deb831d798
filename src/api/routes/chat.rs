use axum::{
    extract::State,
    response::Html,
    Form, Json,
};
use serde::Deserialize;

use crate::api::{error::ApiError, state::AppState};
use crate::application::services::replies;
use crate::application::ChatReply;
use crate::domain::DomainError;
use crate::infrastructure::render::{escape_html, TemplateContext, TemplateStore};

/// Form posted by the page's htmx chat box.
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub mensagem: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Always answers with a response fragment so htmx swaps it in,
/// even when an upstream service failed.
pub async fn chat_form(State(state): State<AppState>, Form(form): Form<ChatForm>) -> Html<String> {
    let reply = match state.chat_service.reply(&form.mensagem).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(error = %e, "Failed to answer chat message");
            ChatReply::text(form.mensagem.trim(), replies::UPSTREAM_FAILURE)
        }
    };

    Html(render_reply(&state.templates, &reply))
}

pub async fn chat_api(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    if request.message.trim().is_empty() {
        return Err(DomainError::validation("message must not be empty").into());
    }

    let reply = state.chat_service.reply(&request.message).await?;
    Ok(Json(reply))
}

fn render_reply(templates: &TemplateStore, reply: &ChatReply) -> String {
    let plots_html: String = reply
        .plots
        .iter()
        .map(|plot| {
            format!(
                "<section class=\"plot\"><h3>{}</h3>{}</section>\n",
                escape_html(&plot.local),
                plot.html
            )
        })
        .collect();

    let context = TemplateContext::new()
        .with("user_message", reply.user_message.as_str())
        .with("reply", reply.reply.as_str())
        .with_optional("chart_html", reply.chart_html.as_deref())
        .with_optional("map_html", reply.map_html.as_deref())
        .with("plots_html", plots_html);

    templates.render_response(&context)
}
