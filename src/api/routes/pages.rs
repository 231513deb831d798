use axum::{extract::State, response::Html};

use crate::api::state::AppState;
use crate::infrastructure::render::TemplateContext;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.templates.render_index(&TemplateContext::new()))
}
