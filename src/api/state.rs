use std::sync::Arc;

use crate::application::ChatService;
use crate::domain::ports::LlmService;
use crate::infrastructure::{AppConfig, TemplateStore};

#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ChatService>,
    pub llm: Arc<dyn LlmService>,
    pub templates: Arc<TemplateStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        chat_service: Arc<ChatService>,
        llm: Arc<dyn LlmService>,
        config: AppConfig,
    ) -> Self {
        Self {
            chat_service,
            llm,
            templates: Arc::new(TemplateStore::builtin()),
            config: Arc::new(config),
        }
    }

    pub fn with_templates(mut self, templates: TemplateStore) -> Self {
        self.templates = Arc::new(templates);
        self
    }
}
