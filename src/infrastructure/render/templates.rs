use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use super::escape_html;
use crate::domain::DomainError;

pub const INDEX_TEMPLATE: &str = "index.html";
pub const RESPONSE_TEMPLATE: &str = "response.html";

const BUILTIN_INDEX: &str = include_str!("../../../templates/index.html");
const BUILTIN_RESPONSE: &str = include_str!("../../../templates/response.html");

/// `{{{ raw }}}` or `{{ escaped }}`.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}\}|\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}")
        .expect("placeholder pattern is valid")
});

#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    values: HashMap<&'static str, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    pub fn with_optional(self, key: &'static str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or_default()
    }
}

/// The page templates, read once at startup from the templates directory.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    index: String,
    response: String,
}

impl TemplateStore {
    /// Files missing from `dir` fall back to the copies compiled into the binary.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let dir = dir.as_ref();
        Ok(Self {
            index: read_or_builtin(dir, INDEX_TEMPLATE, BUILTIN_INDEX)?,
            response: read_or_builtin(dir, RESPONSE_TEMPLATE, BUILTIN_RESPONSE)?,
        })
    }

    pub fn builtin() -> Self {
        Self {
            index: BUILTIN_INDEX.to_string(),
            response: BUILTIN_RESPONSE.to_string(),
        }
    }

    pub fn render_index(&self, context: &TemplateContext) -> String {
        render(&self.index, context)
    }

    pub fn render_response(&self, context: &TemplateContext) -> String {
        render(&self.response, context)
    }
}

fn read_or_builtin(dir: &Path, name: &str, builtin: &str) -> Result<String, DomainError> {
    let path = dir.join(name);
    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "template not found, using built-in copy");
            Ok(builtin.to_string())
        }
        Err(e) => Err(DomainError::internal(format!(
            "failed to read template {}: {e}",
            path.display()
        ))),
    }
}

/// Unknown placeholders render as empty strings.
pub fn render(template: &str, context: &TemplateContext) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match (caps.get(1), caps.get(2)) {
            (Some(raw), _) => context.get(raw.as_str()).to_string(),
            (None, Some(escaped)) => escape_html(context.get(escaped.as_str())),
            (None, None) => String::new(),
        })
        .into_owned()
}
