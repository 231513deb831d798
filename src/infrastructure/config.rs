use regex::{Captures, Regex};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use crate::application::DEFAULT_INSTRUCTION;

pub const DEFAULT_CONFIG_PATH: &str = "app/config.yaml";
pub const DEFAULT_PROMPTS_PATH: &str = "app/prompts.yaml";

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("env var pattern is valid")
});

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub ipma: IpmaConfig,
    pub ollama: OllamaConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub templates_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            templates_dir: PathBuf::from("templates"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IpmaConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub cache_ttl_seconds: u64,
    pub retries: usize,
    /// Forecast requests in flight when summarizing every location.
    pub concurrency: usize,
}

impl IpmaConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

impl Default for IpmaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.ipma.pt/open-data".to_string(),
            timeout_seconds: 10,
            cache_ttl_seconds: 3600,
            retries: 3,
            concurrency: 8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
    pub pull_on_startup: bool,
    pub startup_retries: usize,
}

impl OllamaConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "mistral:latest".to_string(),
            timeout_seconds: 120,
            pull_on_startup: false,
            startup_retries: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub forecast: ForecastPrompts,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastPrompts {
    pub system: String,
    pub instruction: String,
}

impl Default for ForecastPrompts {
    fn default() -> Self {
        Self {
            system: String::new(),
            instruction: DEFAULT_INSTRUCTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub config: Config,
    pub prompts: PromptsConfig,
}

impl AppConfig {
    /// Loads `APP_CONFIG` and `APP_PROMPTS` (or the defaults under `app/`),
    /// then applies environment overrides. Missing files fall back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("APP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let prompts_path =
            std::env::var("APP_PROMPTS").unwrap_or_else(|_| DEFAULT_PROMPTS_PATH.to_string());

        let mut app_config = Self::from_files(config_path, prompts_path)?;
        app_config.apply_overrides(|key| std::env::var(key).ok())?;
        app_config.validate()?;
        Ok(app_config)
    }

    pub fn from_files(
        config_path: impl AsRef<Path>,
        prompts_path: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        let config = match read_optional(config_path.as_ref())? {
            Some(content) => Self::parse_config(&content)?,
            None => {
                tracing::warn!(path = %config_path.as_ref().display(), "config file not found, using defaults");
                Config::default()
            }
        };
        let prompts = match read_optional(prompts_path.as_ref())? {
            Some(content) => Self::parse_prompts(&content)?,
            None => PromptsConfig::default(),
        };
        Ok(Self { config, prompts })
    }

    pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
        let content = substitute_env_vars(content, |key| std::env::var(key).ok());
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn parse_prompts(content: &str) -> Result<PromptsConfig, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = &mut self.config;
        if let Some(host) = lookup("SERVER_HOST") {
            config.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::Invalid {
                field: "SERVER_PORT",
                reason: format!("not a port number: {port}"),
            })?;
        }
        if let Some(dir) = lookup("TEMPLATES_DIR") {
            config.server.templates_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("IPMA_BASE_URL") {
            config.ipma.base_url = url;
        }
        if let Some(url) = lookup("OLLAMA_BASE_URL") {
            config.ollama.base_url = url;
        }
        if let Some(model) = lookup("OLLAMA_MODEL") {
            config.ollama.model = model;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, url) in [
            ("ipma.base_url", &self.config.ipma.base_url),
            ("ollama.base_url", &self.config.ollama.base_url),
        ] {
            reqwest::Url::parse(url).map_err(|e| ConfigError::Invalid {
                field,
                reason: e.to_string(),
            })?;
        }
        if self.config.ollama.model.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "ollama.model",
                reason: "must not be empty".to_string(),
            });
        }
        if self.config.ipma.concurrency == 0 {
            return Err(ConfigError::Invalid {
                field: "ipma.concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Replaces `${VAR}` and `${VAR:-default}`. Unset variables without a
/// default are left untouched.
pub fn substitute_env_vars<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_VAR
        .replace_all(content, |caps: &Captures| {
            lookup(&caps[1])
                .or_else(|| caps.get(2).map(|d| d.as_str().to_string()))
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
