#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tempo_chat::api::{create_router, AppState};
use tempo_chat::application::ChatService;
use tempo_chat::domain::ports::{LlmService, ModelStatus, WeatherProvider};
use tempo_chat::domain::{
    DailyForecast, DomainError, Location, PrecipitationClass, WeatherType,
};
use tempo_chat::infrastructure::{AppConfig, HtmlRenderer};

pub struct FakeWeather {
    pub locations: Vec<Location>,
    pub failing: bool,
    pub forecast_calls: AtomicUsize,
}

impl FakeWeather {
    pub fn new() -> Self {
        Self {
            locations: vec![
                Location::new(1010500, "Aveiro", 40.6413, -8.6535),
                Location::new(1080500, "Faro", 37.0146, -7.9331),
                Location::new(1110600, "Lisboa", 38.766, -9.1286),
            ],
            failing: false,
            forecast_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new()
        }
    }

    pub fn forecast_calls(&self) -> usize {
        self.forecast_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.failing {
            Err(DomainError::external("IPMA returned 503 Service Unavailable"))
        } else {
            Ok(())
        }
    }
}

pub fn forecast_day(day: u32, t_min: &str, t_max: &str, id_weather_type: i32) -> DailyForecast {
    DailyForecast {
        forecast_date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
        t_min: t_min.into(),
        t_max: t_max.into(),
        pred_wind_dir: "NW".into(),
        id_weather_type,
        class_prec_int: Some("0".into()),
        precipitation_prob: Some("5.0".into()),
    }
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn locations(&self) -> Result<Vec<Location>, DomainError> {
        self.check()?;
        Ok(self.locations.clone())
    }

    async fn daily_forecast(&self, _global_id: u32) -> Result<Vec<DailyForecast>, DomainError> {
        self.check()?;
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![
            forecast_day(20, "11.3", "20.7", 1),
            forecast_day(21, "12.0", "22.1", 6),
        ])
    }

    async fn weather_types(&self) -> Result<Vec<WeatherType>, DomainError> {
        self.check()?;
        Ok(vec![
            WeatherType {
                id_weather_type: 1,
                desc_pt: "Céu limpo".into(),
                desc_en: "Clear sky".into(),
            },
            WeatherType {
                id_weather_type: 6,
                desc_pt: "Aguaceiros/chuva".into(),
                desc_en: "Showers/rain".into(),
            },
        ])
    }

    async fn precipitation_classes(&self) -> Result<Vec<PrecipitationClass>, DomainError> {
        self.check()?;
        Ok(vec![PrecipitationClass {
            class_prec_int: "0".into(),
            desc_pt: "Sem precipitação".into(),
        }])
    }
}

/// Records every prompt as `(system, prompt)`.
pub struct FakeLlm {
    pub answer: String,
    pub reachable: bool,
    pub installed: bool,
    pub prompts: Mutex<Vec<(Option<String>, String)>>,
}

impl FakeLlm {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            reachable: true,
            installed: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<(Option<String>, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for FakeLlm {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        self.prompts.lock().unwrap().push((None, prompt.to_string()));
        Ok(self.answer.clone())
    }

    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, DomainError> {
        self.prompts
            .lock()
            .unwrap()
            .push((Some(system.to_string()), prompt.to_string()));
        Ok(self.answer.clone())
    }

    async fn health(&self) -> Result<ModelStatus, DomainError> {
        if !self.reachable {
            return Err(DomainError::external("Ollama unreachable"));
        }
        Ok(ModelStatus {
            model: "mistral:latest".into(),
            installed: self.installed,
        })
    }
}

pub fn chat_service(weather: Arc<FakeWeather>, llm: Arc<FakeLlm>) -> ChatService {
    ChatService::new(weather, llm, Arc::new(HtmlRenderer), 4)
}

pub fn router(weather: Arc<FakeWeather>, llm: Arc<FakeLlm>) -> axum::Router {
    let service = chat_service(weather, llm.clone());
    let state = AppState::new(Arc::new(service), llm, AppConfig::default());
    create_router(state)
}
