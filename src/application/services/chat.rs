use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

use super::{ForecastService, IntentParser};
use crate::domain::{
    ports::{ForecastRenderer, LlmService, WeatherProvider},
    DaySummary, DomainError, MapMarker,
};

/// Closing line of the forecast prompt unless configured otherwise.
pub const DEFAULT_INSTRUCTION: &str = "Responde em português europeu, de forma simpática.";

pub mod replies {
    pub const EMPTY_MESSAGE: &str = "Desculpa, não recebi nenhuma mensagem. Podes tentar novamente?";
    pub const NOT_UNDERSTOOD: &str =
        "Desculpa, não consegui processar o teu pedido. Podes reformular indicando cidade e o que pretendes?";
    pub const ALL_LOCATIONS: &str = "Mapa e gráficos de todas as cidades:";
    pub const UPSTREAM_FAILURE: &str =
        "Desculpa, ocorreu um erro ao obter a previsão. Tenta novamente mais tarde.";

    pub fn unknown_city(city: &str) -> String {
        format!("Não encontrei '{city}'. Podes confirmar o nome?")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CityPlot {
    pub local: String,
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub user_message: String,
    pub reply: String,
    pub chart_html: Option<String>,
    pub map_html: Option<String>,
    pub plots: Vec<CityPlot>,
    pub generated_at: DateTime<Utc>,
}

impl ChatReply {
    pub fn text(user_message: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            reply: reply.into(),
            chart_html: None,
            map_html: None,
            plots: Vec::new(),
            generated_at: Utc::now(),
        }
    }
}

pub struct ChatService {
    weather: Arc<dyn WeatherProvider>,
    llm: Arc<dyn LlmService>,
    renderer: Arc<dyn ForecastRenderer>,
    intents: IntentParser,
    forecasts: ForecastService,
    system_prompt: String,
    instruction: String,
}

impl ChatService {
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        llm: Arc<dyn LlmService>,
        renderer: Arc<dyn ForecastRenderer>,
        concurrency: usize,
    ) -> Self {
        Self {
            intents: IntentParser::new(weather.clone()),
            forecasts: ForecastService::new(weather.clone(), concurrency),
            weather,
            llm,
            renderer,
            system_prompt: String::new(),
            instruction: DEFAULT_INSTRUCTION.to_string(),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    #[instrument(skip(self))]
    pub async fn reply(&self, message: &str) -> Result<ChatReply, DomainError> {
        let text = message.trim();
        if text.is_empty() {
            return Ok(ChatReply::text(text, replies::EMPTY_MESSAGE));
        }

        let intent = self.intents.parse(text).await?;
        info!(?intent, "parsed message");

        if intent.all_locations {
            return self.all_locations(text, intent.include_chart).await;
        }

        let city = match intent.city.as_deref() {
            Some(city) if intent.wants_forecast => city,
            _ => return Ok(ChatReply::text(text, replies::NOT_UNDERSTOOD)),
        };

        let locations = self.weather.locations().await?;
        let Some(location) = locations.iter().find(|l| l.matches_name(city)) else {
            return Ok(ChatReply::text(text, replies::unknown_city(city)));
        };

        let bundle = self.forecasts.gather(location.global_id_local).await?;
        let today = ForecastService::today(&bundle)?;

        let prompt = build_prompt(&location.local, &today, &self.instruction);
        let answer = if self.system_prompt.trim().is_empty() {
            self.llm.complete(&prompt).await?
        } else {
            self.llm
                .complete_with_system(&self.system_prompt, &prompt)
                .await?
        };

        let mut reply = ChatReply::text(text, answer.trim());
        if intent.include_chart {
            reply.chart_html = Some(self.renderer.temperature_chart(&bundle.days));
        }
        if intent.show_map {
            reply.map_html = Some(self.renderer.location_map(&MapMarker::new(
                location.latitude,
                location.longitude,
                today.popup_text(),
            )));
        }
        Ok(reply)
    }

    async fn all_locations(&self, text: &str, include_chart: bool) -> Result<ChatReply, DomainError> {
        let locations = self.weather.locations().await?;
        let overview = self.forecasts.overview(&locations).await?;

        let markers: Vec<MapMarker> = overview
            .iter()
            .map(|f| {
                let today = &f.today;
                MapMarker::new(
                    f.location.latitude,
                    f.location.longitude,
                    format!(
                        "{} — {} {} {}°C–{}°C",
                        f.location.local, today.emoji, today.weather, today.temp_min, today.temp_max
                    ),
                )
            })
            .collect();

        let mut reply = ChatReply::text(text, replies::ALL_LOCATIONS);
        reply.map_html = Some(self.renderer.overview_map(&markers));
        if include_chart {
            reply.plots = overview
                .iter()
                .map(|f| CityPlot {
                    local: f.location.local.clone(),
                    html: self.renderer.temperature_chart(&f.days),
                })
                .collect();
        }
        Ok(reply)
    }
}

/// Prompt asking the model to phrase today's forecast for `city`.
pub fn build_prompt(city: &str, today: &DaySummary, instruction: &str) -> String {
    format!(
        "Cidade: {city}\n\
         Data: {date}\n\
         Tempo: {weather} {emoji}\n\
         Tª min: {min}°C\n\
         Tª max: {max}°C\n\
         Vento: {wind}\n\
         Precipitação: {precipitation}\n\
         Prob.: {prob}%\n\n\
         {instruction}",
        date = today.date,
        weather = today.weather,
        emoji = today.emoji,
        min = today.temp_min,
        max = today.temp_max,
        wind = today.wind,
        precipitation = today.precipitation,
        prob = today.precipitation_prob,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_build_prompt() {
        let today = DaySummary {
            date: NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
            temp_min: "11.3".into(),
            temp_max: "20.7".into(),
            wind: "NW".into(),
            weather: "Céu limpo".into(),
            precipitation: "Sem dados".into(),
            precipitation_prob: "0.0".into(),
            emoji: "☀️".into(),
        };

        let prompt = build_prompt("Aveiro", &today, "Responde em português europeu.");
        assert_eq!(
            prompt,
            "Cidade: Aveiro\n\
             Data: 2024-05-20\n\
             Tempo: Céu limpo ☀️\n\
             Tª min: 11.3°C\n\
             Tª max: 20.7°C\n\
             Vento: NW\n\
             Precipitação: Sem dados\n\
             Prob.: 0.0%\n\n\
             Responde em português europeu."
        );
    }

    #[test]
    fn test_unknown_city_reply() {
        assert_eq!(
            replies::unknown_city("Atlântida"),
            "Não encontrei 'Atlântida'. Podes confirmar o nome?"
        );
    }
}
