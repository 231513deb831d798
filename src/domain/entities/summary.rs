use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DailyForecast, PrecipitationClass, WeatherType};

const UNKNOWN_WEATHER: &str = "Desconhecido";
const NO_PRECIPITATION_DATA: &str = "Sem dados";

/// A single forecast day resolved against the IPMA reference tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub temp_min: String,
    pub temp_max: String,
    pub wind: String,
    pub weather: String,
    pub precipitation: String,
    pub precipitation_prob: String,
    pub emoji: String,
}

impl DaySummary {
    pub fn from_forecast(
        day: &DailyForecast,
        weather_types: &[WeatherType],
        precipitation_classes: &[PrecipitationClass],
    ) -> Self {
        let weather = weather_types
            .iter()
            .find(|w| w.id_weather_type == day.id_weather_type)
            .map(|w| w.desc_pt.clone())
            .unwrap_or_else(|| UNKNOWN_WEATHER.to_string());

        let precipitation = day
            .class_prec_int
            .as_deref()
            .and_then(|class| {
                precipitation_classes
                    .iter()
                    .find(|p| p.class_prec_int == class)
            })
            .map(|p| p.desc_pt.clone())
            .unwrap_or_else(|| NO_PRECIPITATION_DATA.to_string());

        let emoji = weather_emoji(&weather).unwrap_or_default().to_string();

        Self {
            date: day.forecast_date,
            temp_min: day.t_min.clone(),
            temp_max: day.t_max.clone(),
            wind: day.pred_wind_dir.clone(),
            weather,
            precipitation,
            precipitation_prob: day
                .precipitation_prob
                .clone()
                .unwrap_or_else(|| "0".to_string()),
            emoji,
        }
    }

    pub fn popup_text(&self) -> String {
        format!(
            "{} {}, {}°C–{}°C",
            self.emoji, self.weather, self.temp_min, self.temp_max
        )
    }
}

/// Emoji for an IPMA Portuguese weather description.
pub fn weather_emoji(desc_pt: &str) -> Option<&'static str> {
    let emoji = match desc_pt {
        "Céu limpo" => "☀️",
        "Céu pouco nublado" | "Céu parcialmente nublado" => "⛅",
        "Céu muito nublado ou encoberto"
        | "Céu nublado por nuvens altas"
        | "Céu com períodos de muito nublado"
        | "Céu nublado"
        | "Nebulosidade convectiva" => "☁️",
        "Aguaceiros/chuva" | "Chuva/aguaceiros" | "Períodos de chuva" => "🌧️",
        "Aguaceiros/chuva fracos"
        | "Chuva fraca ou chuvisco"
        | "Períodos de chuva fraca"
        | "Chuvisco" => "🌦️",
        "Aguaceiros/chuva fortes"
        | "Chuva/aguaceiros forte"
        | "Períodos de chuva forte"
        | "Trovoada"
        | "Aguaceiros e possibilidade de trovoada"
        | "Chuva e possibilidade de trovoada" => "⛈️",
        "Neblina" | "Nevoeiro ou nuvens baixas" | "Nevoeiro" => "🌫️",
        "Neve" => "❄️",
        "Aguaceiros de neve" | "Chuva e Neve" | "Granizo" => "🌨️",
        "Geada" => "🧊",
        _ => return None,
    };
    Some(emoji)
}
