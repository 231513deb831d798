use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lenient;

/// One day of `/forecast/meteorology/cities/daily/{globalIdLocal}.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    #[serde(rename = "forecastDate")]
    pub forecast_date: NaiveDate,
    #[serde(rename = "tMin", deserialize_with = "lenient::string")]
    pub t_min: String,
    #[serde(rename = "tMax", deserialize_with = "lenient::string")]
    pub t_max: String,
    #[serde(rename = "predWindDir", default)]
    pub pred_wind_dir: String,
    #[serde(rename = "idWeatherType")]
    pub id_weather_type: i32,
    #[serde(
        rename = "classPrecInt",
        default,
        deserialize_with = "lenient::option_string"
    )]
    pub class_prec_int: Option<String>,
    #[serde(
        rename = "precipitaProb",
        alias = "precitaProb",
        default,
        deserialize_with = "lenient::option_string"
    )]
    pub precipitation_prob: Option<String>,
}

impl DailyForecast {
    pub fn t_min_celsius(&self) -> Option<f64> {
        self.t_min.trim().parse().ok()
    }

    pub fn t_max_celsius(&self) -> Option<f64> {
        self.t_max.trim().parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherType {
    #[serde(rename = "idWeatherType")]
    pub id_weather_type: i32,
    #[serde(rename = "descWeatherTypePT")]
    pub desc_pt: String,
    #[serde(rename = "descWeatherTypeEN", default)]
    pub desc_en: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationClass {
    #[serde(rename = "classPrecInt", deserialize_with = "lenient::string")]
    pub class_prec_int: String,
    #[serde(rename = "descClassPrecIntPT")]
    pub desc_pt: String,
}

/// Everything needed to describe a location's forecast.
#[derive(Debug, Clone, Default)]
pub struct ForecastBundle {
    pub days: Vec<DailyForecast>,
    pub weather_types: Vec<WeatherType>,
    pub precipitation_classes: Vec<PrecipitationClass>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_daily_forecast() {
        let json = r#"{
            "precipitaProb": "12.0",
            "tMin": "11.3",
            "tMax": "20.7",
            "predWindDir": "NW",
            "idWeatherType": 2,
            "classWindSpeed": 2,
            "longitude": "-8.6535",
            "forecastDate": "2024-05-20",
            "classPrecInt": 1,
            "latitude": "40.6413"
        }"#;

        let day: DailyForecast = serde_json::from_str(json).unwrap();
        assert_eq!(day.forecast_date, NaiveDate::from_ymd_opt(2024, 5, 20).unwrap());
        assert_eq!(day.t_min, "11.3");
        assert_eq!(day.t_max_celsius(), Some(20.7));
        assert_eq!(day.class_prec_int.as_deref(), Some("1"));
        assert_eq!(day.precipitation_prob.as_deref(), Some("12.0"));
    }

    #[test]
    fn test_legacy_probability_key_and_missing_class() {
        let json = r#"{
            "precitaProb": "40.0",
            "tMin": 9,
            "tMax": 15,
            "predWindDir": "S",
            "idWeatherType": 9,
            "forecastDate": "2024-05-21"
        }"#;

        let day: DailyForecast = serde_json::from_str(json).unwrap();
        assert_eq!(day.t_min, "9");
        assert_eq!(day.class_prec_int, None);
        assert_eq!(day.precipitation_prob.as_deref(), Some("40.0"));
    }

    #[test]
    fn test_precipitation_class_accepts_string_code() {
        let json = r#"{"descClassPrecIntEN":"Weak","descClassPrecIntPT":"Fraco","classPrecInt":"1"}"#;
        let class: PrecipitationClass = serde_json::from_str(json).unwrap();
        assert_eq!(class.class_prec_int, "1");
        assert_eq!(class.desc_pt, "Fraco");
    }
}
