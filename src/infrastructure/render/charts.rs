use serde_json::json;
use uuid::Uuid;

use super::html::script_json;
use crate::domain::DailyForecast;

/// Plotly line chart of the daily minimum and maximum temperatures.
/// Expects Plotly to be loaded by the page.
pub fn temperature_chart(days: &[DailyForecast]) -> String {
    let id = format!("chart-{}", Uuid::new_v4().simple());
    let dates: Vec<String> = days.iter().map(|d| d.forecast_date.to_string()).collect();
    let t_min: Vec<Option<f64>> = days.iter().map(DailyForecast::t_min_celsius).collect();
    let t_max: Vec<Option<f64>> = days.iter().map(DailyForecast::t_max_celsius).collect();

    let data = json!([
        { "x": dates, "y": t_min, "name": "T. Mínima", "mode": "lines+markers", "type": "scatter" },
        { "x": dates, "y": t_max, "name": "T. Máxima", "mode": "lines+markers", "type": "scatter" },
    ]);
    let layout = json!({
        "title": { "text": "Previsão de Temperatura" },
        "xaxis": { "title": { "text": "Data" } },
        "yaxis": { "title": { "text": "°C" } },
    });

    format!(
        r#"<div id="{id}" class="chart"></div>
<script>
  Plotly.newPlot({target}, {data}, {layout}, {{"responsive": true}});
</script>
"#,
        target = script_json(&id),
        data = script_json(&data),
        layout = script_json(&layout),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(date: u32, t_min: &str, t_max: &str) -> DailyForecast {
        DailyForecast {
            forecast_date: NaiveDate::from_ymd_opt(2024, 5, date).unwrap(),
            t_min: t_min.into(),
            t_max: t_max.into(),
            pred_wind_dir: "N".into(),
            id_weather_type: 1,
            class_prec_int: None,
            precipitation_prob: None,
        }
    }

    #[test]
    fn test_chart_contains_both_series() {
        let html = temperature_chart(&[day(20, "11.3", "20.7"), day(21, "12", "22.1")]);

        assert!(html.contains("Plotly.newPlot"));
        assert!(html.contains("T. Mínima"));
        assert!(html.contains("T. Máxima"));
        assert!(html.contains("Previsão de Temperatura"));
        assert!(html.contains(r#""2024-05-21""#));
        assert!(html.contains("[11.3,12.0]"));
        assert!(html.contains("[20.7,22.1]"));
    }

    #[test]
    fn test_chart_ids_are_unique() {
        let a = temperature_chart(&[]);
        let b = temperature_chart(&[]);
        assert_ne!(a, b);
    }
}
