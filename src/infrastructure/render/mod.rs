//! HTML fragments returned to the browser: Plotly charts, Leaflet maps and
//! the page templates.

pub mod charts;
mod html;
pub mod maps;
pub mod templates;

pub use html::escape_html;
pub use templates::{TemplateContext, TemplateStore};

use crate::domain::{ports::ForecastRenderer, DailyForecast, MapMarker};

/// Plotly charts and Leaflet maps, both loaded from CDNs by the page.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl ForecastRenderer for HtmlRenderer {
    fn temperature_chart(&self, days: &[DailyForecast]) -> String {
        charts::temperature_chart(days)
    }

    fn location_map(&self, marker: &MapMarker) -> String {
        maps::single_marker(marker)
    }

    fn overview_map(&self, markers: &[MapMarker]) -> String {
        maps::all_locations(markers)
    }
}
