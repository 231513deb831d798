use std::fmt::Write;
use uuid::Uuid;

use super::html::script_json;
use crate::domain::MapMarker;

const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Mainland Portugal, wide enough for the islands' markers to be panned to.
const PORTUGAL_CENTER: (f64, f64) = (39.5, -8.0);
const PORTUGAL_ZOOM: u8 = 7;
const CITY_ZOOM: u8 = 10;

/// Leaflet map centred on one location with its popup opened.
pub fn single_marker(marker: &MapMarker) -> String {
    leaflet_map(
        300,
        (marker.latitude, marker.longitude),
        CITY_ZOOM,
        std::slice::from_ref(marker),
        true,
    )
}

/// Leaflet map of Portugal with one marker per location.
pub fn all_locations(markers: &[MapMarker]) -> String {
    leaflet_map(500, PORTUGAL_CENTER, PORTUGAL_ZOOM, markers, false)
}

fn leaflet_map(
    height_px: u32,
    center: (f64, f64),
    zoom: u8,
    markers: &[MapMarker],
    open_popup: bool,
) -> String {
    let id = format!("map-{}", Uuid::new_v4().simple());
    let mut script = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(
        script,
        "    var map = L.map({}).setView([{}, {}], {});",
        script_json(&id),
        center.0,
        center.1,
        zoom
    );
    let _ = writeln!(
        script,
        "    L.tileLayer({}, {{ attribution: {} }}).addTo(map);",
        script_json(TILE_URL),
        script_json(TILE_ATTRIBUTION)
    );
    for marker in markers {
        let _ = writeln!(
            script,
            "    L.marker([{}, {}]).addTo(map).bindPopup({}){};",
            marker.latitude,
            marker.longitude,
            script_json(&marker.popup),
            if open_popup { ".openPopup()" } else { "" }
        );
    }

    format!(
        r#"<div id="{id}" class="map" style="height:{height_px}px;"></div>
<script>
  (function() {{
{script}  }})();
</script>
"#
    )
}
