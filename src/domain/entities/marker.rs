/// A point on a map with the text shown in its popup.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub popup: String,
}

impl MapMarker {
    pub fn new(latitude: f64, longitude: f64, popup: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            popup: popup.into(),
        }
    }
}
