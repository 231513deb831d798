use serde::{Deserialize, Serialize};

use super::lenient;

/// A district capital or island location from `distrits-islands.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "globalIdLocal")]
    pub global_id_local: u32,
    pub local: String,
    #[serde(deserialize_with = "lenient::float")]
    pub latitude: f64,
    #[serde(deserialize_with = "lenient::float")]
    pub longitude: f64,
    #[serde(rename = "idDistrito", default)]
    pub id_district: Option<u32>,
    #[serde(rename = "idRegiao", default)]
    pub id_region: Option<u32>,
}

impl Location {
    pub fn new(global_id_local: u32, local: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            global_id_local,
            local: local.into(),
            latitude,
            longitude,
            id_district: None,
            id_region: None,
        }
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.local.to_lowercase() == name.to_lowercase()
    }
}
