//! IPMA mixes JSON strings and numbers for the same fields across endpoints
//! ("latitude": "40.6413", "classPrecInt": 2 vs "classPrecInt": "2").
//! These helpers accept either form.

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Int(i64),
    Float(f64),
    Str(String),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Str(v) => v,
        }
    }
}

pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(StringOrNumber::into_string)
}

pub fn option_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(StringOrNumber::into_string))
}

pub fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Int(v) => Ok(v as f64),
        StringOrNumber::Float(v) => Ok(v),
        StringOrNumber::Str(v) => v
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid number: {v}"))),
    }
}
