//! Serde helper functions for sushi payloads.
//!
//! The sushi API has stored prices both as JSON numbers and as numeric
//! strings, and optional text fields come back as `""` instead of `null`.
//! These helpers normalize both quirks on the way in.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Deserialize a price given either as a JSON number or a numeric string.
pub fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid price: {s:?}"))),
    }
}

/// Deserialize an optional piece count, accepting numbers, numeric strings,
/// `null` and empty strings.
pub fn deserialize_optional_pieces<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<NumberOrString> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(NumberOrString::Number(n)) if n >= 0.0 && n.fract() == 0.0 => Ok(Some(n as u32)),
        Some(NumberOrString::Number(n)) => Err(serde::de::Error::custom(format!(
            "invalid piece count: {n}"
        ))),
        Some(NumberOrString::String(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::String(s)) => s
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid piece count: {s:?}"))),
    }
}
