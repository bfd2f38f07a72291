//! Lenient serde deserializers for Rap2 payloads
//!
//! Rap2 stores booleans as MySQL `TINYINT(1)` columns and some deployments
//! hand out numeric ids as strings, so the same field can arrive in more than
//! one JSON shape depending on the server version.

use serde::{Deserialize, Deserializer, de};

/// Deserialize an optional boolean sent as `true`/`false`, `0`/`1` or a
/// string spelling of either.
///
/// Any non-zero integer is `true`. Strings other than `"true"`, `"false"`,
/// `"1"` and `"0"` (case-insensitive, trimmed) are rejected.
pub fn deserialize_flexible_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Str(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Bool(b)) => Ok(Some(b)),
        Some(Raw::Int(i)) => Ok(Some(i != 0)),
        Some(Raw::Str(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(de::Error::custom(format!("invalid boolean string: {s}"))),
        },
    }
}

/// Deserialize an optional numeric id sent either as a JSON number or as a
/// decimal string. An empty string reads as `None`.
pub fn deserialize_flexible_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Str(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(i)) => Ok(Some(i)),
        Some(Raw::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Str(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid id: {s}"))),
    }
}
