//! Station and variable catalogs: fetching, spatial filtering and identifier resolution.

pub mod error;
pub(crate) mod stations;
pub(crate) mod variables;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Every Agrometeo endpoint wraps its records in `{"data": [...]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Payload<T> {
    pub data: Vec<T>,
}

/// Ids come back as numbers from some endpoints and as numeric strings from others.
pub(crate) fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|id| u32::try_from(id).ok())
            .ok_or_else(|| de::Error::custom(format!("invalid id {n}"))),
        Value::String(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| de::Error::custom(format!("invalid id '{s}'"))),
        other => Err(de::Error::custom(format!("invalid id {other}"))),
    }
}
