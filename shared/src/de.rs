//! Lenient field decoders for form-submitted JSON.
//!
//! Browser forms send numbers either as JSON numbers or as the raw input
//! text, and empty inputs as `""` or `null`. All of those decode here, with
//! blank text mapping to `None`.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn blank_to_none(value: Option<Value>) -> Option<Value> {
    match value {
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::Null) | None => None,
        other => other,
    }
}

pub fn opt_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match blank_to_none(Option::<Value>::deserialize(deserializer)?) {
        None => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected an integer, got {n}"))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected an integer, got {s:?}"))),
        Some(other) => Err(D::Error::custom(format!("expected an integer, got {other}"))),
    }
}

pub fn opt_decimal<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    // Going through the textual form keeps `0.1` as `0.1` rather than the
    // binary expansion of the nearest f64.
    let text = match blank_to_none(Option::<Value>::deserialize(deserializer)?) {
        None => return Ok(None),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => return Err(D::Error::custom(format!("expected a number, got {other}"))),
    };
    BigDecimal::from_str(&text)
        .map(Some)
        .map_err(|_| D::Error::custom(format!("expected a number, got {text:?}")))
}

pub fn opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match blank_to_none(Option::<Value>::deserialize(deserializer)?) {
        None => Ok(None),
        Some(Value::String(s)) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected a YYYY-MM-DD date, got {s:?}"))),
        Some(other) => Err(D::Error::custom(format!("expected a date string, got {other}"))),
    }
}
