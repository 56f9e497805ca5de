//! Permissive decoders for backend documents and query parameters.
//!
//! Each decoder accepts any JSON value. Values it cannot use decode to
//! `None` (or the field default) instead of failing the whole document.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::raw::PartyRef;
use crate::{Priority, SortBy, SortOrder, StatusCategory};

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Read a string, stringifying numbers.
pub fn as_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a finite number from a JSON number or a numeric string.
pub fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Read a timestamp from a date string or an epoch in milliseconds.
pub fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

/// Parse RFC 3339, naive `YYYY-MM-DD[T ]HH:MM:SS[.fff]` (UTC) or `YYYY-MM-DD`.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(crate) fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_string(Value::deserialize(deserializer)?))
}

pub(crate) fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_number(&Value::deserialize(deserializer)?))
}

pub(crate) fn count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_number(&value)
        .filter(|n| *n >= 0.0)
        .map(|n| n.round() as u32))
}

pub(crate) fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_timestamp(&Value::deserialize(deserializer)?))
}

/// Decode a nested document; anything that is not an object is absent.
pub(crate) fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

pub(crate) fn party<'de, D>(deserializer: D) -> Result<Option<PartyRef>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).ok().map(PartyRef::Embedded),
        other => as_string(other).map(PartyRef::Id),
    })
}

pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_string(Value::deserialize(deserializer)?).unwrap_or_default())
}

pub(crate) fn status_filter<'de, D>(deserializer: D) -> Result<Option<StatusCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_string(Value::deserialize(deserializer)?)
        .and_then(|s| StatusCategory::parse_filter(&s).ok().flatten()))
}

pub(crate) fn priority_filter<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_string(Value::deserialize(deserializer)?).and_then(|s| Priority::from_str(&s).ok()))
}

pub(crate) fn sort_by<'de, D>(deserializer: D) -> Result<SortBy, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_string(Value::deserialize(deserializer)?)
        .and_then(|s| SortBy::from_str(&s).ok())
        .unwrap_or_default())
}

pub(crate) fn sort_order<'de, D>(deserializer: D) -> Result<SortOrder, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_string(Value::deserialize(deserializer)?)
        .and_then(|s| SortOrder::from_str(&s).ok())
        .unwrap_or_default())
}

/// Page numbers and sizes; anything below 1 decodes to 0 for the engine to coerce.
pub(crate) fn page<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_number(&value)
        .filter(|n| *n >= 1.0)
        .map(|n| n as usize)
        .unwrap_or(0))
}
