use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::models::StatusChangeEvent;

const STATUS_ATTRIBUTE: &str = "status";
const OFFSETLESS_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("record does not match the change history shape: {0}")]
    InvalidRecord(#[source] serde_json::Error),
    #[error("missing required field: ts")]
    MissingTimestamp,
    #[error("unparseable timestamp: {raw}")]
    InvalidTimestamp { raw: String },
    #[error("missing required field: device.serial")]
    MissingSerial,
}

#[derive(Debug, Deserialize)]
struct RawChangeRecord {
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    device: Option<RawDevice>,
    #[serde(default)]
    details: Option<RawDetails>,
}

#[derive(Debug, Deserialize)]
struct RawDevice {
    #[serde(default)]
    serial: Value,
    #[serde(default)]
    name: Value,
}

#[derive(Debug, Deserialize)]
struct RawDetails {
    #[serde(default)]
    old: Option<Vec<Value>>,
    #[serde(default)]
    new: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedBatch {
    pub events: Vec<StatusChangeEvent>,
    pub rejected: usize,
}

// Entries are `{ "name": ..., "value": ... }` but nothing else about them is trusted.
pub fn find_attribute<'a>(attributes: &'a [Value], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|attribute| attribute.get("name").and_then(Value::as_str) == Some(name))
        .and_then(|attribute| attribute.get("value"))
        .and_then(Value::as_str)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, NormalizeError> {
    let trimmed = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(trimmed, OFFSETLESS_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| NormalizeError::InvalidTimestamp {
            raw: raw.to_string(),
        })
}

pub fn normalize_record(record: &Value) -> Result<StatusChangeEvent, NormalizeError> {
    let raw: RawChangeRecord =
        RawChangeRecord::deserialize(record).map_err(NormalizeError::InvalidRecord)?;

    let timestamp = raw
        .ts
        .as_deref()
        .ok_or(NormalizeError::MissingTimestamp)
        .and_then(parse_timestamp)?;

    let device = raw.device;
    let device_serial = device
        .as_ref()
        .and_then(|device| non_empty(device.serial.as_str()))
        .ok_or(NormalizeError::MissingSerial)?;
    let device_name = device.as_ref().and_then(|device| non_empty(device.name.as_str()));

    let (old, new) = match raw.details {
        Some(details) => (
            details.old.unwrap_or_default(),
            details.new.unwrap_or_default(),
        ),
        None => (Vec::new(), Vec::new()),
    };

    Ok(StatusChangeEvent {
        device_serial,
        device_name,
        timestamp,
        old_status: find_attribute(&old, STATUS_ATTRIBUTE).map(str::to_string),
        new_status: find_attribute(&new, STATUS_ATTRIBUTE).map(str::to_string),
    })
}

pub fn normalize_batch(records: &[Value]) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();

    for (index, record) in records.iter().enumerate() {
        match normalize_record(record) {
            Ok(event) => batch.events.push(event),
            Err(error) => {
                batch.rejected += 1;
                tracing::warn!(record_index = index, error = %error, "skipping change history record");
            }
        }
    }

    batch
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
