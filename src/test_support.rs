use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::domain::change_history::parse_timestamp;
use crate::domain::models::StatusChangeEvent;

pub fn at(timestamp: &str) -> DateTime<Utc> {
    parse_timestamp(timestamp).expect("test timestamp should parse")
}

pub fn status_event(
    serial: &str,
    timestamp: &str,
    old_status: Option<&str>,
    new_status: Option<&str>,
) -> StatusChangeEvent {
    StatusChangeEvent {
        device_serial: serial.to_string(),
        device_name: Some(format!("{serial} name")),
        timestamp: at(timestamp),
        old_status: old_status.map(str::to_string),
        new_status: new_status.map(str::to_string),
    }
}

pub fn change_record(
    serial: &str,
    name: Option<&str>,
    ts: &str,
    old_status: Option<&str>,
    new_status: Option<&str>,
) -> Value {
    json!({
        "ts": ts,
        "device": { "serial": serial, "name": name },
        "details": {
            "old": status_attributes(old_status),
            "new": status_attributes(new_status),
        }
    })
}

pub fn fixture(path: &str) -> String {
    format!(
        "{}/testdata/replay/{path}",
        env!("CARGO_MANIFEST_DIR").replace("\\", "/")
    )
}

fn status_attributes(status: Option<&str>) -> Value {
    match status {
        Some(status) => json!([{ "name": "status", "value": status }]),
        None => json!([]),
    }
}
