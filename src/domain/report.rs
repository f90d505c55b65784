use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domain::models::OutageInterval;

pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutageRow {
    pub name: String,
    pub serial: String,
    pub offline_start: String,
    pub offline_end: String,
    pub duration_of_outage: String,
}

impl From<&OutageInterval> for OutageRow {
    fn from(interval: &OutageInterval) -> Self {
        Self {
            name: interval.device_name.clone().unwrap_or_default(),
            serial: interval.device_serial.clone(),
            offline_start: format_timestamp(interval.start),
            offline_end: format_timestamp(interval.end),
            duration_of_outage: format_duration(interval.duration),
        }
    }
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(REPORT_TIMESTAMP_FORMAT).to_string()
}

pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{hours} hours, {minutes} minutes, {seconds} seconds")
}
