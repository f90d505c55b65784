use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

pub const STATUS_ONLINE: &str = "online";
pub const STATUS_OFFLINE: &str = "offline";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChangeEvent {
    pub device_serial: String,
    pub device_name: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub old_status: Option<String>,
    pub new_status: Option<String>,
}

impl StatusChangeEvent {
    pub fn went_offline(&self) -> bool {
        self.transition_is(STATUS_ONLINE, STATUS_OFFLINE)
    }

    pub fn came_online(&self) -> bool {
        self.transition_is(STATUS_OFFLINE, STATUS_ONLINE)
    }

    fn transition_is(&self, from: &str, to: &str) -> bool {
        self.old_status.as_deref() == Some(from) && self.new_status.as_deref() == Some(to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutageInterval {
    pub device_name: Option<String>,
    pub device_serial: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration: Duration,
}

impl OutageInterval {
    pub fn new(
        device_name: Option<String>,
        device_serial: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            device_name,
            device_serial,
            start,
            end,
            duration: end - start,
        }
    }
}
