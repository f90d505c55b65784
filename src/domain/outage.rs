use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::models::{OutageInterval, StatusChangeEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutageTransition {
    Opened {
        offline_at: DateTime<Utc>,
    },
    Closed {
        offline_at: DateTime<Utc>,
        online_at: DateTime<Utc>,
    },
}

// A second online->offline before the matching online replaces the pending start.
#[derive(Debug, Clone, Default)]
pub struct OutageTracker {
    pending_offline_start: Option<DateTime<Utc>>,
}

impl OutageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, event: &StatusChangeEvent) -> Option<OutageTransition> {
        if event.went_offline() {
            if let Some(discarded) = self.pending_offline_start.replace(event.timestamp) {
                tracing::debug!(
                    serial = %event.device_serial,
                    discarded_start = %discarded,
                    offline_at = %event.timestamp,
                    "replacing unresolved offline start"
                );
            }
            return Some(OutageTransition::Opened {
                offline_at: event.timestamp,
            });
        }

        if event.came_online()
            && let Some(offline_at) = self.pending_offline_start.take()
        {
            if event.timestamp <= offline_at {
                tracing::debug!(
                    serial = %event.device_serial,
                    offline_at = %offline_at,
                    online_at = %event.timestamp,
                    "dropping zero-length outage"
                );
                return None;
            }

            return Some(OutageTransition::Closed {
                offline_at,
                online_at: event.timestamp,
            });
        }

        None
    }

    pub fn pending_offline_start(&self) -> Option<DateTime<Utc>> {
        self.pending_offline_start
    }
}

struct DeviceEvents<'a> {
    serial: &'a str,
    name: Option<&'a str>,
    events: Vec<&'a StatusChangeEvent>,
}

pub fn reconstruct_outages(events: &[StatusChangeEvent]) -> Vec<OutageInterval> {
    let devices = partition_by_device(events);
    let mut intervals = Vec::new();

    for mut device in devices {
        device.events.sort_by_key(|event| event.timestamp);

        let mut tracker = OutageTracker::new();
        let before = intervals.len();

        for event in &device.events {
            if let Some(OutageTransition::Closed {
                offline_at,
                online_at,
            }) = tracker.observe(event)
            {
                intervals.push(OutageInterval::new(
                    device.name.map(str::to_string),
                    device.serial.to_string(),
                    offline_at,
                    online_at,
                ));
            }
        }

        if let Some(open_since) = tracker.pending_offline_start() {
            tracing::debug!(
                serial = device.serial,
                open_since = %open_since,
                "device still offline at end of window; outage not reported"
            );
        }

        tracing::debug!(
            serial = device.serial,
            events = device.events.len(),
            outages = intervals.len() - before,
            "device events analyzed"
        );
    }

    intervals
}

fn partition_by_device(events: &[StatusChangeEvent]) -> Vec<DeviceEvents<'_>> {
    let mut index_by_serial: HashMap<&str, usize> = HashMap::new();
    let mut devices: Vec<DeviceEvents<'_>> = Vec::new();

    for event in events {
        let serial = event.device_serial.as_str();
        let index = *index_by_serial.entry(serial).or_insert_with(|| {
            devices.push(DeviceEvents {
                serial,
                name: None,
                events: Vec::new(),
            });
            devices.len() - 1
        });

        let device = &mut devices[index];
        if device.name.is_none() {
            device.name = event.device_name.as_deref();
        }
        device.events.push(event);
    }

    devices
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{OutageTracker, OutageTransition, reconstruct_outages};
    use crate::test_support::{at, status_event};

    #[test]
    fn pairs_offline_with_following_online() {
        let events = vec![
            status_event("Q2XX-0001", "2024-05-01T11:30:00Z", Some("offline"), Some("online")),
            status_event("Q2XX-0001", "2024-05-01T09:00:00Z", Some("online"), Some("offline")),
        ];

        let intervals = reconstruct_outages(&events);

        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].device_serial, "Q2XX-0001");
        assert_eq!(intervals[0].start, Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
        assert_eq!(intervals[0].end, Utc.with_ymd_and_hms(2024, 5, 1, 11, 30, 0).unwrap());
        assert_eq!(intervals[0].duration.num_seconds(), 9_000);
    }

    #[test]
    fn dangling_offline_produces_nothing() {
        let events = vec![
            status_event("Q2XX-0001", "2024-05-01T09:00:00Z", Some("online"), Some("offline")),
        ];

        assert!(reconstruct_outages(&events).is_empty());
    }

    #[test]
    fn second_offline_overwrites_pending_start() {
        let events = vec![
            status_event("Q2XX-0001", "2024-05-01T01:00:00Z", Some("online"), Some("offline")),
            status_event("Q2XX-0001", "2024-05-01T02:00:00Z", Some("online"), Some("offline")),
            status_event("Q2XX-0001", "2024-05-01T03:00:00Z", Some("offline"), Some("online")),
        ];

        let intervals = reconstruct_outages(&events);

        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].start, at("2024-05-01T02:00:00Z"));
        assert_eq!(intervals[0].end, at("2024-05-01T03:00:00Z"));
    }

    #[test]
    fn interleaved_devices_are_partitioned() {
        let events = vec![
            status_event("B", "2024-05-01T05:00:00Z", Some("offline"), Some("online")),
            status_event("A", "2024-05-01T01:00:00Z", Some("online"), Some("offline")),
            status_event("B", "2024-05-01T04:00:00Z", Some("online"), Some("offline")),
            status_event("A", "2024-05-01T03:00:00Z", Some("offline"), Some("online")),
            status_event("A", "2024-05-01T06:00:00Z", Some("online"), Some("offline")),
            status_event("A", "2024-05-01T07:00:00Z", Some("offline"), Some("online")),
        ];

        let intervals = reconstruct_outages(&events);

        let summary: Vec<(&str, String, String)> = intervals
            .iter()
            .map(|interval| {
                (
                    interval.device_serial.as_str(),
                    interval.start.format("%H:%M").to_string(),
                    interval.end.format("%H:%M").to_string(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("B", "04:00".to_string(), "05:00".to_string()),
                ("A", "01:00".to_string(), "03:00".to_string()),
                ("A", "06:00".to_string(), "07:00".to_string()),
            ]
        );
        assert!(intervals.iter().all(|interval| interval.start < interval.end));
    }

    #[test]
    fn first_seen_without_baseline_does_not_open_outage() {
        let events = vec![
            status_event("Q2XX-0003", "2024-05-01T01:00:00Z", None, Some("offline")),
            status_event("Q2XX-0003", "2024-05-01T02:00:00Z", Some("offline"), Some("online")),
            status_event("Q2XX-0003", "2024-05-01T03:00:00Z", None, None),
        ];

        assert!(reconstruct_outages(&events).is_empty());
    }

    #[test]
    fn ignores_unknown_status_values() {
        let events = vec![
            status_event("Q2XX-0004", "2024-05-01T01:00:00Z", Some("online"), Some("alerting")),
            status_event("Q2XX-0004", "2024-05-01T02:00:00Z", Some("alerting"), Some("online")),
        ];

        assert!(reconstruct_outages(&events).is_empty());
    }

    #[test]
    fn equal_timestamps_keep_input_order_and_skip_zero_length() {
        let mut tracker = OutageTracker::new();
        let offline = status_event("Q", "2024-05-01T01:00:00Z", Some("online"), Some("offline"));
        let online = status_event("Q", "2024-05-01T01:00:00Z", Some("offline"), Some("online"));

        assert_eq!(
            tracker.observe(&offline),
            Some(OutageTransition::Opened {
                offline_at: at("2024-05-01T01:00:00Z"),
            })
        );
        assert_eq!(tracker.observe(&online), None);
        assert_eq!(tracker.pending_offline_start(), None);

        assert!(reconstruct_outages(&[offline, online]).is_empty());
    }

    #[test]
    fn reports_first_known_device_name() {
        let mut first = status_event("Q", "2024-05-01T01:00:00Z", Some("online"), Some("offline"));
        first.device_name = None;
        let mut second = status_event("Q", "2024-05-01T02:00:00Z", Some("offline"), Some("online"));
        second.device_name = Some("Closet switch".to_string());

        let intervals = reconstruct_outages(&[first, second]);

        assert_eq!(intervals[0].device_name.as_deref(), Some("Closet switch"));
    }

    #[test]
    fn reconstruction_is_idempotent() {
        let events = vec![
            status_event("A", "2024-05-01T03:00:00Z", Some("offline"), Some("online")),
            status_event("B", "2024-05-01T01:00:00Z", Some("online"), Some("offline")),
            status_event("A", "2024-05-01T01:00:00Z", Some("online"), Some("offline")),
            status_event("B", "2024-05-01T02:00:00Z", Some("offline"), Some("online")),
        ];

        assert_eq!(reconstruct_outages(&events), reconstruct_outages(&events));
    }
}
