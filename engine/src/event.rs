use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineError;

/// Outcome of a single activity.
///
/// Variants are declared in ascending severity, so the dominant status of a
/// group of events is simply its maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Warning,
    Fail,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Success, Status::Warning, Status::Fail];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Warning => "warning",
            Status::Fail => "fail",
        }
    }

    /// Highest-severity status among `statuses`, `None` when there are none.
    pub fn dominant(statuses: impl IntoIterator<Item = Status>) -> Option<Status> {
        statuses.into_iter().max()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub activity_type: String,
    pub status: Status,
    pub user: String,
    pub device: String,
    pub date: NaiveDate,
    pub timestamp: DateTime<FixedOffset>,
}

/// Record shape as it arrives from the dataset, before date parsing.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    activity_type: String,
    status: Status,
    user: String,
    device: String,
    date: String,
    timestamp: String,
}

/// Parses a JSON array of activity records.
///
/// The whole load fails on the first record with an unparsable `date` or
/// `timestamp`; there is no per-record skipping.
pub fn parse_events(json: &str) -> Result<Vec<ActivityEvent>, EngineError> {
    let raw: Vec<RawEvent> = serde_json::from_str(json)?;
    let events = raw
        .into_iter()
        .enumerate()
        .map(|(index, r)| r.into_event(index))
        .collect::<Result<Vec<_>, _>>()?;
    debug!("parsed {} activity events", events.len());
    Ok(events)
}

impl RawEvent {
    fn into_event(self, index: usize) -> Result<ActivityEvent, EngineError> {
        if self.activity_type.trim().is_empty() {
            return Err(EngineError::InvalidRecord {
                index,
                reason: "activityType must not be empty",
            });
        }

        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|_| {
            EngineError::InvalidDate {
                index,
                field: "date",
                value: self.date.clone(),
            }
        })?;
        let timestamp =
            parse_timestamp(&self.timestamp).ok_or_else(|| EngineError::InvalidDate {
                index,
                field: "timestamp",
                value: self.timestamp.clone(),
            })?;

        Ok(ActivityEvent {
            activity_type: self.activity_type,
            status: self.status,
            user: self.user,
            device: self.device,
            date,
            timestamp,
        })
    }
}

/// RFC 3339, or an offset-less ISO date-time read as UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts);
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Per-status tally. `total()` is always the sum of the three counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub success: usize,
    pub warning: usize,
    pub fail: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: Status) {
        match status {
            Status::Success => self.success += 1,
            Status::Warning => self.warning += 1,
            Status::Fail => self.fail += 1,
        }
    }

    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Success => self.success,
            Status::Warning => self.warning,
            Status::Fail => self.fail,
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.warning + self.fail
    }
}

impl<'a> FromIterator<&'a ActivityEvent> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = &'a ActivityEvent>>(iter: I) -> Self {
        let mut counts = StatusCounts::default();
        for event in iter {
            counts.record(event.status);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;

    use super::*;

    #[test]
    fn test_parse_events_reads_contract_fields() {
        let json = r#"[
            {"activityType": "Login", "status": "success", "user": "alice",
             "device": "laptop", "date": "2025-01-01", "timestamp": "2025-01-01T09:30:00Z"},
            {"activityType": "Upload", "status": "fail", "user": "bob",
             "device": "phone", "date": "2025-01-02", "timestamp": "2025-01-02T18:05:00+02:00"}
        ]"#;

        let events = parse_events(json).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].activity_type, "Login");
        assert_eq!(events[0].status, Status::Success);
        assert_eq!(events[1].status, Status::Fail);
        assert_eq!(events[1].date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(events[1].timestamp.hour(), 18);
    }

    #[test]
    fn test_parse_events_accepts_timestamp_without_offset() {
        let json = r#"[{"activityType": "Login", "status": "warning", "user": "u",
            "device": "d", "date": "2025-03-04", "timestamp": "2025-03-04T07:00:00"}]"#;

        let events = parse_events(json).unwrap();

        assert_eq!(events[0].timestamp.hour(), 7);
        assert_eq!(events[0].timestamp.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_events_fails_fast_on_bad_date() {
        let json = r#"[
            {"activityType": "Login", "status": "success", "user": "u", "device": "d",
             "date": "2025-01-01", "timestamp": "2025-01-01T00:00:00Z"},
            {"activityType": "Login", "status": "success", "user": "u", "device": "d",
             "date": "2025-13-45", "timestamp": "2025-01-01T00:00:00Z"}
        ]"#;

        let err = parse_events(json).unwrap_err();

        match err {
            EngineError::InvalidDate { index, field, value } => {
                assert_eq!(index, 1);
                assert_eq!(field, "date");
                assert_eq!(value, "2025-13-45");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_events_rejects_bad_timestamp_and_status() {
        let bad_ts = r#"[{"activityType": "Login", "status": "success", "user": "u",
            "device": "d", "date": "2025-01-01", "timestamp": "yesterday"}]"#;
        assert!(matches!(
            parse_events(bad_ts),
            Err(EngineError::InvalidDate { field: "timestamp", .. })
        ));

        let bad_status = r#"[{"activityType": "Login", "status": "broken", "user": "u",
            "device": "d", "date": "2025-01-01", "timestamp": "2025-01-01T00:00:00Z"}]"#;
        assert!(matches!(parse_events(bad_status), Err(EngineError::Json(_))));
    }

    #[test]
    fn test_parse_events_rejects_empty_activity_type() {
        let json = r#"[{"activityType": " ", "status": "success", "user": "u",
            "device": "d", "date": "2025-01-01", "timestamp": "2025-01-01T00:00:00Z"}]"#;

        assert!(matches!(
            parse_events(json),
            Err(EngineError::InvalidRecord { index: 0, .. })
        ));
    }

    #[test]
    fn test_dominant_status_precedence() {
        use Status::*;
        assert_eq!(Status::dominant([Success, Fail, Warning]), Some(Fail));
        assert_eq!(Status::dominant([Success, Warning]), Some(Warning));
        assert_eq!(Status::dominant([Success]), Some(Success));
        assert_eq!(Status::dominant(Vec::<Status>::new()), None);
    }
}
