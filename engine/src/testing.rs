use chrono::{FixedOffset, NaiveDate, TimeZone};

use crate::event::{ActivityEvent, Status};

pub fn event(activity_type: &str, status: Status, date: &str, hour: u32) -> ActivityEvent {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    ActivityEvent {
        activity_type: activity_type.to_owned(),
        status,
        user: "user-1".to_owned(),
        device: "device-1".to_owned(),
        date,
        timestamp: FixedOffset::east_opt(0)
            .unwrap()
            .from_local_datetime(&date.and_hms_opt(hour, 15, 0).unwrap())
            .unwrap(),
    }
}

pub fn refs(events: &[ActivityEvent]) -> Vec<&ActivityEvent> {
    events.iter().collect()
}
