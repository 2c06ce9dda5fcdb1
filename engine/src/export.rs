//! Export payloads handed to the file-emission side. Nothing here touches
//! the filesystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::event::{ActivityEvent, Status};
use crate::filters::DimensionFilter;
use crate::time_range::TimeRangeFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn file_name(&self, exported_at: DateTime<Utc>) -> String {
        let ext = match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        };
        format!("activity-{}.{ext}", exported_at.format("%Y-%m-%d"))
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CsvRow<'a> {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Activity")]
    pub activity: &'a str,
    #[serde(rename = "Status")]
    pub status: &'static str,
    #[serde(rename = "User")]
    pub user: &'a str,
    #[serde(rename = "Device")]
    pub device: &'a str,
}

pub fn csv_rows<'a>(events: &[&'a ActivityEvent]) -> Vec<CsvRow<'a>> {
    events
        .iter()
        .map(|&e| CsvRow {
            date: e.date.format("%Y-%m-%d").to_string(),
            time: e.timestamp.format("%H:%M:%S").to_string(),
            activity: &e.activity_type,
            status: e.status.as_str(),
            user: &e.user,
            device: &e.device,
        })
        .collect()
}

/// CSV text with a `Date,Time,Activity,Status,User,Device` header.
pub fn to_csv(events: &[&ActivityEvent]) -> Result<String, EngineError> {
    let mut bytes = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut bytes);
        if events.is_empty() {
            writer.write_record(["Date", "Time", "Activity", "Status", "User", "Device"])?;
        }
        for row in csv_rows(events) {
            writer.serialize(row)?;
        }
        writer.flush().map_err(csv::Error::from)?;
    }
    Ok(String::from_utf8(bytes)?)
}

#[derive(Debug, Serialize)]
pub struct FiltersApplied {
    pub activity_types: Vec<String>,
    pub statuses: Vec<Status>,
    pub date_range: String,
}

#[derive(Debug, Serialize)]
pub struct ExportEnvelope<'a> {
    pub exported_at: DateTime<Utc>,
    pub total_events: usize,
    pub filters_applied: FiltersApplied,
    pub data: Vec<&'a ActivityEvent>,
}

impl<'a> ExportEnvelope<'a> {
    pub fn new(
        events: &[&'a ActivityEvent],
        range: &TimeRangeFilter,
        dimensions: &DimensionFilter,
        exported_at: DateTime<Utc>,
    ) -> Self {
        let mut statuses: Vec<Status> = dimensions.statuses.iter().copied().collect();
        if let Some(status) = dimensions.quick_stat.and_then(|q| q.status()) {
            if !statuses.contains(&status) {
                statuses.push(status);
            }
        }
        ExportEnvelope {
            exported_at,
            total_events: events.len(),
            filters_applied: FiltersApplied {
                activity_types: dimensions.activity_types.iter().cloned().collect(),
                statuses,
                date_range: range.describe(),
            },
            data: events.to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
