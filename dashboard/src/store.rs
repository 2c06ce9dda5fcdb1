use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use activity_engine::{ActivityEvent, parse_events};
use anyhow::{Context, Result};
use tracing::info;

/// The session's immutable event collection.
#[derive(Debug)]
pub struct EventStore {
    events: Vec<ActivityEvent>,
}

impl EventStore {
    pub fn new(events: Vec<ActivityEvent>) -> Self {
        EventStore { events }
    }

    /// Reads and parses the dataset. A single malformed record fails the load.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset {}", path.display()))?;
        let events = parse_events(&content)
            .with_context(|| format!("Failed to parse dataset {}", path.display()))?;
        info!("Loaded {} activity events from {}", events.len(), path.display());
        Ok(EventStore::new(events))
    }

    pub fn events(&self) -> &[ActivityEvent] {
        &self.events
    }

    /// Distinct activity types, sorted.
    pub fn activity_types(&self) -> Vec<&str> {
        self.events
            .iter()
            .map(|e| e.activity_type.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
