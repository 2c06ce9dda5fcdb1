//! Default locations for the dataset and settings.

pub const DEFAULT_DATASET: &str = "data/activity.json";
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
