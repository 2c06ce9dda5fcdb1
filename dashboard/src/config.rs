//! Behavioral constants for live updates, tables, and fragment polling.

/// Rows shown in the events tab; the export still carries every event.
pub const MAX_TABLE_ROWS: usize = 200;

/// Toasts dismiss themselves after this many seconds.
pub const NOTIFICATION_TTL_SECS: u64 = 5;

/// Dashboard refresh cadence while live updates are off.
pub const IDLE_POLL_SECS: u64 = 60;

pub const LIVE_UPDATE_MESSAGE: &str = "New activity data available";
