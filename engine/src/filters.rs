use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::event::{ActivityEvent, Status};

/// One-click KPI card constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuickStat {
    Total,
    Success,
    Warning,
    Failed,
}

impl QuickStat {
    pub const ALL: [QuickStat; 4] = [
        QuickStat::Total,
        QuickStat::Success,
        QuickStat::Warning,
        QuickStat::Failed,
    ];

    /// Status this card constrains to. `Total` imposes no constraint.
    pub fn status(&self) -> Option<Status> {
        match self {
            QuickStat::Total => None,
            QuickStat::Success => Some(Status::Success),
            QuickStat::Warning => Some(Status::Warning),
            QuickStat::Failed => Some(Status::Fail),
        }
    }
}

/// Activity-type, status and quick-stat constraints.
///
/// OR within a dimension, AND across dimensions. An empty set places no
/// constraint on its dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionFilter {
    #[serde(default)]
    pub activity_types: BTreeSet<String>,
    #[serde(default)]
    pub statuses: BTreeSet<Status>,
    #[serde(default)]
    pub quick_stat: Option<QuickStat>,
}

impl DimensionFilter {
    pub fn is_empty(&self) -> bool {
        self.activity_types.is_empty()
            && self.statuses.is_empty()
            && self.quick_stat.and_then(|q| q.status()).is_none()
    }

    pub fn matches(&self, event: &ActivityEvent) -> bool {
        let type_ok =
            self.activity_types.is_empty() || self.activity_types.contains(&event.activity_type);
        let status_ok = self.statuses.is_empty() || self.statuses.contains(&event.status);
        let quick_ok = self
            .quick_stat
            .and_then(|q| q.status())
            .is_none_or(|s| s == event.status);
        type_ok && status_ok && quick_ok
    }

    pub fn apply<'a>(&self, events: &[&'a ActivityEvent]) -> Vec<&'a ActivityEvent> {
        if self.is_empty() {
            return events.to_vec();
        }
        let selected: Vec<&ActivityEvent> =
            events.iter().copied().filter(|e| self.matches(e)).collect();
        debug!(
            "dimension filter kept {} of {} events",
            selected.len(),
            events.len()
        );
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::event;

    fn sample() -> Vec<ActivityEvent> {
        vec![
            event("Login", Status::Fail, "2025-01-01", 9),
            event("Login", Status::Success, "2025-01-01", 10),
            event("Upload", Status::Fail, "2025-01-01", 11),
            event("Upload", Status::Warning, "2025-01-02", 12),
            event("Logout", Status::Success, "2025-01-02", 13),
        ]
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let events = sample();
        let refs: Vec<&ActivityEvent> = events.iter().collect();
        let filter = DimensionFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&refs).len(), events.len());
    }

    #[test]
    fn test_conjunction_across_dimensions() {
        let events = sample();
        let refs: Vec<&ActivityEvent> = events.iter().collect();
        let filter = DimensionFilter {
            activity_types: BTreeSet::from(["Login".to_owned()]),
            statuses: BTreeSet::from([Status::Fail]),
            quick_stat: None,
        };

        let kept = filter.apply(&refs);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].activity_type, "Login");
        assert_eq!(kept[0].status, Status::Fail);
    }

    #[test]
    fn test_disjunction_within_dimension() {
        let events = sample();
        let refs: Vec<&ActivityEvent> = events.iter().collect();
        let filter = DimensionFilter {
            activity_types: BTreeSet::from(["Login".to_owned(), "Logout".to_owned()]),
            ..Default::default()
        };
        assert_eq!(filter.apply(&refs).len(), 3);
    }

    #[test]
    fn test_quick_stat_total_imposes_nothing() {
        let events = sample();
        let refs: Vec<&ActivityEvent> = events.iter().collect();
        let filter = DimensionFilter {
            quick_stat: Some(QuickStat::Total),
            ..Default::default()
        };
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&refs).len(), 5);
    }

    #[test]
    fn test_quick_stat_failed_maps_to_fail() {
        let events = sample();
        let refs: Vec<&ActivityEvent> = events.iter().collect();
        let filter = DimensionFilter {
            quick_stat: Some(QuickStat::Failed),
            ..Default::default()
        };
        let kept = filter.apply(&refs);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|e| e.status == Status::Fail));
    }

    #[test]
    fn test_quick_stat_and_status_set_combine() {
        let events = sample();
        let refs: Vec<&ActivityEvent> = events.iter().collect();
        let filter = DimensionFilter {
            statuses: BTreeSet::from([Status::Success]),
            quick_stat: Some(QuickStat::Warning),
            ..Default::default()
        };
        assert!(filter.apply(&refs).is_empty());
    }
}
