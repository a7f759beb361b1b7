//! Online/stale classification from last-heard timestamps

use serde::{Deserialize, Serialize};

/// A node is online when heard from within this window.
pub const ONLINE_WINDOW_SECS: f64 = 15.0 * 60.0;

/// User-configured staleness threshold.
///
/// Persisted as a single stored value: minutes as digits, or `"all"` for
/// unbounded. Missing or unparseable values fall back to 60 minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaxAge {
    Unbounded,
    Minutes(u32),
}

impl Default for MaxAge {
    fn default() -> Self {
        MaxAge::Minutes(60)
    }
}

impl MaxAge {
    /// Parse the persisted representation.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw == "all" {
            return Some(MaxAge::Unbounded);
        }
        raw.trim().parse::<u32>().ok().map(MaxAge::Minutes)
    }

    /// The persisted representation.
    pub fn storage_value(&self) -> String {
        match self {
            MaxAge::Unbounded => "all".to_string(),
            MaxAge::Minutes(minutes) => minutes.to_string(),
        }
    }

    /// Threshold in seconds; `None` when unbounded.
    pub fn as_secs(&self) -> Option<f64> {
        match self {
            MaxAge::Unbounded => None,
            MaxAge::Minutes(minutes) => Some(*minutes as f64 * 60.0),
        }
    }
}

/// Per-node presentation facets derived from the last-heard timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeStatus {
    pub is_online: bool,
    pub is_old: bool,
}

/// Classify a node given the current time and the staleness threshold.
///
/// Nodes with no last-heard timestamp are offline and never stale.
pub fn classify(now: f64, last_heard: Option<f64>, max_age: MaxAge) -> NodeStatus {
    let Some(last_heard) = last_heard else {
        return NodeStatus::default();
    };
    let age = (now - last_heard).abs();
    let is_online = age < ONLINE_WINDOW_SECS;
    let is_old = max_age.as_secs().is_some_and(|threshold| age > threshold);
    NodeStatus { is_online, is_old }
}

/// Summary counters for the sidebar header: stale nodes count for neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OnlineSummary {
    pub num_nodes: usize,
    pub online_nodes: usize,
}

pub fn summarize<'a>(statuses: impl Iterator<Item = &'a NodeStatus>) -> OnlineSummary {
    let mut summary = OnlineSummary::default();
    for status in statuses {
        if status.is_old {
            continue;
        }
        summary.num_nodes += 1;
        if status.is_online {
            summary.online_nodes += 1;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn online_boundary_at_fifteen_minutes() {
        let now = 100_000.0;
        let fourteen = classify(now, Some(now - 14.0 * 60.0), MaxAge::Unbounded);
        assert!(fourteen.is_online);
        let sixteen = classify(now, Some(now - 16.0 * 60.0), MaxAge::Unbounded);
        assert!(!sixteen.is_online);
    }

    #[test]
    fn unbounded_is_never_old() {
        let now = 1_000_000.0;
        let status = classify(now, Some(now - 400.0 * 86_400.0), MaxAge::Unbounded);
        assert!(!status.is_old);
    }

    #[test]
    fn bounded_threshold_marks_old() {
        let now = 100_000.0;
        let max_age = MaxAge::Minutes(60);
        assert!(!classify(now, Some(now - 59.0 * 60.0), max_age).is_old);
        assert!(classify(now, Some(now - 61.0 * 60.0), max_age).is_old);
    }

    #[test]
    fn unheard_node_is_offline_and_not_old() {
        let status = classify(100.0, None, MaxAge::Minutes(1));
        assert_eq!(status, NodeStatus::default());
    }

    #[test]
    fn summary_skips_old_nodes() {
        let statuses = [
            NodeStatus { is_online: true, is_old: false },
            NodeStatus { is_online: false, is_old: false },
            NodeStatus { is_online: true, is_old: true },
        ];
        let summary = summarize(statuses.iter());
        assert_eq!(summary.num_nodes, 2);
        assert_eq!(summary.online_nodes, 1);
    }

    #[test]
    fn max_age_parse_round_trip() {
        assert_eq!(MaxAge::parse("all"), Some(MaxAge::Unbounded));
        assert_eq!(MaxAge::parse("60"), Some(MaxAge::Minutes(60)));
        assert_eq!(MaxAge::parse("bogus"), None);
        for value in [MaxAge::Unbounded, MaxAge::Minutes(1440)] {
            assert_eq!(MaxAge::parse(&value.storage_value()), Some(value));
        }
    }
}
