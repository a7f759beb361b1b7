//! Node repository and recency tracking
//!
//! The store is the single source of truth the projector and classifier
//! query; it is rebuilt-from only, never rendered from directly.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use tracing::{debug, trace};

use super::classify::NodeStatus;
use super::geo::Feature;

/// One directional neighbor report, as serialized by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NeighborReport {
    pub neighbor: String,
    pub snr: f64,
    pub timestamp: f64,
}

/// Everything known about a single mesh node.
#[derive(Debug, Clone, Default)]
pub struct NodeRecord {
    pub id: String,
    pub display_name: Option<String>,
    /// Unix seconds of the most recent receipt.
    pub last_heard: Option<f64>,
    /// Parsed position feature; `None` when absent or malformed.
    pub feature: Option<Feature>,
    /// Parsed neighbor reports; `None` when absent or malformed.
    pub neighbors: Option<Vec<NeighborReport>>,
}

/// Input to a single projection pass, derived from the store.
#[derive(Debug, Clone)]
pub struct NodeView {
    pub id: String,
    pub feature: Option<Feature>,
    pub neighbors: Option<Vec<NeighborReport>>,
    pub selected: bool,
    pub is_old: bool,
}

/// In-memory node repository keyed by node id.
#[derive(Debug, Default)]
pub struct NodeStore {
    nodes: HashMap<String, NodeRecord>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a full node update. Geometry and neighbor payloads replace the
    /// previous values wholesale, including replacement with absent.
    pub fn update_node(
        &mut self,
        id: &str,
        display_name: Option<String>,
        last_heard: Option<f64>,
        feature: Option<Feature>,
        neighbors: Option<Vec<NeighborReport>>,
    ) {
        let record = self.nodes.entry(id.to_string()).or_insert_with(|| {
            debug!(node_id = id, "New node registered");
            NodeRecord {
                id: id.to_string(),
                ..NodeRecord::default()
            }
        });
        if display_name.is_some() {
            record.display_name = display_name;
        }
        if last_heard.is_some() {
            record.last_heard = last_heard;
        }
        record.feature = feature;
        record.neighbors = neighbors;
        trace!(node_id = id, "Node updated");
    }

    /// Record a receipt without touching geometry or neighbors.
    pub fn touch(&mut self, id: &str, rx_time: f64) {
        let record = self.nodes.entry(id.to_string()).or_insert_with(|| {
            debug!(node_id = id, "New node registered from packet");
            NodeRecord {
                id: id.to_string(),
                ..NodeRecord::default()
            }
        });
        record.last_heard = Some(record.last_heard.map_or(rx_time, |t| t.max(rx_time)));
    }

    pub fn get(&self, id: &str) -> Option<&NodeRecord> {
        self.nodes.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeRecord> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Snapshot the store as projector input, most recently heard first.
    /// Statuses missing from the map count as not stale.
    pub fn views(
        &self,
        statuses: &HashMap<String, NodeStatus>,
        selected: Option<&str>,
    ) -> Vec<NodeView> {
        let mut records: Vec<&NodeRecord> = self.nodes.values().collect();
        records.sort_by(|a, b| {
            let (ta, tb) = (
                a.last_heard.unwrap_or(f64::NEG_INFINITY),
                b.last_heard.unwrap_or(f64::NEG_INFINITY),
            );
            tb.partial_cmp(&ta)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        records
            .into_iter()
            .map(|record| NodeView {
                id: record.id.clone(),
                feature: record.feature.clone(),
                neighbors: record.neighbors.clone(),
                selected: selected == Some(record.id.as_str()),
                is_old: statuses.get(&record.id).is_some_and(|s| s.is_old),
            })
            .collect()
    }
}

/// Nodes that transmitted inside this window carry a highlight.
pub const ACTIVITY_WINDOW_SECS: f64 = 30.0;

/// Highlight transition for one node, produced once per frame tick.
#[derive(Debug, Clone, PartialEq)]
pub enum HighlightChange {
    /// Node is inside the activity window; refresh with its current age.
    Refresh { id: String, age: f64 },
    /// Node just left the window; emitted exactly once per departure.
    Clear { id: String },
}

/// Transient set of recently active nodes driving the per-frame highlight.
#[derive(Debug, Default)]
pub struct RecencyTracker {
    last_rx: HashMap<String, f64>,
    recent: HashSet<String>,
}

impl RecencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: &str, rx_time: f64) {
        self.last_rx.insert(id.to_string(), rx_time);
    }

    /// Advance the tracker to `now`. Refreshes are emitted every tick while a
    /// node stays in the window; clears are edge-triggered.
    pub fn tick(&mut self, now: f64) -> Vec<HighlightChange> {
        let mut changes = Vec::new();
        for (id, &rx_time) in &self.last_rx {
            let age = now - rx_time;
            let recent_tx = age > 0.0 && age < ACTIVITY_WINDOW_SECS;
            if recent_tx {
                self.recent.insert(id.clone());
                changes.push(HighlightChange::Refresh {
                    id: id.clone(),
                    age,
                });
            } else if self.recent.remove(id) {
                changes.push(HighlightChange::Clear { id: id.clone() });
            }
        }
        changes
    }

    pub fn recent_count(&self) -> usize {
        self.recent.len()
    }
}
