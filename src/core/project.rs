//! Node/neighbor projection
//!
//! Builds the two map source collections from a snapshot of the node list.
//! Deliberately a full rebuild on every pass; node counts are small and
//! idempotent recomputation keeps the map free of state drift.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};
use tracing::trace;

use super::geo::{Feature, FeatureCollection};
use super::store::NodeView;

/// A canonicalized neighbor link. `a < b` lexicographically, so the edge
/// between two nodes has one representation regardless of which endpoint
/// reported it.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborEdge {
    pub a: String,
    pub b: String,
    pub snr: f64,
    pub timestamp: f64,
}

impl NeighborEdge {
    pub fn canonical(x: &str, y: &str, snr: f64, timestamp: f64) -> Self {
        let (a, b) = if x <= y { (x, y) } else { (y, x) };
        Self {
            a: a.to_string(),
            b: b.to_string(),
            snr,
            timestamp,
        }
    }

    /// Order-independent identifier for the node pair.
    pub fn key(&self) -> String {
        format!("{}-{}", self.a, self.b)
    }
}

/// Output of one projection pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Projection {
    pub nodes: FeatureCollection,
    pub neighbors: FeatureCollection,
}

/// Project the node list into node and neighbor feature collections.
///
/// Guarantees: node ids are unique (last write wins), neighbor keys are
/// unique (most recent report wins), and every emitted edge references two
/// ids present in the node collection.
pub fn project(nodes: &[NodeView]) -> Projection {
    // Selected node first; this governs edge priority, not output order.
    let mut ordered: Vec<&NodeView> = nodes.iter().collect();
    if let Some(pos) = ordered.iter().position(|n| n.selected) {
        let selected = ordered.remove(pos);
        ordered.insert(0, selected);
    }
    let has_selection = ordered.first().is_some_and(|n| n.selected);

    // Stale nodes drop out, except a stale node that is selected.
    let retained: Vec<&NodeView> = ordered
        .into_iter()
        .filter(|n| n.selected || !n.is_old)
        .collect();

    // Node collection: one feature per id, last write wins.
    let mut features: Vec<Feature> = Vec::new();
    let mut index_by_id: HashMap<String, usize> = HashMap::new();
    for node in &retained {
        let Some(feature) = &node.feature else {
            continue;
        };
        let id = feature.id().unwrap_or(node.id.as_str()).to_string();
        match index_by_id.get(&id) {
            Some(&idx) => features[idx] = feature.clone(),
            None => {
                index_by_id.insert(id, features.len());
                features.push(feature.clone());
            }
        }
    }

    // Edge candidates: only the selected node contributes when a selection
    // exists, every retained node otherwise.
    let mut candidates: Vec<NeighborEdge> = retained
        .iter()
        .filter(|n| !has_selection || n.selected)
        .filter_map(|n| n.neighbors.as_ref().map(|reports| (n, reports)))
        .flat_map(|(n, reports)| {
            reports
                .iter()
                .map(|r| NeighborEdge::canonical(&n.id, &r.neighbor, r.snr, r.timestamp))
        })
        .collect();

    // Most recent report wins: stable sort by descending timestamp, then
    // first occurrence per canonical key.
    candidates.sort_by(|x, y| {
        y.timestamp
            .partial_cmp(&x.timestamp)
            .unwrap_or(Ordering::Equal)
    });

    let mut seen: HashSet<String> = HashSet::new();
    let mut edge_features: Vec<Feature> = Vec::new();
    for edge in candidates {
        let key = edge.key();
        if !seen.insert(key.clone()) {
            continue;
        }
        // Orphan references guard against filtered-out or unknown endpoints.
        let endpoints = index_by_id.get(&edge.a).zip(index_by_id.get(&edge.b));
        let Some((&ia, &ib)) = endpoints else {
            trace!(key, "Dropping edge with unresolved endpoint");
            continue;
        };
        let coords = features[ia]
            .point_coordinates()
            .zip(features[ib].point_coordinates());
        let Some((ca, cb)) = coords else {
            continue;
        };
        let mut properties = Map::new();
        properties.insert("id".to_string(), Value::from(key));
        properties.insert("snr".to_string(), Value::from(edge.snr));
        edge_features.push(Feature::line_string(
            vec![ca.to_vec(), cb.to_vec()],
            properties,
        ));
    }

    Projection {
        nodes: FeatureCollection::new(features),
        neighbors: FeatureCollection::new(edge_features),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::NeighborReport;

    fn point(id: &str, lon: f64, lat: f64) -> Feature {
        let mut props = Map::new();
        props.insert("id".to_string(), Value::from(id));
        Feature::point(vec![lon, lat], props)
    }

    fn report(neighbor: &str, snr: f64, timestamp: f64) -> NeighborReport {
        NeighborReport {
            neighbor: neighbor.to_string(),
            snr,
            timestamp,
        }
    }

    fn view(id: &str, lon: f64, lat: f64) -> NodeView {
        NodeView {
            id: id.to_string(),
            feature: Some(point(id, lon, lat)),
            neighbors: None,
            selected: false,
            is_old: false,
        }
    }

    #[test]
    fn canonical_key_is_order_independent() {
        let xy = NeighborEdge::canonical("x9", "a1", 3.0, 10.0);
        let yx = NeighborEdge::canonical("a1", "x9", 3.0, 10.0);
        assert_eq!(xy.key(), yx.key());
        assert_eq!(xy.a, "a1");
    }

    #[test]
    fn projection_is_idempotent() {
        let mut a = view("a1", 1.0, 1.0);
        a.neighbors = Some(vec![report("b2", 5.0, 100.0)]);
        let b = view("b2", 2.0, 2.0);
        let nodes = vec![a, b];
        let first = project(&nodes);
        let second = project(&nodes);
        assert_eq!(
            serde_json::to_string(&first.nodes).unwrap(),
            serde_json::to_string(&second.nodes).unwrap()
        );
        assert_eq!(
            serde_json::to_string(&first.neighbors).unwrap(),
            serde_json::to_string(&second.neighbors).unwrap()
        );
    }

    #[test]
    fn every_edge_endpoint_exists_in_node_collection() {
        let mut a = view("a1", 1.0, 1.0);
        a.neighbors = Some(vec![report("b2", 5.0, 100.0), report("zz", 2.0, 200.0)]);
        let b = view("b2", 2.0, 2.0);
        let projection = project(&[a, b]);

        let ids: HashSet<&str> = projection
            .nodes
            .features
            .iter()
            .filter_map(|f| f.id())
            .collect();
        for edge in &projection.neighbors.features {
            let key = edge.id().unwrap();
            let (a, b) = key.split_once('-').unwrap();
            assert!(ids.contains(a) && ids.contains(b), "orphan edge {key}");
        }
        // The reference to unknown node zz is gone entirely
        assert_eq!(projection.neighbors.len(), 1);
    }

    #[test]
    fn duplicate_edges_keep_most_recent_report() {
        let mut a = view("a1", 1.0, 1.0);
        a.neighbors = Some(vec![report("b2", 5.0, 100.0)]);
        let mut b = view("b2", 2.0, 2.0);
        b.neighbors = Some(vec![report("a1", 9.0, 250.0)]);
        let projection = project(&[a, b]);
        assert_eq!(projection.neighbors.len(), 1);
        let snr = projection.neighbors.features[0]
            .properties
            .get("snr")
            .and_then(Value::as_f64);
        assert_eq!(snr, Some(9.0));
    }

    #[test]
    fn stale_node_is_excluded_and_its_edges_dropped() {
        let mut a = view("a1", 1.0, 1.0);
        a.neighbors = Some(vec![report("b2", 5.0, 100.0)]);
        let mut b = view("b2", 2.0, 2.0);
        b.is_old = true;
        let c = view("c3", 3.0, 3.0);
        let projection = project(&[a, b, c]);

        let ids: Vec<&str> = projection
            .nodes
            .features
            .iter()
            .filter_map(|f| f.id())
            .collect();
        assert!(!ids.contains(&"b2"));
        assert!(ids.contains(&"a1") && ids.contains(&"c3"));
        // A's report of the filtered-out B must not survive
        assert!(projection.neighbors.is_empty());
    }

    #[test]
    fn stale_selected_node_is_retained() {
        let mut a = view("a1", 1.0, 1.0);
        a.is_old = true;
        a.selected = true;
        let projection = project(&[a, view("b2", 2.0, 2.0)]);
        let ids: Vec<&str> = projection
            .nodes
            .features
            .iter()
            .filter_map(|f| f.id())
            .collect();
        assert!(ids.contains(&"a1"));
    }

    #[test]
    fn selection_restricts_edges_to_selected_node() {
        let mut a = view("a1", 1.0, 1.0);
        a.selected = true;
        a.neighbors = Some(vec![report("b2", 5.0, 100.0)]);
        let mut b = view("b2", 2.0, 2.0);
        b.neighbors = Some(vec![report("c3", 7.0, 300.0)]);
        let c = view("c3", 3.0, 3.0);
        let projection = project(&[b, a, c]);

        assert_eq!(projection.neighbors.len(), 1);
        assert_eq!(projection.neighbors.features[0].id(), Some("a1-b2"));
    }

    #[test]
    fn without_selection_all_retained_nodes_contribute() {
        let mut a = view("a1", 1.0, 1.0);
        a.neighbors = Some(vec![report("b2", 5.0, 100.0)]);
        let mut b = view("b2", 2.0, 2.0);
        b.neighbors = Some(vec![report("c3", 7.0, 300.0)]);
        let c = view("c3", 3.0, 3.0);
        let projection = project(&[a, b, c]);
        assert_eq!(projection.neighbors.len(), 2);
    }

    #[test]
    fn nodes_without_geometry_are_skipped() {
        let mut a = view("a1", 1.0, 1.0);
        a.feature = None;
        let projection = project(&[a, view("b2", 2.0, 2.0)]);
        assert_eq!(projection.nodes.len(), 1);
        assert_eq!(projection.nodes.features[0].id(), Some("b2"));
    }

    #[test]
    fn duplicate_node_ids_collapse_last_write_wins() {
        let first = view("a1", 1.0, 1.0);
        let second = view("a1", 9.0, 9.0);
        let projection = project(&[first, second]);
        assert_eq!(projection.nodes.len(), 1);
        assert_eq!(
            projection.nodes.features[0].point_coordinates(),
            Some(&[9.0, 9.0][..])
        );
    }
}
