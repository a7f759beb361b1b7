//! Event parser for the live update stream
//!
//! Two event kinds arrive over the transport: `update-node` (full node row
//! with serialized geometry and neighbor payloads) and `mesh-packet` (a bare
//! receipt). Malformed embedded payloads degrade to absent for that node;
//! only the outer envelope failing to parse drops the whole message.

use serde::Deserialize;
use serde_json::Value;
use tracing::{trace, warn};

use super::geo::Feature;
use super::store::{NeighborReport, NodeStore};

/// Inbound message envelope.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum MapEvent {
    #[serde(rename = "update-node")]
    NodeUpdate(NodeUpdate),
    #[serde(rename = "mesh-packet")]
    MeshPacket(MeshPacket),
}

/// Full node update. `geojson` and `neighbors` arrive as embedded JSON
/// strings, mirroring how the server serializes them.
#[derive(Debug, Deserialize)]
pub struct NodeUpdate {
    pub node_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub last_heard: Option<f64>,
    #[serde(default)]
    pub geojson: Option<String>,
    #[serde(default)]
    pub neighbors: Option<String>,
}

/// A mesh packet receipt attributed to one node.
#[derive(Debug, Deserialize)]
pub struct MeshPacket {
    pub node_id: String,
    #[serde(default)]
    pub rx_time: Option<f64>,
}

/// Which kind of event a message carried, for the refresh scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    NodeUpdate,
    MeshPacket,
}

/// Parse one transport message and apply it to the store.
///
/// Returns the event kind on success, `None` for unrecognized or malformed
/// messages.
pub fn parse_event(msg: &str, store: &mut NodeStore, now: f64) -> Option<EventKind> {
    trace!(len = msg.len(), "Parsing message");

    let event: MapEvent = serde_json::from_str(msg)
        .map_err(|e| {
            warn!(error = %e, "Failed to parse event");
        })
        .ok()?;

    match event {
        MapEvent::NodeUpdate(update) => {
            let feature = update
                .geojson
                .as_deref()
                .and_then(|raw| parse_embedded_feature(raw, &update.node_id));
            let neighbors = update
                .neighbors
                .as_deref()
                .and_then(|raw| parse_embedded_neighbors(raw, &update.node_id));
            store.update_node(
                &update.node_id,
                update.display_name,
                update.last_heard,
                feature,
                neighbors,
            );
            Some(EventKind::NodeUpdate)
        }
        MapEvent::MeshPacket(packet) => {
            store.touch(&packet.node_id, packet.rx_time.unwrap_or(now));
            Some(EventKind::MeshPacket)
        }
    }
}

/// Parse a serialized position feature; malformed payloads become absent.
fn parse_embedded_feature(raw: &str, node_id: &str) -> Option<Feature> {
    serde_json::from_str(raw)
        .map_err(|e| {
            warn!(node_id, error = %e, "Malformed node geometry, treating as absent");
        })
        .ok()
}

/// Parse a serialized neighbor list. Entries missing required fields are
/// skipped individually; a payload that is not a list becomes absent.
fn parse_embedded_neighbors(raw: &str, node_id: &str) -> Option<Vec<NeighborReport>> {
    let values: Vec<Value> = serde_json::from_str(raw)
        .map_err(|e| {
            warn!(node_id, error = %e, "Malformed neighbor list, treating as absent");
        })
        .ok()?;
    let reports: Vec<NeighborReport> = values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(report) => Some(report),
            Err(e) => {
                trace!(node_id, error = %e, "Skipping malformed neighbor entry");
                None
            }
        })
        .collect();
    Some(reports)
}
