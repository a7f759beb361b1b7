//! Single-node selection state machine

use tracing::debug;

use super::classify::MaxAge;
use super::geo::Feature;

/// Effects the view layer applies after a selection transition. The
/// position-history overlay is cleared on every transition; the other two
/// fields are present only when a node just became selected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionEffects {
    /// Camera target from the newly selected node's geometry.
    pub fly_to: Option<Vec<f64>>,
    /// URL of the historical-position query to issue.
    pub history_query: Option<String>,
}

/// Tracks the single selected node. Selecting the selected node again clears
/// the selection; selecting a different node replaces it.
#[derive(Debug, Default)]
pub struct SelectionController {
    current: Option<String>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Toggle selection of `id`. The caller passes the node's geometry (when
    /// known) and the active staleness threshold for the history query scope.
    pub fn toggle(
        &mut self,
        id: &str,
        feature: Option<&Feature>,
        max_age: MaxAge,
    ) -> SelectionEffects {
        if self.current.as_deref() == Some(id) {
            debug!(node_id = id, "Selection cleared");
            self.current = None;
            return SelectionEffects::default();
        }
        debug!(node_id = id, "Node selected");
        self.current = Some(id.to_string());
        SelectionEffects {
            fly_to: feature
                .and_then(Feature::point_coordinates)
                .map(|c| c.to_vec()),
            history_query: Some(position_history_url(id, max_age)),
        }
    }

    /// Drop any selection.
    pub fn clear(&mut self) -> SelectionEffects {
        self.current = None;
        SelectionEffects::default()
    }
}

/// Historical-position query for one node, scoped to the staleness threshold.
pub fn position_history_url(id: &str, max_age: MaxAge) -> String {
    match max_age {
        MaxAge::Unbounded => format!("/node/{id}/positions.geojson"),
        MaxAge::Minutes(minutes) => {
            format!("/node/{id}/positions.geojson?max_age={minutes}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value};

    fn point(id: &str) -> Feature {
        let mut props = Map::new();
        props.insert("id".to_string(), Value::from(id));
        Feature::point(vec![10.0, 50.0], props)
    }

    #[test]
    fn toggling_same_node_clears() {
        let mut selection = SelectionController::new();
        selection.toggle("a1", None, MaxAge::Unbounded);
        assert_eq!(selection.selected(), Some("a1"));
        let effects = selection.toggle("a1", None, MaxAge::Unbounded);
        assert_eq!(selection.selected(), None);
        assert_eq!(effects, SelectionEffects::default());
    }

    #[test]
    fn selecting_another_node_replaces() {
        let mut selection = SelectionController::new();
        selection.toggle("a1", None, MaxAge::Unbounded);
        let effects = selection.toggle("b2", Some(&point("b2")), MaxAge::Minutes(60));
        assert_eq!(selection.selected(), Some("b2"));
        assert_eq!(effects.fly_to, Some(vec![10.0, 50.0]));
        assert_eq!(
            effects.history_query.as_deref(),
            Some("/node/b2/positions.geojson?max_age=60")
        );
    }

    #[test]
    fn selection_without_geometry_still_queries_history() {
        let mut selection = SelectionController::new();
        let effects = selection.toggle("a1", None, MaxAge::Unbounded);
        assert_eq!(effects.fly_to, None);
        assert_eq!(
            effects.history_query.as_deref(),
            Some("/node/a1/positions.geojson")
        );
    }

    #[test]
    fn clear_resets_state() {
        let mut selection = SelectionController::new();
        selection.toggle("a1", None, MaxAge::Unbounded);
        selection.clear();
        assert_eq!(selection.selected(), None);
    }
}
