//! Minimal GeoJSON types for the map sources
//!
//! Only the subset the dashboard actually produces and consumes: point
//! features for nodes, line-strings for neighbor links and position trails.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// GeoJSON geometry, tagged by `"type"` as the format requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Vec<f64> },
    LineString { coordinates: Vec<Vec<f64>> },
}

/// A single GeoJSON feature with free-form properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn point(coordinates: Vec<f64>, properties: Map<String, Value>) -> Self {
        Self {
            geometry: Geometry::Point { coordinates },
            properties,
        }
    }

    pub fn line_string(coordinates: Vec<Vec<f64>>, properties: Map<String, Value>) -> Self {
        Self {
            geometry: Geometry::LineString { coordinates },
            properties,
        }
    }

    /// The `id` property, when present and a string.
    pub fn id(&self) -> Option<&str> {
        self.properties.get("id").and_then(Value::as_str)
    }

    /// Point coordinates, when this is a non-empty point feature.
    pub fn point_coordinates(&self) -> Option<&[f64]> {
        match &self.geometry {
            Geometry::Point { coordinates } if coordinates.len() >= 2 => Some(coordinates),
            _ => None,
        }
    }
}

/// A GeoJSON feature collection, the unit the map sources consume.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(id: &str) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::from(id));
        map
    }

    #[test]
    fn point_feature_round_trips() {
        let feature = Feature::point(vec![13.4, 52.5, 34.0], props("ab12"));
        let json = serde_json::to_string(&feature).unwrap();
        assert!(json.contains(r#""type":"Feature""#));
        assert!(json.contains(r#""type":"Point""#));
        let back: Feature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, feature);
        assert_eq!(back.id(), Some("ab12"));
        assert_eq!(back.point_coordinates(), Some(&[13.4, 52.5, 34.0][..]));
    }

    #[test]
    fn parses_server_emitted_feature() {
        let raw = r#"{
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [9.99, 53.55, 12.0]},
            "properties": {"id": "fa01", "display_name": "HH-1", "updated_at": 1724500000.0}
        }"#;
        let feature: Feature = serde_json::from_str(raw).unwrap();
        assert_eq!(feature.id(), Some("fa01"));
        assert_eq!(
            feature.properties.get("display_name").and_then(Value::as_str),
            Some("HH-1")
        );
    }

    #[test]
    fn line_string_has_no_point_coordinates() {
        let feature = Feature::line_string(
            vec![vec![0.0, 0.0], vec![1.0, 1.0]],
            Map::new(),
        );
        assert!(feature.point_coordinates().is_none());
    }

    #[test]
    fn empty_collection_serializes_with_tag() {
        let collection = FeatureCollection::default();
        let json = serde_json::to_string(&collection).unwrap();
        assert_eq!(json, r#"{"type":"FeatureCollection","features":[]}"#);
    }
}
