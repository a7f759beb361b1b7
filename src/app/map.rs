//! Map canvas: camera, web-mercator projection, feature painting, hit-testing

use std::f64::consts::PI;

use eframe::egui;
use serde_json::Value;

use crate::core::{Geometry, ACTIVITY_WINDOW_SECS};
use crate::theme::{colors, snr_color};

use super::MeshApp;

const MIN_ZOOM: f64 = 1.0;
const MAX_ZOOM: f64 = 18.0;
/// Zoom level a selection flies to.
pub(super) const SELECT_ZOOM: f64 = 12.0;
/// Zoom level above which node labels appear.
const LABEL_ZOOM: f64 = 9.0;
/// Click-to-node hit radius in screen pixels.
const HIT_RADIUS_PX: f32 = 12.0;

/// Convert lon/lat degrees to web-mercator unit-square coordinates.
fn lon_lat_to_world(lon: f64, lat: f64) -> [f64; 2] {
    let x = lon / 360.0 + 0.5;
    let lat = lat.clamp(-85.0511, 85.0511).to_radians();
    let y = 0.5 - ((lat.tan() + 1.0 / lat.cos()).ln()) / (2.0 * PI);
    [x, y]
}

/// Pannable, zoomable camera over the mercator unit square.
pub(super) struct Camera {
    center: [f64; 2],
    zoom: f64,
    /// Animated fly-to target; approached a fraction per frame.
    target: Option<([f64; 2], f64)>,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            center: [0.5, 0.5],
            zoom: 2.0,
            target: None,
        }
    }

    pub fn fly_to(&mut self, coords: &[f64], zoom: f64) {
        if coords.len() >= 2 {
            self.target = Some((lon_lat_to_world(coords[0], coords[1]), zoom));
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// World units to screen pixels at the current zoom.
    fn scale(&self) -> f64 {
        256.0 * 2f64.powf(self.zoom)
    }

    /// Advance the fly-to animation one frame.
    fn tick(&mut self) {
        if let Some((target, target_zoom)) = self.target {
            self.center[0] += (target[0] - self.center[0]) * 0.15;
            self.center[1] += (target[1] - self.center[1]) * 0.15;
            self.zoom += (target_zoom - self.zoom) * 0.15;

            let dx = target[0] - self.center[0];
            let dy = target[1] - self.center[1];
            if dx.abs() * self.scale() < 0.5
                && dy.abs() * self.scale() < 0.5
                && (target_zoom - self.zoom).abs() < 0.01
            {
                self.center = target;
                self.zoom = target_zoom;
                self.target = None;
            }
        }
    }

    fn to_screen(&self, world: [f64; 2], rect: egui::Rect) -> egui::Pos2 {
        let scale = self.scale();
        rect.center()
            + egui::vec2(
                ((world[0] - self.center[0]) * scale) as f32,
                ((world[1] - self.center[1]) * scale) as f32,
            )
    }

    fn pan_pixels(&mut self, delta: egui::Vec2) {
        let scale = self.scale();
        self.center[0] -= delta.x as f64 / scale;
        self.center[1] -= delta.y as f64 / scale;
        // Manual pan cancels any in-flight fly-to
        self.target = None;
    }

    fn zoom_by(&mut self, steps: f64) {
        self.zoom = (self.zoom + steps).clamp(MIN_ZOOM, MAX_ZOOM);
        self.target = None;
    }
}

impl MeshApp {
    pub(super) fn render_map(&mut self, ui: &mut egui::Ui) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        self.camera.tick();
        if response.dragged() {
            self.camera.pan_pixels(response.drag_delta());
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                self.camera.zoom_by(scroll as f64 * 0.01);
            }
        }

        painter.rect_filled(rect, 0.0, colors::BG_PRIMARY);

        self.paint_neighbor_links(&painter, rect);
        self.paint_history_trail(&painter, rect);
        let clicked = self.paint_nodes(&painter, rect, &response);

        if self.projection.nodes.is_empty() {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "waiting for nodes",
                egui::FontId::proportional(13.0),
                colors::TEXT_MUTED,
            );
        }

        if let Some(id) = clicked {
            self.select_node(&id);
        }
    }

    fn paint_neighbor_links(&self, painter: &egui::Painter, rect: egui::Rect) {
        for feature in &self.projection.neighbors.features {
            let Geometry::LineString { coordinates } = &feature.geometry else {
                continue;
            };
            let Some((from, to)) = coordinates.first().zip(coordinates.last()) else {
                continue;
            };
            if from.len() < 2 || to.len() < 2 {
                continue;
            }
            let a = self.camera.to_screen(lon_lat_to_world(from[0], from[1]), rect);
            let b = self.camera.to_screen(lon_lat_to_world(to[0], to[1]), rect);
            let snr = feature
                .properties
                .get("snr")
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            painter.line_segment([a, b], egui::Stroke::new(1.5, snr_color(snr)));
        }
    }

    fn paint_history_trail(&self, painter: &egui::Painter, rect: egui::Rect) {
        let Some(history) = self.history.positions() else {
            return;
        };
        let points: Vec<egui::Pos2> = history
            .features
            .iter()
            .filter_map(|f| f.point_coordinates())
            .map(|c| self.camera.to_screen(lon_lat_to_world(c[0], c[1]), rect))
            .collect();
        for pair in points.windows(2) {
            painter.line_segment(
                [pair[0], pair[1]],
                egui::Stroke::new(1.0, colors::HISTORY_TRAIL),
            );
        }
        for point in &points {
            painter.circle_filled(*point, 2.5, colors::HISTORY_TRAIL);
        }
    }

    /// Paint node symbols and hit-test a click. Returns the id of the
    /// closest node within the hit radius, if any.
    fn paint_nodes(
        &self,
        painter: &egui::Painter,
        rect: egui::Rect,
        response: &egui::Response,
    ) -> Option<String> {
        let selected = self.selection.selected();
        let click_pos = if response.clicked() {
            response.interact_pointer_pos()
        } else {
            None
        };
        let mut best: Option<(f32, String)> = None;

        for feature in &self.projection.nodes.features {
            let Some(coords) = feature.point_coordinates() else {
                continue;
            };
            let Some(id) = feature.id() else {
                continue;
            };
            let pos = self
                .camera
                .to_screen(lon_lat_to_world(coords[0], coords[1]), rect);
            if !rect.expand(20.0).contains(pos) {
                continue;
            }

            let status = self.status_of(id);
            let is_selected = selected == Some(id);

            // Recency ring fades out across the activity window
            if let Some(&age) = self.highlight_ages.get(id) {
                let alpha =
                    (255.0 * (1.0 - age / ACTIVITY_WINDOW_SECS)).clamp(0.0, 255.0) as u8;
                let ring = colors::HIGHLIGHT.gamma_multiply(alpha as f32 / 255.0);
                painter.circle_stroke(pos, 9.0, egui::Stroke::new(2.0, ring));
            }

            let fill = if status.is_old {
                colors::NODE_STALE
            } else if status.is_online {
                colors::NODE_ONLINE
            } else {
                colors::NODE_OFFLINE
            };
            let radius = if is_selected { 6.0 } else { 4.0 };
            painter.circle_filled(pos, radius, fill);
            if is_selected {
                painter.circle_stroke(
                    pos,
                    radius + 2.5,
                    egui::Stroke::new(2.0, colors::SELECTION),
                );
            }

            if self.camera.zoom() >= LABEL_ZOOM {
                let label = feature
                    .properties
                    .get("display_name")
                    .and_then(Value::as_str)
                    .unwrap_or(id);
                painter.text(
                    pos + egui::vec2(8.0, -8.0),
                    egui::Align2::LEFT_BOTTOM,
                    label,
                    egui::FontId::proportional(11.0),
                    colors::TEXT_SECONDARY,
                );
            }

            if let Some(click) = click_pos {
                let dist = click.distance(pos);
                let closer = best.as_ref().map_or(true, |(d, _)| dist < *d);
                if dist <= HIT_RADIUS_PX && closer {
                    best = Some((dist, id.to_string()));
                }
            }
        }

        best.map(|(_, id)| id)
    }
}
