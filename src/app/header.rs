//! Header bar: connection status, node counters, fps

use eframe::egui;

use crate::theme::colors;
use crate::time::now_seconds;
use crate::ws_state::WsState;

use super::MeshApp;

impl MeshApp {
    pub(super) fn render_header(&mut self, ui: &mut egui::Ui) {
        self.fps_counter.tick();

        let ws_state = self.get_ws_state();
        let summary = self.summary;

        ui.horizontal(|ui| {
            // Connection status indicator
            let (status_color, status_text) = match &ws_state {
                WsState::Connected => (colors::NODE_ONLINE, "Connected"),
                WsState::Connecting => (egui::Color32::from_rgb(200, 200, 100), "Connecting..."),
                WsState::Disconnected => (colors::NODE_OFFLINE, "Disconnected"),
                WsState::Error(_) => (colors::NODE_OFFLINE, "Error"),
            };

            ui.colored_label(status_color, egui::RichText::new(status_text).size(11.0));

            ui.add_space(10.0);

            ui.label(
                egui::RichText::new(format!("{:.0} fps", self.fps_counter.fps()))
                    .color(colors::TEXT_SECONDARY)
                    .monospace()
                    .size(11.0),
            );

            ui.label(
                egui::RichText::new("/")
                    .color(colors::TEXT_MUTED)
                    .size(11.0),
            );

            ui.label(
                egui::RichText::new(format!("{} nodes", self.store.len()))
                    .color(colors::TEXT_MUTED)
                    .monospace()
                    .size(11.0),
            );

            ui.label(
                egui::RichText::new("/")
                    .color(colors::TEXT_MUTED)
                    .size(11.0),
            );

            ui.label(
                egui::RichText::new(format!("{} links", self.projection.neighbors.len()))
                    .color(colors::TEXT_MUTED)
                    .monospace()
                    .size(11.0),
            );

            ui.label(
                egui::RichText::new("/")
                    .color(colors::TEXT_MUTED)
                    .size(11.0),
            );

            ui.label(
                egui::RichText::new(format!(
                    "{} of {} online",
                    summary.online_nodes, summary.num_nodes
                ))
                .color(colors::TEXT_MUTED)
                .monospace()
                .size(11.0),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new("MESH MAP")
                        .color(colors::TEXT_PRIMARY)
                        .size(12.0),
                );
            });
        });
    }
}

/// Simple FPS counter over the last 60 frames
pub struct FpsCounter {
    frames: Vec<f64>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frames: Vec::with_capacity(60),
        }
    }

    pub fn tick(&mut self) {
        let now = now_seconds() * 1000.0;
        self.frames.push(now);
        if self.frames.len() > 60 {
            self.frames.remove(0);
        }
    }

    pub fn fps(&self) -> f64 {
        if self.frames.len() < 2 {
            return 0.0;
        }
        let (Some(last), Some(first)) = (self.frames.last(), self.frames.first()) else {
            return 0.0;
        };
        let elapsed = last - first;
        if elapsed == 0.0 {
            return 0.0;
        }
        (self.frames.len() as f64 - 1.0) / (elapsed / 1000.0)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
