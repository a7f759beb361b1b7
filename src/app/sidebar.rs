//! Sidebar node list: online summary, staleness filter, per-node rows

use eframe::egui;

use crate::core::relative_time_string;
use crate::theme::colors;
use crate::time::now_seconds;

use super::MeshApp;

impl MeshApp {
    pub(super) fn render_sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("sidebar")
            .resizable(true)
            .default_width(260.0)
            .min_width(180.0)
            .frame(
                egui::Frame::new()
                    .fill(colors::BG_PRIMARY)
                    .inner_margin(8.0),
            )
            .show(ctx, |ui| {
                let summary = self.summary;
                ui.label(
                    egui::RichText::new(format!(
                        "{} of {} nodes online",
                        summary.online_nodes, summary.num_nodes
                    ))
                    .color(colors::TEXT_PRIMARY)
                    .size(13.0),
                );

                ui.add_space(4.0);
                self.render_filter(ui);
                ui.add_space(4.0);
                ui.separator();

                let now = now_seconds();
                let views = self.store.views(&self.statuses, self.selection.selected());
                let mut clicked: Option<String> = None;

                egui::ScrollArea::vertical().show(ui, |ui| {
                    for view in &views {
                        let status = self.status_of(&view.id);

                        let dot_color = if status.is_old {
                            colors::NODE_STALE
                        } else if status.is_online {
                            colors::NODE_ONLINE
                        } else {
                            colors::NODE_OFFLINE
                        };
                        let text_color = if status.is_old {
                            colors::TEXT_MUTED
                        } else {
                            colors::TEXT_PRIMARY
                        };

                        let record = self.store.get(&view.id);
                        let name = record
                            .and_then(|r| r.display_name.as_deref())
                            .unwrap_or(view.id.as_str());
                        let heard = match record.and_then(|r| r.last_heard) {
                            Some(t) => relative_time_string(t, now),
                            None => "unknown".to_string(),
                        };

                        ui.horizontal(|ui| {
                            let (dot_rect, _) = ui
                                .allocate_exact_size(egui::vec2(8.0, 8.0), egui::Sense::hover());
                            ui.painter()
                                .circle_filled(dot_rect.center(), 3.0, dot_color);

                            let label = ui.selectable_label(
                                view.selected,
                                egui::RichText::new(name).color(text_color).size(12.0),
                            );
                            if label.clicked() {
                                clicked = Some(view.id.clone());
                            }

                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    ui.label(
                                        egui::RichText::new(heard)
                                            .color(colors::TEXT_MUTED)
                                            .size(10.0),
                                    );
                                },
                            );
                        });
                    }

                    if views.is_empty() {
                        ui.label(
                            egui::RichText::new("No nodes yet")
                                .color(colors::TEXT_MUTED)
                                .size(11.0),
                        );
                    }
                });

                if let Some(id) = clicked {
                    self.select_node(&id);
                }
            });
    }
}
