//! Dark map theme and status palette

use egui::Color32;

pub mod colors {
    use super::Color32;

    // === Backgrounds ===
    pub const BG_PRIMARY: Color32 = Color32::from_rgb(10, 12, 14);
    pub const BG_ELEVATED: Color32 = Color32::from_rgb(18, 21, 24);
    pub const BG_HOVER: Color32 = Color32::from_rgb(30, 34, 38);

    // === Text ===
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(235, 235, 235);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 160, 160);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(90, 90, 90);

    // === Lines & Borders ===
    pub const BORDER: Color32 = Color32::from_rgb(42, 46, 50);

    // === Node status ===
    pub const NODE_ONLINE: Color32 = Color32::from_rgb(100, 200, 100);
    pub const NODE_OFFLINE: Color32 = Color32::from_rgb(200, 100, 100);
    pub const NODE_STALE: Color32 = Color32::from_rgb(90, 90, 90);

    // === Map accents ===
    pub const SELECTION: Color32 = Color32::from_rgb(255, 200, 80);
    pub const HIGHLIGHT: Color32 = Color32::from_rgb(255, 255, 255);
    pub const HISTORY_TRAIL: Color32 = Color32::from_rgb(120, 170, 255);
}

/// Link color from signal quality: poor SNR reads red, good reads green.
pub fn snr_color(snr: f64) -> Color32 {
    let t = ((snr + 20.0) / 30.0).clamp(0.0, 1.0) as f32;
    let r = (220.0 * (1.0 - t) + 90.0 * t) as u8;
    let g = (90.0 * (1.0 - t) + 200.0 * t) as u8;
    Color32::from_rgba_unmultiplied(r, g, 80, 180)
}

/// Dark egui Visuals matching the map canvas.
pub fn map_visuals() -> egui::Visuals {
    use colors::*;

    let mut visuals = egui::Visuals::dark();

    visuals.panel_fill = BG_PRIMARY;
    visuals.window_fill = BG_PRIMARY;
    visuals.extreme_bg_color = BG_PRIMARY;
    visuals.faint_bg_color = BG_ELEVATED;

    visuals.override_text_color = Some(TEXT_PRIMARY);

    visuals.widgets.noninteractive.bg_fill = BG_PRIMARY;
    visuals.widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, TEXT_MUTED);
    visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, BORDER);

    visuals.widgets.inactive.bg_fill = BG_PRIMARY;
    visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, BORDER);
    visuals.widgets.inactive.weak_bg_fill = BG_PRIMARY;

    visuals.widgets.hovered.bg_fill = BG_ELEVATED;
    visuals.widgets.hovered.fg_stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, TEXT_MUTED);
    visuals.widgets.hovered.weak_bg_fill = BG_ELEVATED;

    visuals.widgets.active.bg_fill = BG_HOVER;
    visuals.widgets.active.fg_stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.active.bg_stroke = egui::Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.active.weak_bg_fill = BG_HOVER;

    visuals.selection.bg_fill = Color32::from_rgb(60, 60, 60);
    visuals.selection.stroke = egui::Stroke::new(1.0, SELECTION);

    visuals.hyperlink_color = TEXT_PRIMARY;

    visuals.window_shadow = egui::Shadow::NONE;
    visuals.popup_shadow = egui::Shadow::NONE;

    visuals
}
