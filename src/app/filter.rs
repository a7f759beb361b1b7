//! Staleness filter: preset thresholds persisted in localStorage

use eframe::egui;
use tracing::warn;

use crate::core::MaxAge;

use super::MeshApp;

const STORAGE_KEY: &str = "maxAge";

/// Preset thresholds offered in the filter dropdown.
const MARKS: &[(MaxAge, &str)] = &[
    (MaxAge::Minutes(15), "15 min"),
    (MaxAge::Minutes(60), "1 hour"),
    (MaxAge::Minutes(480), "8 hours"),
    (MaxAge::Minutes(1440), "24 hours"),
    (MaxAge::Minutes(4320), "3 days"),
    (MaxAge::Unbounded, "all"),
];

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Load the persisted threshold. An unparseable stored value is removed and
/// the default applies.
pub(super) fn load_max_age() -> MaxAge {
    let Some(storage) = local_storage() else {
        return MaxAge::default();
    };
    match storage.get_item(STORAGE_KEY).ok().flatten() {
        Some(raw) => MaxAge::parse(&raw).unwrap_or_else(|| {
            warn!(raw = %raw, "Removing unparseable stored threshold");
            let _ = storage.remove_item(STORAGE_KEY);
            MaxAge::default()
        }),
        None => MaxAge::default(),
    }
}

pub(super) fn store_max_age(value: MaxAge) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(STORAGE_KEY, &value.storage_value());
    }
}

fn label_for(value: MaxAge) -> &'static str {
    MARKS
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| *label)
        .unwrap_or("custom")
}

impl MeshApp {
    pub(super) fn render_filter(&mut self, ui: &mut egui::Ui) {
        let current = self.max_age;
        let mut selected = current;

        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new("max age")
                    .color(crate::theme::colors::TEXT_MUTED)
                    .size(11.0),
            );
            egui::ComboBox::from_id_salt("max_age_filter")
                .selected_text(label_for(current))
                .show_ui(ui, |ui| {
                    for &(value, label) in MARKS {
                        ui.selectable_value(&mut selected, value, label);
                    }
                });
        });

        if selected != current {
            self.apply_max_age(selected);
        }
    }
}
