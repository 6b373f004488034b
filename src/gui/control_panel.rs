//! Control Panel Widget
//! Left sidebar: dataset selection, exports and status.

use egui::{Color32, ComboBox, RichText};

/// Sidebar state.
pub struct ControlPanel {
    pub source_label: String,
    pub datasets: Vec<String>,
    pub selected: Option<String>,
    pub can_refresh: bool,
    pub export_enabled: bool,
    pub open_after_export: bool,
    pub status: String,
    pub status_is_error: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            source_label: String::new(),
            datasets: Vec::new(),
            selected: None,
            can_refresh: false,
            export_enabled: false,
            open_after_export: true,
            status: "Ready".to_string(),
            status_is_error: false,
        }
    }
}

impl ControlPanel {
    pub fn new(source_label: String, can_refresh: bool) -> Self {
        Self {
            source_label,
            can_refresh,
            ..Self::default()
        }
    }

    /// Replace the dataset list, keeping the selection if it is still listed.
    /// Dropping the selection also disables exports.
    pub fn update_datasets(&mut self, datasets: Vec<String>) {
        if let Some(sel) = &self.selected {
            if !datasets.contains(sel) {
                self.selected = None;
            }
        }
        if self.selected.is_none() {
            self.export_enabled = false;
        }
        self.datasets = datasets;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.add_space(5.0);
        ui.label(RichText::new("Data Selection").size(20.0).strong());
        ui.label(
            RichText::new(&self.source_label)
                .size(11.0)
                .color(Color32::GRAY),
        );
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Dataset Section =====
        ui.label(RichText::new("📁 Select Dataset").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            let selected_text = self
                .selected
                .clone()
                .unwrap_or_else(|| "No dataset selected".to_string());
            ComboBox::from_id_salt("dataset")
                .width(200.0)
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for name in &self.datasets {
                        let is_selected = self.selected.as_deref() == Some(name.as_str());
                        if ui.selectable_label(is_selected, name).clicked() && !is_selected {
                            self.selected = Some(name.clone());
                            action = ControlPanelAction::SelectDataset(name.clone());
                        }
                    }
                });

            if self.can_refresh && ui.button("🔄").on_hover_text("Rescan directory").clicked() {
                action = ControlPanelAction::Refresh;
            }
        });

        if self.datasets.is_empty() {
            ui.label(
                RichText::new("No datasets found")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Section =====
        ui.label(RichText::new("📄 Export").size(14.0).strong());
        ui.add_space(5.0);

        ui.add_enabled_ui(self.export_enabled, |ui| {
            ui.horizontal(|ui| {
                if ui.button("🖼 PNG").clicked() {
                    action = ControlPanelAction::ExportPng;
                }
                if ui.button("{} JSON").clicked() {
                    action = ControlPanelAction::ExportJson;
                }
            });
            ui.checkbox(&mut self.open_after_export, "Open after export");
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        let status_color = if self.status_is_error {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.status = error.into();
        self.status_is_error = true;
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectDataset(String),
    Refresh,
    ExportPng,
    ExportJson,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_keeps_listed_selection() {
        let mut panel = ControlPanel::new("data".into(), true);
        panel.selected = Some("b.csv".into());
        panel.update_datasets(vec!["a.csv".into(), "b.csv".into()]);
        assert_eq!(panel.selected.as_deref(), Some("b.csv"));

        panel.update_datasets(vec!["a.csv".into()]);
        assert_eq!(panel.selected, None);
    }

    #[test]
    fn losing_the_selection_disables_export() {
        let mut panel = ControlPanel::new("data".into(), true);
        panel.selected = Some("b.csv".into());
        panel.export_enabled = true;
        panel.update_datasets(vec!["a.csv".into(), "b.csv".into()]);
        assert!(panel.export_enabled);

        panel.update_datasets(vec!["a.csv".into()]);
        assert!(!panel.export_enabled);
    }

    #[test]
    fn error_status_is_flagged() {
        let mut panel = ControlPanel::default();
        panel.set_error("Dataset unavailable");
        assert!(panel.status_is_error);
        panel.set_status("Loaded 3 rows");
        assert!(!panel.status_is_error);
    }
}
