//! QualSteam Viewer Main Application
//! Sidebar with dataset selection, central four-panel trial chart.

use crate::charts::{RenderError, StaticChartRenderer, EXPORT_WIDTH};
use crate::config::AppConfig;
use crate::data::DatasetLocator;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::pipeline::{self, TrialView};
use egui::SidePanel;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
enum ExportError {
    #[error("Nothing to export")]
    NoChart,
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize chart: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main application window.
pub struct TrialViewerApp {
    config: AppConfig,
    locator: DatasetLocator,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl TrialViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());

        let locator = config.locator();
        let control_panel = ControlPanel::new(locator.describe(), locator.is_rescannable());
        let mut app = Self {
            config,
            locator,
            control_panel,
            chart_viewer: ChartViewer::new(),
        };

        app.refresh_datasets();
        // Start on the first listed dataset.
        if let Some(first) = app.control_panel.datasets.first().cloned() {
            app.control_panel.selected = Some(first.clone());
            app.load_dataset(&first);
        }
        app
    }

    fn refresh_datasets(&mut self) {
        match self.locator.list() {
            Ok(names) => {
                let count = names.len();
                self.control_panel.update_datasets(names);
                if self.control_panel.selected.is_none() {
                    self.chart_viewer.clear();
                }
                self.control_panel
                    .set_status(format!("{count} dataset(s) available"));
            }
            Err(e) => {
                warn!(error = %e, "dataset listing failed");
                self.control_panel.update_datasets(Vec::new());
                self.chart_viewer.clear();
                self.control_panel.set_error(format!("Error: {e}"));
            }
        }
    }

    /// Run one full pass; any failure replaces the chart with the error.
    fn load_dataset(&mut self, dataset: &str) {
        match pipeline::run_pass(&self.locator, dataset, &self.config) {
            Ok(view) => {
                self.control_panel.set_status(view.status_line());
                self.control_panel.export_enabled = true;
                self.chart_viewer.set_view(view);
            }
            Err(e) => {
                warn!(dataset, error = %e, "render pass failed");
                self.control_panel.set_error(format!("Error: {e}"));
                self.control_panel.export_enabled = false;
                self.chart_viewer.set_error(e.to_string());
            }
        }
    }

    fn finish_export(&mut self, result: Result<Option<PathBuf>, ExportError>) {
        match result {
            Ok(Some(path)) => {
                self.control_panel
                    .set_status(format!("Exported {}", path.display()));
                if self.control_panel.open_after_export {
                    if let Err(e) = open::that(&path) {
                        warn!(error = %e, "could not open exported file");
                    }
                }
            }
            Ok(None) => {} // User cancelled
            Err(e) => self.control_panel.set_error(format!("Export error: {e}")),
        }
    }

    fn export_png(&self) -> Result<Option<PathBuf>, ExportError> {
        let view = self.chart_viewer.view().ok_or(ExportError::NoChart)?;
        let Some(path) = save_dialog(view, "PNG Image", "png") else {
            return Ok(None);
        };
        StaticChartRenderer::render_png(
            &view.chart,
            &view.heading,
            &view.subtitle,
            &path,
            EXPORT_WIDTH,
        )?;
        Ok(Some(path))
    }

    fn export_json(&self) -> Result<Option<PathBuf>, ExportError> {
        let view = self.chart_viewer.view().ok_or(ExportError::NoChart)?;
        let Some(path) = save_dialog(view, "JSON", "json") else {
            return Ok(None);
        };
        std::fs::write(&path, view.to_json()?)?;
        info!(path = %path.display(), "chart spec exported");
        Ok(Some(path))
    }
}

fn save_dialog(view: &TrialView, filter: &str, extension: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter(filter, &[extension])
        .set_file_name(export_file_name(&view.dataset, extension))
        .save_file()
}

/// `15-11_clean.csv` → `15-11_clean.png`
fn export_file_name(dataset: &str, extension: &str) -> String {
    let stem = Path::new(dataset)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("trial");
    format!("{stem}.{extension}")
}

impl eframe::App for TrialViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::SelectDataset(name) => self.load_dataset(&name),
                        ControlPanelAction::Refresh => self.refresh_datasets(),
                        ControlPanelAction::ExportPng => {
                            let result = self.export_png();
                            self.finish_export(result);
                        }
                        ControlPanelAction::ExportJson => {
                            let result = self.export_json();
                            self.finish_export(result);
                        }
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
