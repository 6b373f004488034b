//! Chart Viewer Widget
//! Central panel showing the heading and the four stacked trial panels.

use crate::charts::ChartPlotter;
use crate::pipeline::TrialView;
use egui::{Color32, RichText, ScrollArea};

const MIN_CHART_HEIGHT: f32 = 600.0;

/// Pass state: `Unloaded → Ready` on success, `Unloaded → Failed` on any error.
pub enum ViewState {
    Unloaded,
    Ready(Box<TrialView>),
    Failed(String),
}

pub struct ChartViewer {
    pub state: ViewState,
    /// Re-fit the plots on the next frame.
    reset_view: bool,
}

impl Default for ChartViewer {
    fn default() -> Self {
        Self {
            state: ViewState::Unloaded,
            reset_view: false,
        }
    }
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_view(&mut self, view: TrialView) {
        self.state = ViewState::Ready(Box::new(view));
        self.reset_view = true;
    }

    pub fn set_error(&mut self, message: String) {
        self.state = ViewState::Failed(message);
    }

    pub fn clear(&mut self) {
        self.state = ViewState::Unloaded;
    }

    pub fn view(&self) -> Option<&TrialView> {
        match &self.state {
            ViewState::Ready(view) => Some(&**view),
            _ => None,
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        match &self.state {
            ViewState::Unloaded => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No Data").size(20.0));
                });
            }
            ViewState::Failed(message) => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new(format!("⚠ {message}"))
                            .size(18.0)
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                });
            }
            ViewState::Ready(view) => {
                let reset = self.reset_view;
                ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ChartPlotter::draw_heading(ui, &view.heading, &view.subtitle);
                        ui.add_space(10.0);
                        let height = ui.available_height().max(MIN_CHART_HEIGHT);
                        ChartPlotter::draw_chart(ui, &view.chart, height, reset);
                    });
                self.reset_view = false;
            }
        }
    }
}
