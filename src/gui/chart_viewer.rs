//! Chart Viewer Widget
//! Central scrollable panel drawing the charts of the active tab as cards.
//! Cards wrap into as many columns as the width allows.

use crate::charts::{ChartKind, ChartPlotter, ChartSpec};
use crate::data::PlayerId;
use egui::{Color32, RichText, ScrollArea};

const CHART_SPACING: f32 = 15.0;
const CHART_HEIGHT: f32 = 520.0;
const MIN_CARD_WIDTH: f32 = 560.0;
const CARD_BORDER: Color32 = Color32::from_rgb(0, 92, 92);
const ERROR_BORDER: Color32 = Color32::from_rgb(220, 53, 69);

/// Scrollable chart display area.
#[derive(Default)]
pub struct ChartViewer {
    /// Header shown above the cards.
    pub header: String,
    /// One entry per card; failed charts keep their error message.
    pub charts: Vec<Result<ChartSpec, String>>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_charts(&mut self, header: &str, charts: Vec<Result<ChartSpec, String>>) {
        self.header = header.to_string();
        self.charts = charts;
    }

    /// Draw every chart card. Returns the player whose rug tick was clicked.
    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<PlayerId> {
        ui.label(RichText::new(&self.header).size(20.0).strong());
        ui.add_space(8.0);

        if self.charts.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return None;
        }

        let avail_width = ui.available_width();
        let num_columns = ((avail_width / (MIN_CARD_WIDTH + CHART_SPACING)).floor() as usize)
            .clamp(1, self.charts.len());
        let card_width = (avail_width - CHART_SPACING * num_columns as f32) / num_columns as f32;

        let mut clicked = None;
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for row in self.charts.chunks(num_columns) {
                    ui.horizontal_top(|ui| {
                        for card in row {
                            match card {
                                Ok(spec) => {
                                    if let Some(id) = Self::draw_chart_card(ui, spec, card_width) {
                                        clicked = Some(id);
                                    }
                                }
                                Err(message) => Self::draw_error_card(ui, message, card_width),
                            }
                            ui.add_space(CHART_SPACING);
                        }
                    });
                    ui.add_space(CHART_SPACING);
                }
            });
        clicked
    }

    fn draw_chart_card(ui: &mut egui::Ui, spec: &ChartSpec, width: f32) -> Option<PlayerId> {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(2.0, CARD_BORDER))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(width - 28.0);
                ui.vertical(|ui| {
                    ui.label(
                        RichText::new(&spec.title)
                            .size(16.0)
                            .strong()
                            .color(CARD_BORDER),
                    );
                    if let ChartKind::Density { bandwidth, .. } = &spec.kind {
                        ui.label(
                            RichText::new(format!("bandwidth {bandwidth:.3}"))
                                .size(11.0)
                                .color(Color32::GRAY),
                        );
                    }
                    ui.add_space(6.0);
                    ChartPlotter::draw_chart(ui, spec, CHART_HEIGHT)
                })
                .inner
            })
            .inner
    }

    fn draw_error_card(ui: &mut egui::Ui, message: &str, width: f32) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(2.0, ERROR_BORDER))
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(width - 28.0);
                ui.label(
                    RichText::new(format!("⚠ {message}"))
                        .size(15.0)
                        .color(ERROR_BORDER),
                );
            });
    }
}
