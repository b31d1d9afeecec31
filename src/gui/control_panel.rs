//! Control Panel Widget
//! Left side panel with the selection controls of the active tab and export.

use crate::charts::{ChartFactory, ChartPlotter};
use crate::dashboard::{Dashboard, PowerView, SelectionState, Tab};
use crate::data::{PlayerId, RadialMetric};
use egui::{Color32, ComboBox, RichText, ScrollArea};

const LABEL_WIDTH: f32 = 90.0;
const COMBO_WIDTH: f32 = 180.0;

/// Left side control panel.
pub struct ControlPanel {
    pub progress: f32,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            progress: 0.0,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control panel. Selection edits are written straight into
    /// `selection` and reported as `SelectionChanged`.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        dashboard: &Dashboard,
        selection: &mut SelectionState,
        exporting: bool,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // ===== Data Section =====
        ui.label(RichText::new("📁 Data").size(14.0).strong());
        ui.add_space(5.0);
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let data = dashboard.data();
                for (name, rows) in [
                    ("Aggression", data.aggression.len()),
                    ("Power", data.power.len()),
                    ("Radial profile", data.radial.len()),
                ] {
                    ui.horizontal(|ui| {
                        ui.add_sized([110.0, 16.0], egui::Label::new(name));
                        ui.label(RichText::new(format!("{rows} players")).color(Color32::GRAY));
                    });
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Tab Controls =====
        ui.label(RichText::new("⚙️ Chart Options").size(14.0).strong());
        ui.add_space(5.0);

        match selection.tab {
            Tab::PowerGap => {
                ui.horizontal(|ui| {
                    if ui
                        .radio_value(&mut selection.power_view, PowerView::Gap, "Gap")
                        .changed()
                    {
                        action = ControlPanelAction::SelectionChanged;
                    }
                    if ui
                        .radio_value(&mut selection.power_view, PowerView::Scatter, "SLG vs xSLG")
                        .changed()
                    {
                        action = ControlPanelAction::SelectionChanged;
                    }
                });
                if selection.power_view == PowerView::Gap {
                    ui.label(
                        RichText::new(format!(
                            "Top {} hitters by |xSLG - SLG|",
                            dashboard.settings().power_gap_top_n
                        ))
                        .size(11.0)
                        .color(Color32::GRAY),
                    );
                }
            }
            Tab::HitterAggression => {
                ui.label(
                    RichText::new(format!(
                        "Top {} hitters by plate appearances",
                        dashboard.settings().aggression_top_n
                    ))
                    .size(11.0)
                    .color(Color32::GRAY),
                );
            }
            Tab::HitterProfile => {
                if Self::show_profile_controls(ui, dashboard, selection) {
                    action = ControlPanelAction::SelectionChanged;
                }
                ui.add_space(10.0);
                if let Some(a) = Self::show_compared_players(ui, dashboard, selection) {
                    action = a;
                }
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(!exporting, |ui| {
                let button = egui::Button::new(RichText::new("📄 Export Charts").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportCharts;
                }
            });
        });

        ui.add_space(10.0);
        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(exporting),
        );
        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Player and density metric selectors. Returns true on change.
    fn show_profile_controls(
        ui: &mut egui::Ui,
        dashboard: &Dashboard,
        selection: &mut SelectionState,
    ) -> bool {
        let mut changed = false;
        let roster = dashboard.roster();
        let current = selection
            .player
            .clone()
            .or_else(|| roster.first().cloned())
            .unwrap_or_default();

        ui.horizontal(|ui| {
            ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Player:"));
            ComboBox::from_id_salt("profile_player")
                .width(COMBO_WIDTH)
                .selected_text(&current)
                .show_ui(ui, |ui| {
                    ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                        for name in &roster {
                            if ui.selectable_label(current == *name, name).clicked()
                                && current != *name
                            {
                                selection.player = Some(name.clone());
                                changed = true;
                            }
                        }
                    });
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Density of:"));
            ComboBox::from_id_salt("density_metric")
                .width(COMBO_WIDTH)
                .selected_text(selection.density_metric.label())
                .show_ui(ui, |ui| {
                    for metric in RadialMetric::ALL {
                        if ui
                            .selectable_value(&mut selection.density_metric, metric, metric.label())
                            .changed()
                        {
                            changed = true;
                        }
                    }
                });
        });

        changed
    }

    fn show_compared_players(
        ui: &mut egui::Ui,
        dashboard: &Dashboard,
        selection: &SelectionState,
    ) -> Option<ControlPanelAction> {
        let mut action = None;

        ui.label(RichText::new("Compared players").strong());
        if selection.compared_players.is_empty() {
            ui.label(
                RichText::new("Click a rug tick on the density chart to add a player.")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
            return None;
        }

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                for &id in &selection.compared_players {
                    ui.horizontal(|ui| {
                        if let Some(rgb) = ChartFactory::marker_color(&selection.compared_players, id)
                        {
                            let (rect, _) = ui
                                .allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                            ui.painter().rect_filled(rect, 2.0, ChartPlotter::color(rgb));
                        }
                        ui.label(dashboard.player_name(id));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("✖").clicked() {
                                action = Some(ControlPanelAction::RemoveComparedPlayer(id));
                            }
                        });
                    });
                }
            });

        ui.add_space(5.0);
        if ui.small_button("Clear All").clicked() {
            action = Some(ControlPanelAction::ClearComparedPlayers);
        }
        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectionChanged,
    RemoveComparedPlayer(PlayerId),
    ClearComparedPlayers,
    ExportCharts,
}
