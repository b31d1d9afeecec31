//! Trident Stats Main Application
//! Header with tabs, control panel on the left, chart cards in the center.

use crate::charts::StaticChartRenderer;
use crate::dashboard::{Dashboard, SelectionState, Tab};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::{Color32, RichText, SidePanel, TopBottomPanel};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use tracing::{info, warn};

const HEADER_COLOR: Color32 = Color32::from_rgb(0, 92, 92);

/// Pixel size of exported images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ExportSize {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 1000,
        }
    }
}

/// Export result from background thread
enum ExportResult {
    Complete { dir: PathBuf, files: usize },
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    dashboard: Dashboard,
    title: String,
    export_size: ExportSize,

    selection: SelectionState,
    /// Selection the current charts were built from.
    rendered: Option<SelectionState>,

    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async export
    export_rx: Option<Receiver<ExportResult>>,
    is_exporting: bool,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        dashboard: Dashboard,
        title: String,
        export_size: ExportSize,
    ) -> Self {
        let selection = dashboard.initial_selection();
        Self {
            dashboard,
            title,
            export_size,
            selection,
            rendered: None,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            export_rx: None,
            is_exporting: false,
        }
    }

    /// Rebuild the charts if the selection changed since the last render.
    fn refresh_charts(&mut self) {
        if self.rendered.as_ref() == Some(&self.selection) {
            return;
        }
        let header = self.selection.tab.card_header();
        let cards = self
            .dashboard
            .render_cards(&self.selection)
            .into_iter()
            .map(|card| {
                card.map_err(|e| {
                    warn!(error = %e, tab = ?self.selection.tab, "failed to build chart");
                    e.to_string()
                })
            })
            .collect();
        self.chart_viewer.set_charts(header, cards);
        self.rendered = Some(self.selection.clone());
    }

    fn handle_action(&mut self, action: ControlPanelAction) {
        match action {
            ControlPanelAction::SelectionChanged => self.refresh_charts(),
            ControlPanelAction::RemoveComparedPlayer(id) => {
                self.selection.remove_compared_player(id);
                self.refresh_charts();
            }
            ControlPanelAction::ClearComparedPlayers => {
                self.selection.compared_players.clear();
                self.refresh_charts();
            }
            ControlPanelAction::ExportCharts => self.handle_export(),
            ControlPanelAction::None => {}
        }
    }

    /// Render every chart to a user-chosen folder in a background thread.
    fn handle_export(&mut self) {
        if self.is_exporting {
            return;
        }

        let Some(dir) = rfd::FileDialog::new()
            .set_title("Export charts to folder")
            .pick_folder()
        else {
            return; // User cancelled
        };

        let charts = match self.dashboard.render_all(&self.selection) {
            Ok(charts) => charts,
            Err(e) => {
                warn!(error = %e, "export aborted");
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
                return;
            }
        };

        let (tx, rx) = channel();
        self.export_rx = Some(rx);
        self.is_exporting = true;
        self.control_panel.set_progress(
            10.0,
            &format!("Rendering {} charts...", charts.len()),
        );

        let size = self.export_size;
        thread::spawn(move || {
            let result = match StaticChartRenderer::export_all(&charts, &dir, size.width, size.height)
            {
                Ok(files) => ExportResult::Complete {
                    dir,
                    files: files.len(),
                },
                Err(e) => ExportResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for export results
    fn check_export_results(&mut self) {
        let Some(rx) = self.export_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(ExportResult::Complete { dir, files }) => {
                info!(files, "charts exported to {}", dir.display());
                self.control_panel.set_progress(
                    100.0,
                    &format!("Exported {} files to {}", files, dir.display()),
                );
                if let Err(e) = open::that(&dir) {
                    warn!(error = %e, "could not open export folder");
                }
                self.is_exporting = false;
            }
            Ok(ExportResult::Error(error)) => {
                warn!(%error, "export failed");
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", error));
                self.is_exporting = false;
            }
            // Still running; put receiver back
            Err(std::sync::mpsc::TryRecvError::Empty) => self.export_rx = Some(rx),
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.control_panel
                    .set_progress(0.0, "Error: export thread stopped");
                self.is_exporting = false;
            }
        }
    }

    fn show_header(&mut self, ui: &mut egui::Ui) {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format!("⚾ {}", self.title))
                    .size(22.0)
                    .strong()
                    .color(HEADER_COLOR),
            );
            ui.add_space(30.0);
            for tab in Tab::ALL {
                let text = RichText::new(tab.title()).size(15.0);
                if ui.selectable_value(&mut self.selection.tab, tab, text).changed() {
                    self.refresh_charts();
                }
            }
        });
        ui.add_space(6.0);
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_export_results();
        if self.is_exporting {
            ctx.request_repaint();
        }
        self.refresh_charts();

        TopBottomPanel::top("header").show(ctx, |ui| self.show_header(ui));

        // Left panel - Control Panel
        let action = SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .show(ui, |ui| {
                        self.control_panel.show(
                            ui,
                            &self.dashboard,
                            &mut self.selection,
                            self.is_exporting,
                        )
                    })
                    .inner
            })
            .inner;
        self.handle_action(action);

        // Central panel - Chart Viewer
        let clicked = egui::CentralPanel::default()
            .show(ctx, |ui| self.chart_viewer.show(ui))
            .inner;
        if let Some(id) = clicked {
            if self.dashboard.on_rug_click(&mut self.selection, id) {
                self.refresh_charts();
                ctx.request_repaint();
            }
        }
    }
}
