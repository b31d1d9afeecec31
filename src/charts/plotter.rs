//! Chart Plotter Module
//! Draws chart specifications as interactive egui_plot charts.

use crate::charts::palette::{self, Rgb};
use crate::charts::spec::{
    polar_to_cartesian, polar_wedge, wedge_center_angle, Axis, ChartKind, ChartSpec, ColorScale,
    LollipopRow, LollipopSeries, PlayerMarker, PolarBar, RugMark, ScatterPoint,
};
use crate::data::PlayerId;
use egui::{Color32, RichText, Stroke};
use egui_plot::{
    Corner, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text,
};

/// Radii of the reference rings on the polar chart.
const POLAR_RINGS: [f64; 4] = [0.25, 0.5, 0.75, 1.0];
/// Rug tick length relative to the density peak.
const RUG_TICK: f64 = 0.04;
/// Click tolerance on the rug, as a share of the visible x range.
const RUG_CLICK_TOLERANCE: f64 = 0.01;

/// Creates interactive charts from specifications using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn color(rgb: Rgb) -> Color32 {
        Color32::from_rgb(rgb.0, rgb.1, rgb.2)
    }

    /// Draw any chart. Returns the player whose rug tick was clicked, if any.
    pub fn draw_chart(ui: &mut egui::Ui, spec: &ChartSpec, height: f32) -> Option<PlayerId> {
        match &spec.kind {
            ChartKind::Scatter {
                x_axis,
                y_axis,
                color_scale,
                size_label,
                points,
            } => {
                Self::draw_scatter(ui, spec, x_axis, y_axis, points, height);
                Self::draw_color_legend(ui, color_scale, size_label);
                None
            }
            ChartKind::Lollipop {
                x_axis,
                actual,
                expected,
                rows,
            } => {
                Self::draw_lollipop(ui, spec, x_axis, actual, expected, rows, height);
                None
            }
            ChartKind::PolarBar { bars, .. } => {
                Self::draw_polar(ui, spec, bars, height);
                None
            }
            ChartKind::Density { .. } => Self::draw_density(ui, spec, height),
        }
    }

    /// Scatter with one marker per player; color and size carry two more metrics.
    fn draw_scatter(
        ui: &mut egui::Ui,
        spec: &ChartSpec,
        x_axis: &Axis,
        y_axis: &Axis,
        points: &[ScatterPoint],
        height: f32,
    ) {
        Plot::new(format!("scatter_{:?}", spec.id))
            .height(height)
            .x_axis_label(x_axis.label.clone())
            .y_axis_label(y_axis.label.clone())
            .include_x(x_axis.min)
            .include_x(x_axis.max)
            .include_y(y_axis.min)
            .include_y(y_axis.max)
            .allow_scroll(false)
            .label_formatter(|name, value| {
                if name.is_empty() {
                    format!("{:.3}, {:.3}", value.x, value.y)
                } else {
                    format!("{}\n{:.3}, {:.3}", name, value.x, value.y)
                }
            })
            .show(ui, |plot_ui| {
                for p in points {
                    plot_ui.points(
                        Points::new(PlotPoints::new(vec![[p.x, p.y]]))
                            .radius(p.radius)
                            .color(Self::color(p.color).gamma_multiply(0.85))
                            .filled(true)
                            .name(format!(
                                "{} (HH {:.1}%, Brl {:.1}%)",
                                p.player_name, p.color_value, p.size_value
                            )),
                    );
                }
            });
    }

    /// Horizontal gradient bar explaining the color channel.
    pub fn draw_color_legend(ui: &mut egui::Ui, scale: &ColorScale, size_label: &str) {
        const STEPS: usize = 40;
        const WIDTH: f32 = 200.0;

        ui.horizontal(|ui| {
            ui.label(RichText::new(&scale.label).size(11.0));
            ui.label(RichText::new(format!("{:.1}", scale.min)).size(11.0));
            let (rect, _) = ui.allocate_exact_size(egui::vec2(WIDTH, 12.0), egui::Sense::hover());
            let step_w = WIDTH / STEPS as f32;
            for i in 0..STEPS {
                let t = i as f64 / (STEPS - 1) as f64;
                let slice = egui::Rect::from_min_size(
                    rect.min + egui::vec2(i as f32 * step_w, 0.0),
                    egui::vec2(step_w + 0.5, rect.height()),
                );
                ui.painter()
                    .rect_filled(slice, 0.0, Self::color(palette::colorscale(t)));
            }
            ui.label(RichText::new(format!("{:.1}", scale.max)).size(11.0));
            ui.add_space(12.0);
            ui.label(
                RichText::new(format!("Marker size: {}", size_label))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
    }

    /// Lollipop chart: player names on Y, actual and expected values joined by a segment.
    fn draw_lollipop(
        ui: &mut egui::Ui,
        spec: &ChartSpec,
        x_axis: &Axis,
        actual: &LollipopSeries,
        expected: &LollipopSeries,
        rows: &[LollipopRow],
        height: f32,
    ) {
        let n = rows.len();
        // Top row first: row i sits at y = n - 1 - i.
        let y_of = |i: usize| (n - 1 - i) as f64;
        let names: Vec<String> = rows.iter().rev().map(|r| r.player_name.clone()).collect();

        Plot::new(format!("lollipop_{:?}", spec.id))
            .height(height)
            .x_axis_label(x_axis.label.clone())
            .include_x(x_axis.min)
            .include_x(x_axis.max)
            .include_y(-0.5)
            .include_y(n as f64 - 0.5)
            .allow_scroll(false)
            .legend(Legend::default().position(Corner::RightBottom))
            .y_grid_spacer(move |_input| {
                (0..n)
                    .map(|i| GridMark {
                        value: i as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .y_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (idx as usize) < names.len() && (mark.value - idx).abs() < 1e-6 {
                    names[idx as usize].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                let connector = Self::color(palette::CONNECTOR_COLOR);
                for (i, r) in rows.iter().enumerate() {
                    let y = y_of(i);
                    plot_ui.line(
                        Line::new(PlotPoints::new(vec![[r.actual, y], [r.expected, y]]))
                            .color(connector)
                            .width(2.0),
                    );
                }

                let series = |select: fn(&LollipopRow) -> f64| -> PlotPoints {
                    rows.iter()
                        .enumerate()
                        .map(|(i, r)| [select(r), y_of(i)])
                        .collect()
                };
                plot_ui.points(
                    Points::new(series(|r| r.actual))
                        .radius(5.0)
                        .filled(true)
                        .color(Self::color(actual.color))
                        .name(&actual.name),
                );
                plot_ui.points(
                    Points::new(series(|r| r.expected))
                        .radius(5.0)
                        .filled(true)
                        .color(Self::color(expected.color))
                        .name(&expected.name),
                );
            });
    }

    /// Polar bar chart drawn on an equal-aspect plane.
    fn draw_polar(ui: &mut egui::Ui, spec: &ChartSpec, bars: &[PolarBar], height: f32) {
        let count = bars.len();

        Plot::new(format!("polar_{:?}", spec.id))
            .height(height)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_x(-1.35)
            .include_x(1.35)
            .include_y(-1.35)
            .include_y(1.35)
            .legend(Legend::default().position(Corner::RightBottom))
            .show(ui, |plot_ui| {
                let ring = Color32::from_gray(190);
                for r in POLAR_RINGS {
                    let circle: PlotPoints = (0..=72)
                        .map(|s| {
                            polar_to_cartesian(r, s as f64 / 72.0 * std::f64::consts::TAU)
                        })
                        .collect();
                    plot_ui.line(Line::new(circle).color(ring).width(0.5));
                }

                for (i, bar) in bars.iter().enumerate() {
                    let color = Self::color(bar.color);
                    let outline = polar_wedge(i, count, bar.radius, 24);
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(outline))
                            .fill_color(color.gamma_multiply(0.55))
                            .stroke(Stroke::new(1.0, color))
                            .name(format!(
                                "{}: {:.2} ({:.0}th pct)",
                                bar.label,
                                bar.raw_value,
                                bar.radius * 100.0
                            )),
                    );

                    let [x, y] = polar_to_cartesian(1.18, wedge_center_angle(i, count));
                    plot_ui.text(Text::new(
                        PlotPoint::new(x, y),
                        RichText::new(&bar.label).size(11.0),
                    ));
                }
            });
    }

    /// Density curve with a clickable rug and one vertical line per compared player.
    fn draw_density(ui: &mut egui::Ui, spec: &ChartSpec, height: f32) -> Option<PlayerId> {
        let ChartKind::Density {
            x_axis,
            y_axis,
            curve,
            rug,
            markers,
            ..
        } = &spec.kind
        else {
            return None;
        };
        let tick = y_axis.max * RUG_TICK;

        let response = Plot::new(format!("density_{:?}", spec.id))
            .height(height)
            .x_axis_label(x_axis.label.clone())
            .y_axis_label(y_axis.label.clone())
            .include_x(x_axis.min)
            .include_x(x_axis.max)
            .include_y(-2.0 * tick)
            .include_y(y_axis.max * 1.05)
            .allow_scroll(false)
            .legend(Legend::default().position(Corner::RightTop))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::new(curve.clone()))
                        .color(Self::color(palette::CURVE_COLOR))
                        .width(2.0)
                        .fill(0.0),
                );

                Self::draw_rug(plot_ui, rug, tick);
                Self::draw_markers(plot_ui, markers, y_axis.max);

                if plot_ui.response().clicked() {
                    let tolerance = plot_ui.plot_bounds().width() * RUG_CLICK_TOLERANCE;
                    plot_ui
                        .pointer_coordinate()
                        .and_then(|p| spec.nearest_rug_mark(p.x, tolerance))
                        .map(|m| m.player_id)
                } else {
                    None
                }
            });

        response.inner
    }

    fn draw_rug(plot_ui: &mut egui_plot::PlotUi, rug: &[RugMark], tick: f64) {
        let color = Self::color(palette::CURVE_COLOR);
        for m in rug {
            plot_ui.line(
                Line::new(PlotPoints::new(vec![[m.x, 0.0], [m.x, -tick]]))
                    .color(color)
                    .width(1.0),
            );
        }
    }

    fn draw_markers(plot_ui: &mut egui_plot::PlotUi, markers: &[PlayerMarker], y_max: f64) {
        for m in markers {
            plot_ui.line(
                Line::new(PlotPoints::new(vec![[m.x, 0.0], [m.x, y_max]]))
                    .color(Self::color(m.color))
                    .width(1.5)
                    .name(&m.player_name),
            );
        }
    }
}
