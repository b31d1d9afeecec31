//! Static Chart Renderer
//! Renders chart specifications to PNG with plotters, for export and reports.
//!
//! Layout per image:
//! 1. Title centered on top
//! 2. Chart area with axes and mesh (polar charts use a square area, no mesh)
//! 3. Series legend where the chart has named series

use crate::charts::palette::{self, Rgb};
use crate::charts::spec::{
    polar_to_cartesian, polar_wedge, wedge_center_angle, ChartKind, ChartSpec,
};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Pixel buffer does not match {0}x{1}")]
    Buffer(u32, u32),
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Draw(e.to_string())
    }
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a chart into an in-memory RGB image.
    pub fn render_image(spec: &ChartSpec, width: u32, height: u32) -> Result<RgbImage, RenderError> {
        let mut buf = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
            root.fill(&WHITE)?;
            Self::draw(&root, spec)?;
            root.present()?;
        }
        RgbImage::from_raw(width, height, buf).ok_or(RenderError::Buffer(width, height))
    }

    /// Render a chart to PNG bytes.
    pub fn render_png_bytes(
        spec: &ChartSpec,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let img = Self::render_image(spec, width, height)?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Write `<stem>.png` and `<stem>.json` for every chart into `dir`.
    pub fn export_all(
        specs: &[ChartSpec],
        dir: &Path,
        width: u32,
        height: u32,
    ) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(specs.len() * 2);

        for spec in specs {
            let stem = spec.id.file_stem();

            let png = dir.join(format!("{stem}.png"));
            Self::render_image(spec, width, height)?.save(&png)?;
            debug!(path = %png.display(), "wrote chart image");
            written.push(png);

            let json = dir.join(format!("{stem}.json"));
            std::fs::write(&json, serde_json::to_string_pretty(spec)?)?;
            written.push(json);
        }

        info!(
            charts = specs.len(),
            files = written.len(),
            "exported charts to {}",
            dir.display()
        );
        Ok(written)
    }

    fn draw(root: &Area<'_>, spec: &ChartSpec) -> Result<(), RenderError> {
        match &spec.kind {
            ChartKind::Scatter { .. } => Self::draw_scatter(root, spec),
            ChartKind::Lollipop { .. } => Self::draw_lollipop(root, spec),
            ChartKind::PolarBar { .. } => Self::draw_polar(root, spec),
            ChartKind::Density { .. } => Self::draw_density(root, spec),
        }
    }

    fn draw_scatter(root: &Area<'_>, spec: &ChartSpec) -> Result<(), RenderError> {
        let ChartKind::Scatter {
            x_axis,
            y_axis,
            color_scale,
            size_label,
            points,
        } = &spec.kind
        else {
            return Ok(());
        };

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, (FONT, 22))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(x_axis.min..x_axis.max, y_axis.min..y_axis.max)?;

        chart
            .configure_mesh()
            .x_desc(x_axis.label.as_str())
            .y_desc(y_axis.label.as_str())
            .light_line_style(RGBColor(235, 235, 235))
            .draw()?;

        chart.draw_series(points.iter().map(|p| {
            // Last name only keeps labels readable.
            let label = p
                .player_name
                .split(',')
                .next()
                .unwrap_or(&p.player_name)
                .to_string();
            EmptyElement::at((p.x, p.y))
                + Circle::new((0, 0), p.radius as i32, rgb(p.color).mix(0.85).filled())
                + Text::new(label, (6, -12), (FONT, 11).into_font())
        }))?;

        root.draw(&Text::new(
            format!(
                "color: {} ({:.1} to {:.1}), size: {}",
                color_scale.label, color_scale.min, color_scale.max, size_label
            ),
            (20, root.dim_in_pixel().1 as i32 - 18),
            (FONT, 12).into_font().color(&RGBColor(90, 90, 90)),
        ))?;
        Ok(())
    }

    fn draw_lollipop(root: &Area<'_>, spec: &ChartSpec) -> Result<(), RenderError> {
        let ChartKind::Lollipop {
            x_axis,
            actual,
            expected,
            rows,
        } = &spec.kind
        else {
            return Ok(());
        };

        let n = rows.len();
        let y_of = |i: usize| (n - 1 - i) as f64;
        let names: Vec<&str> = rows.iter().rev().map(|r| r.player_name.as_str()).collect();
        let name_at = |y: &f64| {
            let idx = y.round();
            if (y - idx).abs() < 1e-6 && idx >= 0.0 && (idx as usize) < names.len() {
                names[idx as usize].to_string()
            } else {
                String::new()
            }
        };

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, (FONT, 22))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(150)
            .build_cartesian_2d(x_axis.min..x_axis.max, -0.5..(n as f64 - 0.5))?;

        chart
            .configure_mesh()
            .x_desc(x_axis.label.as_str())
            .y_labels(n.max(1))
            .y_label_formatter(&name_at)
            .light_line_style(RGBColor(235, 235, 235))
            .draw()?;

        let connector = rgb(palette::CONNECTOR_COLOR);
        chart.draw_series(rows.iter().enumerate().map(|(i, r)| {
            PathElement::new(
                vec![(r.actual, y_of(i)), (r.expected, y_of(i))],
                connector.stroke_width(2),
            )
        }))?;

        for (series, is_expected) in [(actual, false), (expected, true)] {
            let color = rgb(series.color);
            chart
                .draw_series(rows.iter().enumerate().map(|(i, r)| {
                    let x = if is_expected { r.expected } else { r.actual };
                    Circle::new((x, y_of(i)), 5, color.filled())
                }))?
                .label(series.name.as_str())
                .legend(move |(x, y)| Circle::new((x + 8, y), 5, color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }

    fn draw_polar(root: &Area<'_>, spec: &ChartSpec) -> Result<(), RenderError> {
        let ChartKind::PolarBar { bars, .. } = &spec.kind else {
            return Ok(());
        };

        // Square area so rings stay circular.
        let (w, h) = root.dim_in_pixel();
        let side = w.min(h);
        let area = root.clone().shrink(((w - side) / 2, (h - side) / 2), (side, side));

        let mut chart = ChartBuilder::on(&area)
            .caption(&spec.title, (FONT, 22))
            .margin(15)
            .build_cartesian_2d(-1.4..1.4, -1.4..1.4)?;

        let ring = RGBColor(190, 190, 190);
        for r in [0.25, 0.5, 0.75, 1.0] {
            let circle: Vec<(f64, f64)> = (0..=72)
                .map(|s| {
                    let [x, y] = polar_to_cartesian(r, s as f64 / 72.0 * std::f64::consts::TAU);
                    (x, y)
                })
                .collect();
            chart.draw_series(std::iter::once(PathElement::new(circle, ring)))?;
        }

        let count = bars.len();
        for (i, bar) in bars.iter().enumerate() {
            let color = rgb(bar.color);
            let outline: Vec<(f64, f64)> = polar_wedge(i, count, bar.radius, 24)
                .into_iter()
                .map(|[x, y]| (x, y))
                .collect();
            chart.draw_series(std::iter::once(Polygon::new(
                outline.clone(),
                color.mix(0.55).filled(),
            )))?;
            chart.draw_series(std::iter::once(PathElement::new(outline, color)))?;

            let [x, y] = polar_to_cartesian(1.2, wedge_center_angle(i, count));
            chart.draw_series(std::iter::once(Text::new(
                format!("{} {:.2}", bar.label, bar.raw_value),
                (x - 0.2, y),
                (FONT, 12).into_font(),
            )))?;
        }
        Ok(())
    }

    fn draw_density(root: &Area<'_>, spec: &ChartSpec) -> Result<(), RenderError> {
        let ChartKind::Density {
            x_axis,
            y_axis,
            curve,
            rug,
            markers,
            ..
        } = &spec.kind
        else {
            return Ok(());
        };
        let tick = y_axis.max * 0.04;

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, (FONT, 22))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(65)
            .build_cartesian_2d(x_axis.min..x_axis.max, (-2.0 * tick)..(y_axis.max * 1.05))?;

        chart
            .configure_mesh()
            .x_desc(x_axis.label.as_str())
            .y_desc(y_axis.label.as_str())
            .light_line_style(RGBColor(235, 235, 235))
            .draw()?;

        let curve_color = rgb(palette::CURVE_COLOR);
        chart.draw_series(
            AreaSeries::new(curve.iter().map(|p| (p[0], p[1])), 0.0, curve_color.mix(0.1))
                .border_style(curve_color.stroke_width(2)),
        )?;

        chart.draw_series(
            rug.iter()
                .map(|m| PathElement::new(vec![(m.x, 0.0), (m.x, -tick)], curve_color)),
        )?;

        for m in markers {
            let color = rgb(m.color);
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(m.x, 0.0), (m.x, y_axis.max)],
                    color.stroke_width(2),
                )))?
                .label(m.player_name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], color));
        }

        if !markers.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.85))
                .border_style(BLACK)
                .draw()?;
        }
        Ok(())
    }
}
