//! Chart specifications: backend-independent descriptions of every chart.
//!
//! Builders produce these from the dataset; the egui plotter and the static
//! renderer only draw them.

use crate::charts::palette::Rgb;
use crate::data::{PlayerId, RadialMetric};
use serde::Serialize;
use std::f64::consts::TAU;

/// Gap between neighbouring polar wedges, radians.
const WEDGE_GAP: f64 = 0.04;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartId {
    PowerGap,
    PowerVsExpected,
    SwingVsWhiff,
    RadialProfile,
    Density,
}

impl ChartId {
    /// File name stem used when exporting.
    pub fn file_stem(self) -> &'static str {
        match self {
            ChartId::PowerGap => "power_gap",
            ChartId::PowerVsExpected => "power_vs_expected",
            ChartId::SwingVsWhiff => "swing_vs_whiff",
            ChartId::RadialProfile => "radial_profile",
            ChartId::Density => "density",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub label: String,
    pub min: f64,
    pub max: f64,
}

impl Axis {
    /// Axis spanning `values` with `pad` of the range added on each side.
    pub fn fit(label: impl Into<String>, values: impl IntoIterator<Item = f64>, pad: f64) -> Self {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let (min, max) = if min > max {
            (0.0, 1.0)
        } else if min == max {
            (min - 1.0, max + 1.0)
        } else {
            let margin = (max - min) * pad;
            (min - margin, max + margin)
        };
        Self {
            label: label.into(),
            min,
            max,
        }
    }
}

/// Legend for a continuous color encoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorScale {
    pub label: String,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub player_id: PlayerId,
    pub player_name: String,
    pub x: f64,
    pub y: f64,
    pub color: Rgb,
    pub radius: f32,
    /// Raw value behind the color channel.
    pub color_value: f64,
    /// Raw value behind the size channel.
    pub size_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LollipopSeries {
    pub name: String,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LollipopRow {
    pub player_id: PlayerId,
    pub player_name: String,
    pub actual: f64,
    pub expected: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolarBar {
    pub metric: RadialMetric,
    pub label: String,
    /// Percentile rank in `[0, 1]`.
    pub radius: f64,
    pub raw_value: f64,
    pub color: Rgb,
}

/// One rug tick; clicking it selects the player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RugMark {
    pub player_id: PlayerId,
    pub player_name: String,
    pub x: f64,
}

/// Vertical line marking a selected player on the density chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerMarker {
    pub player_id: PlayerId,
    pub player_name: String,
    pub x: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartKind {
    Scatter {
        x_axis: Axis,
        y_axis: Axis,
        color_scale: ColorScale,
        size_label: String,
        points: Vec<ScatterPoint>,
    },
    Lollipop {
        x_axis: Axis,
        actual: LollipopSeries,
        expected: LollipopSeries,
        /// Top row first.
        rows: Vec<LollipopRow>,
    },
    PolarBar {
        player_id: PlayerId,
        player_name: String,
        bars: Vec<PolarBar>,
    },
    Density {
        x_axis: Axis,
        y_axis: Axis,
        curve: Vec<[f64; 2]>,
        bandwidth: f64,
        rug: Vec<RugMark>,
        /// Highest value first, so legend order follows the chart.
        markers: Vec<PlayerMarker>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: ChartId,
    pub title: String,
    pub kind: ChartKind,
}

impl ChartSpec {
    /// Rug tick closest to `x`, if one lies within `tolerance`.
    pub fn nearest_rug_mark(&self, x: f64, tolerance: f64) -> Option<&RugMark> {
        let ChartKind::Density { rug, .. } = &self.kind else {
            return None;
        };
        rug.iter()
            .map(|m| ((m.x - x).abs(), m))
            .filter(|(d, _)| *d <= tolerance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, m)| m)
    }
}

/// Outline of the `index`-th of `count` polar wedges with the given radius,
/// as cartesian points starting and ending at the origin. Wedge 0 starts at
/// 12 o'clock and wedges run clockwise.
pub fn polar_wedge(index: usize, count: usize, radius: f64, segments: usize) -> Vec<[f64; 2]> {
    if count == 0 {
        return Vec::new();
    }
    let span = TAU / count as f64;
    let start = index as f64 * span + WEDGE_GAP / 2.0;
    let end = (index + 1) as f64 * span - WEDGE_GAP / 2.0;
    let segments = segments.max(1);

    let mut outline = Vec::with_capacity(segments + 3);
    outline.push([0.0, 0.0]);
    for s in 0..=segments {
        let theta = start + (end - start) * s as f64 / segments as f64;
        outline.push(polar_to_cartesian(radius, theta));
    }
    outline.push([0.0, 0.0]);
    outline
}

/// Angle measured clockwise from 12 o'clock.
pub fn polar_to_cartesian(radius: f64, theta: f64) -> [f64; 2] {
    [radius * theta.sin(), radius * theta.cos()]
}

/// Angle of the middle of the `index`-th of `count` wedges.
pub fn wedge_center_angle(index: usize, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    (index as f64 + 0.5) * TAU / count as f64
}
