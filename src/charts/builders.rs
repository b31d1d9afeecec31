//! Chart Builders
//! Map table columns onto visual channels and produce chart specifications.

use crate::charts::palette::{self, Rgb};
use crate::charts::spec::{
    Axis, ChartId, ChartKind, ChartSpec, ColorScale, LollipopRow, LollipopSeries, PlayerMarker,
    PolarBar, RugMark, ScatterPoint,
};
use crate::data::{
    percent, AggressionRow, DataProcessor, PlayerId, PlayerRecord, PowerRow, RadialMetric,
    RadialProfileRow,
};
use crate::stats::{Kde, KdeError};
use thiserror::Error;

/// Fraction of the data range added around scatter axes.
const AXIS_PADDING: f64 = 0.08;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("Player not found: {0}")]
    PlayerNotFound(String),
    #[error("Density estimate failed: {0}")]
    Kde(#[from] KdeError),
    #[error("No rows in the {0} table")]
    EmptyTable(String),
}

/// Creates chart specifications from typed rows.
pub struct ChartFactory;

impl ChartFactory {
    /// Scatter points colored by hard-hit % and sized by barrels/PA %.
    fn encode_points<R: PlayerRecord>(
        rows: &[&R],
        x: impl Fn(&R) -> f64,
        y: impl Fn(&R) -> f64,
        hardhit: impl Fn(&R) -> f64,
        barrels: impl Fn(&R) -> f64,
    ) -> (Vec<ScatterPoint>, ColorScale) {
        let range = |f: &dyn Fn(&R) -> f64| {
            rows.iter()
                .map(|&r| f(r))
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                    (lo.min(v), hi.max(v))
                })
        };
        let (hh_min, hh_max) = range(&hardhit);
        let (brl_min, brl_max) = range(&barrels);

        let points = rows
            .iter()
            .map(|&r| {
                let hh = hardhit(r);
                let brl = barrels(r);
                ScatterPoint {
                    player_id: r.id(),
                    player_name: r.name().to_string(),
                    x: x(r),
                    y: y(r),
                    color: palette::colorscale(palette::normalize(hh, hh_min, hh_max)),
                    radius: palette::marker_radius(palette::normalize(brl, brl_min, brl_max)),
                    color_value: hh,
                    size_value: brl,
                }
            })
            .collect();

        let scale = ColorScale {
            label: "Hard-Hit %".to_string(),
            min: hh_min,
            max: hh_max,
        };
        (points, scale)
    }

    /// Swing rate vs whiff rate for the `top_n` players by plate appearances.
    pub fn swing_vs_whiff(rows: &[AggressionRow], top_n: usize) -> Result<ChartSpec, ChartError> {
        if rows.is_empty() {
            return Err(ChartError::EmptyTable("aggression".to_string()));
        }
        let selected = DataProcessor::top_n_by_pa(rows, top_n);
        let (points, color_scale) = Self::encode_points(
            &selected,
            |r| percent(r.swing_rate),
            |r| percent(r.whiff_rate),
            |r| r.hardhit_percent,
            |r| r.barrels_per_pa_percent,
        );

        Ok(ChartSpec {
            id: ChartId::SwingVsWhiff,
            title: "Hitter Aggression Quality".to_string(),
            kind: ChartKind::Scatter {
                x_axis: Axis::fit("Swing %", points.iter().map(|p| p.x), AXIS_PADDING),
                y_axis: Axis::fit("Whiff %", points.iter().map(|p| p.y), AXIS_PADDING),
                color_scale,
                size_label: "Barrels/PA %".to_string(),
                points,
            },
        })
    }

    /// Actual vs expected slugging for every player.
    pub fn power_vs_expected(rows: &[PowerRow]) -> Result<ChartSpec, ChartError> {
        if rows.is_empty() {
            return Err(ChartError::EmptyTable("power".to_string()));
        }
        let all: Vec<&PowerRow> = rows.iter().collect();
        let (points, color_scale) = Self::encode_points(
            &all,
            |r| r.slg,
            |r| r.xslg,
            |r| r.hardhit_percent,
            |r| r.barrels_per_pa_percent,
        );

        Ok(ChartSpec {
            id: ChartId::PowerVsExpected,
            title: "Power vs Expected Power".to_string(),
            kind: ChartKind::Scatter {
                x_axis: Axis::fit("SLG", points.iter().map(|p| p.x), AXIS_PADDING),
                y_axis: Axis::fit("xSLG", points.iter().map(|p| p.y), AXIS_PADDING),
                color_scale,
                size_label: "Barrels/PA %".to_string(),
                points,
            },
        })
    }

    /// Lollipop of SLG and xSLG for the `top_n` largest absolute gaps.
    pub fn power_gap(rows: &[PowerRow], top_n: usize) -> Result<ChartSpec, ChartError> {
        if rows.is_empty() {
            return Err(ChartError::EmptyTable("power".to_string()));
        }
        let rows: Vec<LollipopRow> = DataProcessor::top_n_by_power_gap(rows, top_n)
            .into_iter()
            .map(|r| LollipopRow {
                player_id: r.person_id,
                player_name: r.player_name.clone(),
                actual: r.slg,
                expected: r.xslg,
            })
            .collect();

        let values = rows.iter().flat_map(|r| [r.actual, r.expected]);
        Ok(ChartSpec {
            id: ChartId::PowerGap,
            title: "Expected Power vs Actual Power".to_string(),
            kind: ChartKind::Lollipop {
                x_axis: Axis::fit("Slugging", values, AXIS_PADDING),
                actual: LollipopSeries {
                    name: "SLG".to_string(),
                    color: palette::ACTUAL_COLOR,
                },
                expected: LollipopSeries {
                    name: "xSLG".to_string(),
                    color: palette::EXPECTED_COLOR,
                },
                rows,
            },
        })
    }

    /// Polar bars of one player's percentile rank in each radial metric.
    pub fn radial_profile(
        rows: &[RadialProfileRow],
        player_name: &str,
    ) -> Result<ChartSpec, ChartError> {
        let row = rows
            .iter()
            .find(|r| r.player_name == player_name)
            .ok_or_else(|| ChartError::PlayerNotFound(player_name.to_string()))?;

        let bars = DataProcessor::percentile_ranks(rows, row)
            .into_iter()
            .enumerate()
            .map(|(i, (metric, rank))| PolarBar {
                metric,
                label: metric.label().to_string(),
                radius: rank,
                raw_value: metric.value(row),
                color: palette::categorical(i),
            })
            .collect();

        Ok(ChartSpec {
            id: ChartId::RadialProfile,
            title: format!("Hitter Radial Profile: {}", row.player_name),
            kind: ChartKind::PolarBar {
                player_id: row.person_id,
                player_name: row.player_name.clone(),
                bars,
            },
        })
    }

    /// Density of one metric across all players, with a rug of every value
    /// and a vertical marker for each compared player.
    pub fn density(
        rows: &[RadialProfileRow],
        metric: RadialMetric,
        compared: &[PlayerId],
        num_points: usize,
        bandwidth: Option<f64>,
    ) -> Result<ChartSpec, ChartError> {
        let values = DataProcessor::metric_values(rows, metric);
        let kde = Kde::estimate_with(&values, num_points, bandwidth)?;
        let y_max = kde.max_density();

        let rug = rows
            .iter()
            .map(|r| RugMark {
                player_id: r.person_id,
                player_name: r.player_name.clone(),
                x: metric.value(r),
            })
            .collect();

        // Colors follow selection order; legend order follows value.
        let mut markers: Vec<PlayerMarker> = compared
            .iter()
            .enumerate()
            .filter_map(|(i, id)| {
                rows.iter().find(|r| r.person_id == *id).map(|r| PlayerMarker {
                    player_id: r.person_id,
                    player_name: r.player_name.clone(),
                    x: metric.value(r),
                    color: palette::categorical(i),
                })
            })
            .collect();
        markers.sort_by(|a, b| b.x.total_cmp(&a.x));

        let (x_min, x_max) = kde.domain();
        Ok(ChartSpec {
            id: ChartId::Density,
            title: format!("{} distribution", metric.label()),
            kind: ChartKind::Density {
                x_axis: Axis {
                    label: metric.label().to_string(),
                    min: x_min,
                    max: x_max,
                },
                y_axis: Axis {
                    label: "Density".to_string(),
                    min: 0.0,
                    max: y_max,
                },
                curve: kde.points(),
                bandwidth: kde.bandwidth,
                rug,
                markers,
            },
        })
    }

    /// Color assigned to a compared player on the density chart.
    pub fn marker_color(compared: &[PlayerId], id: PlayerId) -> Option<Rgb> {
        compared
            .iter()
            .position(|c| *c == id)
            .map(palette::categorical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radial(id: i64, name: &str, speed: f64) -> RadialProfileRow {
        RadialProfileRow {
            person_id: PlayerId(id),
            player_name: name.to_string(),
            launch_speed: speed,
            launch_angle: 12.0 + id as f64,
            barrels_per_bbe_percent: 8.0 + id as f64,
            hardhit_percent: 40.0 + id as f64,
            xwoba: 0.310 + 0.005 * id as f64,
            babip: 0.290 - 0.004 * id as f64,
        }
    }

    fn radial_rows() -> Vec<RadialProfileRow> {
        vec![
            radial(1, "Raleigh, Cal", 92.4),
            radial(2, "Crawford, J.P.", 88.1),
            radial(3, "Young, Cole", 86.7),
            radial(4, "Naylor, Josh", 90.3),
        ]
    }

    #[test]
    fn radial_profile_has_one_bar_per_metric() {
        let spec = ChartFactory::radial_profile(&radial_rows(), "Raleigh, Cal").unwrap();
        let ChartKind::PolarBar { bars, player_id, .. } = spec.kind else {
            panic!("expected polar bars");
        };
        assert_eq!(player_id, PlayerId(1));
        assert_eq!(bars.len(), RadialMetric::ALL.len());
        assert_eq!(bars[0].metric, RadialMetric::LaunchSpeed);
        assert_eq!(bars[0].radius, 1.0);
        assert_eq!(bars[0].raw_value, 92.4);
        assert!(bars.iter().all(|b| (0.0..=1.0).contains(&b.radius)));
    }

    #[test]
    fn radial_profile_unknown_player() {
        assert_eq!(
            ChartFactory::radial_profile(&radial_rows(), "Nobody, Known"),
            Err(ChartError::PlayerNotFound("Nobody, Known".to_string()))
        );
    }

    #[test]
    fn density_markers_sorted_by_value() {
        let compared = [PlayerId(3), PlayerId(1), PlayerId(99)];
        let spec = ChartFactory::density(
            &radial_rows(),
            RadialMetric::LaunchSpeed,
            &compared,
            200,
            None,
        )
        .unwrap();
        let ChartKind::Density {
            curve,
            rug,
            markers,
            y_axis,
            ..
        } = spec.kind
        else {
            panic!("expected density");
        };
        assert_eq!(curve.len(), 200);
        assert_eq!(rug.len(), 4);
        // unknown id 99 is skipped
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].player_id, PlayerId(1));
        assert_eq!(markers[1].player_id, PlayerId(3));
        // colors keep selection order
        assert_eq!(markers[1].color, palette::categorical(0));
        assert_eq!(markers[0].color, palette::categorical(1));
        assert!(y_axis.max > 0.0);
    }

    #[test]
    fn density_of_flat_metric_fails() {
        let mut rows = radial_rows();
        for r in &mut rows {
            r.launch_speed = 90.0;
        }
        assert_eq!(
            ChartFactory::density(&rows, RadialMetric::LaunchSpeed, &[], 100, None),
            Err(ChartError::Kde(KdeError::DegenerateBandwidth))
        );
    }

    #[test]
    fn empty_tables_are_reported() {
        assert!(matches!(
            ChartFactory::power_gap(&[], 30),
            Err(ChartError::EmptyTable(_))
        ));
        assert!(matches!(
            ChartFactory::swing_vs_whiff(&[], 40),
            Err(ChartError::EmptyTable(_))
        ));
    }
}
