//! Data Processor Module
//! Row selection (top-N filters) and derived display values.

use crate::data::records::{AggressionRow, PowerRow, RadialMetric, RadialProfileRow};
use crate::stats::PercentileRanker;
use std::cmp::Ordering;

/// Handles row filtering and transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// The `n` rows with the largest `key`, largest first.
    ///
    /// Ties keep their original row order. Rows whose key is NaN sort last.
    pub fn top_n_by<R, F>(rows: &[R], n: usize, key: F) -> Vec<&R>
    where
        F: Fn(&R) -> f64,
    {
        let mut keyed: Vec<(f64, &R)> = rows.iter().map(|r| (key(r), r)).collect();
        // sort_by is stable, so equal keys stay in row order
        keyed.sort_by(|a, b| match (a.0.is_nan(), b.0.is_nan()) {
            (false, false) => b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal),
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (true, true) => Ordering::Equal,
        });
        keyed.into_iter().take(n).map(|(_, r)| r).collect()
    }

    /// Top-N filter by plate appearances.
    pub fn top_n_by_pa(rows: &[AggressionRow], n: usize) -> Vec<&AggressionRow> {
        Self::top_n_by(rows, n, |r| f64::from(r.pa))
    }

    /// Top-N filter by absolute power gap `|xslg - slg|`.
    pub fn top_n_by_power_gap(rows: &[PowerRow], n: usize) -> Vec<&PowerRow> {
        Self::top_n_by(rows, n, |r| r.power_gap().abs())
    }

    /// Percentile rank of `row` for every radial metric, in `RadialMetric::ALL` order.
    pub fn percentile_ranks(
        table: &[RadialProfileRow],
        row: &RadialProfileRow,
    ) -> Vec<(RadialMetric, f64)> {
        RadialMetric::ALL
            .iter()
            .map(|&metric| {
                let ranker = PercentileRanker::new(table.iter().map(|r| metric.value(r)));
                (metric, ranker.rank(metric.value(row)))
            })
            .collect()
    }

    /// Values of one radial metric across the table, row order.
    pub fn metric_values(table: &[RadialProfileRow], metric: RadialMetric) -> Vec<f64> {
        table.iter().map(|r| metric.value(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::records::PlayerId;

    fn power(id: i64, slg: f64, xslg: f64) -> PowerRow {
        PowerRow {
            person_id: PlayerId(id),
            player_name: format!("Player {id}"),
            slg,
            xslg,
            hardhit_percent: 40.0,
            barrels_per_pa_percent: 5.0,
        }
    }

    #[test]
    fn top_n_is_descending_and_stable() {
        let values = [3.0, 5.0, 3.0, 9.0, 5.0, 1.0];
        let picked = DataProcessor::top_n_by(&values, 4, |v| *v);
        let idx: Vec<usize> = picked
            .iter()
            .map(|p| values.iter().position(|v| std::ptr::eq(v, *p)).unwrap())
            .collect();
        assert_eq!(idx, vec![3, 1, 4, 0]);
    }

    #[test]
    fn top_n_larger_than_table_returns_everything() {
        let values = [1.0, 2.0];
        assert_eq!(DataProcessor::top_n_by(&values, 10, |v| *v).len(), 2);
    }

    #[test]
    fn nan_keys_sort_last() {
        let values = [f64::NAN, 1.0, 2.0];
        let picked = DataProcessor::top_n_by(&values, 2, |v| *v);
        assert_eq!(*picked[0], 2.0);
        assert_eq!(*picked[1], 1.0);
    }

    fn aggression(id: i64, pa: u32) -> AggressionRow {
        AggressionRow {
            person_id: PlayerId(id),
            player_name: format!("Player {id}"),
            pa,
            swing_rate: 0.45,
            whiff_rate: 0.25,
            hardhit_percent: 40.0,
            barrels_per_pa_percent: 5.0,
        }
    }

    #[test]
    fn pa_tie_at_the_cutoff_keeps_the_earlier_row() {
        let mut rows: Vec<AggressionRow> = (0..39).map(|i| aggression(i, 1000 - i as u32)).collect();
        rows.push(aggression(39, 100));
        rows.push(aggression(40, 500));
        rows.push(aggression(41, 50));
        rows.push(aggression(42, 500));
        rows.push(aggression(43, 10));
        rows.push(aggression(44, 500));

        let picked = DataProcessor::top_n_by_pa(&rows, 40);
        assert_eq!(picked.len(), 40);
        assert_eq!(picked[39].person_id, PlayerId(40));
        assert!(picked.iter().all(|r| r.person_id != PlayerId(42)));
        assert!(picked.iter().all(|r| r.person_id != PlayerId(44)));

        let picked = DataProcessor::top_n_by_pa(&rows, 42);
        let tail: Vec<i64> = picked[39..].iter().map(|r| r.person_id.0).collect();
        assert_eq!(tail, vec![40, 42, 44]);
    }

    #[test]
    fn power_gap_uses_absolute_difference() {
        let rows = vec![
            power(1, 0.400, 0.410),
            power(2, 0.500, 0.375),
            power(3, 0.300, 0.390),
            power(4, 0.250, 0.375),
        ];
        let picked = DataProcessor::top_n_by_power_gap(&rows, 2);
        let ids: Vec<i64> = picked.iter().map(|r| r.person_id.0).collect();
        // rows 2 and 4 tie at 0.125; row order breaks the tie
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn percentile_ranks_cover_every_metric() {
        let rows: Vec<RadialProfileRow> = (0..4)
            .map(|i| RadialProfileRow {
                person_id: PlayerId(i),
                player_name: format!("P{i}"),
                launch_speed: 88.0 + i as f64,
                launch_angle: 10.0 + i as f64,
                barrels_per_bbe_percent: 5.0 + i as f64,
                hardhit_percent: 35.0 + i as f64,
                xwoba: 0.300 + 0.01 * i as f64,
                babip: 0.280 + 0.01 * i as f64,
            })
            .collect();
        let ranks = DataProcessor::percentile_ranks(&rows, &rows[3]);
        assert_eq!(ranks.len(), RadialMetric::ALL.len());
        assert!(ranks.iter().all(|(_, r)| *r == 1.0));

        let ranks = DataProcessor::percentile_ranks(&rows, &rows[1]);
        assert!(ranks.iter().all(|(_, r)| *r == 0.5));
    }
}
