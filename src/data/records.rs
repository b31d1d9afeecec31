//! Typed player records for the three dashboard tables.

use serde::Serialize;
use std::fmt;

/// MLBAM person id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PlayerId(pub i64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Common accessors shared by every table row.
pub trait PlayerRecord {
    fn id(&self) -> PlayerId;
    fn name(&self) -> &str;
}

/// Swing and whiff aggregates (`quality_aggression.csv`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggressionRow {
    pub person_id: PlayerId,
    pub player_name: String,
    pub pa: u32,
    pub swing_rate: f64,
    pub whiff_rate: f64,
    pub hardhit_percent: f64,
    pub barrels_per_pa_percent: f64,
}

/// Actual vs expected power (`power_vs_expected.csv`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerRow {
    pub person_id: PlayerId,
    pub player_name: String,
    pub slg: f64,
    pub xslg: f64,
    pub hardhit_percent: f64,
    pub barrels_per_pa_percent: f64,
}

impl PowerRow {
    /// Expected minus actual slugging.
    pub fn power_gap(&self) -> f64 {
        self.xslg - self.slg
    }
}

/// Per-player batted-ball profile (`hitter_radial_profile.csv`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadialProfileRow {
    pub person_id: PlayerId,
    pub player_name: String,
    pub launch_speed: f64,
    pub launch_angle: f64,
    pub barrels_per_bbe_percent: f64,
    pub hardhit_percent: f64,
    pub xwoba: f64,
    pub babip: f64,
}

macro_rules! impl_player_record {
    ($($row:ty),*) => {
        $(impl PlayerRecord for $row {
            fn id(&self) -> PlayerId {
                self.person_id
            }

            fn name(&self) -> &str {
                &self.player_name
            }
        })*
    };
}

impl_player_record!(AggressionRow, PowerRow, RadialProfileRow);

/// Metric categories of the radial profile, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadialMetric {
    LaunchSpeed,
    LaunchAngle,
    BarrelsPerBbePercent,
    HardhitPercent,
    Xwoba,
    Babip,
}

impl RadialMetric {
    pub const ALL: [RadialMetric; 6] = [
        RadialMetric::LaunchSpeed,
        RadialMetric::LaunchAngle,
        RadialMetric::BarrelsPerBbePercent,
        RadialMetric::HardhitPercent,
        RadialMetric::Xwoba,
        RadialMetric::Babip,
    ];

    /// CSV column name.
    pub fn column(self) -> &'static str {
        match self {
            RadialMetric::LaunchSpeed => "launch_speed",
            RadialMetric::LaunchAngle => "launch_angle",
            RadialMetric::BarrelsPerBbePercent => "barrels_per_bbe_percent",
            RadialMetric::HardhitPercent => "hardhit_percent",
            RadialMetric::Xwoba => "xwoba",
            RadialMetric::Babip => "babip",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RadialMetric::LaunchSpeed => "Exit Velocity",
            RadialMetric::LaunchAngle => "Launch Angle",
            RadialMetric::BarrelsPerBbePercent => "Barrel/BBE %",
            RadialMetric::HardhitPercent => "Hard-Hit %",
            RadialMetric::Xwoba => "xwOBA",
            RadialMetric::Babip => "BABIP",
        }
    }

    pub fn value(self, row: &RadialProfileRow) -> f64 {
        match self {
            RadialMetric::LaunchSpeed => row.launch_speed,
            RadialMetric::LaunchAngle => row.launch_angle,
            RadialMetric::BarrelsPerBbePercent => row.barrels_per_bbe_percent,
            RadialMetric::HardhitPercent => row.hardhit_percent,
            RadialMetric::Xwoba => row.xwoba,
            RadialMetric::Babip => row.babip,
        }
    }
}

impl fmt::Display for RadialMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rows of one table, at most one per player.
#[derive(Debug, Clone)]
pub struct Table<R> {
    name: String,
    rows: Vec<R>,
}

impl<R: PlayerRecord> Table<R> {
    /// Callers guarantee unique ids; the loader checks this.
    pub(crate) fn new(name: impl Into<String>, rows: Vec<R>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: PlayerId) -> Option<&R> {
        self.rows.iter().find(|r| r.id() == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&R> {
        self.rows.iter().find(|r| r.name() == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.name().to_string()).collect()
    }
}

/// All tables loaded at startup. Read-only afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub aggression: Table<AggressionRow>,
    pub power: Table<PowerRow>,
    pub radial: Table<RadialProfileRow>,
}

impl Dataset {
    pub fn new(
        aggression: Vec<AggressionRow>,
        power: Vec<PowerRow>,
        radial: Vec<RadialProfileRow>,
    ) -> Self {
        Self {
            aggression: Table::new("aggression", aggression),
            power: Table::new("power", power),
            radial: Table::new("radial", radial),
        }
    }

    /// Display name for an id, searching every table.
    pub fn player_name(&self, id: PlayerId) -> Option<&str> {
        self.radial
            .get(id)
            .map(|r| r.name())
            .or_else(|| self.power.get(id).map(|r| r.name()))
            .or_else(|| self.aggression.get(id).map(|r| r.name()))
    }
}

/// Scale a 0..1 rate to percent.
pub fn percent(rate: f64) -> f64 {
    rate * 100.0
}
