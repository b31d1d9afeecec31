//! Dashboard state and rendering.
//!
//! `Dashboard::render` turns the current selection into chart specifications.
//! It holds no mutable state, so any UI loop can call it whenever an input
//! changes.

use crate::charts::{ChartError, ChartFactory, ChartSpec};
use crate::config::{ChartSettings, DashboardConfig};
use crate::data::{Dataset, PlayerId, PlayerRecord, RadialMetric};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    PowerGap,
    HitterAggression,
    HitterProfile,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::PowerGap, Tab::HitterAggression, Tab::HitterProfile];

    pub fn title(self) -> &'static str {
        match self {
            Tab::PowerGap => "Power Gap",
            Tab::HitterAggression => "Hitter Aggression",
            Tab::HitterProfile => "Hitter Profile",
        }
    }

    pub fn card_header(self) -> &'static str {
        match self {
            Tab::PowerGap => "Expected Power vs Actual Power",
            Tab::HitterAggression => "Hitter Aggression Quality",
            Tab::HitterProfile => "Hitter Radial Profile",
        }
    }
}

/// Which chart the Power Gap tab shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PowerView {
    #[default]
    Gap,
    Scatter,
}

/// Everything the user has chosen. Charts are a pure function of this.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    pub tab: Tab,
    pub power_view: PowerView,
    /// Player shown on the radial chart; the first roster entry when `None`.
    pub player: Option<String>,
    pub density_metric: RadialMetric,
    /// Players marked on the density chart, in the order they were added.
    pub compared_players: Vec<PlayerId>,
}

impl SelectionState {
    pub fn new(density_metric: RadialMetric) -> Self {
        Self {
            tab: Tab::default(),
            power_view: PowerView::default(),
            player: None,
            density_metric,
            compared_players: Vec::new(),
        }
    }

    /// Add a player to the comparison list. Returns false if already present.
    pub fn add_compared_player(&mut self, id: PlayerId) -> bool {
        if self.compared_players.contains(&id) {
            return false;
        }
        self.compared_players.push(id);
        true
    }

    pub fn remove_compared_player(&mut self, id: PlayerId) {
        self.compared_players.retain(|p| *p != id);
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(ChartSettings::default().density_metric)
    }
}

/// Read-only view over the loaded dataset plus chart settings.
pub struct Dashboard {
    data: Arc<Dataset>,
    settings: ChartSettings,
    roster: Vec<String>,
}

impl Dashboard {
    pub fn new(data: Arc<Dataset>, settings: ChartSettings, roster: Vec<String>) -> Self {
        Self {
            data,
            settings,
            roster,
        }
    }

    pub fn from_config(data: Arc<Dataset>, config: &DashboardConfig) -> Self {
        Self::new(data, config.charts.clone(), config.roster.players.clone())
    }

    pub fn data(&self) -> &Dataset {
        &self.data
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    /// Players offered in the profile selector.
    pub fn roster(&self) -> Vec<String> {
        if self.roster.is_empty() {
            self.data.radial.names()
        } else {
            self.roster.clone()
        }
    }

    pub fn initial_selection(&self) -> SelectionState {
        SelectionState::new(self.settings.density_metric)
    }

    fn selected_player(&self, selection: &SelectionState) -> Result<String, ChartError> {
        match &selection.player {
            Some(name) => Ok(name.clone()),
            None => self
                .roster()
                .into_iter()
                .next()
                .ok_or_else(|| ChartError::EmptyTable("radial".to_string())),
        }
    }

    /// Charts for the selected tab, each built on its own so one failing
    /// chart leaves the others of the tab intact.
    pub fn render_cards(&self, selection: &SelectionState) -> Vec<Result<ChartSpec, ChartError>> {
        debug!(tab = ?selection.tab, "rendering charts");
        match selection.tab {
            Tab::PowerGap => vec![match selection.power_view {
                PowerView::Gap => {
                    ChartFactory::power_gap(self.data.power.rows(), self.settings.power_gap_top_n)
                }
                PowerView::Scatter => ChartFactory::power_vs_expected(self.data.power.rows()),
            }],
            Tab::HitterAggression => vec![ChartFactory::swing_vs_whiff(
                self.data.aggression.rows(),
                self.settings.aggression_top_n,
            )],
            Tab::HitterProfile => vec![
                self.selected_player(selection).and_then(|player| {
                    ChartFactory::radial_profile(self.data.radial.rows(), &player)
                }),
                self.density(selection),
            ],
        }
    }

    /// Charts for the selected tab, failing on the first chart error.
    pub fn render(&self, selection: &SelectionState) -> Result<Vec<ChartSpec>, ChartError> {
        self.render_cards(selection).into_iter().collect()
    }

    /// Density chart for the selected metric and compared players.
    pub fn density(&self, selection: &SelectionState) -> Result<ChartSpec, ChartError> {
        ChartFactory::density(
            self.data.radial.rows(),
            selection.density_metric,
            &selection.compared_players,
            self.settings.kde_points,
            self.settings.kde_bandwidth,
        )
    }

    /// Every chart of every tab, for export.
    pub fn render_all(&self, selection: &SelectionState) -> Result<Vec<ChartSpec>, ChartError> {
        let mut charts = vec![
            ChartFactory::power_gap(self.data.power.rows(), self.settings.power_gap_top_n)?,
            ChartFactory::power_vs_expected(self.data.power.rows())?,
            ChartFactory::swing_vs_whiff(
                self.data.aggression.rows(),
                self.settings.aggression_top_n,
            )?,
        ];
        let profile = SelectionState {
            tab: Tab::HitterProfile,
            ..selection.clone()
        };
        charts.extend(self.render(&profile)?);
        Ok(charts)
    }

    /// Rug click: add the player to the comparison list.
    pub fn on_rug_click(&self, selection: &mut SelectionState, id: PlayerId) -> bool {
        let added = selection.add_compared_player(id);
        if added {
            debug!(
                player = self.data.player_name(id).unwrap_or("?"),
                "added compared player"
            );
        }
        added
    }

    /// Display name for a compared player.
    pub fn player_name(&self, id: PlayerId) -> String {
        self.data
            .player_name(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    }

    /// Id of a roster name in the radial table.
    pub fn player_id(&self, name: &str) -> Option<PlayerId> {
        self.data.radial.find_by_name(name).map(|r| r.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartId, ChartKind};
    use crate::data::{AggressionRow, PowerRow, RadialProfileRow};

    fn dataset() -> Dataset {
        let aggression = (1..=5)
            .map(|i| AggressionRow {
                person_id: PlayerId(i),
                player_name: format!("Hitter{i}, A"),
                pa: 100 * i as u32,
                swing_rate: 0.40 + 0.02 * i as f64,
                whiff_rate: 0.20 + 0.01 * i as f64,
                hardhit_percent: 35.0 + i as f64,
                barrels_per_pa_percent: 5.0 + i as f64,
            })
            .collect();
        let power = (1..=5)
            .map(|i| PowerRow {
                person_id: PlayerId(i),
                player_name: format!("Hitter{i}, A"),
                slg: 0.350 + 0.02 * i as f64,
                xslg: 0.420 - 0.01 * i as f64,
                hardhit_percent: 35.0 + i as f64,
                barrels_per_pa_percent: 5.0 + i as f64,
            })
            .collect();
        let radial = (1..=5)
            .map(|i| RadialProfileRow {
                person_id: PlayerId(i),
                player_name: format!("Hitter{i}, A"),
                launch_speed: 86.0 + 1.5 * i as f64,
                launch_angle: 8.0 + 2.0 * i as f64,
                barrels_per_bbe_percent: 6.0 + i as f64,
                hardhit_percent: 35.0 + i as f64,
                xwoba: 0.300 + 0.01 * i as f64,
                babip: 0.320 - 0.01 * i as f64,
            })
            .collect();
        Dataset::new(aggression, power, radial)
    }

    fn dashboard(roster: Vec<String>) -> Dashboard {
        let settings = ChartSettings {
            aggression_top_n: 3,
            power_gap_top_n: 2,
            kde_points: 64,
            ..ChartSettings::default()
        };
        Dashboard::new(Arc::new(dataset()), settings, roster)
    }

    #[test]
    fn each_tab_renders_its_charts() {
        let board = dashboard(Vec::new());
        let mut selection = board.initial_selection();

        let charts = board.render(&selection).unwrap();
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].id, ChartId::PowerGap);
        let ChartKind::Lollipop { rows, .. } = &charts[0].kind else {
            panic!("expected lollipop");
        };
        assert_eq!(rows.len(), 2);

        selection.power_view = PowerView::Scatter;
        assert_eq!(
            board.render(&selection).unwrap()[0].id,
            ChartId::PowerVsExpected
        );

        selection.tab = Tab::HitterAggression;
        let charts = board.render(&selection).unwrap();
        let ChartKind::Scatter { points, .. } = &charts[0].kind else {
            panic!("expected scatter");
        };
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].player_id, PlayerId(5));

        selection.tab = Tab::HitterProfile;
        let ids: Vec<ChartId> = board.render(&selection).unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![ChartId::RadialProfile, ChartId::Density]);
    }

    #[test]
    fn roster_falls_back_to_all_players() {
        assert_eq!(dashboard(Vec::new()).roster().len(), 5);
        let board = dashboard(vec!["Hitter3, A".to_string()]);
        assert_eq!(board.roster(), vec!["Hitter3, A".to_string()]);

        let selection = SelectionState {
            tab: Tab::HitterProfile,
            ..board.initial_selection()
        };
        let charts = board.render(&selection).unwrap();
        let ChartKind::PolarBar { player_id, .. } = &charts[0].kind else {
            panic!("expected polar bars");
        };
        assert_eq!(*player_id, PlayerId(3));
    }

    #[test]
    fn unknown_player_is_an_error() {
        let board = dashboard(Vec::new());
        let selection = SelectionState {
            tab: Tab::HitterProfile,
            player: Some("Nobody, Known".to_string()),
            ..board.initial_selection()
        };
        assert_eq!(
            board.render(&selection),
            Err(ChartError::PlayerNotFound("Nobody, Known".to_string()))
        );
    }

    #[test]
    fn rug_clicks_build_the_comparison_list() {
        let board = dashboard(Vec::new());
        let mut selection = board.initial_selection();
        assert!(board.on_rug_click(&mut selection, PlayerId(2)));
        assert!(board.on_rug_click(&mut selection, PlayerId(4)));
        assert!(!board.on_rug_click(&mut selection, PlayerId(2)));
        assert_eq!(selection.compared_players, vec![PlayerId(2), PlayerId(4)]);

        let density = board.density(&selection).unwrap();
        let ChartKind::Density { markers, .. } = &density.kind else {
            panic!("expected density");
        };
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].player_id, PlayerId(4));

        selection.remove_compared_player(PlayerId(2));
        assert_eq!(selection.compared_players, vec![PlayerId(4)]);
        assert_eq!(board.player_name(PlayerId(4)), "Hitter4, A");
        assert_eq!(board.player_name(PlayerId(42)), "42");
    }

    #[test]
    fn failing_density_keeps_the_radial_card() {
        let base = dataset();
        let flat_speed = base
            .radial
            .rows()
            .iter()
            .cloned()
            .map(|mut r| {
                r.launch_speed = 90.0;
                r
            })
            .collect();
        let data = Dataset::new(
            base.aggression.rows().to_vec(),
            base.power.rows().to_vec(),
            flat_speed,
        );
        let board = Dashboard::new(Arc::new(data), ChartSettings::default(), Vec::new());
        let selection = SelectionState {
            tab: Tab::HitterProfile,
            player: Some("Hitter2, A".to_string()),
            ..SelectionState::new(RadialMetric::LaunchSpeed)
        };

        let cards = board.render_cards(&selection);
        assert_eq!(cards.len(), 2);
        let radial = cards[0].as_ref().unwrap();
        assert_eq!(radial.id, ChartId::RadialProfile);
        assert!(matches!(
            cards[1],
            Err(ChartError::Kde(crate::stats::KdeError::DegenerateBandwidth))
        ));
        assert!(board.render(&selection).is_err());

        let other_metric = SelectionState {
            density_metric: RadialMetric::Xwoba,
            ..selection
        };
        assert!(board.render_cards(&other_metric).iter().all(Result::is_ok));
    }

    #[test]
    fn unknown_player_fails_only_the_radial_card() {
        let board = dashboard(Vec::new());
        let selection = SelectionState {
            tab: Tab::HitterProfile,
            player: Some("Nobody, Known".to_string()),
            ..board.initial_selection()
        };
        let cards = board.render_cards(&selection);
        assert!(matches!(cards[0], Err(ChartError::PlayerNotFound(_))));
        assert_eq!(cards[1].as_ref().unwrap().id, ChartId::Density);
    }

    #[test]
    fn render_all_covers_every_chart() {
        let board = dashboard(Vec::new());
        let charts = board.render_all(&board.initial_selection()).unwrap();
        let ids: Vec<ChartId> = charts.iter().map(|c| c.id).collect();
        assert_eq!(
            ids,
            vec![
                ChartId::PowerGap,
                ChartId::PowerVsExpected,
                ChartId::SwingVsWhiff,
                ChartId::RadialProfile,
                ChartId::Density,
            ]
        );
    }
}
