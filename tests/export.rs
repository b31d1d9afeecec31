use std::path::PathBuf;
use std::sync::Arc;
use tempfile::tempdir;
use trident_stats::charts::{ChartId, StaticChartRenderer};
use trident_stats::config::{DashboardConfig, DataPaths};
use trident_stats::dashboard::{Dashboard, SelectionState, Tab};
use trident_stats::data::{DataLoader, PlayerId};

fn dashboard() -> Dashboard {
    let config = DashboardConfig {
        data: DataPaths {
            dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"),
            ..DataPaths::default()
        },
        ..DashboardConfig::default()
    };
    let dataset = DataLoader::load_dataset(&config.data).unwrap();
    Dashboard::from_config(Arc::new(dataset), &config)
}

fn selection() -> SelectionState {
    SelectionState {
        tab: Tab::HitterProfile,
        player: Some("Raleigh, Cal".to_string()),
        compared_players: vec![PlayerId(660017)],
        ..SelectionState::default()
    }
}

#[test]
fn export_all_writes_png_and_json_per_chart() {
    let board = dashboard();
    let charts = board.render_all(&selection()).unwrap();
    assert_eq!(charts.len(), 5);

    let dir = tempdir().unwrap();
    let out = dir.path().join("charts");
    let written = StaticChartRenderer::export_all(&charts, &out, 800, 600).unwrap();
    assert_eq!(written.len(), 10);

    for id in [
        ChartId::PowerGap,
        ChartId::PowerVsExpected,
        ChartId::SwingVsWhiff,
        ChartId::RadialProfile,
        ChartId::Density,
    ] {
        let png = out.join(format!("{}.png", id.file_stem()));
        let img = image::open(&png).unwrap();
        assert_eq!((img.width(), img.height()), (800, 600));

        let json = out.join(format!("{}.json", id.file_stem()));
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
        assert!(value["title"].is_string());
        assert!(value["kind"]["type"].is_string());
    }
}

#[test]
fn polar_chart_renders_on_non_square_canvas() {
    let board = dashboard();
    let charts = board.render(&selection()).unwrap();
    let radial = charts
        .iter()
        .find(|c| c.id == ChartId::RadialProfile)
        .unwrap();

    for (w, h) in [(900, 500), (500, 900)] {
        let img = StaticChartRenderer::render_image(radial, w, h).unwrap();
        assert_eq!((img.width(), img.height()), (w, h));
    }
}

#[test]
fn png_bytes_decode_to_requested_size() {
    let board = dashboard();
    let charts = board.render(&selection()).unwrap();
    let density = charts.iter().find(|c| c.id == ChartId::Density).unwrap();

    let bytes = StaticChartRenderer::render_png_bytes(density, 640, 480).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (640, 480));
}
