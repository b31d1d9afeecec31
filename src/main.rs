//! Trident Stats - Batted-ball Analytics Dashboard
//!
//! Opens the interactive dashboard, or with `--export` renders every chart
//! to PNG and JSON without a window.

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command, ValueHint};
use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use trident_stats::charts::StaticChartRenderer;
use trident_stats::config::{load_config, DashboardConfig};
use trident_stats::dashboard::Dashboard;
use trident_stats::data::DataLoader;
use trident_stats::gui::{DashboardApp, ExportSize};
use trident_stats::logging::init_tracing;

fn cli() -> Command {
    Command::new("trident-stats")
        .version(clap::crate_version!())
        .about("Batted-ball analytics dashboard")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a TOML config file (default: ./trident.toml if present)")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("data_dir")
                .short('d')
                .long("data-dir")
                .help("Directory holding the three CSV tables. Overrides the config file.")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("export")
                .short('e')
                .long("export")
                .help("Render every chart into this directory and exit")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .help("Exported image width in pixels")
                .value_parser(clap::value_parser!(u32).range(200..))
                .default_value("1400"),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .help("Exported image height in pixels")
                .value_parser(clap::value_parser!(u32).range(200..))
                .default_value("1000"),
        )
}

fn export_size(matches: &ArgMatches) -> ExportSize {
    let default = ExportSize::default();
    ExportSize {
        width: matches.get_one::<u32>("width").copied().unwrap_or(default.width),
        height: matches.get_one::<u32>("height").copied().unwrap_or(default.height),
    }
}

fn load(matches: &ArgMatches) -> Result<(DashboardConfig, Dashboard)> {
    let mut config = load_config(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))
        .context("failed to load configuration")?;
    if let Some(dir) = matches.get_one::<PathBuf>("data_dir") {
        config.data.dir = dir.clone();
    }

    let dataset = DataLoader::load_dataset(&config.data).with_context(|| {
        format!("failed to load tables from {}", config.data.dir.display())
    })?;
    let dashboard = Dashboard::from_config(Arc::new(dataset), &config);
    Ok((config, dashboard))
}

fn main() -> Result<()> {
    init_tracing()?;
    let matches = cli().get_matches();
    let (config, dashboard) = load(&matches)?;
    let size = export_size(&matches);

    if let Some(dir) = matches.get_one::<PathBuf>("export") {
        let charts = dashboard
            .render_all(&dashboard.initial_selection())
            .context("failed to build charts")?;
        let written = StaticChartRenderer::export_all(&charts, dir, size.width, size.height)
            .with_context(|| format!("failed to export charts to {}", dir.display()))?;
        info!(files = written.len(), "export finished");
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title(&config.title),
        ..Default::default()
    };

    let title = config.title.clone();
    eframe::run_native(
        "Trident Stats",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, dashboard, title, size)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard window failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_export_options() {
        let matches = cli()
            .try_get_matches_from([
                "trident-stats",
                "--data-dir",
                "fixtures",
                "--export",
                "out",
                "--width",
                "800",
            ])
            .unwrap();
        assert_eq!(
            matches.get_one::<PathBuf>("data_dir"),
            Some(&PathBuf::from("fixtures"))
        );
        assert_eq!(
            matches.get_one::<PathBuf>("export"),
            Some(&PathBuf::from("out"))
        );
        let size = export_size(&matches);
        assert_eq!((size.width, size.height), (800, 1000));
    }

    #[test]
    fn cli_rejects_tiny_images() {
        assert!(cli()
            .try_get_matches_from(["trident-stats", "--width", "10"])
            .is_err());
    }
}
