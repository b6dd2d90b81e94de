//! Traffic Chart - Visitors by web traffic source
//!
//! Grouped bar chart comparing monthly visitors from searches, direct
//! visits, and social media.

mod charts;
mod config;
mod data;
mod gui;

use anyhow::{anyhow, Context};
use charts::GroupedBarLayout;
use config::ChartConfig;
use data::{DataProcessor, DatasetLoader, TrafficTable};
use eframe::egui;
use gui::TrafficChartApp;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ChartConfig::embedded().context("loading embedded chart config")?;
    let (table, layout) = build_chart(&config)?;
    info!(
        categories = table.category_count(),
        series = table.series_count(),
        bar_width = layout.bar_width(),
        max_value = table.max_value(),
        "traffic chart ready"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width as f32, config.window.height as f32])
            .with_title(&config.title),
        ..Default::default()
    };

    let app_name = config.title.clone();
    eframe::run_native(
        &app_name,
        options,
        Box::new(move |cc| Ok(Box::new(TrafficChartApp::new(cc, config, table, layout)))),
    )
    .map_err(|e| anyhow!("failed to open chart window: {e}"))
}

/// Build the traffic table and its bar layout from the config.
fn build_chart(config: &ChartConfig) -> anyhow::Result<(TrafficTable, GroupedBarLayout)> {
    let df = DatasetLoader::to_dataframe(&config.dataset).context("building traffic frame")?;
    let table =
        DataProcessor::extract_table(&df, &config.dataset).context("extracting traffic table")?;
    let layout = GroupedBarLayout::for_table(&table, config.bar_width)
        .context("computing bar layout")?
        .with_label_offset(config.label_offset);

    Ok((table, layout))
}
