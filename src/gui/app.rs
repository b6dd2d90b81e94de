//! Traffic Chart Main Application
//! Window with a view selector and the chart viewer.

use crate::charts::GroupedBarLayout;
use crate::config::ChartConfig;
use crate::data::TrafficTable;
use crate::gui::{ChartView, ChartViewer};
use egui::{CentralPanel, TopBottomPanel};
use tracing::debug;

/// Main application window.
pub struct TrafficChartApp {
    config: ChartConfig,
    table: TrafficTable,
    layout: GroupedBarLayout,
    chart_viewer: ChartViewer,
}

impl TrafficChartApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: ChartConfig,
        table: TrafficTable,
        layout: GroupedBarLayout,
    ) -> Self {
        Self {
            config,
            table,
            layout,
            chart_viewer: ChartViewer::new(),
        }
    }
}

impl eframe::App for TrafficChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        TopBottomPanel::top("view_selector").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let before = self.chart_viewer.view;
                ui.label("View:");
                ui.selectable_value(
                    &mut self.chart_viewer.view,
                    ChartView::Interactive,
                    "Interactive",
                );
                ui.selectable_value(&mut self.chart_viewer.view, ChartView::Static, "Static");
                if self.chart_viewer.view != before {
                    debug!(view = ?self.chart_viewer.view, "switched chart view");
                }
            });
        });

        CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer
                .show(ctx, ui, &self.table, &self.layout, &self.config);
        });
    }
}
