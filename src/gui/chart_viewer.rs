//! Chart Viewer Widget
//! Central panel showing either the interactive plot or the static raster.

use crate::charts::{ChartPlotter, GroupedBarLayout, StaticChartRenderer};
use crate::config::ChartConfig;
use crate::data::TrafficTable;
use egui::{Color32, ColorImage, RichText, TextureHandle, TextureOptions};
use tracing::{info, warn};

/// Which rendering of the chart is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartView {
    /// egui_plot drawing, resized with the window
    #[default]
    Interactive,
    /// plotters raster at the configured window size
    Static,
}

#[derive(Default)]
pub struct ChartViewer {
    pub view: ChartView,
    static_texture: Option<TextureHandle>,
    static_error: Option<String>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        ui: &mut egui::Ui,
        table: &TrafficTable,
        layout: &GroupedBarLayout,
        config: &ChartConfig,
    ) {
        match self.view {
            ChartView::Interactive => {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(&config.title).size(18.0).strong());
                });
                ui.add_space(8.0);
                ChartPlotter::draw_grouped_bars(ui, table, layout, config);
            }
            ChartView::Static => self.show_static(ctx, ui, table, layout, config),
        }
    }

    /// Render once, then reuse the uploaded texture.
    fn show_static(
        &mut self,
        ctx: &egui::Context,
        ui: &mut egui::Ui,
        table: &TrafficTable,
        layout: &GroupedBarLayout,
        config: &ChartConfig,
    ) {
        if self.static_texture.is_none() && self.static_error.is_none() {
            let (width, height) = (config.window.width, config.window.height);
            match StaticChartRenderer::render(table, layout, config, width, height) {
                Ok(image) => {
                    let size = [image.width() as usize, image.height() as usize];
                    let color_image = ColorImage::from_rgb(size, image.as_raw());
                    self.static_texture =
                        Some(ctx.load_texture("static_chart", color_image, TextureOptions::LINEAR));
                    info!(width, height, "static chart ready");
                }
                Err(e) => {
                    warn!(error = %e, "static chart render failed");
                    self.static_error = Some(e.to_string());
                }
            }
        }

        if let Some(texture) = &self.static_texture {
            ui.centered_and_justified(|ui| {
                ui.add(egui::Image::new(texture).shrink_to_fit());
            });
        } else if let Some(error) = &self.static_error {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new(format!("Render error: {}", error))
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            });
        }
    }
}
