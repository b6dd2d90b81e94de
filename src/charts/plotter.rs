//! Chart Plotter Module
//! Draws the grouped bar chart on screen using egui_plot.

use crate::charts::GroupedBarLayout;
use crate::config::ChartConfig;
use crate::data::TrafficTable;
use egui::{Align2, Color32, RichText, Sense};
use egui_plot::{Bar, BarChart, GridMark, Plot, PlotBounds, PlotPoint, Text};

const LABEL_FONT_SIZE: f32 = 12.0;
const MIN_PLOT_HEIGHT: f32 = 120.0;
const LEGEND_ROW_HEIGHT: f32 = 32.0;
const LEGEND_SWATCH: f32 = 12.0;
const LEGEND_GAP: f32 = 6.0;
const LEGEND_ENTRY_SPACING: f32 = 24.0;

/// Draws grouped bars, value labels, and centred category ticks.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn series_color(rgb: [u8; 3]) -> Color32 {
        Color32::from_rgb(rgb[0], rgb[1], rgb[2])
    }

    /// Plot bounds pinned to the chart extent and the configured Y range.
    pub fn plot_bounds(layout: &GroupedBarLayout, config: &ChartConfig) -> PlotBounds {
        let extent = layout.x_extent();
        PlotBounds::from_min_max(
            [extent.start, config.y_axis.min],
            [extent.end, config.y_axis.max],
        )
    }

    /// Width of a legend row given the rendered width of each series name.
    fn legend_row_width(text_widths: &[f32]) -> f32 {
        let entries: f32 = text_widths
            .iter()
            .map(|w| LEGEND_SWATCH + LEGEND_GAP + w)
            .sum();
        entries + LEGEND_ENTRY_SPACING * text_widths.len().saturating_sub(1) as f32
    }

    /// Draw the full chart into the remaining space of `ui`,
    /// with the legend as a centred row below the plot.
    pub fn draw_grouped_bars(
        ui: &mut egui::Ui,
        table: &TrafficTable,
        layout: &GroupedBarLayout,
        config: &ChartConfig,
    ) {
        let ticks: Vec<(f64, String)> = layout
            .category_ticks(&table.categories)
            .into_iter()
            .map(|(x, name)| (x, name.to_string()))
            .collect();
        let tick_positions: Vec<f64> = ticks.iter().map(|(x, _)| *x).collect();
        let y_ticks = config.y_axis.ticks();
        let y_step = config.y_axis.tick_step;
        let bounds = Self::plot_bounds(layout, config);
        let plot_height = (ui.available_height() - LEGEND_ROW_HEIGHT).max(MIN_PLOT_HEIGHT);

        Plot::new("grouped_bars")
            .height(plot_height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show_grid(false)
            .x_axis_label(config.x_label.clone())
            .y_axis_label(config.y_label.clone())
            // One tick per category, centred under its group
            .x_grid_spacer(move |_input| {
                tick_positions
                    .iter()
                    .map(|&value| GridMark {
                        value,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .y_grid_spacer(move |_input| {
                y_ticks
                    .iter()
                    .map(|&value| GridMark {
                        value,
                        step_size: y_step,
                    })
                    .collect()
            })
            .x_axis_formatter(move |mark, _range| {
                ticks
                    .iter()
                    .find(|(x, _)| (x - mark.value).abs() < 1e-6)
                    .map(|(_, name)| name.clone())
                    .unwrap_or_default()
            })
            .y_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(bounds);

                for (series_index, series) in table.series.iter().enumerate() {
                    let color = Self::series_color(series.color);
                    let bars: Vec<Bar> = layout
                        .bars(&table.series)
                        .filter(|bar| bar.series_index == series_index)
                        .map(|bar| {
                            Bar::new(bar.x, bar.value)
                                .width(bar.width)
                                .fill(color)
                                .name(&table.categories[bar.category_index])
                        })
                        .collect();

                    plot_ui.bar_chart(BarChart::new(bars).color(color).name(&series.name));
                }

                // Labels are offset in screen points, so convert to plot units
                let points_to_value = plot_ui.transform().dvalue_dpos()[1].abs();
                for bar in layout.bars(&table.series) {
                    let label = layout.label_for(&bar);
                    let y = label.y + f64::from(label.offset) * points_to_value;
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(label.x, y),
                            RichText::new(label.text).size(LABEL_FONT_SIZE),
                        )
                        .anchor(Align2::CENTER_BOTTOM),
                    );
                }
            });

        Self::draw_legend_row(ui, table);
    }

    /// Colored swatch followed by the series name, one entry per series.
    fn draw_legend_row(ui: &mut egui::Ui, table: &TrafficTable) {
        let font = egui::TextStyle::Body.resolve(ui.style());
        let text_widths: Vec<f32> = table
            .series
            .iter()
            .map(|series| {
                ui.fonts(|fonts| {
                    fonts
                        .layout_no_wrap(series.name.clone(), font.clone(), Color32::PLACEHOLDER)
                        .size()
                        .x
                })
            })
            .collect();
        let lead = ((ui.available_width() - Self::legend_row_width(&text_widths)) / 2.0).max(0.0);

        ui.horizontal(|ui| {
            ui.set_min_height(LEGEND_ROW_HEIGHT);
            ui.spacing_mut().item_spacing.x = 0.0;
            ui.add_space(lead);

            for (i, series) in table.series.iter().enumerate() {
                if i > 0 {
                    ui.add_space(LEGEND_ENTRY_SPACING);
                }
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(LEGEND_SWATCH, LEGEND_SWATCH), Sense::hover());
                ui.painter()
                    .rect_filled(rect, 2.0, Self::series_color(series.color));
                ui.add_space(LEGEND_GAP);
                ui.label(series.name.as_str());
            }
        });
    }
}
