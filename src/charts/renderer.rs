//! Static Chart Renderer
//! Draws the grouped bar chart into an in-memory RGB image with plotters.
//!
//! Layout:
//! 1. Title centred above the plot
//! 2. Plot: left and bottom axes only, Y ticks every 20, month ticks centred
//!    under each group, integer labels above the bars
//! 3. Legend: one row of colored boxes + series names below the plot

use crate::charts::GroupedBarLayout;
use crate::config::ChartConfig;
use crate::data::TrafficTable;
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use thiserror::Error;
use tracing::debug;

const FONT: &str = "sans-serif";
const LEGEND_HEIGHT: u32 = 40;
const LEGEND_SWATCH: i32 = 12;
const LEGEND_GAP: i32 = 8;
const TICK_LENGTH: i32 = 5;
const MIN_SIZE: u32 = 200;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Image size {width}x{height} is too small to render")]
    TooSmall { width: u32, height: u32 },
    #[error("Pixel buffer does not match {width}x{height}")]
    Buffer { width: u32, height: u32 },
}

fn drawing<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Drawing(err.to_string())
}

fn series_rgb(color: [u8; 3]) -> RGBColor {
    RGBColor(color[0], color[1], color[2])
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the chart to an RGB image of `width` x `height` pixels.
    pub fn render(
        table: &TrafficTable,
        layout: &GroupedBarLayout,
        config: &ChartConfig,
        width: u32,
        height: u32,
    ) -> Result<RgbImage, RenderError> {
        if width < MIN_SIZE || height < MIN_SIZE {
            return Err(RenderError::TooSmall { width, height });
        }

        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(drawing)?;

            let (plot_area, legend_area) = root.split_vertically(height - LEGEND_HEIGHT);
            Self::draw_plot(&root, &plot_area, table, layout, config)?;
            Self::draw_legend(&legend_area, table)?;

            root.present().map_err(drawing)?;
        }

        debug!(width, height, "rendered static chart");
        RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer { width, height })
    }

    fn draw_plot<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        area: &DrawingArea<DB, Shift>,
        table: &TrafficTable,
        layout: &GroupedBarLayout,
        config: &ChartConfig,
    ) -> Result<(), RenderError> {
        let mut chart = ChartBuilder::on(area)
            .caption(&config.title, (FONT, 22))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(layout.x_extent(), config.y_axis.min..config.y_axis.max)
            .map_err(drawing)?;

        // Category labels are drawn by hand below, centred on each group
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(0)
            .y_labels(config.y_axis.ticks().len() + 1)
            .y_label_formatter(&|v| format!("{:.0}", v))
            .x_desc(config.x_label.as_str())
            .y_desc(config.y_label.as_str())
            .axis_desc_style((FONT, 16))
            .draw()
            .map_err(drawing)?;

        for (series_index, series) in table.series.iter().enumerate() {
            let color = series_rgb(series.color);
            chart
                .draw_series(
                    layout
                        .bars(&table.series)
                        .filter(move |bar| bar.series_index == series_index)
                        .map(move |bar| {
                            Rectangle::new(
                                [(bar.left(), 0.0), (bar.right(), bar.value)],
                                color.filled(),
                            )
                        }),
                )
                .map_err(drawing)?;
        }

        let label_style = TextStyle::from((FONT, 14).into_font())
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart
            .draw_series(layout.bars(&table.series).map(|bar| {
                let label = layout.label_for(&bar);
                let lift = -(label.offset.round() as i32);
                EmptyElement::at((label.x, label.y))
                    + Text::new(label.text, (0, lift), label_style.clone())
            }))
            .map_err(drawing)?;

        let tick_style =
            TextStyle::from((FONT, 14).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
        for (x, name) in layout.category_ticks(&table.categories) {
            let (px, py) = chart.backend_coord(&(x, config.y_axis.min));
            root.draw(&PathElement::new(
                vec![(px, py), (px, py + TICK_LENGTH)],
                BLACK,
            ))
            .map_err(drawing)?;
            root.draw(&Text::new(name, (px, py + TICK_LENGTH + 3), tick_style.clone()))
                .map_err(drawing)?;
        }

        Ok(())
    }

    /// One centred row: colored box followed by the series name.
    fn draw_legend<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        table: &TrafficTable,
    ) -> Result<(), RenderError> {
        let style = TextStyle::from((FONT, 14).into_font()).pos(Pos::new(HPos::Left, VPos::Center));

        let mut entry_widths = Vec::with_capacity(table.series.len());
        for series in &table.series {
            let (text_width, _) = area
                .estimate_text_size(&series.name, &style)
                .map_err(drawing)?;
            entry_widths.push(LEGEND_SWATCH + LEGEND_GAP + text_width as i32 + 3 * LEGEND_GAP);
        }

        let (area_width, area_height) = area.dim_in_pixel();
        let total: i32 = entry_widths.iter().sum();
        let mut x = (area_width as i32 - total).max(0) / 2;
        let y = area_height as i32 / 2;

        for (series, entry_width) in table.series.iter().zip(entry_widths) {
            let half = LEGEND_SWATCH / 2;
            area.draw(&Rectangle::new(
                [(x, y - half), (x + LEGEND_SWATCH, y + half)],
                series_rgb(series.color).filled(),
            ))
            .map_err(drawing)?;
            area.draw(&Text::new(
                series.name.as_str(),
                (x + LEGEND_SWATCH + LEGEND_GAP, y),
                style.clone(),
            ))
            .map_err(drawing)?;
            x += entry_width;
        }

        Ok(())
    }
}
