//! Grouped Bar Layout
//! Places the bars of several series side by side inside each category slot
//! and anchors a value label above every bar.
//!
//! Category `i` owns the unit slot starting at `i`. Within it, series `k` is
//! anchored at `i + k * W`; bars are drawn centred on their anchor.

use crate::data::{Series, TrafficTable};
use std::ops::Range;
use thiserror::Error;

/// Gap between a bar top and its label, in screen points
pub const DEFAULT_LABEL_OFFSET: f32 = 3.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Bar width must be positive and finite, got {0}")]
    InvalidBarWidth(f64),
    #[error("At least one series is required")]
    NoSeries,
    #[error("{series_count} bars of width {bar_width} do not fit in one category slot")]
    GroupOverflow { series_count: usize, bar_width: f64 },
}

/// A single bar ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar<'a> {
    pub series: &'a str,
    pub series_index: usize,
    pub category_index: usize,
    pub value: f64,
    /// Anchor (centre) of the bar on the x axis
    pub x: f64,
    pub width: f64,
}

impl Bar<'_> {
    pub fn left(&self) -> f64 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// Value annotation anchored at the top centre of a bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub x: f64,
    pub y: f64,
    pub text: String,
    /// Upward shift from (x, y), in screen points
    pub offset: f32,
}

/// Closed-form geometry for a grouped bar chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupedBarLayout {
    category_count: usize,
    series_count: usize,
    bar_width: f64,
    label_offset: f32,
}

impl GroupedBarLayout {
    /// Requires `bar_width > 0`, at least one series, and
    /// `series_count * bar_width <= 1` so groups never spill into the next slot.
    pub fn new(
        category_count: usize,
        series_count: usize,
        bar_width: f64,
    ) -> Result<Self, LayoutError> {
        if !bar_width.is_finite() || bar_width <= 0.0 {
            return Err(LayoutError::InvalidBarWidth(bar_width));
        }
        if series_count == 0 {
            return Err(LayoutError::NoSeries);
        }
        if series_count as f64 * bar_width > 1.0 + f64::EPSILON {
            return Err(LayoutError::GroupOverflow {
                series_count,
                bar_width,
            });
        }

        Ok(Self {
            category_count,
            series_count,
            bar_width,
            label_offset: DEFAULT_LABEL_OFFSET,
        })
    }

    pub fn for_table(table: &TrafficTable, bar_width: f64) -> Result<Self, LayoutError> {
        Self::new(table.category_count(), table.series_count(), bar_width)
    }

    pub fn with_label_offset(mut self, offset: f32) -> Self {
        self.label_offset = offset;
        self
    }

    pub fn category_count(&self) -> usize {
        self.category_count
    }

    pub fn series_count(&self) -> usize {
        self.series_count
    }

    pub fn bar_width(&self) -> f64 {
        self.bar_width
    }

    /// Anchor of series `series_index` within category `category_index`.
    pub fn bar_position(&self, category_index: usize, series_index: usize) -> f64 {
        category_index as f64 + series_index as f64 * self.bar_width
    }

    /// Midpoint between the first and last bar anchors of a category.
    pub fn category_tick_position(&self, category_index: usize) -> f64 {
        category_index as f64 + (self.series_count - 1) as f64 * self.bar_width / 2.0
    }

    /// X interval covered by the drawn bars of one category.
    pub fn group_span(&self, category_index: usize) -> Range<f64> {
        let half = self.bar_width / 2.0;
        let first = self.bar_position(category_index, 0);
        let last = self.bar_position(category_index, self.series_count - 1);
        (first - half)..(last + half)
    }

    /// X range of the whole chart with one bar width of padding on each side.
    pub fn x_extent(&self) -> Range<f64> {
        if self.category_count == 0 {
            return -0.5..0.5;
        }
        let first = self.group_span(0);
        let last = self.group_span(self.category_count - 1);
        (first.start - self.bar_width)..(last.end + self.bar_width)
    }

    /// Every bar of every series, series-major.
    ///
    /// Values beyond `category_count` are ignored.
    pub fn bars<'a>(&self, series: &'a [Series]) -> impl Iterator<Item = Bar<'a>> + 'a {
        let layout = *self;
        series.iter().enumerate().flat_map(move |(series_index, s)| {
            s.values
                .iter()
                .take(layout.category_count)
                .enumerate()
                .map(move |(category_index, &value)| Bar {
                    series: s.name.as_str(),
                    series_index,
                    category_index,
                    value,
                    x: layout.bar_position(category_index, series_index),
                    width: layout.bar_width,
                })
        })
    }

    /// Label showing the bar value rounded to the nearest integer.
    pub fn label_for(&self, bar: &Bar<'_>) -> Label {
        Label {
            x: bar.x,
            y: bar.value,
            text: format_value(bar.value),
            offset: self.label_offset,
        }
    }

    /// Tick position paired with its category label.
    pub fn category_ticks<'a>(&self, categories: &'a [String]) -> Vec<(f64, &'a str)> {
        categories
            .iter()
            .take(self.category_count)
            .enumerate()
            .map(|(i, name)| (self.category_tick_position(i), name.as_str()))
            .collect()
    }
}

/// Integer text for a bar value: 56.4 -> "56", 92.0 -> "92".
///
/// Exact halves round to the even neighbour, so 56.5 -> "56" and 57.5 -> "58".
pub fn format_value(value: f64) -> String {
    // Adding 0.0 turns -0.0 into 0.0 so -0.4 prints as "0"
    format!("{:.0}", value.round_ties_even() + 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::data::{DataProcessor, DatasetLoader};

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn traffic_table() -> TrafficTable {
        let config = ChartConfig::embedded().unwrap();
        let df = DatasetLoader::to_dataframe(&config.dataset).unwrap();
        DataProcessor::extract_table(&df, &config.dataset).unwrap()
    }

    #[test]
    fn test_bars_evenly_spaced_within_group() {
        for &width in &[0.25, 0.3, 0.1] {
            let layout = GroupedBarLayout::new(5, 3, width).unwrap();
            for ci in 0..5 {
                for si in 0..2 {
                    let step = layout.bar_position(ci, si + 1) - layout.bar_position(ci, si);
                    assert!(approx_eq(step, width), "step {} != {}", step, width);
                }
            }
        }
    }

    #[test]
    fn test_same_series_one_slot_apart() {
        let layout = GroupedBarLayout::new(5, 3, 0.25).unwrap();
        for si in 0..3 {
            for ci in 0..4 {
                let gap = layout.bar_position(ci + 1, si) - layout.bar_position(ci, si);
                assert!(approx_eq(gap, 1.0));
            }
        }
    }

    #[test]
    fn test_group_occupies_its_slot_without_overlap() {
        let layout = GroupedBarLayout::new(5, 3, 0.25).unwrap();
        let k_w = 3.0 * 0.25;

        for ci in 0..5 {
            let start = ci as f64;
            for si in 0..3 {
                let anchor = layout.bar_position(ci, si);
                assert!(anchor >= start && anchor < start + k_w);
            }

            let span = layout.group_span(ci);
            assert!(approx_eq(span.end - span.start, k_w));
            if ci + 1 < 5 {
                assert!(span.end <= layout.group_span(ci + 1).start);
            }
        }
    }

    #[test]
    fn test_adjacent_bars_touch_but_do_not_overlap() {
        let table = traffic_table();
        let layout = GroupedBarLayout::for_table(&table, 0.25).unwrap();
        let bars: Vec<_> = layout.bars(&table.series).collect();

        for ci in 0..table.category_count() {
            let mut group: Vec<_> = bars.iter().filter(|b| b.category_index == ci).collect();
            group.sort_by_key(|b| b.series_index);
            for pair in group.windows(2) {
                assert!(approx_eq(pair[0].right(), pair[1].left()));
            }
        }
    }

    #[test]
    fn test_tick_is_midpoint_of_first_and_last_anchor() {
        for &(series_count, width) in &[(3, 0.25), (2, 0.4), (1, 0.5), (4, 0.2)] {
            let layout = GroupedBarLayout::new(5, series_count, width).unwrap();
            for ci in 0..5 {
                let first = layout.bar_position(ci, 0);
                let last = layout.bar_position(ci, series_count - 1);
                assert!(approx_eq(
                    layout.category_tick_position(ci),
                    (first + last) / 2.0
                ));
            }
        }
    }

    #[test]
    fn test_label_rounding() {
        assert_eq!(format_value(56.4), "56");
        assert_eq!(format_value(92.0), "92");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(-0.4), "0");
    }

    #[test]
    fn test_label_ties_round_to_even() {
        let labels: Vec<_> = [56.5, 57.5, 0.5, 2.5, 3.5]
            .iter()
            .map(|&v| format_value(v))
            .collect();
        assert_eq!(labels, vec!["56", "58", "0", "2", "4"]);
    }

    #[test]
    fn test_label_anchored_at_bar_top() {
        let layout = GroupedBarLayout::new(1, 1, 0.25).unwrap().with_label_offset(4.0);
        let bar = Bar {
            series: "Direct",
            series_index: 0,
            category_index: 0,
            value: 56.4,
            x: 0.0,
            width: 0.25,
        };

        let label = layout.label_for(&bar);
        assert_eq!(label.x, 0.0);
        assert_eq!(label.y, 56.4);
        assert_eq!(label.text, "56");
        assert_eq!(label.offset, 4.0);
    }

    #[test]
    fn test_monthly_traffic_layout() {
        let table = traffic_table();
        let layout = GroupedBarLayout::for_table(&table, 0.25).unwrap();

        assert_eq!(layout.bar_position(0, 0), 0.0);
        assert_eq!(layout.bar_position(0, 1), 0.25);
        assert_eq!(layout.bar_position(0, 2), 0.5);
        assert_eq!(layout.category_tick_position(0), 0.25);

        let first_month: Vec<_> = layout
            .bars(&table.series)
            .filter(|b| b.category_index == 0)
            .collect();
        let names: Vec<_> = first_month.iter().map(|b| b.series).collect();
        let labels: Vec<_> = first_month
            .iter()
            .map(|b| layout.label_for(b).text)
            .collect();
        assert_eq!(names, vec!["Searches", "Direct", "Social Media"]);
        assert_eq!(labels, vec!["50", "39", "70"]);

        let ticks = layout.category_ticks(&table.categories);
        assert_eq!(ticks.len(), 5);
        assert_eq!(ticks[0], (0.25, "07/2019"));
        assert_eq!(ticks[4], (4.25, "11/2019"));
        assert_eq!(layout.bars(&table.series).count(), 15);
    }

    #[test]
    fn test_x_extent_covers_all_groups() {
        let layout = GroupedBarLayout::new(5, 3, 0.25).unwrap();
        let extent = layout.x_extent();

        assert!(extent.start < layout.group_span(0).start);
        assert!(extent.end > layout.group_span(4).end);
    }

    #[test]
    fn test_invalid_layouts_rejected() {
        assert_eq!(
            GroupedBarLayout::new(5, 3, 0.0),
            Err(LayoutError::InvalidBarWidth(0.0))
        );
        assert!(matches!(
            GroupedBarLayout::new(5, 3, f64::NAN),
            Err(LayoutError::InvalidBarWidth(_))
        ));
        assert_eq!(GroupedBarLayout::new(5, 0, 0.25), Err(LayoutError::NoSeries));
        assert_eq!(
            GroupedBarLayout::new(5, 3, 0.4),
            Err(LayoutError::GroupOverflow {
                series_count: 3,
                bar_width: 0.4
            })
        );
        assert!(GroupedBarLayout::new(5, 4, 0.25).is_ok());
    }
}
