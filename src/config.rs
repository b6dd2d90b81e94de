//! Chart Configuration Module
//! Compiled-in chart description: labels, axis ranges, and the traffic dataset.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chart description shipped with the binary.
const EMBEDDED_CONFIG: &str = include_str!("../assets/traffic.json");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse chart config: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid color '{color}' for series '{series}', expected #RRGGBB")]
    InvalidColor { series: String, color: String },
    #[error("Y axis range is empty: min {min} >= max {max}")]
    EmptyYRange { min: f64, max: f64 },
    #[error("Y axis tick step must be positive, got {0}")]
    InvalidTickStep(f64),
}

/// Y axis display range and tick marks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YAxisConfig {
    /// Lower display bound, slightly below zero for padding
    pub min: f64,
    /// Upper display bound, slightly above the last tick
    pub max: f64,
    pub tick_start: f64,
    pub tick_end: f64,
    pub tick_step: f64,
}

impl YAxisConfig {
    /// Tick values from `tick_start` to `tick_end` inclusive.
    pub fn ticks(&self) -> Vec<f64> {
        if self.tick_step <= 0.0 || self.tick_end < self.tick_start {
            return Vec::new();
        }

        let count = ((self.tick_end - self.tick_start) / self.tick_step + 1e-9).floor() as usize;
        (0..=count)
            .map(|i| self.tick_start + i as f64 * self.tick_step)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

/// One traffic source as written in the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub name: String,
    /// Hex color, e.g. "#4FA7D8"
    pub color: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub category_column: String,
    pub categories: Vec<String>,
    pub series: Vec<SeriesConfig>,
}

/// Full chart description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Fraction of a category slot given to each bar
    pub bar_width: f64,
    /// Vertical gap between a bar top and its value label, in screen points
    pub label_offset: f32,
    pub y_axis: YAxisConfig,
    pub window: WindowConfig,
    pub dataset: DatasetConfig,
}

impl ChartConfig {
    /// Parse the chart description compiled into the binary.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_json(EMBEDDED_CONFIG)
    }

    /// Parse and validate a chart description from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ChartConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.y_axis.min >= self.y_axis.max {
            return Err(ConfigError::EmptyYRange {
                min: self.y_axis.min,
                max: self.y_axis.max,
            });
        }
        if self.y_axis.tick_step <= 0.0 {
            return Err(ConfigError::InvalidTickStep(self.y_axis.tick_step));
        }
        for series in &self.dataset.series {
            parse_hex_color(&series.color).ok_or_else(|| ConfigError::InvalidColor {
                series: series.name.clone(),
                color: series.color.clone(),
            })?;
        }
        Ok(())
    }
}

/// Parse "#RRGGBB" into RGB bytes.
pub fn parse_hex_color(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_parses() {
        let config = ChartConfig::embedded().unwrap();

        assert_eq!(config.title, "Visitors by web traffic sources");
        assert_eq!(config.bar_width, 0.25);
        assert_eq!(config.dataset.categories.len(), 5);
        let names: Vec<_> = config.dataset.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Searches", "Direct", "Social Media"]);
        assert_eq!(
            config.dataset.series[2].values,
            vec![70.0, 80.0, 90.0, 87.0, 92.0]
        );
    }

    #[test]
    fn test_y_ticks_every_twenty() {
        let config = ChartConfig::embedded().unwrap();

        assert_eq!(
            config.y_axis.ticks(),
            vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]
        );
        assert!(config.y_axis.min < 0.0);
        assert!(config.y_axis.max > 100.0);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#4FA7D8"), Some([0x4F, 0xA7, 0xD8]));
        assert_eq!(parse_hex_color("#ffc700"), Some([255, 199, 0]));
        assert_eq!(parse_hex_color("4FA7D8"), None);
        assert_eq!(parse_hex_color("#4FA7D"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
    }

    #[test]
    fn test_invalid_color_rejected() {
        let mut config = ChartConfig::embedded().unwrap();
        config.dataset.series[1].color = "pink".to_string();
        let json = serde_json::to_string(&config).unwrap();

        match ChartConfig::from_json(&json) {
            Err(ConfigError::InvalidColor { series, color }) => {
                assert_eq!(series, "Direct");
                assert_eq!(color, "pink");
            }
            other => panic!("expected invalid color error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_y_range_rejected() {
        let mut config = ChartConfig::embedded().unwrap();
        config.y_axis.min = 110.0;
        let json = serde_json::to_string(&config).unwrap();

        assert!(matches!(
            ChartConfig::from_json(&json),
            Err(ConfigError::EmptyYRange { .. })
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            ChartConfig::from_json("{ \"title\": 3 }"),
            Err(ConfigError::JsonError(_))
        ));
    }
}
