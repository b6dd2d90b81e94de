//! Data Processor Module
//! Extracts the category axis and the traffic series from a DataFrame.

use crate::config::{parse_hex_color, DatasetConfig};
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{0}' not found")]
    MissingColumn(String),
    #[error("Null value in column '{column}' at row {row}")]
    NullValue { column: String, row: usize },
    #[error("Non-finite value {value} in column '{column}' at row {row}")]
    NonFinite {
        column: String,
        row: usize,
        value: f64,
    },
    #[error("Invalid color '{0}'")]
    InvalidColor(String),
}

/// One traffic source, aligned by index with the category axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub color: [u8; 3],
    pub values: Vec<f64>,
}

/// Category axis plus the series compared across it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficTable {
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

impl TrafficTable {
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Largest value across all series, 0.0 for an empty table.
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold(0.0, f64::max)
    }
}

/// Handles the frame-to-table conversion.
pub struct DataProcessor;

impl DataProcessor {
    /// Read the category column and every configured series column.
    ///
    /// Series columns are cast to Float64, so integer columns are accepted.
    pub fn extract_table(
        df: &DataFrame,
        dataset: &DatasetConfig,
    ) -> Result<TrafficTable, ProcessorError> {
        let categories = Self::category_labels(df, &dataset.category_column)?;

        let series = dataset
            .series
            .iter()
            .map(|config| {
                let color = parse_hex_color(&config.color)
                    .ok_or_else(|| ProcessorError::InvalidColor(config.color.clone()))?;
                Ok(Series {
                    name: config.name.clone(),
                    color,
                    values: Self::numeric_values(df, &config.name)?,
                })
            })
            .collect::<Result<Vec<_>, ProcessorError>>()?;

        debug!(
            categories = categories.len(),
            series = series.len(),
            "extracted traffic table"
        );

        Ok(TrafficTable { categories, series })
    }

    fn category_labels(df: &DataFrame, column: &str) -> Result<Vec<String>, ProcessorError> {
        let col = df
            .column(column)
            .map_err(|_| ProcessorError::MissingColumn(column.to_string()))?;

        col.as_materialized_series()
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, label)| {
                label.map(str::to_string).ok_or_else(|| ProcessorError::NullValue {
                    column: column.to_string(),
                    row,
                })
            })
            .collect()
    }

    fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<f64>, ProcessorError> {
        let col = df
            .column(column)
            .map_err(|_| ProcessorError::MissingColumn(column.to_string()))?;
        let values = col.cast(&DataType::Float64)?;

        values
            .f64()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| match value {
                Some(v) if v.is_finite() => Ok(v),
                Some(v) => Err(ProcessorError::NonFinite {
                    column: column.to_string(),
                    row,
                    value: v,
                }),
                None => Err(ProcessorError::NullValue {
                    column: column.to_string(),
                    row,
                }),
            })
            .collect()
    }
}
