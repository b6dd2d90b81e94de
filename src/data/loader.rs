//! Dataset Loader Module
//! Builds a Polars DataFrame from the compiled-in traffic dataset.

use crate::config::DatasetConfig;
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to build DataFrame: {0}")]
    FrameError(#[from] PolarsError),
    #[error("Dataset has no series")]
    NoSeries,
    #[error("Series '{series}' has {actual} values but there are {expected} categories")]
    LengthMismatch {
        series: String,
        expected: usize,
        actual: usize,
    },
}

/// Turns the dataset description into a wide DataFrame:
/// one category column followed by one Float64 column per series.
pub struct DatasetLoader;

impl DatasetLoader {
    pub fn to_dataframe(dataset: &DatasetConfig) -> Result<DataFrame, LoaderError> {
        if dataset.series.is_empty() {
            return Err(LoaderError::NoSeries);
        }

        let expected = dataset.categories.len();
        if let Some(bad) = dataset.series.iter().find(|s| s.values.len() != expected) {
            return Err(LoaderError::LengthMismatch {
                series: bad.name.clone(),
                expected,
                actual: bad.values.len(),
            });
        }

        let mut columns = Vec::with_capacity(dataset.series.len() + 1);
        columns.push(Column::new(
            dataset.category_column.as_str().into(),
            dataset.categories.clone(),
        ));
        for series in &dataset.series {
            columns.push(Column::new(series.name.as_str().into(), series.values.clone()));
        }

        let df = DataFrame::new(columns)?;
        debug!(rows = df.height(), columns = df.width(), "built traffic frame");
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;

    #[test]
    fn test_embedded_dataset_to_dataframe() {
        let config = ChartConfig::embedded().unwrap();
        let df = DatasetLoader::to_dataframe(&config.dataset).unwrap();

        assert_eq!(df.height(), 5);
        assert_eq!(
            df.get_column_names(),
            vec!["month", "Searches", "Direct", "Social Media"]
        );
        assert_eq!(df.column("Direct").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut config = ChartConfig::embedded().unwrap();
        config.dataset.series[0].values.pop();

        match DatasetLoader::to_dataframe(&config.dataset) {
            Err(LoaderError::LengthMismatch {
                series,
                expected,
                actual,
            }) => {
                assert_eq!(series, "Searches");
                assert_eq!(expected, 5);
                assert_eq!(actual, 4);
            }
            other => panic!("expected length mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_no_series_rejected() {
        let mut config = ChartConfig::embedded().unwrap();
        config.dataset.series.clear();

        assert!(matches!(
            DatasetLoader::to_dataframe(&config.dataset),
            Err(LoaderError::NoSeries)
        ));
    }
}
