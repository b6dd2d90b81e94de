//! Data module - traffic table construction

mod loader;
mod processor;

pub use loader::DatasetLoader;
pub use processor::{DataProcessor, Series, TrafficTable};
