//! Data module - CSV loading and column processing

mod loader;
mod processor;

pub use loader::{LoaderError, TableLoader, Tables};
pub use processor::{DataProcessor, ProcessorError, UnitConversion, XTransform};
