//! Data Processor Module
//! Column extraction and the unit conversions applied to benchmark metrics.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("column `{column}` not found in {}", source_path.display())]
    MissingColumn { source_path: PathBuf, column: String },
    #[error("column `{column}` of {} has no value at row {row}", source_path.display())]
    NullValue {
        source_path: PathBuf,
        column: String,
        row: usize,
    },
    #[error("{}: nodes should be {expected}, found {found}", source_path.display())]
    NodeCountMismatch {
        source_path: PathBuf,
        expected: u64,
        found: u64,
    },
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Conversion applied to every value of the metric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum UnitConversion {
    #[default]
    Identity,
    BytesToKilobytes,
    SecondsToMillis,
}

impl UnitConversion {
    pub fn apply(self, values: &[f64]) -> Vec<f64> {
        match self {
            UnitConversion::Identity => values.to_vec(),
            UnitConversion::BytesToKilobytes => values.iter().map(|v| v / 1024.0).collect(),
            UnitConversion::SecondsToMillis => values.iter().map(|v| v * 1000.0).collect(),
        }
    }

    /// Unit suffix of converted values, used in peak callouts.
    pub fn unit(self) -> &'static str {
        match self {
            UnitConversion::Identity => "",
            UnitConversion::BytesToKilobytes => "KB",
            UnitConversion::SecondsToMillis => "ms",
        }
    }
}

/// Transformation of the x column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum XTransform {
    #[default]
    Identity,
    /// x as an integer percentage of the node count found in `nodes_column`.
    PercentOfNodes {
        nodes_column: String,
        #[serde(default)]
        expected_nodes: Option<u64>,
    },
}

/// Stateless helpers turning table columns into plot-ready values.
pub struct DataProcessor;

impl DataProcessor {
    /// Extract a column as `f64` values.
    pub fn extract_column(
        df: &DataFrame,
        source_path: &Path,
        column: &str,
    ) -> Result<Vec<f64>, ProcessorError> {
        if df.get_column_index(column).is_none() {
            return Err(ProcessorError::MissingColumn {
                source_path: source_path.to_path_buf(),
                column: column.to_string(),
            });
        }

        let values = df.column(column)?.cast(&DataType::Float64)?;
        values
            .f64()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                v.ok_or_else(|| ProcessorError::NullValue {
                    source_path: source_path.to_path_buf(),
                    column: column.to_string(),
                    row,
                })
            })
            .collect()
    }

    /// Extract the x column and apply its transform.
    pub fn extract_x(
        df: &DataFrame,
        source_path: &Path,
        column: &str,
        transform: &XTransform,
    ) -> Result<Vec<f64>, ProcessorError> {
        let x = Self::extract_column(df, source_path, column)?;
        match transform {
            XTransform::Identity => Ok(x),
            XTransform::PercentOfNodes {
                nodes_column,
                expected_nodes,
            } => {
                let nodes = Self::extract_column(df, source_path, nodes_column)?;
                if let Some(expected) = *expected_nodes {
                    let found = if nodes.is_empty() {
                        0
                    } else {
                        (nodes.iter().sum::<f64>() / nodes.len() as f64) as u64
                    };
                    if found != expected {
                        return Err(ProcessorError::NodeCountMismatch {
                            source_path: source_path.to_path_buf(),
                            expected,
                            found,
                        });
                    }
                }
                let total = nodes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                Ok(x.iter().map(|v| (v / total * 100.0).trunc()).collect())
            }
        }
    }
}
