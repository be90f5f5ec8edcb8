//! Config module - render settings and figure definitions

mod figure;
mod presets;
mod settings;

pub use figure::{Catalog, FigureSpec, SeriesSpec, XAxis};
pub use settings::{DisplayMode, OutputFormat, Settings};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("missing label for {} in figure `{figure}`", path.display())]
    MissingLabel { figure: String, path: PathBuf },
    #[error("figure `{figure}` has no series")]
    NoSeries { figure: String },
    #[error("figure `{figure}` needs an x and a y column")]
    MissingColumn { figure: String },
    #[error("figure without a name")]
    UnnamedFigure,
    #[error("unknown figure `{name}`, see `handel-plots list`")]
    UnknownFigure { name: String },
}
