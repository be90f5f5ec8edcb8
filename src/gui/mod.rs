//! GUI module - interactive chart window

mod viewer;

pub use viewer::{show_chart, ViewerError};
