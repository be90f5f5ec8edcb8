//! Comparison module - turns figure definitions into saved charts

mod runner;

pub use runner::run_figure;
