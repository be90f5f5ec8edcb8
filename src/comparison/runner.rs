//! Comparison Runner
//! Loads a figure's tables, accumulates one series per input, then saves
//! and optionally shows the finalized chart.

use crate::charts::{
    Chart, ChartError, ChartSurface, PaletteCycler, PaletteError, RenderError,
    StaticChartRenderer,
};
use crate::config::{DisplayMode, FigureSpec, Settings};
use crate::data::{DataProcessor, LoaderError, ProcessorError, TableLoader, Tables};
use crate::gui::{self, ViewerError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FigureError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Viewer(#[from] ViewerError),
    #[error("no table loaded for {}", .0.display())]
    TableNotLoaded(PathBuf),
}

/// Load every distinct input of the figure.
pub fn load_tables(figure: &FigureSpec, settings: &Settings) -> Result<Tables, FigureError> {
    let paths: Vec<PathBuf> = figure
        .sources()
        .into_iter()
        .map(|p| settings.resolve(p))
        .collect();
    let tables = TableLoader::read_datafiles(&paths)?;
    for (path, df) in tables.iter() {
        log::debug!("{}: {} rows", path.display(), df.height());
    }
    log::info!("{} tables loaded for {}", tables.len(), figure.name);
    Ok(tables)
}

/// Accumulate the figure's series in order, then finalize the chart.
///
/// Every failure happens here, before anything is drawn.
pub fn build_chart(
    figure: &FigureSpec,
    tables: &Tables,
    settings: &Settings,
) -> Result<Chart, FigureError> {
    let mut palette = PaletteCycler::new(settings.palette);
    let mut surface = ChartSurface::new();

    for series in &figure.series {
        let source = settings.resolve(&series.path);
        let table = tables
            .get(&source)
            .ok_or_else(|| FigureError::TableNotLoaded(source.clone()))?;
        let column = figure.column_for(series);

        let x = DataProcessor::extract_x(table, &source, &figure.x.column, &figure.x.transform)?;
        let y = figure
            .convert
            .apply(&DataProcessor::extract_column(table, &source, column)?);
        log::info!(
            "file {} -> {} data points on {}",
            source.display(),
            y.len(),
            column
        );
        log::debug!("x = {x:?}");
        log::debug!("y = {y:?}");

        let style = palette.next_style()?;
        surface.plot(x, y, series.line, &series.label, style)?;

        if let Some(offsets) = series.annotate {
            let callout = surface.annotate_peak(offsets, figure.convert.unit())?;
            log::debug!(
                "callout `{}` at {:?} for peak {:?}",
                callout.text,
                callout.position,
                callout.anchor
            );
        }
    }

    match palette.remaining() {
        Some(left) => log::debug!("{} series plotted, {left} styles left", surface.series().len()),
        None => log::debug!("{} series plotted", surface.series().len()),
    }
    Ok(surface.finalize(figure.decorations()))
}

/// Save the chart, then open it in a window unless display is suppressed.
pub fn publish(
    chart: Chart,
    settings: &Settings,
    name: &str,
    display: DisplayMode,
) -> Result<PathBuf, FigureError> {
    let path = StaticChartRenderer::save(&chart, settings, name)?;
    if display == DisplayMode::Show {
        gui::show_chart(chart, settings)?;
    }
    Ok(path)
}

/// Full batch job for one figure: file → table → chart.
pub fn run_figure(
    figure: &FigureSpec,
    settings: &Settings,
    display: DisplayMode,
) -> Result<PathBuf, FigureError> {
    let tables = load_tables(figure, settings)?;
    let chart = build_chart(figure, &tables, settings)?;
    publish(chart, settings, &figure.name, display)
}
