//! Static Chart Renderer
//! Writes finalized charts to image files with plotters (SVG, PNG) and
//! svg2pdf (PDF).
//!
//! Layout follows the benchmark figures: caption on top, one line per
//! series with its marker glyph at every point, legend in the upper left,
//! peak callouts as plain text in data coordinates.

use crate::charts::{Chart, ChartError, LineStyle, Marker, Rgb};
use crate::config::{OutputFormat, Settings};
use plotters::coord::ranged1d::ValueFormatter;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::TAU;
use std::path::{Path, PathBuf};
use svg2pdf::usvg;
use svg2pdf::{ConversionOptions, PageOptions};
use thiserror::Error;

const FONT: &str = "sans-serif";
const LINE_WIDTH: u32 = 2;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("PDF conversion failed: {0}")]
    Pdf(String),
    #[error(transparent)]
    Chart(#[from] ChartError),
}

fn draw_err<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Draw(err.to_string())
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// Marker outline in pixels, relative to the data point.
pub fn marker_outline(marker: Marker, size: f64) -> Vec<(i32, i32)> {
    let r = size * 0.6;
    let points: Vec<(f64, f64)> = match marker {
        Marker::Square => vec![(-r, -r), (r, -r), (r, r), (-r, r)],
        Marker::Diamond => vec![(0.0, -r * 1.3), (r, 0.0), (0.0, r * 1.3), (-r, 0.0)],
        // screen y grows downwards
        Marker::TriangleDown => vec![(-r, -r * 0.8), (r, -r * 0.8), (0.0, r)],
        Marker::Circle => (0..16)
            .map(|i| {
                let a = TAU * i as f64 / 16.0;
                (r * a.cos(), r * a.sin())
            })
            .collect(),
    };
    points
        .into_iter()
        .map(|(x, y)| (x.round() as i32, y.round() as i32))
        .collect()
}

/// Callout text sits above and right of its data coordinate.
fn callout_style(settings: &Settings) -> TextStyle<'static> {
    (FONT, settings.fs_label.saturating_sub(3) as f64)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Bottom))
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Persist the chart as `<destination>/<name>.<ext>`.
    pub fn save(chart: &Chart, settings: &Settings, name: &str) -> Result<PathBuf, RenderError> {
        std::fs::create_dir_all(&settings.destination).map_err(|source| {
            RenderError::CreateDir {
                path: settings.destination.clone(),
                source,
            }
        })?;

        let path = settings
            .destination
            .join(format!("{name}.{}", settings.format.extension()));
        let size = (settings.width, settings.height);

        match settings.format {
            OutputFormat::Svg => {
                Self::render(SVGBackend::new(&path, size).into_drawing_area(), chart, settings)?
            }
            OutputFormat::Png => {
                Self::render(BitMapBackend::new(&path, size).into_drawing_area(), chart, settings)?
            }
            OutputFormat::Pdf => Self::save_pdf(chart, settings, &path)?,
        }

        log::info!("saved {}", path.display());
        Ok(path)
    }

    /// Vector PDF: the chart is drawn to an in-memory SVG, then converted.
    /// The page is exactly the chart size.
    fn save_pdf(chart: &Chart, settings: &Settings, path: &Path) -> Result<(), RenderError> {
        let mut svg = String::new();
        Self::render(
            SVGBackend::with_string(&mut svg, (settings.width, settings.height))
                .into_drawing_area(),
            chart,
            settings,
        )?;

        let mut options = usvg::Options::default();
        options.fontdb_mut().load_system_fonts();
        let tree = usvg::Tree::from_str(&svg, &options)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let pdf = svg2pdf::to_pdf(&tree, ConversionOptions::default(), PageOptions::default())
            .map_err(|e| RenderError::Pdf(e.to_string()))?;

        std::fs::write(path, pdf).map_err(|source| RenderError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    fn render<DB: DrawingBackend>(
        root: DrawingArea<DB, Shift>,
        chart: &Chart,
        settings: &Settings,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(draw_err)?;

        let (x_min, x_max) = chart.x_bounds();
        let (y_min, y_max) = chart.y_bounds()?;

        let mut builder = ChartBuilder::on(&root);
        builder
            .margin(20)
            .x_label_area_size(settings.fs_label * 3)
            .y_label_area_size(settings.fs_label * 4);
        if let Some(title) = &chart.decorations.title {
            builder.caption(title, (FONT, settings.fs_label as f64));
        }

        if chart.decorations.log_y {
            let ctx = builder
                .build_cartesian_2d(x_min..x_max, (y_min..y_max).log_scale())
                .map_err(draw_err)?;
            Self::draw_chart(ctx, chart, settings)?;
        } else {
            let ctx = builder
                .build_cartesian_2d(x_min..x_max, y_min..y_max)
                .map_err(draw_err)?;
            Self::draw_chart(ctx, chart, settings)?;
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }

    fn draw_chart<'a, DB, Y>(
        mut ctx: ChartContext<'a, DB, Cartesian2d<RangedCoordf64, Y>>,
        chart: &Chart,
        settings: &Settings,
    ) -> Result<(), RenderError>
    where
        DB: DrawingBackend + 'a,
        Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
    {
        let label_font = (FONT, settings.fs_label as f64);
        let axis_font = (FONT, settings.fs_axis as f64);
        let log_y = chart.decorations.log_y;

        ctx.configure_mesh()
            .x_desc(chart.decorations.x_label.as_str())
            .y_desc(chart.decorations.y_label.as_str())
            .axis_desc_style(label_font)
            .label_style(axis_font)
            .draw()
            .map_err(draw_err)?;

        for series in &chart.series {
            let points: Vec<(f64, f64)> = series
                .points()
                .filter(|(_, y)| !log_y || *y > 0.0)
                .collect();
            let line = rgb(series.style.line);
            let fill = rgb(series.style.fill);
            let stroke = line.stroke_width(LINE_WIDTH);

            let anno = match series.line {
                LineStyle::Solid => ctx.draw_series(LineSeries::new(points.clone(), stroke)),
                LineStyle::Dashed => {
                    ctx.draw_series(DashedLineSeries::new(points.clone(), 10, 6, stroke))
                }
                LineStyle::Dotted => {
                    ctx.draw_series(DashedLineSeries::new(points.clone(), 2, 4, stroke))
                }
            }
            .map_err(draw_err)?;

            let legend_outline = marker_outline(series.style.marker, series.style.marker_size);
            anno.label(series.label.as_str()).legend(move |(x, y)| {
                EmptyElement::at((x, y))
                    + PathElement::new(vec![(-12, 0), (12, 0)], stroke)
                    + Polygon::new(legend_outline.clone(), fill.filled())
            });

            let outline = marker_outline(series.style.marker, series.style.marker_size);
            let mut closed = outline.clone();
            closed.extend(outline.first().copied());
            ctx.draw_series(points.iter().map(|&point| {
                EmptyElement::at(point)
                    + Polygon::new(outline.clone(), fill.filled())
                    + PathElement::new(closed.clone(), line.stroke_width(1))
            }))
            .map_err(draw_err)?;
        }

        let callout_font = callout_style(settings);
        for callout in &chart.annotations {
            if log_y && callout.position.1 <= 0.0 {
                continue;
            }
            ctx.draw_series(std::iter::once(Text::new(
                callout.text.clone(),
                callout.position,
                callout_font.clone(),
            )))
            .map_err(draw_err)?;
        }

        if !chart.series.is_empty() {
            ctx.configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .label_font(label_font)
                .draw()
                .map_err(draw_err)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outlines_scale_with_marker_size() {
        let small = marker_outline(Marker::Square, 5.0);
        let large = marker_outline(Marker::Square, 10.0);
        assert_eq!(small.len(), 4);
        assert!(large[2].0 > small[2].0);
    }

    #[test]
    fn triangle_points_down() {
        let outline = marker_outline(Marker::TriangleDown, 11.0);
        assert_eq!(outline.len(), 3);
        // apex below the base in screen coordinates
        assert!(outline[2].1 > outline[0].1);
        assert_eq!(outline[2].0, 0);
    }

    #[test]
    fn callouts_hang_from_their_lower_left_corner() {
        let style = callout_style(&Settings::default());
        assert!(matches!(style.pos.h_pos, HPos::Left));
        assert!(matches!(style.pos.v_pos, VPos::Bottom));
        assert_eq!(style.font.get_size(), 19.0);
    }

    #[test]
    fn circle_is_closed_around_the_point() {
        let outline = marker_outline(Marker::Circle, 10.0);
        assert_eq!(outline.len(), 16);
        assert_eq!(outline[0], (6, 0));
    }
}
