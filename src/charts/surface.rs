//! Chart surface: series accumulate here until the chart is finalized.

use crate::charts::Style;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ChartError {
    #[error("series `{label}` has {x} x values but {y} y values")]
    LengthMismatch { label: String, x: usize, y: usize },
    #[error("series `{label}` has no points to annotate")]
    EmptySeries { label: String },
    #[error("nothing plotted yet")]
    NoSeries,
    #[error("log scale needs positive values, none found")]
    NoPositiveValues,
}

/// Stroke pattern of a series line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// One labeled line of the chart.
#[derive(Debug, Clone)]
pub struct Series {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub line: LineStyle,
    pub style: Style,
}

impl Series {
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Callout placement, as fractions of the peak coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakOffsets {
    pub x_offset: f64,
    pub y_offset: f64,
}

/// Text pinned to a data coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    /// The annotated data point.
    pub anchor: (f64, f64),
    /// Where the text is drawn.
    pub position: (f64, f64),
}

impl Annotation {
    /// Callout for a series peak: text sits slightly inside the maximum.
    pub fn peak(x: &[f64], y: &[f64], offsets: PeakOffsets, unit: &str) -> Option<Self> {
        let x_max = x.iter().copied().reduce(f64::max)?;
        let y_max = y.iter().copied().reduce(f64::max)?;
        let value = y_max.trunc() as i64;
        let text = if unit.is_empty() {
            value.to_string()
        } else {
            format!("{value} {unit}")
        };
        Some(Self {
            text,
            anchor: (x_max, y_max),
            position: (x_max - x_max * offsets.x_offset, y_max + y_max * offsets.y_offset),
        })
    }
}

/// Axis labels, title and scale applied when the chart is finalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decorations {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    pub log_y: bool,
}

/// A chart still accepting series.
#[derive(Debug, Default)]
pub struct ChartSurface {
    series: Vec<Series>,
    annotations: Vec<Annotation>,
}

impl ChartSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw one labeled series.
    pub fn plot(
        &mut self,
        x: Vec<f64>,
        y: Vec<f64>,
        line: LineStyle,
        label: &str,
        style: Style,
    ) -> Result<(), ChartError> {
        if x.len() != y.len() {
            return Err(ChartError::LengthMismatch {
                label: label.to_string(),
                x: x.len(),
                y: y.len(),
            });
        }
        self.series.push(Series {
            label: label.to_string(),
            x,
            y,
            line,
            style,
        });
        Ok(())
    }

    /// Annotate the peak of the most recently plotted series.
    pub fn annotate_peak(
        &mut self,
        offsets: PeakOffsets,
        unit: &str,
    ) -> Result<&Annotation, ChartError> {
        let last = self.series.last().ok_or(ChartError::NoSeries)?;
        let annotation = Annotation::peak(&last.x, &last.y, offsets, unit).ok_or_else(|| {
            ChartError::EmptySeries {
                label: last.label.clone(),
            }
        })?;
        self.annotations.push(annotation);
        Ok(&self.annotations[self.annotations.len() - 1])
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Terminal transition: no series can be added afterwards.
    pub fn finalize(self, decorations: Decorations) -> Chart {
        Chart {
            series: self.series,
            annotations: self.annotations,
            decorations,
        }
    }
}

/// A finalized chart, ready to be saved or shown.
#[derive(Debug, Clone)]
pub struct Chart {
    pub series: Vec<Series>,
    pub annotations: Vec<Annotation>,
    pub decorations: Decorations,
}

impl Chart {
    fn values(&self, axis: fn((f64, f64)) -> f64) -> impl Iterator<Item = f64> + '_ {
        let points = self.series.iter().flat_map(move |s| s.points().map(axis));
        let callouts = self.annotations.iter().map(move |a| axis(a.position));
        points.chain(callouts).filter(|v| v.is_finite())
    }

    /// Padded x range covering every point and callout.
    pub fn x_bounds(&self) -> (f64, f64) {
        pad_linear(self.values(|(x, _)| x))
    }

    /// Padded y range; on a log axis only positive values count.
    pub fn y_bounds(&self) -> Result<(f64, f64), ChartError> {
        if !self.decorations.log_y {
            return Ok(pad_linear(self.values(|(_, y)| y)));
        }
        let (lo, hi) = self
            .values(|(_, y)| y)
            .filter(|v| *v > 0.0)
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .ok_or(ChartError::NoPositiveValues)?;
        Ok((lo / 1.5, hi * 1.5))
    }
}

fn pad_linear(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let bounds = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    });
    match bounds {
        None => (0.0, 1.0),
        Some((lo, hi)) if (hi - lo).abs() < f64::EPSILON => (lo - 1.0, hi + 1.0),
        Some((lo, hi)) => {
            let pad = (hi - lo) * 0.05;
            (lo - pad, hi + pad)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::palette::{GREEN, RED};

    #[test]
    fn mismatched_lengths_are_rejected() {
        let mut surface = ChartSurface::new();
        let err = surface
            .plot(vec![1.0, 2.0], vec![1.0], LineStyle::Solid, "handel", GREEN)
            .unwrap_err();
        assert_eq!(
            err,
            ChartError::LengthMismatch {
                label: "handel".into(),
                x: 2,
                y: 1
            }
        );
        assert!(surface.series().is_empty());
    }

    #[test]
    fn peak_callout_sits_inside_the_maximum() {
        let mut surface = ChartSurface::new();
        surface
            .plot(vec![10.0, 100.0], vec![50.0, 120.0], LineStyle::Solid, "Handel", GREEN)
            .unwrap();
        let callout = surface
            .annotate_peak(
                PeakOffsets {
                    x_offset: 0.10,
                    y_offset: 0.14,
                },
                "ms",
            )
            .unwrap()
            .clone();

        assert_eq!(callout.text, "120 ms");
        assert_eq!(callout.anchor, (100.0, 120.0));
        assert!((callout.position.0 - 90.0).abs() < 1e-9);
        assert!((callout.position.1 - 136.8).abs() < 1e-9);
    }

    #[test]
    fn callout_value_is_truncated() {
        let a = Annotation::peak(
            &[1.0],
            &[99.9],
            PeakOffsets {
                x_offset: 0.0,
                y_offset: 0.0,
            },
            "",
        )
        .unwrap();
        assert_eq!(a.text, "99");
    }

    #[test]
    fn annotating_needs_points() {
        let offsets = PeakOffsets {
            x_offset: 0.1,
            y_offset: 0.1,
        };
        let mut surface = ChartSurface::new();
        assert_eq!(surface.annotate_peak(offsets, "ms").unwrap_err(), ChartError::NoSeries);

        surface
            .plot(vec![], vec![], LineStyle::Solid, "empty", RED)
            .unwrap();
        assert!(matches!(
            surface.annotate_peak(offsets, "ms"),
            Err(ChartError::EmptySeries { .. })
        ));
    }

    #[test]
    fn bounds_cover_series_and_callouts() {
        let mut surface = ChartSurface::new();
        surface
            .plot(vec![10.0, 100.0], vec![50.0, 120.0], LineStyle::Solid, "a", GREEN)
            .unwrap();
        surface
            .annotate_peak(
                PeakOffsets {
                    x_offset: 0.1,
                    y_offset: 0.5,
                },
                "ms",
            )
            .unwrap();
        let chart = surface.finalize(Decorations::default());

        let (x0, x1) = chart.x_bounds();
        assert!(x0 < 10.0 && x1 > 100.0);
        let (_, y1) = chart.y_bounds().unwrap();
        assert!(y1 > 180.0);
    }

    #[test]
    fn log_bounds_skip_non_positive_values() {
        let mut surface = ChartSurface::new();
        surface
            .plot(vec![1.0, 2.0, 3.0], vec![0.0, 2.0, 8.0], LineStyle::Solid, "a", GREEN)
            .unwrap();
        let chart = surface.finalize(Decorations {
            log_y: true,
            ..Decorations::default()
        });
        let (lo, hi) = chart.y_bounds().unwrap();
        assert!(lo > 0.0 && lo < 2.0);
        assert!(hi > 8.0);

        let empty = ChartSurface::new().finalize(Decorations {
            log_y: true,
            ..Decorations::default()
        });
        assert_eq!(empty.y_bounds(), Err(ChartError::NoPositiveValues));
    }
}
