//! Chart Viewer Window
//! Shows a finalized chart interactively using egui_plot.

use crate::charts::{Chart, LineStyle, Marker, Rgb};
use crate::config::Settings;
use egui::{Align2, Color32, RichText};
use egui_plot::{
    Corner, Legend, Line, LineStyle as PlotLineStyle, MarkerShape, Plot, PlotPoint, PlotPoints,
    Points, Text,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("chart window failed: {0}")]
    Window(String),
}

fn color(c: Rgb) -> Color32 {
    Color32::from_rgb(c.0, c.1, c.2)
}

fn marker_shape(marker: Marker) -> MarkerShape {
    match marker {
        Marker::Square => MarkerShape::Square,
        Marker::Diamond => MarkerShape::Diamond,
        Marker::Circle => MarkerShape::Circle,
        Marker::TriangleDown => MarkerShape::Down,
    }
}

fn line_style(line: LineStyle) -> PlotLineStyle {
    match line {
        LineStyle::Solid => PlotLineStyle::Solid,
        LineStyle::Dashed => PlotLineStyle::dashed_loose(),
        LineStyle::Dotted => PlotLineStyle::dotted_dense(),
    }
}

/// Tick label of a log10-transformed axis.
fn log_tick_label(exponent: f64) -> String {
    if (exponent - exponent.round()).abs() < 1e-9 {
        format!("1e{}", exponent.round() as i32)
    } else {
        format!("{:.1}", 10f64.powf(exponent))
    }
}

/// Window content for one chart.
pub struct ChartViewer {
    chart: Chart,
    fs_label: f32,
    fs_axis: f32,
}

impl ChartViewer {
    pub fn new(chart: Chart, settings: &Settings) -> Self {
        Self {
            chart,
            fs_label: settings.fs_label as f32,
            fs_axis: settings.fs_axis as f32,
        }
    }

    /// egui_plot has no log axis: log charts plot log10(y) instead.
    fn plot_point(&self, (x, y): (f64, f64)) -> Option<[f64; 2]> {
        if self.chart.decorations.log_y {
            (y > 0.0).then(|| [x, y.log10()])
        } else {
            Some([x, y])
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let decorations = &self.chart.decorations;
        if let Some(title) = &decorations.title {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(title).size(self.fs_label).strong());
            });
        }

        let mut plot = Plot::new("comparison_chart")
            .legend(Legend::default().position(Corner::LeftTop))
            .x_axis_label(RichText::new(&decorations.x_label).size(self.fs_label))
            .y_axis_label(RichText::new(&decorations.y_label).size(self.fs_label))
            .allow_scroll(false);
        if decorations.log_y {
            plot = plot.y_axis_formatter(|mark, _range| log_tick_label(mark.value));
        }

        plot.show(ui, |plot_ui| {
            for series in &self.chart.series {
                let points: Vec<[f64; 2]> = series
                    .points()
                    .filter_map(|p| self.plot_point(p))
                    .collect();
                let shape = marker_shape(series.style.marker);
                let radius = (series.style.marker_size * 0.5) as f32;

                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .color(color(series.style.line))
                        .style(line_style(series.line))
                        .width(2.0)
                        .name(&series.label),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(points.clone()))
                        .shape(shape)
                        .radius(radius + 1.0)
                        .filled(true)
                        .color(color(series.style.line))
                        .name(&series.label),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .shape(shape)
                        .radius(radius)
                        .filled(true)
                        .color(color(series.style.fill))
                        .name(&series.label),
                );
            }

            for callout in &self.chart.annotations {
                let Some([x, y]) = self.plot_point(callout.position) else {
                    continue;
                };
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(x, y),
                        RichText::new(&callout.text).size(self.fs_label - 3.0),
                    )
                    .anchor(Align2::LEFT_BOTTOM)
                    .color(Color32::BLACK),
                );
            }
        });

        ui.label(RichText::new(format!("{} series", self.chart.series.len())).size(self.fs_axis));
    }
}

impl eframe::App for ChartViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show(ui);
        });
    }
}

/// Open a native window on the chart; returns once it is closed.
pub fn show_chart(chart: Chart, settings: &Settings) -> Result<(), ViewerError> {
    let title = chart
        .decorations
        .title
        .clone()
        .unwrap_or_else(|| "handel-plots".to_string());
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.width as f32, settings.height as f32])
            .with_title(title.as_str()),
        ..Default::default()
    };

    let viewer = ChartViewer::new(chart, settings);
    eframe::run_native(
        "handel-plots",
        options,
        Box::new(move |_cc| Ok(Box::new(viewer))),
    )
    .map_err(|e| ViewerError::Window(e.to_string()))
}
