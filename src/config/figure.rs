//! Figure definitions: which files are compared, how, and under which labels.

use crate::charts::{Decorations, LineStyle, PeakOffsets};
use crate::config::{presets, ConfigError};
use crate::data::{UnitConversion, XTransform};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const NODES_COLUMN: &str = "totalNbOfNodes";

fn default_x_column() -> String {
    NODES_COLUMN.to_string()
}

/// Column and transform of the x axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct XAxis {
    #[serde(default = "default_x_column")]
    pub column: String,
    #[serde(default)]
    pub transform: XTransform,
}

impl Default for XAxis {
    fn default() -> Self {
        Self {
            column: default_x_column(),
            transform: XTransform::Identity,
        }
    }
}

/// One input file and how it shows up on the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesSpec {
    pub path: PathBuf,
    pub label: String,
    /// Metric column, when it differs from the figure's.
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub line: LineStyle,
    #[serde(default)]
    pub annotate: Option<PeakOffsets>,
}

impl SeriesSpec {
    pub fn new(path: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            column: None,
            line: LineStyle::Solid,
            annotate: None,
        }
    }

    pub fn with_column(mut self, column: &str) -> Self {
        self.column = Some(column.to_string());
        self
    }

    pub fn with_peak(mut self, x_offset: f64, y_offset: f64) -> Self {
        self.annotate = Some(PeakOffsets { x_offset, y_offset });
        self
    }

    /// Parse a `FILE=LABEL` command-line pair. The path ends at the first
    /// `=`; the label is free text and may contain `=` itself.
    pub fn parse_pair(arg: &str) -> Result<Self, ConfigError> {
        match arg.split_once('=') {
            Some((path, label)) if !path.is_empty() && !label.trim().is_empty() => {
                Ok(Self::new(path, label.trim()))
            }
            Some((path, _)) if !path.is_empty() => Err(ConfigError::MissingLabel {
                figure: "custom".to_string(),
                path: PathBuf::from(path),
            }),
            _ => Err(ConfigError::MissingLabel {
                figure: "custom".to_string(),
                path: PathBuf::from(arg),
            }),
        }
    }
}

/// A complete comparison chart definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FigureSpec {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    #[serde(default)]
    pub x: XAxis,
    /// Metric column drawn on the y axis.
    pub column: String,
    #[serde(default)]
    pub convert: UnitConversion,
    #[serde(default)]
    pub log_y: bool,
    pub series: Vec<SeriesSpec>,
}

impl FigureSpec {
    pub fn column_for<'a>(&'a self, series: &'a SeriesSpec) -> &'a str {
        series.column.as_deref().unwrap_or(&self.column)
    }

    pub fn decorations(&self) -> Decorations {
        Decorations {
            title: self.title.clone(),
            x_label: self.x_label.clone(),
            y_label: self.y_label.clone(),
            log_y: self.log_y,
        }
    }

    /// Distinct input files, in first-use order.
    pub fn sources(&self) -> Vec<&Path> {
        let mut sources: Vec<&Path> = Vec::new();
        for series in &self.series {
            if !sources.contains(&series.path.as_path()) {
                sources.push(&series.path);
            }
        }
        sources
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::UnnamedFigure);
        }
        if self.series.is_empty() {
            return Err(ConfigError::NoSeries {
                figure: self.name.clone(),
            });
        }
        if self.column.trim().is_empty() || self.x.column.trim().is_empty() {
            return Err(ConfigError::MissingColumn {
                figure: self.name.clone(),
            });
        }
        for series in &self.series {
            if series.label.trim().is_empty() {
                return Err(ConfigError::MissingLabel {
                    figure: self.name.clone(),
                    path: series.path.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Every figure the binary knows about.
#[derive(Debug, Clone)]
pub struct Catalog {
    figures: Vec<FigureSpec>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            figures: presets::all(),
        }
    }

    /// Add figures from a JSON array; a figure with a known name replaces it.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let figures: Vec<FigureSpec> =
            serde_json::from_str(&text).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        self.extend(figures);
        Ok(())
    }

    pub fn extend(&mut self, figures: impl IntoIterator<Item = FigureSpec>) {
        for figure in figures {
            match self.figures.iter_mut().find(|f| f.name == figure.name) {
                Some(existing) => *existing = figure,
                None => self.figures.push(figure),
            }
        }
    }

    /// Check every figure up front so a bad label never surfaces mid-run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.figures.iter().try_for_each(FigureSpec::validate)
    }

    pub fn get(&self, name: &str) -> Result<&FigureSpec, ConfigError> {
        self.figures
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| ConfigError::UnknownFigure {
                name: name.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &FigureSpec> {
        self.figures.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figure(series: Vec<SeriesSpec>) -> FigureSpec {
        FigureSpec {
            name: "t".into(),
            title: None,
            x_label: "nodes".into(),
            y_label: "KBytes".into(),
            x: XAxis::default(),
            column: "net_sentBytes_avg".into(),
            convert: UnitConversion::BytesToKilobytes,
            log_y: false,
            series,
        }
    }

    #[test]
    fn empty_label_fails_validation() {
        let fig = figure(vec![
            SeriesSpec::new("csv/a.csv", "handel"),
            SeriesSpec::new("csv/b.csv", "  "),
        ]);
        match fig.validate().unwrap_err() {
            ConfigError::MissingLabel { figure, path } => {
                assert_eq!(figure, "t");
                assert_eq!(path, PathBuf::from("csv/b.csv"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn figure_without_series_fails_validation() {
        assert!(matches!(
            figure(vec![]).validate(),
            Err(ConfigError::NoSeries { .. })
        ));
    }

    #[test]
    fn sources_are_distinct_and_ordered() {
        let fig = figure(vec![
            SeriesSpec::new("b.csv", "avg"),
            SeriesSpec::new("a.csv", "x"),
            SeriesSpec::new("b.csv", "max").with_column("sigen_wall_max"),
        ]);
        assert_eq!(fig.sources(), vec![Path::new("b.csv"), Path::new("a.csv")]);
        assert_eq!(fig.column_for(&fig.series[2]), "sigen_wall_max");
        assert_eq!(fig.column_for(&fig.series[0]), "net_sentBytes_avg");
    }

    #[test]
    fn pairs_need_a_label() {
        let spec = SeriesSpec::parse_pair("csv/handel_2000.csv=50ms timeout").unwrap();
        assert_eq!(spec.path, PathBuf::from("csv/handel_2000.csv"));
        assert_eq!(spec.label, "50ms timeout");

        assert!(matches!(
            SeriesSpec::parse_pair("csv/handel_2000.csv"),
            Err(ConfigError::MissingLabel { .. })
        ));
        assert!(matches!(
            SeriesSpec::parse_pair("csv/handel_2000.csv="),
            Err(ConfigError::MissingLabel { .. })
        ));
    }

    #[test]
    fn labels_may_contain_equals_signs() {
        let spec = SeriesSpec::parse_pair("csv/a.csv=x=y").unwrap();
        assert_eq!(spec.path, PathBuf::from("csv/a.csv"));
        assert_eq!(spec.label, "x=y");

        let spec = SeriesSpec::parse_pair("csv/t.csv=threshold = 51%").unwrap();
        assert_eq!(spec.label, "threshold = 51%");
    }

    #[test]
    fn figures_deserialize_with_defaults() {
        let json = r#"[{
            "name": "comparison_time",
            "x_label": "Number of Handel nodes",
            "y_label": "Signature generation (ms)",
            "column": "sigen_wall_avg",
            "convert": "seconds_to_millis",
            "series": [
                { "path": "csv/handel_0failing_99thr.csv", "label": "Handel",
                  "annotate": { "x_offset": 0.10, "y_offset": 0.14 } }
            ]
        }]"#;
        let figures: Vec<FigureSpec> = serde_json::from_str(json).unwrap();
        let fig = &figures[0];
        assert_eq!(fig.x.column, NODES_COLUMN);
        assert_eq!(fig.x.transform, XTransform::Identity);
        assert!(!fig.log_y);
        assert_eq!(fig.series[0].line, LineStyle::Solid);
        assert_eq!(
            fig.series[0].annotate,
            Some(PeakOffsets {
                x_offset: 0.10,
                y_offset: 0.14
            })
        );
    }

    #[test]
    fn missing_label_field_is_a_parse_error() {
        let json = r#"[{ "name": "x", "x_label": "a", "y_label": "b", "column": "c",
                         "series": [{ "path": "a.csv" }] }]"#;
        assert!(serde_json::from_str::<Vec<FigureSpec>>(json).is_err());
    }

    #[test]
    fn extending_replaces_by_name() {
        let mut catalog = Catalog::builtin();
        let before = catalog.iter().count();
        let mut replacement = catalog.get("comparison_network").unwrap().clone();
        replacement.log_y = false;
        catalog.extend([replacement, figure(vec![SeriesSpec::new("a.csv", "a")])]);

        assert_eq!(catalog.iter().count(), before + 1);
        assert!(!catalog.get("comparison_network").unwrap().log_y);
        assert!(matches!(
            catalog.get("nope"),
            Err(ConfigError::UnknownFigure { .. })
        ));
    }
}
