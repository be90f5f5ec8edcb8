//! Process-wide render settings, read once at startup.

use crate::charts::PalettePolicy;
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File format of saved charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Vector output
    #[default]
    Svg,
    /// Raster output
    Png,
    /// Vector output, converted from SVG
    Pdf,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
        }
    }
}

/// Whether a saved chart is also shown in a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Show,
    Hidden,
}

impl DisplayMode {
    /// `noshow` suppresses the window, anything else leaves it on.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some("noshow") => DisplayMode::Hidden,
            _ => DisplayMode::Show,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory charts are written to.
    pub destination: PathBuf,
    /// Directory relative CSV paths are resolved against.
    pub data_dir: PathBuf,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    /// Font size of axis descriptions, legend and title.
    pub fs_label: u32,
    /// Font size of tick labels.
    pub fs_axis: u32,
    pub locale: String,
    pub palette: PalettePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            destination: PathBuf::from("figures"),
            data_dir: PathBuf::from("."),
            format: OutputFormat::Svg,
            width: 1024,
            height: 768,
            fs_label: 22,
            fs_axis: 18,
            locale: "en_US.UTF-8".to_string(),
            palette: PalettePolicy::Exhaust,
        }
    }
}

impl Settings {
    /// Defaults, overridden by the JSON file when one is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Export the locale to the environment. Must run before any thread starts.
    pub fn apply_locale(&self) {
        std::env::set_var("LC_ALL", &self.locale);
        std::env::set_var("LANG", &self.locale);
    }

    /// Resolve a figure's CSV path against the data directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noshow_hides_the_window() {
        assert_eq!(DisplayMode::from_arg(Some("noshow")), DisplayMode::Hidden);
        assert_eq!(DisplayMode::from_arg(None), DisplayMode::Show);
        assert_eq!(DisplayMode::from_arg(Some("show")), DisplayMode::Show);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "format": "png", "fs_label": 30 }"#).unwrap();
        assert_eq!(settings.format, OutputFormat::Png);
        assert_eq!(settings.fs_label, 30);
        assert_eq!(settings.fs_axis, 18);
        assert_eq!(settings.destination, PathBuf::from("figures"));
        assert_eq!(settings.palette, PalettePolicy::Exhaust);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let parsed = serde_json::from_str::<Settings>(r#"{ "show": false }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn relative_paths_resolve_against_data_dir() {
        let settings = Settings {
            data_dir: PathBuf::from("/data/run1"),
            ..Settings::default()
        };
        assert_eq!(
            settings.resolve(Path::new("csv/handel_0failing_99thr.csv")),
            PathBuf::from("/data/run1/csv/handel_0failing_99thr.csv")
        );
        assert_eq!(
            settings.resolve(Path::new("/abs/n2.csv")),
            PathBuf::from("/abs/n2.csv")
        );
    }

    #[test]
    fn missing_settings_file_is_reported() {
        let err = Settings::load(Some(Path::new("/nonexistent/settings.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert_eq!(Settings::load(None).unwrap(), Settings::default());
    }
}
