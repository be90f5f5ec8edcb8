//! Handel Plots - comparison charts from Handel simulation CSV results
//!
//! Every figure reads one or more CSV files, plots one labeled series per
//! input on a shared chart, saves it and optionally shows it in a window.

mod charts;
mod comparison;
mod config;
mod data;
mod gui;

use anyhow::Context;
use charts::PalettePolicy;
use clap::{Args, Parser, Subcommand};
use config::{Catalog, ConfigError, DisplayMode, FigureSpec, OutputFormat, SeriesSpec, Settings, XAxis};
use data::UnitConversion;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "handel-plots", version, about = "Comparison charts for Handel simulation results")]
struct Cli {
    /// JSON render settings
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// JSON array of extra figure definitions
    #[arg(long, value_name = "FILE")]
    figures: Option<PathBuf>,

    /// Directory CSV paths are resolved against
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Directory charts are written to
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Reuse palette styles instead of failing after the fourth series
    #[arg(long)]
    wrap_palette: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List known figures
    List,
    /// Render a known figure
    Plot {
        figure: String,
        /// `noshow` saves the chart without opening a window
        display: Option<String>,
    },
    /// Compare arbitrary CSV files
    Custom(CustomArgs),
}

#[derive(Args, Debug)]
struct CustomArgs {
    #[arg(long)]
    y_label: String,

    #[arg(long, default_value = "sigen_wall_avg")]
    column: String,

    #[arg(long, value_enum, default_value_t = UnitConversion::Identity)]
    convert: UnitConversion,

    #[arg(long)]
    title: Option<String>,

    #[arg(long, default_value = "nodes")]
    x_label: String,

    #[arg(long)]
    log_y: bool,

    /// Output file name, without extension
    #[arg(long, default_value = "custom")]
    name: String,

    /// Input files, each as FILE=LABEL, optionally followed by `noshow`
    #[arg(required = true, value_name = "FILE=LABEL")]
    pairs: Vec<String>,
}

impl CustomArgs {
    /// A trailing `noshow` token works as it does for `plot`.
    fn display(&mut self) -> DisplayMode {
        let display = DisplayMode::from_arg(self.pairs.last().map(String::as_str));
        if display == DisplayMode::Hidden {
            self.pairs.pop();
        }
        display
    }

    fn into_figure(self) -> Result<FigureSpec, ConfigError> {
        let series = self
            .pairs
            .iter()
            .map(|pair| SeriesSpec::parse_pair(pair))
            .collect::<Result<Vec<_>, _>>()?;
        let figure = FigureSpec {
            name: self.name,
            title: self.title,
            x_label: self.x_label,
            y_label: self.y_label,
            x: XAxis::default(),
            column: self.column,
            convert: self.convert,
            log_y: self.log_y,
            series,
        };
        figure.validate()?;
        Ok(figure)
    }
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = Settings::load(cli.settings.as_deref()).context("Failed to load settings")?;
    if let Some(dir) = &cli.data_dir {
        settings.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.out_dir {
        settings.destination = dir.clone();
    }
    if let Some(format) = cli.format {
        settings.format = format;
    }
    if cli.wrap_palette {
        settings.palette = PalettePolicy::Wrap;
    }
    Ok(settings)
}

fn load_catalog(cli: &Cli) -> anyhow::Result<Catalog> {
    let mut catalog = Catalog::builtin();
    if let Some(path) = &cli.figures {
        catalog
            .extend_from_file(path)
            .with_context(|| format!("Failed to load figures from {}", path.display()))?;
    }
    catalog.validate().context("Invalid figure definition")?;
    Ok(catalog)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    settings.apply_locale();
    let catalog = load_catalog(&cli)?;

    let (figure, display) = match cli.command {
        Command::List => {
            for figure in catalog.iter() {
                println!(
                    "{:<20} {} series, {}",
                    figure.name,
                    figure.series.len(),
                    figure.title.as_deref().unwrap_or(&figure.y_label)
                );
            }
            return Ok(());
        }
        Command::Plot { figure, display } => (
            catalog.get(&figure)?.clone(),
            DisplayMode::from_arg(display.as_deref()),
        ),
        Command::Custom(mut args) => {
            let display = args.display();
            (args.into_figure()?, display)
        }
    };

    log::info!("plotting {} ({} series)", figure.name, figure.series.len());
    let path = comparison::run_figure(&figure, &settings, display)
        .with_context(|| format!("Failed to plot {}", figure.name))?;
    log::info!("done: {}", path.display());
    Ok(())
}
