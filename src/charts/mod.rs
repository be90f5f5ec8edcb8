//! Charts module - series styling, chart surface and static rendering

mod palette;
mod renderer;
mod surface;

pub use palette::{Marker, PaletteCycler, PaletteError, PalettePolicy, Rgb, Style};
pub use renderer::{RenderError, StaticChartRenderer};
pub use surface::{Chart, ChartError, ChartSurface, Decorations, LineStyle, PeakOffsets};
