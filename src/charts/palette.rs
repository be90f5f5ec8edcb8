//! Series styles handed out in a fixed rotation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PaletteError {
    #[error("palette exhausted: series {requested} requested but only {available} styles exist")]
    Exhausted { requested: usize, available: usize },
}

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Marker glyph drawn at every data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Square,
    Diamond,
    Circle,
    TriangleDown,
}

/// Visual style of one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub name: &'static str,
    pub line: Rgb,
    pub fill: Rgb,
    pub marker: Marker,
    pub marker_size: f64,
}

pub const GREEN: Style = Style {
    name: "green",
    line: Rgb(0x55, 0x75, 0x55),
    fill: Rgb(0xC5, 0xE1, 0xC5),
    marker: Marker::Square,
    marker_size: 10.0,
};

pub const RED: Style = Style {
    name: "red",
    line: Rgb(0x8f, 0x52, 0x52),
    fill: Rgb(0xff, 0xc2, 0xc2),
    marker: Marker::Diamond,
    marker_size: 9.0,
};

pub const PURPLE: Style = Style {
    name: "purple",
    line: Rgb(0x52, 0x52, 0x8f),
    fill: Rgb(0xc2, 0xc2, 0xff),
    marker: Marker::Circle,
    marker_size: 10.0,
};

pub const YELLOW: Style = Style {
    name: "yellow",
    line: Rgb(0x8f, 0x8a, 0x5a),
    fill: Rgb(0xff, 0xfa, 0xca),
    marker: Marker::TriangleDown,
    marker_size: 11.0,
};

/// Styles in the order they are assigned to series.
pub const PALETTE: [Style; 4] = [GREEN, RED, PURPLE, YELLOW];

/// What happens once every style has been handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PalettePolicy {
    /// Requests past the fourth fail.
    #[default]
    Exhaust,
    /// Start over from the first style.
    Wrap,
}

/// Positional style assignment: the n-th request gets the n-th style.
#[derive(Debug, Clone)]
pub struct PaletteCycler {
    taken: usize,
    policy: PalettePolicy,
}

impl PaletteCycler {
    pub fn new(policy: PalettePolicy) -> Self {
        Self { taken: 0, policy }
    }

    pub fn next_style(&mut self) -> Result<Style, PaletteError> {
        let idx = match self.policy {
            PalettePolicy::Exhaust if self.taken >= PALETTE.len() => {
                return Err(PaletteError::Exhausted {
                    requested: self.taken + 1,
                    available: PALETTE.len(),
                });
            }
            PalettePolicy::Exhaust => self.taken,
            PalettePolicy::Wrap => self.taken % PALETTE.len(),
        };
        self.taken += 1;
        Ok(PALETTE[idx])
    }

    /// Styles still available before exhaustion, `None` when wrapping.
    pub fn remaining(&self) -> Option<usize> {
        match self.policy {
            PalettePolicy::Exhaust => Some(PALETTE.len().saturating_sub(self.taken)),
            PalettePolicy::Wrap => None,
        }
    }
}
