//! RGB color representation.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::Xy;

/// An RGB color with red, green, and blue components (0-255 each).
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Color {
    pub(crate) red: u8,
    pub(crate) green: u8,
    pub(crate) blue: u8,
}

impl Color {
    /// Create a color with the given RGB values.
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Create a default color (black: 0,0,0).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }

    /// Convert to the bridge's chromaticity coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_lights_rs::Color;
    ///
    /// let xy = Color::rgb(255, 0, 0).to_xy();
    /// assert!(xy.x() > xy.y());
    /// ```
    pub fn to_xy(&self) -> Xy {
        Xy::from_rgb(self.red.into(), self.green.into(), self.blue.into())
    }
}

impl FromStr for Color {
    type Err = String;

    /// Parse from comma-separated string (e.g., "255,128,0").
    fn from_str(s: &str) -> Result<Self, String> {
        let parts = s
            .split(',')
            .map(|c| c.trim().parse::<u8>().map_err(|e| format!("{c:?}: {e}")))
            .collect::<Result<Vec<_>, _>>()?;
        match parts[..] {
            [red, green, blue] => Ok(Self::rgb(red, green, blue)),
            _ => Err("Expected format: r,g,b".into()),
        }
    }
}

impl From<&Color> for Xy {
    fn from(color: &Color) -> Self {
        color.to_xy()
    }
}
