//! Chromaticity coordinates and the RGB conversion the bridge expects.

use serde::{Deserialize, Serialize};

/// sRGB companding threshold below which the curve is linear.
const GAMMA_THRESHOLD: f64 = 0.04045;

/// Wide gamut RGB (D65) conversion matrix, one row per X, Y, Z.
const WIDE_GAMUT: [[f64; 3]; 3] = [
    [0.664511, 0.154324, 0.162028],
    [0.283881, 0.668433, 0.047685],
    [0.000088, 0.072310, 0.986039],
];

/// A point in the CIE xy chromaticity plane.
///
/// Serialized as a two element array, which is how the bridge expects the
/// `xy` field.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Xy {
    x: f64,
    y: f64,
}

impl Xy {
    pub fn new(x: f64, y: f64) -> Self {
        Xy { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Convert RGB channels to chromaticity coordinates.
    ///
    /// Channels are clamped into 0-255 first, so out of range input is
    /// corrected rather than rejected (NaN clamps to 0). Each channel is then
    /// gamma corrected, transformed through the wide gamut matrix and projected
    /// onto the xy plane.
    ///
    /// Black has no chromaticity; it maps to [`Xy::white_point`], the same
    /// point as every other neutral grey.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_lights_rs::Xy;
    ///
    /// let red = Xy::from_rgb(255.0, 0.0, 0.0);
    /// assert!((red.x() - 0.7006).abs() < 1e-3);
    /// assert!((red.y() - 0.2993).abs() < 1e-3);
    ///
    /// assert_eq!(Xy::from_rgb(0.0, 0.0, 0.0), Xy::white_point());
    /// ```
    pub fn from_rgb(red: f64, green: f64, blue: f64) -> Self {
        let rgb = [red, green, blue].map(|c| gamma_correct(c.max(0.0).min(255.0) / 255.0));
        let [x, y, z] = WIDE_GAMUT.map(|row| row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2]);
        Self::project(x, y, z).unwrap_or_else(Self::white_point)
    }

    /// Chromaticity of equal-energy input (every neutral grey).
    pub fn white_point() -> Self {
        let [x, y, z] = WIDE_GAMUT.map(|row| row.iter().sum::<f64>());
        Xy {
            x: x / (x + y + z),
            y: y / (x + y + z),
        }
    }

    fn project(x: f64, y: f64, z: f64) -> Option<Self> {
        let sum = x + y + z;
        (sum > 0.0).then(|| Xy {
            x: x / sum,
            y: y / sum,
        })
    }
}

/// Shorthand for [`Xy::from_rgb`].
pub fn rgb_to_xy(red: f64, green: f64, blue: f64) -> Xy {
    Xy::from_rgb(red, green, blue)
}

fn gamma_correct(value: f64) -> f64 {
    if value > GAMMA_THRESHOLD {
        ((value + 0.055) / (1.0 + 0.055)).powf(2.4)
    } else {
        value / 12.92
    }
}

impl From<[f64; 2]> for Xy {
    fn from([x, y]: [f64; 2]) -> Self {
        Xy { x, y }
    }
}

impl From<Xy> for [f64; 2] {
    fn from(xy: Xy) -> Self {
        [xy.x, xy.y]
    }
}
