//! Numeric light attributes and the ranges the bridge accepts for them.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::errors::Error;

/// A numeric light setting that can be set to an absolute value.
///
/// Every attribute accepts absolute values in `0..=max()`. The attributes
/// that also support relative changes accept increments in `-max()..=max()`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Attribute {
    #[strum(serialize = "brightness")]
    Brightness,
    #[strum(serialize = "hue")]
    Hue,
    #[strum(serialize = "saturation")]
    Saturation,
    #[strum(serialize = "color temperature")]
    ColorTemperature,
    /// Transition time, in multiples of 100ms.
    #[strum(serialize = "transition time")]
    TransitionTime,
}

impl Attribute {
    /// Largest absolute value the bridge accepts.
    pub fn max(&self) -> i32 {
        match self {
            Attribute::Brightness | Attribute::Saturation => u8::MAX.into(),
            Attribute::Hue | Attribute::ColorTemperature | Attribute::TransitionTime => {
                u16::MAX.into()
            }
        }
    }

    /// Inclusive bounds for an absolute value or an increment.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_lights_rs::Attribute;
    ///
    /// assert_eq!(Attribute::Brightness.bounds(false), (0, 255));
    /// assert_eq!(Attribute::Hue.bounds(true), (-65535, 65535));
    /// ```
    pub fn bounds(&self, increment: bool) -> (i32, i32) {
        if increment {
            (-self.max(), self.max())
        } else {
            (0, self.max())
        }
    }

    /// Check `value` against the bounds and narrow it to the wire type.
    pub(crate) fn check<T: TryFrom<i32>>(&self, value: i32, increment: bool) -> Result<T, Error> {
        let (min, max) = self.bounds(increment);
        if !(min..=max).contains(&value) {
            return Err(Error::validation(*self, increment, value));
        }
        // Cannot fail for the wire types once the bounds hold.
        T::try_from(value).map_err(|_| Error::validation(*self, increment, value))
    }
}
