//! Light state tracking.

use serde::{Deserialize, Serialize};

use crate::payload::Payload;
use crate::types::{Effect, PowerMode, Xy};

/// The last known state of a light.
///
/// Built from the bridge's light resource when lights are enumerated, then
/// kept up to date optimistically from the commands issued through
/// [`Light`](crate::Light). Nothing is read back from the bridge, so the
/// mirror reflects what was last requested rather than what the bulb reports.
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LightState {
    on: bool,
    #[serde(default)]
    bri: Option<u8>,
    #[serde(default)]
    hue: Option<u16>,
    #[serde(default)]
    sat: Option<u8>,
    #[serde(default)]
    ct: Option<u16>,
    #[serde(default)]
    xy: Option<Xy>,
    #[serde(default)]
    effect: Option<Effect>,
    #[serde(default)]
    reachable: Option<bool>,
}

impl LightState {
    /// Create a state that only knows the power state.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_lights_rs::LightState;
    ///
    /// let state = LightState::new(true);
    /// assert!(state.on());
    /// assert!(state.brightness().is_none());
    /// ```
    pub fn new(on: bool) -> Self {
        LightState {
            on,
            ..Self::default()
        }
    }

    /// Check if the light is on.
    pub fn on(&self) -> bool {
        self.on
    }

    /// Get the last known brightness.
    pub fn brightness(&self) -> Option<u8> {
        self.bri
    }

    /// Get the last known hue.
    pub fn hue(&self) -> Option<u16> {
        self.hue
    }

    /// Get the last known saturation.
    pub fn saturation(&self) -> Option<u8> {
        self.sat
    }

    /// Get the last known color temperature.
    pub fn color_temperature(&self) -> Option<u16> {
        self.ct
    }

    /// Get the last known color.
    pub fn xy(&self) -> Option<&Xy> {
        self.xy.as_ref()
    }

    /// Get the last known effect.
    pub fn effect(&self) -> Option<&Effect> {
        self.effect.as_ref()
    }

    /// Whether the bridge could reach the light when the state was read.
    pub fn reachable(&self) -> Option<bool> {
        self.reachable
    }

    /// Mirror the absolute values of an issued payload.
    ///
    /// Increments are skipped since the bridge clamps the result. Power is
    /// only mirrored through [`LightState::update_from_power`].
    pub(crate) fn update_from_payload(&mut self, payload: &Payload) {
        if let Some(bri) = payload.bri {
            self.bri = Some(bri);
        }
        if let Some(hue) = payload.hue {
            self.hue = Some(hue);
        }
        if let Some(sat) = payload.sat {
            self.sat = Some(sat);
        }
        if let Some(ct) = payload.ct {
            self.ct = Some(ct);
        }
        if let Some(xy) = payload.xy {
            self.xy = Some(xy);
        }
        if let Some(effect) = payload.effect {
            self.effect = Some(effect);
        }
    }

    pub(crate) fn update_from_power(&mut self, power: &PowerMode) {
        self.on = power.is_on();
    }
}

impl From<&PowerMode> for LightState {
    fn from(power: &PowerMode) -> Self {
        LightState::new(power.is_on())
    }
}
