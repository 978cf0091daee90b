//! State-change payload for Hue lights.

use serde::{Deserialize, Serialize};

use crate::types::{Alert, Effect, PowerMode, Xy};

/// A state-change body sent to a light's state endpoint.
///
/// Only the attributes that are set are serialized, so a payload with a single
/// attribute produces the single-key body the bridge expects, e.g. `{"bri": 10}`.
///
/// # Examples
///
/// ```
/// use hue_lights_rs::{Payload, PowerMode};
///
/// let mut payload = Payload::new();
/// assert!(!payload.is_valid());
///
/// payload.power(&PowerMode::On);
/// payload.brightness(200);
/// assert_eq!(
///     serde_json::to_string(&payload).unwrap(),
///     r#"{"on":true,"bri":200}"#
/// );
/// ```
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Payload {
    pub(crate) on: Option<bool>,
    pub(crate) bri: Option<u8>,
    pub(crate) bri_inc: Option<i16>,
    pub(crate) hue: Option<u16>,
    pub(crate) hue_inc: Option<i32>,
    pub(crate) sat: Option<u8>,
    pub(crate) sat_inc: Option<i16>,
    pub(crate) ct: Option<u16>,
    pub(crate) ct_inc: Option<i32>,
    pub(crate) xy: Option<Xy>,
    pub(crate) alert: Option<Alert>,
    pub(crate) effect: Option<Effect>,
    #[serde(rename = "transitiontime")]
    pub(crate) transition_time: Option<u16>,
}

impl Payload {
    /// Create a new empty payload.
    ///
    /// At least one attribute must be set for the payload to be valid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if this payload contains at least one attribute.
    pub fn is_valid(&self) -> bool {
        self.on.is_some()
            || self.bri.is_some()
            || self.bri_inc.is_some()
            || self.hue.is_some()
            || self.hue_inc.is_some()
            || self.sat.is_some()
            || self.sat_inc.is_some()
            || self.ct.is_some()
            || self.ct_inc.is_some()
            || self.xy.is_some()
            || self.alert.is_some()
            || self.effect.is_some()
            || self.transition_time.is_some()
    }

    /// Whether the payload changes the emitted light, which the bridge only
    /// accepts while the light is on. Power, alerts and the transition time
    /// are accepted either way.
    pub(crate) fn needs_power(&self) -> bool {
        self.bri.is_some()
            || self.bri_inc.is_some()
            || self.hue.is_some()
            || self.hue_inc.is_some()
            || self.sat.is_some()
            || self.sat_inc.is_some()
            || self.ct.is_some()
            || self.ct_inc.is_some()
            || self.xy.is_some()
            || self.effect.is_some()
    }

    pub fn power(&mut self, power: &PowerMode) {
        self.on = Some(power.is_on());
    }

    pub fn brightness(&mut self, bri: u8) {
        self.bri = Some(bri);
    }

    pub fn brightness_increment(&mut self, change: i16) {
        self.bri_inc = Some(change);
    }

    pub fn hue(&mut self, hue: u16) {
        self.hue = Some(hue);
    }

    pub fn hue_increment(&mut self, change: i32) {
        self.hue_inc = Some(change);
    }

    pub fn saturation(&mut self, sat: u8) {
        self.sat = Some(sat);
    }

    pub fn saturation_increment(&mut self, change: i16) {
        self.sat_inc = Some(change);
    }

    /// Set the color temperature, in the bridge's own units.
    pub fn color_temperature(&mut self, ct: u16) {
        self.ct = Some(ct);
    }

    pub fn color_temperature_increment(&mut self, change: i32) {
        self.ct_inc = Some(change);
    }

    /// Set the color as chromaticity coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_lights_rs::{Payload, Xy};
    ///
    /// let mut payload = Payload::new();
    /// payload.xy(&Xy::new(0.5, 0.25));
    /// assert_eq!(
    ///     serde_json::to_string(&payload).unwrap(),
    ///     r#"{"xy":[0.5,0.25]}"#
    /// );
    /// ```
    pub fn xy(&mut self, xy: &Xy) {
        self.xy = Some(*xy);
    }

    pub fn alert(&mut self, alert: &Alert) {
        self.alert = Some(*alert);
    }

    pub fn effect(&mut self, effect: &Effect) {
        self.effect = Some(*effect);
    }

    /// Set the transition time, as a multiple of 100ms.
    pub fn transition_time(&mut self, time: u16) {
        self.transition_time = Some(time);
    }
}

impl From<&PowerMode> for Payload {
    fn from(power: &PowerMode) -> Self {
        let mut p = Payload::new();
        p.power(power);
        p
    }
}

impl From<&Xy> for Payload {
    fn from(xy: &Xy) -> Self {
        let mut p = Payload::new();
        p.xy(xy);
        p
    }
}

impl From<&Alert> for Payload {
    fn from(alert: &Alert) -> Self {
        let mut p = Payload::new();
        p.alert(alert);
        p
    }
}

impl From<&Effect> for Payload {
    fn from(effect: &Effect) -> Self {
        let mut p = Payload::new();
        p.effect(effect);
        p
    }
}
