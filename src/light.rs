//! Individual light control.

use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::errors::Error;
use crate::payload::Payload;
use crate::status::LightState;
use crate::transport::{CommandTarget, ConnectionContext, Resource, Transport};
use crate::types::{Alert, Attribute, Effect, PowerMode, Xy};

type Result<T> = std::result::Result<T, Error>;

/// The bridge-assigned index and the human readable name of a light.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LightIdentity {
    index: String,
    name: String,
}

impl LightIdentity {
    pub fn new(index: &str, name: &str) -> Self {
        LightIdentity {
            index: index.to_string(),
            name: name.to_string(),
        }
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A single light behind a Hue bridge.
///
/// Every command is checked locally, handed to the [`Transport`] without
/// waiting for the outcome, and then mirrored into the cached [`LightState`].
/// Commands that change an attribute of the emitted light (color, brightness,
/// effects...) are only accepted while the light is on; they fail with
/// [`Error::Precondition`] otherwise. Nothing is issued when a check fails.
///
/// Mutators return `&mut Self` so commands chain with `?`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use hue_lights_rs::{ChannelTransport, ConnectionContext, Error, Light, LightIdentity, LightState};
///
/// # fn main() -> Result<(), Error> {
/// let (transport, _commands) = ChannelTransport::new();
/// let mut light = Light::new(
///     LightIdentity::new("1", "Kitchen1"),
///     LightState::new(false),
///     ConnectionContext::new("192.168.1.2", "user"),
///     Arc::new(transport),
/// );
///
/// assert!(light.set_brightness(100).is_err());
///
/// light.turn_on()?.set_color_rgb(100, 123, 255)?.set_brightness(100)?;
/// assert!(light.is_on());
/// # Ok(())
/// # }
/// ```
pub struct Light {
    identity: LightIdentity,
    state: LightState,
    context: ConnectionContext,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Light {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Light")
            .field("identity", &self.identity)
            .field("state", &self.state)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl Light {
    pub fn new(
        identity: LightIdentity,
        state: LightState,
        context: ConnectionContext,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Light {
            identity,
            state,
            context,
            transport,
        }
    }

    pub fn identity(&self) -> &LightIdentity {
        &self.identity
    }

    pub fn index(&self) -> &str {
        self.identity.index()
    }

    pub fn name(&self) -> &str {
        self.identity.name()
    }

    /// Last known state, including optimistic updates from issued commands.
    pub fn state(&self) -> &LightState {
        &self.state
    }

    pub fn context(&self) -> &ConnectionContext {
        &self.context
    }

    pub fn is_on(&self) -> bool {
        self.state.on()
    }

    pub fn set_power(&mut self, power: &PowerMode) -> Result<&mut Self> {
        self.send_state(&Payload::from(power))?;
        self.state.update_from_power(power);
        Ok(self)
    }

    pub fn turn_on(&mut self) -> Result<&mut Self> {
        self.set_power(&PowerMode::On)
    }

    pub fn turn_off(&mut self) -> Result<&mut Self> {
        self.set_power(&PowerMode::Off)
    }

    /// Blink the light once.
    pub fn blink(&mut self) -> Result<&mut Self> {
        self.send(&Payload::from(&Alert::Select))
    }

    /// Blink the light for 15 seconds.
    pub fn blink_long(&mut self) -> Result<&mut Self> {
        self.send(&Payload::from(&Alert::LongSelect))
    }

    /// Cycle through all hues using the current brightness and saturation.
    pub fn start_color_loop(&mut self) -> Result<&mut Self> {
        self.ensure_on()?;
        self.send(&Payload::from(&Effect::ColorLoop))
    }

    pub fn stop_color_loop(&mut self) -> Result<&mut Self> {
        self.ensure_on()?;
        self.send(&Payload::from(&Effect::None))
    }

    /// Set the transition time of subsequent state changes, as a multiple of
    /// 100ms (10 is one second).
    pub fn set_transition_time(&mut self, time: i32) -> Result<&mut Self> {
        let mut payload = Payload::new();
        payload.transition_time(Attribute::TransitionTime.check(time, false)?);
        self.send(&payload)
    }

    /// Set the color from chromaticity coordinates.
    ///
    /// The coordinates are sent as given; the bridge maps points outside the
    /// light's gamut to the closest color it can show.
    pub fn set_color_xy(&mut self, x: f64, y: f64) -> Result<&mut Self> {
        self.ensure_on()?;
        self.send(&Payload::from(&Xy::new(x, y)))
    }

    /// Set the color from RGB channels, each clamped into 0-255.
    ///
    /// See [`Xy::from_rgb`] for the conversion.
    pub fn set_color_rgb(
        &mut self,
        red: impl Into<f64>,
        green: impl Into<f64>,
        blue: impl Into<f64>,
    ) -> Result<&mut Self> {
        self.ensure_on()?;
        let xy = Xy::from_rgb(red.into(), green.into(), blue.into());
        self.send(&Payload::from(&xy))
    }

    /// Set the brightness (0-255).
    pub fn set_brightness(&mut self, brightness: i32) -> Result<&mut Self> {
        self.ensure_on()?;
        let mut payload = Payload::new();
        payload.brightness(Attribute::Brightness.check(brightness, false)?);
        self.send(&payload)
    }

    /// Change the brightness by `change` (-255 to 255).
    pub fn increment_brightness(&mut self, change: i32) -> Result<&mut Self> {
        self.ensure_on()?;
        let mut payload = Payload::new();
        payload.brightness_increment(Attribute::Brightness.check(change, true)?);
        self.send(&payload)
    }

    /// Set the hue (0-65535).
    pub fn set_hue(&mut self, hue: i32) -> Result<&mut Self> {
        self.ensure_on()?;
        let mut payload = Payload::new();
        payload.hue(Attribute::Hue.check(hue, false)?);
        self.send(&payload)
    }

    /// Change the hue by `change` (-65535 to 65535).
    pub fn increment_hue(&mut self, change: i32) -> Result<&mut Self> {
        self.ensure_on()?;
        let mut payload = Payload::new();
        payload.hue_increment(Attribute::Hue.check(change, true)?);
        self.send(&payload)
    }

    /// Set the saturation (0-255).
    pub fn set_saturation(&mut self, saturation: i32) -> Result<&mut Self> {
        self.ensure_on()?;
        let mut payload = Payload::new();
        payload.saturation(Attribute::Saturation.check(saturation, false)?);
        self.send(&payload)
    }

    /// Change the saturation by `change` (-255 to 255).
    pub fn increment_saturation(&mut self, change: i32) -> Result<&mut Self> {
        self.ensure_on()?;
        let mut payload = Payload::new();
        payload.saturation_increment(Attribute::Saturation.check(change, true)?);
        self.send(&payload)
    }

    /// Set the color temperature (0-65535).
    pub fn set_color_temperature(&mut self, ct: i32) -> Result<&mut Self> {
        self.ensure_on()?;
        let mut payload = Payload::new();
        payload.color_temperature(Attribute::ColorTemperature.check(ct, false)?);
        self.send(&payload)
    }

    /// Change the color temperature by `change` (-65535 to 65535).
    pub fn increment_color_temperature(&mut self, change: i32) -> Result<&mut Self> {
        self.ensure_on()?;
        let mut payload = Payload::new();
        payload.color_temperature_increment(Attribute::ColorTemperature.check(change, true)?);
        self.send(&payload)
    }

    /// Rename the light on the bridge.
    ///
    /// The local identity keeps the name the light was enumerated with.
    pub fn rename(&mut self, name: &str) -> Result<&mut Self> {
        let target = CommandTarget::new(
            self.context.clone(),
            Resource::LightAttributes(self.identity.index.clone()),
        );
        self.issue(&target, json!({ "name": name }));
        Ok(self)
    }

    /// Issue a state payload and mirror its absolute values.
    ///
    /// Power changes go through [`Light::set_power`] instead, so the cached
    /// `on` flag only follows `turn_on` and `turn_off`.
    fn send(&mut self, payload: &Payload) -> Result<&mut Self> {
        if payload.on.is_some() {
            return Err(Error::PowerInPayload);
        }
        if payload.needs_power() {
            self.ensure_on()?;
        }
        self.send_state(payload)?;
        self.state.update_from_payload(payload);
        Ok(self)
    }

    fn ensure_on(&self) -> Result<()> {
        if self.is_on() {
            Ok(())
        } else {
            Err(Error::precondition(self.name()))
        }
    }

    fn send_state(&self, payload: &Payload) -> Result<()> {
        if !payload.is_valid() {
            return Err(Error::NoAttribute);
        }
        let body = serde_json::to_value(payload).map_err(Error::JsonDump)?;
        let target = CommandTarget::new(
            self.context.clone(),
            Resource::LightState(self.identity.index.clone()),
        );
        self.issue(&target, body);
        Ok(())
    }

    fn issue(&self, target: &CommandTarget, body: Value) {
        debug!("light {} ({}): {} {}", self.index(), self.name(), target, body);
        self.transport.issue(target, body);
    }
}
