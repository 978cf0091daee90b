//! # hue_lights_rs
//!
//! An async Rust library for controlling Philips Hue lights through a bridge.
//!
//! This crate provides a **runtime-agnostic** API to select a bridge,
//! authenticate a user, enumerate lights and groups, and send state changes
//! (power, color, brightness, transitions) to individual lights.
//!
//! ## Quick Start
//!
//! ```ignore
//! use hue_lights_rs::Bridge;
//!
//! // `client` is any type implementing `HttpClient`
//! async fn control_light(client: MyClient) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut bridge = Bridge::new(client);
//!     bridge.set_bridge("192.168.1.2")?.set_user("username");
//!
//!     for mut light in bridge.get_lights_by_name("Kitchen1").await? {
//!         light.turn_on()?.set_color_rgb(100, 123, 255)?.set_brightness(100)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Fluent commands**: chain [`Light`] commands with `?`
//! - **RGB Colors**: RGB input is converted to the bridge's xy color space with [`Xy::from_rgb`]
//! - **Local checks**: out of range values and changes to lights that are off are
//!   rejected before anything is sent
//! - **Enumeration**: find lights by name, regex, or group with [`Bridge`]
//! - **Discovery**: find bridges with [`Bridge::find_bridges`]
//!
//! ## Communication
//!
//! The crate does not ship an HTTP stack. Plug in your own by implementing
//! [`HttpClient`]. Light commands go through a [`Transport`], which hands them
//! off without waiting for the outcome: the cached [`LightState`] reflects what
//! was last requested, not what the bridge confirmed.
//!
//! ## Feature Flags
//!
//! - `runtime-tokio` (default): Use the tokio async runtime
//! - `runtime-async-std`: Use the async-std runtime
//! - `runtime-smol`: Use the smol runtime

mod bridge;
mod errors;
mod light;
mod payload;
mod runtime;
mod status;
mod transport;
mod types;

// Re-export public API
pub use bridge::{Bridge, DISCOVERY_URL, DiscoveredBridge, NameQuery};
pub use errors::Error;
pub use light::{Light, LightIdentity};
pub use payload::Payload;
pub use runtime::BoxFuture;
pub use status::LightState;
pub use transport::{
    ChannelTransport, Command, CommandTarget, ConnectionContext, HttpClient, Method, Resource,
    SpawnTransport, Transport,
};
pub use types::{Alert, Attribute, Color, Effect, PowerMode, Xy, rgb_to_xy};
