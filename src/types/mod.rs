//! Value types for light control parameters.

mod attribute;
mod color;
mod effect;
mod power;
mod xy;

pub use attribute::Attribute;
pub use color::Color;
pub use effect::{Alert, Effect};
pub use power::PowerMode;
pub use xy::{Xy, rgb_to_xy};
