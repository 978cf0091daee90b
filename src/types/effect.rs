//! Alert and effect modes.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// A temporary alert effect, sent as the `alert` field.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Alert {
    /// No alert
    None,
    /// A single breathe cycle
    Select,
    /// Breathe cycles for 15 seconds
    #[serde(rename = "lselect")]
    #[strum(serialize = "lselect")]
    LongSelect,
}

/// A dynamic effect, sent as the `effect` field.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Effect {
    /// No effect
    None,
    /// Cycle through all hues at the current brightness and saturation
    ColorLoop,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_value(Alert::Select).unwrap(), "select");
        assert_eq!(serde_json::to_value(Alert::LongSelect).unwrap(), "lselect");
        assert_eq!(serde_json::to_value(Effect::ColorLoop).unwrap(), "colorloop");
        assert_eq!(serde_json::to_value(Effect::None).unwrap(), "none");
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(Alert::from_str("lselect").unwrap(), Alert::LongSelect);
        assert_eq!(Effect::from_str("colorloop").unwrap(), Effect::ColorLoop);
        assert!(Effect::from_str("strobe").is_err());
    }
}
