use crate::types::Attribute;

/// All error types that can occur when interacting with a Hue bridge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An attribute-changing command was issued while the light is off.
    #[error("cannot change the settings of light {light:?} while it is off")]
    Precondition { light: String },

    /// A numeric argument is outside the range accepted by the bridge.
    #[error(
        "{attribute} {} must be between {min} and {max}, got {value}",
        kind_label(.increment)
    )]
    Validation {
        attribute: Attribute,
        increment: bool,
        value: i32,
        min: i32,
        max: i32,
    },

    /// Attempted to send a [`crate::Payload`] with no attributes set.
    #[error("invalid payload; no attributes set")]
    NoAttribute,

    /// A state payload tried to switch the light on or off.
    #[error("power can only be changed with set_power")]
    PowerInPayload,

    /// Failed to serialize data to JSON.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// Failed to deserialize JSON data.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// The HTTP client could not complete a request.
    #[error("request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    /// The bridge address is not a dotted IPv4 address.
    #[error("the address {0:?} is not a valid IPv4 address")]
    InvalidAddress(String),

    /// A bridge must be selected before creating a user.
    #[error("a bridge must be selected before creating a user")]
    NoBridge,

    /// Both a bridge and a user must be selected.
    #[error("both a bridge and a user must be selected")]
    NotConfigured,

    /// Attempted to create a user without a device type.
    #[error("a device type is required to create a user")]
    EmptyDeviceType,

    /// The bridge refused to create a user because its link button was not pressed.
    #[error("the link button needs to be pressed to create a new user")]
    LinkButtonNotPressed,

    /// The bridge answered with an error object.
    #[error("bridge error {kind}: {description}")]
    Bridge { kind: u64, description: String },

    /// The bridge answered with a body of an unexpected shape.
    #[error("unexpected response from bridge: {0}")]
    UnexpectedResponse(String),
}

impl Error {
    /// Create a new precondition error for the named light
    pub fn precondition(light: &str) -> Self {
        Error::Precondition {
            light: light.to_string(),
        }
    }

    /// Create a new validation error for an absolute value or an increment
    pub fn validation(attribute: Attribute, increment: bool, value: i32) -> Self {
        let (min, max) = attribute.bounds(increment);
        Error::Validation {
            attribute,
            increment,
            value,
            min,
            max,
        }
    }

    /// Create a new HTTP error
    pub fn http(url: &str, reason: &str) -> Self {
        Error::Http {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn kind_label(increment: &bool) -> &'static str {
    if *increment { "increment" } else { "value" }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_bound() {
        let err = Error::validation(Attribute::Brightness, false, 300);
        assert_eq!(
            err.to_string(),
            "brightness value must be between 0 and 255, got 300"
        );

        let err = Error::validation(Attribute::Hue, true, -70000);
        assert_eq!(
            err.to_string(),
            "hue increment must be between -65535 and 65535, got -70000"
        );
    }

    #[test]
    fn test_precondition_message() {
        let err = Error::precondition("Kitchen1");
        assert_eq!(
            err,
            Error::Precondition {
                light: "Kitchen1".into()
            }
        );
        assert!(err.to_string().contains("while it is off"));
    }
}
