//! The principal returned by an OAuth2 provider's user-info endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{AuthError, AuthResult};

/// Attribute holding the provider's subject identifier.
pub const SUBJECT_ATTRIBUTE: &str = "id";

/// An authenticated OAuth2 principal.
///
/// Keeps the raw attribute payload so callers can pull whatever the provider
/// sends; Kakao nests the nickname under `properties`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuth2Principal {
    /// Raw user-info attributes.
    pub attributes: Map<String, Value>,
    /// Attribute whose value is the principal's name.
    #[serde(default = "default_name_attribute")]
    pub name_attribute: String,
}

fn default_name_attribute() -> String {
    SUBJECT_ATTRIBUTE.to_string()
}

fn attribute_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl OAuth2Principal {
    /// Creates a principal from a user-info payload.
    pub fn new(attributes: Map<String, Value>, name_attribute: impl Into<String>) -> Self {
        Self {
            attributes,
            name_attribute: name_attribute.into(),
        }
    }

    /// Creates a principal from a JSON object.
    ///
    /// Non-object payloads produce a principal with no attributes.
    pub fn from_json(value: Value, name_attribute: impl Into<String>) -> Self {
        let attributes = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(attributes, name_attribute)
    }

    /// Returns the provider's subject identifier.
    ///
    /// Numeric ids are rendered as their decimal digits. A missing or null
    /// `id` is an error; there is no fallback.
    pub fn external_id(&self) -> AuthResult<String> {
        self.attributes
            .get(SUBJECT_ATTRIBUTE)
            .and_then(attribute_to_string)
            .ok_or_else(|| AuthError::MalformedIdentity {
                attribute: SUBJECT_ATTRIBUTE.to_string(),
            })
    }

    /// Returns the value of the name attribute.
    pub fn name(&self) -> Option<String> {
        self.attributes
            .get(&self.name_attribute)
            .and_then(attribute_to_string)
    }

    /// Returns the nickname the user set at the provider, if any.
    pub fn nickname(&self) -> Option<String> {
        self.attributes
            .get("properties")
            .and_then(|properties| properties.get("nickname"))
            .and_then(Value::as_str)
            .filter(|nickname| !nickname.is_empty())
            .map(str::to_string)
    }

    /// Returns the name to show for this principal: the nickname, falling back
    /// to the name attribute.
    pub fn display_name(&self) -> Option<String> {
        self.nickname().or_else(|| self.name())
    }
}
