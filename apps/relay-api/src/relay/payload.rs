//! Published JSON payloads.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// A published JSON value, kept as its compact serialized text.
///
/// Object keys keep the order they had in the request body.
///
/// Cloning is cheap; every subscriber of a room shares the same buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Payload(Arc<str>);

impl Payload {
    /// Parse a request body. An empty body publishes `{}`.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.is_empty() {
            return Ok(Self::from_value(&Value::Object(Default::default())));
        }
        let value: Value = serde_json::from_slice(body)?;
        Ok(Self::from_value(&value))
    }

    pub fn from_value(value: &Value) -> Self {
        // Serializing a `Value` cannot fail: every map key is already a string.
        Self(Arc::from(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        serde_json::from_str(&self.0).unwrap_or(Value::Null)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Payload").field(&&*self.0).finish()
    }
}
