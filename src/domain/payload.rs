//! Tagged decoding of upstream response bodies.
//!
//! The upstream API mixes three shapes: a single JSON object (player,
//! clan), an object wrapping an `items` array (cards), and a bare
//! top-level array (challenges, battle log). [`Payload`] distinguishes
//! them once at the gateway boundary so call sites never re-check the
//! JSON shape ad hoc.

use serde_json::Value;

/// Decoded upstream response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A single JSON object.
    Object(serde_json::Map<String, Value>),
    /// A list of items, either a top-level array or the contents of an
    /// `items` wrapper object.
    Items(Vec<Value>),
    /// Anything else (scalar, null). Kept for diagnostics.
    Malformed(Value),
}

impl Payload {
    /// Classifies a parsed JSON value.
    ///
    /// An object carrying an `items` array decodes to [`Payload::Items`];
    /// any other object to [`Payload::Object`]; a top-level array to
    /// [`Payload::Items`]; everything else is [`Payload::Malformed`].
    #[must_use]
    pub fn decode(value: Value) -> Self {
        match value {
            Value::Object(mut map) => {
                if matches!(map.get("items"), Some(Value::Array(_))) {
                    if let Some(Value::Array(items)) = map.remove("items") {
                        return Self::Items(items);
                    }
                }
                Self::Object(map)
            }
            Value::Array(items) => Self::Items(items),
            other => Self::Malformed(other),
        }
    }

    /// Returns the object map, or `None` for the other variants.
    /// Production code matches on the enum directly; this is a test
    /// convenience.
    #[cfg(test)]
    #[must_use]
    pub fn as_object(&self) -> Option<&serde_json::Map<String, Value>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the item list, or `None` for the other variants.
    /// Production code matches on the enum directly; this is a test
    /// convenience.
    #[cfg(test)]
    #[must_use]
    pub fn as_items(&self) -> Option<&[Value]> {
        match self {
            Self::Items(items) => Some(items),
            _ => None,
        }
    }
}
