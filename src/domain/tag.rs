//! Validated player-tag newtype.
//!
//! [`PlayerTag`] wraps the external `#`-prefixed identifier assigned by
//! the upstream system. The shape check runs once at construction so a
//! tag that reaches the pipeline is always well-formed and no network
//! call is ever made for a malformed one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// A validated player tag.
///
/// Valid shape: starts with `#`, total length between 8 and 12
/// characters, alphanumeric after the `#`. The checks run in that order
/// and each failure carries its own message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerTag(String);

impl PlayerTag {
    /// Validates and wraps a raw tag string.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::InvalidTag`] with a message naming the
    /// first violated rule: missing `#`, bad length, or non-alphanumeric
    /// characters after the `#`.
    pub fn parse(raw: &str) -> Result<Self, IngestError> {
        let raw = raw.trim();
        if !raw.starts_with('#') {
            return Err(IngestError::InvalidTag(
                "Player tag must start with #.".to_string(),
            ));
        }
        if raw.len() < 8 || raw.len() > 12 {
            return Err(IngestError::InvalidTag(
                "Player tag must be between 8 and 12 characters.".to_string(),
            ));
        }
        let body = raw.get(1..).unwrap_or_default();
        if !body.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(IngestError::InvalidTag(
                "Player tag can only contain alphanumeric characters.".to_string(),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns the tag as entered, including the leading `#`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the tag percent-encoded for use in a URL path segment.
    #[must_use]
    pub fn encoded(&self) -> String {
        encode_tag(&self.0)
    }
}

impl fmt::Display for PlayerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Percent-encodes a tag for path embedding. Tags are alphanumeric
/// apart from the leading `#`, so only that character needs escaping.
#[must_use]
pub fn encode_tag(tag: &str) -> String {
    tag.replace('#', "%23")
}
