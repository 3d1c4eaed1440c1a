/*!
 * Data models for a transformation session.
 *
 * `Session` and `ShareSnapshot` use the camelCase wire shape shared with
 * the remote services and the history store:
 * `{originalText, translatedText, isEncoding}`.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which transformation the session requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Plaintext to code
    #[default]
    Encode,
    /// Code to plaintext
    Decode,
}

impl Direction {
    /// Build a direction from the `isEncoding` wire flag
    pub fn from_is_encoding(is_encoding: bool) -> Self {
        if is_encoding { Self::Encode } else { Self::Decode }
    }

    pub fn is_encoding(self) -> bool {
        self == Self::Encode
    }

    /// The opposite direction
    pub fn flipped(self) -> Self {
        match self {
            Self::Encode => Self::Decode,
            Self::Decode => Self::Encode,
        }
    }

    /// Path segment of the transformation endpoint
    pub fn endpoint_name(self) -> &'static str {
        match self {
            Self::Encode => "encode",
            Self::Decode => "decode",
        }
    }

    /// Value of the `d` query parameter in share links. `1` means decode.
    pub fn share_flag(self) -> u8 {
        match self {
            Self::Encode => 0,
            Self::Decode => 1,
        }
    }

    /// Inverse of [`Direction::share_flag`]
    pub fn from_share_flag(flag: &str) -> Option<Self> {
        match flag {
            "0" => Some(Self::Encode),
            "1" => Some(Self::Decode),
            _ => None,
        }
    }

    /// Placeholder labels for the (source, target) fields
    pub fn placeholders(self) -> (&'static str, &'static str) {
        match self {
            Self::Encode => ("Text...", "Code..."),
            Self::Decode => ("Code...", "Text..."),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.endpoint_name())
    }
}

impl Serialize for Direction {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(self.is_encoding())
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bool::deserialize(deserializer).map(Self::from_is_encoding)
    }
}

/// The unit passed to persistence and restoration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Source buffer, always the typed one
    #[serde(default)]
    pub original_text: String,
    /// Result of the last successful transformation, empty if none
    #[serde(default)]
    pub translated_text: String,
    #[serde(rename = "isEncoding", default)]
    pub direction: Direction,
}

impl Session {
    pub fn new(
        original_text: impl Into<String>,
        translated_text: impl Into<String>,
        direction: Direction,
    ) -> Self {
        Self {
            original_text: original_text.into(),
            translated_text: translated_text.into(),
            direction,
        }
    }
}

/// Minimal state needed to rebuild a session from a link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareSnapshot {
    pub original_text: String,
    #[serde(rename = "isEncoding")]
    pub direction: Direction,
}

impl ShareSnapshot {
    pub fn new(original_text: impl Into<String>, direction: Direction) -> Self {
        Self {
            original_text: original_text.into(),
            direction,
        }
    }

    /// A session with no known translation, so restoring it forces a lookup
    pub fn into_session(self) -> Session {
        Session::new(self.original_text, String::new(), self.direction)
    }
}

/// Request sent to the transformation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    /// Monotonic sequence number of this request within its session
    pub seq: u64,
    pub direction: Direction,
    pub original_text: String,
}

/// Answer of the transformation service that reached a verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    /// The transformed text
    Transformed(String),
    /// The service refused the input (e.g. malformed code)
    Rejected {
        /// Message from the service
        message: String,
    },
}

/// Where a buffer write came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// Live typing, swap, direction change or clear
    #[default]
    UserEdit,
    /// History selection or a resolved share link
    Restoration,
}

/// User-visible message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}
