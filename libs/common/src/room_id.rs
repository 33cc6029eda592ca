//! Validated room identifiers.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const MIN_LEN: usize = 6;
pub const MAX_LEN: usize = 64;

/// Identifier of a relay room: 6 to 64 characters from `[A-Za-z0-9_-]`.
///
/// The only way to obtain one is [`RoomId::parse`], so any `RoomId` in hand is
/// already valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(String);

/// Rejection produced for a string that is not a valid room identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidRoomId {
    Length(usize),
    Character(char),
}

impl fmt::Display for InvalidRoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length(len) => write!(
                f,
                "room id must be {MIN_LEN}-{MAX_LEN} characters, got {len}"
            ),
            Self::Character(c) => write!(f, "room id contains invalid character {c:?}"),
        }
    }
}

impl std::error::Error for InvalidRoomId {}

impl RoomId {
    pub fn parse(raw: &str) -> Result<Self, InvalidRoomId> {
        // All accepted characters are ASCII, so byte length equals char count
        // for every string that passes the character check.
        if let Some(c) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(InvalidRoomId::Character(c));
        }
        if !(MIN_LEN..=MAX_LEN).contains(&raw.len()) {
            return Err(InvalidRoomId::Length(raw.len()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoomId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RoomId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for RoomId {
    type Err = InvalidRoomId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RoomId {
    type Error = InvalidRoomId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoomId> for String {
    fn from(id: RoomId) -> Self {
        id.0
    }
}
