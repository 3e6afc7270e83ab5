//! Sort configuration for the asset table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Column an asset list can be ordered by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Byte size, numeric
    Size,

    /// Display name, case-insensitive
    Name,

    /// Pixel area (width × height)
    Width,

    /// Any other record field, compared by its raw value
    Field(String),
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Size => write!(f, "size"),
            SortKey::Name => write!(f, "name"),
            SortKey::Width => write!(f, "width"),
            SortKey::Field(name) => write!(f, "{}", name),
        }
    }
}

impl FromStr for SortKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "size" => SortKey::Size,
            "name" => SortKey::Name,
            "width" => SortKey::Width,
            other => SortKey::Field(other.to_string()),
        })
    }
}

/// Ascending or descending
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Active sort column and direction.
///
/// Kept across searches, but a search does not reapply it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortConfig {
    /// Apply a header click: the active key flips direction, a new key
    /// starts ascending.
    pub fn click(&mut self, key: SortKey) {
        if self.key.as_ref() == Some(&key) {
            self.direction = self.direction.toggled();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Asc;
        }
    }
}
