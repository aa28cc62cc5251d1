//! Backend-owned identifiers and the small value types the API speaks in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of an app, emotion, brightness level, player or block.
///
/// Validity and uniqueness are the backend's business; the client only
/// carries the string around.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Collections the backend can enumerate as newline-delimited lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceCategory {
    Apps,
    Emotions,
    BrightnessLevels,
    Players,
    Blocks,
}

impl ResourceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceCategory::Apps => "apps",
            ResourceCategory::Emotions => "emotions",
            ResourceCategory::BrightnessLevels => "brightness levels",
            ResourceCategory::Players => "players",
            ResourceCategory::Blocks => "blocks",
        }
    }
}

/// Per-app text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppField {
    Name,
    Description,
    Thumbnail,
    Homepage,
    Active,
}

impl AppField {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppField::Name => "name",
            AppField::Description => "description",
            AppField::Thumbnail => "thumbnail",
            AppField::Homepage => "homepage",
            AppField::Active => "active",
        }
    }
}

/// Player movement accepted by `minecraft/players/{id}/move`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    pub fn all() -> [Direction; 4] {
        [
            Direction::Left,
            Direction::Right,
            Direction::Up,
            Direction::Down,
        ]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = crate::error::PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(crate::error::PanelError::InvalidInput(format!(
                "unknown direction '{}', expected left/right/up/down",
                other
            ))),
        }
    }
}
