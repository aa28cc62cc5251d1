//! Catalogue of the backend's HTTP surface.
//!
//! Each [`Endpoint`] knows its path segments below the `/protogen` root.
//! Identifiers are kept as separate segments so the URL builder can
//! percent-encode them; nothing here concatenates ids into paths.

use crate::resource::{AppField, ResourceCategory, ResourceId};

/// Root segment every backend path lives under
pub const API_ROOT: &str = "protogen";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    // Apps
    Apps,
    App(ResourceId, AppField),
    ActiveApp,

    // Head
    Mode,
    Emotion,
    Emotions,
    EmotionImage { emotion: ResourceId, frame: u32 },
    Brightness,
    BrightnessLevels,
    Blank,
    AudioLoudness,
    MouthColor,
    EyeColor,

    // Minecraft-like subsystem
    MinecraftStart,
    WorldGenerate,
    Players,
    Player(ResourceId),
    PlayerMove(ResourceId),
    PlayerPlaceBlock(ResourceId),
    PlayerBlock(ResourceId),
    Blocks,
    BlockColor(ResourceId),
}

impl Endpoint {
    /// Endpoint that enumerates a resource category
    pub fn list(category: ResourceCategory) -> Self {
        match category {
            ResourceCategory::Apps => Endpoint::Apps,
            ResourceCategory::Emotions => Endpoint::Emotions,
            ResourceCategory::BrightnessLevels => Endpoint::BrightnessLevels,
            ResourceCategory::Players => Endpoint::Players,
            ResourceCategory::Blocks => Endpoint::Blocks,
        }
    }

    /// Path segments below the `/protogen` root
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Endpoint::Apps => vec!["apps"],
            Endpoint::App(id, field) => vec!["apps", id.as_str(), field.as_str()],
            Endpoint::ActiveApp => vec!["apps", "active"],

            Endpoint::Mode => vec!["mode"],
            Endpoint::Emotion => vec!["head", "emotion"],
            Endpoint::Emotions => vec!["head", "emotion", "all"],
            Endpoint::EmotionImage { emotion, .. } => {
                vec!["head", "emotion", "images", emotion.as_str()]
            }
            Endpoint::Brightness => vec!["head", "brightness"],
            Endpoint::BrightnessLevels => vec!["head", "brightness", "all"],
            Endpoint::Blank => vec!["head", "blank"],
            Endpoint::AudioLoudness => vec!["head", "audio-loudness"],
            Endpoint::MouthColor => vec!["head", "mouth", "color"],
            Endpoint::EyeColor => vec!["head", "eye", "color"],

            Endpoint::MinecraftStart => vec!["minecraft", "start"],
            Endpoint::WorldGenerate => vec!["minecraft", "world", "generate"],
            Endpoint::Players => vec!["minecraft", "players"],
            Endpoint::Player(id) => vec!["minecraft", "players", id.as_str()],
            Endpoint::PlayerMove(id) => vec!["minecraft", "players", id.as_str(), "move"],
            Endpoint::PlayerPlaceBlock(id) => {
                vec!["minecraft", "players", id.as_str(), "place_block"]
            }
            Endpoint::PlayerBlock(id) => vec!["minecraft", "players", id.as_str(), "block"],
            Endpoint::Blocks => vec!["minecraft", "blocks"],
            Endpoint::BlockColor(name) => vec!["minecraft", "blocks", name.as_str(), "color"],
        }
    }

    /// Trailing file segment, for endpoints that address a static file
    pub fn file_name(&self) -> Option<String> {
        match self {
            Endpoint::EmotionImage { frame, .. } => Some(format!("{}.png", frame)),
            _ => None,
        }
    }

    /// Unencoded path for logs and error messages
    pub fn display_path(&self) -> String {
        let mut path = format!("/{}", API_ROOT);
        for segment in self.segments() {
            path.push('/');
            path.push_str(segment);
        }
        if let Some(file) = self.file_name() {
            path.push('/');
            path.push_str(&file);
        }
        path
    }
}
