//! Element identifiers.
//!
//! Every per-resource id is a pure function of the resource id, so a poll
//! can always find the element it has to patch without a lookup table.
//!
//! Ids are `-`-separated words. The resource id fills exactly one word and
//! is escaped so it never contains a `-` itself; two ids built from
//! different patterns therefore cannot coincide, whatever the backend
//! names its resources.

use protogen_core::{Direction, ResourceId};

pub const APP_LIST: &str = "app-list";

pub const HEAD_MODE_BUTTON: &str = "head-mode-button";
pub const EMOTION_CONTAINER: &str = "emotion-options-container";
pub const BRIGHTNESS_CONTAINER: &str = "brightness-options-container";
pub const BRIGHTNESS_GROUP: &str = "brightness";
pub const SCREEN_BLANK: &str = "screen-blank";
pub const AUDIO_LEVEL: &str = "audio-level";
pub const MOUTH_COLOR_CONTAINER: &str = "mouth-color-options";
pub const EYE_COLOR_CONTAINER: &str = "eye-color-options";

pub const START_BUTTON: &str = "start-button";
pub const GENERATE_BUTTON: &str = "generate-button";
pub const JOIN_BUTTON: &str = "join-button";
pub const PLAYER_LIST: &str = "minecraft-players";
pub const BLOCK_PALETTE: &str = "minecraft-blocks";

/// Escape a resource id into a single id word.
///
/// ASCII letters, digits and `_` pass through; every other byte becomes
/// `.` followed by two lowercase hex digits.
pub fn escape(id: &str) -> String {
    let mut escaped = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' {
            escaped.push(byte as char);
        } else {
            escaped.push_str(&format!(".{:02x}", byte));
        }
    }
    escaped
}

/// Root section of a panel (`apps-panel`, `head-panel`, ...)
pub fn panel_root(panel: &str) -> String {
    format!("{}-panel", panel)
}

pub fn panel_status(panel: &str) -> String {
    format!("{}-status", panel)
}

pub fn app_card(app: &ResourceId) -> String {
    format!("app-card-{}", escape(app.as_str()))
}

pub fn launch_button(app: &ResourceId) -> String {
    format!("launch-app-button-{}", escape(app.as_str()))
}

pub fn emotion_button(emotion: &str) -> String {
    format!("{}-button", escape(emotion))
}

pub fn brightness_option(level: &str) -> String {
    format!("brightness_option_{}", escape(level))
}

pub fn blank_option(blank: bool) -> String {
    format!("{}-{}", SCREEN_BLANK, blank)
}

pub fn mouth_color(preset: &str) -> String {
    format!("mouth-color-{}", escape(preset))
}

pub fn eye_color(preset: &str) -> String {
    format!("eye-color-{}", escape(preset))
}

pub fn player_item(player: &ResourceId) -> String {
    format!("player-{}", escape(player.as_str()))
}

pub fn player_move(player: &ResourceId, direction: Direction) -> String {
    format!("player-{}-{}", escape(player.as_str()), direction)
}

pub fn player_place(player: &ResourceId) -> String {
    format!("player-{}-place", escape(player.as_str()))
}

pub fn player_leave(player: &ResourceId) -> String {
    format!("player-{}-leave", escape(player.as_str()))
}

pub fn block_button(block: &ResourceId) -> String {
    format!("block-{}", escape(block.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_derived_from_resource_ids() {
        let snake = ResourceId::from("snake");
        assert_eq!(launch_button(&snake), "launch-app-button-snake");
        assert_eq!(launch_button(&snake), launch_button(&ResourceId::from("snake")));
        assert_eq!(emotion_button("happy"), "happy-button");
        assert_eq!(brightness_option("high"), "brightness_option_high");
        assert_eq!(blank_option(true), "screen-blank-true");
        assert_eq!(
            player_move(&"steve".into(), Direction::Left),
            "player-steve-left"
        );
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("snake_2"), "snake_2");
        assert_eq!(escape("head-mode"), "head.2dmode");
        assert_eq!(escape("a.b"), "a.2eb");
        assert_eq!(escape("é"), ".c3.a9");
    }

    #[test]
    fn test_resource_names_cannot_collide_with_other_ids() {
        assert_ne!(emotion_button("head-mode"), HEAD_MODE_BUTTON);
        assert_ne!(
            player_item(&"steve-left".into()),
            player_move(&"steve".into(), Direction::Left)
        );
        assert_ne!(player_item(&"players".into()), PLAYER_LIST);
        assert_ne!(block_button(&"blocks".into()), BLOCK_PALETTE);
        // An escaped id never contains the escape of another
        assert_ne!(emotion_button("a.2db"), emotion_button("a-b"));
    }
}
