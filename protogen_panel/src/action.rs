//! User-triggered commands.
//!
//! Each actionable element carries an [`Action`] that closes over the
//! resource it belongs to, so N rendered resources give N independently
//! addressable handlers.

use crate::sync::TrackedField;
use protogen_core::{AppField, Direction, Endpoint, PanelResult, ProtogenClient, ResourceId};

/// Mode name that hands the display back to the head renderer
pub const PROTOGEN_HEAD_MODE: &str = "protogen_head";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LaunchApp(ResourceId),
    SetMode(String),
    SetEmotion(ResourceId),
    SetBrightness(ResourceId),
    SetBlank(bool),
    SetAudioLoudness(u8),
    SetMouthColor(String),
    SetEyeColor(String),
    StartMinecraft,
    GenerateWorld(Option<String>),
    JoinPlayer(ResourceId),
    LeavePlayer(ResourceId),
    MovePlayer(ResourceId, Direction),
    PlaceBlock(ResourceId),
    SelectBlock { player: ResourceId, block: ResourceId },
}

impl Action {
    /// Issue the mutation; errors are returned, never swallowed
    pub async fn dispatch(&self, client: &ProtogenClient) -> PanelResult<()> {
        tracing::info!(action = %self.describe(), "dispatch");
        match self {
            Action::LaunchApp(app) => client.set_app_active(app).await,
            Action::SetMode(mode) => client.set_mode(mode).await,
            Action::SetEmotion(emotion) => client.set_emotion(emotion.as_str()).await,
            Action::SetBrightness(level) => client.set_brightness(level.as_str()).await,
            Action::SetBlank(blank) => client.set_blank(*blank).await,
            Action::SetAudioLoudness(level) => client.set_audio_loudness(*level).await,
            Action::SetMouthColor(color) => client.set_mouth_color(color).await,
            Action::SetEyeColor(color) => client.set_eye_color(color).await,
            Action::StartMinecraft => client.start_minecraft().await,
            Action::GenerateWorld(seed) => client.generate_world(seed.as_deref()).await,
            Action::JoinPlayer(player) => client.create_player(player).await,
            Action::LeavePlayer(player) => client.delete_player(player).await,
            Action::MovePlayer(player, direction) => client.move_player(player, *direction).await,
            Action::PlaceBlock(player) => client.place_block(player).await,
            Action::SelectBlock { player, block } => {
                client.set_player_block(player, block.as_str()).await
            }
        }
    }

    /// Whether this action changes the state `field` polls, so the field
    /// should be re-polled right away instead of on the next tick
    pub fn affects(&self, field: &TrackedField) -> bool {
        matches!(
            (self, field.endpoint()),
            (Action::LaunchApp(_), Endpoint::App(_, AppField::Active))
                | (Action::SetEmotion(_), Endpoint::Emotion)
                | (Action::SetBrightness(_), Endpoint::Brightness)
                | (Action::SetBlank(_), Endpoint::Blank)
                | (Action::JoinPlayer(_), Endpoint::Players)
                | (Action::LeavePlayer(_), Endpoint::Players)
        )
    }

    pub fn describe(&self) -> String {
        match self {
            Action::LaunchApp(app) => format!("launch app {}", app),
            Action::SetMode(mode) => format!("set mode {}", mode),
            Action::SetEmotion(emotion) => format!("set emotion {}", emotion),
            Action::SetBrightness(level) => format!("set brightness {}", level),
            Action::SetBlank(blank) => format!("set screen blank {}", blank),
            Action::SetAudioLoudness(level) => format!("set audio loudness {}", level),
            Action::SetMouthColor(color) => format!("set mouth color {}", color),
            Action::SetEyeColor(color) => format!("set eye color {}", color),
            Action::StartMinecraft => "start minecraft".to_string(),
            Action::GenerateWorld(Some(seed)) => format!("generate world (seed {})", seed),
            Action::GenerateWorld(None) => "generate world".to_string(),
            Action::JoinPlayer(player) => format!("add player {}", player),
            Action::LeavePlayer(player) => format!("remove player {}", player),
            Action::MovePlayer(player, direction) => format!("move {} {}", player, direction),
            Action::PlaceBlock(player) => format!("{} places block", player),
            Action::SelectBlock { player, block } => format!("{} selects {}", player, block),
        }
    }
}
