// Typed operations for the apps, head and minecraft subsystems.
//
// Thin wrappers: each picks the endpoint and decoding, the generic
// operations in `client.rs` do the I/O.

use super::client::ProtogenClient;
use super::endpoints::Endpoint;
use crate::error::{PanelError, PanelResult};
use crate::resource::{AppField, Direction, ResourceCategory, ResourceId};
use serde::Serialize;

/// Thumbnail the backend serves for apps that do not ship one
pub const NO_THUMBNAIL_PATH: &str = "/static/images/no_thumbnail.png";

/// Everything a launcher card shows about one app
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppDetails {
    pub id: ResourceId,
    pub name: String,
    pub description: String,
    /// Server-relative path to the thumbnail image
    pub thumbnail: String,
    /// Server-relative path to the app's own web page
    pub homepage: String,
    /// True when at least one field could not be fetched
    pub incomplete: bool,
}

impl ProtogenClient {
    // ========================================================================
    // Apps
    // ========================================================================

    /// App ids, sorted alphabetically unless `sort_apps` is off
    pub async fn list_apps(&self) -> PanelResult<Vec<ResourceId>> {
        let mut apps = self.list_resources(ResourceCategory::Apps).await?;
        if self.sort_apps {
            apps.sort();
        }
        Ok(apps)
    }

    pub async fn app_name(&self, app: &ResourceId) -> PanelResult<String> {
        self.get_field(&Endpoint::App(app.clone(), AppField::Name)).await
    }

    pub async fn app_description(&self, app: &ResourceId) -> PanelResult<String> {
        self.get_field(&Endpoint::App(app.clone(), AppField::Description)).await
    }

    pub async fn app_thumbnail(&self, app: &ResourceId) -> PanelResult<String> {
        self.get_field(&Endpoint::App(app.clone(), AppField::Thumbnail)).await
    }

    pub async fn app_homepage(&self, app: &ResourceId) -> PanelResult<String> {
        self.get_field(&Endpoint::App(app.clone(), AppField::Homepage)).await
    }

    /// Whether `app` is the running app. The backend answers 404 when no
    /// app is running at all, which reads as "not active".
    pub async fn app_is_active(&self, app: &ResourceId) -> PanelResult<bool> {
        match self.get_flag(&Endpoint::App(app.clone(), AppField::Active)).await {
            Err(e) if e.is_not_found() => Ok(false),
            other => other,
        }
    }

    pub async fn set_app_active(&self, app: &ResourceId) -> PanelResult<()> {
        self.create_resource(&Endpoint::App(app.clone(), AppField::Active)).await
    }

    /// Id of the running app, `None` when nothing is running
    pub async fn active_app_id(&self) -> PanelResult<Option<ResourceId>> {
        match self.get_field(&Endpoint::ActiveApp).await {
            Ok(id) if id.is_empty() => Ok(None),
            Ok(id) => Ok(Some(ResourceId::from(id))),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fetch name, description, thumbnail and homepage one after another.
    ///
    /// Transport failures on a field are tolerated: the field falls back
    /// (name → id, thumbnail → the backend's placeholder) and the details
    /// are flagged `incomplete`. Decode failures still abort.
    pub async fn app_details(&self, app: &ResourceId) -> PanelResult<AppDetails> {
        let mut incomplete = false;

        let name = tolerate(self.app_name(app).await, &mut incomplete)?
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| app.to_string());
        let description =
            tolerate(self.app_description(app).await, &mut incomplete)?.unwrap_or_default();
        let thumbnail = tolerate(self.app_thumbnail(app).await, &mut incomplete)?
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| NO_THUMBNAIL_PATH.to_string());
        let homepage =
            tolerate(self.app_homepage(app).await, &mut incomplete)?.unwrap_or_default();

        if incomplete {
            tracing::warn!(app = %app, "app details incomplete");
        }

        Ok(AppDetails {
            id: app.clone(),
            name,
            description,
            thumbnail,
            homepage,
            incomplete,
        })
    }

    /// Absolute URL for a server path such as a thumbnail. The path is
    /// taken below the base URL, like every endpoint, so a base such as
    /// `http://host/panel` keeps its prefix. Absolute URLs pass through.
    pub fn resolve_path(&self, path: &str) -> PanelResult<String> {
        let mut base = self.base_url().clone();
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }
        base.join(path.trim_start_matches('/'))
            .map(|url| url.to_string())
            .map_err(|e| PanelError::InvalidInput(format!("Bad path '{}': {}", path, e)))
    }

    // ========================================================================
    // Head
    // ========================================================================

    pub async fn set_mode(&self, mode: &str) -> PanelResult<()> {
        self.set_field(&Endpoint::Mode, mode).await
    }

    pub async fn emotion(&self) -> PanelResult<String> {
        self.get_field(&Endpoint::Emotion).await
    }

    pub async fn set_emotion(&self, emotion: &str) -> PanelResult<()> {
        self.set_field(&Endpoint::Emotion, emotion).await
    }

    pub async fn emotions(&self) -> PanelResult<Vec<ResourceId>> {
        self.list_resources(ResourceCategory::Emotions).await
    }

    /// URL of one animation frame of an emotion
    pub fn emotion_image_url(&self, emotion: &ResourceId, frame: u32) -> PanelResult<String> {
        let url = self.url_for(&Endpoint::EmotionImage {
            emotion: emotion.clone(),
            frame,
        })?;
        Ok(url.to_string())
    }

    pub async fn brightness(&self) -> PanelResult<String> {
        self.get_field(&Endpoint::Brightness).await
    }

    pub async fn set_brightness(&self, level: &str) -> PanelResult<()> {
        self.set_field(&Endpoint::Brightness, level).await
    }

    pub async fn brightness_levels(&self) -> PanelResult<Vec<ResourceId>> {
        self.list_resources(ResourceCategory::BrightnessLevels).await
    }

    pub async fn blank(&self) -> PanelResult<bool> {
        self.get_flag(&Endpoint::Blank).await
    }

    pub async fn set_blank(&self, blank: bool) -> PanelResult<()> {
        self.set_field(&Endpoint::Blank, if blank { "true" } else { "false" }).await
    }

    pub async fn set_audio_loudness(&self, level: u8) -> PanelResult<()> {
        self.set_field(&Endpoint::AudioLoudness, &level.to_string()).await
    }

    pub async fn set_mouth_color(&self, color: &str) -> PanelResult<()> {
        self.set_field(&Endpoint::MouthColor, color).await
    }

    pub async fn set_eye_color(&self, color: &str) -> PanelResult<()> {
        self.set_field(&Endpoint::EyeColor, color).await
    }

    // ========================================================================
    // Minecraft
    // ========================================================================

    pub async fn start_minecraft(&self) -> PanelResult<()> {
        self.create_resource(&Endpoint::MinecraftStart).await
    }

    pub async fn generate_world(&self, seed: Option<&str>) -> PanelResult<()> {
        match seed {
            Some(seed) => self.set_field(&Endpoint::WorldGenerate, seed).await,
            None => self.create_resource(&Endpoint::WorldGenerate).await,
        }
    }

    pub async fn players(&self) -> PanelResult<Vec<ResourceId>> {
        self.list_resources(ResourceCategory::Players).await
    }

    pub async fn create_player(&self, player: &ResourceId) -> PanelResult<()> {
        self.create_resource(&Endpoint::Player(player.clone())).await
    }

    pub async fn delete_player(&self, player: &ResourceId) -> PanelResult<()> {
        self.delete_resource(&Endpoint::Player(player.clone())).await
    }

    pub async fn move_player(&self, player: &ResourceId, direction: Direction) -> PanelResult<()> {
        self.trigger_action(&Endpoint::PlayerMove(player.clone()), Some(direction.as_str())).await
    }

    pub async fn place_block(&self, player: &ResourceId) -> PanelResult<()> {
        self.trigger_action(&Endpoint::PlayerPlaceBlock(player.clone()), None).await
    }

    pub async fn set_player_block(&self, player: &ResourceId, block: &str) -> PanelResult<()> {
        self.set_field(&Endpoint::PlayerBlock(player.clone()), block).await
    }

    pub async fn blocks(&self) -> PanelResult<Vec<ResourceId>> {
        self.list_resources(ResourceCategory::Blocks).await
    }

    /// CSS colour of a block type
    pub async fn block_color(&self, block: &ResourceId) -> PanelResult<String> {
        self.get_field(&Endpoint::BlockColor(block.clone())).await
    }
}

fn tolerate<T>(result: PanelResult<T>, incomplete: &mut bool) -> PanelResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_transient() => {
            tracing::debug!(error = %e, "field unavailable");
            *incomplete = true;
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
