//! Panel controllers.
//!
//! A [`PanelController`] owns one rendered panel: its document, the fields
//! tracked for it and the sync loop that keeps them current. Nothing is
//! global, so several panels (or several tests) can run side by side.

pub mod apps;
pub mod head;
pub mod minecraft;

use crate::action::Action;
use crate::sync::{poll_field, PollOutcome, SyncLoop, TrackedField};
use crate::view::{ids, Document, Element, SharedDocument, Tag, SEED_ERROR_ATTR, UNAVAILABLE};
use futures::future::join_all;
use protogen_core::{PanelError, PanelResult, ProtogenClient, ResourceId};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PanelKind {
    Apps,
    Head,
    Minecraft,
}

impl PanelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelKind::Apps => "apps",
            PanelKind::Head => "head",
            PanelKind::Minecraft => "minecraft",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PanelKind::Apps => "Apps",
            PanelKind::Head => "Head",
            PanelKind::Minecraft => "Minecraft",
        }
    }

    pub fn all() -> [PanelKind; 3] {
        [PanelKind::Apps, PanelKind::Head, PanelKind::Minecraft]
    }
}

/// Per-session inputs a panel cannot discover from the backend
#[derive(Debug, Clone, Default)]
pub struct PanelOptions {
    /// Player the minecraft controls act for
    pub player: Option<ResourceId>,
    /// Seed passed along when generating a world
    pub seed: Option<String>,
}

/// Freshly built panel, before any field has been polled
pub(crate) struct PanelView {
    pub root: Element,
    pub fields: Vec<TrackedField>,
}

/// Accept a seeded list, or render the container unavailable and carry on
/// with nothing when the backend could not be reached.
pub(crate) fn seed_list(
    result: PanelResult<Vec<ResourceId>>,
    container: &mut Element,
) -> PanelResult<Vec<ResourceId>> {
    match result {
        Ok(list) => Ok(list),
        Err(e) if e.is_transient() => {
            tracing::warn!(container = ?container.id(), error = %e, "could not seed list");
            container.add_class(UNAVAILABLE);
            container.set_attr(SEED_ERROR_ATTR, &e.to_string());
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

pub struct PanelController {
    kind: PanelKind,
    client: ProtogenClient,
    document: SharedDocument,
    fields: Vec<Arc<TrackedField>>,
    sync: Option<SyncLoop>,
}

impl PanelController {
    /// Build the panel and poll every field once. The sync loop is not
    /// started; see [`PanelController::open`].
    pub async fn build(
        kind: PanelKind,
        client: ProtogenClient,
        options: &PanelOptions,
    ) -> PanelResult<Self> {
        let view = match kind {
            PanelKind::Apps => apps::build(&client).await?,
            PanelKind::Head => head::build(&client).await?,
            PanelKind::Minecraft => minecraft::build(&client, options).await?,
        };

        let mut document =
            Document::new(view.root).with_status_badge(ids::panel_status(kind.as_str()));
        document.refresh_status();

        let controller = Self {
            kind,
            client,
            document: document.shared(),
            fields: view.fields.into_iter().map(Arc::new).collect(),
            sync: None,
        };
        controller.poll_all().await;

        tracing::info!(
            panel = kind.as_str(),
            fields = controller.fields.len(),
            "panel built"
        );
        Ok(controller)
    }

    /// Build, poll once, then keep polling every `period`
    pub async fn open(
        kind: PanelKind,
        client: ProtogenClient,
        options: &PanelOptions,
        period: Duration,
    ) -> PanelResult<Self> {
        let mut controller = Self::build(kind, client, options).await?;
        controller.start(period);
        Ok(controller)
    }

    pub fn start(&mut self, period: Duration) {
        if self.is_running() {
            return;
        }
        self.sync = Some(SyncLoop::start(
            self.client.clone(),
            self.document.clone(),
            &self.fields,
            period,
        ));
    }

    pub fn shutdown(&mut self) {
        if let Some(mut sync) = self.sync.take() {
            sync.stop();
            tracing::info!(panel = self.kind.as_str(), "panel shut down");
        }
    }

    pub fn is_running(&self) -> bool {
        self.sync.as_ref().is_some_and(SyncLoop::is_running)
    }

    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    pub fn client(&self) -> &ProtogenClient {
        &self.client
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    /// Copy of the document as it is right now
    pub fn snapshot(&self) -> Document {
        self.document.read().clone()
    }

    pub fn field_keys(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.key()).collect()
    }

    pub async fn poll_all(&self) -> Vec<PollOutcome> {
        join_all(
            self.fields
                .iter()
                .map(|field| poll_field(&self.client, &self.document, field)),
        )
        .await
    }

    /// Poll one field out of schedule, by key (the endpoint path)
    pub async fn poll_now(&self, key: &str) -> PanelResult<PollOutcome> {
        let field = self
            .fields
            .iter()
            .find(|field| field.key() == key)
            .ok_or_else(|| PanelError::InvalidInput(format!("No tracked field '{}'", key)))?;
        Ok(poll_field(&self.client, &self.document, field).await)
    }

    /// Run the action attached to `element_id`
    pub async fn activate(&self, element_id: &str) -> PanelResult<()> {
        let action = {
            let doc = self.document.read();
            let element = doc
                .find(element_id)
                .ok_or_else(|| PanelError::ElementNotFound(element_id.to_string()))?;
            element.action().cloned().ok_or_else(|| {
                PanelError::InvalidInput(format!("Element '{}' has no action", element_id))
            })?
        };
        self.run_action(&action).await
    }

    /// Dispatch `action`, then re-poll the fields it changes so the panel
    /// reflects it without waiting for the next tick
    pub async fn run_action(&self, action: &Action) -> PanelResult<()> {
        action.dispatch(&self.client).await?;

        let affected: Vec<&Arc<TrackedField>> = self
            .fields
            .iter()
            .filter(|field| action.affects(field))
            .collect();
        join_all(
            affected
                .into_iter()
                .map(|field| poll_field(&self.client, &self.document, field)),
        )
        .await;
        Ok(())
    }

    /// Move a range input by `delta`, clamped to its bounds, and send the
    /// new level. Returns the level sent.
    pub async fn adjust(&self, element_id: &str, delta: i16) -> PanelResult<u8> {
        let (level, action) = {
            let doc = self.document.read();
            let element = doc
                .find(element_id)
                .ok_or_else(|| PanelError::ElementNotFound(element_id.to_string()))?;
            if element.tag() != Tag::Input || element.attr("type") != Some("range") {
                return Err(PanelError::InvalidInput(format!(
                    "Element '{}' is not a range input",
                    element_id
                )));
            }

            let bound = |name: &str, default: i16| {
                element
                    .attr(name)
                    .and_then(|v| v.parse::<i16>().ok())
                    .unwrap_or(default)
            };
            let current = element
                .value()
                .and_then(|v| v.parse::<i16>().ok())
                .unwrap_or(0);
            let min = bound("min", 0);
            let max = bound("max", 100).max(min);
            let level = current
                .saturating_add(delta)
                .clamp(min, max)
                .clamp(0, u8::MAX as i16) as u8;

            let action = match element.action() {
                Some(Action::SetAudioLoudness(_)) => Action::SetAudioLoudness(level),
                _ => {
                    return Err(PanelError::InvalidInput(format!(
                        "Element '{}' has no adjustable action",
                        element_id
                    )))
                }
            };
            (level, action)
        };

        self.run_action(&action).await?;

        let mut doc = self.document.write();
        if let Some(element) = doc.find_mut(element_id) {
            element.set_value(&level.to_string());
            element.set_action(Some(action));
        }
        Ok(level)
    }
}

impl Drop for PanelController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
