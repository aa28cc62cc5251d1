//! Poll-and-reconcile loop.
//!
//! The backend has no push channel, so every dynamic control is backed by a
//! [`TrackedField`]: an endpoint, a decoder and a patch function that
//! writes the decoded value into the document. A [`SyncLoop`] runs one
//! fixed-period timer per field.
//!
//! Ordering rules:
//! - a loop tick is skipped while a fetch for the same field is in flight,
//!   so the loop itself never has more than one outstanding request per
//!   field;
//! - explicit polls may overlap with a loop fetch; every poll takes a
//!   generation ticket and only the newest started poll may write.

use crate::view::{builder, Document, Element, SharedDocument};
use protogen_core::api::decode::{decode_flag, decode_list, decode_number};
use protogen_core::{Endpoint, PanelResult, ProtogenClient, ResourceId};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// How a field's response body is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    Text,
    Flag,
    Number,
    List,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Number(f64),
    List(Vec<ResourceId>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ResourceId]> {
        match self {
            FieldValue::List(list) => Some(list),
            _ => None,
        }
    }
}

impl Decoder {
    fn decode(&self, body: String) -> PanelResult<FieldValue> {
        Ok(match self {
            Decoder::Text => FieldValue::Text(body),
            Decoder::Flag => FieldValue::Flag(decode_flag(&body)),
            Decoder::Number => FieldValue::Number(decode_number(&body)?),
            Decoder::List => FieldValue::List(decode_list(&body)),
        })
    }
}

pub type Patch = Arc<dyn Fn(&mut Document, &FieldValue) + Send + Sync>;

/// Generation counter plus in-flight count for one field
#[derive(Debug, Default)]
pub struct PollGate {
    started: AtomicU64,
    in_flight: AtomicUsize,
}

impl PollGate {
    pub fn begin(&self) -> PollTicket<'_> {
        let generation = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        PollTicket {
            gate: self,
            generation,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}

pub struct PollTicket<'a> {
    gate: &'a PollGate,
    generation: u64,
}

impl PollTicket<'_> {
    /// False once a newer poll of the same field has started
    pub fn is_current(&self) -> bool {
        self.gate.started.load(Ordering::SeqCst) == self.generation
    }
}

impl Drop for PollTicket<'_> {
    fn drop(&mut self) {
        self.gate.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// One poll-and-reconcile control
pub struct TrackedField {
    key: String,
    anchor: String,
    endpoint: Endpoint,
    decoder: Decoder,
    absent: Option<FieldValue>,
    patch: Patch,
    gate: PollGate,
}

impl TrackedField {
    /// `anchor` is the element marked unavailable when the fetch fails
    pub fn new<F>(anchor: impl Into<String>, endpoint: Endpoint, decoder: Decoder, patch: F) -> Self
    where
        F: Fn(&mut Document, &FieldValue) + Send + Sync + 'static,
    {
        Self {
            key: endpoint.display_path(),
            anchor: anchor.into(),
            endpoint,
            decoder,
            absent: None,
            patch: Arc::new(patch),
            gate: PollGate::default(),
        }
    }

    /// Value to reconcile when the backend answers 404
    pub fn when_absent(mut self, value: FieldValue) -> Self {
        self.absent = Some(value);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Reconcile an already-fetched value into the document
    pub fn apply(&self, doc: &mut Document, value: &FieldValue) {
        (self.patch)(doc, value);
    }

    pub async fn fetch(&self, client: &ProtogenClient) -> PanelResult<FieldValue> {
        match client.get_field(&self.endpoint).await {
            Ok(body) => self.decoder.decode(body),
            Err(e) if e.is_not_found() => match &self.absent {
                Some(value) => Ok(value.clone()),
                None => Err(e),
            },
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Applied,
    Failed,
    /// A newer poll of the same field started; this result was dropped
    Stale,
}

/// Fetch one field and reconcile it into the document
pub async fn poll_field(
    client: &ProtogenClient,
    document: &SharedDocument,
    field: &TrackedField,
) -> PollOutcome {
    let ticket = field.gate.begin();
    let result = field.fetch(client).await;

    if !ticket.is_current() {
        tracing::debug!(field = %field.key, "discarding stale poll result");
        return PollOutcome::Stale;
    }

    let mut doc = document.write();
    let outcome = match result {
        Ok(value) => {
            doc.clear_unavailable(&field.anchor);
            field.apply(&mut doc, &value);
            PollOutcome::Applied
        }
        Err(e) => {
            tracing::warn!(field = %field.key, error = %e, "poll failed");
            doc.mark_unavailable(&field.anchor, &e.to_string());
            PollOutcome::Failed
        }
    };
    doc.refresh_status();
    outcome
}

/// Fixed-period timers, one per tracked field. Dropping the loop stops it.
pub struct SyncLoop {
    handles: Vec<JoinHandle<()>>,
    period: Duration,
}

impl SyncLoop {
    /// Start polling. The first tick fires one `period` from now; callers
    /// poll once themselves before starting the loop.
    pub fn start(
        client: ProtogenClient,
        document: SharedDocument,
        fields: &[Arc<TrackedField>],
        period: Duration,
    ) -> Self {
        let handles = fields
            .iter()
            .map(|field| {
                let client = client.clone();
                let document = document.clone();
                let field = field.clone();
                tokio::spawn(async move {
                    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                    loop {
                        ticker.tick().await;
                        if field.is_busy() {
                            tracing::trace!(
                                field = %field.key,
                                "previous poll in flight, skipping tick"
                            );
                            continue;
                        }
                        poll_field(&client, &document, &field).await;
                    }
                })
            })
            .collect();

        tracing::debug!(fields = fields.len(), ?period, "sync loop started");
        Self { handles, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.handles.iter().any(|handle| !handle.is_finished())
    }

    pub fn stop(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        tracing::debug!("sync loop stopped");
    }
}

impl Drop for SyncLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Launch control state: `Inactive` until a poll observes `true`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleState {
    #[default]
    Inactive,
    Active,
}

impl ToggleState {
    pub fn observe(flag: bool) -> Self {
        if flag {
            ToggleState::Active
        } else {
            ToggleState::Inactive
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToggleState::Inactive => "Launch",
            ToggleState::Active => "Active",
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            ToggleState::Inactive => builder::BTN_PRIMARY,
            ToggleState::Active => builder::BTN_SUCCESS,
        }
    }

    /// Relabel and restyle a launch button; true if anything changed
    pub fn apply(&self, button: &mut Element) -> bool {
        let other = match self {
            ToggleState::Inactive => ToggleState::Active,
            ToggleState::Active => ToggleState::Inactive,
        };
        let mut changed = button.set_text(self.label());
        changed |= button.remove_class(other.class());
        changed |= button.add_class(self.class());
        changed
    }
}
