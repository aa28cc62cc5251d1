//! Protogen control panel
//!
//! Renders the protogen's apps, head and minecraft controls as a retained
//! element tree, keeps it in sync with the backend by polling, and exposes
//! it through one-shot CLI commands and a terminal dashboard.

pub mod action;
pub mod commands;
pub mod dashboard;
pub mod panels;
pub mod sync;
pub mod view;

pub use action::Action;
pub use panels::{PanelController, PanelKind, PanelOptions};
pub use sync::{FieldValue, SyncLoop, ToggleState, TrackedField};
pub use view::{Document, Element, SharedDocument};
