//! # Protogen Core
//!
//! Client-side building blocks for driving a protogen head/body controller
//! over HTTP:
//!
//! - **API**: endpoint catalogue, response decoding and an async client
//! - **Config**: layered panel configuration (file, environment)
//! - **Errors**: one error type for network, backend and decode failures
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use protogen_core::{PanelConfig, ProtogenClient};
//!
//! # async fn demo() -> protogen_core::PanelResult<()> {
//! let client = ProtogenClient::new(&PanelConfig::default())?;
//! for emotion in client.emotions().await? {
//!     println!("{}", emotion);
//! }
//! client.set_emotion("happy").await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod resource;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use api::{AppDetails, Endpoint, ProtogenClient};
pub use config::PanelConfig;
pub use error::{PanelError, PanelResult};
pub use resource::{AppField, Direction, ResourceCategory, ResourceId};
