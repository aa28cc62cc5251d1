//! HTTP surface of the protogen web server.

pub mod client;
pub mod decode;
pub mod endpoints;
mod protogen;

pub use client::ProtogenClient;
pub use endpoints::Endpoint;
pub use protogen::{AppDetails, NO_THUMBNAIL_PATH};
