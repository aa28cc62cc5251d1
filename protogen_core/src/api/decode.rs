//! Response body decoding.
//!
//! The backend speaks plain text: scalars are bare strings, booleans are
//! `true`/`false` and collections are newline-delimited lists.

use crate::error::{PanelError, PanelResult};
use crate::resource::ResourceId;
use std::collections::HashSet;

/// Split a newline-delimited list into identifiers.
///
/// Accepts `\n` and `\r\n`, drops empty lines and keeps only the first
/// occurrence of a repeated identifier.
pub fn decode_list(body: &str) -> Vec<ResourceId> {
    let mut seen = HashSet::new();
    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(*line))
        .map(ResourceId::from)
        .collect()
}

/// `true` only for the literal `true`; anything else reads as `false`
pub fn decode_flag(body: &str) -> bool {
    body.trim() == "true"
}

pub fn decode_number(body: &str) -> PanelResult<f64> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(PanelError::Decode("expected a number, got an empty body".to_string()));
    }
    Ok(trimmed.parse::<f64>()?)
}

/// Text fields: strip the trailing newline some handlers append
pub fn decode_text(body: &str) -> String {
    body.trim_end_matches(['\r', '\n']).to_string()
}

pub fn body_to_string(bytes: &[u8], path: &str) -> PanelResult<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| PanelError::Decode(format!("{} returned non UTF-8 body: {}", path, e)))
}
