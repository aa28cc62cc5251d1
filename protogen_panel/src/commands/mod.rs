//! One-shot CLI commands. Each prints its result and returns; nothing here
//! keeps polling.

pub mod apps;
pub mod head;
pub mod minecraft;
pub mod show;

use colored::*;
use protogen_core::{PanelError, PanelResult, ResourceId};
use serde::Serialize;

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> PanelResult<()> {
    let output = serde_json::to_string_pretty(value)
        .map_err(|e| PanelError::Decode(format!("Could not encode JSON: {}", e)))?;
    println!("{}", output);
    Ok(())
}

pub(crate) fn print_done(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print a resource list, or a hint when it is empty
pub(crate) fn print_list(title: &str, items: &[ResourceId], empty_hint: &str) {
    if items.is_empty() {
        println!("{}", format!("No {} found.", title.to_lowercase()).yellow());
        println!("  {} {}", "Tip:".dimmed(), empty_hint);
        return;
    }

    println!("{}", format!("{}:", title).green().bold());
    for item in items {
        println!("  {}", item);
    }
    println!();
    println!("  {} {}", "Total:".dimmed(), items.len());
}
