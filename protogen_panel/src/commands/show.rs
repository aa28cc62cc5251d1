//! `protogen show`: build one panel, poll it once and print it

use super::print_json;
use crate::panels::{PanelController, PanelKind, PanelOptions};
use crate::view::outline::{flatten, ControlRow, RowKind};
use crate::view::Document;
use colored::*;
use protogen_core::{PanelResult, ProtogenClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowFormat {
    #[default]
    Outline,
    Json,
    Html,
}

pub async fn show_panel(
    client: &ProtogenClient,
    kind: PanelKind,
    options: &PanelOptions,
    format: ShowFormat,
) -> PanelResult<()> {
    let panel = PanelController::build(kind, client.clone(), options).await?;
    let doc = panel.snapshot();

    match format {
        ShowFormat::Json => print_json(&doc),
        ShowFormat::Html => {
            println!("{}", doc.to_html());
            Ok(())
        }
        ShowFormat::Outline => {
            print_outline(&doc);
            Ok(())
        }
    }
}

fn print_outline(doc: &Document) {
    for row in flatten(doc) {
        println!("{}", format_row(&row));
    }
}

fn format_row(row: &ControlRow) -> String {
    let indent = "  ".repeat(row.depth.saturating_sub(1));
    let line = match &row.kind {
        RowKind::Heading => row.label.cyan().bold().to_string(),
        RowKind::Text => row.label.normal().to_string(),
        RowKind::Button { highlighted } => {
            let label = format!("[{}]", row.label);
            if *highlighted {
                label.green().bold().to_string()
            } else {
                label
            }
        }
        RowKind::Radio { checked } => {
            format!("({}) {}", if *checked { "•" } else { " " }, row.label)
        }
        RowKind::Range { value } => format!("{} [{}]", row.label, value),
    };

    if row.unavailable && row.kind != RowKind::Heading {
        format!("{}{} {}", indent, line.dimmed(), "(unavailable)".red())
    } else {
        format!("{}{}", indent, line)
    }
}
