//! App commands: list, inspect and launch apps

use super::{print_done, print_json, print_list};
use colored::*;
use protogen_core::{PanelResult, ProtogenClient, ResourceId};

/// List all apps, marking the running one
pub async fn list_apps(client: &ProtogenClient, json: bool) -> PanelResult<()> {
    let apps = client.list_apps().await?;
    let active = client.active_app_id().await?;

    if json {
        let output: Vec<_> = apps
            .iter()
            .map(|app| {
                serde_json::json!({
                    "id": app,
                    "active": Some(app) == active.as_ref(),
                })
            })
            .collect();
        return print_json(&output);
    }

    if apps.is_empty() {
        print_list("Apps", &apps, "Install an app on the protogen to see it here");
        return Ok(());
    }

    println!("{}", "Apps:".green().bold());
    for app in &apps {
        if Some(app) == active.as_ref() {
            println!("  {} {}", app.as_str().white().bold(), "(active)".green());
        } else {
            println!("  {}", app);
        }
    }
    println!();
    println!("  {} {}", "Total:".dimmed(), apps.len());
    Ok(())
}

/// Show every field of one app
pub async fn app_info(client: &ProtogenClient, app: &ResourceId, json: bool) -> PanelResult<()> {
    let details = client.app_details(app).await?;
    let active = client.app_is_active(app).await?;

    if json {
        let mut output = serde_json::to_value(&details).unwrap_or_default();
        output["active"] = serde_json::Value::Bool(active);
        return print_json(&output);
    }

    println!("{} {}", "App:".cyan(), details.name.white().bold());
    println!("  {} {}", "Id:".dimmed(), details.id);
    if !details.description.is_empty() {
        println!("  {} {}", "Description:".dimmed(), details.description);
    }
    println!(
        "  {} {}",
        "Thumbnail:".dimmed(),
        client.resolve_path(&details.thumbnail)?
    );
    if !details.homepage.is_empty() {
        println!(
            "  {} {}",
            "Homepage:".dimmed(),
            client.resolve_path(&details.homepage)?
        );
    }
    println!(
        "  {} {}",
        "Active:".dimmed(),
        if active { "Yes".green() } else { "No".normal() }
    );
    if details.incomplete {
        println!(
            "  {} some fields could not be fetched",
            "Warning:".yellow()
        );
    }
    Ok(())
}

pub async fn launch_app(client: &ProtogenClient, app: &ResourceId) -> PanelResult<()> {
    client.set_app_active(app).await?;
    print_done(&format!("Launched {}", app.as_str().cyan()));
    Ok(())
}

pub async fn active_app(client: &ProtogenClient) -> PanelResult<()> {
    match client.active_app_id().await? {
        Some(app) => println!("{}", app),
        None => println!("{}", "No app is running.".yellow()),
    }
    Ok(())
}
