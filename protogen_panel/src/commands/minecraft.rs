//! Minecraft commands: world and player control

use super::{print_done, print_json, print_list};
use colored::*;
use protogen_core::{Direction, PanelResult, ProtogenClient, ResourceId};

pub async fn start(client: &ProtogenClient) -> PanelResult<()> {
    client.start_minecraft().await?;
    print_done("Minecraft started");
    Ok(())
}

pub async fn generate(client: &ProtogenClient, seed: Option<&str>) -> PanelResult<()> {
    client.generate_world(seed).await?;
    match seed {
        Some(seed) => print_done(&format!("World generated from seed {}", seed.cyan())),
        None => print_done("World generated"),
    }
    Ok(())
}

pub async fn list_players(client: &ProtogenClient) -> PanelResult<()> {
    let players = client.players().await?;
    print_list("Players", &players, "Use 'protogen minecraft join <ID>' to add one");
    Ok(())
}

pub async fn join(client: &ProtogenClient, player: &ResourceId) -> PanelResult<()> {
    client.create_player(player).await?;
    print_done(&format!("{} joined", player.as_str().cyan()));
    Ok(())
}

pub async fn leave(client: &ProtogenClient, player: &ResourceId) -> PanelResult<()> {
    client.delete_player(player).await?;
    print_done(&format!("{} left", player.as_str().cyan()));
    Ok(())
}

pub async fn move_player(
    client: &ProtogenClient,
    player: &ResourceId,
    direction: Direction,
) -> PanelResult<()> {
    client.move_player(player, direction).await?;
    print_done(&format!("Moved {} {}", player.as_str().cyan(), direction));
    Ok(())
}

pub async fn place_block(client: &ProtogenClient, player: &ResourceId) -> PanelResult<()> {
    client.place_block(player).await?;
    print_done(&format!("{} placed a block", player.as_str().cyan()));
    Ok(())
}

pub async fn select_block(
    client: &ProtogenClient,
    player: &ResourceId,
    block: &str,
) -> PanelResult<()> {
    client.set_player_block(player, block).await?;
    print_done(&format!("{} now holds {}", player.as_str().cyan(), block.cyan()));
    Ok(())
}

/// List block types with their colours
pub async fn list_blocks(client: &ProtogenClient, json: bool) -> PanelResult<()> {
    let blocks = client.blocks().await?;
    let mut colored_blocks = Vec::with_capacity(blocks.len());
    for block in &blocks {
        let color = client.block_color(block).await.ok();
        colored_blocks.push((block, color));
    }

    if json {
        let output: Vec<_> = colored_blocks
            .iter()
            .map(|(block, color)| serde_json::json!({ "name": block, "color": color }))
            .collect();
        return print_json(&output);
    }

    if blocks.is_empty() {
        print_list("Blocks", &blocks, "Start minecraft first");
        return Ok(());
    }

    println!("{}", "Blocks:".green().bold());
    println!("  {:<24} {}", "NAME".dimmed(), "COLOR".dimmed());
    println!("  {}", "-".repeat(36).dimmed());
    for (block, color) in &colored_blocks {
        println!(
            "  {:<24} {}",
            block.as_str(),
            color.as_deref().unwrap_or("unavailable")
        );
    }
    Ok(())
}
