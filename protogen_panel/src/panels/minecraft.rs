//! Minecraft world and player controls.

use super::{seed_list, PanelKind, PanelOptions, PanelView};
use crate::action::Action;
use crate::sync::{Decoder, TrackedField};
use crate::view::{builder, ids, Document, Element, Tag, ERROR_ATTR, UNAVAILABLE};
use protogen_core::{Endpoint, PanelResult, ProtogenClient, ResourceId};

pub(crate) async fn build(
    client: &ProtogenClient,
    options: &PanelOptions,
) -> PanelResult<PanelView> {
    let kind = PanelKind::Minecraft;
    let mut root = builder::panel_section(kind.as_str(), kind.title());

    root.append(builder::button(ids::START_BUTTON, "Start", Action::StartMinecraft));
    root.append(builder::button(
        ids::GENERATE_BUTTON,
        "Generate world",
        Action::GenerateWorld(options.seed.clone()),
    ));
    if let Some(player) = &options.player {
        root.append(builder::button(
            ids::JOIN_BUTTON,
            &format!("Join as {}", player),
            Action::JoinPlayer(player.clone()),
        ));
    }

    // Filled in by the first poll of the players list
    root.append(Element::new(Tag::Ul).with_id(ids::PLAYER_LIST));

    let mut palette = Element::new(Tag::Div).with_id(ids::BLOCK_PALETTE);
    for block in seed_list(client.blocks().await, &mut palette)? {
        let action = options.player.as_ref().map(|player| Action::SelectBlock {
            player: player.clone(),
            block: block.clone(),
        });
        let swatch = match client.block_color(&block).await {
            Ok(color) => builder::block_swatch(&block, &color, action),
            Err(e) if e.is_transient() => {
                tracing::warn!(block = %block, error = %e, "block colour unavailable");
                let mut swatch = builder::block_swatch(&block, "", action);
                swatch.add_class(UNAVAILABLE);
                swatch.set_attr(ERROR_ATTR, &e.to_string());
                swatch
            }
            Err(e) => return Err(e),
        };
        palette.append(swatch);
    }
    root.append(palette);

    Ok(PanelView {
        root,
        fields: vec![players_field()],
    })
}

pub fn players_field() -> TrackedField {
    TrackedField::new(ids::PLAYER_LIST, Endpoint::Players, Decoder::List, |doc, value| {
        populate_player_list(doc, value.as_list().unwrap_or_default());
    })
}

/// Make the player list show exactly `players`, in order. Leaves the list
/// untouched when it already does; true if it was rebuilt.
pub fn populate_player_list(doc: &mut Document, players: &[ResourceId]) -> bool {
    let Some(list) = doc.find_mut(ids::PLAYER_LIST) else {
        return false;
    };

    let current: Vec<Option<&str>> = list.child_elements().map(Element::id).collect();
    let wanted: Vec<String> = players.iter().map(ids::player_item).collect();
    if current.len() == wanted.len()
        && current
            .iter()
            .zip(&wanted)
            .all(|(have, want)| *have == Some(want.as_str()))
    {
        return false;
    }

    list.replace_children(players.iter().map(builder::player_item).collect());
    true
}
