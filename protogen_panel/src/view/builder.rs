//! Construction of panel fragments from already-fetched data.
//!
//! Pure functions: no I/O happens here. Callers fetch through the client
//! and pass the results in.

use super::{ids, Element, Tag};
use crate::action::Action;
use protogen_core::{Direction, ResourceId};

pub const BTN_PRIMARY: &str = "btn-primary";
pub const BTN_SUCCESS: &str = "btn-success";
pub const CURRENT_EMOTION: &str = "current-emotion";

/// Section wrapping one panel, with a heading and an empty status badge
pub fn panel_section(panel: &str, title: &str) -> Element {
    Element::new(Tag::Section)
        .with_id(ids::panel_root(panel))
        .with_class("panel")
        .with_child(Element::new(Tag::H2).with_text(title))
        .with_child(
            Element::new(Tag::Span)
                .with_id(ids::panel_status(panel))
                .with_class("badge"),
        )
}

pub fn button(id: impl Into<String>, label: &str, action: Action) -> Element {
    Element::new(Tag::Button)
        .with_id(id)
        .with_class("btn")
        .with_text(label)
        .with_action(action)
}

/// Launcher card for one app. The launch button starts out inactive until
/// the first poll of the app's `active` flag.
pub fn build_card(
    id: &ResourceId,
    name: &str,
    description: &str,
    thumbnail_url: &str,
    action: Action,
) -> Element {
    let img = Element::new(Tag::Img)
        .with_class("card-img-top")
        .with_attr("src", thumbnail_url)
        .with_attr("alt", name);

    let title = Element::new(Tag::H2)
        .with_class("card-title")
        .with_text(name);

    let text = Element::new(Tag::P)
        .with_class("card-text")
        .with_text(description);

    let launch = Element::new(Tag::Button)
        .with_id(ids::launch_button(id))
        .with_class("btn")
        .with_class(BTN_PRIMARY)
        .with_text("Launch")
        .with_action(action);

    let body = Element::new(Tag::Div)
        .with_class("card-body")
        .with_child(title)
        .with_child(text)
        .with_child(launch);

    Element::new(Tag::Div)
        .with_id(ids::app_card(id))
        .with_class("card")
        .with_child(img)
        .with_child(body)
}

pub fn emotion_button(emotion: &ResourceId, image_url: &str) -> Element {
    Element::new(Tag::Button)
        .with_id(ids::emotion_button(emotion.as_str()))
        .with_value(emotion.as_str())
        .with_text(emotion.as_str())
        .with_child(
            Element::new(Tag::Img)
                .with_attr("src", image_url)
                .with_attr("alt", emotion.as_str()),
        )
        .with_action(Action::SetEmotion(emotion.clone()))
}

/// One choice of a radio group
pub struct RadioOption {
    pub id: String,
    pub value: String,
    pub label: String,
    pub action: Action,
}

/// `fieldset` with a legend and one input + label pair per option
pub fn radio_group(
    container_id: &str,
    legend: &str,
    name: &str,
    options: Vec<RadioOption>,
) -> Element {
    let mut fieldset = Element::new(Tag::Fieldset)
        .with_id(container_id)
        .with_child(Element::new(Tag::Legend).with_text(legend));
    for option in options {
        append_radio(&mut fieldset, name, option);
    }
    fieldset
}

/// Add one more choice to a radio group
pub fn append_radio(fieldset: &mut Element, name: &str, option: RadioOption) {
    fieldset.append(
        Element::new(Tag::Input)
            .with_id(option.id.as_str())
            .with_attr("type", "radio")
            .with_attr("name", name)
            .with_attr("data-label", option.label.as_str())
            .with_value(option.value)
            .with_action(option.action),
    );
    fieldset.append(
        Element::new(Tag::Label)
            .with_attr("for", option.id)
            .with_text(option.label),
    );
}

/// Slider for a write-only numeric setting
pub fn range_input(id: &str, label: &str, min: u8, max: u8, value: u8, action: Action) -> Element {
    Element::new(Tag::Input)
        .with_id(id)
        .with_attr("type", "range")
        .with_attr("min", min.to_string())
        .with_attr("max", max.to_string())
        .with_attr("data-label", label)
        .with_value(value.to_string())
        .with_action(action)
}

/// List entry for a player, with movement, place and remove controls
pub fn player_item(player: &ResourceId) -> Element {
    let mut controls = Element::new(Tag::Div).with_class("player-controls");
    for direction in Direction::all() {
        controls.append(button(
            ids::player_move(player, direction),
            direction.as_str(),
            Action::MovePlayer(player.clone(), direction),
        ));
    }
    controls.append(button(
        ids::player_place(player),
        "place block",
        Action::PlaceBlock(player.clone()),
    ));
    controls.append(button(
        ids::player_leave(player),
        "remove",
        Action::LeavePlayer(player.clone()),
    ));

    Element::new(Tag::Li)
        .with_id(ids::player_item(player))
        .with_child(
            Element::new(Tag::Span)
                .with_class("player-name")
                .with_text(player.as_str()),
        )
        .with_child(controls)
}

/// Palette entry for a block type; clickable only when a player is bound
pub fn block_swatch(block: &ResourceId, color: &str, action: Option<Action>) -> Element {
    let mut swatch = swatch(ids::block_button(block), block.as_str(), color).with_class("block");
    swatch.set_action(action);
    swatch
}

/// Preset button for the mouth or eye colour
pub fn color_button(id: String, label: &str, color: &str, action: Action) -> Element {
    swatch(id, label, color)
        .with_class("btn")
        .with_action(action)
}

/// Button showing `color`. The raw value is kept in `data-color`; it only
/// reaches `style` when it is a single colour token.
fn swatch(id: String, label: &str, color: &str) -> Element {
    let mut swatch = Element::new(Tag::Button)
        .with_id(id)
        .with_attr("data-color", color)
        .with_text(label);
    if is_css_color(color) {
        swatch.set_attr("style", &format!("background-color: {}", color));
    }
    swatch
}

/// `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, a colour keyword, or an
/// `rgb()`/`rgba()`/`hsl()`/`hsla()` call with numeric arguments
pub fn is_css_color(value: &str) -> bool {
    if let Some(hex) = value.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic()) {
        return true;
    }
    let Some((name, args)) = value.split_once('(') else {
        return false;
    };
    let Some(args) = args.strip_suffix(')') else {
        return false;
    };
    matches!(name, "rgb" | "rgba" | "hsl" | "hsla")
        && args
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '%' | ' ' | '/'))
}
