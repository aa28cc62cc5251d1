//! Head controls: mode, emotion, brightness, screen blank, audio and colours.

use super::{seed_list, PanelKind, PanelView};
use crate::action::{Action, PROTOGEN_HEAD_MODE};
use crate::sync::{Decoder, TrackedField};
use crate::view::builder::{self, RadioOption, CURRENT_EMOTION};
use crate::view::{ids, Element, Tag};
use protogen_core::{Endpoint, PanelResult, ProtogenClient};

pub(crate) async fn build(client: &ProtogenClient) -> PanelResult<PanelView> {
    let kind = PanelKind::Head;
    let mut root = builder::panel_section(kind.as_str(), kind.title());

    root.append(builder::button(
        ids::HEAD_MODE_BUTTON,
        "Enable",
        Action::SetMode(PROTOGEN_HEAD_MODE.to_string()),
    ));

    let mut emotions = Element::new(Tag::Div)
        .with_id(ids::EMOTION_CONTAINER)
        .with_class("emotion-options");
    for emotion in seed_list(client.emotions().await, &mut emotions)? {
        let image = client.emotion_image_url(&emotion, 0)?;
        emotions.append(builder::emotion_button(&emotion, &image));
    }
    root.append(emotions);

    let mut brightness = builder::radio_group(
        ids::BRIGHTNESS_CONTAINER,
        "Brightness",
        ids::BRIGHTNESS_GROUP,
        Vec::new(),
    );
    for level in seed_list(client.brightness_levels().await, &mut brightness)? {
        builder::append_radio(
            &mut brightness,
            ids::BRIGHTNESS_GROUP,
            RadioOption {
                id: ids::brightness_option(level.as_str()),
                value: level.to_string(),
                label: level.to_string(),
                action: Action::SetBrightness(level),
            },
        );
    }
    root.append(brightness);

    root.append(builder::radio_group(
        ids::SCREEN_BLANK,
        "Screen",
        ids::SCREEN_BLANK,
        [(true, "Blank"), (false, "Visible")]
            .into_iter()
            .map(|(blank, label)| RadioOption {
                id: ids::blank_option(blank),
                value: blank.to_string(),
                label: label.to_string(),
                action: Action::SetBlank(blank),
            })
            .collect(),
    ));

    root.append(builder::range_input(
        ids::AUDIO_LEVEL,
        "Audio loudness",
        0,
        100,
        0,
        Action::SetAudioLoudness(0),
    ));

    // Colours are write-only on the backend; the presets are plain buttons
    root.append(color_presets(
        ids::MOUTH_COLOR_CONTAINER,
        "Mouth colour",
        ids::mouth_color,
        |color| Action::SetMouthColor(color.to_string()),
    ));
    root.append(color_presets(
        ids::EYE_COLOR_CONTAINER,
        "Eye colour",
        ids::eye_color,
        |color| Action::SetEyeColor(color.to_string()),
    ));

    Ok(PanelView {
        root,
        fields: vec![emotion_field(), brightness_field(), blank_field()],
    })
}

/// Colour choices offered for the mouth and the eyes: (name, CSS colour)
pub const COLOR_PRESETS: [(&str, &str); 5] = [
    ("green", "#00ff00"),
    ("cyan", "#00ffff"),
    ("blue", "#0000ff"),
    ("magenta", "#ff00ff"),
    ("white", "#ffffff"),
];

fn color_presets(
    container_id: &str,
    legend: &str,
    id_for: fn(&str) -> String,
    action_for: fn(&str) -> Action,
) -> Element {
    let mut fieldset = Element::new(Tag::Fieldset)
        .with_id(container_id)
        .with_child(Element::new(Tag::Legend).with_text(legend));
    for (name, color) in COLOR_PRESETS {
        fieldset.append(builder::color_button(
            id_for(name),
            name,
            color,
            action_for(color),
        ));
    }
    fieldset
}

/// Moves the `current-emotion` marker to the reported emotion's button
pub fn emotion_field() -> TrackedField {
    TrackedField::new(
        ids::EMOTION_CONTAINER,
        Endpoint::Emotion,
        Decoder::Text,
        |doc, value| {
            let current = value.as_text().unwrap_or_default();
            doc.set_exclusive_class(
                ids::EMOTION_CONTAINER,
                CURRENT_EMOTION,
                &ids::emotion_button(current),
            );
        },
    )
}

pub fn brightness_field() -> TrackedField {
    TrackedField::new(
        ids::BRIGHTNESS_CONTAINER,
        Endpoint::Brightness,
        Decoder::Text,
        |doc, value| {
            doc.check_radio(ids::BRIGHTNESS_CONTAINER, value.as_text().unwrap_or_default());
        },
    )
}

pub fn blank_field() -> TrackedField {
    TrackedField::new(ids::SCREEN_BLANK, Endpoint::Blank, Decoder::Flag, |doc, value| {
        let blank = value.as_flag().unwrap_or(false);
        doc.check_radio(ids::SCREEN_BLANK, if blank { "true" } else { "false" });
    })
}
