//! App launcher: one card per app plus one tracked `active` flag per app.

use super::{seed_list, PanelKind, PanelView};
use crate::action::Action;
use crate::sync::{Decoder, FieldValue, ToggleState, TrackedField};
use crate::view::{builder, ids, Element, Tag, UNAVAILABLE};
use protogen_core::{AppDetails, AppField, Endpoint, PanelResult, ProtogenClient, ResourceId};

pub(crate) async fn build(client: &ProtogenClient) -> PanelResult<PanelView> {
    let kind = PanelKind::Apps;
    let mut root = builder::panel_section(kind.as_str(), kind.title());
    let mut list = Element::new(Tag::Div)
        .with_id(ids::APP_LIST)
        .with_class("card-deck");

    let apps = seed_list(client.list_apps().await, &mut list)?;
    let mut fields = Vec::with_capacity(apps.len());

    // Cards are built one at a time: each card waits for all of its own
    // fields before it is rendered.
    for app in &apps {
        let details = client.app_details(app).await?;
        list.append(card(client, &details));
        fields.push(active_field(app));
    }

    tracing::debug!(apps = apps.len(), "app list seeded");
    root.append(list);
    Ok(PanelView { root, fields })
}

pub fn card(client: &ProtogenClient, details: &AppDetails) -> Element {
    let thumbnail = resolve(client, &details.thumbnail);
    let mut card = builder::build_card(
        &details.id,
        &details.name,
        &details.description,
        &thumbnail,
        Action::LaunchApp(details.id.clone()),
    );
    if !details.homepage.is_empty() {
        card.set_attr("data-homepage", &resolve(client, &details.homepage));
    }
    if details.incomplete {
        card.add_class(UNAVAILABLE);
    }
    card
}

fn resolve(client: &ProtogenClient, path: &str) -> String {
    client
        .resolve_path(path)
        .unwrap_or_else(|_| path.to_string())
}

/// Tracks whether `app` is running; a 404 means no app runs at all
pub fn active_field(app: &ResourceId) -> TrackedField {
    let button_id = ids::launch_button(app);
    TrackedField::new(
        button_id.clone(),
        Endpoint::App(app.clone(), AppField::Active),
        Decoder::Flag,
        move |doc, value| {
            let state = ToggleState::observe(value.as_flag().unwrap_or(false));
            if let Some(button) = doc.find_mut(&button_id) {
                state.apply(button);
            }
        },
    )
    .when_absent(FieldValue::Flag(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::builder::{BTN_PRIMARY, BTN_SUCCESS};
    use crate::view::Document;

    fn details(id: &str, incomplete: bool) -> AppDetails {
        AppDetails {
            id: id.into(),
            name: id.to_uppercase(),
            description: String::new(),
            thumbnail: "/apps/x/thumb.png".to_string(),
            homepage: "/apps/x/".to_string(),
            incomplete,
        }
    }

    fn client() -> ProtogenClient {
        ProtogenClient::with_base_url(
            "http://protogen.local:8080",
            std::time::Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn test_card_resolves_paths_against_base_url() {
        let card = card(&client(), &details("snake", false));
        assert_eq!(
            card.attr("data-homepage"),
            Some("http://protogen.local:8080/apps/x/")
        );
        let img = card.child_elements().next().unwrap();
        assert_eq!(img.attr("src"), Some("http://protogen.local:8080/apps/x/thumb.png"));
        assert!(!card.has_class(UNAVAILABLE));
    }

    #[test]
    fn test_incomplete_card_is_unavailable() {
        let card = card(&client(), &details("pong", true));
        assert!(card.has_class(UNAVAILABLE));
        assert!(card.find("launch-app-button-pong").is_some());
    }

    #[test]
    fn test_active_field_patches_only_its_button() {
        let list = Element::new(Tag::Div)
            .with_child(card(&client(), &details("snake", false)))
            .with_child(card(&client(), &details("pong", false)));
        let mut doc = Document::new(list);

        let field = active_field(&"snake".into());
        assert_eq!(field.key(), "/protogen/apps/snake/active");
        assert_eq!(field.anchor(), "launch-app-button-snake");

        field.apply(&mut doc, &FieldValue::Flag(true));
        let snake = doc.find("launch-app-button-snake").unwrap();
        assert_eq!(snake.text_content(), "Active");
        assert!(snake.has_class(BTN_SUCCESS));
        let pong = doc.find("launch-app-button-pong").unwrap();
        assert_eq!(pong.text_content(), "Launch");
        assert!(pong.has_class(BTN_PRIMARY));

        field.apply(&mut doc, &FieldValue::Flag(false));
        let snake = doc.find("launch-app-button-snake").unwrap();
        assert_eq!(snake.text_content(), "Launch");
        assert!(!snake.has_class(BTN_SUCCESS));
    }
}
