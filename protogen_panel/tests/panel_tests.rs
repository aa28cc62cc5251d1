// End-to-end panel tests against the in-process mock backend
// Covers seeding, actions, reconciliation, failure marking and polling order

use protogen_core::mock::MockBackend;
use protogen_core::{PanelError, ProtogenClient, ResourceId};
use protogen_panel::view::builder::{BTN_PRIMARY, BTN_SUCCESS, CURRENT_EMOTION};
use protogen_panel::view::{Document, UNAVAILABLE};
use protogen_panel::{PanelController, PanelKind, PanelOptions};
use std::time::Duration;

// ============================================================================
// Test Setup Helpers
// ============================================================================

async fn setup() -> (MockBackend, ProtogenClient) {
    let backend = MockBackend::start().await.unwrap();
    let client =
        ProtogenClient::with_base_url(&backend.url(), Duration::from_millis(1000)).unwrap();
    (backend, client)
}

fn seed_head(backend: &MockBackend) {
    backend.set("/protogen/head/emotion/all", "happy\nsad\n");
    backend.set("/protogen/head/emotion", "sad");
    backend.set("/protogen/head/brightness/all", "low\nmedium\nhigh\n");
    backend.set("/protogen/head/brightness", "medium");
    backend.set("/protogen/head/blank", "false");
}

fn seed_app(backend: &MockBackend, id: &str, name: &str) {
    backend.set(&format!("/protogen/apps/{}/name", id), name);
    backend.set(&format!("/protogen/apps/{}/description", id), "A game");
    backend.set(&format!("/protogen/apps/{}/thumbnail", id), "/thumb.png");
    backend.set(&format!("/protogen/apps/{}/homepage", id), "/index.html");
}

fn ids_under(doc: &Document, container: &str) -> Vec<String> {
    doc.find(container)
        .unwrap()
        .child_elements()
        .filter_map(|e| e.id().map(str::to_string))
        .collect()
}

// ============================================================================
// Head panel
// ============================================================================

#[tokio::test]
async fn test_emotion_buttons_set_and_reconcile() {
    let (backend, client) = setup().await;
    seed_head(&backend);

    let panel = PanelController::build(PanelKind::Head, client, &PanelOptions::default())
        .await
        .unwrap();

    let doc = panel.snapshot();
    assert_eq!(
        ids_under(&doc, "emotion-options-container"),
        vec!["happy-button", "sad-button"]
    );
    assert!(doc.find("sad-button").unwrap().has_class(CURRENT_EMOTION));

    panel.activate("happy-button").await.unwrap();

    let puts = backend.requests_to("PUT", "/protogen/head/emotion");
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].body, "happy");

    // Re-polled straight after the action, no tick needed
    let doc = panel.snapshot();
    assert!(doc.find("happy-button").unwrap().has_class(CURRENT_EMOTION));
    assert!(!doc.find("sad-button").unwrap().has_class(CURRENT_EMOTION));
}

#[tokio::test]
async fn test_radio_groups_follow_backend() {
    let (backend, client) = setup().await;
    seed_head(&backend);

    let panel = PanelController::build(PanelKind::Head, client, &PanelOptions::default())
        .await
        .unwrap();
    let doc = panel.snapshot();
    assert!(doc.find("brightness_option_medium").unwrap().is_checked());
    assert!(!doc.find("brightness_option_high").unwrap().is_checked());
    assert!(doc.find("screen-blank-false").unwrap().is_checked());

    panel.activate("screen-blank-true").await.unwrap();
    backend.set("/protogen/head/brightness", "high");
    panel.poll_all().await;

    let doc = panel.snapshot();
    assert!(doc.find("screen-blank-true").unwrap().is_checked());
    assert!(!doc.find("screen-blank-false").unwrap().is_checked());
    assert!(doc.find("brightness_option_high").unwrap().is_checked());
    assert!(!doc.find("brightness_option_medium").unwrap().is_checked());
}

#[tokio::test]
async fn test_setting_same_value_twice_is_idempotent() {
    let (backend, client) = setup().await;
    seed_head(&backend);
    let panel = PanelController::build(PanelKind::Head, client, &PanelOptions::default())
        .await
        .unwrap();

    panel.activate("brightness_option_low").await.unwrap();
    let once = panel.snapshot();
    panel.activate("brightness_option_low").await.unwrap();
    panel.poll_all().await;
    let twice = panel.snapshot();

    assert_eq!(once, twice);
    assert_eq!(backend.requests_to("PUT", "/protogen/head/brightness").len(), 2);
}

#[tokio::test]
async fn test_audio_slider_clamps() {
    let (backend, client) = setup().await;
    seed_head(&backend);
    let panel = PanelController::build(PanelKind::Head, client, &PanelOptions::default())
        .await
        .unwrap();

    assert_eq!(panel.adjust("audio-level", 30).await.unwrap(), 30);
    assert_eq!(panel.adjust("audio-level", 500).await.unwrap(), 100);
    assert_eq!(panel.adjust("audio-level", -1000).await.unwrap(), 0);

    let bodies: Vec<String> = backend
        .requests_to("PUT", "/protogen/head/audio-loudness")
        .into_iter()
        .map(|r| r.body)
        .collect();
    assert_eq!(bodies, vec!["30", "100", "0"]);
    assert_eq!(
        panel.snapshot().find("audio-level").unwrap().value(),
        Some("0")
    );
}

#[tokio::test]
async fn test_failed_field_marks_anchor_and_badge() {
    let (backend, client) = setup().await;
    seed_head(&backend);
    backend.fail("/protogen/head/emotion", 500);

    let panel = PanelController::build(PanelKind::Head, client, &PanelOptions::default())
        .await
        .unwrap();
    let doc = panel.snapshot();
    assert!(doc
        .find("emotion-options-container")
        .unwrap()
        .has_class(UNAVAILABLE));
    let badge = doc.find("head-status").unwrap();
    assert!(badge.has_class(UNAVAILABLE));
    assert!(badge.text_content().contains("emotion-options-container"));

    // The next successful poll clears both
    backend.recover("/protogen/head/emotion");
    panel.poll_all().await;
    let doc = panel.snapshot();
    assert!(!doc
        .find("emotion-options-container")
        .unwrap()
        .has_class(UNAVAILABLE));
    assert_eq!(doc.find("head-status").unwrap().text_content(), "");
}

#[tokio::test]
async fn test_audio_slider_survives_extreme_steps() {
    let (backend, client) = setup().await;
    seed_head(&backend);
    let panel = PanelController::build(PanelKind::Head, client, &PanelOptions::default())
        .await
        .unwrap();

    assert_eq!(panel.adjust("audio-level", 30).await.unwrap(), 30);
    assert_eq!(panel.adjust("audio-level", i16::MAX).await.unwrap(), 100);
    assert_eq!(panel.adjust("audio-level", i16::MIN).await.unwrap(), 0);
    assert_eq!(
        panel.snapshot().find("audio-level").unwrap().value(),
        Some("0")
    );
}

#[tokio::test]
async fn test_failed_seed_stays_unavailable_after_polls() {
    let (backend, client) = setup().await;
    seed_head(&backend);
    backend.set("/protogen/head/emotion", "happy");
    backend.fail("/protogen/head/emotion/all", 503);

    let panel = PanelController::build(PanelKind::Head, client, &PanelOptions::default())
        .await
        .unwrap();
    let doc = panel.snapshot();
    let container = doc.find("emotion-options-container").unwrap();
    assert!(container.has_class(UNAVAILABLE));
    assert_eq!(container.child_elements().count(), 0);
    assert!(doc
        .find("head-status")
        .unwrap()
        .text_content()
        .contains("emotion-options-container"));

    // The emotion field itself answers fine, yet the list is still empty
    panel.poll_all().await;
    let doc = panel.snapshot();
    assert!(doc
        .find("emotion-options-container")
        .unwrap()
        .has_class(UNAVAILABLE));
    assert!(doc
        .find("head-status")
        .unwrap()
        .text_content()
        .contains("emotion-options-container"));
}

#[tokio::test]
async fn test_colour_presets_put_their_colour() {
    let (backend, client) = setup().await;
    seed_head(&backend);
    let panel = PanelController::build(PanelKind::Head, client, &PanelOptions::default())
        .await
        .unwrap();

    panel.activate("mouth-color-cyan").await.unwrap();
    panel.activate("eye-color-green").await.unwrap();

    let mouth = backend.requests_to("PUT", "/protogen/head/mouth/color");
    assert_eq!(mouth.len(), 1);
    assert_eq!(mouth[0].body, "#00ffff");
    let eye = backend.requests_to("PUT", "/protogen/head/eye/color");
    assert_eq!(eye.len(), 1);
    assert_eq!(eye[0].body, "#00ff00");
}

#[tokio::test]
async fn test_emotion_named_like_a_control_keeps_both() {
    let (backend, client) = setup().await;
    seed_head(&backend);
    backend.set("/protogen/head/emotion/all", "head-mode\nhappy\n");
    backend.set("/protogen/head/emotion", "happy");

    let panel = PanelController::build(PanelKind::Head, client, &PanelOptions::default())
        .await
        .unwrap();
    assert_eq!(
        ids_under(&panel.snapshot(), "emotion-options-container"),
        vec!["head.2dmode-button", "happy-button"]
    );

    backend.clear_requests();
    panel.activate("head-mode-button").await.unwrap();
    let mode = backend.requests_to("PUT", "/protogen/mode");
    assert_eq!(mode.len(), 1);
    assert_eq!(mode[0].body, "protogen_head");
    assert!(backend
        .requests_to("PUT", "/protogen/head/emotion")
        .is_empty());

    panel.activate("head.2dmode-button").await.unwrap();
    assert_eq!(
        backend.requests_to("PUT", "/protogen/head/emotion")[0].body,
        "head-mode"
    );
}

#[tokio::test]
async fn test_action_errors_are_returned() {
    let (backend, client) = setup().await;
    seed_head(&backend);
    let panel = PanelController::build(PanelKind::Head, client, &PanelOptions::default())
        .await
        .unwrap();

    backend.fail("/protogen/head/emotion", 500);
    let err = panel.activate("happy-button").await.unwrap_err();
    assert!(matches!(err, PanelError::Backend { status: 500, .. }));

    let err = panel.activate("no-such-button").await.unwrap_err();
    assert!(matches!(err, PanelError::ElementNotFound(_)));
}

// ============================================================================
// Apps panel
// ============================================================================

#[tokio::test]
async fn test_active_app_shows_active_button() {
    let (backend, client) = setup().await;
    backend.set("/protogen/apps", "snake\npong\nsnake\n");
    seed_app(&backend, "snake", "Snake");
    seed_app(&backend, "pong", "Pong");
    backend.set("/protogen/apps/snake/active", "true");
    backend.set("/protogen/apps/pong/active", "false");

    let panel = PanelController::build(PanelKind::Apps, client, &PanelOptions::default())
        .await
        .unwrap();
    let doc = panel.snapshot();

    // Duplicate ids render once; apps are sorted
    assert_eq!(ids_under(&doc, "app-list"), vec!["app-card-pong", "app-card-snake"]);

    let snake = doc.find("launch-app-button-snake").unwrap();
    assert_eq!(snake.text_content(), "Active");
    assert!(snake.has_class(BTN_SUCCESS));
    assert!(!snake.has_class(BTN_PRIMARY));

    let pong = doc.find("launch-app-button-pong").unwrap();
    assert_eq!(pong.text_content(), "Launch");
    assert!(pong.has_class(BTN_PRIMARY));
}

#[tokio::test]
async fn test_no_running_app_reads_as_inactive() {
    let (backend, client) = setup().await;
    backend.set("/protogen/apps", "snake\n");
    seed_app(&backend, "snake", "Snake");

    let panel = PanelController::build(PanelKind::Apps, client, &PanelOptions::default())
        .await
        .unwrap();
    let doc = panel.snapshot();
    let button = doc.find("launch-app-button-snake").unwrap();
    assert_eq!(button.text_content(), "Launch");
    assert!(!button.has_class(UNAVAILABLE));
}

#[tokio::test]
async fn test_card_with_missing_fields_still_renders() {
    let (backend, client) = setup().await;
    backend.set("/protogen/apps", "mystery\n");
    backend.fail("/protogen/apps/mystery/name", 500);

    let panel = PanelController::build(PanelKind::Apps, client, &PanelOptions::default())
        .await
        .unwrap();
    let doc = panel.snapshot();
    let card = doc.find("app-card-mystery").unwrap();
    assert!(card.has_class(UNAVAILABLE));
    assert!(card.text_content().contains("mystery"));
    assert!(doc.to_html().contains("/static/images/no_thumbnail.png"));
}

#[tokio::test]
async fn test_empty_app_list_renders_no_cards() {
    let (backend, client) = setup().await;
    backend.set("/protogen/apps", "");

    let panel = PanelController::build(PanelKind::Apps, client, &PanelOptions::default())
        .await
        .unwrap();
    let doc = panel.snapshot();
    assert!(ids_under(&doc, "app-list").is_empty());
    assert!(doc.unavailable().is_empty());
    assert!(panel.field_keys().is_empty());
}

#[tokio::test]
async fn test_unreachable_list_renders_unavailable() {
    let (_backend, client) = setup().await;
    // Nothing seeded: GET /protogen/apps answers 404

    let panel = PanelController::build(PanelKind::Apps, client, &PanelOptions::default())
        .await
        .unwrap();
    let doc = panel.snapshot();
    assert!(doc.find("app-list").unwrap().has_class(UNAVAILABLE));
    assert_eq!(
        doc.find("apps-status").unwrap().text_content(),
        "unavailable: app-list"
    );
}

// ============================================================================
// Minecraft panel
// ============================================================================

#[tokio::test]
async fn test_empty_player_list() {
    let (backend, client) = setup().await;
    backend.set("/protogen/minecraft/players", "");
    backend.set("/protogen/minecraft/blocks", "");

    let panel = PanelController::build(PanelKind::Minecraft, client, &PanelOptions::default())
        .await
        .unwrap();
    let doc = panel.snapshot();
    assert!(ids_under(&doc, "minecraft-players").is_empty());
    assert!(doc.unavailable().is_empty());
    assert!(doc.find("join-button").is_none());
}

#[tokio::test]
async fn test_join_and_leave_update_player_list() {
    let (backend, client) = setup().await;
    backend.set("/protogen/minecraft/players", "");
    backend.set("/protogen/minecraft/blocks", "stone\ngrass\n");
    backend.set("/protogen/minecraft/blocks/stone/color", "#888888");
    backend.set("/protogen/minecraft/blocks/grass/color", "#00ff00");

    let options = PanelOptions {
        player: Some(ResourceId::from("steve")),
        seed: None,
    };
    let panel = PanelController::build(PanelKind::Minecraft, client, &options)
        .await
        .unwrap();

    // The mock keeps player entries as separate paths; mirror the list
    backend.set("/protogen/minecraft/players", "steve\n");
    panel.activate("join-button").await.unwrap();
    assert_eq!(
        backend.requests_to("PUT", "/protogen/minecraft/players/steve").len(),
        1
    );
    assert_eq!(ids_under(&panel.snapshot(), "minecraft-players"), vec!["player-steve"]);

    panel.activate("player-steve-left").await.unwrap();
    assert_eq!(
        backend.requests_to("POST", "/protogen/minecraft/players/steve/move")[0].body,
        "left"
    );

    panel.activate("block-grass").await.unwrap();
    assert_eq!(
        backend.value("/protogen/minecraft/players/steve/block").as_deref(),
        Some("grass")
    );

    backend.set("/protogen/minecraft/players", "");
    panel.activate("player-steve-leave").await.unwrap();
    assert_eq!(
        backend.requests_to("DELETE", "/protogen/minecraft/players/steve").len(),
        1
    );
    assert!(ids_under(&panel.snapshot(), "minecraft-players").is_empty());
}

#[tokio::test]
async fn test_player_named_like_a_move_button() {
    let (backend, client) = setup().await;
    backend.set("/protogen/minecraft/players", "steve\nsteve-left\n");
    backend.set("/protogen/minecraft/blocks", "");

    let panel = PanelController::build(PanelKind::Minecraft, client, &PanelOptions::default())
        .await
        .unwrap();
    assert_eq!(
        ids_under(&panel.snapshot(), "minecraft-players"),
        vec!["player-steve", "player-steve.2dleft"]
    );

    panel.activate("player-steve-left").await.unwrap();
    let moves = backend.requests_to("POST", "/protogen/minecraft/players/steve/move");
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].body, "left");

    panel.activate("player-steve.2dleft-leave").await.unwrap();
    assert_eq!(
        backend
            .requests_to("DELETE", "/protogen/minecraft/players/steve-left")
            .len(),
        1
    );
}

#[tokio::test]
async fn test_palette_without_player_is_inert() {
    let (backend, client) = setup().await;
    backend.set("/protogen/minecraft/players", "");
    backend.set("/protogen/minecraft/blocks", "stone\n");
    backend.set("/protogen/minecraft/blocks/stone/color", "#888888");

    let panel = PanelController::build(PanelKind::Minecraft, client, &PanelOptions::default())
        .await
        .unwrap();
    let err = panel.activate("block-stone").await.unwrap_err();
    assert!(matches!(err, PanelError::InvalidInput(_)));
    assert_eq!(
        panel.snapshot().find("block-stone").unwrap().attr("data-color"),
        Some("#888888")
    );
}

// ============================================================================
// Polling
// ============================================================================

#[tokio::test]
async fn test_overlapping_polls_newer_wins() {
    let (backend, client) = setup().await;
    seed_head(&backend);
    let panel = PanelController::build(PanelKind::Head, client, &PanelOptions::default())
        .await
        .unwrap();

    // First poll sees "happy" but answers late; the second sees "sad"
    backend.set("/protogen/head/emotion", "happy");
    backend.delay_next("/protogen/head/emotion", Duration::from_millis(200));
    let slow = panel.poll_now("/protogen/head/emotion");
    let fast = async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        backend.set("/protogen/head/emotion", "sad");
        panel.poll_now("/protogen/head/emotion").await
    };
    let (_, _) = tokio::join!(slow, fast);

    let doc = panel.snapshot();
    assert!(doc.find("sad-button").unwrap().has_class(CURRENT_EMOTION));
    assert!(!doc.find("happy-button").unwrap().has_class(CURRENT_EMOTION));
}

#[tokio::test]
async fn test_open_panel_keeps_polling_until_shutdown() {
    let (backend, client) = setup().await;
    seed_head(&backend);

    let mut panel = PanelController::open(
        PanelKind::Head,
        client,
        &PanelOptions::default(),
        Duration::from_millis(30),
    )
    .await
    .unwrap();
    assert!(panel.is_running());

    // A change made elsewhere shows up on a later tick
    backend.set("/protogen/head/emotion", "happy");
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(panel
        .snapshot()
        .find("happy-button")
        .unwrap()
        .has_class(CURRENT_EMOTION));

    panel.shutdown();
    assert!(!panel.is_running());
    tokio::time::sleep(Duration::from_millis(20)).await;
    backend.clear_requests();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(backend.requests().is_empty());
}
