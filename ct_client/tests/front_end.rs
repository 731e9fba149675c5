//! Front end behaviour against a live tracker actor.

use card_tracker::{
    history::InMemoryHandLog,
    registry::TagDatabase,
    table::{PresentationMode, Region, TrackerActor, TrackerHandle},
};
use ct_client::{
    controller::{Controller, Reply},
    headless::{self, OutputFormat},
};
use std::sync::Arc;
use tokio::sync::mpsc;

const REGISTRY: &str = r#"{"A1":"As","A2":"Kh","B1":"Qd","B2":"Jc","C1":"Ts"}"#;

fn tracker() -> (TrackerHandle, Arc<InMemoryHandLog>) {
    let registry = TagDatabase::from_json_str(REGISTRY).unwrap();
    let log = Arc::new(InMemoryHandLog::new());
    let handle = TrackerActor::spawn(Arc::new(registry), log.clone(), 32);
    (handle, log)
}

#[tokio::test]
async fn test_commit_records_and_advances() {
    let (handle, log) = tracker();
    let mut controller = Controller::new(handle.clone());

    assert_eq!(controller.handle_input("tag A1").await, Reply::Silent);
    assert_eq!(controller.handle_input("tag A2").await, Reply::Silent);

    let reply = controller.handle_input("save").await;
    assert!(matches!(&reply, Reply::Ack(msg) if msg.contains("Hand 1")));

    let records = log.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].layout.region_codes(Region::P1), "As Kh");

    let snapshot = handle.get_snapshot().await.unwrap();
    assert_eq!(snapshot.hand_number, 2);
    assert!(snapshot.layout.is_empty());
}

#[tokio::test]
async fn test_duplicate_keyboard_tag_is_reported() {
    let (handle, _log) = tracker();
    let mut controller = Controller::new(handle);

    controller.handle_input("tag A1").await;
    let reply = controller.handle_input("tag A1").await;
    assert!(matches!(reply, Reply::Alert(msg) if msg.contains("already")));
}

#[tokio::test]
async fn test_new_game_needs_confirmation() {
    let (handle, _log) = tracker();
    let mut controller = Controller::new(handle.clone());

    controller.handle_input("commit").await;
    assert_eq!(handle.get_snapshot().await.unwrap().hand_number, 2);

    let prompt = controller.handle_input("new-game").await;
    assert!(matches!(prompt, Reply::Alert(_)));
    assert!(controller.is_awaiting_confirmation());

    let cancelled = controller.handle_input("n").await;
    assert_eq!(cancelled, Reply::Ack("New game cancelled".to_string()));
    assert_eq!(handle.get_snapshot().await.unwrap().hand_number, 2);

    controller.handle_input("new-game").await;
    let confirmed = controller.handle_input("y").await;
    assert!(matches!(confirmed, Reply::Ack(_)));
    assert!(!controller.is_awaiting_confirmation());
    assert_eq!(handle.get_snapshot().await.unwrap().hand_number, 1);
}

#[tokio::test]
async fn test_mode_toggle_and_set() {
    let (handle, _log) = tracker();
    let mut controller = Controller::new(handle.clone());

    controller.handle_input("mode").await;
    assert_eq!(
        handle.get_snapshot().await.unwrap().mode,
        PresentationMode::Player
    );

    controller.handle_input("mode manager").await;
    assert_eq!(
        handle.get_snapshot().await.unwrap().mode,
        PresentationMode::Manager
    );
}

#[tokio::test]
async fn test_clear_keeps_hand_number() {
    let (handle, log) = tracker();
    let mut controller = Controller::new(handle.clone());

    controller.handle_input("tag A1").await;
    assert_eq!(
        controller.handle_input("clear").await,
        Reply::Ack("Table cleared".to_string())
    );

    let snapshot = handle.get_snapshot().await.unwrap();
    assert_eq!(snapshot.hand_number, 1);
    assert!(snapshot.layout.is_empty());
    assert!(log.records().await.is_empty());
}

#[tokio::test]
async fn test_unknown_command_is_an_error() {
    let (handle, _log) = tracker();
    let mut controller = Controller::new(handle);

    let reply = controller.handle_input("raise 100").await;
    assert!(matches!(reply, Reply::Error(msg) if msg.contains("Unrecognized")));
}

#[tokio::test]
async fn test_headless_session() {
    let (handle, log) = tracker();
    let notifications = handle.subscribe(64).await.unwrap();
    let (_events_tx, events_rx) = mpsc::unbounded_channel();

    let input: &[u8] = b"tag A1\ntag A2\nmode player\ncommit\nquit\ntag B1\n";
    let mut output = Vec::new();
    headless::run(
        Controller::new(handle.clone()),
        notifications,
        events_rx,
        input,
        &mut output,
        OutputFormat::Text,
    )
    .await
    .unwrap();

    let output = String::from_utf8(output).unwrap();
    assert!(output.starts_with("Manager Mode | HAND 1\n"));
    assert!(output.contains("P1: As ?\n"));
    assert!(output.contains("P1: As Kh\n"));
    assert!(output.contains("Player Mode | HAND 1\nP1: 〇 〇\n"));
    assert!(output.contains("Player Mode | HAND 2\nP1: ? ?\n"));

    // Input after quit is never read
    assert!(!handle.get_snapshot().await.unwrap().layout.region_codes(Region::P1).contains("Qd"));
    assert_eq!(log.records().await.len(), 1);
}

#[tokio::test]
async fn test_headless_json_output() {
    let (handle, _log) = tracker();
    let notifications = handle.subscribe(64).await.unwrap();
    let (_events_tx, events_rx) = mpsc::unbounded_channel();

    let input: &[u8] = b"tag C1\n";
    let mut output = Vec::new();
    headless::run(
        Controller::new(handle),
        notifications,
        events_rx,
        input,
        &mut output,
        OutputFormat::Json,
    )
    .await
    .unwrap();

    let output = String::from_utf8(output).unwrap();
    let snapshots: Vec<serde_json::Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0]["hand_number"], 1);
    assert_eq!(snapshots[1]["mode"], "manager");
}
