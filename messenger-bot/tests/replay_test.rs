//! End-to-end: webhook body file -> intake -> dispatcher -> SQLite + mock Send API.

use std::sync::Arc;

use dispatcher::HandlerRegistry;
use messenger_bot::{
    build_with_send_api, default_registry, replay_file, show_session, BotConfig, EchoHandler,
    StaticReplyHandler, DEFAULT_HANDLER,
};
use mockito::Matcher;
use serde_json::json;
use tempfile::TempDir;

fn config_for(dir: &TempDir, api_url: String) -> BotConfig {
    BotConfig {
        page_access_token: Some("test_token".to_string()),
        api_url,
        database_url: format!("file:{}", dir.path().join("bot.db").display()),
        log_file: dir.path().join("bot.log").display().to_string(),
        webhook_object: "page".to_string(),
        audit_enabled: true,
    }
}

fn write_body(dir: &TempDir, body: serde_json::Value) -> std::path::PathBuf {
    let path = dir.path().join("body.json");
    std::fs::write(&path, serde_json::to_vec(&body).unwrap()).unwrap();
    path
}

fn menu_registry() -> HandlerRegistry {
    HandlerRegistry::new()
        .with_message_handler(DEFAULT_HANDLER, Arc::new(EchoHandler::new()), true)
        .unwrap()
        .with_message_handler(
            "ASK",
            Arc::new(StaticReplyHandler::new("Thanks!")),
            false,
        )
        .unwrap()
        .with_postback_handler(
            "ASK_PAYLOAD",
            Arc::new(StaticReplyHandler::new("What is your question?").then("ASK")),
        )
        .unwrap()
}

/// **Test: A replayed text message is echoed through the Send API.**
///
/// **Setup:** Mock Send API expecting the echo reply; temp SQLite database.
/// **Action:** Replay a batch with one text message from u1.
/// **Expected:** One dispatched event; mock hit once; session row exists with no override.
#[tokio::test]
async fn test_replay_echoes_message() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/me/messages")
        .match_query(Matcher::UrlEncoded("access_token".into(), "test_token".into()))
        .match_body(Matcher::Json(json!({
            "recipient": {"id": "u1"},
            "message": {"text": "Echo: hi"}
        })))
        .with_status(200)
        .with_body(r#"{"recipient_id":"u1","message_id":"mid.1"}"#)
        .expect(1)
        .create_async()
        .await;

    let config = config_for(&dir, server.url());
    let path = write_body(
        &dir,
        json!({
            "object": "page",
            "entry": [{"messaging": [
                {"sender": {"id": "u1"}, "message": {"mid": "m1", "text": "hi"}}
            ]}]
        }),
    );

    let report = replay_file(&config, default_registry().unwrap(), &path)
        .await
        .unwrap();

    assert_eq!(report.dispatched(), 1);
    assert_eq!(report.failed(), 0);
    mock.assert_async().await;

    let session = show_session(&config, "u1").await.unwrap().unwrap();
    assert_eq!(session.next_handler, None);
}

/// **Test: Postback then text walks the menu dialog and persists state between batches.**
///
/// **Setup:** Menu registry (echo default, ASK message handler, ASK_PAYLOAD postback).
/// **Action:** Replay a postback batch, check session, then replay a text batch.
/// **Expected:** Session is "ASK" after the postback and cleared after the answer; two audit entries.
#[tokio::test]
async fn test_replay_postback_dialog_across_batches() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    let question = server
        .mock("POST", "/me/messages")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({"message": {"text": "What is your question?"}})))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let thanks = server
        .mock("POST", "/me/messages")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({"message": {"text": "Thanks!"}})))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let config = config_for(&dir, server.url());

    let path = write_body(
        &dir,
        json!({
            "object": "page",
            "entry": [{"messaging": [
                {"sender": {"id": "u2"}, "postback": {"payload": "ASK_PAYLOAD", "title": "Ask"}}
            ]}]
        }),
    );
    let report = replay_file(&config, menu_registry(), &path).await.unwrap();
    assert_eq!(report.dispatched(), 1);

    let session = show_session(&config, "u2").await.unwrap().unwrap();
    assert_eq!(session.next_handler.as_deref(), Some("ASK"));

    let path = write_body(
        &dir,
        json!({
            "object": "page",
            "entry": [{"messaging": [
                {"sender": {"id": "u2"}, "message": {"mid": "m2", "text": "why?"}}
            ]}]
        }),
    );
    let report = replay_file(&config, menu_registry(), &path).await.unwrap();
    assert_eq!(report.dispatched(), 1);

    question.assert_async().await;
    thanks.assert_async().await;

    let session = show_session(&config, "u2").await.unwrap().unwrap();
    assert_eq!(session.next_handler, None);

    let components = build_with_send_api(&config, menu_registry()).await.unwrap();
    let audit = components.audit.expect("audit enabled");
    assert_eq!(audit.count().await.unwrap(), 2);
    let entries = audit.get_by_user("u2", 10).await.unwrap();
    assert_eq!(entries.len(), 2);
}

/// **Test: A Send API failure fails only that event and is still audited.**
#[tokio::test]
async fn test_replay_delivery_failure_isolated() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    let _rejected = server
        .mock("POST", "/me/messages")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({"recipient": {"id": "blocked"}})))
        .with_status(400)
        .with_body(r#"{"error":{"message":"(#551) This person isn't available right now.","code":551}}"#)
        .create_async()
        .await;
    let _accepted = server
        .mock("POST", "/me/messages")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({"recipient": {"id": "u3"}})))
        .with_status(200)
        .create_async()
        .await;

    let config = config_for(&dir, server.url());
    let path = write_body(
        &dir,
        json!({
            "object": "page",
            "entry": [{"messaging": [
                {"sender": {"id": "blocked"}, "message": {"mid": "m1", "text": "a"}},
                {"sender": {"id": "u3"}, "message": {"mid": "m2", "text": "b"}}
            ]}]
        }),
    );

    let report = replay_file(&config, default_registry().unwrap(), &path)
        .await
        .unwrap();

    assert_eq!(report.dispatched(), 1);
    assert_eq!(report.failed(), 1);
    assert!(report.results[0].is_err());
    assert!(report.results[1].is_ok());

    let components = build_with_send_api(&config, default_registry().unwrap())
        .await
        .unwrap();
    let audit = components.audit.expect("audit enabled");
    assert_eq!(audit.count().await.unwrap(), 2);
}

/// **Test: Replay needs a page access token and a readable file.**
#[tokio::test]
async fn test_replay_errors() {
    let dir = TempDir::new().unwrap();
    let mut config = config_for(&dir, "http://127.0.0.1:9".to_string());

    let missing = dir.path().join("missing.json");
    assert!(replay_file(&config, default_registry().unwrap(), &missing)
        .await
        .is_err());

    config.page_access_token = None;
    let path = write_body(&dir, json!({"object": "page", "entry": []}));
    assert!(replay_file(&config, default_registry().unwrap(), &path)
        .await
        .is_err());
}

/// **Test: With audit disabled no audit repository is built.**
#[tokio::test]
async fn test_audit_disabled() {
    let dir = TempDir::new().unwrap();
    let mut config = config_for(&dir, "http://127.0.0.1:9".to_string());
    config.audit_enabled = false;

    let components = build_with_send_api(&config, default_registry().unwrap())
        .await
        .unwrap();

    assert!(components.audit.is_none());
    assert_eq!(components.sessions.count().await.unwrap(), 0);
}
