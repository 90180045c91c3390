use httpmock::prelude::*;
use serde_json::json;

use promptdeck::client::DashClient;
use promptdeck::error::PromptDeckError;
use promptdeck::message::Role;
use promptdeck::panel::ChatPanel;

#[tokio::test]
async fn successful_submit_appends_the_user_assistant_pair() {
    let server = MockServer::start_async().await;
    let daemon = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/sqlconversation")
                .header("authorization", "Bearer secret")
                .json_body(json!({
                    "messages": [{"role": "user", "content": "list all tables"}]
                }));
            then.status(200)
                .header("content-type", "application/json")
                .body("{\"result\": \"users, orders\"}");
        })
        .await;

    let client = DashClient::new(&server.base_url(), "secret").unwrap();
    let mut panel = ChatPanel::new();

    client
        .submit(&mut panel, "sqlconversation", "list all tables")
        .await
        .unwrap();

    daemon.assert_calls(1);
    assert!(!panel.pending());
    let messages = panel.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "list all tables");
    assert_eq!(messages[1].role, Role::Assistant);
    // Structured replies render as compact JSON text.
    assert_eq!(messages[1].content, "{\"result\":\"users, orders\"}");
}

#[tokio::test]
async fn string_replies_render_their_inner_value() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/sqlconversation");
            then.status(200)
                .header("content-type", "application/json")
                .body("\"users, orders\"");
        })
        .await;

    let client = DashClient::new(&server.base_url(), "secret").unwrap();
    let mut panel = ChatPanel::new();
    client
        .submit(&mut panel, "sqlconversation", "list all tables")
        .await
        .unwrap();

    assert_eq!(panel.messages()[1].content, "users, orders");
}

#[tokio::test]
async fn failed_submit_surfaces_the_error_and_leaves_the_panel_unchanged() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/sqlconversation");
            then.status(500).body("Internal error");
        })
        .await;

    let client = DashClient::new(&server.base_url(), "secret").unwrap();
    let mut panel = ChatPanel::new();
    let err = client
        .submit(&mut panel, "sqlconversation", "list all tables")
        .await
        .unwrap_err();

    assert!(matches!(err, PromptDeckError::Upstream(_)));
    assert!(err.to_string().contains("500"));
    assert!(panel.is_empty());
    assert!(!panel.pending());
}

#[tokio::test]
async fn second_submit_carries_the_full_prior_history() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/sqlconversation")
                .json_body(json!({
                    "messages": [{"role": "user", "content": "first"}]
                }));
            then.status(200).body("\"one\"");
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/sqlconversation")
                .json_body(json!({
                    "messages": [
                        {"role": "user", "content": "first"},
                        {"role": "assistant", "content": "one"},
                        {"role": "user", "content": "second"}
                    ]
                }));
            then.status(200).body("\"two\"");
        })
        .await;

    let client = DashClient::new(&server.base_url(), "secret").unwrap();
    let mut panel = ChatPanel::new();

    client
        .submit(&mut panel, "sqlconversation", "first")
        .await
        .unwrap();
    client
        .submit(&mut panel, "sqlconversation", "second")
        .await
        .unwrap();

    second.assert_calls(1);
    assert_eq!(panel.len(), 4);
    assert_eq!(panel.messages()[3].content, "two");
}

#[tokio::test]
async fn health_reflects_daemon_reachability() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/health");
            then.status(200).body("{\"status\":\"ok\"}");
        })
        .await;

    let client = DashClient::new(&server.base_url(), "").unwrap();
    assert!(client.health().await);

    let dead = DashClient::new("http://127.0.0.1:9", "").unwrap();
    assert!(!dead.health().await);
}
