// tests/end_to_end_tests.rs
//
// Dashboard core against the real development backend over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::json;

use macrofeed_common::models::MacroId;
use macrofeed_core::test_utils::recording_notifier;
use macrofeed_core::view::FeedView;
use macrofeed_core::{ClearOutcome, LoadOutcome, RefreshController, RestFeedApi};
use macrofeed_server::{ServerConfig, start_server};

async fn post_webhook(addr: SocketAddr, payload: serde_json::Value) {
    let resp = reqwest::Client::new()
        .post(format!("http://{}/webhook/macro", addr))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
}

#[tokio::test]
async fn test_dashboard_against_live_server() {
    let config = ServerConfig {
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        macros: vec!["build".into(), "deploy".into()],
        ..Default::default()
    };
    let (addr, shutdown) = start_server(config).await.unwrap();

    post_webhook(addr, json!({"macro": "build", "content": "first run", "author": {"name": "CI"}})).await;

    let api = Arc::new(RestFeedApi::new(&format!("http://{}/api", addr)).unwrap());
    let (notifier, sink) = recording_notifier();
    let controller = RefreshController::new(api, notifier);

    controller.load_macros().await.unwrap();
    assert_eq!(controller.selected().await, Some(MacroId::from("build")));
    let updates = controller.updates().await;
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].author, "CI");

    post_webhook(
        addr,
        json!({
            "macro": "build",
            "embeds": [{"title": "Run <2>", "color": 3447003,
                        "fields": [{"name": "Took", "value": "4s", "inline": true}]}]
        }),
    )
    .await;
    assert_eq!(controller.manual_refresh().await, LoadOutcome::Applied(2));

    let updates = controller.updates().await;
    assert_eq!(updates[0].author, "Macro Bot");
    assert_eq!(updates[0].first_embed().unwrap().title.as_deref(), Some("Run <2>"));
    match controller.view().await.feed {
        FeedView::Cards(cards) => {
            assert!(cards[0].is_embed());
            assert!(cards[0].to_html().contains("Run &lt;2&gt;"));
        }
        other => panic!("expected cards, got {:?}", other),
    }

    let id = updates[0].id.unwrap();
    let fetched = controller.fetch_update(id).await.unwrap();
    assert_eq!(fetched.id, Some(id));

    assert_eq!(controller.select_macro(MacroId::from("deploy")).await, LoadOutcome::Applied(0));
    assert_eq!(controller.view().await.feed, FeedView::Empty);

    controller.select_macro(MacroId::from("build")).await;
    assert!(controller.check_health().await);
    assert_eq!(controller.clear().await, ClearOutcome::Cleared);
    assert_eq!(controller.manual_refresh().await, LoadOutcome::Applied(0));
    assert_eq!(sink.messages(), vec!["Server is healthy".to_string(), "All updates cleared".to_string()]);

    let _ = shutdown.send(());
}
