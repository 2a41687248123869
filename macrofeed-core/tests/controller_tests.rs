// tests/controller_tests.rs

use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;
use mockall::predicate::eq;

use macrofeed_common::models::{MacroId, UpdateRecord};
use macrofeed_common::traits::FeedApi;
use macrofeed_core::test_utils::{ScriptedApi, embed_update, plain_update, recording_notifier};
use macrofeed_core::view::{FeedView, SelectorView};
use macrofeed_core::{ClearOutcome, Error, LoadOutcome, RefreshController, Severity};

mock! {
    Api {}
    #[async_trait]
    impl FeedApi for Api {
        async fn list_macros(&self) -> Result<Vec<MacroId>, Error>;
        async fn list_updates(&self, macro_id: &MacroId) -> Result<Vec<UpdateRecord>, Error>;
        async fn clear_updates(&self, macro_id: &MacroId) -> Result<(), Error>;
        async fn get_update(&self, macro_id: &MacroId, update_id: i64) -> Result<UpdateRecord, Error>;
        async fn clear_all(&self) -> Result<(), Error>;
        async fn health(&self) -> Result<bool, Error>;
    }
}

fn server_error() -> Error {
    Error::Status {
        status: 500,
        url: "http://localhost:3000/api/updates/build".into(),
    }
}

/// Lets spawned tasks on the current-thread runtime make progress until `done` holds.
async fn settle<F: FnMut() -> bool>(mut done: F) {
    for _ in 0..100 {
        if done() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}

#[tokio::test]
async fn test_startup_selects_first_macro() {
    let mut api = MockApi::new();
    api.expect_list_macros()
        .times(1)
        .returning(|| Ok(vec![MacroId::from("build"), MacroId::from("deploy")]));
    api.expect_list_updates()
        .with(eq(MacroId::from("build")))
        .times(1)
        .returning(|_| Ok(vec![plain_update("Macro Bot", "done", "2024-05-29T16:26:40")]));

    let (notifier, sink) = recording_notifier();
    let controller = RefreshController::new(Arc::new(api), notifier);
    let macros = controller.load_macros().await.unwrap();

    assert_eq!(macros.len(), 2);
    let view = controller.view().await;
    assert_eq!(
        view.selector,
        SelectorView::Options {
            macros: vec![MacroId::from("build"), MacroId::from("deploy")],
            selected: Some(MacroId::from("build")),
        }
    );
    assert_eq!(view.feed.card_count(), 1);
    assert_eq!(view.status.count, 1);
    assert_eq!(view.status.last_update, "4:26:40 PM");
    assert!(sink.posted().is_empty());
}

#[tokio::test]
async fn test_empty_macro_list() {
    let mut api = MockApi::new();
    api.expect_list_macros().times(1).returning(|| Ok(vec![]));
    api.expect_list_updates().times(0);

    let (notifier, _sink) = recording_notifier();
    let controller = RefreshController::new(Arc::new(api), notifier);
    controller.load_macros().await.unwrap();

    let view = controller.view().await;
    assert_eq!(view.selector, SelectorView::NoMacros);
    assert_eq!(view.feed, FeedView::NoMacros);
    assert_eq!(controller.selected().await, None);
}

#[tokio::test]
async fn test_macro_list_failure() {
    let mut api = MockApi::new();
    api.expect_list_macros().times(1).returning(|| Err(server_error()));

    let (notifier, sink) = recording_notifier();
    let controller = RefreshController::new(Arc::new(api), notifier);
    assert!(controller.load_macros().await.is_err());

    let view = controller.view().await;
    assert_eq!(view.selector, SelectorView::Error);
    assert_eq!(view.feed, FeedView::MacroListError);
    assert_eq!(sink.count(Severity::Error), 1);
    assert!(sink.messages()[0].starts_with("Error loading macros: "));
}

#[tokio::test]
async fn test_failed_refresh_keeps_cards() {
    let mut api = MockApi::new();
    let mut seq = mockall::Sequence::new();
    api.expect_list_macros().returning(|| Ok(vec![MacroId::from("build")]));
    api.expect_list_updates()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| {
            Ok(vec![
                embed_update("Macro Bot", "Second", "2024-05-29T16:26:40"),
                plain_update("Macro Bot", "first", "2024-05-29T16:00:00"),
            ])
        });
    api.expect_list_updates()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(server_error()));

    let (notifier, sink) = recording_notifier();
    let controller = RefreshController::new(Arc::new(api), notifier);
    controller.load_macros().await.unwrap();

    let outcome = controller.manual_refresh().await;
    assert!(matches!(outcome, LoadOutcome::Failed(_)));

    let view = controller.view().await;
    assert_eq!(view.feed.card_count(), 2);
    assert!(!view.refresh_button.busy);
    assert_eq!(sink.count(Severity::Error), 1);
    assert!(sink.messages()[0].starts_with("Error loading updates: "));
}

#[tokio::test]
async fn test_failed_first_load_shows_connection_error() {
    let api = ScriptedApi::new().with_macros(&["build"]);
    api.push_failure("build", 502);

    let (notifier, sink) = recording_notifier();
    let controller = RefreshController::new(Arc::new(api), notifier);
    controller.load_macros().await.unwrap();

    let view = controller.view().await;
    assert_eq!(view.feed, FeedView::ConnectionError);
    assert_eq!(view.status.count, 0);
    assert_eq!(view.status.last_update, "Never");
    assert_eq!(sink.count(Severity::Error), 1);
}

#[tokio::test]
async fn test_successful_empty_load_shows_empty() {
    let (notifier, _sink) = recording_notifier();
    let controller = RefreshController::new(Arc::new(ScriptedApi::new().with_macros(&["build"])), notifier);
    controller.load_macros().await.unwrap();
    assert_eq!(controller.view().await.feed, FeedView::Empty);
}

#[tokio::test]
async fn test_slow_response_for_old_selection_is_discarded() {
    let api = Arc::new(ScriptedApi::new().with_macros(&["build", "deploy"]));
    let (notifier, sink) = recording_notifier();
    let controller = Arc::new(RefreshController::new(api.clone(), notifier));
    controller.load_macros().await.unwrap();

    let release_build = api.push_gated_updates(
        "build",
        vec![plain_update("Macro Bot", "late build", "2024-05-29T10:00:00")],
    );
    let in_flight = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.manual_refresh().await })
    };
    settle(|| api.update_calls().len() == 2).await;

    api.push_updates(
        "deploy",
        vec![
            plain_update("Macro Bot", "deploy 2", "2024-05-29T16:26:40"),
            plain_update("Macro Bot", "deploy 1", "2024-05-29T16:00:00"),
        ],
    );
    let outcome = controller.select_macro(MacroId::from("deploy")).await;
    assert_eq!(outcome, LoadOutcome::Applied(2));

    release_build.send(()).unwrap();
    assert_eq!(in_flight.await.unwrap(), LoadOutcome::Discarded);

    let updates = controller.updates().await;
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].content.as_deref(), Some("deploy 2"));
    assert_eq!(controller.view().await.feed.card_count(), 2);
    assert_eq!(controller.selected().await, Some(MacroId::from("deploy")));
    assert!(sink.posted().is_empty());
}

#[tokio::test]
async fn test_refresh_button_busy_while_loading() {
    let api = Arc::new(ScriptedApi::new().with_macros(&["build"]));
    let (notifier, _sink) = recording_notifier();
    let controller = Arc::new(RefreshController::new(api.clone(), notifier));
    controller.load_macros().await.unwrap();

    let release = api.push_gated_updates("build", vec![plain_update("Macro Bot", "x", "2024-05-29T10:00:00")]);
    let mut views = controller.subscribe();
    let in_flight = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.manual_refresh().await })
    };
    settle(|| views.borrow_and_update().refresh_button.busy).await;
    assert_eq!(controller.view().await.refresh_button.label(), "Refreshing...");

    release.send(()).unwrap();
    assert_eq!(in_flight.await.unwrap(), LoadOutcome::Applied(1));
    let view = controller.view().await;
    assert!(!view.refresh_button.busy);
    assert_eq!(view.refresh_button.label(), "Refresh");
}

#[tokio::test]
async fn test_tick_respects_auto_refresh_and_selection() {
    let api = Arc::new(ScriptedApi::new());
    let (notifier, _sink) = recording_notifier();
    let controller = RefreshController::new(api.clone(), notifier);

    // nothing selected yet
    assert_eq!(controller.tick().await, LoadOutcome::Skipped);

    controller.select_macro(MacroId::from("build")).await;
    assert_eq!(api.update_calls().len(), 1);
    assert_eq!(controller.tick().await, LoadOutcome::Applied(0));

    controller.set_auto_refresh(false).await;
    assert_eq!(controller.tick().await, LoadOutcome::Skipped);
    assert_eq!(api.update_calls().len(), 2);

    // manual refresh ignores the flag
    assert_eq!(controller.manual_refresh().await, LoadOutcome::Applied(0));
    assert_eq!(api.update_calls().len(), 3);
}

#[tokio::test]
async fn test_auto_refresh_toggle_notifications() {
    let (notifier, sink) = recording_notifier();
    let controller = RefreshController::new(Arc::new(ScriptedApi::new()), notifier);

    assert!(controller.auto_refresh_enabled().await);
    assert!(!controller.toggle_auto_refresh().await);
    assert!(controller.toggle_auto_refresh().await);

    let posted = sink.posted();
    assert_eq!(posted.len(), 2);
    assert_eq!(posted[0].message, "Auto-refresh disabled");
    assert_eq!(posted[0].severity, Severity::Info);
    assert_eq!(posted[1].message, "Auto-refresh enabled");
    assert_eq!(posted[1].severity, Severity::Success);
}

#[tokio::test]
async fn test_initial_auto_refresh_is_silent() {
    let api = Arc::new(ScriptedApi::new().with_macros(&["build"]));
    let (notifier, sink) = recording_notifier();
    let controller = RefreshController::new(api.clone(), notifier);

    controller.init_auto_refresh(false).await;
    controller.load_macros().await.unwrap();

    assert!(!controller.view().await.auto_refresh);
    assert_eq!(controller.tick().await, LoadOutcome::Skipped);
    assert!(sink.posted().is_empty());
}

#[tokio::test]
async fn test_clear_success_and_failure() {
    let api = Arc::new(ScriptedApi::new().with_macros(&["build"]));
    api.push_updates("build", vec![plain_update("Macro Bot", "x", "2024-05-29T10:00:00")]);
    let (notifier, sink) = recording_notifier();
    let controller = RefreshController::new(api.clone(), notifier);
    controller.load_macros().await.unwrap();
    assert_eq!(controller.updates().await.len(), 1);

    api.set_clear_failure(Some(500));
    assert!(matches!(controller.clear().await, ClearOutcome::Failed(_)));
    assert_eq!(controller.updates().await.len(), 1);
    assert!(sink.messages().last().unwrap().starts_with("Error clearing updates: "));

    api.set_clear_failure(None);
    assert_eq!(controller.clear().await, ClearOutcome::Cleared);
    assert!(controller.updates().await.is_empty());
    let view = controller.view().await;
    assert_eq!(view.feed, FeedView::Empty);
    assert_eq!(view.status.last_update, "Never");
    assert_eq!(sink.messages().last().unwrap(), "All updates cleared");
}

#[tokio::test]
async fn test_clear_resolving_after_switch_keeps_new_feed() {
    let api = Arc::new(ScriptedApi::new().with_macros(&["build", "deploy"]));
    api.push_updates("build", vec![plain_update("Macro Bot", "b", "2024-05-29T10:00:00")]);
    let (notifier, sink) = recording_notifier();
    let controller = Arc::new(RefreshController::new(api.clone(), notifier));
    controller.load_macros().await.unwrap();
    assert_eq!(controller.updates().await.len(), 1);

    let release_clear = api.gate_next_clear();
    let clearing = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.clear().await })
    };
    settle(|| api.clear_calls() == vec!["build".to_string()]).await;

    api.push_updates(
        "deploy",
        vec![
            plain_update("Macro Bot", "deploy 2", "2024-05-29T16:26:40"),
            plain_update("Macro Bot", "deploy 1", "2024-05-29T16:00:00"),
        ],
    );
    assert_eq!(controller.select_macro(MacroId::from("deploy")).await, LoadOutcome::Applied(2));

    release_clear.send(()).unwrap();
    assert_eq!(clearing.await.unwrap(), ClearOutcome::Cleared);

    assert_eq!(controller.updates().await.len(), 2);
    let view = controller.view().await;
    assert_eq!(view.feed.card_count(), 2);
    assert_eq!(view.status.count, 2);
    assert_eq!(view.status.last_update, "4:26:40 PM");
    assert_eq!(sink.messages(), vec!["All updates cleared".to_string()]);

    // the deploy selection is still current, so a tick applies normally
    api.push_updates("deploy", vec![plain_update("Macro Bot", "deploy 3", "2024-05-29T17:00:00")]);
    assert_eq!(controller.tick().await, LoadOutcome::Applied(1));
}

#[tokio::test]
async fn test_clear_without_selection_is_skipped() {
    let mut api = MockApi::new();
    api.expect_clear_updates().times(0);
    let (notifier, sink) = recording_notifier();
    let controller = RefreshController::new(Arc::new(api), notifier);
    assert_eq!(controller.clear().await, ClearOutcome::Skipped);
    assert!(sink.posted().is_empty());
}

#[tokio::test]
async fn test_clear_all_and_health() {
    let mut api = MockApi::new();
    api.expect_clear_all().times(1).returning(|| Ok(()));
    api.expect_health().times(1).returning(|| Ok(true));
    let (notifier, sink) = recording_notifier();
    let controller = RefreshController::new(Arc::new(api), notifier);

    assert_eq!(controller.clear_all().await, ClearOutcome::Cleared);
    assert!(controller.check_health().await);
    assert_eq!(
        sink.messages(),
        vec!["Updates cleared for all macros".to_string(), "Server is healthy".to_string()]
    );
}
