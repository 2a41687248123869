//! macrofeed-core/src/controller.rs
//!
//! Orchestrates every fetch the dashboard makes: startup macro listing,
//! selection changes, manual and timer-driven refreshes, and clears.
//!
//! The feed state sits behind one async mutex. Each operation snapshots a
//! [`LoadTag`] under the lock, releases it for the network call, then
//! re-locks to apply the result only if the tag is still current. A slow
//! answer for a macro the user already left is therefore dropped instead of
//! overwriting the newer view.
//!
//! After every change a fresh [`DashboardView`] is published on a `watch`
//! channel for whatever draws the dashboard.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};

use macrofeed_common::models::{MacroId, UpdateRecord};
use macrofeed_common::traits::FeedApi;

use crate::Error;
use crate::feed::{FeedState, LoadTag, StatusSummary};
use crate::notify::Notifier;
use crate::render::render_feed;
use crate::view::{DashboardView, FeedView, LoadPhase, RefreshButton, SelectorView};

/// What a single load cycle ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing selected (or auto-refresh off, for ticks).
    Skipped,
    /// Response applied; carries the number of updates now shown.
    Applied(usize),
    /// Response arrived for a selection that is no longer current.
    Discarded,
    /// Request failed; carries the error text.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearOutcome {
    Skipped,
    Cleared,
    Failed(String),
}

struct Inner {
    feed: FeedState,
    selector: SelectorView,
    feed_view: FeedView,
    phase: LoadPhase,
    refresh_button: RefreshButton,
}

impl Inner {
    fn snapshot(&self) -> DashboardView {
        DashboardView {
            selector: self.selector.clone(),
            feed: self.feed_view.clone(),
            status: StatusSummary::from_state(&self.feed),
            refresh_button: self.refresh_button,
            auto_refresh: self.feed.auto_refresh_enabled(),
            phase: self.phase,
        }
    }

    fn selector_with_selection(&mut self) {
        if let SelectorView::Options { selected, .. } = &mut self.selector {
            *selected = self.feed.selected().cloned();
        }
    }

    fn rerender(&mut self) {
        self.feed_view = render_feed(self.feed.updates());
    }
}

pub struct RefreshController {
    api: Arc<dyn FeedApi>,
    notifier: Arc<Notifier>,
    inner: Mutex<Inner>,
    view_tx: watch::Sender<DashboardView>,
}

impl RefreshController {
    pub fn new(api: Arc<dyn FeedApi>, notifier: Arc<Notifier>) -> Self {
        let (view_tx, _) = watch::channel(DashboardView::default());
        Self {
            api,
            notifier,
            inner: Mutex::new(Inner {
                feed: FeedState::new(),
                selector: SelectorView::Loading,
                feed_view: FeedView::Loading,
                phase: LoadPhase::Idle,
                refresh_button: RefreshButton::default(),
            }),
            view_tx,
        }
    }

    pub fn notifier(&self) -> &Arc<Notifier> {
        &self.notifier
    }

    /// Receiver that sees every published view.
    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.view_tx.subscribe()
    }

    pub async fn view(&self) -> DashboardView {
        self.inner.lock().await.snapshot()
    }

    pub async fn selected(&self) -> Option<MacroId> {
        self.inner.lock().await.feed.selected().cloned()
    }

    pub async fn updates(&self) -> Vec<UpdateRecord> {
        self.inner.lock().await.feed.updates().to_vec()
    }

    pub async fn auto_refresh_enabled(&self) -> bool {
        self.inner.lock().await.feed.auto_refresh_enabled()
    }

    fn publish(&self, inner: &Inner) {
        self.view_tx.send_replace(inner.snapshot());
    }

    /// Startup: fetch the macro list and auto-select the first entry.
    pub async fn load_macros(&self) -> Result<Vec<MacroId>, Error> {
        match self.api.list_macros().await {
            Ok(macros) if macros.is_empty() => {
                info!("Backend has no macros configured.");
                let mut inner = self.inner.lock().await;
                inner.selector = SelectorView::NoMacros;
                inner.feed_view = FeedView::NoMacros;
                self.publish(&inner);
                Ok(macros)
            }
            Ok(macros) => {
                info!("Loaded {} macros: {:?}", macros.len(), macros);
                let first = macros[0].clone();
                {
                    let mut inner = self.inner.lock().await;
                    inner.selector = SelectorView::Options {
                        macros: macros.clone(),
                        selected: None,
                    };
                }
                self.select_macro(first).await;
                Ok(macros)
            }
            Err(e) => {
                error!("Error loading macros: {}", e);
                self.notifier.error(format!("Error loading macros: {}", e));
                let mut inner = self.inner.lock().await;
                inner.selector = SelectorView::Error;
                inner.feed_view = FeedView::MacroListError;
                self.publish(&inner);
                Err(e)
            }
        }
    }

    /// User picked a macro: switch and load it right away. Requests already
    /// in flight for the previous selection are left to finish and discarded.
    pub async fn select_macro(&self, macro_id: MacroId) -> LoadOutcome {
        let tag = {
            let mut inner = self.inner.lock().await;
            let tag = inner.feed.select(macro_id);
            inner.selector_with_selection();
            self.publish(&inner);
            tag
        };
        match tag {
            Some(tag) => self.run_load(tag).await,
            None => LoadOutcome::Skipped,
        }
    }

    /// Load cycle for whatever is currently selected.
    pub async fn load_updates(&self) -> LoadOutcome {
        let tag = self.inner.lock().await.feed.current_tag();
        match tag {
            Some(tag) => self.run_load(tag).await,
            None => LoadOutcome::Skipped,
        }
    }

    /// Refresh button: disabled and relabelled while the request runs,
    /// re-enabled whatever the outcome.
    pub async fn manual_refresh(&self) -> LoadOutcome {
        {
            let mut inner = self.inner.lock().await;
            inner.refresh_button.busy = true;
            self.publish(&inner);
        }
        let outcome = self.load_updates().await;
        {
            let mut inner = self.inner.lock().await;
            inner.refresh_button.busy = false;
            self.publish(&inner);
        }
        outcome
    }

    /// Timer tick: loads only when a macro is selected and auto-refresh is on.
    pub async fn tick(&self) -> LoadOutcome {
        let tag = {
            let inner = self.inner.lock().await;
            if !inner.feed.auto_refresh_enabled() {
                return LoadOutcome::Skipped;
            }
            inner.feed.current_tag()
        };
        match tag {
            Some(tag) => self.run_load(tag).await,
            None => LoadOutcome::Skipped,
        }
    }

    async fn run_load(&self, tag: LoadTag) -> LoadOutcome {
        if tag.macro_id.is_empty() {
            return LoadOutcome::Skipped;
        }
        {
            let mut inner = self.inner.lock().await;
            if inner.feed.is_current(&tag) {
                inner.phase = LoadPhase::Loading;
                self.publish(&inner);
            }
        }

        debug!("Loading updates for '{}' (epoch {})", tag.macro_id, tag.epoch);
        let result = self.api.list_updates(&tag.macro_id).await;

        let mut inner = self.inner.lock().await;
        match result {
            Ok(updates) => {
                let count = updates.len();
                if !inner.feed.replace_updates(&tag, updates) {
                    debug!(
                        "Discarding stale response for '{}' (epoch {})",
                        tag.macro_id, tag.epoch
                    );
                    return LoadOutcome::Discarded;
                }
                inner.phase = LoadPhase::Loaded;
                inner.rerender();
                self.publish(&inner);
                LoadOutcome::Applied(count)
            }
            Err(e) => {
                if !inner.feed.is_current(&tag) {
                    warn!("Stale load for '{}' failed: {}", tag.macro_id, e);
                    return LoadOutcome::Discarded;
                }
                error!("Error loading updates for '{}': {}", tag.macro_id, e);
                self.notifier.error(format!("Error loading updates: {}", e));
                inner.phase = LoadPhase::Failed;
                // keep stale-but-present data rather than blanking the feed
                if inner.feed.updates().is_empty() {
                    inner.feed_view = FeedView::ConnectionError;
                }
                self.publish(&inner);
                LoadOutcome::Failed(e.to_string())
            }
        }
    }

    /// Clear the selected macro's history. Confirmation is up to the caller.
    /// If the selection changes while the request is out, the local feed is
    /// left alone: it belongs to a macro the backend did not clear.
    pub async fn clear(&self) -> ClearOutcome {
        let Some(tag) = self.inner.lock().await.feed.current_tag() else {
            return ClearOutcome::Skipped;
        };
        let macro_id = &tag.macro_id;
        match self.api.clear_updates(macro_id).await {
            Ok(()) => {
                info!("Cleared updates for '{}'", macro_id);
                let mut inner = self.inner.lock().await;
                if inner.feed.is_current(&tag) {
                    inner.feed.clear_updates();
                    inner.rerender();
                    self.publish(&inner);
                } else {
                    debug!(
                        "Selection moved off '{}' during clear; keeping the current feed",
                        macro_id
                    );
                }
                drop(inner);
                self.notifier.success("All updates cleared");
                ClearOutcome::Cleared
            }
            Err(e) => {
                error!("Error clearing updates for '{}': {}", macro_id, e);
                self.notifier.error(format!("Error clearing updates: {}", e));
                ClearOutcome::Failed(e.to_string())
            }
        }
    }

    /// Clear every macro on the backend; the local feed empties too.
    pub async fn clear_all(&self) -> ClearOutcome {
        match self.api.clear_all().await {
            Ok(()) => {
                info!("Cleared updates for all macros");
                let mut inner = self.inner.lock().await;
                inner.feed.clear_updates();
                if inner.feed.selected().is_some() {
                    inner.rerender();
                }
                self.publish(&inner);
                drop(inner);
                self.notifier.success("Updates cleared for all macros");
                ClearOutcome::Cleared
            }
            Err(e) => {
                error!("Error clearing all updates: {}", e);
                self.notifier.error(format!("Error clearing updates: {}", e));
                ClearOutcome::Failed(e.to_string())
            }
        }
    }

    /// Flip the auto-refresh flag. The timer keeps running; it just checks
    /// this flag on every tick.
    pub async fn set_auto_refresh(&self, enabled: bool) {
        self.init_auto_refresh(enabled).await;
        if enabled {
            self.notifier.success("Auto-refresh enabled");
        } else {
            self.notifier.info("Auto-refresh disabled");
        }
    }

    /// Startup value of the flag, from config or CLI. No notification.
    pub async fn init_auto_refresh(&self, enabled: bool) {
        let mut inner = self.inner.lock().await;
        inner.feed.set_auto_refresh(enabled);
        self.publish(&inner);
    }

    pub async fn toggle_auto_refresh(&self) -> bool {
        let enabled = !self.auto_refresh_enabled().await;
        self.set_auto_refresh(enabled).await;
        enabled
    }

    /// Fetch one update of the selected macro by id.
    pub async fn fetch_update(&self, update_id: i64) -> Result<UpdateRecord, Error> {
        let macro_id = self
            .selected()
            .await
            .ok_or_else(|| Error::NotFound("no macro selected".to_string()))?;
        self.api.get_update(&macro_id, update_id).await.map_err(|e| {
            warn!("Could not fetch update {} for '{}': {}", update_id, macro_id, e);
            e
        })
    }

    /// Probe the backend and report the result as a notification.
    pub async fn check_health(&self) -> bool {
        match self.api.health().await {
            Ok(true) => {
                self.notifier.success("Server is healthy");
                true
            }
            Ok(false) => {
                warn!("Health endpoint answered but did not report ok");
                self.notifier.error("Server reported an unhealthy status");
                false
            }
            Err(e) => {
                error!("Health check failed: {}", e);
                self.notifier.error(format!("Health check failed: {}", e));
                false
            }
        }
    }
}
