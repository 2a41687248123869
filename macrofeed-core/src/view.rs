//! Snapshot of everything the dashboard displays. Rebuilt by the controller
//! after every state change and published to observers.

use macrofeed_common::models::MacroId;

use crate::feed::StatusSummary;
use crate::render::card::Card;

pub const REFRESH_LABEL: &str = "Refresh";
pub const REFRESHING_LABEL: &str = "Refreshing...";

#[derive(Debug, Clone, PartialEq)]
pub enum SelectorView {
    Loading,
    Options {
        macros: Vec<MacroId>,
        selected: Option<MacroId>,
    },
    /// Backend answered with an empty list.
    NoMacros,
    /// Macro list could not be fetched.
    Error,
}

impl SelectorView {
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            SelectorView::Loading => Some("Loading macros..."),
            SelectorView::NoMacros => Some("No macros configured"),
            SelectorView::Error => Some("Error loading macros"),
            SelectorView::Options { .. } => None,
        }
    }
}

/// What occupies the feed area.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedView {
    Loading,
    Cards(Vec<Card>),
    /// A successful fetch (or clear) left nothing to show.
    Empty,
    /// A fetch failed and there was nothing cached to keep showing.
    ConnectionError,
    NoMacros,
    MacroListError,
}

impl FeedView {
    pub fn card_count(&self) -> usize {
        match self {
            FeedView::Cards(cards) => cards.len(),
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshButton {
    pub busy: bool,
}

impl RefreshButton {
    pub fn label(&self) -> &'static str {
        if self.busy { REFRESHING_LABEL } else { REFRESH_LABEL }
    }

    pub fn enabled(&self) -> bool {
        !self.busy
    }
}

/// Controller phase for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub selector: SelectorView,
    pub feed: FeedView,
    pub status: StatusSummary,
    pub refresh_button: RefreshButton,
    pub auto_refresh: bool,
    pub phase: LoadPhase,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self {
            selector: SelectorView::Loading,
            feed: FeedView::Loading,
            status: StatusSummary::default(),
            refresh_button: RefreshButton::default(),
            auto_refresh: true,
            phase: LoadPhase::Idle,
        }
    }
}
