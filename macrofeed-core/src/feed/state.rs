//! macrofeed-core/src/feed/state.rs
//!
//! The single owned piece of mutable dashboard state.

use macrofeed_common::models::{MacroId, UpdateRecord};

/// Identifies the selection a load cycle was started for.
///
/// Every selection change (and every clear) bumps the epoch, so a response
/// carrying an older tag is stale even if the same macro was reselected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTag {
    pub macro_id: MacroId,
    pub epoch: u64,
}

#[derive(Debug, Clone)]
pub struct FeedState {
    selected: Option<MacroId>,
    epoch: u64,
    updates: Vec<UpdateRecord>,
    auto_refresh_enabled: bool,
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedState {
    /// Empty, nothing selected, auto-refresh on.
    pub fn new() -> Self {
        Self {
            selected: None,
            epoch: 0,
            updates: Vec::new(),
            auto_refresh_enabled: true,
        }
    }

    pub fn selected(&self) -> Option<&MacroId> {
        self.selected.as_ref()
    }

    pub fn updates(&self) -> &[UpdateRecord] {
        &self.updates
    }

    pub fn auto_refresh_enabled(&self) -> bool {
        self.auto_refresh_enabled
    }

    pub fn set_auto_refresh(&mut self, enabled: bool) {
        self.auto_refresh_enabled = enabled;
    }

    /// Switch selection. An empty id deselects.
    pub fn select(&mut self, macro_id: MacroId) -> Option<LoadTag> {
        self.epoch += 1;
        self.selected = if macro_id.is_empty() { None } else { Some(macro_id) };
        self.current_tag()
    }

    /// Tag for a load cycle against the current selection, if any.
    pub fn current_tag(&self) -> Option<LoadTag> {
        self.selected.as_ref().map(|id| LoadTag {
            macro_id: id.clone(),
            epoch: self.epoch,
        })
    }

    pub fn is_current(&self, tag: &LoadTag) -> bool {
        self.epoch == tag.epoch && self.selected.as_ref() == Some(&tag.macro_id)
    }

    /// Wholesale replacement, only for a response that still matches the
    /// selection. Returns whether it was applied.
    pub fn replace_updates(&mut self, tag: &LoadTag, updates: Vec<UpdateRecord>) -> bool {
        if !self.is_current(tag) {
            return false;
        }
        self.updates = updates;
        true
    }

    /// Reset after a successful clear. In-flight loads for the old contents
    /// become stale.
    pub fn clear_updates(&mut self) {
        self.epoch += 1;
        self.updates.clear();
    }
}
