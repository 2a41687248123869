use macrofeed_common::models::UpdateRecord;

use super::state::FeedState;
use crate::render::time::format_time;

pub const NEVER: &str = "Never";

/// Count and "last updated" line shown under the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    pub count: usize,
    pub last_update: String,
}

impl StatusSummary {
    pub fn from_state(state: &FeedState) -> Self {
        Self::from_updates(state.updates())
    }

    /// Updates are newest-first, so the head is the latest.
    pub fn from_updates(updates: &[UpdateRecord]) -> Self {
        Self {
            count: updates.len(),
            last_update: updates
                .first()
                .map(|u| format_time(&u.timestamp))
                .unwrap_or_else(|| NEVER.to_string()),
        }
    }
}

impl Default for StatusSummary {
    fn default() -> Self {
        Self::from_updates(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(ts: &str) -> UpdateRecord {
        UpdateRecord {
            id: None,
            author: "bot".into(),
            content: None,
            timestamp: ts.into(),
            embeds: vec![],
        }
    }

    #[test]
    fn test_empty_is_never() {
        let s = StatusSummary::from_state(&FeedState::new());
        assert_eq!(s, StatusSummary { count: 0, last_update: "Never".into() });
    }

    #[test]
    fn test_uses_first_record() {
        let s = StatusSummary::from_updates(&[rec("2024-05-29T16:26:40"), rec("2024-05-29T09:00:00")]);
        assert_eq!(s.count, 2);
        assert_eq!(s.last_update, "4:26:40 PM");
    }
}
