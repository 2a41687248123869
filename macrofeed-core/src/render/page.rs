//! macrofeed-core/src/render/page.rs
//!
//! Feed-level rendering: the list of cards (or the placeholder standing in
//! for it) and the standalone HTML document written by the console client.

use std::fmt::Write as _;

use macrofeed_common::models::UpdateRecord;

use super::card::render_card;
use super::sanitize::escape_html_str;
use crate::view::{DashboardView, FeedView, SelectorView};

pub fn render_feed(updates: &[UpdateRecord]) -> FeedView {
    if updates.is_empty() {
        FeedView::Empty
    } else {
        FeedView::Cards(updates.iter().map(render_card).collect())
    }
}

/// (headline, detail) for every non-card feed state.
pub fn placeholder_text(feed: &FeedView) -> Option<(&'static str, &'static str)> {
    match feed {
        FeedView::Cards(_) => None,
        FeedView::Loading => Some(("Loading updates...", "Waiting for the first response")),
        FeedView::Empty => Some((
            "No macro updates yet",
            "Updates will appear here when the macro runs",
        )),
        FeedView::ConnectionError => Some((
            "Cannot connect to server",
            "Make sure the server is running on port 3000",
        )),
        FeedView::NoMacros => Some((
            "No macros configured",
            "Add MACRO_<NAME> entries to the server's environment",
        )),
        FeedView::MacroListError => Some((
            "Error loading macros",
            "The macro list could not be fetched",
        )),
    }
}

pub fn feed_html(feed: &FeedView) -> String {
    match feed {
        FeedView::Cards(cards) => cards.iter().map(|c| c.to_html()).collect::<Vec<_>>().join("\n"),
        other => {
            let class = match other {
                FeedView::ConnectionError | FeedView::MacroListError => "error-message",
                _ => "empty-message",
            };
            let detail_class = if class == "error-message" { "error-details" } else { "empty-details" };
            let (headline, detail) = placeholder_text(other).unwrap_or(("", ""));
            format!(
                r#"<div class="{}"><p>{}</p><p class="{}">{}</p></div>"#,
                class, headline, detail_class, detail
            )
        }
    }
}

fn selector_html(selector: &SelectorView) -> String {
    match selector {
        SelectorView::Options { macros, selected } => {
            let mut html = String::from(r#"<select id="macroSelect">"#);
            for m in macros {
                let id = escape_html_str(m.as_str());
                let sel = if selected.as_ref() == Some(m) { " selected" } else { "" };
                let _ = write!(html, r#"<option value="{}"{}>{}</option>"#, id, sel, id);
            }
            html.push_str("</select>");
            html
        }
        other => format!(
            r#"<select id="macroSelect"><option value="">{}</option></select>"#,
            other.placeholder().unwrap_or_default()
        ),
    }
}

const STYLE: &str = r#"
body { font-family: sans-serif; background: #1e1f22; color: #dbdee1; margin: 2rem; }
.update-card { background: #2b2d31; border-radius: 6px; padding: 0.75rem 1rem; margin-bottom: 0.75rem; }
.embed-card { border-left: 4px solid #5865F2; }
.card-title { display: flex; gap: 0.75rem; align-items: baseline; }
.author-badge { font-weight: bold; color: #fff; }
.timestamp { color: #949ba4; font-size: 0.8rem; }
.embed-fields { display: flex; flex-wrap: wrap; gap: 0.5rem; }
.embed-field { flex: 1 1 100%; }
.embed-field.inline { flex: 1 1 30%; }
.field-name { font-weight: bold; }
.embed-thumbnail { float: right; max-width: 80px; }
.embed-image { max-width: 100%; margin-top: 0.5rem; }
.error-message { color: #f23f43; }
.status-bar { color: #949ba4; margin-bottom: 1rem; }
"#;

/// Complete, standalone HTML document for the current view.
pub fn render_page(view: &DashboardView) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Macro Updates</title>
<style>{style}</style>
</head>
<body>
<header>
<h1>Macro Updates</h1>
{selector}
<button id="refreshBtn"{disabled}>{label}</button>
<label><input type="checkbox" id="autoRefresh"{checked}> Auto-refresh</label>
</header>
<div class="status-bar">Updates: <span id="updateCount">{count}</span> | Last update: <span id="lastUpdate">{last}</span></div>
<div id="updatesContainer">
{feed}
</div>
</body>
</html>
"#,
        style = STYLE,
        selector = selector_html(&view.selector),
        disabled = if view.refresh_button.enabled() { "" } else { " disabled" },
        label = view.refresh_button.label(),
        checked = if view.auto_refresh { " checked" } else { "" },
        count = view.status.count,
        last = view.status.last_update,
        feed = feed_html(&view.feed),
    )
}
