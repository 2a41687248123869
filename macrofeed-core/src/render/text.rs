// Console rendering of an update. Same decisions as the HTML card, but
// built from the raw record since a terminal needs no escaping.

use std::fmt::Write as _;

use macrofeed_common::models::UpdateRecord;

use super::card::{FALLBACK_CONTENT, border_color, media_url};
use super::time::{format_date, format_time};

pub fn render_text(update: &UpdateRecord) -> String {
    let mut out = format!(
        "[{} {}] {}",
        format_date(&update.timestamp),
        format_time(&update.timestamp),
        update.author
    );

    match update.first_embed() {
        None => {
            let content = update
                .content
                .as_deref()
                .filter(|c| !c.is_empty())
                .unwrap_or(FALLBACK_CONTENT);
            let _ = write!(out, "\n  {}", content);
        }
        Some(embed) => {
            let _ = write!(out, " ({})", border_color(embed.color));
            if let Some(title) = embed.title.as_deref().filter(|t| !t.is_empty()) {
                let _ = write!(out, "\n  == {} ==", title);
            }
            if let Some(desc) = embed.description.as_deref().filter(|d| !d.is_empty()) {
                for line in desc.lines() {
                    let _ = write!(out, "\n  {}", line);
                }
            }
            for field in &embed.fields {
                let marker = if field.inline { "·" } else { "-" };
                let _ = write!(out, "\n  {} {}: {}", marker, field.name, field.value);
            }
            if let Some(url) = media_url(embed.thumbnail.as_ref()) {
                let _ = write!(out, "\n  [thumbnail] {}", url);
            }
            if let Some(url) = media_url(embed.image.as_ref()) {
                let _ = write!(out, "\n  [image] {}", url);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use macrofeed_common::models::{Embed, EmbedField};

    #[test]
    fn test_plain_text_is_not_escaped() {
        let rec = UpdateRecord {
            id: None,
            author: "Bot & Co".into(),
            content: Some("a < b".into()),
            timestamp: "2024-05-29T16:26:40".into(),
            embeds: vec![],
        };
        let text = render_text(&rec);
        assert!(text.starts_with("[5/29/2024 4:26:40 PM] Bot & Co"));
        assert!(text.ends_with("\n  a < b"));
    }

    #[test]
    fn test_embed_text() {
        let rec = UpdateRecord {
            id: None,
            author: "Bot".into(),
            content: None,
            timestamp: "2024-05-29T16:26:40".into(),
            embeds: vec![Embed {
                title: Some("Run".into()),
                color: Some(0xff8800),
                fields: vec![EmbedField { name: "Took".into(), value: "3s".into(), inline: true }],
                ..Default::default()
            }],
        };
        let text = render_text(&rec);
        assert!(text.contains("(#ff8800)"));
        assert!(text.contains("== Run =="));
        assert!(text.contains("· Took: 3s"));
    }
}
