//! macrofeed-core/src/render/card.rs
//!
//! Turns one [`UpdateRecord`] into a [`Card`]: a description of what the
//! dashboard shows for it. Updates carrying embeds are drawn from their first
//! embed only; everything else is a plain text card.
//!
//! All untrusted text in a `Card` is already escaped, so `to_html` can splice
//! it into markup as-is.

use std::fmt::Write as _;

use tracing::warn;
use url::Url;

use macrofeed_common::models::{Embed, EmbedMedia, UpdateRecord};

use super::sanitize::{escape_html, escape_html_str};
use super::time::{format_date, format_time};

pub const FALLBACK_CONTENT: &str = "Macro execution update";
pub const DEFAULT_EMBED_COLOR: &str = "#5865F2";

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Escaped author name.
    pub author: String,
    /// Local time of day, shown in the header.
    pub time: String,
    /// Local date, shown as the time's tooltip.
    pub date: String,
    pub body: CardBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardBody {
    /// Escaped content, or the fallback text when the update had none.
    Plain { content: String },
    Embed(EmbedCard),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbedCard {
    /// `#rrggbb`, never escaped (computed here).
    pub border_color: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<FieldRow>,
    /// Validated http(s) URLs, serialized by `url` so they are safe inside
    /// a double-quoted attribute.
    pub thumbnail: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldRow {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Pure mapping from an update to its card. Never panics: a missing optional
/// part just leaves its markup out.
pub fn render_card(update: &UpdateRecord) -> Card {
    let body = match update.first_embed() {
        Some(embed) => CardBody::Embed(render_embed(embed)),
        None => CardBody::Plain {
            content: plain_content(update.content.as_deref()),
        },
    };

    Card {
        author: escape_html_str(&update.author),
        time: format_time(&update.timestamp),
        date: format_date(&update.timestamp),
        body,
    }
}

pub(crate) fn plain_content(content: Option<&str>) -> String {
    let escaped = escape_html(content);
    if escaped.is_empty() {
        FALLBACK_CONTENT.to_string()
    } else {
        escaped
    }
}

/// `#rrggbb` for the embed's colour; 0 counts as unset, like a missing one.
pub fn border_color(color: Option<u32>) -> String {
    match color {
        Some(c) if c != 0 => format!("#{:06x}", c & 0x00ff_ffff),
        _ => DEFAULT_EMBED_COLOR.to_string(),
    }
}

/// Accepts only absolute http(s) URLs. Anything else (`javascript:`, `data:`,
/// relative junk) is dropped so it never reaches an `src` attribute.
pub fn media_url(media: Option<&EmbedMedia>) -> Option<String> {
    let media = media?;
    match Url::parse(media.url.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url.to_string()),
        Ok(url) => {
            warn!("Dropping embed image with unsupported scheme '{}'", url.scheme());
            None
        }
        Err(e) => {
            warn!("Dropping embed image with unparseable URL: {}", e);
            None
        }
    }
}

fn non_empty(s: &Option<String>) -> Option<String> {
    s.as_deref()
        .filter(|s| !s.is_empty())
        .map(escape_html_str)
}

fn render_embed(embed: &Embed) -> EmbedCard {
    EmbedCard {
        border_color: border_color(embed.color),
        title: non_empty(&embed.title),
        description: non_empty(&embed.description),
        fields: embed
            .fields
            .iter()
            .map(|f| FieldRow {
                name: escape_html_str(&f.name),
                value: escape_html_str(&f.value),
                inline: f.inline,
            })
            .collect(),
        thumbnail: media_url(embed.thumbnail.as_ref()),
        image: media_url(embed.image.as_ref()),
    }
}

impl Card {
    pub fn is_embed(&self) -> bool {
        matches!(self.body, CardBody::Embed(_))
    }

    pub fn border_color(&self) -> Option<&str> {
        match &self.body {
            CardBody::Embed(e) => Some(&e.border_color),
            CardBody::Plain { .. } => None,
        }
    }

    fn header_html(&self) -> String {
        format!(
            r#"<div class="card-header"><div class="card-title"><span class="author-badge">{}</span><span class="timestamp" title="{}">{}</span></div></div>"#,
            self.author, self.date, self.time
        )
    }

    pub fn to_html(&self) -> String {
        match &self.body {
            CardBody::Plain { content } => format!(
                r#"<div class="update-card">{}<div class="card-content"><p>{}</p></div></div>"#,
                self.header_html(),
                content
            ),
            CardBody::Embed(embed) => {
                let mut html = format!(
                    r#"<div class="update-card embed-card" style="border-left: 4px solid {}">{}<div class="card-content embed-content">"#,
                    embed.border_color,
                    self.header_html()
                );
                if let Some(title) = &embed.title {
                    let _ = write!(html, r#"<h3 class="embed-title">{}</h3>"#, title);
                }
                if let Some(desc) = &embed.description {
                    let _ = write!(html, r#"<p class="embed-description">{}</p>"#, desc);
                }
                if !embed.fields.is_empty() {
                    html.push_str(r#"<div class="embed-fields">"#);
                    for field in &embed.fields {
                        let class = if field.inline { "embed-field inline" } else { "embed-field" };
                        let _ = write!(
                            html,
                            r#"<div class="{}"><div class="field-name">{}</div><div class="field-value">{}</div></div>"#,
                            class, field.name, field.value
                        );
                    }
                    html.push_str("</div>");
                }
                if let Some(src) = &embed.thumbnail {
                    let _ = write!(
                        html,
                        r#"<img src="{}" alt="thumbnail" class="embed-thumbnail" loading="lazy">"#,
                        src
                    );
                }
                if let Some(src) = &embed.image {
                    let _ = write!(
                        html,
                        r#"<img src="{}" alt="image" class="embed-image" loading="lazy">"#,
                        src
                    );
                }
                html.push_str("</div></div>");
                html
            }
        }
    }
}
