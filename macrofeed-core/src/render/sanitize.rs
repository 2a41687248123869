/// Escape text for literal insertion into HTML, content or quoted attribute.
///
/// Replaces `& < > " '` in one left-to-right pass; every other character is
/// copied through unchanged. Absent input yields an empty string.
pub fn escape_html(text: Option<&str>) -> String {
    match text {
        Some(t) => escape_html_str(t),
        None => String::new(),
    }
}

pub fn escape_html_str(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}
