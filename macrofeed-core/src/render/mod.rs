pub mod card;
pub mod page;
pub mod sanitize;
pub mod text;
pub mod time;

pub use card::{Card, CardBody, EmbedCard, FieldRow, render_card};
pub use page::{render_feed, render_page};
pub use sanitize::{escape_html, escape_html_str};
pub use text::render_text;
