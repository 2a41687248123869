pub mod update;
pub mod webhook;

pub use update::{Embed, EmbedField, EmbedMedia, MacroId, UpdateRecord};
pub use webhook::{Ack, HealthStatus, WebhookAuthor, WebhookPayload};
