// File: macrofeed-core/src/test_utils/fixtures.rs

use std::sync::{Arc, Mutex};
use std::time::Duration;

use macrofeed_common::models::{Embed, EmbedField, EmbedMedia, UpdateRecord};

use crate::config::ToastTiming;
use crate::notify::{NotificationSink, Notifier, Severity, Toast};

pub fn plain_update(author: &str, content: &str, timestamp: &str) -> UpdateRecord {
    UpdateRecord {
        id: None,
        author: author.to_string(),
        content: Some(content.to_string()),
        timestamp: timestamp.to_string(),
        embeds: Vec::new(),
    }
}

/// A typical "macro finished" embed: green, one inline field, a thumbnail.
pub fn embed_update(author: &str, title: &str, timestamp: &str) -> UpdateRecord {
    UpdateRecord {
        id: None,
        author: author.to_string(),
        content: None,
        timestamp: timestamp.to_string(),
        embeds: vec![Embed {
            title: Some(title.to_string()),
            description: Some("Macro run completed".to_string()),
            color: Some(0x00ff00),
            fields: vec![EmbedField {
                name: "Duration".to_string(),
                value: "3s".to_string(),
                inline: true,
            }],
            thumbnail: Some(EmbedMedia {
                url: "https://cdn.example.com/thumb.png".to_string(),
            }),
            ..Default::default()
        }],
    }
}

/// Remembers every toast posted, in order.
#[derive(Default)]
pub struct RecordingSink {
    posted: Mutex<Vec<Toast>>,
}

impl RecordingSink {
    pub fn posted(&self) -> Vec<Toast> {
        self.posted.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.posted().iter().filter(|t| t.severity == severity).count()
    }

    pub fn messages(&self) -> Vec<String> {
        self.posted().into_iter().map(|t| t.message).collect()
    }
}

impl NotificationSink for RecordingSink {
    fn posted(&self, toast: &Toast) {
        self.posted
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(toast.clone());
    }
}

/// Notifier with near-instant toast timings plus the sink recording it.
pub fn recording_notifier() -> (Arc<Notifier>, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let timing = ToastTiming {
        enter_delay: Duration::from_millis(1),
        visible: Duration::from_millis(5),
        exit: Duration::from_millis(1),
    };
    (Arc::new(Notifier::new(timing, sink.clone())), sink)
}
