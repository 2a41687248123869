//! In-memory update history, one newest-first list per macro.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use macrofeed_common::models::{Embed, UpdateRecord};

pub const DEFAULT_AUTHOR: &str = "Macro Bot";

#[derive(Default)]
struct Lists {
    by_macro: HashMap<String, Vec<UpdateRecord>>,
    last_id: i64,
}

pub struct UpdateStore {
    lists: RwLock<Lists>,
    max_updates: usize,
}

impl UpdateStore {
    pub fn new(max_updates: usize) -> Self {
        Self {
            lists: RwLock::new(Lists::default()),
            max_updates,
        }
    }

    /// Record a new update at the front of `macro_name`'s list, trimming the
    /// tail beyond the cap. Ids are receipt milliseconds, bumped if two
    /// arrive within the same millisecond.
    pub async fn record(
        &self,
        macro_name: &str,
        content: String,
        embeds: Vec<Embed>,
        author: Option<String>,
    ) -> UpdateRecord {
        let now = Utc::now();
        let mut lists = self.lists.write().await;
        let id = now.timestamp_millis().max(lists.last_id + 1);
        lists.last_id = id;

        let update = UpdateRecord {
            id: Some(id),
            author: author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            content: Some(content),
            timestamp: now.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            embeds,
        };

        let list = lists.by_macro.entry(macro_name.to_string()).or_default();
        list.insert(0, update.clone());
        list.truncate(self.max_updates);
        update
    }

    pub async fn list(&self, macro_name: &str) -> Vec<UpdateRecord> {
        self.lists
            .read()
            .await
            .by_macro
            .get(macro_name)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn get(&self, macro_name: &str, id: i64) -> Option<UpdateRecord> {
        self.lists
            .read()
            .await
            .by_macro
            .get(macro_name)?
            .iter()
            .find(|u| u.id == Some(id))
            .cloned()
    }

    pub async fn clear(&self, macro_name: &str) {
        if let Some(list) = self.lists.write().await.by_macro.get_mut(macro_name) {
            list.clear();
        }
    }

    pub async fn clear_all(&self) {
        for list in self.lists.write().await.by_macro.values_mut() {
            list.clear();
        }
    }
}
