use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use super::Store;

/* Snipe: per-channel recall of the most recently deleted message.
 * The platform's deletion event carries only ids, so the store keeps a
 * small rolling window of recent messages per channel; a deletion moves
 * the matching entry into the channel's snipe slot, overwriting whatever
 * was there.
 */

const RECENT_LIMIT: usize = 30;

#[derive(Clone, Debug)]
pub(super) struct RecentMessage {
    message_id: u64,
    author_id: u64,
    author_name: String,
    content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SnipeRecord {
    pub author_id: u64,
    pub author_name: String,
    pub content: String,
    pub deleted_at: DateTime<Utc>,
}

impl Store {
    // Feeds the rolling window; the oldest entry falls off past the limit.
    pub async fn remember_message(
        &self,
        channel_id: u64,
        message_id: u64,
        author_id: u64,
        author_name: String,
        content: String,
    ) {
        let mut recent = self.recent.lock().await;
        let window = recent.entry(channel_id).or_default();
        window.push_back(RecentMessage {
            message_id,
            author_id,
            author_name,
            content,
        });
        while window.len() > RECENT_LIMIT {
            window.pop_front();
        }
    }

    /* Records a deletion. Returns the new snipe record if the deleted
     * message was still inside the window; a miss leaves the previous
     * record in place.
     */
    pub async fn capture_deleted(&self, channel_id: u64, message_id: u64) -> Option<SnipeRecord> {
        let removed = {
            let mut recent = self.recent.lock().await;
            let window = recent.get_mut(&channel_id)?;
            let index = window.iter().position(|m| m.message_id == message_id)?;
            window.remove(index)
        }?;

        let record = SnipeRecord {
            author_id: removed.author_id,
            author_name: removed.author_name,
            content: removed.content,
            deleted_at: Utc::now(),
        };
        self.snipes
            .lock()
            .await
            .insert(channel_id, record.clone());
        Some(record)
    }

    pub async fn last_deleted(&self, channel_id: u64) -> Option<SnipeRecord> {
        self.snipes.lock().await.get(&channel_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn remember(store: &Store, channel: u64, id: u64, text: &str) {
        store
            .remember_message(channel, id, 1, "alice".to_string(), text.to_string())
            .await;
    }

    #[tokio::test]
    async fn test_capture_overwrites_previous_record() {
        let store = Store::new();
        remember(&store, 10, 1, "first").await;
        remember(&store, 10, 2, "second").await;

        store.capture_deleted(10, 1).await.unwrap();
        assert_eq!(store.last_deleted(10).await.unwrap().content, "first");

        store.capture_deleted(10, 2).await.unwrap();
        assert_eq!(store.last_deleted(10).await.unwrap().content, "second");
    }

    #[tokio::test]
    async fn test_unknown_deletion_keeps_previous_record() {
        let store = Store::new();
        remember(&store, 10, 1, "kept").await;
        store.capture_deleted(10, 1).await.unwrap();

        assert!(store.capture_deleted(10, 99).await.is_none());
        assert!(store.capture_deleted(11, 1).await.is_none());
        assert_eq!(store.last_deleted(10).await.unwrap().content, "kept");
    }

    #[tokio::test]
    async fn test_window_evicts_oldest() {
        let store = Store::new();
        for id in 0..=RECENT_LIMIT as u64 {
            remember(&store, 10, id, &format!("msg {}", id)).await;
        }

        // Message 0 fell out of the window, message 1 is still inside
        assert!(store.capture_deleted(10, 0).await.is_none());
        assert!(store.capture_deleted(10, 1).await.is_some());
    }
}
