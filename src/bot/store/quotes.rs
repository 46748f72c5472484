use super::Store;

/* Per-guild quote lists. Append-only, unbounded, created lazily. */

impl Store {
    // Appends a quote and returns its 1-based number.
    pub async fn add_quote(&self, guild_id: u64, text: String) -> usize {
        let mut quotes = self.quotes.lock().await;
        let list = quotes.entry(guild_id).or_default();
        list.push(text);
        list.len()
    }

    pub async fn quote_count(&self, guild_id: u64) -> usize {
        self.quotes
            .lock()
            .await
            .get(&guild_id)
            .map_or(0, |list| list.len())
    }

    // Fetches the quote at a 0-based index.
    pub async fn quote_at(&self, guild_id: u64, index: usize) -> Option<String> {
        self.quotes
            .lock()
            .await
            .get(&guild_id)
            .and_then(|list| list.get(index).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_and_fetch_quotes() {
        let store = Store::new();
        assert_eq!(store.quote_count(1).await, 0);
        assert_eq!(store.quote_at(1, 0).await, None);

        assert_eq!(store.add_quote(1, "first".to_string()).await, 1);
        assert_eq!(store.add_quote(1, "second".to_string()).await, 2);

        // Lists are per guild
        assert_eq!(store.add_quote(2, "other".to_string()).await, 1);

        assert_eq!(store.quote_count(1).await, 2);
        assert_eq!(store.quote_at(1, 1).await, Some("second".to_string()));
        assert_eq!(store.quote_at(2, 0).await, Some("other".to_string()));
    }
}
