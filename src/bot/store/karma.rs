use super::Store;

/* Per-guild karma tables: user id -> integer score, created lazily. */

impl Store {
    // Applies a karma delta and returns the new score.
    pub async fn give_karma(&self, guild_id: u64, user_id: u64, delta: i64) -> i64 {
        let mut karma = self.karma.lock().await;
        let score = karma.entry(guild_id).or_default().entry(user_id).or_insert(0);
        *score += delta;
        *score
    }

    pub async fn karma_of(&self, guild_id: u64, user_id: u64) -> i64 {
        self.karma
            .lock()
            .await
            .get(&guild_id)
            .and_then(|table| table.get(&user_id))
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_karma_accumulates_per_guild() {
        let store = Store::new();
        assert_eq!(store.karma_of(1, 50).await, 0);

        assert_eq!(store.give_karma(1, 50, 3).await, 3);
        assert_eq!(store.give_karma(1, 50, -1).await, 2);
        assert_eq!(store.give_karma(2, 50, 10).await, 10);

        assert_eq!(store.karma_of(1, 50).await, 2);
        assert_eq!(store.karma_of(2, 50).await, 10);
        assert_eq!(store.karma_of(1, 51).await, 0);
    }
}
