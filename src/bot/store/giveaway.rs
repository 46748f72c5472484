use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::{Store, StoreError};

/* Giveaway sessions.
 * Entrants accumulate in a set until the close timer fires; joining is
 * idempotent. Closing removes the record, so a click racing the close
 * resolves to GiveawayNotFound.
 */

#[derive(Clone, Debug)]
pub struct Giveaway {
    pub prize: String,
    pub ends_at: DateTime<Utc>,
    pub entrants: BTreeSet<u64>,
    pub channel_id: u64,
    pub message_id: Option<u64>,
}

impl Giveaway {
    pub fn new(prize: String, ends_at: DateTime<Utc>, channel_id: u64) -> Giveaway {
        Giveaway {
            prize,
            ends_at,
            entrants: BTreeSet::new(),
            channel_id,
            message_id: None,
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct JoinOutcome {
    pub added: bool,
    pub entrants: usize,
}

impl Store {
    pub async fn insert_giveaway(&self, giveaway_id: &str, giveaway: Giveaway) {
        self.giveaways
            .lock()
            .await
            .insert(giveaway_id.to_string(), giveaway);
    }

    pub async fn attach_giveaway_message(
        &self,
        giveaway_id: &str,
        message_id: u64,
    ) -> Result<(), StoreError> {
        let mut giveaways = self.giveaways.lock().await;
        let giveaway = giveaways
            .get_mut(giveaway_id)
            .ok_or_else(|| StoreError::GiveawayNotFound(giveaway_id.to_string()))?;
        giveaway.message_id = Some(message_id);
        Ok(())
    }

    // Adds an entrant; joining twice is a no-op reported back to the user.
    pub async fn join_giveaway(
        &self,
        giveaway_id: &str,
        user: u64,
    ) -> Result<JoinOutcome, StoreError> {
        let mut giveaways = self.giveaways.lock().await;
        let giveaway = giveaways
            .get_mut(giveaway_id)
            .ok_or_else(|| StoreError::GiveawayNotFound(giveaway_id.to_string()))?;

        let added = giveaway.entrants.insert(user);
        Ok(JoinOutcome {
            added,
            entrants: giveaway.entrants.len(),
        })
    }

    // Removes and returns the session for the winner draw.
    pub async fn take_giveaway(&self, giveaway_id: &str) -> Option<Giveaway> {
        self.giveaways.lock().await.remove(giveaway_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Giveaway {
        Giveaway::new("A rubber duck".to_string(), Utc::now(), 700)
    }

    #[tokio::test]
    async fn test_join_is_idempotent() {
        let store = Store::new();
        store.insert_giveaway("gw1", sample()).await;

        let outcome = store.join_giveaway("gw1", 5).await.unwrap();
        assert_eq!(
            outcome,
            JoinOutcome {
                added: true,
                entrants: 1
            }
        );

        let outcome = store.join_giveaway("gw1", 5).await.unwrap();
        assert_eq!(
            outcome,
            JoinOutcome {
                added: false,
                entrants: 1
            }
        );

        let outcome = store.join_giveaway("gw1", 6).await.unwrap();
        assert_eq!(outcome.entrants, 2);
    }

    #[tokio::test]
    async fn test_take_frees_the_session() {
        let store = Store::new();
        store.insert_giveaway("gw1", sample()).await;
        store.join_giveaway("gw1", 5).await.unwrap();

        let giveaway = store.take_giveaway("gw1").await.unwrap();
        assert!(giveaway.entrants.contains(&5));

        assert_eq!(
            store.join_giveaway("gw1", 6).await,
            Err(StoreError::GiveawayNotFound("gw1".to_string()))
        );
        assert!(store.take_giveaway("gw1").await.is_none());
    }
}
