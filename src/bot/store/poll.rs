use std::collections::{BTreeSet, HashMap};

use super::{Store, StoreError};

/* Poll records and their single transition, "record vote".
 * Votes are kept as a voter -> chosen-option-set mapping; in single-vote
 * mode the set never holds more than one entry, so the sum of the
 * displayed counts always equals the number of distinct voters.
 * Polls are abandoned, never closed.
 */

#[derive(Clone, Debug)]
pub struct Poll {
    pub question: String,
    pub options: Vec<String>,
    pub multi: bool,
    pub votes: HashMap<u64, BTreeSet<usize>>,
    pub channel_id: u64,
    pub message_id: Option<u64>,
    pub version: u64,
}

impl Poll {
    pub fn new(question: String, options: Vec<String>, multi: bool, channel_id: u64) -> Poll {
        Poll {
            question,
            options,
            multi,
            votes: HashMap::new(),
            channel_id,
            message_id: None,
            version: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PollSnapshot {
    pub question: String,
    pub options: Vec<String>,
    pub counts: Vec<usize>,
    pub voters: usize,
    pub multi: bool,
    pub version: u64,
}

fn snapshot(poll: &Poll) -> PollSnapshot {
    let mut counts = vec![0usize; poll.options.len()];
    for choices in poll.votes.values() {
        for &option in choices {
            counts[option] += 1;
        }
    }

    PollSnapshot {
        question: poll.question.clone(),
        options: poll.options.clone(),
        counts,
        voters: poll.votes.len(),
        multi: poll.multi,
        version: poll.version,
    }
}

impl Store {
    // Adds a new poll under the given session key.
    pub async fn insert_poll(&self, poll_id: &str, poll: Poll) {
        self.polls.lock().await.insert(poll_id.to_string(), poll);
    }

    // Remembers which message renders the poll, for logging and later edits.
    pub async fn attach_poll_message(
        &self,
        poll_id: &str,
        message_id: u64,
    ) -> Result<(), StoreError> {
        let mut polls = self.polls.lock().await;
        let poll = polls
            .get_mut(poll_id)
            .ok_or_else(|| StoreError::PollNotFound(poll_id.to_string()))?;
        poll.message_id = Some(message_id);
        Ok(())
    }

    /* Applies one vote click as a single atomic toggle.
     * Single-vote mode: clicking the recorded choice removes it, clicking
     * a different choice replaces it. Multi-vote mode: each click toggles
     * that option's membership for the voter.
     */
    pub async fn record_vote(
        &self,
        poll_id: &str,
        voter: u64,
        option: usize,
    ) -> Result<PollSnapshot, StoreError> {
        let mut polls = self.polls.lock().await;
        let poll = polls
            .get_mut(poll_id)
            .ok_or_else(|| StoreError::PollNotFound(poll_id.to_string()))?;

        if option >= poll.options.len() {
            return Err(StoreError::OptionOutOfRange(option));
        }

        let choices = poll.votes.entry(voter).or_default();
        if choices.contains(&option) {
            choices.remove(&option);
        } else {
            if !poll.multi {
                choices.clear();
            }
            choices.insert(option);
        }
        if choices.is_empty() {
            poll.votes.remove(&voter);
        }

        poll.version += 1;
        Ok(snapshot(poll))
    }

    #[allow(dead_code)]
    pub async fn poll_snapshot(&self, poll_id: &str) -> Option<PollSnapshot> {
        self.polls.lock().await.get(poll_id).map(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color_poll(multi: bool) -> Poll {
        Poll::new(
            "Best color?".to_string(),
            vec!["Red".to_string(), "Blue".to_string(), "Green".to_string()],
            multi,
            100,
        )
    }

    #[tokio::test]
    async fn test_single_vote_replaces_and_toggles() {
        let store = Store::new();
        store.insert_poll("p1", color_poll(false)).await;

        // Fresh poll: three options, all at zero
        let snap = store.poll_snapshot("p1").await.unwrap();
        assert_eq!(snap.counts, vec![0, 0, 0]);

        // First vote lands on option 1
        let snap = store.record_vote("p1", 42, 1).await.unwrap();
        assert_eq!(snap.counts, vec![0, 1, 0]);
        assert_eq!(snap.voters, 1);

        // Switching to option 2 moves the vote instead of double-counting
        let snap = store.record_vote("p1", 42, 2).await.unwrap();
        assert_eq!(snap.counts, vec![0, 0, 1]);
        assert_eq!(snap.voters, 1);

        // Clicking the recorded choice again removes it
        let snap = store.record_vote("p1", 42, 2).await.unwrap();
        assert_eq!(snap.counts, vec![0, 0, 0]);
        assert_eq!(snap.voters, 0);
    }

    #[tokio::test]
    async fn test_single_vote_counts_match_distinct_voters() {
        let store = Store::new();
        store.insert_poll("p1", color_poll(false)).await;

        // A pile of toggles from several voters
        let clicks = [
            (1u64, 0usize),
            (2, 1),
            (3, 1),
            (1, 2),
            (2, 1),
            (3, 0),
            (4, 2),
            (1, 2),
            (1, 0),
        ];
        for (voter, option) in clicks {
            let snap = store.record_vote("p1", voter, option).await.unwrap();
            assert_eq!(snap.counts.iter().sum::<usize>(), snap.voters);
        }
    }

    #[tokio::test]
    async fn test_multi_vote_toggles_membership() {
        let store = Store::new();
        store.insert_poll("p1", color_poll(true)).await;

        store.record_vote("p1", 7, 0).await.unwrap();
        let snap = store.record_vote("p1", 7, 1).await.unwrap();
        assert_eq!(snap.counts, vec![1, 1, 0]);
        assert_eq!(snap.voters, 1);

        let snap = store.record_vote("p1", 7, 0).await.unwrap();
        assert_eq!(snap.counts, vec![0, 1, 0]);
    }

    #[tokio::test]
    async fn test_vote_rejects_bad_input() {
        let store = Store::new();
        store.insert_poll("p1", color_poll(false)).await;

        assert_eq!(
            store.record_vote("p1", 1, 3).await,
            Err(StoreError::OptionOutOfRange(3))
        );
        assert_eq!(
            store.record_vote("ghost", 1, 0).await,
            Err(StoreError::PollNotFound("ghost".to_string()))
        );
    }

    #[tokio::test]
    async fn test_version_advances_per_vote() {
        let store = Store::new();
        store.insert_poll("p1", color_poll(false)).await;

        let first = store.record_vote("p1", 1, 0).await.unwrap();
        let second = store.record_vote("p1", 2, 0).await.unwrap();
        assert!(second.version > first.version);
    }
}
