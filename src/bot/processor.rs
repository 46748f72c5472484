use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use super::store::{
    Game, GameSnapshot, Giveaway, JoinOutcome, MoveOutcome, Poll, PollSnapshot, SnipeRecord, Store,
    StoreError, TodoItem,
};

/* Processor is the logic center of the bot.
 * It sits between the front-facing handlers and the store: it generates
 * session keys, applies transitions, and draws random outcomes. Handlers
 * never touch the store directly, so every operation here is testable
 * without a gateway connection.
 */

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ProcessError {
    #[error("{0}")]
    StoreError(StoreError),
}

impl From<StoreError> for ProcessError {
    fn from(store_error: StoreError) -> ProcessError {
        ProcessError::StoreError(store_error)
    }
}

fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/* Poll operations */

pub async fn create_poll(
    store: &Store,
    channel_id: u64,
    question: String,
    options: Vec<String>,
    multi: bool,
) -> (String, PollSnapshot) {
    let poll_id = new_session_id();
    let poll = Poll::new(question, options, multi, channel_id);
    let snapshot = PollSnapshot {
        question: poll.question.clone(),
        options: poll.options.clone(),
        counts: vec![0; poll.options.len()],
        voters: 0,
        multi: poll.multi,
        version: 0,
    };
    store.insert_poll(&poll_id, poll).await;
    (poll_id, snapshot)
}

pub async fn record_vote(
    store: &Store,
    poll_id: &str,
    voter: u64,
    option: usize,
) -> Result<PollSnapshot, ProcessError> {
    Ok(store.record_vote(poll_id, voter, option).await?)
}

pub async fn attach_poll_message(
    store: &Store,
    poll_id: &str,
    message_id: u64,
) -> Result<(), ProcessError> {
    Ok(store.attach_poll_message(poll_id, message_id).await?)
}

/* Tic-tac-toe operations */

pub async fn create_game(store: &Store, channel_id: u64, player_x: u64, player_o: u64) -> String {
    let game_id = new_session_id();
    store
        .insert_game(&game_id, Game::new(player_x, player_o, channel_id))
        .await;
    game_id
}

pub async fn place_mark(
    store: &Store,
    game_id: &str,
    user: u64,
    cell: usize,
) -> Result<MoveOutcome, ProcessError> {
    Ok(store.apply_move(game_id, user, cell).await?)
}

pub async fn attach_game_message(
    store: &Store,
    game_id: &str,
    message_id: u64,
) -> Result<(), ProcessError> {
    Ok(store.attach_game_message(game_id, message_id).await?)
}

// Frees an idle game so its board can be closed out. None if it already ended.
pub async fn abandon_game(store: &Store, game_id: &str) -> Option<GameSnapshot> {
    store.remove_game(game_id).await
}

/* Giveaway operations */

pub struct ClosedGiveaway {
    pub prize: String,
    pub winner: Option<u64>,
    pub entrants: usize,
    pub channel_id: u64,
    pub message_id: Option<u64>,
}

pub async fn create_giveaway(
    store: &Store,
    channel_id: u64,
    prize: String,
    ends_at: DateTime<Utc>,
) -> String {
    let giveaway_id = new_session_id();
    store
        .insert_giveaway(&giveaway_id, Giveaway::new(prize, ends_at, channel_id))
        .await;
    giveaway_id
}

pub async fn join_giveaway(
    store: &Store,
    giveaway_id: &str,
    user: u64,
) -> Result<JoinOutcome, ProcessError> {
    Ok(store.join_giveaway(giveaway_id, user).await?)
}

pub async fn attach_giveaway_message(
    store: &Store,
    giveaway_id: &str,
    message_id: u64,
) -> Result<(), ProcessError> {
    Ok(store
        .attach_giveaway_message(giveaway_id, message_id)
        .await?)
}

/* Closes a giveaway and draws a uniformly random winner from the entrant
 * set, or none if nobody joined. The session is freed either way.
 */
pub async fn close_giveaway(
    store: &Store,
    giveaway_id: &str,
) -> Result<ClosedGiveaway, ProcessError> {
    let giveaway = store
        .take_giveaway(giveaway_id)
        .await
        .ok_or_else(|| StoreError::GiveawayNotFound(giveaway_id.to_string()))?;

    let winner = if giveaway.entrants.is_empty() {
        None
    } else {
        let index = rand::thread_rng().gen_range(0..giveaway.entrants.len());
        giveaway.entrants.iter().nth(index).copied()
    };

    Ok(ClosedGiveaway {
        prize: giveaway.prize,
        winner,
        entrants: giveaway.entrants.len(),
        channel_id: giveaway.channel_id,
        message_id: giveaway.message_id,
    })
}

/* Quote operations */

pub async fn add_quote(store: &Store, guild_id: u64, text: String) -> usize {
    store.add_quote(guild_id, text).await
}

// Picks a uniformly random quote. Safe against a concurrent add: the list
// only ever grows, so an index drawn from the count stays valid.
pub async fn random_quote(store: &Store, guild_id: u64) -> Option<String> {
    let count = store.quote_count(guild_id).await;
    if count == 0 {
        return None;
    }
    let index = rand::thread_rng().gen_range(0..count);
    store.quote_at(guild_id, index).await
}

/* Todo operations */

pub async fn add_todo(store: &Store, user_id: u64, text: String) -> usize {
    store.add_todo(user_id, text).await
}

pub async fn list_todos(store: &Store, user_id: u64) -> Vec<TodoItem> {
    store.todos(user_id).await
}

pub async fn complete_todo(
    store: &Store,
    user_id: u64,
    number: usize,
) -> Result<String, ProcessError> {
    Ok(store.complete_todo(user_id, number).await?)
}

/* Karma operations */

pub async fn give_karma(store: &Store, guild_id: u64, user_id: u64, delta: i64) -> i64 {
    store.give_karma(guild_id, user_id, delta).await
}

pub async fn get_karma(store: &Store, guild_id: u64, user_id: u64) -> i64 {
    store.karma_of(guild_id, user_id).await
}

/* Snipe operations */

pub async fn remember_message(
    store: &Store,
    channel_id: u64,
    message_id: u64,
    author_id: u64,
    author_name: String,
    content: String,
) {
    store
        .remember_message(channel_id, message_id, author_id, author_name, content)
        .await
}

pub async fn capture_deleted(
    store: &Store,
    channel_id: u64,
    message_id: u64,
) -> Option<SnipeRecord> {
    store.capture_deleted(channel_id, message_id).await
}

pub async fn snipe(store: &Store, channel_id: u64) -> Option<SnipeRecord> {
    store.last_deleted(channel_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_poll_starts_at_zero() {
        let store = Store::new();
        let options = vec!["Red".to_string(), "Blue".to_string(), "Green".to_string()];
        let (poll_id, snapshot) =
            create_poll(&store, 1, "Best color?".to_string(), options, false).await;

        assert_eq!(snapshot.counts, vec![0, 0, 0]);
        assert_eq!(snapshot.voters, 0);

        // The session key routes back to the stored record
        let snapshot = record_vote(&store, &poll_id, 42, 1).await.unwrap();
        assert_eq!(snapshot.counts, vec![0, 1, 0]);
    }

    #[tokio::test]
    async fn test_giveaway_winner_is_an_entrant() {
        for _ in 0..20 {
            let store = Store::new();
            let id = create_giveaway(&store, 1, "prize".to_string(), Utc::now()).await;
            join_giveaway(&store, &id, 5).await.unwrap();
            join_giveaway(&store, &id, 6).await.unwrap();
            join_giveaway(&store, &id, 7).await.unwrap();

            let closed = close_giveaway(&store, &id).await.unwrap();
            assert!([5, 6, 7].contains(&closed.winner.unwrap()));
            assert_eq!(closed.entrants, 3);
        }
    }

    #[tokio::test]
    async fn test_empty_giveaway_has_no_winner() {
        let store = Store::new();
        let id = create_giveaway(&store, 1, "prize".to_string(), Utc::now()).await;

        let closed = close_giveaway(&store, &id).await.unwrap();
        assert_eq!(closed.winner, None);
        assert_eq!(closed.entrants, 0);

        // Closing twice fails: the session was freed
        assert!(close_giveaway(&store, &id).await.is_err());
    }

    #[tokio::test]
    async fn test_random_quote_comes_from_the_list() {
        let store = Store::new();
        assert_eq!(random_quote(&store, 1).await, None);

        add_quote(&store, 1, "alpha".to_string()).await;
        add_quote(&store, 1, "beta".to_string()).await;

        for _ in 0..10 {
            let quote = random_quote(&store, 1).await.unwrap();
            assert!(quote == "alpha" || quote == "beta");
        }
    }
}
