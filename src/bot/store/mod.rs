use std::collections::{HashMap, VecDeque};

use tokio::sync::Mutex;

// Exported structs and types
pub use self::game::{Game, GameSnapshot, MoveOutcome, MoveRejection};
pub use self::giveaway::{Giveaway, JoinOutcome};
pub use self::poll::{Poll, PollSnapshot};
pub use self::snipe::SnipeRecord;
pub use self::todo::TodoItem;

// Submodules
mod game;
mod giveaway;
mod karma;
mod poll;
mod quotes;
mod snipe;
mod todo;

/* Store is the single home of all transient bot state.
 * It is constructed once at startup and handed to every handler; nothing
 * survives a restart. Every mutation runs to completion inside one lock
 * with no suspension point, so a record can never be observed mid-change
 * and handlers never write back a stale working copy.
 */

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("no active poll with id {0}")]
    PollNotFound(String),
    #[error("option {0} is out of range")]
    OptionOutOfRange(usize),
    #[error("no active game with id {0}")]
    GameNotFound(String),
    #[error("cell {0} is off the board")]
    CellOutOfRange(usize),
    #[error("no active giveaway with id {0}")]
    GiveawayNotFound(String),
    #[error("no todo item numbered {0}")]
    TodoNotFound(usize),
    #[error("todo item {0} is already done")]
    TodoAlreadyDone(usize),
}

pub struct Store {
    polls: Mutex<HashMap<String, Poll>>,
    games: Mutex<HashMap<String, Game>>,
    giveaways: Mutex<HashMap<String, Giveaway>>,
    quotes: Mutex<HashMap<u64, Vec<String>>>,
    todos: Mutex<HashMap<u64, Vec<TodoItem>>>,
    karma: Mutex<HashMap<u64, HashMap<u64, i64>>>,
    recent: Mutex<HashMap<u64, VecDeque<snipe::RecentMessage>>>,
    snipes: Mutex<HashMap<u64, SnipeRecord>>,
}

impl Store {
    pub fn new() -> Store {
        Store {
            polls: Mutex::new(HashMap::new()),
            games: Mutex::new(HashMap::new()),
            giveaways: Mutex::new(HashMap::new()),
            quotes: Mutex::new(HashMap::new()),
            todos: Mutex::new(HashMap::new()),
            karma: Mutex::new(HashMap::new()),
            recent: Mutex::new(HashMap::new()),
            snipes: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for Store {
    fn default() -> Store {
        Store::new()
    }
}
