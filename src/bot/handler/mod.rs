// Exported functions
pub use self::general::{action_help, action_mention, action_ping};
pub use self::giveaway::{action_giveaway, action_giveaway_join};
pub use self::karma::{action_karma, action_karma_user};
pub use self::poll::{action_poll, action_poll_vote};
pub use self::purge::action_purge;
pub use self::quotes::{action_quote, action_quote_message};
pub use self::remind::action_remind;
pub use self::rps::{action_rps, action_rps_choice};
pub use self::snipe::action_snipe;
pub use self::suggest::{action_suggest, action_suggest_submit};
pub use self::tictactoe::{action_tictactoe, action_tictactoe_move};
pub use self::todo::{action_todo, autocomplete_todo};

// Submodules
mod general;
mod giveaway;
mod karma;
mod poll;
mod purge;
mod quotes;
mod remind;
mod rps;
mod snipe;
mod suggest;
mod tictactoe;
mod todo;
mod utils;
