use std::sync::Arc;
use std::time::Duration;

use serenity::all::{
    ButtonStyle, ChannelId, CommandInteraction, ComponentInteraction, Context, CreateActionRow,
    CreateButton, CreateInteractionResponse, CreateInteractionResponseMessage, EditMessage, Http,
    MessageId,
};

use crate::bot::dispatcher::BotError;
use crate::bot::games::Mark;
use crate::bot::processor::{self, ProcessError};
use crate::bot::scheduler::Scheduler;
use crate::bot::session::ComponentId;
use crate::bot::store::{GameSnapshot, MoveOutcome, MoveRejection, Store, StoreError};

use super::utils::{mention, respond_component_ephemeral, user_option, HandlerResult};

/* Tic-tac-toe handlers.
 * The board is a 3x3 button grid on a single message; each move edits it
 * in place. A game that reaches a win or tie is freed immediately and its
 * idle timer is cancelled; a game nobody finishes is closed out by the
 * timer instead.
 */

const IDLE_TIMEOUT: Duration = Duration::from_secs(300);

fn timer_key(game_id: &str) -> String {
    format!("ttt:{}", game_id)
}

fn game_grid(game_id: &str, snapshot: &GameSnapshot, finished: bool) -> Vec<CreateActionRow> {
    let mut rows = Vec::new();
    for row in 0..3 {
        let mut buttons = Vec::new();
        for col in 0..3 {
            let cell = row * 3 + col;
            let id = ComponentId::GameMove {
                game_id: game_id.to_string(),
                cell,
            };
            let button = match snapshot.board[cell] {
                Some(mark) => CreateButton::new(id.encode())
                    .label(mark.symbol())
                    .style(ButtonStyle::Secondary)
                    .disabled(true),
                None => CreateButton::new(id.encode())
                    .label("·")
                    .style(ButtonStyle::Secondary)
                    .disabled(finished),
            };
            buttons.push(button);
        }
        rows.push(CreateActionRow::Buttons(buttons));
    }
    rows
}

fn render_header(snapshot: &GameSnapshot) -> String {
    format!(
        "❌ {} vs ⭕ {}",
        mention(snapshot.player_x),
        mention(snapshot.player_o)
    )
}

fn render_game(snapshot: &GameSnapshot, status: &str) -> String {
    format!("{}\n{}", render_header(snapshot), status)
}

/* Starts a game against the chosen opponent. */
pub async fn action_tictactoe(
    ctx: &Context,
    store: &Arc<Store>,
    scheduler: &Arc<Scheduler>,
    interaction: &CommandInteraction,
) -> HandlerResult {
    let options = interaction.data.options();
    let opponent = user_option(&options, "opponent")
        .ok_or_else(|| BotError::UserError("Please pick an opponent!".to_string()))?;

    if opponent.id == interaction.user.id {
        return Err(BotError::UserError(
            "Playing against yourself sounds lonely... pick someone else! 🙃".to_string(),
        ));
    }
    if opponent.bot {
        return Err(BotError::UserError(
            "Bots are notoriously bad at tic-tac-toe. Pick a human! 🤖".to_string(),
        ));
    }

    let channel_id = interaction.channel_id.get();
    let player_x = interaction.user.id.get();
    let player_o = opponent.id.get();
    let game_id = processor::create_game(store, channel_id, player_x, player_o).await;

    let snapshot = GameSnapshot {
        player_x,
        player_o,
        turn: Mark::X,
        board: [None; 9],
        channel_id,
        message_id: None,
    };
    let status = format!("{} goes first!", mention(player_x));
    let message = CreateInteractionResponseMessage::new()
        .content(render_game(&snapshot, &status))
        .components(game_grid(&game_id, &snapshot, false));
    interaction
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await?;

    // Close out the board if nobody finishes the game
    scheduler
        .schedule(
            &timer_key(&game_id),
            IDLE_TIMEOUT,
            expire_game(Arc::clone(&ctx.http), Arc::clone(store), game_id.clone()),
        )
        .await;

    let posted = interaction.get_response(&ctx.http).await?;
    processor::attach_game_message(store, &game_id, posted.id.get()).await?;

    log::info!(
        "TicTacToe Creation - game {} between {} and {} in channel {}",
        game_id,
        player_x,
        player_o,
        channel_id
    );
    Ok(())
}

/* Applies one move click. Rejections answer the clicker privately and
 * leave the board untouched.
 */
pub async fn action_tictactoe_move(
    ctx: &Context,
    store: &Store,
    scheduler: &Scheduler,
    interaction: &ComponentInteraction,
    game_id: &str,
    cell: usize,
) -> HandlerResult {
    let user = interaction.user.id.get();

    let outcome = match processor::place_mark(store, game_id, user, cell).await {
        Ok(outcome) => outcome,
        Err(ProcessError::StoreError(StoreError::GameNotFound(_))) => {
            return respond_component_ephemeral(ctx, interaction, "😴 This game is already over!")
                .await;
        }
        Err(err) => return Err(err.into()),
    };

    match outcome {
        MoveOutcome::Rejected(rejection) => {
            let text = match rejection {
                MoveRejection::NotAParticipant => "You're not playing in this game! 👀",
                MoveRejection::NotYourTurn => "Hold on, it's not your turn yet!",
                MoveRejection::CellOccupied => "That cell is already taken!",
            };
            respond_component_ephemeral(ctx, interaction, text).await
        }
        MoveOutcome::Advanced(snapshot) => {
            let next = match snapshot.turn {
                Mark::X => snapshot.player_x,
                Mark::O => snapshot.player_o,
            };
            let status = format!("{}'s turn!", mention(next));
            let message = CreateInteractionResponseMessage::new()
                .content(render_game(&snapshot, &status))
                .components(game_grid(game_id, &snapshot, false));
            interaction
                .create_response(&ctx.http, CreateInteractionResponse::UpdateMessage(message))
                .await?;
            Ok(())
        }
        MoveOutcome::Won { snapshot, winner } => {
            scheduler.cancel(&timer_key(game_id)).await;
            log::info!("TicTacToe Result - game {} won by {}", game_id, winner);

            let status = format!("🎉 {} wins!", mention(winner));
            let message = CreateInteractionResponseMessage::new()
                .content(render_game(&snapshot, &status))
                .components(game_grid(game_id, &snapshot, true));
            interaction
                .create_response(&ctx.http, CreateInteractionResponse::UpdateMessage(message))
                .await?;
            Ok(())
        }
        MoveOutcome::Tied(snapshot) => {
            scheduler.cancel(&timer_key(game_id)).await;
            log::info!("TicTacToe Result - game {} ended in a tie", game_id);

            let message = CreateInteractionResponseMessage::new()
                .content(render_game(&snapshot, "🤝 It's a tie!"))
                .components(game_grid(game_id, &snapshot, true));
            interaction
                .create_response(&ctx.http, CreateInteractionResponse::UpdateMessage(message))
                .await?;
            Ok(())
        }
    }
}

/* Idle-timeout task: frees the session and closes out the board.
 * Best-effort; a board we can no longer edit is just left behind.
 */
async fn expire_game(http: Arc<Http>, store: Arc<Store>, game_id: String) {
    let snapshot = match processor::abandon_game(&store, &game_id).await {
        Some(snapshot) => snapshot,
        None => return,
    };

    log::info!("TicTacToe Timeout - game {} expired unfinished", game_id);

    if let Some(message_id) = snapshot.message_id {
        let edit = EditMessage::new()
            .content(render_game(&snapshot, "⏰ Game timed out."))
            .components(game_grid(&game_id, &snapshot, true));
        let result = ChannelId::new(snapshot.channel_id)
            .edit_message(&http, MessageId::new(message_id), edit)
            .await;
        if let Err(err) = result {
            log::warn!(
                "TicTacToe Timeout - could not close out game {}: {}",
                game_id,
                err
            );
        }
    }
}
