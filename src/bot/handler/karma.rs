use serenity::all::{CommandInteraction, Context};

use crate::bot::dispatcher::BotError;
use crate::bot::processor;
use crate::bot::store::Store;

use super::utils::{int_option, mention, respond_ephemeral, respond_text, user_option, HandlerResult};

/* Karma handlers.
 * A per-guild score table. Deltas are capped and self-votes rejected;
 * the "Karma" user context entry reads a score without touching it.
 */

const MAX_DELTA: i64 = 10;

fn guild_of(interaction: &CommandInteraction) -> Result<u64, BotError> {
    interaction
        .guild_id
        .map(|guild| guild.get())
        .ok_or_else(|| BotError::UserError("Karma only works inside a server!".to_string()))
}

/* Slash command: /karma user points. */
pub async fn action_karma(
    ctx: &Context,
    store: &Store,
    interaction: &CommandInteraction,
) -> HandlerResult {
    let guild_id = guild_of(interaction)?;
    let options = interaction.data.options();

    let target = user_option(&options, "user")
        .ok_or_else(|| BotError::UserError("Please pick someone to give karma to!".to_string()))?;
    let delta = int_option(&options, "points")
        .ok_or_else(|| BotError::UserError("Please give me a number of points!".to_string()))?;

    if target.id == interaction.user.id {
        return Err(BotError::UserError(
            "Nice try, but you can't give yourself karma! 😏".to_string(),
        ));
    }
    if delta == 0 || delta.abs() > MAX_DELTA {
        return Err(BotError::UserError(format!(
            "Points must be between -{} and {} (and not zero).",
            MAX_DELTA, MAX_DELTA
        )));
    }

    let score = processor::give_karma(store, guild_id, target.id.get(), delta).await;
    log::info!(
        "Karma Give - {} gave {} points to {} in guild {} (now {})",
        interaction.user.id,
        delta,
        target.id,
        guild_id,
        score
    );

    let verb = if delta > 0 { "Gave" } else { "Took" };
    respond_text(
        ctx,
        interaction,
        format!(
            "{} {} karma: {} now has **{}**! ✨",
            verb,
            delta.abs(),
            mention(target.id.get()),
            score
        ),
    )
    .await
}

/* "Karma" user context command: a read-only peek. */
pub async fn action_karma_user(
    ctx: &Context,
    store: &Store,
    interaction: &CommandInteraction,
) -> HandlerResult {
    let guild_id = guild_of(interaction)?;

    let target = interaction
        .data
        .target_id
        .map(|target| target.to_user_id())
        .ok_or_else(|| BotError::UserError("I couldn't tell who you clicked on!".to_string()))?;

    let score = processor::get_karma(store, guild_id, target.get()).await;
    respond_ephemeral(
        ctx,
        interaction,
        format!("{} has **{}** karma. ✨", mention(target.get()), score),
    )
    .await
}
