use serenity::all::{CommandInteraction, Context};

use crate::bot::processor;
use crate::bot::store::Store;

use super::utils::{respond_ephemeral, respond_text, HandlerResult};

/* Snipe command.
 * Replays the channel's most recently deleted message, if the deletion
 * happened while that message was still in the recent window.
 */
pub async fn action_snipe(
    ctx: &Context,
    store: &Store,
    interaction: &CommandInteraction,
) -> HandlerResult {
    let channel_id = interaction.channel_id.get();

    match processor::snipe(store, channel_id).await {
        Some(record) => {
            respond_text(
                ctx,
                interaction,
                format!(
                    "🎯 **{}** said <t:{}:R>:\n{}",
                    record.author_name,
                    record.deleted_at.timestamp(),
                    record.content
                ),
            )
            .await
        }
        None => respond_ephemeral(ctx, interaction, "There's nothing to snipe here! 🔍").await,
    }
}
