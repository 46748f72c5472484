use serenity::all::{CommandInteraction, Context, GetMessages};

use crate::bot::dispatcher::BotError;

use super::utils::{int_option, respond_ephemeral, HandlerResult};

/* Purge command.
 * Bulk-deletes up to 100 recent messages from the channel. Permission is
 * enforced platform-side (Manage Messages), so by the time this runs the
 * invoker is allowed to do it.
 */
pub async fn action_purge(ctx: &Context, interaction: &CommandInteraction) -> HandlerResult {
    let options = interaction.data.options();
    let count = int_option(&options, "count")
        .filter(|count| (1..=100).contains(count))
        .ok_or_else(|| {
            BotError::UserError("Please give me a count between 1 and 100!".to_string())
        })? as u8;

    let messages = interaction
        .channel_id
        .messages(&ctx.http, GetMessages::new().limit(count))
        .await?;

    let deleted = messages.len();
    match deleted {
        0 => {}
        // The bulk-delete endpoint refuses a single message
        1 => {
            interaction
                .channel_id
                .delete_message(&ctx.http, messages[0].id)
                .await?;
        }
        _ => {
            let ids: Vec<_> = messages.iter().map(|message| message.id).collect();
            interaction
                .channel_id
                .delete_messages(&ctx.http, ids)
                .await?;
        }
    }

    log::info!(
        "Purge - {} message(s) deleted in channel {} by {}",
        deleted,
        interaction.channel_id,
        interaction.user.id
    );
    respond_ephemeral(ctx, interaction, format!("🧹 Deleted {} message(s)!", deleted)).await
}
