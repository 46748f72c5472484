use serenity::all::{CommandInteraction, Context};

use crate::bot::dispatcher::BotError;
use crate::bot::processor;
use crate::bot::store::Store;

use super::utils::{respond_ephemeral, respond_text, str_option, subcommand, HandlerResult};

/* Quote handlers.
 * A per-guild, append-only list: save lines with the slash command or the
 * "Add Quote" context entry, pull one back out with /quote random.
 */

fn guild_of(interaction: &CommandInteraction) -> Result<u64, BotError> {
    interaction
        .guild_id
        .map(|guild| guild.get())
        .ok_or_else(|| BotError::UserError("Quotes only work inside a server!".to_string()))
}

/* Slash command with add/random subcommands. */
pub async fn action_quote(
    ctx: &Context,
    store: &Store,
    interaction: &CommandInteraction,
) -> HandlerResult {
    let guild_id = guild_of(interaction)?;
    let options = interaction.data.options();

    match subcommand(&options) {
        Some(("add", inner)) => {
            let text = str_option(inner, "text")
                .ok_or_else(|| BotError::UserError("Please give me a quote to save!".to_string()))?
                .to_string();

            let number = processor::add_quote(store, guild_id, text).await;
            log::info!("Quote Add - quote #{} saved for guild {}", number, guild_id);
            respond_text(ctx, interaction, format!("📝 Quote #{} saved!", number)).await
        }
        Some(("random", _)) => match processor::random_quote(store, guild_id).await {
            Some(quote) => respond_text(ctx, interaction, format!("💬 {}", quote)).await,
            None => {
                respond_ephemeral(
                    ctx,
                    interaction,
                    "There are no quotes yet! Save one with `/quote add`.",
                )
                .await
            }
        },
        _ => Err(BotError::UserError(
            "I don't know that quote subcommand!".to_string(),
        )),
    }
}

/* "Add Quote" message context command. */
pub async fn action_quote_message(
    ctx: &Context,
    store: &Store,
    interaction: &CommandInteraction,
) -> HandlerResult {
    let guild_id = guild_of(interaction)?;

    let quoted = interaction
        .data
        .target_id
        .map(|target| target.to_message_id())
        .and_then(|message_id| interaction.data.resolved.messages.get(&message_id));
    let quoted = match quoted {
        Some(message) if !message.content.trim().is_empty() => message,
        _ => {
            return Err(BotError::UserError(
                "That message has no text I can quote!".to_string(),
            ))
        }
    };

    let text = format!("\"{}\" — {}", quoted.content.trim(), quoted.author.name);
    let number = processor::add_quote(store, guild_id, text).await;

    log::info!(
        "Quote Add - quote #{} captured from message {} in guild {}",
        number,
        quoted.id,
        guild_id
    );
    respond_ephemeral(ctx, interaction, format!("📝 Saved as quote #{}!", number)).await
}
