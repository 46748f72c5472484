use serenity::all::{CommandInteraction, Context, Message};

use crate::bot::registry;

use super::utils::{respond_ephemeral, respond_text, HandlerResult};

/* Ping command.
 * The cheapest possible liveness check from inside the chat.
 */
pub async fn action_ping(ctx: &Context, interaction: &CommandInteraction) -> HandlerResult {
    respond_text(ctx, interaction, "Pong! 🏓").await
}

/* Help command.
 * Displays the command catalog to the invoking user only.
 */
pub async fn action_help(ctx: &Context, interaction: &CommandInteraction) -> HandlerResult {
    let mut lines = vec!["⭐️ **My Commands** ⭐️".to_string(), String::new()];
    for (name, description) in registry::summaries() {
        lines.push(format!("`/{}` — {}", name, description));
    }
    lines.push(String::new());
    lines.push("Right-click a user or message for **Karma** and **Add Quote**! ✨".to_string());

    respond_ephemeral(ctx, interaction, lines.join("\n")).await
}

/* Plain-text mention.
 * A message that pings the bot gets a pointer at the help command;
 * everything else stays quiet. Reduces spam.
 */
pub async fn action_mention(ctx: &Context, msg: &Message) -> HandlerResult {
    msg.reply(
        &ctx.http,
        "Hi! 👋 I'm Guildhall. Try `/help` to see what I can do!",
    )
    .await?;
    Ok(())
}
