use std::sync::Arc;
use std::time::Duration;

use serenity::all::{ChannelId, CommandInteraction, Context, Http};
use uuid::Uuid;

use crate::bot::dispatcher::BotError;
use crate::bot::scheduler::Scheduler;

use super::utils::{
    format_duration, mention, parse_duration, respond_ephemeral, str_option, HandlerResult,
};

/* Reminder command.
 * Parses a duration, confirms privately, and fires once. Delivery is
 * best-effort: a reminder that can no longer be posted is dropped with a
 * log line, never retried.
 */

const MAX_DELAY: Duration = Duration::from_secs(7 * 24 * 3_600);

pub async fn action_remind(
    ctx: &Context,
    scheduler: &Arc<Scheduler>,
    interaction: &CommandInteraction,
) -> HandlerResult {
    let options = interaction.data.options();
    let delay = parse_duration(str_option(&options, "duration").unwrap_or_default())?;
    let text = str_option(&options, "text")
        .ok_or_else(|| BotError::UserError("Please tell me what to remind you about!".to_string()))?
        .to_string();

    if delay > MAX_DELAY {
        return Err(BotError::UserError(
            "That's too far out! I can only remember things for up to 7 days.".to_string(),
        ));
    }

    let user_id = interaction.user.id.get();
    let channel_id = interaction.channel_id.get();
    let reminder_id = Uuid::new_v4().to_string();

    scheduler
        .schedule(
            &format!("remind:{}", reminder_id),
            delay,
            deliver_reminder(Arc::clone(&ctx.http), channel_id, user_id, text),
        )
        .await;

    log::info!(
        "Reminder Creation - reminder {} for user {} in {}",
        reminder_id,
        user_id,
        format_duration(delay)
    );
    respond_ephemeral(
        ctx,
        interaction,
        format!("⏰ Got it! I'll remind you in {}.", format_duration(delay)),
    )
    .await
}

async fn deliver_reminder(http: Arc<Http>, channel_id: u64, user_id: u64, text: String) {
    let content = format!("⏰ {} Reminder: {}", mention(user_id), text);
    if let Err(err) = ChannelId::new(channel_id).say(&http, content).await {
        log::warn!(
            "Reminder Delivery - could not deliver reminder for user {}: {}",
            user_id,
            err
        );
    }
}
