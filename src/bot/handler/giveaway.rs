use std::sync::Arc;

use chrono::Utc;
use serenity::all::{
    ButtonStyle, ChannelId, CommandInteraction, ComponentInteraction, Context, CreateActionRow,
    CreateButton, CreateInteractionResponse, CreateInteractionResponseMessage, EditMessage, Http,
    MessageId,
};

use crate::bot::dispatcher::BotError;
use crate::bot::processor::{self, ProcessError};
use crate::bot::scheduler::Scheduler;
use crate::bot::session::ComponentId;
use crate::bot::store::{Store, StoreError};

use super::utils::{
    format_duration, mention, parse_duration, respond_component_ephemeral, str_option,
    HandlerResult,
};

/* Giveaway handlers.
 * One message with a join button; entrants accumulate until the close
 * timer fires and draws a winner. Joining is idempotent and answered
 * privately so the giveaway message itself never churns.
 */

const MIN_DURATION: std::time::Duration = std::time::Duration::from_secs(10);

fn timer_key(giveaway_id: &str) -> String {
    format!("giveaway:{}", giveaway_id)
}

fn join_button(giveaway_id: &str, disabled: bool) -> Vec<CreateActionRow> {
    let id = ComponentId::GiveawayJoin {
        giveaway_id: giveaway_id.to_string(),
    };
    vec![CreateActionRow::Buttons(vec![CreateButton::new(id.encode())
        .label("🎉 Join")
        .style(ButtonStyle::Primary)
        .disabled(disabled)])]
}

/* Opens a giveaway and schedules its close. */
pub async fn action_giveaway(
    ctx: &Context,
    store: &Arc<Store>,
    scheduler: &Arc<Scheduler>,
    interaction: &CommandInteraction,
) -> HandlerResult {
    let options = interaction.data.options();
    let prize = str_option(&options, "prize")
        .ok_or_else(|| BotError::UserError("Please tell me what the prize is!".to_string()))?
        .to_string();
    let duration = parse_duration(str_option(&options, "duration").unwrap_or_default())?;
    if duration < MIN_DURATION {
        return Err(BotError::UserError(
            "That's over too fast! Give the giveaway at least 10 seconds.".to_string(),
        ));
    }

    let channel_id = interaction.channel_id.get();
    let ends_at =
        Utc::now() + chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::zero());
    let giveaway_id = processor::create_giveaway(store, channel_id, prize.clone(), ends_at).await;

    let message = CreateInteractionResponseMessage::new()
        .content(format!(
            "🎉 **GIVEAWAY** 🎉\nPrize: **{}**\nEnds <t:{}:R> — click to join!",
            prize,
            ends_at.timestamp()
        ))
        .components(join_button(&giveaway_id, false));
    interaction
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await?;

    scheduler
        .schedule(
            &timer_key(&giveaway_id),
            duration,
            finish_giveaway(Arc::clone(&ctx.http), Arc::clone(store), giveaway_id.clone()),
        )
        .await;

    let posted = interaction.get_response(&ctx.http).await?;
    processor::attach_giveaway_message(store, &giveaway_id, posted.id.get()).await?;

    log::info!(
        "Giveaway Creation - giveaway {} for \"{}\" in channel {}, closing in {}",
        giveaway_id,
        prize,
        channel_id,
        format_duration(duration)
    );
    Ok(())
}

/* Adds the clicker to the entrant set. */
pub async fn action_giveaway_join(
    ctx: &Context,
    store: &Store,
    interaction: &ComponentInteraction,
    giveaway_id: &str,
) -> HandlerResult {
    let user = interaction.user.id.get();

    match processor::join_giveaway(store, giveaway_id, user).await {
        Ok(outcome) if outcome.added => {
            log::info!(
                "Giveaway Join - user {} joined giveaway {} ({} entrants)",
                user,
                giveaway_id,
                outcome.entrants
            );
            respond_component_ephemeral(
                ctx,
                interaction,
                format!("🎉 You're in! {} entrant(s) so far.", outcome.entrants),
            )
            .await
        }
        Ok(_) => {
            respond_component_ephemeral(ctx, interaction, "You're already in! 🤞 Good luck!").await
        }
        Err(ProcessError::StoreError(StoreError::GiveawayNotFound(_))) => {
            respond_component_ephemeral(ctx, interaction, "😴 This giveaway has already ended!")
                .await
        }
        Err(err) => Err(err.into()),
    }
}

/* Close task: draws the winner and announces it.
 * Both the cleanup edit and the announcement are best-effort.
 */
async fn finish_giveaway(http: Arc<Http>, store: Arc<Store>, giveaway_id: String) {
    let closed = match processor::close_giveaway(&store, &giveaway_id).await {
        Ok(closed) => closed,
        Err(err) => {
            log::error!(
                "Giveaway Close - could not close giveaway {}: {}",
                giveaway_id,
                err
            );
            return;
        }
    };

    log::info!(
        "Giveaway Close - giveaway {} closed with {} entrant(s)",
        giveaway_id,
        closed.entrants
    );

    let channel = ChannelId::new(closed.channel_id);

    if let Some(message_id) = closed.message_id {
        let edit = EditMessage::new()
            .content(format!(
                "🎉 **GIVEAWAY ENDED** 🎉\nPrize: **{}**\n{} entrant(s)",
                closed.prize, closed.entrants
            ))
            .components(join_button(&giveaway_id, true));
        if let Err(err) = channel.edit_message(&http, MessageId::new(message_id), edit).await {
            log::warn!(
                "Giveaway Close - could not edit giveaway {} message: {}",
                giveaway_id,
                err
            );
        }
    }

    let announcement = match closed.winner {
        Some(winner) => format!(
            "🥳 Congratulations {} — you won **{}**!",
            mention(winner),
            closed.prize
        ),
        None => format!(
            "😢 Nobody joined the giveaway for **{}**. No winner this time!",
            closed.prize
        ),
    };
    if let Err(err) = channel.say(&http, announcement).await {
        log::warn!(
            "Giveaway Close - could not announce giveaway {} result: {}",
            giveaway_id,
            err
        );
    }
}
