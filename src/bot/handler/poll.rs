use serenity::all::{
    ButtonStyle, CommandInteraction, ComponentInteraction, Context, CreateActionRow, CreateButton,
    CreateInteractionResponse, CreateInteractionResponseMessage,
};

use crate::bot::processor::{self, ProcessError};
use crate::bot::session::ComponentId;
use crate::bot::store::{PollSnapshot, Store, StoreError};

use super::utils::{
    bool_option, make_button_rows, parse_poll_options, respond_component_ephemeral, str_option,
    HandlerResult,
};
use crate::bot::dispatcher::BotError;

/* Poll handlers.
 * A poll is one message with one button per option; every vote click
 * re-renders the same message in place. Polls have no terminal state,
 * they are simply abandoned.
 */

const BUTTON_COLUMNS: usize = 5;

fn render_poll(snapshot: &PollSnapshot) -> String {
    let mut lines = vec![format!("📊 **{}**", snapshot.question), String::new()];
    for (label, count) in snapshot.options.iter().zip(snapshot.counts.iter()) {
        lines.push(format!("🔹 {} — **{}**", label, count));
    }
    lines.push(String::new());

    let mode = if snapshot.multi {
        " · multiple choices allowed"
    } else {
        ""
    };
    lines.push(format!("{} voter(s){}", snapshot.voters, mode));
    lines.join("\n")
}

fn poll_buttons(poll_id: &str, snapshot: &PollSnapshot) -> Vec<CreateActionRow> {
    let buttons = snapshot
        .options
        .iter()
        .enumerate()
        .map(|(option, label)| {
            let id = ComponentId::PollVote {
                poll_id: poll_id.to_string(),
                option,
            };
            CreateButton::new(id.encode())
                .label(label)
                .style(ButtonStyle::Secondary)
        })
        .collect();
    make_button_rows(buttons, BUTTON_COLUMNS)
}

/* Creates a poll from the command options and posts it. */
pub async fn action_poll(
    ctx: &Context,
    store: &Store,
    interaction: &CommandInteraction,
) -> HandlerResult {
    let options = interaction.data.options();
    let question = str_option(&options, "question")
        .ok_or_else(|| BotError::UserError("Please give me a question to ask!".to_string()))?
        .to_string();
    let choices = parse_poll_options(str_option(&options, "options").unwrap_or_default())?;
    let multi = bool_option(&options, "multi").unwrap_or(false);

    let channel_id = interaction.channel_id.get();
    let (poll_id, snapshot) =
        processor::create_poll(store, channel_id, question, choices, multi).await;

    let message = CreateInteractionResponseMessage::new()
        .content(render_poll(&snapshot))
        .components(poll_buttons(&poll_id, &snapshot));
    interaction
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await?;

    // Remember which message renders this poll
    let posted = interaction.get_response(&ctx.http).await?;
    processor::attach_poll_message(store, &poll_id, posted.id.get()).await?;

    log::info!(
        "Poll Creation - poll {} with {} options created in channel {}",
        poll_id,
        snapshot.options.len(),
        channel_id
    );
    Ok(())
}

/* Applies one vote click and re-renders the poll message. */
pub async fn action_poll_vote(
    ctx: &Context,
    store: &Store,
    interaction: &ComponentInteraction,
    poll_id: &str,
    option: usize,
) -> HandlerResult {
    let voter = interaction.user.id.get();

    match processor::record_vote(store, poll_id, voter, option).await {
        Ok(snapshot) => {
            log::info!(
                "Poll Vote - voter {} toggled option {} on poll {} (version {})",
                voter,
                option,
                poll_id,
                snapshot.version
            );

            let message = CreateInteractionResponseMessage::new()
                .content(render_poll(&snapshot))
                .components(poll_buttons(poll_id, &snapshot));
            interaction
                .create_response(&ctx.http, CreateInteractionResponse::UpdateMessage(message))
                .await?;
            Ok(())
        }
        // A poll lost to a restart is stale UI, not a bot failure
        Err(ProcessError::StoreError(StoreError::PollNotFound(_))) => {
            respond_component_ephemeral(
                ctx,
                interaction,
                "😴 Sorry, I'm no longer tracking this poll!",
            )
            .await
        }
        Err(err) => Err(err.into()),
    }
}
