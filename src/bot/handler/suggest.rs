use serenity::all::{
    ActionRowComponent, CommandInteraction, Context, CreateActionRow, CreateInputText,
    CreateInteractionResponse, CreateInteractionResponseMessage, CreateModal, InputTextStyle,
    ModalInteraction,
};
use uuid::Uuid;

use crate::bot::dispatcher::BotError;
use crate::bot::session::ComponentId;

use super::utils::{mention, HandlerResult};

/* Suggestion handlers.
 * The command opens a modal; the submission is posted to the channel so
 * the community can see (and argue about) it.
 */

pub async fn action_suggest(ctx: &Context, interaction: &CommandInteraction) -> HandlerResult {
    let id = ComponentId::Suggestion {
        session_id: Uuid::new_v4().to_string(),
    };

    let modal = CreateModal::new(id.encode(), "Make a suggestion").components(vec![
        CreateActionRow::InputText(
            CreateInputText::new(InputTextStyle::Short, "Title", "title")
                .placeholder("One line summary")
                .required(true),
        ),
        CreateActionRow::InputText(
            CreateInputText::new(InputTextStyle::Paragraph, "Details", "details")
                .placeholder("Tell us more (optional)")
                .required(false),
        ),
    ]);

    interaction
        .create_response(&ctx.http, CreateInteractionResponse::Modal(modal))
        .await?;
    Ok(())
}

fn field_value(interaction: &ModalInteraction, custom_id: &str) -> Option<String> {
    for row in &interaction.data.components {
        for component in &row.components {
            if let ActionRowComponent::InputText(input) = component {
                if input.custom_id == custom_id {
                    return input.value.clone().filter(|value| !value.trim().is_empty());
                }
            }
        }
    }
    None
}

/* Posts a submitted suggestion. */
pub async fn action_suggest_submit(ctx: &Context, interaction: &ModalInteraction) -> HandlerResult {
    let title = field_value(interaction, "title").ok_or_else(|| {
        BotError::UserError("Your suggestion needs at least a title!".to_string())
    })?;

    let mut content = format!(
        "💡 **Suggestion** from {}\n**{}**",
        mention(interaction.user.id.get()),
        title.trim()
    );
    if let Some(details) = field_value(interaction, "details") {
        content.push('\n');
        content.push_str(details.trim());
    }

    log::info!(
        "Suggestion Submission - suggestion from user {} in channel {}",
        interaction.user.id,
        interaction.channel_id
    );

    let message = CreateInteractionResponseMessage::new().content(content);
    interaction
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await?;
    Ok(())
}
