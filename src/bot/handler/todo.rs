use serenity::all::{
    CommandInteraction, Context, CreateAutocompleteResponse, CreateInteractionResponse,
};

use crate::bot::dispatcher::BotError;
use crate::bot::processor::{self, ProcessError};
use crate::bot::store::{Store, StoreError};

use super::utils::{respond_ephemeral, str_option, subcommand, HandlerResult};

/* Todo handlers.
 * Per-user lists, always answered ephemerally: a todo list is nobody
 * else's business. Completion numbers are offered via autocomplete.
 */

pub async fn action_todo(
    ctx: &Context,
    store: &Store,
    interaction: &CommandInteraction,
) -> HandlerResult {
    let user_id = interaction.user.id.get();
    let options = interaction.data.options();

    match subcommand(&options) {
        Some(("add", inner)) => {
            let text = str_option(inner, "text")
                .ok_or_else(|| BotError::UserError("Please tell me what to add!".to_string()))?
                .to_string();

            let number = processor::add_todo(store, user_id, text.clone()).await;
            respond_ephemeral(
                ctx,
                interaction,
                format!("✍️ Added **{}** as item {}.", text, number),
            )
            .await
        }
        Some(("list", _)) => {
            let items = processor::list_todos(store, user_id).await;
            if items.is_empty() {
                return respond_ephemeral(
                    ctx,
                    interaction,
                    "Your list is empty! Add something with `/todo add`. 🌴",
                )
                .await;
            }

            let lines: Vec<String> = items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let check = if item.done { "✅" } else { "⬜" };
                    format!("{} {}. {}", check, index + 1, item.text)
                })
                .collect();
            respond_ephemeral(ctx, interaction, lines.join("\n")).await
        }
        Some(("done", inner)) => {
            let number = str_option(inner, "item")
                .and_then(|raw| raw.trim().parse::<usize>().ok())
                .ok_or_else(|| {
                    BotError::UserError("Please pick an item from the list!".to_string())
                })?;

            match processor::complete_todo(store, user_id, number).await {
                Ok(text) => {
                    respond_ephemeral(ctx, interaction, format!("✅ Done: **{}**", text)).await
                }
                Err(ProcessError::StoreError(StoreError::TodoNotFound(_))) => Err(
                    BotError::UserError(format!("There's no item {} on your list!", number)),
                ),
                Err(ProcessError::StoreError(StoreError::TodoAlreadyDone(_))) => Err(
                    BotError::UserError(format!("Item {} is already done! 🎉", number)),
                ),
                Err(err) => Err(err.into()),
            }
        }
        _ => Err(BotError::UserError(
            "I don't know that todo subcommand!".to_string(),
        )),
    }
}

/* Autocomplete for /todo done: offers the user's open items, filtered by
 * whatever they have typed so far. Errors here are not user-repliable.
 */
pub async fn autocomplete_todo(
    ctx: &Context,
    store: &Store,
    interaction: &CommandInteraction,
) -> HandlerResult {
    let user_id = interaction.user.id.get();
    let typed = interaction
        .data
        .autocomplete()
        .map(|focused| focused.value.to_lowercase())
        .unwrap_or_default();

    let items = processor::list_todos(store, user_id).await;
    let mut response = CreateAutocompleteResponse::new();
    let mut offered = 0;
    for (index, item) in items.iter().enumerate() {
        if item.done {
            continue;
        }
        let number = index + 1;
        let label = format!("{}. {}", number, item.text);
        if !typed.is_empty()
            && !label.to_lowercase().contains(&typed)
            && !number.to_string().starts_with(&typed)
        {
            continue;
        }

        // Discord shows at most 25 suggestions
        if offered == 25 {
            break;
        }
        offered += 1;

        let mut label = label;
        if label.chars().count() > 100 {
            label = label.chars().take(97).collect::<String>() + "...";
        }
        response = response.add_string_choice(label, number.to_string());
    }

    interaction
        .create_response(&ctx.http, CreateInteractionResponse::Autocomplete(response))
        .await?;
    Ok(())
}
