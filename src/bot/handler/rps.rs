use rand::Rng;
use serenity::all::{
    ButtonStyle, CommandInteraction, ComponentInteraction, Context, CreateButton,
    CreateInteractionResponse, CreateInteractionResponseMessage,
};

use crate::bot::games::{duel, Choice, Duel};
use crate::bot::session::ComponentId;

use super::utils::{
    make_button_rows, mention, respond_component_ephemeral, user_option, HandlerResult,
};

/* Rock-paper-scissors handlers.
 * Single-shot: the whole session lives inside the button payloads, so
 * there is nothing to store and nothing to time out. The challenger's
 * click resolves the match against a random counter-choice on the spot.
 */

/* Posts the three choice buttons. The opponent defaults to the bot. */
pub async fn action_rps(ctx: &Context, interaction: &CommandInteraction) -> HandlerResult {
    let bot_id = { ctx.cache.current_user().id.get() };
    let options = interaction.data.options();
    let challenger = interaction.user.id.get();
    let opponent = user_option(&options, "opponent").map_or(bot_id, |user| user.id.get());

    let buttons = Choice::ALL
        .iter()
        .map(|&choice| {
            let id = ComponentId::RpsChoice {
                challenger,
                opponent,
                choice,
            };
            CreateButton::new(id.encode())
                .label(choice.label())
                .style(ButtonStyle::Primary)
        })
        .collect();

    let message = CreateInteractionResponseMessage::new()
        .content(format!(
            "⚔️ Rock, paper, scissors! {} — make your choice!",
            mention(challenger)
        ))
        .components(make_button_rows(buttons, 3));
    interaction
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await?;
    Ok(())
}

/* Resolves the match on the challenger's click. */
pub async fn action_rps_choice(
    ctx: &Context,
    interaction: &ComponentInteraction,
    challenger: u64,
    opponent: u64,
    choice: Choice,
) -> HandlerResult {
    if interaction.user.id.get() != challenger {
        return respond_component_ephemeral(ctx, interaction, "This isn't your duel! ⚔️").await;
    }

    let counter = Choice::ALL[rand::thread_rng().gen_range(0..Choice::ALL.len())];
    let verdict = match duel(choice, counter) {
        Duel::ChallengerWins => format!("{} wins! 🎉", mention(challenger)),
        Duel::OpponentWins => format!("{} wins! 🎉", mention(opponent)),
        Duel::Draw => "It's a draw! 🤝".to_string(),
    };

    log::info!(
        "Rps Result - {} played {} against {} ({})",
        challenger,
        choice.as_str(),
        opponent,
        counter.as_str()
    );

    let message = CreateInteractionResponseMessage::new()
        .content(format!(
            "{} chose {} · {} chose {}\n{}",
            mention(challenger),
            choice.label(),
            mention(opponent),
            counter.label(),
            verdict
        ))
        .components(Vec::new());
    interaction
        .create_response(&ctx.http, CreateInteractionResponse::UpdateMessage(message))
        .await?;
    Ok(())
}
