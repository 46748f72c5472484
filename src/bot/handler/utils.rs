use std::time::Duration;

use regex::Regex;
use serenity::all::{
    CommandInteraction, ComponentInteraction, Context, CreateActionRow, CreateButton,
    CreateInteractionResponse, CreateInteractionResponseMessage, ResolvedOption, ResolvedValue,
    User,
};

pub use crate::bot::dispatcher::HandlerResult;
use crate::bot::dispatcher::BotError;

/* Common utilities for handlers. */

// Chunks buttons into action rows of the given width.
pub fn make_button_rows(buttons: Vec<CreateButton>, columns: usize) -> Vec<CreateActionRow> {
    let mut rows: Vec<CreateActionRow> = Vec::new();
    let mut row: Vec<CreateButton> = Vec::new();
    for button in buttons {
        row.push(button);
        if row.len() == columns {
            rows.push(CreateActionRow::Buttons(std::mem::take(&mut row)));
        }
    }
    if !row.is_empty() {
        rows.push(CreateActionRow::Buttons(row));
    }
    rows
}

/* Parses a duration like "1h30m" or "45s" into a Duration.
 * Recognized units: d, h, m, s. A string without a single recognized
 * unit token is invalid.
 */
pub fn parse_duration(text: &str) -> Result<Duration, BotError> {
    let pattern = Regex::new(r"(\d+)\s*([dhms])").unwrap();

    let mut total_ms: u64 = 0;
    let mut matched = false;
    for capture in pattern.captures_iter(text) {
        let value = match capture[1].parse::<u64>() {
            Ok(value) => value,
            Err(_) => continue,
        };
        let unit_ms: u64 = match &capture[2] {
            "d" => 86_400_000,
            "h" => 3_600_000,
            "m" => 60_000,
            _ => 1_000,
        };
        total_ms = total_ms.saturating_add(value.saturating_mul(unit_ms));
        matched = true;
    }

    if !matched {
        return Err(BotError::UserError(
            "I couldn't read that duration! Try something like `10m` or `1h30m`.".to_string(),
        ));
    }
    if total_ms == 0 {
        return Err(BotError::UserError(
            "That duration is zero! Try something like `10m` or `1h30m`.".to_string(),
        ));
    }
    Ok(Duration::from_millis(total_ms))
}

// Renders a duration back into the "1h 30m" form used in replies.
pub fn format_duration(duration: Duration) -> String {
    let mut secs = duration.as_secs();
    let days = secs / 86_400;
    secs %= 86_400;
    let hours = secs / 3_600;
    secs %= 3_600;
    let minutes = secs / 60;
    secs %= 60;

    let mut parts: Vec<String> = Vec::new();
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{}s", secs));
    }
    parts.join(" ")
}

/* Parses a semicolon-separated option list for a poll.
 * Blank entries are dropped; a usable poll needs 2 to 10 options.
 */
pub fn parse_poll_options(text: &str) -> Result<Vec<String>, BotError> {
    let options: Vec<String> = text
        .split(';')
        .map(str::trim)
        .filter(|option| !option.is_empty())
        .map(str::to_string)
        .collect();

    if options.len() < 2 {
        return Err(BotError::UserError(
            "A poll needs at least two options! Separate them with `;`.".to_string(),
        ));
    }
    if options.len() > 10 {
        return Err(BotError::UserError(
            "That's too many options! I can handle up to 10.".to_string(),
        ));
    }
    if let Some(long) = options.iter().find(|option| option.chars().count() > 80) {
        return Err(BotError::UserError(format!(
            "Option \"{}\" is too long for a button label (80 characters max).",
            long
        )));
    }
    Ok(options)
}

pub fn mention(user_id: u64) -> String {
    format!("<@{}>", user_id)
}

/* Resolved-option extractors. */

pub fn str_option<'a>(options: &'a [ResolvedOption<'a>], name: &str) -> Option<&'a str> {
    options.iter().find_map(|option| match option.value {
        ResolvedValue::String(value) if option.name == name => Some(value),
        _ => None,
    })
}

pub fn int_option(options: &[ResolvedOption<'_>], name: &str) -> Option<i64> {
    options.iter().find_map(|option| match option.value {
        ResolvedValue::Integer(value) if option.name == name => Some(value),
        _ => None,
    })
}

pub fn bool_option(options: &[ResolvedOption<'_>], name: &str) -> Option<bool> {
    options.iter().find_map(|option| match option.value {
        ResolvedValue::Boolean(value) if option.name == name => Some(value),
        _ => None,
    })
}

pub fn user_option<'a>(options: &'a [ResolvedOption<'a>], name: &str) -> Option<&'a User> {
    options.iter().find_map(|option| match option.value {
        ResolvedValue::User(user, _) if option.name == name => Some(user),
        _ => None,
    })
}

pub fn subcommand<'a>(
    options: &'a [ResolvedOption<'a>],
) -> Option<(&'a str, &'a [ResolvedOption<'a>])> {
    options.iter().find_map(|option| match &option.value {
        ResolvedValue::SubCommand(inner) => Some((option.name, inner.as_slice())),
        _ => None,
    })
}

/* Reply helpers. Each sends the single response an interaction gets. */

pub async fn respond_text(
    ctx: &Context,
    interaction: &CommandInteraction,
    text: impl Into<String>,
) -> HandlerResult {
    let message = CreateInteractionResponseMessage::new().content(text);
    interaction
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await?;
    Ok(())
}

pub async fn respond_ephemeral(
    ctx: &Context,
    interaction: &CommandInteraction,
    text: impl Into<String>,
) -> HandlerResult {
    let message = CreateInteractionResponseMessage::new()
        .content(text)
        .ephemeral(true);
    interaction
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await?;
    Ok(())
}

// Edits the message the clicked component sits on.
pub async fn update_component_message(
    ctx: &Context,
    interaction: &ComponentInteraction,
    content: String,
    rows: Vec<CreateActionRow>,
) -> HandlerResult {
    let message = CreateInteractionResponseMessage::new()
        .content(content)
        .components(rows);
    interaction
        .create_response(&ctx.http, CreateInteractionResponse::UpdateMessage(message))
        .await?;
    Ok(())
}

pub async fn respond_component_ephemeral(
    ctx: &Context,
    interaction: &ComponentInteraction,
    text: impl Into<String>,
) -> HandlerResult {
    let message = CreateInteractionResponseMessage::new()
        .content(text)
        .ephemeral(true);
    interaction
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1h30m").unwrap().as_millis(), 5_400_000);
        assert_eq!(parse_duration("10m").unwrap().as_millis(), 600_000);
        assert_eq!(parse_duration("45s").unwrap().as_millis(), 45_000);
        assert_eq!(parse_duration("2d").unwrap().as_millis(), 172_800_000);
        assert_eq!(parse_duration("1d 2h 3m").unwrap().as_millis(), 93_780_000);

        // No recognized unit token
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("90").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("0m").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(5_400)), "1h 30m");
        assert_eq!(format_duration(Duration::from_secs(45)), "45s");
        assert_eq!(format_duration(Duration::from_secs(90_061)), "1d 1h 1m 1s");
        assert_eq!(format_duration(Duration::from_secs(0)), "0s");
    }

    #[test]
    fn test_parse_poll_options() {
        assert_eq!(
            parse_poll_options("Red;Blue;Green").unwrap(),
            vec!["Red", "Blue", "Green"]
        );
        assert_eq!(
            parse_poll_options(" Tea ; ; Coffee ").unwrap(),
            vec!["Tea", "Coffee"]
        );

        assert!(parse_poll_options("OnlyOne").is_err());
        assert!(parse_poll_options(";;;").is_err());
        assert!(parse_poll_options(&vec!["x"; 11].join(";")).is_err());
    }

    #[test]
    fn test_make_button_rows_chunks_by_column() {
        let buttons: Vec<CreateButton> = (0..7)
            .map(|i| CreateButton::new(format!("b{}", i)).label("x"))
            .collect();
        let rows = make_button_rows(buttons, 3);
        assert_eq!(rows.len(), 3);

        let widths: Vec<usize> = rows
            .iter()
            .map(|row| match row {
                CreateActionRow::Buttons(buttons) => buttons.len(),
                _ => 0,
            })
            .collect();
        assert_eq!(widths, vec![3, 3, 1]);
    }
}
