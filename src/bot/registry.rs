use serenity::all::{
    Command, CommandOptionType, CommandType, Context, CreateCommand, CreateCommandOption, GuildId,
    Permissions,
};

/* Registry is the static command catalog.
 * It is pushed to the platform exactly once, at startup: scoped to one
 * guild when a deployment guild is configured (updates show up
 * instantly), global otherwise. There are no retries; a failed push is
 * fatal and handled by the caller.
 */

// Names and descriptions, shared with the help command.
const SUMMARIES: &[(&str, &str)] = &[
    ("ping", "Check that I'm alive."),
    ("help", "Show this command list."),
    ("poll", "Start a poll with up to 10 options."),
    ("tictactoe", "Challenge someone to tic-tac-toe."),
    ("rps", "Play rock-paper-scissors."),
    ("giveaway", "Start a giveaway (Manage Server only)."),
    ("quote", "Save or recall server quotes."),
    ("todo", "Manage your personal todo list."),
    ("karma", "Give (or take) someone's karma."),
    ("snipe", "Reveal the last deleted message here."),
    ("remind", "Get pinged after a delay."),
    ("suggest", "Send a suggestion to the server."),
    ("purge", "Bulk-delete recent messages (Manage Messages only)."),
];

pub fn summaries() -> &'static [(&'static str, &'static str)] {
    SUMMARIES
}

fn description_of(name: &str) -> &'static str {
    SUMMARIES
        .iter()
        .find(|(entry, _)| *entry == name)
        .map(|(_, description)| *description)
        .unwrap_or("")
}

fn slash(name: &str) -> CreateCommand {
    CreateCommand::new(name).description(description_of(name))
}

/* The full catalog: slash commands plus the two context-menu entries. */
pub fn catalog() -> Vec<CreateCommand> {
    vec![
        slash("ping"),
        slash("help"),
        slash("poll")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "question", "What to ask")
                    .required(true)
                    .max_length(200),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "options",
                    "Choices, separated by semicolons (e.g. Red;Blue;Green)",
                )
                .required(true),
            )
            .add_option(CreateCommandOption::new(
                CommandOptionType::Boolean,
                "multi",
                "Allow voting for several options",
            )),
        slash("tictactoe").add_option(
            CreateCommandOption::new(CommandOptionType::User, "opponent", "Who to challenge")
                .required(true),
        ),
        slash("rps").add_option(CreateCommandOption::new(
            CommandOptionType::User,
            "opponent",
            "Who to play against (defaults to me)",
        )),
        slash("giveaway")
            .default_member_permissions(Permissions::MANAGE_GUILD)
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "prize", "What to win")
                    .required(true),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "duration",
                    "How long it runs (e.g. 1h30m)",
                )
                .required(true),
            ),
        slash("quote")
            .add_option(
                CreateCommandOption::new(CommandOptionType::SubCommand, "add", "Save a quote")
                    .add_sub_option(
                        CreateCommandOption::new(
                            CommandOptionType::String,
                            "text",
                            "The quote to save",
                        )
                        .required(true),
                    ),
            )
            .add_option(CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "random",
                "Recall a random quote",
            )),
        slash("todo")
            .add_option(
                CreateCommandOption::new(CommandOptionType::SubCommand, "add", "Add an item")
                    .add_sub_option(
                        CreateCommandOption::new(CommandOptionType::String, "text", "What to do")
                            .required(true),
                    ),
            )
            .add_option(CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "list",
                "Show your list",
            ))
            .add_option(
                CreateCommandOption::new(CommandOptionType::SubCommand, "done", "Finish an item")
                    .add_sub_option(
                        CreateCommandOption::new(
                            CommandOptionType::String,
                            "item",
                            "Which item to finish",
                        )
                        .required(true)
                        .set_autocomplete(true),
                    ),
            ),
        slash("karma")
            .add_option(
                CreateCommandOption::new(CommandOptionType::User, "user", "Who deserves it")
                    .required(true),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Integer,
                    "points",
                    "How many points, -10 to 10",
                )
                .required(true),
            ),
        slash("snipe"),
        slash("remind")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "duration",
                    "How long to wait (e.g. 10m)",
                )
                .required(true),
            )
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "text", "What to remind you of")
                    .required(true),
            ),
        slash("suggest"),
        slash("purge")
            .default_member_permissions(Permissions::MANAGE_MESSAGES)
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Integer,
                    "count",
                    "How many messages to delete",
                )
                .required(true)
                .min_int_value(1)
                .max_int_value(100),
            ),
        // Context-menu entries must not carry a description
        CreateCommand::new("Karma").kind(CommandType::User),
        CreateCommand::new("Add Quote").kind(CommandType::Message),
    ]
}

/* Pushes the catalog. Returns how many commands the platform accepted. */
pub async fn register(ctx: &Context, guild_id: Option<GuildId>) -> serenity::Result<usize> {
    let commands = catalog();

    let registered = match guild_id {
        Some(guild_id) => guild_id.set_commands(&ctx.http, commands).await?,
        None => Command::set_global_commands(&ctx.http, commands).await?,
    };
    Ok(registered.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_summary() {
        // Slash commands + two context entries
        assert_eq!(catalog().len(), SUMMARIES.len() + 2);
    }

    #[test]
    fn test_summaries_have_descriptions() {
        for (name, description) in summaries() {
            assert!(!name.is_empty());
            assert!(!description.is_empty());
            assert_eq!(description_of(name), *description);
        }
    }
}
