use std::sync::Arc;

use serenity::all::{
    ApplicationId, ChannelId, Client, CommandInteraction, CommandType, ComponentInteraction,
    Context, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, EventHandler, GatewayIntents, GuildId, Interaction, Message,
    MessageId, ModalInteraction, Ready,
};
use serenity::async_trait;

use super::config::Config;
use super::handler;
use super::health::{self, HealthState};
use super::processor::{self, ProcessError};
use super::registry;
use super::scheduler::Scheduler;
use super::session::ComponentId;
use super::store::Store;

/* Dispatcher is the front door of the bot.
 * Every inbound gateway event lands here, is classified into exactly one
 * kind, and is routed to its handler: slash and context commands by name,
 * components and modals by the typed payload decoded from their
 * identifier, messages and deletions by their own callbacks. Unmatched
 * events are silently ignored. A handler error never propagates back into
 * the platform callback: it is logged and turned into an apology reply
 * where one is possible.
 */

/* Types */
pub type HandlerResult = Result<(), BotError>;

const APOLOGY: &str = "❎ An error occurred! Please try again later.";

#[derive(thiserror::Error, Debug)]
pub enum BotError {
    #[error("User error: {0}")]
    UserError(String),
    #[error("Process error: {0}")]
    ProcessError(ProcessError),
    #[error("Request error: {0}")]
    RequestError(serenity::Error),
}

impl From<ProcessError> for BotError {
    fn from(process_error: ProcessError) -> BotError {
        BotError::ProcessError(process_error)
    }
}

impl From<serenity::Error> for BotError {
    fn from(request_error: serenity::Error) -> BotError {
        BotError::RequestError(request_error)
    }
}

pub struct Handler {
    store: Arc<Store>,
    scheduler: Arc<Scheduler>,
    health: Arc<HealthState>,
    guild_id: Option<GuildId>,
}

impl Handler {
    async fn dispatch_command(
        &self,
        ctx: &Context,
        command: &CommandInteraction,
    ) -> HandlerResult {
        match command.data.kind {
            CommandType::User => match command.data.name.as_str() {
                "Karma" => handler::action_karma_user(ctx, &self.store, command).await,
                _ => Ok(()),
            },
            CommandType::Message => match command.data.name.as_str() {
                "Add Quote" => handler::action_quote_message(ctx, &self.store, command).await,
                _ => Ok(()),
            },
            _ => match command.data.name.as_str() {
                "ping" => handler::action_ping(ctx, command).await,
                "help" => handler::action_help(ctx, command).await,
                "poll" => handler::action_poll(ctx, &self.store, command).await,
                "tictactoe" => {
                    handler::action_tictactoe(ctx, &self.store, &self.scheduler, command).await
                }
                "rps" => handler::action_rps(ctx, command).await,
                "giveaway" => {
                    handler::action_giveaway(ctx, &self.store, &self.scheduler, command).await
                }
                "quote" => handler::action_quote(ctx, &self.store, command).await,
                "todo" => handler::action_todo(ctx, &self.store, command).await,
                "karma" => handler::action_karma(ctx, &self.store, command).await,
                "snipe" => handler::action_snipe(ctx, &self.store, command).await,
                "remind" => handler::action_remind(ctx, &self.scheduler, command).await,
                "suggest" => handler::action_suggest(ctx, command).await,
                "purge" => handler::action_purge(ctx, command).await,
                _ => Ok(()),
            },
        }
    }

    async fn dispatch_autocomplete(
        &self,
        ctx: &Context,
        command: &CommandInteraction,
    ) -> HandlerResult {
        match command.data.name.as_str() {
            "todo" => handler::autocomplete_todo(ctx, &self.store, command).await,
            _ => Ok(()),
        }
    }

    async fn dispatch_component(
        &self,
        ctx: &Context,
        component: &ComponentInteraction,
    ) -> HandlerResult {
        // Validate the payload once; a malformed identifier never reaches a handler
        let payload = match ComponentId::parse(&component.data.custom_id) {
            Ok(payload) => payload,
            Err(err) => {
                log::warn!("Router - ignoring component: {}", err);
                return Ok(());
            }
        };

        match payload {
            ComponentId::PollVote { poll_id, option } => {
                handler::action_poll_vote(ctx, &self.store, component, &poll_id, option).await
            }
            ComponentId::GameMove { game_id, cell } => {
                handler::action_tictactoe_move(
                    ctx,
                    &self.store,
                    &self.scheduler,
                    component,
                    &game_id,
                    cell,
                )
                .await
            }
            ComponentId::RpsChoice {
                challenger,
                opponent,
                choice,
            } => handler::action_rps_choice(ctx, component, challenger, opponent, choice).await,
            ComponentId::GiveawayJoin { giveaway_id } => {
                handler::action_giveaway_join(ctx, &self.store, component, &giveaway_id).await
            }
            // Suggestion payloads arrive as modal submissions, not clicks
            ComponentId::Suggestion { .. } => Ok(()),
        }
    }

    async fn dispatch_modal(&self, ctx: &Context, modal: &ModalInteraction) -> HandlerResult {
        match ComponentId::parse(&modal.data.custom_id) {
            Ok(ComponentId::Suggestion { .. }) => {
                handler::action_suggest_submit(ctx, modal).await
            }
            Ok(_) => Ok(()),
            Err(err) => {
                log::warn!("Router - ignoring modal: {}", err);
                Ok(())
            }
        }
    }
}

/* Error boundary.
 * User errors go back to the user verbatim; everything else is logged
 * and replaced by a generic apology. If the handler already used up the
 * interaction's response, the apology is delivered as a followup.
 */

fn error_text(context: &str, err: &BotError) -> String {
    match err {
        BotError::UserError(text) => text.clone(),
        other => {
            log::error!("Router - {} failed: {}", context, other);
            APOLOGY.to_string()
        }
    }
}

async fn recover_command(ctx: &Context, command: &CommandInteraction, err: BotError) {
    let text = error_text(&format!("command /{}", command.data.name), &err);

    let message = CreateInteractionResponseMessage::new()
        .content(text.clone())
        .ephemeral(true);
    let response = command
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await;
    if response.is_err() {
        let followup = CreateInteractionResponseFollowup::new()
            .content(text)
            .ephemeral(true);
        if let Err(err) = command.create_followup(&ctx.http, followup).await {
            log::error!("Router - could not deliver error reply: {}", err);
        }
    }
}

async fn recover_component(ctx: &Context, component: &ComponentInteraction, err: BotError) {
    let text = error_text(
        &format!("component {}", component.data.custom_id),
        &err,
    );

    let message = CreateInteractionResponseMessage::new()
        .content(text.clone())
        .ephemeral(true);
    let response = component
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await;
    if response.is_err() {
        let followup = CreateInteractionResponseFollowup::new()
            .content(text)
            .ephemeral(true);
        if let Err(err) = component.create_followup(&ctx.http, followup).await {
            log::error!("Router - could not deliver error reply: {}", err);
        }
    }
}

async fn recover_modal(ctx: &Context, modal: &ModalInteraction, err: BotError) {
    let text = error_text(&format!("modal {}", modal.data.custom_id), &err);

    let message = CreateInteractionResponseMessage::new()
        .content(text)
        .ephemeral(true);
    if let Err(err) = modal
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await
    {
        log::error!("Router - could not deliver error reply: {}", err);
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        log::info!(
            "Startup - connected as {} with {} guild(s)",
            ready.user.name,
            ready.guilds.len()
        );
        self.health.mark_ready(ready.guilds.len());

        // Registration failure is fatal: a bot without commands is useless
        match registry::register(&ctx, self.guild_id).await {
            Ok(count) => {
                let scope = match self.guild_id {
                    Some(guild_id) => format!("guild {}", guild_id),
                    None => "global scope".to_string(),
                };
                log::info!("Startup - registered {} commands in {}", count, scope);
            }
            Err(err) => {
                log::error!("Startup - command registration failed: {}", err);
                std::process::exit(1);
            }
        }
    }

    async fn cache_ready(&self, _ctx: Context, guilds: Vec<GuildId>) {
        self.health.set_guild_count(guilds.len());
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) => {
                if let Err(err) = self.dispatch_command(&ctx, &command).await {
                    recover_command(&ctx, &command, err).await;
                }
            }
            Interaction::Autocomplete(command) => {
                // Not user-repliable; a failure is only worth a log line
                if let Err(err) = self.dispatch_autocomplete(&ctx, &command).await {
                    log::error!(
                        "Router - autocomplete for /{} failed: {}",
                        command.data.name,
                        err
                    );
                }
            }
            Interaction::Component(component) => {
                if let Err(err) = self.dispatch_component(&ctx, &component).await {
                    recover_component(&ctx, &component, err).await;
                }
            }
            Interaction::Modal(modal) => {
                if let Err(err) = self.dispatch_modal(&ctx, &modal).await {
                    recover_modal(&ctx, &modal, err).await;
                }
            }
            _ => (),
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        // Every readable message feeds the snipe window
        if !msg.content.is_empty() {
            processor::remember_message(
                &self.store,
                msg.channel_id.get(),
                msg.id.get(),
                msg.author.id.get(),
                msg.author.name.clone(),
                msg.content.clone(),
            )
            .await;
        }

        if msg.mentions_me(&ctx).await.unwrap_or(false) {
            if let Err(err) = handler::action_mention(&ctx, &msg).await {
                log::error!("Router - mention reply failed: {}", err);
            }
        }
    }

    async fn message_delete(
        &self,
        _ctx: Context,
        channel_id: ChannelId,
        deleted_message_id: MessageId,
        _guild_id: Option<GuildId>,
    ) {
        let captured =
            processor::capture_deleted(&self.store, channel_id.get(), deleted_message_id.get())
                .await;
        if captured.is_some() {
            log::info!(
                "Snipe - captured deleted message {} in channel {}",
                deleted_message_id,
                channel_id
            );
        }
    }
}

/* Main dispatch function */
pub async fn run_dispatcher(config: Config) -> Result<(), serenity::Error> {
    let store = Arc::new(Store::new());
    let scheduler = Arc::new(Scheduler::new());
    let health = Arc::new(HealthState::new());

    {
        let health = Arc::clone(&health);
        let port = config.port;
        tokio::spawn(async move {
            if let Err(err) = health::serve(health, port).await {
                log::error!("Health - listener failed: {}", err);
            }
        });
    }

    let handler = Handler {
        store,
        scheduler,
        health,
        guild_id: config.guild_id.map(GuildId::new),
    };

    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.token, intents)
        .application_id(ApplicationId::new(config.application_id))
        .event_handler(handler)
        .await?;
    client.start().await
}
