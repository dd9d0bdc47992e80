//! The bot: incoming queue, flood guard and per-message handling.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use xo_bus::{ChatClient, ConversationId};
use xo_core::config::BotConfig;
use xo_core::constants::TRANSCRIPT_TARGET;
use xo_core::error::XoResult;
use xo_store::{BotState, Store};

use crate::context::MessageContext;
use crate::event_bus::{AppEvent, EventBus};
use crate::names::Resolver;
use crate::service::{Service, ServiceState};
use crate::text::parse_command;

/// A chat bot bound to one chat client and one state directory.
pub struct Bot {
    pub(crate) client: Arc<dyn ChatClient>,
    pub(crate) state: BotState,
    pub(crate) config: BotConfig,
    pub(crate) bus: EventBus,
    pub(crate) started_at: DateTime<Utc>,
    incoming: Vec<MessageContext>,
    /// `nick: message` of the last mirrored message.
    last_message: String,
    pub(crate) exit_code: Option<i32>,
    service_state: ServiceState,
    pub(crate) rng: StdRng,
    clock: Option<DateTime<Utc>>,
    /// How many `dispatch` calls are on the stack (aliases and `mimic` nest).
    pub(crate) dispatch_depth: usize,
}

impl Bot {
    /// Create a bot. State is read from `store` by `init`.
    pub fn new(client: Arc<dyn ChatClient>, store: Store, config: BotConfig, bus: EventBus) -> Self {
        Self {
            client,
            state: BotState::empty(store),
            config,
            bus,
            started_at: Utc::now(),
            incoming: Vec::new(),
            last_message: String::new(),
            exit_code: None,
            service_state: ServiceState::Created,
            rng: StdRng::from_entropy(),
            clock: None,
            dispatch_depth: 0,
        }
    }

    pub fn client(&self) -> &Arc<dyn ChatClient> {
        &self.client
    }

    /// Persisted books (links, puns, aliases and so on).
    pub fn persisted(&self) -> &BotState {
        &self.state
    }

    pub fn persisted_mut(&mut self) -> &mut BotState {
        &mut self.state
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Exit code requested from chat, if any.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn is_running(&self) -> bool {
        self.exit_code.is_none()
    }

    /// Messages waiting for the next tick.
    pub fn pending(&self) -> usize {
        self.incoming.len()
    }

    /// Pin the clock used by commands. Tests use this for stable output.
    pub fn freeze_clock(&mut self, at: DateTime<Utc>) {
        self.clock = Some(at);
    }

    /// Make dice rolls and pun picks reproducible.
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.unwrap_or_else(Utc::now)
    }

    pub(crate) fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self.client.as_ref(), &self.state.links, &self.state.nicks)
    }

    pub(crate) fn chat_title(&self, conversation: ConversationId) -> String {
        self.resolver().title(conversation)
    }

    /// Stop the polling loop with `code` once the current message is done.
    pub fn request_exit(&mut self, code: i32) {
        info!("exit requested with code {code}");
        self.exit_code = Some(code);
        self.bus.emit(AppEvent::ExitRequested { code });
    }

    /// Queue a message for the next tick. Returns `false` for the bot's own
    /// messages, which are dropped.
    pub fn enqueue(&mut self, ctx: MessageContext) -> bool {
        let alias = self.client.account_alias(ctx.account);
        let username = self.client.account_username(ctx.account);
        let from_bot = alias.as_deref() == Some(ctx.sender.as_str())
            || username.as_deref() == Some(ctx.sender.as_str())
            || alias.as_deref()
                == Some(self.resolver().real_name(ctx.account, &ctx.sender).as_str());
        if from_bot {
            debug!("ignoring own message in conversation {}", ctx.conversation);
            return false;
        }
        self.incoming.push(ctx);
        true
    }

    /// Run scheduled events and handle the queued batch in arrival order.
    ///
    /// A batch longer than the overflow threshold is dropped unhandled.
    /// Returns whether the bot should keep running.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        self.process_due(now);

        let batch = std::mem::take(&mut self.incoming);
        if batch.len() > self.config.overflow_threshold {
            warn!(
                "dropping {} queued messages (threshold {})",
                batch.len(),
                self.config.overflow_threshold
            );
            self.bus.emit(AppEvent::FloodDropped { count: batch.len() });
        } else {
            for ctx in &batch {
                if !self.is_running() {
                    break;
                }
                self.handle_message(ctx);
            }
        }
        self.is_running()
    }

    /// Handle one message: run it as a command when it starts with the
    /// delimiter, then mirror it to linked chats.
    pub fn handle_message(&mut self, ctx: &MessageContext) {
        let ctx = if ctx.message.starts_with('<') {
            ctx.with_message(self.client.strip_html(&ctx.message))
        } else {
            ctx.clone()
        };

        let nick = self.resolver().display_name(ctx.account, &ctx.sender, None);
        let title = self.chat_title(ctx.conversation);
        info!(target: TRANSCRIPT_TARGET, "[{title}] {nick}: {}", ctx.message);

        let command = parse_command(&ctx.message, &self.config.command_delimiter);
        let was_command = command.is_some();
        if let Some((name, args)) = command {
            self.run_command(&ctx, &name, &args);
        }

        self.bus.emit(AppEvent::MessageHandled {
            conversation: title,
            sender: nick.clone(),
            was_command,
        });

        if ctx.message == self.last_message {
            debug!("not mirroring a repeat of the last mirrored message");
            return;
        }
        self.mirror(&ctx, &nick, &ctx.message);
        self.last_message = format!("{nick}: {}", ctx.message);
    }

    fn run_command(&mut self, ctx: &MessageContext, name: &str, args: &[String]) {
        let conversation = self.chat_title(ctx.conversation);
        let outcome = match self.dispatch(ctx, name, args) {
            Ok(true) => {
                self.bus.emit(AppEvent::CommandRan {
                    command: name.to_string(),
                    conversation,
                });
                return;
            }
            Ok(false) => format!(
                "Command/alias \"{name}\" not found. {}",
                self.command_listing(ctx)
            ),
            Err(e) => {
                warn!("command {name} failed in {conversation}: {e}");
                self.bus.emit(AppEvent::CommandFailed {
                    command: name.to_string(),
                    conversation,
                    error: e.to_string(),
                });
                if e.is_user_facing() {
                    e.to_string()
                } else {
                    format!("Command errored! Error message: \"{e}\"")
                }
            }
        };
        if let Err(e) = self.reply(ctx, &outcome) {
            warn!("failed to reply to {}: {e}", ctx.conversation);
        }
    }
}

impl Service for Bot {
    fn name(&self) -> &str {
        "bot"
    }

    fn state(&self) -> ServiceState {
        self.service_state
    }

    fn init(&mut self) -> XoResult<()> {
        self.state.reload();
        self.service_state = ServiceState::Running;
        info!(
            "bot started with delimiter {:?}",
            self.config.command_delimiter
        );
        Ok(())
    }

    fn shutdown(&mut self) -> XoResult<()> {
        let result = self.state.save_all();
        self.service_state = if result.is_ok() {
            ServiceState::Stopped
        } else {
            ServiceState::Failed
        };
        info!("bot stopped ({})", self.service_state);
        result
    }
}
