//! Inbound message routing.
//!
//! The host feeds every chat message into [`Router::handle`]. Prefixed
//! messages are parsed as commands and dispatched against the channel's
//! session (created lazily); unprefixed messages are forwarded as turn
//! submissions when the author is the player on the clock. Everything the
//! bot says goes out through one `(ChannelId, String)` sink the host
//! drains and delivers.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use quickdraw_game::{GameConfig, GameError, SessionHandle};
use quickdraw_protocol::{ChannelId, GameMode, Player};
use quickdraw_registry::SessionRegistry;
use tokio::sync::mpsc;

use crate::render::render_event;
use crate::{BotConfig, Catalog, markdown};

/// Channel sender the host drains for outbound announcements.
pub type AnnounceSender = mpsc::UnboundedSender<(ChannelId, String)>;

/// One inbound chat message, as supplied by the hosting platform.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    /// Channel the message appeared in.
    pub channel: ChannelId,
    /// Who wrote it.
    pub author: Player,
    /// Raw message text.
    pub content: String,
    /// When the platform received it; turn timing is measured against
    /// this, not against processing time.
    pub sent_at: Instant,
}

// ---------------------------------------------------------------------------
// Command parsing
// ---------------------------------------------------------------------------

/// A recognized bot command (the part after the prefix).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    Remove,
    Start,
    Stop,
    SetMode(GameMode),
    Help,
}

/// Errors produced while parsing the text after the prefix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("missing argument for {0}")]
    MissingArgument(&'static str),
    #[error("unknown game mode: {0}")]
    UnknownMode(String),
}

impl Command {
    /// Parses `"setgm speed"`, `"add"`, etc.
    pub fn parse(input: &str) -> Result<Self, ParseCommandError> {
        let mut words = input.split_whitespace();
        let name = words.next().unwrap_or("");
        match name {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "help" => Ok(Self::Help),
            "setgm" => {
                let raw = words
                    .next()
                    .ok_or(ParseCommandError::MissingArgument("setgm"))?;
                let mode = GameMode::from_str(raw)
                    .map_err(|e| ParseCommandError::UnknownMode(e.0))?;
                Ok(Self::SetMode(mode))
            }
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}

/// Command table for the help overview: (name, argument placeholder key,
/// description key).
const COMMANDS: &[(&str, Option<&str>, &str)] = &[
    ("add", None, "command.add.description"),
    ("remove", None, "command.remove.description"),
    ("start", None, "command.start.description"),
    ("stop", None, "command.stop.description"),
    ("setgm", Some("command.setgm.gamemode"), "command.setgm.description"),
    ("help", None, "command.help.description"),
];

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Classifies inbound messages and drives the per-channel sessions.
pub struct Router {
    prefix: String,
    catalog: Arc<Catalog>,
    registry: SessionRegistry,
    outbound: AnnounceSender,
}

impl Router {
    /// Creates a router; sessions spawned for commands start from
    /// `game_config`, announcements go to `outbound`.
    pub fn new(
        bot_config: BotConfig,
        game_config: GameConfig,
        outbound: AnnounceSender,
    ) -> Self {
        let catalog = Arc::new(Catalog::new(bot_config.language));
        Self {
            prefix: bot_config.prefix,
            catalog,
            registry: SessionRegistry::new(game_config),
            outbound,
        }
    }

    /// Processes one inbound chat message.
    pub async fn handle(&mut self, message: ChatMessage) {
        self.registry.reap_finished();

        match message.content.strip_prefix(&self.prefix) {
            Some(rest) => {
                let rest = rest.trim().to_string();
                self.handle_command(message.channel, &message.author, &rest)
                    .await;
            }
            None => self.handle_plain(message).await,
        }
    }

    /// Unprefixed message: a turn submission if (and only if) the author
    /// is on the clock in this channel.
    async fn handle_plain(&mut self, message: ChatMessage) {
        let Some(handle) = self.registry.get(message.channel) else {
            return;
        };
        let author_id = message.author.id;
        if handle.is_current_player(author_id).await.unwrap_or(false) {
            let _ = handle
                .submit(author_id, message.content, message.sent_at)
                .await;
        }
    }

    async fn handle_command(&mut self, channel: ChannelId, author: &Player, rest: &str) {
        let command = match Command::parse(rest) {
            Ok(command) => command,
            Err(err) => {
                self.announce(channel, self.render_parse_error(&err));
                return;
            }
        };

        tracing::debug!(channel_id = %channel, author = %author.id, ?command, "command received");

        match command {
            Command::Add => self.on_add(channel, author).await,
            Command::Remove => self.on_remove(channel, author).await,
            Command::Start => self.on_start(channel, author).await,
            Command::Stop => self.on_stop(channel, author).await,
            Command::SetMode(mode) => self.on_set_mode(channel, mode).await,
            Command::Help => self.on_help(channel),
        }
    }

    // -- command handlers -----------------------------------------------

    async fn on_add(&mut self, channel: ChannelId, author: &Player) {
        let handle = match self.session_or_create(channel) {
            Some(handle) => handle,
            None => return,
        };

        match handle.add_player(author.clone()).await {
            Ok(()) => {
                let joined = self
                    .catalog
                    .f("command.add.added", &[("username", &author.username)]);
                let status = self.status_line(&handle).await;
                self.announce(channel, format!("{joined}\n{status}"));
            }
            Err(GameError::InvalidState { .. }) => {
                self.announce(channel, self.catalog.t("error.gameAlreadyRunning"));
            }
            Err(err) => tracing::warn!(channel_id = %channel, %err, "add failed"),
        }
    }

    async fn on_remove(&mut self, channel: ChannelId, author: &Player) {
        let Some(handle) = self.registry.get(channel).cloned() else {
            self.announce(channel, self.catalog.t("error.noGameActive"));
            return;
        };

        match handle.remove_player(author.id).await {
            Ok(()) => {
                let left = self
                    .catalog
                    .f("command.remove.removed", &[("username", &author.username)]);
                let status = self.status_line(&handle).await;
                self.announce(channel, format!("{left}\n{status}"));
            }
            Err(GameError::InvalidState { .. }) => {
                self.announce(channel, self.catalog.t("error.gameNeedsToBeFinished"));
            }
            Err(err) => tracing::warn!(channel_id = %channel, %err, "remove failed"),
        }
    }

    async fn on_start(&mut self, channel: ChannelId, author: &Player) {
        let Some(handle) = self.registry.get(channel).cloned() else {
            // Nobody has joined yet, so there can't be two players.
            let text = self
                .catalog
                .f("error.twoPlayersRequired", &[("players", "")]);
            self.announce(channel, text);
            return;
        };

        match handle.start().await {
            Ok(()) => {
                let text = self
                    .catalog
                    .f("game.started", &[("username", &author.username)]);
                self.announce(channel, text);
            }
            Err(GameError::NotEnoughPlayers { .. }) => {
                let players = self.player_list(&handle).await;
                let text = self
                    .catalog
                    .f("error.twoPlayersRequired", &[("players", &players)]);
                self.announce(channel, text);
            }
            Err(GameError::InvalidState { .. }) => {
                self.announce(channel, self.catalog.t("error.gameAlreadyRunning"));
            }
            Err(err) => tracing::warn!(channel_id = %channel, %err, "start failed"),
        }
    }

    async fn on_stop(&mut self, channel: ChannelId, author: &Player) {
        let Some(handle) = self.registry.get(channel).cloned() else {
            self.announce(channel, self.catalog.t("error.noGameActive"));
            return;
        };

        if handle.stop().await.is_ok() {
            let text = self
                .catalog
                .f("game.stopped", &[("username", &author.username)]);
            self.announce(channel, text);
        }
        // The actor reports its end; the entry goes away on the next reap.
    }

    async fn on_set_mode(&mut self, channel: ChannelId, mode: GameMode) {
        let handle = match self.session_or_create(channel) {
            Some(handle) => handle,
            None => return,
        };

        match handle.set_mode(mode).await {
            Ok(()) => {
                let text = self
                    .catalog
                    .f("command.setgm.changed", &[("mode", &mode.to_string())]);
                self.announce(channel, text);
            }
            Err(GameError::InvalidState { .. }) => {
                self.announce(channel, self.catalog.t("error.gameAlreadyRunning"));
            }
            Err(err) => tracing::warn!(channel_id = %channel, %err, "setgm failed"),
        }
    }

    fn on_help(&self, channel: ChannelId) {
        let mut lines = vec![self.catalog.t("command.help.available")];
        for (name, argument, description) in COMMANDS {
            let usage = match argument {
                Some(key) => format!("{} {name} {}", self.prefix, self.catalog.t(key)),
                None => format!("{} {name}", self.prefix),
            };
            lines.push(format!(
                "{} - {}",
                markdown::code(&usage),
                self.catalog.t(description)
            ));
        }
        self.announce(channel, lines.join("\n"));
    }

    // -- helpers ---------------------------------------------------------

    /// Returns the channel's session, creating one (with its announcement
    /// forwarder) if the channel has none.
    fn session_or_create(&mut self, channel: ChannelId) -> Option<SessionHandle> {
        if let Some(handle) = self.registry.get(channel) {
            return Some(handle.clone());
        }

        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let handle = match self.registry.create(channel, events_tx) {
            Ok(handle) => handle,
            Err(err) => {
                tracing::warn!(channel_id = %channel, %err, "session create failed");
                return None;
            }
        };

        // Bridge the session's typed events into rendered announcements.
        // The task ends when the session actor drops its event sender.
        let catalog = Arc::clone(&self.catalog);
        let outbound = self.outbound.clone();
        tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                let _ = outbound.send((channel, render_event(&catalog, &event)));
            }
        });

        Some(handle)
    }

    /// "Current players / current gamemode" status line for join/leave
    /// announcements.
    async fn status_line(&self, handle: &SessionHandle) -> String {
        let (players, mode) = match handle.info().await {
            Ok(info) => (info.players.join(", "), info.mode.to_string()),
            Err(_) => (String::new(), String::new()),
        };
        self.catalog.f(
            "game.info",
            &[("players", &players), ("gameMode", &mode)],
        )
    }

    async fn player_list(&self, handle: &SessionHandle) -> String {
        match handle.info().await {
            Ok(info) => info.players.join(", "),
            Err(_) => String::new(),
        }
    }

    fn render_parse_error(&self, err: &ParseCommandError) -> String {
        let help = self
            .catalog
            .f("command.generalHelp", &[("prefix", &self.prefix)]);
        match err {
            ParseCommandError::Unknown(name) => self.catalog.f(
                "error.unknownCommand",
                &[("command", &markdown::code(name)), ("help", &help)],
            ),
            ParseCommandError::MissingArgument(_) => self
                .catalog
                .f("command.wrongCountOfArguments", &[("help", &help)]),
            ParseCommandError::UnknownMode(mode) => self.catalog.f(
                "command.setgm.wrongGamemode",
                &[("mode", mode), ("help", &help)],
            ),
        }
    }

    fn announce(&self, channel: ChannelId, text: String) {
        let _ = self.outbound.send((channel, text));
    }
}
