//! Session actor: an isolated Tokio task that owns one game.
//!
//! Each channel's game runs in its own task, communicating with the
//! outside world through an mpsc channel — no shared mutable state, just
//! message passing. The actor owns the engine and the single outstanding
//! timer; commands, submissions, and timer expiry are serialized by the
//! `select!` loop, so the engine never sees concurrent mutation.

use std::time::Instant;

use quickdraw_protocol::{ChannelId, GameEvent, GameMode, Player, PlayerId};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant as TokioInstant;

use crate::{GameConfig, GameEngine, GameError, Lifecycle, Step, TimerRequest};

/// Command channel size for session actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Channel sender for delivering a session's announcements to the host.
pub type EventSender = mpsc::UnboundedSender<GameEvent>;

/// Channel on which a session reports its own end (for registry cleanup).
pub type EndedSender = mpsc::UnboundedSender<ChannelId>;

/// Commands sent to a session actor through its channel.
///
/// Fallible operations carry a `oneshot` reply channel; submissions are
/// fire-and-forget, mirroring how chat messages arrive.
enum SessionCommand {
    AddPlayer {
        player: Player,
        reply: oneshot::Sender<Result<(), GameError>>,
    },
    RemovePlayer {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), GameError>>,
    },
    SetMode {
        mode: GameMode,
        reply: oneshot::Sender<Result<(), GameError>>,
    },
    Start {
        reply: oneshot::Sender<Result<(), GameError>>,
    },
    Submit {
        player_id: PlayerId,
        text: String,
        submitted_at: Instant,
    },
    IsCurrentPlayer {
        player_id: PlayerId,
        reply: oneshot::Sender<bool>,
    },
    Info {
        reply: oneshot::Sender<SessionInfo>,
    },
    Stop {
        reply: oneshot::Sender<()>,
    },
}

/// A snapshot of session metadata for status announcements.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    /// The channel this session is bound to.
    pub channel_id: ChannelId,
    /// Current lifecycle state.
    pub lifecycle: Lifecycle,
    /// Selected escalation mode.
    pub mode: GameMode,
    /// Usernames still on the roster, sorted.
    pub players: Vec<String>,
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Handle to a running session actor. Cheap to clone — it's just an
/// `mpsc::Sender` wrapper. The registry holds one per channel.
#[derive(Clone)]
pub struct SessionHandle {
    channel_id: ChannelId,
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// The channel this session is bound to.
    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    /// Adds a player to the roster (pre-game only).
    pub async fn add_player(&self, player: Player) -> Result<(), GameError> {
        self.request(|reply| SessionCommand::AddPlayer { player, reply })
            .await?
    }

    /// Removes a player from the roster (pre-game only).
    pub async fn remove_player(&self, player_id: PlayerId) -> Result<(), GameError> {
        self.request(|reply| SessionCommand::RemovePlayer { player_id, reply })
            .await?
    }

    /// Selects the escalation mode (pre-game only).
    pub async fn set_mode(&self, mode: GameMode) -> Result<(), GameError> {
        self.request(|reply| SessionCommand::SetMode { mode, reply })
            .await?
    }

    /// Starts the game.
    pub async fn start(&self) -> Result<(), GameError> {
        self.request(|reply| SessionCommand::Start { reply }).await?
    }

    /// Forwards a turn submission (fire-and-forget; out-of-turn input is
    /// ignored by the engine).
    pub async fn submit(
        &self,
        player_id: PlayerId,
        text: impl Into<String>,
        submitted_at: Instant,
    ) -> Result<(), GameError> {
        self.sender
            .send(SessionCommand::Submit {
                player_id,
                text: text.into(),
                submitted_at,
            })
            .await
            .map_err(|_| GameError::SessionClosed(self.channel_id))
    }

    /// `true` if `player_id` is the player currently on the clock.
    pub async fn is_current_player(&self, player_id: PlayerId) -> Result<bool, GameError> {
        self.request(|reply| SessionCommand::IsCurrentPlayer { player_id, reply })
            .await
    }

    /// Requests the current session snapshot.
    pub async fn info(&self) -> Result<SessionInfo, GameError> {
        self.request(|reply| SessionCommand::Info { reply }).await
    }

    /// Ends the session. Idempotent from the caller's point of view.
    pub async fn stop(&self) -> Result<(), GameError> {
        self.request(|reply| SessionCommand::Stop { reply }).await
    }

    /// Sends a command carrying a reply channel and awaits the reply.
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, GameError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(make(reply_tx))
            .await
            .map_err(|_| GameError::SessionClosed(self.channel_id))?;
        reply_rx
            .await
            .map_err(|_| GameError::SessionClosed(self.channel_id))
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// Which engine callback the armed timer maps to.
#[derive(Debug, Clone, Copy)]
enum TimerKind {
    Present,
    Deadline,
}

/// The internal session actor. Runs inside a Tokio task.
struct SessionActor {
    channel_id: ChannelId,
    engine: GameEngine,
    receiver: mpsc::Receiver<SessionCommand>,
    events: EventSender,
    ended: EndedSender,
    /// The single outstanding timer, if any. `stop` clears this before
    /// the engine transitions, so no expiry can fire against an ended
    /// session.
    timer: Option<(TimerKind, TokioInstant)>,
}

impl SessionActor {
    async fn run(mut self) {
        tracing::info!(channel_id = %self.channel_id, "game session started");

        loop {
            let armed = self.timer.map(|(_, at)| at);
            let step = tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => {
                        tracing::debug!(
                            channel_id = %self.channel_id,
                            "all session handles dropped"
                        );
                        break;
                    }
                },
                _ = tokio::time::sleep_until(
                    armed.unwrap_or_else(TokioInstant::now)
                ), if armed.is_some() => {
                    self.handle_timer()
                }
            };

            if let Some(step) = step {
                if self.apply(step) {
                    break;
                }
            }
        }

        tracing::info!(channel_id = %self.channel_id, "game session stopped");
    }

    fn handle_command(&mut self, cmd: SessionCommand) -> Option<Step> {
        match cmd {
            SessionCommand::AddPlayer { player, reply } => {
                let _ = reply.send(self.engine.add_player(player));
                None
            }
            SessionCommand::RemovePlayer { player_id, reply } => {
                let _ = reply.send(self.engine.remove_player(player_id));
                None
            }
            SessionCommand::SetMode { mode, reply } => {
                let _ = reply.send(self.engine.set_mode(mode));
                None
            }
            SessionCommand::Start { reply } => match self.engine.start() {
                Ok(step) => {
                    let _ = reply.send(Ok(()));
                    Some(step)
                }
                Err(err) => {
                    let _ = reply.send(Err(err));
                    None
                }
            },
            SessionCommand::Submit {
                player_id,
                text,
                submitted_at,
            } => Some(self.engine.submit_turn(player_id, &text, submitted_at)),
            SessionCommand::IsCurrentPlayer { player_id, reply } => {
                let _ = reply.send(self.engine.is_current_player(player_id));
                None
            }
            SessionCommand::Info { reply } => {
                let _ = reply.send(SessionInfo {
                    channel_id: self.channel_id,
                    lifecycle: self.engine.lifecycle(),
                    mode: self.engine.mode(),
                    players: self.engine.usernames(),
                });
                None
            }
            SessionCommand::Stop { reply } => {
                // Cancel the timer before the engine transitions.
                self.timer = None;
                let step = self.engine.stop();
                let _ = reply.send(());
                Some(step)
            }
        }
    }

    fn handle_timer(&mut self) -> Option<Step> {
        let (kind, _) = self.timer.take()?;
        let now = Instant::now();
        Some(match kind {
            TimerKind::Present => self.engine.present_turn(now),
            TimerKind::Deadline => {
                tracing::debug!(
                    channel_id = %self.channel_id,
                    "response deadline expired"
                );
                self.engine.deadline_expired(now)
            }
        })
    }

    /// Delivers announcements, arms the requested timer, and reports
    /// whether the session just ended.
    fn apply(&mut self, step: Step) -> bool {
        for event in step.events {
            let _ = self.events.send(event);
        }

        if let Some(request) = step.timer {
            let (kind, after) = match request {
                TimerRequest::Present { after } => (TimerKind::Present, after),
                TimerRequest::Deadline { after } => (TimerKind::Deadline, after),
            };
            self.timer = Some((kind, TokioInstant::now() + after));
        }

        if step.ended {
            self.timer = None;
            tracing::info!(channel_id = %self.channel_id, "game session ended");
            let _ = self.ended.send(self.channel_id);
            return true;
        }
        false
    }
}

/// Spawns a new session actor task and returns a handle to it.
///
/// `events` receives every announcement the game makes, bound to this one
/// channel for the session's lifetime; `ended` receives the channel id
/// exactly once, when the session reaches its terminal state.
pub fn spawn_session(
    channel_id: ChannelId,
    config: GameConfig,
    events: EventSender,
    ended: EndedSender,
) -> SessionHandle {
    let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_SIZE);

    let actor = SessionActor {
        channel_id,
        engine: GameEngine::new(config),
        receiver: rx,
        events,
        ended,
        timer: None,
    };

    tokio::spawn(actor.run());

    SessionHandle {
        channel_id,
        sender: tx,
    }
}
