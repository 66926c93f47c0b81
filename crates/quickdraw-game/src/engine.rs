//! The game state machine.
//!
//! [`GameEngine`] owns the roster, round state, and difficulty state, and
//! is deliberately free of side effects: timestamps come in as arguments,
//! announcements and timer wishes go out as data ([`Step`]). The session
//! actor performs the effects; tests drive the engine directly with a
//! seeded RNG and hand-rolled instants.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use quickdraw_protocol::{GameEvent, GameMode, Player, PlayerId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{GameConfig, GameError, TokenGenerator, difficulty};

/// Minimum roster size for `start`.
const MIN_PLAYERS: usize = 2;

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// The lifecycle state of one game session.
///
/// Transitions are one-way:
///
/// ```text
/// Idle → Active → Ended
/// ```
///
/// - **Idle**: roster and mode can be edited; no turns run.
/// - **Active**: turns run; the roster only shrinks (eliminations).
/// - **Ended**: terminal. A new session is required to play again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Active,
    Ended,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Active => write!(f, "active"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

// ---------------------------------------------------------------------------
// Step — what the caller must do next
// ---------------------------------------------------------------------------

/// A timer the engine wants armed.
///
/// At most one timer is ever outstanding: `Present` runs between a turn
/// resolution and the next challenge, `Deadline` runs while a challenge
/// is on the clock. Arming one replaces the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerRequest {
    /// Present the next challenge after the reading pause.
    Present { after: Duration },
    /// Eliminate the current player if no submission arrives in time.
    Deadline { after: Duration },
}

/// The outcome of one engine operation: announcements to deliver, an
/// optional timer to arm, and whether the session just ended.
#[derive(Debug, Default)]
pub struct Step {
    /// Channel announcements, in order.
    pub events: Vec<GameEvent>,
    /// Timer to arm, replacing any outstanding one.
    pub timer: Option<TimerRequest>,
    /// `true` exactly once, on the transition to `Ended`.
    pub ended: bool,
}

/// The turn currently on the clock.
#[derive(Debug, Clone)]
struct CurrentTurn {
    player_id: PlayerId,
    username: String,
    token: String,
    presented_at: Instant,
}

// ---------------------------------------------------------------------------
// GameEngine
// ---------------------------------------------------------------------------

/// State machine for one last-player-standing typing game.
pub struct GameEngine {
    config: GameConfig,
    tokens: TokenGenerator,
    rng: StdRng,
    lifecycle: Lifecycle,
    mode: GameMode,
    /// Players still in the game, keyed by id. "Alive" is always computed
    /// from this map, never from `pending_turns`, so an eliminated player
    /// can never be resurrected by a round refill.
    roster: HashMap<PlayerId, Player>,
    /// Alive players who have not yet taken a turn this round.
    pending_turns: Vec<PlayerId>,
    current: Option<CurrentTurn>,
    speed_budget: Duration,
    token_length: usize,
    rounds_played: u64,
}

impl GameEngine {
    /// Creates an idle engine with OS-seeded randomness.
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Creates an idle engine with the given RNG. Use a seeded `StdRng`
    /// for deterministic tests.
    pub fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let tokens = TokenGenerator::new(&config.alphabet);
        let speed_budget = config.initial_speed_budget;
        let token_length = config.initial_token_length;
        Self {
            config,
            tokens,
            rng,
            lifecycle: Lifecycle::Idle,
            mode: GameMode::default(),
            roster: HashMap::new(),
            pending_turns: Vec::new(),
            current: None,
            speed_budget,
            token_length,
            rounds_played: 0,
        }
    }

    // -- roster and mode (Idle only) ------------------------------------

    /// Adds a player to the roster, replacing any previous snapshot for
    /// the same id.
    pub fn add_player(&mut self, player: Player) -> Result<(), GameError> {
        self.ensure_idle("add_player")?;
        self.roster.insert(player.id, player);
        Ok(())
    }

    /// Removes a player from the roster. No-op if the id is absent.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<(), GameError> {
        self.ensure_idle("remove_player")?;
        self.roster.remove(&player_id);
        Ok(())
    }

    /// Selects the escalation mode for this session.
    pub fn set_mode(&mut self, mode: GameMode) -> Result<(), GameError> {
        self.ensure_idle("set_mode")?;
        self.mode = mode;
        Ok(())
    }

    // -- lifecycle ------------------------------------------------------

    /// Starts the game: requires at least two players, transitions to
    /// `Active`, and kicks off round one.
    pub fn start(&mut self) -> Result<Step, GameError> {
        self.ensure_idle("start")?;
        if self.roster.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers {
                have: self.roster.len(),
            });
        }
        self.lifecycle = Lifecycle::Active;
        let mut step = Step::default();
        self.advance(&mut step);
        Ok(step)
    }

    /// Ends the session. Idempotent: only the first call reports
    /// `ended = true`; later calls are silent no-ops.
    pub fn stop(&mut self) -> Step {
        let mut step = Step::default();
        if self.lifecycle != Lifecycle::Ended {
            self.finish(&mut step);
        }
        step
    }

    // -- turn flow ------------------------------------------------------

    /// The presentation pause elapsed: draw a token, put a uniformly
    /// random pending player on the clock, and ask for the response
    /// deadline to be armed.
    pub fn present_turn(&mut self, now: Instant) -> Step {
        let mut step = Step::default();
        if self.lifecycle != Lifecycle::Active || self.pending_turns.is_empty() {
            return step;
        }

        let token = self.tokens.generate(&mut self.rng, self.token_length);
        let index = self.rng.random_range(0..self.pending_turns.len());
        let player_id = self.pending_turns.swap_remove(index);
        let username = self
            .roster
            .get(&player_id)
            .map(|p| p.username.clone())
            .expect("pending turn refers to a roster member");

        step.events.push(GameEvent::TurnPresented {
            username: username.clone(),
            token: token.clone(),
        });
        step.timer = Some(TimerRequest::Deadline {
            after: self.speed_budget,
        });
        self.current = Some(CurrentTurn {
            player_id,
            username,
            token,
            presented_at: now,
        });
        step
    }

    /// A submission from the channel.
    ///
    /// Only the player currently on the clock can resolve a turn; any
    /// other submission (wrong player, no pending turn, session not
    /// active) is ignored without error — the router pre-filters, this is
    /// defense in depth.
    pub fn submit_turn(
        &mut self,
        player_id: PlayerId,
        text: &str,
        submitted_at: Instant,
    ) -> Step {
        let mut step = Step::default();
        if self.lifecycle != Lifecycle::Active {
            return step;
        }
        let Some(turn) = self.current.take_if(|t| t.player_id == player_id) else {
            return step;
        };

        let elapsed = submitted_at.saturating_duration_since(turn.presented_at);
        let elapsed_ms = elapsed.as_millis() as u64;

        if elapsed > self.speed_budget {
            self.roster.remove(&player_id);
            step.events.push(GameEvent::TooSlow {
                username: turn.username,
                elapsed_ms,
            });
        } else if normalize(text) != normalize(&turn.token) {
            self.roster.remove(&player_id);
            step.events.push(GameEvent::WrongInput {
                username: turn.username,
            });
        } else {
            // Survived — but this round's turn is consumed.
            step.events.push(GameEvent::TurnPassed {
                username: turn.username,
                elapsed_ms,
            });
        }

        self.advance(&mut step);
        step
    }

    /// The response deadline elapsed with no submission: the player on
    /// the clock is eliminated as too slow.
    pub fn deadline_expired(&mut self, now: Instant) -> Step {
        let mut step = Step::default();
        if self.lifecycle != Lifecycle::Active {
            return step;
        }
        let Some(turn) = self.current.take() else {
            return step;
        };

        let elapsed = now.saturating_duration_since(turn.presented_at);
        self.roster.remove(&turn.player_id);
        step.events.push(GameEvent::TooSlow {
            username: turn.username,
            elapsed_ms: elapsed.as_millis() as u64,
        });

        self.advance(&mut step);
        step
    }

    // -- queries --------------------------------------------------------

    /// `true` if `player_id` is the player currently on the clock.
    pub fn is_current_player(&self, player_id: PlayerId) -> bool {
        self.current
            .as_ref()
            .is_some_and(|t| t.player_id == player_id)
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Selected escalation mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Number of players still on the roster.
    pub fn player_count(&self) -> usize {
        self.roster.len()
    }

    /// Usernames of all players still on the roster, sorted.
    pub fn usernames(&self) -> Vec<String> {
        let mut names: Vec<String> =
            self.roster.values().map(|p| p.username.clone()).collect();
        names.sort();
        names
    }

    /// Response budget in force for the current round.
    pub fn speed_budget(&self) -> Duration {
        self.speed_budget
    }

    /// Token length in force for the current round.
    pub fn token_length(&self) -> usize {
        self.token_length
    }

    // -- internals ------------------------------------------------------

    /// Round-advance: decide between a winner, an empty game, a fresh
    /// round, or the next turn of the current round, then ask for the
    /// presentation pause before the next challenge.
    fn advance(&mut self, step: &mut Step) {
        let alive: Vec<PlayerId> = self.roster.keys().copied().collect();

        match alive.len() {
            0 => {
                // Everyone gone (double elimination edge) — end quietly.
                self.finish(step);
                return;
            }
            1 => {
                let username = self.roster[&alive[0]].username.clone();
                step.events.push(GameEvent::Won { username });
                self.finish(step);
                return;
            }
            _ => {}
        }

        if self.pending_turns.is_empty() {
            // Every living player has had their turn: fresh round.
            // Escalation only applies from the second round onward.
            if self.rounds_played > 0 {
                match self.mode {
                    GameMode::Speed => {
                        self.speed_budget =
                            difficulty::next_speed_budget(self.speed_budget);
                    }
                    GameMode::Length => {
                        self.token_length =
                            difficulty::next_token_length(self.token_length);
                    }
                }
            }
            self.rounds_played += 1;
            self.pending_turns = alive;
            step.events.push(GameEvent::RoundStarted {
                speed_budget_ms: self.speed_budget.as_millis() as u64,
            });
        }

        step.timer = Some(TimerRequest::Present {
            after: self.config.presentation_delay,
        });
    }

    /// Terminal transition; safe to call at most once per session.
    fn finish(&mut self, step: &mut Step) {
        self.lifecycle = Lifecycle::Ended;
        self.current = None;
        self.pending_turns.clear();
        step.timer = None;
        step.ended = true;
    }

    fn ensure_idle(&self, op: &'static str) -> Result<(), GameError> {
        if self.lifecycle == Lifecycle::Idle {
            Ok(())
        } else {
            Err(GameError::InvalidState {
                op,
                state: self.lifecycle,
            })
        }
    }
}

/// Submission matching ignores case and all whitespace.
fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
