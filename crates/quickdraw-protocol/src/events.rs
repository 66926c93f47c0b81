//! Events emitted by a running game session.
//!
//! The engine announces what happened as typed events; the hosting layer
//! decides how to word them (localization, markdown) before sending them
//! to the channel. Elapsed times and budgets travel as whole milliseconds
//! — that is the granularity the game is played at.

use serde::{Deserialize, Serialize};

/// A channel-directed notification from a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new round began: every surviving player gets one turn.
    RoundStarted {
        /// Response budget in force for this round.
        speed_budget_ms: u64,
    },

    /// A player is on the clock and must retype the token.
    TurnPresented { username: String, token: String },

    /// The current player retyped the token in time.
    TurnPassed { username: String, elapsed_ms: u64 },

    /// The current player answered after the budget (or not at all) and
    /// was eliminated.
    TooSlow { username: String, elapsed_ms: u64 },

    /// The current player mistyped the token and was eliminated.
    WrongInput { username: String },

    /// Only one player is left standing.
    Won { username: String },
}
