//! Error types for the game engine and session actor.

use quickdraw_protocol::ChannelId;

use crate::Lifecycle;

/// Errors that can occur during game operations.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The operation is not permitted in the session's current lifecycle
    /// state — e.g. adding a player while the game is running.
    #[error("{op} is not allowed while the session is {state}")]
    InvalidState {
        op: &'static str,
        state: Lifecycle,
    },

    /// `start` was called with fewer than two players on the roster.
    #[error("at least 2 players are required to start, have {have}")]
    NotEnoughPlayers { have: usize },

    /// The session actor is gone (already ended or shut down).
    #[error("session for channel {0} is no longer running")]
    SessionClosed(ChannelId),
}
