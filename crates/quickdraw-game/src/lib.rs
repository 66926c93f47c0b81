//! Game session engine for Quickdraw.
//!
//! A last-player-standing typing game: each turn, one random surviving
//! player must retype a random token before a shrinking deadline.
//!
//! # Key types
//!
//! - [`GameEngine`] — the pure state machine (roster, rounds, turns,
//!   eliminations); timestamps and randomness are injected, effects come
//!   back as [`Step`] data.
//! - [`SessionHandle`] / [`spawn_session`] — the Tokio actor that owns an
//!   engine and its single timer, one task per channel.
//! - [`GameConfig`] — initial difficulty, presentation delay, alphabet.
//! - [`TokenGenerator`] — random challenge strings.
//! - [`next_speed_budget`] / [`next_token_length`] — escalation policy.

mod config;
mod difficulty;
mod engine;
mod error;
mod session;
mod token;

pub use config::GameConfig;
pub use difficulty::{next_speed_budget, next_token_length};
pub use engine::{GameEngine, Lifecycle, Step, TimerRequest};
pub use error::GameError;
pub use session::{
    EndedSender, EventSender, SessionHandle, SessionInfo, spawn_session,
};
pub use token::{DEFAULT_ALPHABET, TokenGenerator};
