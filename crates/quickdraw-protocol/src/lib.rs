//! Shared types for Quickdraw.
//!
//! This crate defines the vocabulary the other layers speak:
//!
//! - **Identity** ([`PlayerId`], [`ChannelId`], [`Player`]) — who is
//!   playing, and in which channel.
//! - **Modes** ([`GameMode`]) — how difficulty escalates across rounds.
//! - **Events** ([`GameEvent`]) — what a running game announces.
//!
//! It knows nothing about timers, sessions, or chat platforms — it only
//! names the things they exchange.
//!
//! ```text
//! Host (chat platform) → Router → Session → Engine
//!                 all speak quickdraw-protocol
//! ```

mod events;
mod types;

pub use events::GameEvent;
pub use types::{ChannelId, GameMode, ParseGameModeError, Player, PlayerId};
