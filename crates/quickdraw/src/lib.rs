//! Quickdraw bot facade.
//!
//! Ties the engine stack to a chat frontend: localized catalogs, command
//! parsing, per-channel session management, and announcement rendering.
//! A host embeds this by constructing a [`Router`], feeding every inbound
//! message into [`Router::handle`], and delivering whatever arrives on
//! the announcement channel back to the right chat channel.

mod config;
mod lang;
pub mod markdown;
mod render;
mod router;

pub use config::BotConfig;
pub use lang::{Catalog, Language, ParseLanguageError};
pub use render::render_event;
pub use router::{AnnounceSender, ChatMessage, Command, ParseCommandError, Router};

/// One-stop imports for hosts embedding the bot.
pub mod prelude {
    pub use quickdraw_game::{GameConfig, GameError, SessionHandle, SessionInfo};
    pub use quickdraw_protocol::{ChannelId, GameEvent, GameMode, Player, PlayerId};
    pub use quickdraw_registry::{RegistryError, SessionRegistry};

    pub use crate::{BotConfig, ChatMessage, Language, Router};
}
