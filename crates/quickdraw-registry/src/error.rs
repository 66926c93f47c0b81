//! Error types for the registry layer.

use quickdraw_protocol::ChannelId;

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The channel already has a session; one game per channel.
    #[error("channel {0} already has a game session")]
    AlreadyActive(ChannelId),

    /// No session exists for the channel.
    #[error("no game session in channel {0}")]
    NotFound(ChannelId),
}
