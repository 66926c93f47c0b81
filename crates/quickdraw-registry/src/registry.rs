//! Session registry: creates, tracks, and forgets per-channel sessions.

use std::collections::HashMap;

use quickdraw_game::{EventSender, GameConfig, SessionHandle, spawn_session};
use quickdraw_protocol::ChannelId;
use tokio::sync::mpsc;

use crate::RegistryError;

/// Owns all running game sessions, keyed by channel.
///
/// Invariant: at most one session per channel. A session that reaches its
/// terminal state announces itself on the internal ended-channel; call
/// [`SessionRegistry::reap_finished`] (the router does this on every
/// inbound message) to drop such entries.
pub struct SessionRegistry {
    config: GameConfig,
    sessions: HashMap<ChannelId, SessionHandle>,
    ended_tx: mpsc::UnboundedSender<ChannelId>,
    ended_rx: mpsc::UnboundedReceiver<ChannelId>,
}

impl SessionRegistry {
    /// Creates an empty registry; every session it spawns starts from
    /// `config`.
    pub fn new(config: GameConfig) -> Self {
        let (ended_tx, ended_rx) = mpsc::unbounded_channel();
        Self {
            config,
            sessions: HashMap::new(),
            ended_tx,
            ended_rx,
        }
    }

    /// Spawns a session for `channel`, announcing on `events`.
    ///
    /// Fails if the channel already has a session (finished-but-unreaped
    /// sessions are reaped first, so a fresh game can always follow a
    /// completed one).
    pub fn create(
        &mut self,
        channel: ChannelId,
        events: EventSender,
    ) -> Result<SessionHandle, RegistryError> {
        self.reap_finished();
        if self.sessions.contains_key(&channel) {
            return Err(RegistryError::AlreadyActive(channel));
        }

        let handle = spawn_session(
            channel,
            self.config.clone(),
            events,
            self.ended_tx.clone(),
        );
        self.sessions.insert(channel, handle.clone());
        tracing::info!(channel_id = %channel, "session created");
        Ok(handle)
    }

    /// Returns the session for `channel`, if one exists.
    pub fn get(&self, channel: ChannelId) -> Option<&SessionHandle> {
        self.sessions.get(&channel)
    }

    /// Removes and returns the session for `channel`.
    pub fn remove(&mut self, channel: ChannelId) -> Result<SessionHandle, RegistryError> {
        let handle = self
            .sessions
            .remove(&channel)
            .ok_or(RegistryError::NotFound(channel))?;
        tracing::info!(channel_id = %channel, "session removed");
        Ok(handle)
    }

    /// Drops every session that has reported its end, returning the
    /// affected channels.
    pub fn reap_finished(&mut self) -> Vec<ChannelId> {
        let mut reaped = Vec::new();
        while let Ok(channel) = self.ended_rx.try_recv() {
            if self.sessions.remove(&channel).is_some() {
                tracing::info!(channel_id = %channel, "finished session reaped");
                reaped.push(channel);
            }
        }
        reaped
    }

    /// Number of sessions currently tracked (including finished ones not
    /// yet reaped).
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
