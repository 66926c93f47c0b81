//! Integration tests for the session registry.

use std::time::Duration;

use quickdraw_game::{GameConfig, GameError, Lifecycle};
use quickdraw_protocol::{ChannelId, GameEvent, Player, PlayerId};
use quickdraw_registry::{RegistryError, SessionRegistry};
use tokio::sync::mpsc;

fn events() -> (
    mpsc::UnboundedSender<GameEvent>,
    mpsc::UnboundedReceiver<GameEvent>,
) {
    mpsc::unbounded_channel()
}

#[tokio::test]
async fn test_create_and_get() {
    let mut registry = SessionRegistry::new(GameConfig::default());
    let (tx, _rx) = events();

    let handle = registry.create(ChannelId(1), tx).unwrap();
    assert_eq!(handle.channel_id(), ChannelId(1));
    assert_eq!(registry.session_count(), 1);
    assert!(registry.get(ChannelId(1)).is_some());
    assert!(registry.get(ChannelId(2)).is_none());
}

#[tokio::test]
async fn test_one_session_per_channel() {
    let mut registry = SessionRegistry::new(GameConfig::default());
    let (tx, _rx) = events();

    registry.create(ChannelId(1), tx.clone()).unwrap();
    assert!(matches!(
        registry.create(ChannelId(1), tx.clone()),
        Err(RegistryError::AlreadyActive(ChannelId(1)))
    ));

    // A different channel is independent.
    registry.create(ChannelId(2), tx).unwrap();
    assert_eq!(registry.session_count(), 2);
}

#[tokio::test]
async fn test_remove() {
    let mut registry = SessionRegistry::new(GameConfig::default());
    let (tx, _rx) = events();

    registry.create(ChannelId(1), tx).unwrap();
    registry.remove(ChannelId(1)).unwrap();
    assert_eq!(registry.session_count(), 0);
    assert!(matches!(
        registry.remove(ChannelId(1)),
        Err(RegistryError::NotFound(ChannelId(1)))
    ));
}

#[tokio::test]
async fn test_stopped_session_is_reaped() {
    let mut registry = SessionRegistry::new(GameConfig::default());
    let (tx, _rx) = events();

    let handle = registry.create(ChannelId(1), tx).unwrap();
    handle.stop().await.unwrap();

    // Give the actor a moment to report its end.
    tokio::time::sleep(Duration::from_millis(10)).await;

    let reaped = registry.reap_finished();
    assert_eq!(reaped, [ChannelId(1)]);
    assert!(registry.get(ChannelId(1)).is_none());
    assert_eq!(registry.session_count(), 0);
}

#[tokio::test]
async fn test_channel_is_reusable_after_game_ends() {
    let mut registry = SessionRegistry::new(GameConfig::default());
    let (tx, _rx) = events();

    let handle = registry.create(ChannelId(1), tx.clone()).unwrap();
    handle.stop().await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    // `create` reaps internally, so no explicit reap is needed.
    let fresh = registry.create(ChannelId(1), tx).unwrap();
    let info = fresh.info().await.unwrap();
    assert_eq!(info.lifecycle, Lifecycle::Idle);
    assert!(info.players.is_empty());
}

#[tokio::test]
async fn test_sessions_are_independent_across_channels() {
    let mut registry = SessionRegistry::new(GameConfig::default());
    let (tx1, _rx1) = events();
    let (tx2, _rx2) = events();

    let a = registry.create(ChannelId(1), tx1).unwrap();
    let b = registry.create(ChannelId(2), tx2).unwrap();

    a.add_player(Player::new(PlayerId(1), "alice")).await.unwrap();
    a.add_player(Player::new(PlayerId(2), "bob")).await.unwrap();
    a.start().await.unwrap();

    // Channel 2's session is untouched by channel 1's game.
    let info = b.info().await.unwrap();
    assert_eq!(info.lifecycle, Lifecycle::Idle);
    assert!(matches!(
        a.add_player(Player::new(PlayerId(3), "carol")).await,
        Err(GameError::InvalidState { .. })
    ));
    b.add_player(Player::new(PlayerId(3), "carol")).await.unwrap();
}
