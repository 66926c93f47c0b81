//! Rendering of game events into channel announcements.

use quickdraw_protocol::GameEvent;

use crate::{Catalog, markdown};

/// Turns a typed game event into the localized line the channel sees.
pub fn render_event(catalog: &Catalog, event: &GameEvent) -> String {
    match event {
        GameEvent::RoundStarted { speed_budget_ms } => catalog.f(
            "game.newRound",
            &[("speed", &speed_budget_ms.to_string())],
        ),
        // The challenge line is the same in every language.
        GameEvent::TurnPresented { username, token } => {
            format!("{username}: {}", markdown::bold(token))
        }
        GameEvent::TurnPassed {
            username,
            elapsed_ms,
        } => catalog.f(
            "game.turnPassed",
            &[("username", username), ("elapsed", &elapsed_ms.to_string())],
        ),
        GameEvent::TooSlow {
            username,
            elapsed_ms,
        } => catalog.f(
            "game.tooSlow",
            &[("username", username), ("elapsed", &elapsed_ms.to_string())],
        ),
        GameEvent::WrongInput { username } => {
            catalog.f("game.wrongInput", &[("username", username)])
        }
        GameEvent::Won { username } => {
            catalog.f("game.win", &[("username", username)])
        }
    }
}
