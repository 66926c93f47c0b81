//! Game configuration.

use std::time::Duration;

use crate::token::DEFAULT_ALPHABET;

/// Configuration for one game session.
///
/// The hosting glue can override any of these; the engine itself never
/// changes them. Difficulty state starts from these values and escalates
/// from round two onward.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Response budget in force for round one.
    pub initial_speed_budget: Duration,

    /// Challenge token length for round one.
    pub initial_token_length: usize,

    /// Pause between announcing a round/turn result and presenting the
    /// next challenge. Reading time — not part of the response budget.
    pub presentation_delay: Duration,

    /// Characters the challenge tokens are drawn from.
    pub alphabet: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_speed_budget: Duration::from_millis(4000),
            initial_token_length: 1,
            presentation_delay: Duration::from_millis(3000),
            alphabet: DEFAULT_ALPHABET.to_string(),
        }
    }
}
