//! Difficulty escalation policy.
//!
//! Pure functions mapping the previous round's difficulty to the next
//! round's. The engine applies exactly one of them per round transition,
//! starting with the second round — round one always plays with the
//! configured defaults.

use std::time::Duration;

/// Next response budget under speed mode: tiered linear decay.
///
/// Large budgets shrink fast, small ones slowly, so early rounds ramp up
/// quickly while the endgame stays playable a while longer. The budget
/// saturates at zero — once there, every response is "too slow" and the
/// game resolves within one round.
pub fn next_speed_budget(previous: Duration) -> Duration {
    let step = if previous <= Duration::from_millis(300) {
        Duration::from_millis(20)
    } else if previous <= Duration::from_millis(1000) {
        Duration::from_millis(100)
    } else {
        Duration::from_millis(200)
    };
    previous.saturating_sub(step)
}

/// Next token length under length mode: one more character per round.
pub fn next_token_length(previous: usize) -> usize {
    previous + 1
}
