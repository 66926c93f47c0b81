//! Random challenge-token generation.

use rand::Rng;
use tracing::warn;

/// The 26 Latin letters challenge tokens are drawn from by default.
///
/// Matching is case-insensitive, so a single case is enough here.
pub const DEFAULT_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generates fixed-length random strings over a fixed alphabet.
///
/// Characters are drawn uniformly with replacement. The generator has no
/// state of its own — randomness comes from the RNG the caller passes in,
/// so tests can use a seeded `StdRng` for deterministic output.
#[derive(Debug, Clone)]
pub struct TokenGenerator {
    alphabet: Vec<char>,
}

impl TokenGenerator {
    /// Creates a generator over the given alphabet.
    ///
    /// An empty alphabet is a misconfiguration; it is replaced with
    /// [`DEFAULT_ALPHABET`] so `generate` always has something to draw
    /// from.
    pub fn new(alphabet: &str) -> Self {
        let mut alphabet: Vec<char> = alphabet.chars().collect();
        if alphabet.is_empty() {
            warn!("empty token alphabet — falling back to A-Z");
            alphabet = DEFAULT_ALPHABET.chars().collect();
        }
        Self { alphabet }
    }

    /// Returns a random string of exactly `length` characters.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, length: usize) -> String {
        (0..length)
            .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())])
            .collect()
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHABET)
    }
}
