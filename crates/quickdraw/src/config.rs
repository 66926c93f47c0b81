//! Bot configuration from the environment.

use std::env;

use crate::Language;

/// Environment variable holding the command prefix.
const ENV_PREFIX: &str = "QUICKDRAW_PREFIX";
/// Environment variable holding the catalog language.
const ENV_LANGUAGE: &str = "QUICKDRAW_LANGUAGE";

/// Host-side settings: how commands look and what language the bot speaks.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Command prefix, e.g. `!qd` in `!qd start`.
    pub prefix: String,
    /// Announcement language.
    pub language: Language,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: "!qd".to_string(),
            language: Language::default(),
        }
    }
}

impl BotConfig {
    /// Reads `QUICKDRAW_PREFIX` and `QUICKDRAW_LANGUAGE`, falling back to
    /// the defaults (`!qd`, English). An unknown language falls back with
    /// a log line rather than failing startup.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let prefix = env::var(ENV_PREFIX).unwrap_or(defaults.prefix);
        let language = match env::var(ENV_LANGUAGE) {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::error!(language = %raw, "unknown language, using English");
                Language::En
            }),
            Err(_) => defaults.language,
        };
        Self { prefix, language }
    }
}
