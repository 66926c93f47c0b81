//! Localized message catalog.
//!
//! Catalogs are embedded at compile time (no persisted state, nothing to
//! deploy next to the binary). Lookup never fails hard: a missing key is
//! logged and the key itself is announced, which is ugly but debuggable.

use std::collections::HashMap;
use std::str::FromStr;

use tracing::error;

/// Supported catalog languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    De,
}

/// Error returned when parsing an unknown language name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language: {0}")]
pub struct ParseLanguageError(pub String);

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "de" => Ok(Self::De),
            other => Err(ParseLanguageError(other.to_string())),
        }
    }
}

/// A key → template map for one language.
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    /// Loads the embedded catalog for `language`.
    pub fn new(language: Language) -> Self {
        let raw = match language {
            Language::En => include_str!("../lang/en.json"),
            Language::De => include_str!("../lang/de.json"),
        };
        let entries =
            serde_json::from_str(raw).expect("embedded language catalog is valid JSON");
        Self { entries }
    }

    /// Translates `key`, falling back to the key itself if unknown.
    pub fn t(&self, key: &str) -> String {
        match self.entries.get(key) {
            Some(template) => template.clone(),
            None => {
                error!(key, "missing translation");
                key.to_string()
            }
        }
    }

    /// Translates `key` and substitutes every `{{name}}` placeholder.
    pub fn f(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.t(key);
        for (name, value) in args {
            text = text.replace(&format!("{{{{{name}}}}}"), value);
        }
        text
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert_eq!("DE".parse::<Language>().unwrap(), Language::De);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_translate_known_key() {
        let catalog = Catalog::new(Language::En);
        assert_eq!(catalog.t("error.noGameActive"), "No game is running");
    }

    #[test]
    fn test_missing_key_falls_back_to_key() {
        let catalog = Catalog::new(Language::En);
        assert_eq!(catalog.t("no.such.key"), "no.such.key");
    }

    #[test]
    fn test_format_substitutes_placeholders() {
        let catalog = Catalog::new(Language::En);
        let text = catalog.f(
            "game.tooSlow",
            &[("username", "alice"), ("elapsed", "4100")],
        );
        assert_eq!(text, "alice was too slow! (4100ms)");
    }

    #[test]
    fn test_german_catalog_loads() {
        let catalog = Catalog::new(Language::De);
        let text = catalog.f("game.win", &[("username", "bob")]);
        assert_eq!(text, "bob hat gewonnen!");
    }

    #[test]
    fn test_catalogs_cover_the_same_keys() {
        let en = Catalog::new(Language::En);
        let de = Catalog::new(Language::De);
        let mut en_keys: Vec<&String> = en.entries.keys().collect();
        let mut de_keys: Vec<&String> = de.entries.keys().collect();
        en_keys.sort();
        de_keys.sort();
        assert_eq!(en_keys, de_keys);
    }
}
