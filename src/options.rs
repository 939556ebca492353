//! Localizer configuration.

use serde::{Deserialize, Serialize};

/// Behavior options for [`crate::Localizer`] and [`crate::LocalizerBuilder`].
///
/// Deserializable so hosts can keep it inside their own configuration files;
/// every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LocalizerOptions {
    /// Language applied by the builder once all dictionaries are added.
    pub default_language: String,
    /// Echo the uid back instead of an empty string when nothing matches.
    pub use_uid_when_localized_string_not_found: bool,
    /// Reject dictionaries whose language is not a valid BCP 47 tag.
    pub strict: bool,
}

impl LocalizerOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the language applied at build time.
    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    /// Enables/disables echoing the uid for missing strings.
    pub fn with_uid_when_not_found(mut self, enabled: bool) -> Self {
        self.use_uid_when_localized_string_not_found = enabled;
        self
    }

    /// Enables/disables strict mode.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = LocalizerOptions::new();
        assert_eq!(options.default_language, "");
        assert!(!options.use_uid_when_localized_string_not_found);
        assert!(!options.strict);
    }

    #[test]
    fn test_builder_setters() {
        let options = LocalizerOptions::new()
            .with_default_language("en-US")
            .with_uid_when_not_found(true)
            .with_strict(true);
        assert_eq!(options.default_language, "en-US");
        assert!(options.use_uid_when_localized_string_not_found);
        assert!(options.strict);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let options: LocalizerOptions =
            serde_json::from_str(r#"{ "default_language": "ja" }"#).unwrap();
        assert_eq!(
            options,
            LocalizerOptions::new().with_default_language("ja")
        );
    }
}
