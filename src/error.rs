//! All error types for the langbind crate.
//!
//! Missing identifiers and missing properties are not errors; they are logged
//! and degrade to a harmless default. Everything below is what callers can
//! actually observe.

use thiserror::Error;

/// Failure reported by host code (element property writers, localization
/// actions, value converters).
pub type HostError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("a localizer is already built for this thread")]
    AlreadyBuilt,

    #[error("failed to get available languages")]
    FailedToGetAvailableLanguages {
        #[source]
        source: HostError,
    },

    #[error("failed to get localized string for uid `{uid}`")]
    FailedToGetLocalizedString {
        uid: String,
        #[source]
        source: HostError,
    },

    #[error("failed to set language `{previous}` -> `{current}`")]
    FailedToSetLanguage {
        previous: String,
        current: String,
        #[source]
        source: HostError,
    },

    #[error("failed to convert value `{value}` to `{target_type}` for uid `{uid}`")]
    FailedToConvertValue {
        uid: String,
        target_type: String,
        value: String,
        #[source]
        source: Option<HostError>,
    },

    #[error("invalid language tag: {0}")]
    InvalidLanguage(String),

    #[error("host error: {0}")]
    Host(#[source] HostError),
}

impl Error {
    /// Creates a new value conversion error with optional source error
    pub fn conversion_error(
        uid: impl Into<String>,
        target_type: impl Into<String>,
        value: impl Into<String>,
        source: Option<HostError>,
    ) -> Self {
        Error::FailedToConvertValue {
            uid: uid.into(),
            target_type: target_type.into(),
            value: value.into(),
            source,
        }
    }

    /// Whether this error already belongs to the localizer taxonomy and must
    /// pass through wrapping boundaries unchanged.
    pub fn is_localizer_error(&self) -> bool {
        !matches!(self, Error::Host(_))
    }

    /// Wraps a raw host failure into [`Error::FailedToSetLanguage`]; typed
    /// errors are returned as they are.
    pub(crate) fn into_set_language_error(self, previous: &str, current: &str) -> Self {
        match self {
            Error::Host(source) => Error::FailedToSetLanguage {
                previous: previous.to_string(),
                current: current.to_string(),
                source,
            },
            other => other,
        }
    }

    /// Wraps a raw host failure into [`Error::FailedToGetLocalizedString`].
    pub(crate) fn into_lookup_error(self, uid: &str) -> Self {
        match self {
            Error::Host(source) => Error::FailedToGetLocalizedString {
                uid: uid.to_string(),
                source,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn host_error(message: &str) -> HostError {
        Box::new(io::Error::other(message.to_string()))
    }

    #[test]
    fn test_already_built_error() {
        let error = Error::AlreadyBuilt;
        assert_eq!(
            error.to_string(),
            "a localizer is already built for this thread"
        );
        assert!(error.is_localizer_error());
    }

    #[test]
    fn test_conversion_error_carries_diagnostics() {
        let error = Error::conversion_error("Btn", "Visibility", "Sometimes", None);
        assert_eq!(
            error.to_string(),
            "failed to convert value `Sometimes` to `Visibility` for uid `Btn`"
        );
        match error {
            Error::FailedToConvertValue {
                uid,
                target_type,
                value,
                source,
            } => {
                assert_eq!(uid, "Btn");
                assert_eq!(target_type, "Visibility");
                assert_eq!(value, "Sometimes");
                assert!(source.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_host_error_is_wrapped_on_set_language() {
        let error = Error::Host(host_error("boom")).into_set_language_error("en-US", "ja");
        assert!(matches!(
            &error,
            Error::FailedToSetLanguage { previous, current, .. }
                if previous == "en-US" && current == "ja"
        ));
        let source = std::error::Error::source(&error).unwrap();
        assert_eq!(source.to_string(), "boom");
    }

    #[test]
    fn test_typed_error_passes_through_wrapping() {
        let error = Error::conversion_error("Btn", "bool", "maybe", None)
            .into_set_language_error("en-US", "ja");
        assert!(matches!(error, Error::FailedToConvertValue { .. }));

        let error = Error::AlreadyBuilt.into_lookup_error("Btn");
        assert!(matches!(error, Error::AlreadyBuilt));
    }

    #[test]
    fn test_host_error_is_wrapped_on_lookup() {
        let error = Error::Host(host_error("broken")).into_lookup_error("Title");
        assert_eq!(
            error.to_string(),
            "failed to get localized string for uid `Title`"
        );
        assert!(error.is_localizer_error());
    }

    #[test]
    fn test_error_debug() {
        let error = Error::InvalidLanguage("not a tag".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("InvalidLanguage"));
        assert!(debug.contains("not a tag"));
    }
}
