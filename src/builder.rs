use std::rc::Rc;

use tracing::{debug, error};

use crate::{
    binding::{LocalizationAction, PropertyResolver, PropertyTable},
    dictionary::LanguageDictionary,
    error::Error,
    global,
    localizer::Localizer,
    options::LocalizerOptions,
    types::StringResources,
};

/// Builder for creating a [`Localizer`] with a fluent interface.
///
/// Dictionaries, actions and the property resolver are collected first and
/// handed to the localizer in one go; the default language from the options
/// is applied last.
///
/// # Example
///
/// ```rust
/// use langbind::{LocalizerBuilder, LocalizerOptions, StringResources};
///
/// let localizer = LocalizerBuilder::new()
///     .set_options(LocalizerOptions::new().with_default_language("en-US"))
///     .add_string_resources(StringResources::new("en-US").with_entry("Greeting.Text", "Hello"))
///     .add_string_resources(StringResources::new("ja").with_entry("Greeting.Text", "こんにちは"))
///     .build()?;
///
/// assert_eq!(localizer.get_current_language(), "en-US");
/// assert_eq!(localizer.get_localized_string("Greeting")?, "Hello");
/// # Ok::<(), langbind::Error>(())
/// ```
pub struct LocalizerBuilder {
    options: LocalizerOptions,
    dictionaries: Vec<Rc<LanguageDictionary>>,
    default_dictionary: Option<Rc<LanguageDictionary>>,
    actions: Vec<LocalizationAction>,
    properties: Rc<dyn PropertyResolver>,
}

impl LocalizerBuilder {
    /// Creates a new `LocalizerBuilder` with default options and no
    /// dictionaries.
    pub fn new() -> Self {
        Self {
            options: LocalizerOptions::default(),
            dictionaries: Vec::new(),
            default_dictionary: None,
            actions: Vec::new(),
            properties: Rc::new(PropertyTable::new()),
        }
    }

    pub fn set_options(mut self, options: LocalizerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn add_language_dictionary(mut self, dictionary: Rc<LanguageDictionary>) -> Self {
        self.dictionaries.push(dictionary);
        self
    }

    /// Adds a loader-produced string table as a new dictionary.
    pub fn add_string_resources(self, resources: StringResources) -> Self {
        self.add_language_dictionary(Rc::new(LanguageDictionary::from_resources(resources)))
    }

    pub fn set_default_dictionary(mut self, dictionary: Rc<LanguageDictionary>) -> Self {
        self.default_dictionary = Some(dictionary);
        self
    }

    pub fn add_localization_action(mut self, action: LocalizationAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Sets the resolver used to find element properties by name.
    pub fn set_property_resolver(mut self, properties: Rc<dyn PropertyResolver>) -> Self {
        self.properties = properties;
        self
    }

    /// Builds the localizer.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidLanguage`] in strict mode when a dictionary's
    ///   language is not a valid language identifier.
    /// * Any error from applying the default language.
    pub fn build(self) -> Result<Rc<Localizer>, Error> {
        if self.options.strict {
            self.validate_languages()?;
        }

        let default_language = self.options.default_language.clone();
        let localizer = Localizer::with_property_resolver(self.options, self.properties);
        if let Some(dictionary) = self.default_dictionary {
            localizer.set_default_dictionary(dictionary);
        }
        for action in self.actions {
            localizer.add_localization_action(action);
        }
        for dictionary in self.dictionaries {
            localizer.add_language_dictionary(dictionary);
        }

        if !default_language.is_empty() {
            localizer.set_language(&default_language)?;
        }
        debug!(language = %default_language, "built localizer");
        Ok(Rc::new(localizer))
    }

    /// Builds the localizer and installs it in the thread slot.
    ///
    /// Fails with [`Error::AlreadyBuilt`] without building when a localizer is
    /// already installed.
    pub fn build_global(self) -> Result<Rc<Localizer>, Error> {
        if global::is_installed() {
            error!("a localizer is already installed for this thread");
            return Err(Error::AlreadyBuilt);
        }
        let localizer = self.build()?;
        global::install(Rc::clone(&localizer))?;
        Ok(localizer)
    }

    fn validate_languages(&self) -> Result<(), Error> {
        for dictionary in &self.dictionaries {
            if dictionary.parse_language_identifier().is_none() {
                error!(
                    language = dictionary.language(),
                    name = dictionary.name(),
                    "invalid language identifier"
                );
                return Err(Error::InvalidLanguage(dictionary.language().to_string()));
            }
        }
        Ok(())
    }
}

impl Default for LocalizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_applies_default_language() {
        let localizer = LocalizerBuilder::new()
            .set_options(LocalizerOptions::new().with_default_language("ja"))
            .add_string_resources(StringResources::new("en-US").with_entry("Title.Text", "Title"))
            .add_string_resources(StringResources::new("ja").with_entry("Title.Text", "題名"))
            .build()
            .unwrap();

        assert_eq!(localizer.get_current_language(), "ja");
        assert_eq!(localizer.get_localized_string("Title").unwrap(), "題名");
        assert_eq!(localizer.get_language_dictionaries("").len(), 2);
    }

    #[test]
    fn test_build_without_default_language() {
        let localizer = LocalizerBuilder::default().build().unwrap();
        assert_eq!(localizer.get_current_language(), "");
    }

    #[test]
    fn test_build_sets_default_dictionary() {
        let fallback = Rc::new(LanguageDictionary::new(""));
        fallback.add_resource("Shared.Text", "shared");

        let localizer = LocalizerBuilder::new()
            .set_default_dictionary(fallback)
            .build()
            .unwrap();

        assert_eq!(localizer.get_localized_string("Shared").unwrap(), "shared");
    }

    #[test]
    fn test_strict_rejects_invalid_language() {
        let result = LocalizerBuilder::new()
            .set_options(LocalizerOptions::new().with_strict(true))
            .add_string_resources(StringResources::new("en-US"))
            .add_string_resources(StringResources::new("not a language!"))
            .build();

        assert!(matches!(
            result,
            Err(Error::InvalidLanguage(ref language)) if language == "not a language!"
        ));
    }

    #[test]
    fn test_lenient_accepts_any_language() {
        let localizer = LocalizerBuilder::new()
            .add_string_resources(StringResources::new("Klingon (fictional)"))
            .build()
            .unwrap();
        assert_eq!(
            localizer.get_available_languages().unwrap(),
            vec!["Klingon (fictional)".to_string()]
        );
    }

    #[test]
    fn test_build_global_twice_fails() {
        let first = LocalizerBuilder::new().build_global().unwrap();
        let error = LocalizerBuilder::new().build_global().unwrap_err();

        assert!(matches!(error, Error::AlreadyBuilt));
        assert!(global::localizer().is_some_and(|installed| Rc::ptr_eq(&installed, &first)));
        global::uninstall();
    }
}
