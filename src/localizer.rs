//! The localizer: the dictionary set, the current language, and the
//! re-localization of registered elements.
//!
//! # Lookup order
//!
//! The dictionaries of the current language are ordered by descending
//! priority (ties keep insertion order). A uid's matches are collected in that
//! order, item insertion order within a dictionary. When no current-language
//! dictionary has the uid, the default dictionary is consulted instead.
//!
//! Values are applied from the lowest priority dictionary to the highest, so
//! the last write wins per property: [`Localizer::get_localized_string`]
//! returns the last item of the highest priority dictionary holding the uid.

use std::{cell::RefCell, cmp::Reverse, rc::Rc};

use tracing::{error, info, warn};

use crate::{
    binding::{BindingResolver, LocalizationAction, PropertyResolver, PropertyTable},
    dictionary::LanguageDictionary,
    error::Error,
    events::{
        ElementReferenceAdded, ElementReferenceRemoved, Event, LanguageChanged,
        LanguageDictionaryAdded, LanguageDictionaryRemoved, SubscriptionId,
    },
    options::LocalizerOptions,
    registry::ElementRegistry,
    traits::{Element, Localize},
    types::{LanguageDictionaryItem, UidTarget},
};

type Matches = Vec<Vec<Rc<LanguageDictionaryItem>>>;

struct State {
    dictionaries: Vec<Rc<LanguageDictionary>>,
    current_language: String,
    default_dictionary: Rc<LanguageDictionary>,
}

/// Owns every language dictionary and re-localizes registered elements when
/// the language changes.
///
/// Single-threaded: share it as `Rc<Localizer>`. No internal borrow is held
/// while element, action or event handler code runs, so that code may call
/// back into the localizer.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use langbind::{LanguageDictionary, Localize, Localizer, LocalizerOptions};
///
/// let localizer = Localizer::new(LocalizerOptions::default());
///
/// let english = LanguageDictionary::new("en-US");
/// english.add_resource("Greeting.Text", "Hello");
/// localizer.add_language_dictionary(Rc::new(english));
///
/// localizer.set_language("en-US")?;
/// assert_eq!(localizer.get_localized_string("Greeting")?, "Hello");
/// # Ok::<(), langbind::Error>(())
/// ```
pub struct Localizer {
    options: LocalizerOptions,
    state: RefCell<State>,
    current_dictionaries: RefCell<Option<Rc<[Rc<LanguageDictionary>]>>>,
    registry: ElementRegistry,
    actions: RefCell<Vec<LocalizationAction>>,
    properties: Rc<dyn PropertyResolver>,
    language_changed: Event<LanguageChanged>,
    dictionary_added: Event<LanguageDictionaryAdded>,
    dictionary_removed: Event<LanguageDictionaryRemoved>,
}

impl Localizer {
    /// Creates an empty localizer that resolves no properties.
    pub fn new(options: LocalizerOptions) -> Self {
        Self::with_property_resolver(options, Rc::new(PropertyTable::new()))
    }

    pub fn with_property_resolver(
        options: LocalizerOptions,
        properties: Rc<dyn PropertyResolver>,
    ) -> Self {
        Self {
            options,
            state: RefCell::new(State {
                dictionaries: Vec::new(),
                current_language: String::new(),
                default_dictionary: Rc::new(LanguageDictionary::new("")),
            }),
            current_dictionaries: RefCell::new(None),
            registry: ElementRegistry::new(),
            actions: RefCell::new(Vec::new()),
            properties,
            language_changed: Event::new(),
            dictionary_added: Event::new(),
            dictionary_removed: Event::new(),
        }
    }

    pub fn options(&self) -> &LocalizerOptions {
        &self.options
    }

    /// Replaces the language-agnostic fallback dictionary.
    pub fn set_default_dictionary(&self, dictionary: Rc<LanguageDictionary>) {
        info!(
            name = dictionary.name(),
            items = dictionary.len(),
            "set default dictionary"
        );
        self.state.borrow_mut().default_dictionary = dictionary;
    }

    pub fn default_dictionary(&self) -> Rc<LanguageDictionary> {
        Rc::clone(&self.state.borrow().default_dictionary)
    }

    pub fn add_localization_action(&self, action: LocalizationAction) {
        self.actions.borrow_mut().push(action);
    }

    pub fn add_language_dictionary(&self, dictionary: Rc<LanguageDictionary>) -> bool {
        {
            let mut state = self.state.borrow_mut();
            if state.dictionaries.iter().any(|d| d.is_same_as(&dictionary)) {
                warn!(
                    language = dictionary.language(),
                    name = dictionary.name(),
                    "language dictionary already exists"
                );
                return false;
            }
            state.dictionaries.push(Rc::clone(&dictionary));
        }
        self.invalidate_current_dictionaries();

        info!(
            language = dictionary.language(),
            name = dictionary.name(),
            priority = dictionary.priority(),
            items = dictionary.len(),
            "added language dictionary"
        );
        self.dictionary_added
            .emit(&LanguageDictionaryAdded { dictionary });
        true
    }

    pub fn remove_language_dictionary(&self, dictionary: &LanguageDictionary) -> bool {
        let removed = {
            let mut state = self.state.borrow_mut();
            match state
                .dictionaries
                .iter()
                .position(|d| d.is_same_as(dictionary))
            {
                Some(index) => state.dictionaries.remove(index),
                None => return false,
            }
        };
        self.invalidate_current_dictionaries();

        info!(
            language = removed.language(),
            name = removed.name(),
            "removed language dictionary"
        );
        self.dictionary_removed.emit(&LanguageDictionaryRemoved {
            dictionary: removed,
        });
        true
    }

    /// All dictionaries in insertion order when `language` is empty; otherwise
    /// that language's dictionaries by descending priority.
    pub fn get_language_dictionaries(&self, language: &str) -> Vec<Rc<LanguageDictionary>> {
        let state = self.state.borrow();
        if language.is_empty() {
            return state.dictionaries.clone();
        }
        sorted_for_language(&state.dictionaries, language)
    }

    /// Distinct languages in first-seen order.
    pub fn get_available_languages(&self) -> Result<Vec<String>, Error> {
        // Only fails when called while the state is mutably borrowed, which no
        // public path does today; reported as a typed error rather than a panic.
        let state = self.state.try_borrow().map_err(|e| {
            let error = Error::FailedToGetAvailableLanguages {
                source: Box::new(e),
            };
            error!(%error, "failed to get available languages");
            error
        })?;

        let mut languages: Vec<String> = Vec::new();
        for dictionary in &state.dictionaries {
            if !languages.iter().any(|l| l == dictionary.language()) {
                languages.push(dictionary.language().to_string());
            }
        }
        Ok(languages)
    }

    pub fn get_current_language(&self) -> String {
        self.state.borrow().current_language.clone()
    }

    /// The current language's dictionaries by descending priority.
    pub fn current_language_dictionaries(&self) -> Vec<Rc<LanguageDictionary>> {
        self.cached_current_dictionaries().to_vec()
    }

    /// Switches the current language, re-localizes every live element and
    /// publishes [`LanguageChanged`].
    ///
    /// The new language stays current even when re-localization fails.
    pub fn set_language(&self, language: &str) -> Result<(), Error> {
        let previous = {
            let mut state = self.state.try_borrow_mut().map_err(|e| {
                Error::Host(Box::new(e)).into_set_language_error("", language)
            })?;
            std::mem::replace(&mut state.current_language, language.to_string())
        };
        self.invalidate_current_dictionaries();

        if self.cached_current_dictionaries().is_empty() {
            warn!(language, "no language dictionaries for language");
        }

        if let Err(e) = self.localize_elements() {
            let e = e.into_set_language_error(&previous, language);
            error!(error = %e, previous = %previous, current = language, "failed to set language");
            return Err(e);
        }

        self.language_changed.emit(&LanguageChanged {
            previous: previous.clone(),
            current: language.to_string(),
        });
        info!(previous = %previous, current = language, "changed language");
        Ok(())
    }

    /// The winning value for `uid`, or the not-found placeholder.
    pub fn get_localized_string(&self, uid: &str) -> Result<String, Error> {
        let matches = self.lookup_boundary(uid)?;
        match matches.first().and_then(|items| items.last()) {
            Some(item) => Ok(item.value()),
            None => {
                warn!(uid, language = %self.get_current_language(), "localized string not found");
                Ok(self.not_found_placeholder(uid))
            }
        }
    }

    /// Every value for `uid` in lookup order.
    pub fn get_localized_strings(&self, uid: &str) -> Result<Vec<String>, Error> {
        let matches = self.lookup_boundary(uid)?;
        if matches.is_empty() {
            warn!(uid, language = %self.get_current_language(), "localized strings not found");
            let placeholder = self.not_found_placeholder(uid);
            return Ok(if placeholder.is_empty() {
                Vec::new()
            } else {
                vec![placeholder]
            });
        }
        Ok(matches.iter().flatten().map(|item| item.value()).collect())
    }

    /// Stores a weak handle to `element` and localizes it right away.
    pub fn register_element(&self, element: &Rc<dyn Element>) -> Result<(), Error> {
        self.registry.add(element);
        self.localize_element(element.as_ref())
    }

    /// Applies the current language to one element.
    pub fn localize_element(&self, element: &dyn Element) -> Result<(), Error> {
        let Some(uid_source) = element.uid().filter(|uid| !uid.is_empty()) else {
            warn!(element_type = element.type_name(), "element does not have a uid");
            return Ok(());
        };

        let target = UidTarget::parse(&uid_source);
        let matches = self.lookup(target.uid)?;
        if matches.is_empty() {
            warn!(
                element_type = element.type_name(),
                uid = target.uid,
                "uid not found in dictionaries"
            );
            return Ok(());
        }

        let actions = self.actions.borrow().clone();
        let resolver = BindingResolver {
            properties: self.properties.as_ref(),
            actions: &actions,
        };
        for item in matches.iter().rev().flatten() {
            let property_name = target
                .property_name
                .as_deref()
                .unwrap_or(item.property_name());
            resolver.apply(element, &uid_source, property_name, &item.value())?;
        }
        Ok(())
    }

    /// Number of stored element handles, dead ones included until the next
    /// language switch purges them.
    pub fn registered_element_count(&self) -> usize {
        self.registry.len()
    }

    pub fn on_language_changed(
        &self,
        handler: impl Fn(&LanguageChanged) + 'static,
    ) -> SubscriptionId {
        self.language_changed.subscribe(handler)
    }

    pub fn unsubscribe_language_changed(&self, id: SubscriptionId) -> bool {
        self.language_changed.unsubscribe(id)
    }

    pub fn on_dictionary_added(
        &self,
        handler: impl Fn(&LanguageDictionaryAdded) + 'static,
    ) -> SubscriptionId {
        self.dictionary_added.subscribe(handler)
    }

    pub fn unsubscribe_dictionary_added(&self, id: SubscriptionId) -> bool {
        self.dictionary_added.unsubscribe(id)
    }

    pub fn on_dictionary_removed(
        &self,
        handler: impl Fn(&LanguageDictionaryRemoved) + 'static,
    ) -> SubscriptionId {
        self.dictionary_removed.subscribe(handler)
    }

    pub fn unsubscribe_dictionary_removed(&self, id: SubscriptionId) -> bool {
        self.dictionary_removed.unsubscribe(id)
    }

    pub fn on_element_added(
        &self,
        handler: impl Fn(&ElementReferenceAdded) + 'static,
    ) -> SubscriptionId {
        self.registry.on_added(handler)
    }

    pub fn unsubscribe_element_added(&self, id: SubscriptionId) -> bool {
        self.registry.unsubscribe_added(id)
    }

    pub fn on_element_removed(
        &self,
        handler: impl Fn(&ElementReferenceRemoved) + 'static,
    ) -> SubscriptionId {
        self.registry.on_removed(handler)
    }

    pub fn unsubscribe_element_removed(&self, id: SubscriptionId) -> bool {
        self.registry.unsubscribe_removed(id)
    }

    fn localize_elements(&self) -> Result<(), Error> {
        for element in self.registry.live_elements() {
            self.localize_element(element.as_ref())?;
        }
        Ok(())
    }

    fn invalidate_current_dictionaries(&self) {
        self.current_dictionaries.replace(None);
    }

    fn cached_current_dictionaries(&self) -> Rc<[Rc<LanguageDictionary>]> {
        if let Some(cached) = self.current_dictionaries.borrow().as_ref() {
            return Rc::clone(cached);
        }
        let computed: Rc<[Rc<LanguageDictionary>]> = {
            let state = self.state.borrow();
            sorted_for_language(&state.dictionaries, &state.current_language).into()
        };
        self.current_dictionaries
            .replace(Some(Rc::clone(&computed)));
        computed
    }

    /// Matches grouped per dictionary, highest priority first.
    fn lookup(&self, uid: &str) -> Result<Matches, Error> {
        let mut matches: Matches = self
            .cached_current_dictionaries()
            .iter()
            .filter_map(|dictionary| dictionary.try_get_items(uid))
            .collect();

        // The default dictionary is consulted only when no current-language
        // dictionary has the uid. The borrow failure is mapped like
        // `get_available_languages` above.
        if matches.is_empty() {
            let state = self
                .state
                .try_borrow()
                .map_err(|e| Error::Host(Box::new(e)))?;
            if let Some(items) = state.default_dictionary.try_get_items(uid) {
                matches.push(items);
            }
        }
        Ok(matches)
    }

    fn lookup_boundary(&self, uid: &str) -> Result<Matches, Error> {
        self.lookup(uid).map_err(|e| {
            let e = e.into_lookup_error(uid);
            error!(error = %e, uid, "failed to get localized string");
            e
        })
    }

    fn not_found_placeholder(&self, uid: &str) -> String {
        if self.options.use_uid_when_localized_string_not_found {
            uid.to_string()
        } else {
            String::new()
        }
    }
}

fn sorted_for_language(
    dictionaries: &[Rc<LanguageDictionary>],
    language: &str,
) -> Vec<Rc<LanguageDictionary>> {
    let mut selected: Vec<Rc<LanguageDictionary>> = dictionaries
        .iter()
        .filter(|d| d.language() == language)
        .cloned()
        .collect();
    selected.sort_by_key(|d| Reverse(d.priority()));
    selected
}

impl Localize for Localizer {
    fn add_language_dictionary(&self, dictionary: Rc<LanguageDictionary>) -> bool {
        Localizer::add_language_dictionary(self, dictionary)
    }

    fn remove_language_dictionary(&self, dictionary: &LanguageDictionary) -> bool {
        Localizer::remove_language_dictionary(self, dictionary)
    }

    fn get_language_dictionaries(&self, language: &str) -> Vec<Rc<LanguageDictionary>> {
        Localizer::get_language_dictionaries(self, language)
    }

    fn get_available_languages(&self) -> Result<Vec<String>, Error> {
        Localizer::get_available_languages(self)
    }

    fn get_current_language(&self) -> String {
        Localizer::get_current_language(self)
    }

    fn set_language(&self, language: &str) -> Result<(), Error> {
        Localizer::set_language(self, language)
    }

    fn get_localized_string(&self, uid: &str) -> Result<String, Error> {
        Localizer::get_localized_string(self, uid)
    }

    fn get_localized_strings(&self, uid: &str) -> Result<Vec<String>, Error> {
        Localizer::get_localized_strings(self, uid)
    }

    fn on_language_changed(&self, handler: Box<dyn Fn(&LanguageChanged)>) -> SubscriptionId {
        self.language_changed.subscribe(handler)
    }
}

impl std::fmt::Debug for Localizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Localizer")
            .field("current_language", &state.current_language)
            .field("dictionaries", &state.dictionaries.len())
            .field("registry", &self.registry)
            .field("options", &self.options)
            .finish()
    }
}
