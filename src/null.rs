//! A do-nothing [`Localize`] used before any localizer is installed.

use std::rc::Rc;

use crate::{
    dictionary::LanguageDictionary,
    error::Error,
    events::{LanguageChanged, SubscriptionId},
    traits::Localize,
};

/// Echoes uids back and ignores every mutation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLocalizer;

impl Localize for NullLocalizer {
    fn add_language_dictionary(&self, _dictionary: Rc<LanguageDictionary>) -> bool {
        false
    }

    fn remove_language_dictionary(&self, _dictionary: &LanguageDictionary) -> bool {
        false
    }

    fn get_language_dictionaries(&self, _language: &str) -> Vec<Rc<LanguageDictionary>> {
        Vec::new()
    }

    fn get_available_languages(&self) -> Result<Vec<String>, Error> {
        Ok(Vec::new())
    }

    fn get_current_language(&self) -> String {
        String::new()
    }

    fn set_language(&self, _language: &str) -> Result<(), Error> {
        Ok(())
    }

    fn get_localized_string(&self, uid: &str) -> Result<String, Error> {
        Ok(uid.to_string())
    }

    fn get_localized_strings(&self, uid: &str) -> Result<Vec<String>, Error> {
        Ok(vec![uid.to_string()])
    }

    fn on_language_changed(&self, _handler: Box<dyn Fn(&LanguageChanged)>) -> SubscriptionId {
        SubscriptionId::NONE
    }
}
