//! Per-language string tables indexed by uid.

use std::{cell::RefCell, collections::HashMap, fmt::Display, rc::Rc};

use unic_langid::LanguageIdentifier;

use crate::types::{LanguageDictionaryItem, StringResources};

/// A named, prioritized collection of items for one language.
///
/// Dictionaries are append-only. They are shared as `Rc<LanguageDictionary>`
/// so items can still be appended after the dictionary was handed to a
/// [`Localizer`](crate::Localizer).
#[derive(Debug)]
pub struct LanguageDictionary {
    language: String,
    name: String,
    priority: i32,
    items: RefCell<HashMap<String, Vec<Rc<LanguageDictionaryItem>>>>,
}

impl LanguageDictionary {
    /// Creates an empty dictionary named after its language.
    pub fn new(language: impl Into<String>) -> Self {
        let language = language.into();
        Self {
            name: language.clone(),
            language,
            priority: 0,
            items: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Higher priority dictionaries win over lower ones of the same language.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Builds a dictionary from a loader's string table.
    pub fn from_resources(resources: StringResources) -> Self {
        let dictionary = LanguageDictionary::new(resources.language.as_str())
            .with_name(resources.dictionary_name())
            .with_priority(resources.priority);
        for entry in resources.entries {
            dictionary.add_item(Rc::new(LanguageDictionaryItem::from_resource_name(
                &entry.name,
                entry.value,
            )));
        }
        dictionary
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Whether `other` is the same dictionary for the localizer's set.
    pub fn is_same_as(&self, other: &LanguageDictionary) -> bool {
        self.language == other.language && self.name == other.name
    }

    /// Appends an item to its uid bucket. Duplicates are kept.
    pub fn add_item(&self, item: Rc<LanguageDictionaryItem>) {
        self.items
            .borrow_mut()
            .entry(item.uid().to_string())
            .or_default()
            .push(item);
    }

    /// Creates an item from a resource name and appends it.
    pub fn add_resource(&self, name: &str, value: impl Into<String>) -> Rc<LanguageDictionaryItem> {
        let item = Rc::new(LanguageDictionaryItem::from_resource_name(name, value));
        self.add_item(Rc::clone(&item));
        item
    }

    /// All items. Order within a uid is insertion order; bucket order is
    /// unspecified.
    pub fn items(&self) -> Vec<Rc<LanguageDictionaryItem>> {
        self.items.borrow().values().flatten().cloned().collect()
    }

    /// Items stored under `uid`, in insertion order.
    pub fn try_get_items(&self, uid: &str) -> Option<Vec<Rc<LanguageDictionaryItem>>> {
        self.items.borrow().get(uid).cloned()
    }

    pub fn contains_uid(&self, uid: &str) -> bool {
        self.items.borrow().contains_key(uid)
    }

    /// Total number of items across all uids.
    pub fn len(&self) -> usize {
        self.items.borrow().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn parse_language_identifier(&self) -> Option<LanguageIdentifier> {
        self.language.parse().ok()
    }
}

impl Display for LanguageDictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LanguageDictionary {{ language: {}, name: {}, priority: {}, items: {} }}",
            self.language,
            self.name,
            self.priority,
            self.len()
        )
    }
}
