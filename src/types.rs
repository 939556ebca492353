//! Core, toolkit-agnostic types for langbind.
//! Loaders produce these; the localizer indexes and resolves them.

use std::{any::TypeId, cell::RefCell, fmt::Display};

use serde::{Deserialize, Serialize};

/// Separator between a uid and its target property (`Button1.Content`).
pub const UID_SEPARATOR: char = '.';

/// Suffix appended to the property half of a resource name.
pub const PROPERTY_SUFFIX: &str = "Property";

/// A single localized string bound to one property of the elements tagged
/// with `uid`.
///
/// Items are shared as `Rc<LanguageDictionaryItem>` and compared by
/// reference: two items with the same fields are still distinct items.
#[derive(Debug, Serialize, Deserialize)]
pub struct LanguageDictionaryItem {
    uid: String,
    property_name: String,
    value: RefCell<String>,
    source_name: String,
}

impl LanguageDictionaryItem {
    pub fn new(
        uid: impl Into<String>,
        property_name: impl Into<String>,
        value: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            property_name: property_name.into(),
            value: RefCell::new(value.into()),
            source_name: source_name.into(),
        }
    }

    /// Builds an item from a loader resource name such as `Button1.Content`.
    ///
    /// The name is split on its last separator into the uid and the property
    /// (`ContentProperty`). A name without a usable separator becomes the uid
    /// and the item has no property name.
    pub fn from_resource_name(name: &str, value: impl Into<String>) -> Self {
        let (uid, property_name) = match name.rfind(UID_SEPARATOR) {
            Some(index) if index > 0 => (
                &name[..index],
                format!("{}{}", &name[index + 1..], PROPERTY_SUFFIX),
            ),
            _ => (name, String::new()),
        };
        Self::new(uid, property_name, value, name)
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn value(&self) -> String {
        self.value.borrow().clone()
    }

    pub fn set_value(&self, value: impl Into<String>) {
        *self.value.borrow_mut() = value.into();
    }
}

impl Display for LanguageDictionaryItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Item {{ uid: {}, property: {}, value: {}, source: {} }}",
            self.uid,
            self.property_name,
            self.value.borrow(),
            self.source_name
        )
    }
}

/// A uid as written on an element, possibly carrying a property suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UidTarget<'a> {
    /// The uid used for dictionary lookup.
    pub uid: &'a str,
    /// Property forced by the suffix (`Text` → `TextProperty`).
    pub property_name: Option<String>,
}

impl<'a> UidTarget<'a> {
    /// Splits `Button1.Content` into (`Button1`, `ContentProperty`).
    ///
    /// Only a uid with exactly one separator carries a property; anything else
    /// is looked up as written.
    pub fn parse(source: &'a str) -> Self {
        let mut parts = source.split(UID_SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(uid), Some(property), None) => UidTarget {
                uid,
                property_name: Some(format!("{}{}", property, PROPERTY_SUFFIX)),
            },
            _ => UidTarget {
                uid: source,
                property_name: None,
            },
        }
    }
}

/// Type tag recorded for registered elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementType {
    pub id: TypeId,
    pub name: &'static str,
}

impl Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// One named string as handed over by a loader.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StringResource {
    /// Resource name, `uid.Property` or a bare uid.
    pub name: String,

    pub value: String,

    /// Optional comment for translators.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub comment: Option<String>,
}

impl StringResource {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            comment: None,
        }
    }
}

/// A complete string table for one language, as produced by a loader.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StringResources {
    /// The language code (e.g. "en-US", "ja").
    pub language: String,

    /// The table name; defaults to the language when empty.
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub priority: i32,

    /// Ordered list of all entries in this table.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub entries: Vec<StringResource>,
}

impl StringResources {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            name: String::new(),
            priority: 0,
            entries: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_entry(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push(StringResource::new(name, value));
        self
    }

    /// Namespaces every entry of a secondary table as `/{source}/{name}`.
    pub fn with_source_prefix(mut self, source: &str) -> Self {
        if source.is_empty() {
            return self;
        }
        for entry in &mut self.entries {
            entry.name = format!("/{}/{}", source, entry.name);
        }
        if self.name.is_empty() {
            self.name = source.to_string();
        }
        self
    }

    /// Name used for dictionary identity.
    pub fn dictionary_name(&self) -> &str {
        if self.name.is_empty() {
            &self.language
        } else {
            &self.name
        }
    }
}
