//! Runtime localization for UI element trees.
//!
//! Elements carry a uid tag. Language dictionaries map uids to localized
//! strings for one property each (`Button1.Content` → the `ContentProperty`
//! of every element tagged `Button1`). Switching the language re-localizes
//! every element that is still alive; the localizer never keeps an element
//! alive on its own.
//!
//! ```rust
//! use std::{any::Any, cell::RefCell, rc::Rc};
//! use langbind::{
//!     Element, HostError, LocalizerBuilder, PropertyHandle, PropertyTable, PropertyValue,
//!     StringResources, ValueKind,
//! };
//!
//! struct Button {
//!     content: RefCell<String>,
//! }
//!
//! impl Element for Button {
//!     fn uid(&self) -> Option<String> {
//!         Some("Submit".to_string())
//!     }
//!
//!     fn set_property(&self, _: &PropertyHandle, value: PropertyValue) -> Result<(), HostError> {
//!         *self.content.borrow_mut() = value.to_string();
//!         Ok(())
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//!
//! let properties = PropertyTable::new().with("Button", "ContentProperty", ValueKind::String);
//! let localizer = LocalizerBuilder::new()
//!     .set_property_resolver(Rc::new(properties))
//!     .add_string_resources(StringResources::new("en-US").with_entry("Submit.Content", "Send"))
//!     .add_string_resources(StringResources::new("de").with_entry("Submit.Content", "Senden"))
//!     .build()?;
//!
//! let button = Rc::new(Button { content: RefCell::new(String::new()) });
//! let element: Rc<dyn Element> = button.clone();
//! localizer.register_element(&element)?;
//!
//! localizer.set_language("de")?;
//! assert_eq!(*button.content.borrow(), "Senden");
//! # Ok::<(), langbind::Error>(())
//! ```

#![forbid(unsafe_code)]

pub mod binding;
pub mod builder;
pub mod dictionary;
pub mod error;
pub mod events;
pub mod global;
pub mod localizer;
pub mod null;
pub mod options;
pub mod registry;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    binding::{
        LocalizationAction, PropertyHandle, PropertyResolver, PropertyTable, PropertyValue,
        ValueConverter, ValueKind, convert_value,
    },
    builder::LocalizerBuilder,
    dictionary::LanguageDictionary,
    error::{Error, HostError},
    events::{
        ElementReferenceAdded, ElementReferenceRemoved, Event, LanguageChanged,
        LanguageDictionaryAdded, LanguageDictionaryRemoved, SubscriptionId,
    },
    localizer::Localizer,
    null::NullLocalizer,
    options::LocalizerOptions,
    registry::ElementRegistry,
    traits::{Element, Localize},
    types::{ElementType, LanguageDictionaryItem, StringResource, StringResources, UidTarget},
};
