//! Seams between the localizer, its callers, and the hosting UI toolkit.

use std::{any::Any, rc::Rc};

use crate::{
    binding::{PropertyHandle, PropertyValue},
    dictionary::LanguageDictionary,
    error::{Error, HostError},
    events::{LanguageChanged, SubscriptionId},
    types::ElementType,
};

/// A UI element owned by the hosting toolkit.
///
/// The localizer only holds `Weak<dyn Element>` handles, reads the uid tag,
/// and writes properties through [`Element::set_property`].
///
/// # Example
///
/// ```rust
/// use std::{any::Any, cell::RefCell};
/// use langbind::{Element, HostError, PropertyHandle, PropertyValue};
///
/// struct Label {
///     uid: String,
///     text: RefCell<String>,
/// }
///
/// impl Element for Label {
///     fn uid(&self) -> Option<String> {
///         Some(self.uid.clone())
///     }
///
///     fn set_property(&self, _: &PropertyHandle, value: PropertyValue) -> Result<(), HostError> {
///         *self.text.borrow_mut() = value.to_string();
///         Ok(())
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
/// ```
pub trait Element: Any {
    /// The uid tag currently attached to the element, if any.
    fn uid(&self) -> Option<String>;

    /// Writes a converted value to a resolved property.
    fn set_property(&self, property: &PropertyHandle, value: PropertyValue)
    -> Result<(), HostError>;

    fn as_any(&self) -> &dyn Any;

    /// Owner type name used for property lookup. Defaults to the Rust type name
    /// without module path or generic arguments.
    fn type_name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// `my_app::widgets::Wrapper<other::Inner>` → `Wrapper`.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let path = full.split('<').next().unwrap_or(full);
    match path.rfind("::") {
        Some(index) => &path[index + 2..],
        None => path,
    }
}

impl ElementType {
    pub fn of(element: &dyn Element) -> Self {
        ElementType {
            id: element.as_any().type_id(),
            name: element.type_name(),
        }
    }
}

/// The public query surface shared by [`Localizer`](crate::Localizer) and
/// [`NullLocalizer`](crate::NullLocalizer).
pub trait Localize {
    /// Returns `false` when a dictionary with the same language and name is
    /// already present.
    fn add_language_dictionary(&self, dictionary: Rc<LanguageDictionary>) -> bool;

    /// Returns `false` when no dictionary with that language and name exists.
    fn remove_language_dictionary(&self, dictionary: &LanguageDictionary) -> bool;

    /// All dictionaries when `language` is empty, otherwise that language's
    /// dictionaries by descending priority.
    fn get_language_dictionaries(&self, language: &str) -> Vec<Rc<LanguageDictionary>>;

    fn get_available_languages(&self) -> Result<Vec<String>, Error>;

    fn get_current_language(&self) -> String;

    fn set_language(&self, language: &str) -> Result<(), Error>;

    fn get_localized_string(&self, uid: &str) -> Result<String, Error>;

    fn get_localized_strings(&self, uid: &str) -> Result<Vec<String>, Error>;

    fn on_language_changed(&self, handler: Box<dyn Fn(&LanguageChanged)>) -> SubscriptionId;
}
