//! Maps a resolved string onto a concrete element property.
//!
//! Property lookup is a capability of the hosting toolkit
//! ([`PropertyResolver`]); this module only decides what to look up, converts
//! the string to the property's value kind, and falls back to
//! [`LocalizationAction`]s for elements without a settable property.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt::{self, Display},
    rc::Rc,
};

use tracing::warn;

use crate::{
    error::{Error, HostError},
    traits::{Element, short_type_name},
    types::UID_SEPARATOR,
};

/// Converts strings into a host-specific property type.
pub trait ValueConverter {
    /// Name of the produced type, used in conversion errors.
    fn type_name(&self) -> &str;

    fn convert(&self, value: &str) -> Result<Box<dyn Any>, HostError>;
}

/// Runtime type of a property's value.
#[derive(Clone)]
pub enum ValueKind {
    String,
    /// Enumeration with its member names.
    Enum {
        name: String,
        members: Vec<String>,
    },
    Bool,
    Integer,
    Float,
    Custom(Rc<dyn ValueConverter>),
}

impl ValueKind {
    pub fn enumeration<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueKind::Enum {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            ValueKind::String => "string",
            ValueKind::Enum { name, .. } => name,
            ValueKind::Bool => "bool",
            ValueKind::Integer => "i64",
            ValueKind::Float => "f64",
            ValueKind::Custom(converter) => converter.type_name(),
        }
    }
}

impl fmt::Debug for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Enum { name, members } => f
                .debug_struct("Enum")
                .field("name", name)
                .field("members", members)
                .finish(),
            other => write!(f, "{}", other.type_name()),
        }
    }
}

/// A converted value, ready to be written to an element.
pub enum PropertyValue {
    String(String),
    /// The matched enumeration member name.
    Enum(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
    Custom(Box<dyn Any>),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(value) | PropertyValue::Enum(value) => Some(value),
            _ => None,
        }
    }
}

impl Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(value) | PropertyValue::Enum(value) => f.write_str(value),
            PropertyValue::Bool(value) => write!(f, "{}", value),
            PropertyValue::Integer(value) => write!(f, "{}", value),
            PropertyValue::Float(value) => write!(f, "{}", value),
            PropertyValue::Custom(_) => f.write_str("<custom>"),
        }
    }
}

impl fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(value) => f.debug_tuple("String").field(value).finish(),
            PropertyValue::Enum(value) => f.debug_tuple("Enum").field(value).finish(),
            PropertyValue::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            PropertyValue::Integer(value) => f.debug_tuple("Integer").field(value).finish(),
            PropertyValue::Float(value) => f.debug_tuple("Float").field(value).finish(),
            PropertyValue::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A property resolved by the host, e.g. `Button.ContentProperty` or the
/// attached `ToolTipService.ToolTipProperty`.
#[derive(Debug, Clone)]
pub struct PropertyHandle {
    owner_type: String,
    name: String,
    kind: ValueKind,
}

impl PropertyHandle {
    pub fn new(owner_type: impl Into<String>, name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            owner_type: owner_type.into(),
            name: name.into(),
            kind,
        }
    }

    pub fn owner_type(&self) -> &str {
        &self.owner_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }
}

/// Looks up a property by owner type name and property name.
pub trait PropertyResolver {
    fn try_resolve_property(&self, owner_type: &str, name: &str) -> Option<PropertyHandle>;
}

/// A [`PropertyResolver`] backed by an explicit table, for hosts without
/// runtime reflection.
#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    properties: HashMap<(String, String), PropertyHandle>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handle, replacing any handle with the same owner and name.
    pub fn register(&mut self, handle: PropertyHandle) -> &mut Self {
        self.properties.insert(
            (handle.owner_type.clone(), handle.name.clone()),
            handle,
        );
        self
    }

    pub fn with(mut self, owner_type: &str, name: &str, kind: ValueKind) -> Self {
        self.register(PropertyHandle::new(owner_type, name, kind));
        self
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl PropertyResolver for PropertyTable {
    fn try_resolve_property(&self, owner_type: &str, name: &str) -> Option<PropertyHandle> {
        self.properties
            .get(&(owner_type.to_string(), name.to_string()))
            .cloned()
    }
}

type ActionFn = dyn Fn(&dyn Element, &str) -> Result<(), HostError>;

/// Custom localization for elements that cannot be targeted through a single
/// settable property, keyed by the element's concrete type.
#[derive(Clone)]
pub struct LocalizationAction {
    target_type: TypeId,
    target_name: &'static str,
    action: Rc<ActionFn>,
}

impl LocalizationAction {
    /// Creates an action for elements of type `T`.
    ///
    /// ```rust
    /// use std::{any::Any, cell::RefCell};
    /// use langbind::{Element, HostError, LocalizationAction, PropertyHandle, PropertyValue};
    ///
    /// struct Hyperlink {
    ///     inlines: RefCell<Vec<String>>,
    /// }
    ///
    /// impl Element for Hyperlink {
    ///     fn uid(&self) -> Option<String> {
    ///         Some("Link".to_string())
    ///     }
    ///     fn set_property(&self, _: &PropertyHandle, _: PropertyValue) -> Result<(), HostError> {
    ///         Ok(())
    ///     }
    ///     fn as_any(&self) -> &dyn Any {
    ///         self
    ///     }
    /// }
    ///
    /// let action = LocalizationAction::new(|link: &Hyperlink, value: &str| {
    ///     let mut inlines = link.inlines.borrow_mut();
    ///     inlines.clear();
    ///     inlines.push(value.to_string());
    ///     Ok(())
    /// });
    /// assert_eq!(action.target_name(), "Hyperlink");
    /// ```
    pub fn new<T, F>(action: F) -> Self
    where
        T: Element,
        F: Fn(&T, &str) -> Result<(), HostError> + 'static,
    {
        Self {
            target_type: TypeId::of::<T>(),
            target_name: short_type_name(std::any::type_name::<T>()),
            action: Rc::new(move |element: &dyn Element, value: &str| {
                match element.as_any().downcast_ref::<T>() {
                    Some(target) => action(target, value),
                    None => Ok(()),
                }
            }),
        }
    }

    pub fn target_type(&self) -> TypeId {
        self.target_type
    }

    pub fn target_name(&self) -> &'static str {
        self.target_name
    }

    pub fn applies_to(&self, element: &dyn Element) -> bool {
        element.as_any().type_id() == self.target_type
    }

    pub fn invoke(&self, element: &dyn Element, value: &str) -> Result<(), HostError> {
        (self.action)(element, value)
    }
}

impl fmt::Debug for LocalizationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalizationAction")
            .field("target", &self.target_name)
            .finish()
    }
}

/// Converts `value` to the handle's value kind.
pub fn convert_value(uid: &str, handle: &PropertyHandle, value: &str) -> Result<PropertyValue, Error> {
    let failed = |source: Option<HostError>| {
        Error::conversion_error(uid, handle.kind.type_name(), value, source)
    };

    match &handle.kind {
        ValueKind::String => Ok(PropertyValue::String(value.to_string())),
        ValueKind::Enum { members, .. } => members
            .iter()
            .find(|member| member.as_str() == value)
            .or_else(|| {
                members
                    .iter()
                    .find(|member| member.eq_ignore_ascii_case(value.trim()))
            })
            .map(|member| PropertyValue::Enum(member.clone()))
            .ok_or_else(|| failed(None)),
        ValueKind::Bool => match value.trim() {
            v if v.eq_ignore_ascii_case("true") => Ok(PropertyValue::Bool(true)),
            v if v.eq_ignore_ascii_case("false") => Ok(PropertyValue::Bool(false)),
            _ => Err(failed(None)),
        },
        ValueKind::Integer => value
            .trim()
            .parse::<i64>()
            .map(PropertyValue::Integer)
            .map_err(|e| failed(Some(Box::new(e)))),
        ValueKind::Float => value
            .trim()
            .parse::<f64>()
            .map(PropertyValue::Float)
            .map_err(|e| failed(Some(Box::new(e)))),
        ValueKind::Custom(converter) => converter
            .convert(value)
            .map(PropertyValue::Custom)
            .map_err(|e| failed(Some(e))),
    }
}

/// Writes one localized value to one element.
pub(crate) struct BindingResolver<'a> {
    pub(crate) properties: &'a dyn PropertyResolver,
    pub(crate) actions: &'a [LocalizationAction],
}

impl BindingResolver<'_> {
    /// Resolves `name` on the element's own type, then as an attached
    /// `Owner.Property` name.
    pub(crate) fn resolve_property(
        &self,
        element: &dyn Element,
        name: &str,
    ) -> Option<PropertyHandle> {
        if name.is_empty() {
            return None;
        }
        if let Some(handle) = self
            .properties
            .try_resolve_property(element.type_name(), name)
        {
            return Some(handle);
        }

        let mut parts = name.split(UID_SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(property), None) => {
                self.properties.try_resolve_property(owner, property)
            }
            _ => None,
        }
    }

    pub(crate) fn apply(
        &self,
        element: &dyn Element,
        uid: &str,
        property_name: &str,
        value: &str,
    ) -> Result<(), Error> {
        if let Some(handle) = self.resolve_property(element, property_name) {
            let converted = convert_value(uid, &handle, value)?;
            return element
                .set_property(&handle, converted)
                .map_err(Error::Host);
        }

        let mut applied = false;
        for action in self.actions.iter().filter(|a| a.applies_to(element)) {
            action.invoke(element, value).map_err(Error::Host)?;
            applied = true;
        }
        if !applied {
            warn!(
                element_type = element.type_name(),
                uid,
                property = property_name,
                "no property or localization action for element"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct TextBlock {
        writes: RefCell<Vec<(String, String)>>,
    }

    impl Element for TextBlock {
        fn uid(&self) -> Option<String> {
            Some("Title".to_string())
        }

        fn set_property(
            &self,
            property: &PropertyHandle,
            value: PropertyValue,
        ) -> Result<(), HostError> {
            self.writes
                .borrow_mut()
                .push((property.name().to_string(), value.to_string()));
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Default)]
    struct Run {
        text: RefCell<String>,
    }

    impl Element for Run {
        fn uid(&self) -> Option<String> {
            Some("Run".to_string())
        }

        fn set_property(&self, _: &PropertyHandle, _: PropertyValue) -> Result<(), HostError> {
            Err("Run has no properties".into())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct Thickness;

    impl ValueConverter for Thickness {
        fn type_name(&self) -> &str {
            "Thickness"
        }

        fn convert(&self, value: &str) -> Result<Box<dyn Any>, HostError> {
            let parsed: f64 = value.parse()?;
            Ok(Box::new(parsed))
        }
    }

    fn handle(kind: ValueKind) -> PropertyHandle {
        PropertyHandle::new("TextBlock", "TestProperty", kind)
    }

    #[test]
    fn test_convert_string() {
        let value = convert_value("Title", &handle(ValueKind::String), "Hello").unwrap();
        assert_eq!(value.as_str(), Some("Hello"));
    }

    #[test]
    fn test_convert_enum_by_member_name() {
        let kind = ValueKind::enumeration("Visibility", ["Visible", "Collapsed"]);
        let value = convert_value("Title", &handle(kind.clone()), "Collapsed").unwrap();
        assert!(matches!(value, PropertyValue::Enum(ref m) if m == "Collapsed"));

        let value = convert_value("Title", &handle(kind.clone()), "visible").unwrap();
        assert!(matches!(value, PropertyValue::Enum(ref m) if m == "Visible"));

        let error = convert_value("Title", &handle(kind), "Hidden").unwrap_err();
        assert!(matches!(
            error,
            Error::FailedToConvertValue { ref target_type, ref value, .. }
                if target_type == "Visibility" && value == "Hidden"
        ));
    }

    #[test]
    fn test_convert_primitives() {
        assert!(matches!(
            convert_value("A", &handle(ValueKind::Bool), "True").unwrap(),
            PropertyValue::Bool(true)
        ));
        assert!(matches!(
            convert_value("A", &handle(ValueKind::Integer), " 42 ").unwrap(),
            PropertyValue::Integer(42)
        ));
        assert!(matches!(
            convert_value("A", &handle(ValueKind::Float), "1.5").unwrap(),
            PropertyValue::Float(v) if v == 1.5
        ));
    }

    #[test]
    fn test_convert_failure_carries_uid_type_and_value() {
        let error = convert_value("Counter", &handle(ValueKind::Integer), "many").unwrap_err();
        match error {
            Error::FailedToConvertValue {
                uid,
                target_type,
                value,
                source,
            } => {
                assert_eq!(uid, "Counter");
                assert_eq!(target_type, "i64");
                assert_eq!(value, "many");
                assert!(source.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_convert_custom() {
        let kind = ValueKind::Custom(Rc::new(Thickness));
        let value = convert_value("Margin", &handle(kind.clone()), "4").unwrap();
        match value {
            PropertyValue::Custom(inner) => assert_eq!(inner.downcast_ref::<f64>(), Some(&4.0)),
            other => panic!("unexpected value: {other:?}"),
        }

        let error = convert_value("Margin", &handle(kind), "wide").unwrap_err();
        assert!(error.to_string().contains("Thickness"));
    }

    #[test]
    fn test_property_table_lookup() {
        let table = PropertyTable::new()
            .with("TextBlock", "TextProperty", ValueKind::String)
            .with("ToolTipService", "ToolTipProperty", ValueKind::String);

        assert_eq!(table.len(), 2);
        assert!(table.try_resolve_property("TextBlock", "TextProperty").is_some());
        assert!(table.try_resolve_property("Button", "TextProperty").is_none());
    }

    #[test]
    fn test_resolve_own_then_attached_property() {
        let table = PropertyTable::new()
            .with("TextBlock", "TextProperty", ValueKind::String)
            .with("ToolTipService", "ToolTipProperty", ValueKind::String);
        let resolver = BindingResolver {
            properties: &table,
            actions: &[],
        };
        let element = TextBlock::default();

        let own = resolver.resolve_property(&element, "TextProperty").unwrap();
        assert_eq!(own.owner_type(), "TextBlock");

        let attached = resolver
            .resolve_property(&element, "ToolTipService.ToolTipProperty")
            .unwrap();
        assert_eq!(attached.owner_type(), "ToolTipService");

        assert!(resolver.resolve_property(&element, "").is_none());
        assert!(resolver.resolve_property(&element, "A.B.C").is_none());
    }

    #[test]
    fn test_apply_writes_property() {
        let table = PropertyTable::new().with("TextBlock", "TextProperty", ValueKind::String);
        let resolver = BindingResolver {
            properties: &table,
            actions: &[],
        };
        let element = TextBlock::default();

        resolver.apply(&element, "Title", "TextProperty", "Hello").unwrap();

        assert_eq!(
            *element.writes.borrow(),
            vec![("TextProperty".to_string(), "Hello".to_string())]
        );
    }

    #[test]
    fn test_apply_falls_back_to_matching_actions() {
        let table = PropertyTable::new();
        let actions = vec![
            LocalizationAction::new(|run: &Run, value: &str| {
                *run.text.borrow_mut() = value.to_string();
                Ok(())
            }),
            LocalizationAction::new(|_: &TextBlock, _: &str| Err("wrong target".into())),
        ];
        let resolver = BindingResolver {
            properties: &table,
            actions: &actions,
        };
        let run = Run::default();

        resolver.apply(&run, "Run", "TextProperty", "Hola").unwrap();

        assert_eq!(*run.text.borrow(), "Hola");
        assert!(actions[0].applies_to(&run));
        assert!(!actions[1].applies_to(&run));
    }

    #[test]
    fn test_apply_without_property_or_action_is_not_an_error() {
        let table = PropertyTable::new();
        let resolver = BindingResolver {
            properties: &table,
            actions: &[],
        };
        let element = TextBlock::default();

        resolver.apply(&element, "Title", "MissingProperty", "x").unwrap();
        assert!(element.writes.borrow().is_empty());
    }

    #[test]
    fn test_apply_reports_host_failure() {
        let table = PropertyTable::new().with("Run", "TextProperty", ValueKind::String);
        let resolver = BindingResolver {
            properties: &table,
            actions: &[],
        };

        let error = resolver.apply(&Run::default(), "Run", "TextProperty", "x").unwrap_err();
        assert!(matches!(error, Error::Host(_)));
    }

    struct Wrapper<T>(std::marker::PhantomData<T>);

    impl<T: 'static> Element for Wrapper<T> {
        fn uid(&self) -> Option<String> {
            None
        }

        fn set_property(&self, _: &PropertyHandle, _: PropertyValue) -> Result<(), HostError> {
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_action_target_name_matches_element_type_name() {
        let action = LocalizationAction::new(|_: &Wrapper<Run>, _: &str| Ok(()));
        let element = Wrapper::<Run>(std::marker::PhantomData);

        assert_eq!(action.target_name(), "Wrapper");
        assert_eq!(action.target_name(), element.type_name());
        assert!(action.applies_to(&element));
    }
}
