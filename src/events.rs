//! Synchronous notifications published by the localizer and its registry.
//!
//! Handlers run on the calling thread, in subscription order, before the
//! publishing call returns. The handler list is snapshotted before delivery,
//! so a handler may subscribe, unsubscribe or call back into the localizer.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use crate::{dictionary::LanguageDictionary, types::ElementType};

/// Token returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Never issued by an [`Event`]; unsubscribing it is a no-op.
    pub const NONE: SubscriptionId = SubscriptionId(0);
}

type Handler<A> = Rc<dyn Fn(&A)>;

/// An ordered observer list for one kind of notification.
pub struct Event<A> {
    handlers: RefCell<Vec<(SubscriptionId, Handler<A>)>>,
    next_id: Cell<u64>,
}

impl<A> Event<A> {
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    pub fn subscribe(&self, handler: impl Fn(&A) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    pub fn emit(&self, args: &A) {
        let handlers: Vec<Handler<A>> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            handler(args);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<A> Default for Event<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("handlers", &self.len())
            .finish()
    }
}

/// Fired after every `set_language`, including repeated calls with the same
/// language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageChanged {
    pub previous: String,
    pub current: String,
}

#[derive(Debug, Clone)]
pub struct LanguageDictionaryAdded {
    pub dictionary: Rc<LanguageDictionary>,
}

#[derive(Debug, Clone)]
pub struct LanguageDictionaryRemoved {
    pub dictionary: Rc<LanguageDictionary>,
}

/// An element handle was stored; `total` counts stored handles afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementReferenceAdded {
    pub element_type: ElementType,
    pub total: usize,
}

/// A dead element handle was purged; `total` counts stored handles afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementReferenceRemoved {
    pub element_type: ElementType,
    pub total: usize,
}
