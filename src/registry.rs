//! Non-owning registry of elements waiting for (re-)localization.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use tracing::trace;

use crate::{
    events::{ElementReferenceAdded, ElementReferenceRemoved, Event, SubscriptionId},
    traits::Element,
    types::ElementType,
};

struct Entry {
    element_type: ElementType,
    element: Weak<dyn Element>,
}

/// Tracks registered elements through `Weak` handles.
///
/// Dead handles are purged only by [`ElementRegistry::live_elements`]; there
/// is no background sweep.
#[derive(Default)]
pub struct ElementRegistry {
    entries: RefCell<Vec<Entry>>,
    added: Event<ElementReferenceAdded>,
    removed: Event<ElementReferenceRemoved>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a handle to `element` without extending its lifetime.
    pub fn add(&self, element: &Rc<dyn Element>) {
        let element_type = ElementType::of(element.as_ref());
        let total = {
            let mut entries = self.entries.borrow_mut();
            entries.push(Entry {
                element_type,
                element: Rc::downgrade(element),
            });
            entries.len()
        };
        trace!(element_type = %element_type, total, "added element reference");
        self.added.emit(&ElementReferenceAdded {
            element_type,
            total,
        });
    }

    /// Returns the live elements, newest first, purging dead handles on the
    /// way. One removed event is published per purged handle.
    pub fn live_elements(&self) -> Vec<Rc<dyn Element>> {
        let mut live = Vec::new();
        let mut purged = Vec::new();
        {
            let mut entries = self.entries.borrow_mut();
            for index in (0..entries.len()).rev() {
                match entries[index].element.upgrade() {
                    Some(element) => live.push(element),
                    None => {
                        let entry = entries.remove(index);
                        purged.push(ElementReferenceRemoved {
                            element_type: entry.element_type,
                            total: entries.len(),
                        });
                    }
                }
            }
        }
        for removed in &purged {
            trace!(
                element_type = %removed.element_type,
                total = removed.total,
                "removed element reference"
            );
            self.removed.emit(removed);
        }
        live
    }

    /// Number of stored handles, including dead ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn on_added(&self, handler: impl Fn(&ElementReferenceAdded) + 'static) -> SubscriptionId {
        self.added.subscribe(handler)
    }

    pub fn on_removed(
        &self,
        handler: impl Fn(&ElementReferenceRemoved) + 'static,
    ) -> SubscriptionId {
        self.removed.subscribe(handler)
    }

    pub fn unsubscribe_added(&self, id: SubscriptionId) -> bool {
        self.added.unsubscribe(id)
    }

    pub fn unsubscribe_removed(&self, id: SubscriptionId) -> bool {
        self.removed.unsubscribe(id)
    }
}

impl std::fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementRegistry")
            .field("entries", &self.len())
            .finish()
    }
}
