//! The per-thread localizer slot used at the composition boundary.
//!
//! Library code should take an `Rc<Localizer>` explicitly. The slot exists for
//! hosts where elements are created far away from the code that owns the
//! localizer (markup loaders, templates).

use std::{cell::RefCell, rc::Rc};

use tracing::{info, trace};

use crate::{
    error::Error,
    localizer::Localizer,
    null::NullLocalizer,
    traits::{Element, Localize},
};

thread_local! {
    static CURRENT: RefCell<Option<Rc<Localizer>>> = const { RefCell::new(None) };
}

/// Installs `localizer` for the current thread.
///
/// Fails with [`Error::AlreadyBuilt`] when a localizer is already installed.
pub fn install(localizer: Rc<Localizer>) -> Result<(), Error> {
    CURRENT.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_some() {
            return Err(Error::AlreadyBuilt);
        }
        info!("installed thread localizer");
        *slot = Some(localizer);
        Ok(())
    })
}

/// Removes and returns the installed localizer.
pub fn uninstall() -> Option<Rc<Localizer>> {
    CURRENT.with(|slot| slot.borrow_mut().take())
}

pub fn is_installed() -> bool {
    CURRENT.with(|slot| slot.borrow().is_some())
}

/// The installed localizer, if any.
pub fn localizer() -> Option<Rc<Localizer>> {
    CURRENT.with(|slot| slot.borrow().clone())
}

/// The installed localizer, or a [`NullLocalizer`] that echoes uids.
pub fn get() -> Rc<dyn Localize> {
    match localizer() {
        Some(localizer) => localizer,
        None => Rc::new(NullLocalizer),
    }
}

/// Registers `element` with the installed localizer. Without one the element
/// is left untouched.
pub fn register_element(element: &Rc<dyn Element>) -> Result<(), Error> {
    match localizer() {
        Some(localizer) => localizer.register_element(element),
        None => {
            trace!(element_type = element.type_name(), "no thread localizer, element skipped");
            Ok(())
        }
    }
}
