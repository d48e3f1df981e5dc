//! Global Listeners - Scoped registration for pointer/touch release
//!
//! A thumb that starts a pointer gesture must hear the release even when it
//! happens outside the thumb. It registers one release listener for the
//! duration of the gesture and gets back a [`ListenerHandle`]; removing or
//! dropping the handle deregisters exactly that listener.
//!
//! # Example
//!
//! ```ignore
//! use spark_slider::state::listeners::GlobalListeners;
//!
//! let listeners = GlobalListeners::new();
//! let handle = listeners.add_release_listener(Rc::new(|event: &ReleaseEvent| {
//!     println!("released {:?}", event.pointer_id);
//! }));
//!
//! listeners.dispatch_release(&ReleaseEvent::new(Some(1)));
//! handle.remove();
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::types::{Cleanup, ReleaseEvent};

/// Handler for release events.
pub type ReleaseListener = Rc<dyn Fn(&ReleaseEvent)>;

// =============================================================================
// LISTENER HANDLE
// =============================================================================

/// Owned registration. Deregisters its listener on `remove` or drop.
pub struct ListenerHandle {
    cleanup: Option<Cleanup>,
}

impl ListenerHandle {
    pub fn new<F>(cleanup: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            cleanup: Some(Box::new(cleanup)),
        }
    }

    /// Deregister now.
    pub fn remove(mut self) {
        self.run_cleanup();
    }

    fn run_cleanup(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.run_cleanup();
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

struct ListenerRegistry {
    release: Vec<(usize, ReleaseListener)>,
    next_id: usize,
}

impl ListenerRegistry {
    fn new() -> Self {
        Self {
            release: Vec::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Host-wide release listeners. Cloning shares the registry.
#[derive(Clone)]
pub struct GlobalListeners {
    registry: Rc<RefCell<ListenerRegistry>>,
}

impl Default for GlobalListeners {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalListeners {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(ListenerRegistry::new())),
        }
    }

    /// Register a release listener. The listener stays until the handle goes.
    pub fn add_release_listener(&self, listener: ReleaseListener) -> ListenerHandle {
        let id = {
            let mut reg = self.registry.borrow_mut();
            let id = reg.next_id();
            reg.release.push((id, listener));
            id
        };

        let registry: Weak<RefCell<ListenerRegistry>> = Rc::downgrade(&self.registry);
        ListenerHandle::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry
                    .borrow_mut()
                    .release
                    .retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    /// Deliver a release to every listener registered at dispatch time.
    /// Listeners may deregister themselves while running.
    /// Returns the number of listeners invoked.
    pub fn dispatch_release(&self, event: &ReleaseEvent) -> usize {
        let listeners: Vec<ReleaseListener> = self
            .registry
            .borrow()
            .release
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }

    /// Number of live release listeners.
    pub fn len(&self) -> usize {
        self.registry.borrow().release.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every listener (host teardown).
    pub fn clear(&self) {
        self.registry.borrow_mut().release.clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================
