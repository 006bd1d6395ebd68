//! Host window resize notifications.
//!
//! Everything here is single-threaded: handlers run on the UI event loop.

use kurbo::Size;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

/// An element with measurable pixel dimensions that hosts a surface.
pub trait Container {
    fn pixel_size(&self) -> Size;
}

/// A container whose size is set by the host.
#[derive(Debug)]
pub struct MeasuredContainer {
    size: Cell<Size>,
}

impl MeasuredContainer {
    pub fn new(size: Size) -> Self {
        Self { size: Cell::new(size) }
    }

    pub fn set_size(&self, size: Size) {
        self.size.set(size);
    }
}

impl Container for MeasuredContainer {
    fn pixel_size(&self) -> Size {
        self.size.get()
    }
}

type Handler = Rc<dyn Fn()>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: BTreeMap<u64, Handler>,
}

/// Window-level resize event source.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct WindowEvents {
    registry: Rc<RefCell<Registry>>,
}

impl WindowEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resize handler. It stays registered until the returned
    /// listener is dropped.
    #[must_use = "dropping the listener unregisters the handler"]
    pub fn on_resize(&self, handler: impl Fn() + 'static) -> ResizeListener {
        let mut registry = self.registry.borrow_mut();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.handlers.insert(id, Rc::new(handler));
        ResizeListener {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Notify every registered handler, in registration order.
    pub fn dispatch_resize(&self) {
        // Handlers may register or drop listeners; release the borrow first.
        let handlers: Vec<Handler> = self.registry.borrow().handlers.values().cloned().collect();
        for handler in handlers {
            handler();
        }
    }

    /// Number of registered handlers.
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().handlers.len()
    }
}

impl std::fmt::Debug for WindowEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowEvents")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Registration guard for a resize handler.
#[derive(Debug)]
pub struct ResizeListener {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().handlers.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_and_unregister() {
        let events = WindowEvents::new();
        let hits = Rc::new(Cell::new(0));

        let h = Rc::clone(&hits);
        let listener = events.on_resize(move || h.set(h.get() + 1));
        assert_eq!(events.listener_count(), 1);

        events.dispatch_resize();
        assert_eq!(hits.get(), 1);

        drop(listener);
        assert_eq!(events.listener_count(), 0);
        events.dispatch_resize();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_listener_outliving_registry() {
        let events = WindowEvents::new();
        let listener = events.on_resize(|| {});
        drop(events);
        drop(listener);
    }

    #[test]
    fn test_measured_container() {
        let c = MeasuredContainer::new(Size::new(800.0, 600.0));
        c.set_size(Size::new(1024.0, 600.0));
        assert_eq!(c.pixel_size(), Size::new(1024.0, 600.0));
    }
}
