//! Synchronous observer lists.
//!
//! Every mutable entity in the model exposes one or more [`Event`]s. Handlers
//! are plain closures registered with [`Event::subscribe`] and removed again
//! with [`Event::unsubscribe`]. Delivery happens on the calling thread, in
//! subscription order, before the mutating call returns.
//!
//! # Example
//!
//! ```
//! use slint_node_network::Event;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let event: Event<i32> = Event::new();
//! let seen = Rc::new(Cell::new(0));
//! let id = event.subscribe({
//!     let seen = seen.clone();
//!     move |value| seen.set(*value)
//! });
//!
//! event.emit(&7);
//! assert_eq!(seen.get(), 7);
//!
//! assert!(event.unsubscribe(id));
//! event.emit(&9);
//! assert_eq!(seen.get(), 7);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle returned by [`Event::subscribe`], used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<A> = Rc<dyn Fn(&A)>;

/// An ordered list of handlers for payloads of type `A`.
///
/// `A` may be unsized, so collection events use `Event<[T]>` and hand the
/// whole batch to each handler as a slice.
pub struct Event<A: ?Sized> {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(SubscriptionId, Handler<A>)>>,
}

impl<A: ?Sized> Default for Event<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized> Event<A> {
    /// Create an event with no subscribers.
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Register a handler. It runs after every handler registered before it.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&A) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Remove a handler. Returns `false` if `id` was not registered here.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(sid, _)| *sid != id);
        handlers.len() != before
    }

    /// Deliver `args` to every handler.
    ///
    /// The handler list is snapshotted before the first call, so handlers
    /// may freely subscribe, unsubscribe or trigger further events. A handler
    /// removed during delivery still receives the current emission.
    pub fn emit(&self, args: &A) {
        let handlers: Vec<Handler<A>> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in handlers {
            handler(args);
        }
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl<A: ?Sized> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("handlers", &self.handler_count())
            .finish()
    }
}
