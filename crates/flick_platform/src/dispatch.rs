//! Touch event binding
//!
//! A [`TouchDispatcher`] stands in for one event target (an element or the
//! window). Handlers subscribe per [`TouchPhase`] and receive the event
//! mutably so they can call [`TouchEvent::prevent_default`] or fill in the
//! synthetic delta fields.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

use crate::input::{TouchEvent, TouchPhase};

new_key_type! {
    /// Handle returned by [`TouchDispatcher::subscribe`]
    pub struct ListenerId;
}

/// Handler invoked for each dispatched event of the subscribed phase
pub type TouchHandler = Rc<dyn Fn(&mut TouchEvent)>;

struct Listener {
    phase: TouchPhase,
    handler: TouchHandler,
}

/// Subscribe/unsubscribe registry for touch handlers on one event target
#[derive(Default)]
pub struct TouchDispatcher {
    listeners: RefCell<SlotMap<ListenerId, Listener>>,
    /// Subscription order; handlers run in the order they were added
    order: RefCell<Vec<ListenerId>>,
}

impl TouchDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one phase
    pub fn subscribe<F>(&self, phase: TouchPhase, handler: F) -> ListenerId
    where
        F: Fn(&mut TouchEvent) + 'static,
    {
        let id = self.listeners.borrow_mut().insert(Listener {
            phase,
            handler: Rc::new(handler),
        });
        self.order.borrow_mut().push(id);
        tracing::trace!("TouchDispatcher: subscribed {:?} listener {:?}", phase, id);
        id
    }

    /// Remove a handler. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let removed = self.listeners.borrow_mut().remove(id).is_some();
        if removed {
            self.order.borrow_mut().retain(|other| *other != id);
        }
        removed
    }

    /// Number of live subscriptions
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver an event to every handler subscribed to its phase
    ///
    /// Handlers may subscribe or unsubscribe while the event is delivered;
    /// the set of handlers is fixed when dispatch starts.
    pub fn dispatch(&self, event: &mut TouchEvent) {
        let handlers: Vec<TouchHandler> = {
            let listeners = self.listeners.borrow();
            self.order
                .borrow()
                .iter()
                .filter_map(|id| listeners.get(*id))
                .filter(|listener| listener.phase == event.phase)
                .map(|listener| Rc::clone(&listener.handler))
                .collect()
        };

        for handler in handlers {
            handler(event);
        }
    }
}
