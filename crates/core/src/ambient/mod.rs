//! Single-writer, multi-reader ambient state.
//!
//! Pointer and scroll position are published through a [`Publisher`] that
//! only its tracker owns. Sections receive [`Reader`] handles and may attach
//! listeners whose lifetime is bound to a [`Subscription`]. Everything runs
//! on the event-loop thread, so the slot lives in `Rc<RefCell<..>>` and
//! no locking is involved. Writes are last-write-wins with no queue.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type Listener<T> = Rc<RefCell<Box<dyn FnMut(&T)>>>;

struct Slot<T> {
    value: T,
    listeners: Vec<(Rc<Cell<bool>>, Listener<T>)>,
}

impl<T> Slot<T> {
    fn prune(&mut self) {
        self.listeners.retain(|(active, _)| active.get());
    }
}

/// Creates a channel holding `initial`.
pub fn channel<T: Clone + 'static>(initial: T) -> (Publisher<T>, Reader<T>) {
    let slot = Rc::new(RefCell::new(Slot {
        value: initial,
        listeners: Vec::new(),
    }));
    (
        Publisher {
            slot: Rc::clone(&slot),
        },
        Reader { slot },
    )
}

/// The only write handle of a channel. Deliberately not `Clone`.
pub struct Publisher<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T: Clone + 'static> Publisher<T> {
    /// Stores `value` and notifies every live listener with it.
    ///
    /// Listeners run after the slot borrow is released, so they may read the
    /// channel or cancel subscriptions (including their own).
    pub fn publish(&self, value: T) {
        let snapshot = {
            let mut slot = self.slot.borrow_mut();
            slot.value = value.clone();
            slot.prune();
            slot.listeners.clone()
        };

        for (active, listener) in snapshot {
            if !active.get() {
                continue;
            }
            if let Ok(mut callback) = listener.try_borrow_mut() {
                (&mut **callback)(&value);
            }
        }
    }

    pub fn current(&self) -> T {
        self.slot.borrow().value.clone()
    }

    pub fn reader(&self) -> Reader<T> {
        Reader {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T> fmt::Debug for Publisher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher").finish()
    }
}

/// Read handle over a channel. Cheap to clone.
pub struct Reader<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for Reader<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: Clone + 'static> Reader<T> {
    /// Last published value.
    pub fn get(&self) -> T {
        self.slot.borrow().value.clone()
    }

    /// Registers `listener` until the returned subscription is cancelled or
    /// dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
    {
        let active = Rc::new(Cell::new(true));
        let callback: Box<dyn FnMut(&T)> = Box::new(listener);
        let mut slot = self.slot.borrow_mut();
        slot.prune();
        slot.listeners
            .push((Rc::clone(&active), Rc::new(RefCell::new(callback))));
        Subscription { active }
    }

    /// Number of listeners that are still subscribed.
    pub fn listener_count(&self) -> usize {
        self.slot
            .borrow()
            .listeners
            .iter()
            .filter(|(active, _)| active.get())
            .count()
    }
}

impl<T> fmt::Debug for Reader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader").finish()
    }
}

/// Listener registration. Cancelled explicitly or on drop; a cancelled
/// listener is never invoked again, even mid-publish.
#[derive(Debug)]
pub struct Subscription {
    active: Rc<Cell<bool>>,
}

impl Subscription {
    pub fn cancel(&self) {
        self.active.set(false);
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
