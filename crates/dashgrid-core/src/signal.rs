#![forbid(unsafe_code)]

//! Typed signals with RAII subscriptions.
//!
//! # Design
//!
//! [`Signal<T>`] is a callback list for one event type. Publishers call
//! [`Signal::emit`] with a payload; every live subscriber is invoked with a
//! reference to it, in registration order. Subscribers hold their callback
//! alive through a [`Subscription`] guard; dropping the guard
//! unsubscribes.
//!
//! Signals are deliberately single-threaded (`Rc`, not `Arc`): the layout
//! engine runs to completion inside one UI callback at a time and has no
//! cross-thread consumers.
//!
//! # Failure Modes
//!
//! - **Re-entrant emit**: emitting the same signal from within one of its
//!   subscriber callbacks is allowed (the borrow is released before
//!   callbacks run), but mutating the publisher from a callback is the
//!   caller's design problem, exactly as with any observer list.
//! - **Subscriber leak**: a `Subscription` stored forever keeps its
//!   callback alive forever. Dead weak references are pruned lazily during
//!   `emit`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

/// A typed event channel: zero or more subscribers, notified on `emit`.
///
/// Cloning a `Signal` creates a new handle to the **same** subscriber list.
pub struct Signal<T> {
    subscribers: Rc<RefCell<Vec<CallbackWeak<T>>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("subscriber_count", &self.subscribers.borrow().len())
            .finish()
    }
}

impl<T> Signal<T> {
    /// Create a signal with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Register a callback. It is invoked on every subsequent [`emit`]
    /// until the returned [`Subscription`] guard is dropped.
    ///
    /// [`emit`]: Signal::emit
    #[must_use = "dropping the Subscription immediately unsubscribes"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription
    where
        T: 'static,
    {
        let strong: CallbackRc<T> = Rc::new(callback);
        let weak = Rc::downgrade(&strong);
        self.subscribers.borrow_mut().push(weak);
        // Type-erase through `dyn Any`; `Rc<dyn Fn(&T)>` cannot coerce to
        // `Rc<dyn Any>` directly.
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Notify live subscribers in registration order, pruning dead ones.
    pub fn emit(&self, payload: &T) {
        // Collect live callbacks first so the borrow is not held while
        // callbacks run.
        let callbacks: Vec<CallbackRc<T>> = {
            let mut subs = self.subscribers.borrow_mut();
            subs.retain(|w| w.strong_count() > 0);
            subs.iter().filter_map(Weak::upgrade).collect()
        };
        for cb in &callbacks {
            cb(payload);
        }
    }

    /// Number of registered subscribers (including dead ones not yet
    /// pruned).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping the guard drops the strong reference to the callback; the
/// matching `Weak` in the signal's subscriber list fails to upgrade on the
/// next `emit` and is pruned.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn emit_reaches_subscriber() {
        let signal: Signal<u32> = Signal::new();
        let seen = Rc::new(Cell::new(0u32));
        let seen2 = Rc::clone(&seen);
        let _sub = signal.subscribe(move |v| seen2.set(*v));

        signal.emit(&42);
        assert_eq!(seen.get(), 42);
    }

    #[test]
    fn emit_without_subscribers_is_noop() {
        let signal: Signal<String> = Signal::new();
        signal.emit(&"nobody home".to_string());
    }

    #[test]
    fn subscription_drop_unsubscribes() {
        let signal: Signal<u32> = Signal::new();
        let count = Rc::new(Cell::new(0u32));
        let count2 = Rc::clone(&count);
        let sub = signal.subscribe(move |_| count2.set(count2.get() + 1));

        signal.emit(&1);
        assert_eq!(count.get(), 1);

        drop(sub);
        signal.emit(&2);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn dead_subscribers_pruned_on_emit() {
        let signal: Signal<u32> = Signal::new();
        let sub = signal.subscribe(|_| {});
        assert_eq!(signal.subscriber_count(), 1);

        drop(sub);
        signal.emit(&0);
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn notification_order_is_registration_order() {
        let signal: Signal<u32> = Signal::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let o1 = Rc::clone(&order);
        let _s1 = signal.subscribe(move |_| o1.borrow_mut().push(1));
        let o2 = Rc::clone(&order);
        let _s2 = signal.subscribe(move |_| o2.borrow_mut().push(2));
        let o3 = Rc::clone(&order);
        let _s3 = signal.subscribe(move |_| o3.borrow_mut().push(3));

        signal.emit(&0);
        assert_eq!(*order.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn clone_shares_subscribers() {
        let signal: Signal<u32> = Signal::new();
        let clone = signal.clone();

        let count = Rc::new(Cell::new(0u32));
        let count2 = Rc::clone(&count);
        let _sub = signal.subscribe(move |_| count2.set(count2.get() + 1));

        clone.emit(&7);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn multiple_emits_multiple_calls() {
        let signal: Signal<u32> = Signal::new();
        let total = Rc::new(Cell::new(0u32));
        let total2 = Rc::clone(&total);
        let _sub = signal.subscribe(move |v| total2.set(total2.get() + *v));

        for v in 1..=4 {
            signal.emit(&v);
        }
        assert_eq!(total.get(), 10);
    }

    #[test]
    fn payload_passed_by_reference() {
        let signal: Signal<Vec<u32>> = Signal::new();
        let len = Rc::new(Cell::new(0usize));
        let len2 = Rc::clone(&len);
        let _sub = signal.subscribe(move |v| len2.set(v.len()));

        signal.emit(&vec![1, 2, 3]);
        assert_eq!(len.get(), 3);
    }
}
