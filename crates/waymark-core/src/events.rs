//! Page events and listener subscriptions.
//!
//! Hosts feed browser events through an [`EventHub`]. Each listener lives as
//! long as its [`Subscription`]; dropping or disposing it unsubscribes.

use crate::timer::TimerHandle;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use tracing::trace;

/// Everything the map session reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    Scrolled,
    Resized,
    BreakpointChanged { matches: bool },
    TimerFired(TimerHandle),
    MarkerClicked { index: String },
    VisibilityToggled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Scroll,
    Resize,
    BreakpointChange,
}

type Listener = Rc<RefCell<dyn FnMut(&PageEvent)>>;
type ListenerMap = BTreeMap<u64, (EventKind, Listener)>;

#[derive(Default)]
pub struct EventHub {
    next_id: u64,
    listeners: Rc<RefCell<ListenerMap>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "dropping the subscription removes the listener"]
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        listener: impl FnMut(&PageEvent) + 'static,
    ) -> Subscription {
        self.next_id += 1;
        let id = self.next_id;
        let listener: Listener = Rc::new(RefCell::new(listener));
        self.listeners.borrow_mut().insert(id, (kind, listener));
        trace!(id, ?kind, "Listener subscribed");
        Subscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Deliver `event` to every listener of `kind`, in subscription order.
    ///
    /// The listener table is not borrowed while a listener runs, so
    /// listeners may subscribe or dispose. A listener disposed by an earlier
    /// one in the same round is skipped.
    pub fn emit(&self, kind: EventKind, event: &PageEvent) -> usize {
        let targets: Vec<(u64, Listener)> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, (listener_kind, _))| *listener_kind == kind)
            .map(|(id, (_, listener))| (*id, Rc::clone(listener)))
            .collect();

        let mut delivered = 0;
        for (id, listener) in targets {
            if !self.listeners.borrow().contains_key(&id) {
                trace!(id, "Skipping listener disposed during emit");
                continue;
            }
            (&mut *listener.borrow_mut())(event);
            delivered += 1;
        }
        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

/// Disposer handle for one listener.
pub struct Subscription {
    id: u64,
    listeners: Weak<RefCell<ListenerMap>>,
}

impl Subscription {
    pub fn dispose(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().remove(&self.id);
            trace!(id = self.id, "Listener disposed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<PageEvent>>>, impl FnMut(&PageEvent) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |event: &PageEvent| {
            sink.borrow_mut().push(event.clone())
        })
    }

    #[test]
    fn listeners_only_receive_their_kind() {
        let mut hub = EventHub::new();
        let (scrolls, on_scroll) = recorder();
        let (resizes, on_resize) = recorder();
        let _scroll = hub.subscribe(EventKind::Scroll, on_scroll);
        let _resize = hub.subscribe(EventKind::Resize, on_resize);

        assert_eq!(hub.emit(EventKind::Scroll, &PageEvent::Scrolled), 1);
        assert_eq!(scrolls.borrow().as_slice(), &[PageEvent::Scrolled]);
        assert!(resizes.borrow().is_empty());
    }

    #[test]
    fn disposed_listener_stops_receiving() {
        let mut hub = EventHub::new();
        let (seen, on_scroll) = recorder();
        let subscription = hub.subscribe(EventKind::Scroll, on_scroll);

        hub.emit(EventKind::Scroll, &PageEvent::Scrolled);
        subscription.dispose();
        assert_eq!(hub.listener_count(), 0);
        assert_eq!(hub.emit(EventKind::Scroll, &PageEvent::Scrolled), 0);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn listener_may_dispose_subscriptions_while_notified() {
        let mut hub = EventHub::new();
        let (later_seen, later) = recorder();
        let held: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));

        let to_drop = Rc::clone(&held);
        let first = hub.subscribe(EventKind::Resize, move |_event: &PageEvent| {
            to_drop.borrow_mut().clear();
        });
        let second = hub.subscribe(EventKind::Resize, later);
        held.borrow_mut().push(second);

        assert_eq!(hub.emit(EventKind::Resize, &PageEvent::Resized), 1);
        assert!(later_seen.borrow().is_empty());
        assert_eq!(hub.listener_count(), 1);
        first.dispose();
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn subscription_outliving_hub_is_harmless() {
        let mut hub = EventHub::new();
        let (_seen, listener) = recorder();
        let subscription = hub.subscribe(EventKind::BreakpointChange, listener);
        drop(hub);
        drop(subscription);
    }
}
