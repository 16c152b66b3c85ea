//! Listener lifecycle
//!
//! `EventHub` stands in for the host's `addEventListener` registry on the
//! document body and the window. Every `attach` returns a `Subscription`
//! that owns that one registration and removes it exactly once.

use crate::capture::event::{EventTarget, RawEvent};
use crate::dom::Page;
use parking_lot::Mutex as ParkingMutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use uuid::Uuid;

/// Event handler installed on a listener target
pub type Handler = Arc<dyn Fn(&Page, &RawEvent) + Send + Sync>;

/// Where a handler is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    /// `document.body`: receives events whose target is inside the body
    Body,
    /// `window`: receives window events and everything bubbling past the body
    Window,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ListenerKey {
    target: ListenerTarget,
    event_name: String,
}

struct Registration {
    id: Uuid,
    handler: Handler,
}

type Registry = HashMap<ListenerKey, Vec<Registration>>;

#[derive(Clone, Default)]
pub struct EventHub {
    registry: Arc<ParkingMutex<Registry>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `event_name` on `target` immediately
    pub fn attach(&self, target: ListenerTarget, event_name: &str, handler: Handler) -> Subscription {
        let key = ListenerKey {
            target,
            event_name: event_name.to_string(),
        };
        let id = Uuid::new_v4();
        self.registry
            .lock()
            .entry(key.clone())
            .or_default()
            .push(Registration { id, handler });

        tracing::debug!("Attached {} listener on {:?} ({})", event_name, target, id);

        Subscription {
            registry: Arc::downgrade(&self.registry),
            key,
            id,
            released: false,
        }
    }

    pub fn listener_count(&self, target: ListenerTarget, event_name: &str) -> usize {
        let key = ListenerKey {
            target,
            event_name: event_name.to_string(),
        };
        self.registry.lock().get(&key).map(Vec::len).unwrap_or(0)
    }

    pub fn total_listeners(&self) -> usize {
        self.registry.lock().values().map(Vec::len).sum()
    }

    /// Deliver an event: node targets inside `<body>` reach body listeners
    /// first and then bubble to the window; window targets reach window
    /// listeners only. Returns how many handlers ran.
    pub fn dispatch(&self, page: &Page, event: &RawEvent) -> usize {
        let path: &[ListenerTarget] = match event.target {
            EventTarget::Node(node) if page.document.contains(page.document.body(), node) => {
                &[ListenerTarget::Body, ListenerTarget::Window]
            }
            EventTarget::Node(_) | EventTarget::Window => &[ListenerTarget::Window],
        };

        let mut invoked = 0;
        for target in path {
            let key = ListenerKey {
                target: *target,
                event_name: event.kind.dom_name().to_string(),
            };
            // Snapshot ids so handlers run without the registry lock held
            let ids: Vec<Uuid> = self
                .registry
                .lock()
                .get(&key)
                .map(|regs| regs.iter().map(|r| r.id).collect())
                .unwrap_or_default();

            for id in ids {
                // A handler released by an earlier one in this pass is skipped
                let handler = self
                    .registry
                    .lock()
                    .get(&key)
                    .and_then(|regs| regs.iter().find(|r| r.id == id))
                    .map(|r| r.handler.clone());
                if let Some(handler) = handler {
                    handler(page, event);
                    invoked += 1;
                }
            }
        }
        invoked
    }
}

/// Owns one registration. Releasing is idempotent and also happens on drop.
pub struct Subscription {
    registry: Weak<ParkingMutex<Registry>>,
    key: ListenerKey,
    id: Uuid,
    released: bool,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        !self.released
    }

    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registry = registry.lock();
        if let Some(regs) = registry.get_mut(&self.key) {
            regs.retain(|r| r.id != self.id);
            if regs.is_empty() {
                registry.remove(&self.key);
            }
        }
        tracing::debug!(
            "Released {} listener on {:?} ({})",
            self.key.event_name,
            self.key.target,
            self.id
        );
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

/// Every live subscription of one installer, released together
#[derive(Default)]
pub struct SubscriptionSet {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn release_all(&mut self) {
        for subscription in self.subscriptions.iter_mut() {
            subscription.release();
        }
        self.subscriptions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::event::EventKind;
    use crate::dom::{Document, Viewport};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_handler(counter: &Arc<AtomicUsize>) -> Handler {
        let counter = counter.clone();
        Arc::new(move |_page, _event| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn page_with_button() -> (Page, crate::dom::NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let button = doc.append_element(body, "button", &[]);
        (Page::new(doc, Viewport::default()), button)
    }

    #[test]
    fn test_release_is_idempotent() {
        let hub = EventHub::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let mut sub = hub.attach(ListenerTarget::Body, "keyup", counting_handler(&counter));
        let _other = hub.attach(ListenerTarget::Body, "keyup", counting_handler(&counter));
        assert_eq!(hub.listener_count(ListenerTarget::Body, "keyup"), 2);

        sub.release();
        sub.release();
        assert!(!sub.is_active());
        assert_eq!(hub.listener_count(ListenerTarget::Body, "keyup"), 1);
    }

    #[test]
    fn test_drop_releases_registration() {
        let hub = EventHub::new();
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let _sub = hub.attach(ListenerTarget::Window, "scroll", counting_handler(&counter));
            assert_eq!(hub.total_listeners(), 1);
        }
        assert_eq!(hub.total_listeners(), 0);
    }

    #[test]
    fn test_node_events_bubble_from_body_to_window() {
        let hub = EventHub::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let _body = hub.attach(ListenerTarget::Body, "change", counting_handler(&counter));
        let _window = hub.attach(ListenerTarget::Window, "change", counting_handler(&counter));
        let (page, button) = page_with_button();

        let invoked = hub.dispatch(&page, &RawEvent::on_node(EventKind::Change, button, 1.0));
        assert_eq!(invoked, 2);

        let invoked = hub.dispatch(&page, &RawEvent::on_window(EventKind::Change, 2.0));
        assert_eq!(invoked, 1);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_release_all_stops_delivery() {
        let hub = EventHub::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let mut set = SubscriptionSet::new();
        set.push(hub.attach(ListenerTarget::Body, "pointerdown", counting_handler(&counter)));
        set.push(hub.attach(ListenerTarget::Window, "scroll", counting_handler(&counter)));
        assert_eq!(set.len(), 2);

        set.release_all();
        set.release_all();
        assert!(set.is_empty());

        let (page, button) = page_with_button();
        hub.dispatch(&page, &RawEvent::on_node(EventKind::PointerDown, button, 1.0));
        hub.dispatch(&page, &RawEvent::on_window(EventKind::Scroll, 2.0));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_release_outlives_hub() {
        let hub = EventHub::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let mut sub = hub.attach(ListenerTarget::Body, "drop", counting_handler(&counter));
        drop(hub);
        sub.release();
        assert!(!sub.is_active());
    }
}
