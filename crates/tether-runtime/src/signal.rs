#![forbid(unsafe_code)]

//! Host-owned dispatcher for layout signals.
//!
//! The host surface emits a [`Signal`] whenever something that can move a
//! panel happens: a container scrolled, the viewport resized, or an
//! animation frame started. Interested parties (the reactive tracker of each
//! open panel) register with [`SignalHub::listen`] and get back a
//! [`Listener`] guard.
//!
//! # Invariants
//!
//! 1. Dropping a [`Listener`] unregisters it **immediately**. The hub never
//!    holds dead callbacks, so [`SignalHub::listener_count`] is exact.
//! 2. Listeners are notified in registration order.
//! 3. A listener removed while a signal is being dispatched is not called
//!    for that signal if it has not been reached yet.
//! 4. A listener that re-enters the hub by emitting from inside its own
//!    callback is skipped for the nested signal rather than panicking.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`); the hub is cheap to
//! clone and every clone shares the same listener table.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tether_core::event::{Event, ScrollerId};
use tether_core::geometry::Viewport;

/// A layout change reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    /// A scrollable container scrolled.
    Scroll(ScrollerId),
    /// The viewport changed size.
    Resize(Viewport),
    /// An animation frame is about to be painted.
    Frame,
}

impl Signal {
    /// The listener bucket this signal is delivered to.
    #[must_use]
    pub const fn kind(&self) -> SignalKind {
        match self {
            Self::Scroll(_) => SignalKind::Scroll,
            Self::Resize(_) => SignalKind::Resize,
            Self::Frame => SignalKind::Frame,
        }
    }

    /// Convert a layout [`Event`] into a signal. Input events return `None`.
    #[must_use]
    pub fn from_event(event: &Event) -> Option<Self> {
        match *event {
            Event::Scroll { source } => Some(Self::Scroll(source)),
            Event::Resize { width, height } => Some(Self::Resize(Viewport::new(width, height))),
            _ => None,
        }
    }
}

/// Signal categories, one listener list each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Scroll,
    Resize,
    Frame,
}

type Callback = Rc<RefCell<dyn FnMut(&Signal)>>;

struct Entry {
    id: u64,
    kind: SignalKind,
    callback: Callback,
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    entries: Vec<Entry>,
}

impl HubInner {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }
}

/// Shared dispatcher of layout signals.
#[derive(Clone, Default)]
pub struct SignalHub {
    inner: Rc<RefCell<HubInner>>,
}

impl std::fmt::Debug for SignalHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalHub")
            .field("scroll", &self.listener_count(SignalKind::Scroll))
            .field("resize", &self.listener_count(SignalKind::Resize))
            .field("frame", &self.listener_count(SignalKind::Frame))
            .finish()
    }
}

impl SignalHub {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for every signal of `kind`.
    ///
    /// The callback stays registered until the returned guard is dropped.
    pub fn listen(&self, kind: SignalKind, callback: impl FnMut(&Signal) + 'static) -> Listener {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push(Entry {
            id,
            kind,
            callback: Rc::new(RefCell::new(callback)),
        });
        Listener {
            id,
            kind,
            hub: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver `signal` to every listener of its kind.
    ///
    /// Returns how many listeners were actually called.
    pub fn emit(&self, signal: &Signal) -> usize {
        let kind = signal.kind();
        // Snapshot so callbacks may listen/unlisten without a borrow conflict.
        let targets: Vec<(u64, Callback)> = self
            .inner
            .borrow()
            .entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| (e.id, Rc::clone(&e.callback)))
            .collect();

        let mut delivered = 0;
        for (id, callback) in targets {
            if !self.inner.borrow().contains(id) {
                continue;
            }
            let Ok(mut callback) = callback.try_borrow_mut() else {
                tracing::trace!(message = "signal.reentrant_skip", listener = id, ?kind);
                continue;
            };
            callback(signal);
            delivered += 1;
        }
        delivered
    }

    /// Convert a layout [`Event`] and emit it. Input events are ignored.
    pub fn dispatch_event(&self, event: &Event) -> usize {
        Signal::from_event(event).map_or(0, |signal| self.emit(&signal))
    }

    /// Number of live listeners for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: SignalKind) -> usize {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter(|e| e.kind == kind)
            .count()
    }

    /// Number of live listeners across all kinds.
    #[must_use]
    pub fn total_listeners(&self) -> usize {
        self.inner.borrow().entries.len()
    }
}

/// RAII registration guard returned by [`SignalHub::listen`].
///
/// Dropping it removes the callback from the hub synchronously. Outliving
/// the hub is fine; the drop is then a no-op.
pub struct Listener {
    id: u64,
    kind: SignalKind,
    hub: Weak<RefCell<HubInner>>,
}

impl Listener {
    /// The signal kind this listener receives.
    #[must_use]
    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    /// Whether the callback is still registered with a live hub.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.hub
            .upgrade()
            .is_some_and(|hub| hub.borrow().contains(self.id))
    }
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            // The callback Rc may be the last strong ref; drop it after
            // releasing the hub borrow in case its captures touch the hub.
            let removed = {
                let mut inner = hub.borrow_mut();
                inner
                    .entries
                    .iter()
                    .position(|e| e.id == self.id)
                    .map(|idx| inner.entries.remove(idx))
            };
            drop(removed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn listen_and_emit() {
        let hub = SignalHub::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _listener = hub.listen(SignalKind::Scroll, move |_| h.set(h.get() + 1));

        assert_eq!(hub.emit(&Signal::Scroll(ScrollerId::ROOT)), 1);
        assert_eq!(hub.emit(&Signal::Frame), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn drop_unregisters_immediately() {
        let hub = SignalHub::new();
        let listener = hub.listen(SignalKind::Resize, |_| {});
        assert_eq!(hub.listener_count(SignalKind::Resize), 1);
        assert!(listener.is_registered());
        drop(listener);
        assert_eq!(hub.listener_count(SignalKind::Resize), 0);
        assert_eq!(hub.total_listeners(), 0);
    }

    #[test]
    fn listener_outliving_hub_is_harmless() {
        let hub = SignalHub::new();
        let listener = hub.listen(SignalKind::Frame, |_| {});
        drop(hub);
        assert!(!listener.is_registered());
        drop(listener);
    }

    #[test]
    fn notified_in_registration_order() {
        let hub = SignalHub::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = Rc::clone(&log);
        let b = Rc::clone(&log);
        let _l1 = hub.listen(SignalKind::Frame, move |_| a.borrow_mut().push(1));
        let _l2 = hub.listen(SignalKind::Frame, move |_| b.borrow_mut().push(2));
        hub.emit(&Signal::Frame);
        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    #[test]
    fn listener_removed_mid_dispatch_is_skipped() {
        let hub = SignalHub::new();
        let second_called = Rc::new(Cell::new(false));
        let slot: Rc<RefCell<Option<Listener>>> = Rc::new(RefCell::new(None));

        let slot_in_first = Rc::clone(&slot);
        let _first = hub.listen(SignalKind::Frame, move |_| {
            slot_in_first.borrow_mut().take();
        });
        let flag = Rc::clone(&second_called);
        *slot.borrow_mut() = Some(hub.listen(SignalKind::Frame, move |_| flag.set(true)));

        assert_eq!(hub.emit(&Signal::Frame), 1);
        assert!(!second_called.get());
        assert_eq!(hub.listener_count(SignalKind::Frame), 1);
    }

    #[test]
    fn reentrant_emit_skips_self() {
        let hub = SignalHub::new();
        let depth = Rc::new(Cell::new(0));
        let hub2 = hub.clone();
        let d = Rc::clone(&depth);
        let _l = hub.listen(SignalKind::Frame, move |_| {
            d.set(d.get() + 1);
            // Nested emit must not panic on the busy callback.
            assert_eq!(hub2.emit(&Signal::Frame), 0);
        });
        assert_eq!(hub.emit(&Signal::Frame), 1);
        assert_eq!(depth.get(), 1);
    }

    #[test]
    fn dispatch_event_converts_layout_events() {
        let hub = SignalHub::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s1 = Rc::clone(&seen);
        let s2 = Rc::clone(&seen);
        let _a = hub.listen(SignalKind::Scroll, move |sig| s1.borrow_mut().push(*sig));
        let _b = hub.listen(SignalKind::Resize, move |sig| s2.borrow_mut().push(*sig));

        hub.dispatch_event(&Event::Scroll {
            source: ScrollerId(4),
        });
        hub.dispatch_event(&Event::Resize {
            width: 640.0,
            height: 480.0,
        });
        assert_eq!(hub.dispatch_event(&Event::Focus(true)), 0);

        assert_eq!(
            *seen.borrow(),
            vec![
                Signal::Scroll(ScrollerId(4)),
                Signal::Resize(Viewport::new(640.0, 480.0))
            ]
        );
    }
}
