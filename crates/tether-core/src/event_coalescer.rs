#![forbid(unsafe_code)]

//! Resize coalescing for continuous drag-resizes.
//!
//! A window resize drag can deliver dozens of `Resize` events between two
//! animation frames. Recomputing a panel position for each one is wasted
//! work, so [`EventCoalescer`] holds resizes back until the host flushes it
//! on the next frame.
//!
//! # Rules
//!
//! - **Resize**: replaces any pending resize ("latest wins"). Returns `None`.
//! - **Everything else** (including `Scroll`): passes through immediately.
//!   Scroll is never delayed so a panel tracks its anchor without lag.
//!
//! Only earlier resizes in a burst are ever discarded. The last one always
//! survives until [`flush`](EventCoalescer::flush).
//!
//! # Usage
//!
//! ```
//! use tether_core::event_coalescer::EventCoalescer;
//! use tether_core::event::{Event, ScrollerId};
//!
//! let mut coalescer = EventCoalescer::new();
//!
//! assert!(coalescer.push(Event::Resize { width: 800.0, height: 600.0 }).is_none());
//! assert!(coalescer.push(Event::Resize { width: 790.0, height: 600.0 }).is_none());
//!
//! // Scroll passes straight through.
//! assert!(coalescer.push(Event::Scroll { source: ScrollerId::ROOT }).is_some());
//!
//! // On the next frame, only the last resize is delivered.
//! assert_eq!(
//!     coalescer.flush(),
//!     Some(Event::Resize { width: 790.0, height: 600.0 })
//! );
//! ```

use crate::event::Event;

/// Holds back resize events until the next frame.
///
/// Not thread-safe; use it from the single event-processing thread.
#[derive(Debug, Clone, Default)]
pub struct EventCoalescer {
    /// Latest resize seen since the last flush.
    pending_resize: Option<(f64, f64)>,

    /// Resizes folded into the pending one (including itself).
    burst: u32,
}

impl EventCoalescer {
    /// Create an empty coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event.
    ///
    /// Returns `Some(event)` if it should be processed now, or `None` if it
    /// was absorbed and is waiting for [`flush`](Self::flush).
    pub fn push(&mut self, event: Event) -> Option<Event> {
        match event {
            Event::Resize { width, height } => {
                self.pending_resize = Some((width, height));
                self.burst = self.burst.saturating_add(1);
                None
            }
            other => Some(other),
        }
    }

    /// Take the pending resize, if any. After this the coalescer is empty.
    #[must_use]
    pub fn flush(&mut self) -> Option<Event> {
        self.burst = 0;
        self.pending_resize
            .take()
            .map(|(width, height)| Event::Resize { width, height })
    }

    /// Whether a resize is waiting for the next frame.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending_resize.is_some()
    }

    /// How many resizes the pending one stands for.
    #[must_use]
    pub fn pending_burst(&self) -> u32 {
        self.burst
    }

    /// Drop anything pending without delivering it.
    ///
    /// Only for teardown, where nobody is left to act on the resize.
    pub fn clear(&mut self) {
        self.pending_resize = None;
        self.burst = 0;
    }
}
