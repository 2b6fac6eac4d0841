#![forbid(unsafe_code)]

//! Reactive tracker: keeps an open panel glued to its anchor.
//!
//! While an [`Attachment`] is alive the tracker listens to the
//! [`SignalHub`]. Scroll signals from one of the anchor's scroll ancestors
//! and viewport resizes trigger a recompute: anchor, panel and viewport are
//! measured afresh through [`Measure`], the guard places the panel, and the
//! result goes to the `on_reposition` callback.
//!
//! # Invariants
//!
//! 1. At most one listener per [`SignalKind`] per attachment.
//! 2. Scroll is never debounced: every matching scroll recomputes
//!    synchronously.
//! 3. With resize throttling on, a burst of resizes inside one frame costs a
//!    single recompute on the next [`Signal::Frame`], and the last resize of
//!    the burst is the one applied.
//! 4. [`Attachment::detach`] is idempotent; dropping an attachment detaches.
//!    After detach no callback can run.

use std::cell::RefCell;
use std::rc::Rc;

use tether_core::event::Event;
use tether_core::event_coalescer::EventCoalescer;
use tether_layout::{Anchored, DEFAULT_MARGIN, DEFAULT_OFFSET, Placed, Placement};

use crate::host::Measure;
use crate::signal::{Listener, Signal, SignalHub, SignalKind};

/// Placement options the tracker re-applies on every recompute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackOptions {
    pub placement: Placement,
    pub offset: f64,
    pub margin: f64,
    pub auto_flip: bool,
    /// Coalesce resize bursts to one recompute per animation frame.
    pub throttle_resize: bool,
}

impl Default for TrackOptions {
    fn default() -> Self {
        Self {
            placement: Placement::default(),
            offset: DEFAULT_OFFSET,
            margin: DEFAULT_MARGIN,
            auto_flip: true,
            throttle_resize: false,
        }
    }
}

/// Measures and places one panel.
#[derive(Clone)]
pub struct Tracker {
    measure: Rc<dyn Measure>,
    options: TrackOptions,
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Tracker {
    #[must_use]
    pub fn new(measure: Rc<dyn Measure>, options: TrackOptions) -> Self {
        Self { measure, options }
    }

    #[must_use]
    pub fn options(&self) -> &TrackOptions {
        &self.options
    }

    /// Measure everything afresh and place the panel.
    ///
    /// Nothing is cached, so this is always safe to call, e.g. after the
    /// panel's content changed size.
    #[must_use]
    pub fn recompute(&self) -> Placed {
        let anchor = self.measure.anchor_box();
        let panel = self.measure.panel_size();
        let viewport = self.measure.viewport();
        Anchored::new(anchor, self.options.placement)
            .offset(self.options.offset)
            .margin(self.options.margin)
            .auto_flip(self.options.auto_flip)
            .place(panel, viewport)
    }

    /// Start following scroll and resize signals.
    ///
    /// `on_reposition` is called with the new placement after every
    /// recompute. No initial recompute is done here; callers place the panel
    /// before attaching.
    pub fn attach(
        &self,
        hub: &SignalHub,
        on_reposition: impl FnMut(Placed) + 'static,
    ) -> Attachment {
        let core = Rc::new(RefCell::new(TrackerCore {
            tracker: self.clone(),
            coalescer: EventCoalescer::new(),
            on_reposition: Rc::new(RefCell::new(on_reposition)),
            recomputes: 0,
        }));

        let mut listeners = Vec::with_capacity(3);

        let ancestors = self.measure.scroll_ancestors();
        let scroll_core = Rc::clone(&core);
        listeners.push(hub.listen(SignalKind::Scroll, move |signal| {
            if let Signal::Scroll(source) = signal
                && ancestors.contains(source)
            {
                TrackerCore::reposition(&scroll_core, "scroll");
            }
        }));

        let throttle = self.options.throttle_resize;
        let resize_core = Rc::clone(&core);
        listeners.push(hub.listen(SignalKind::Resize, move |signal| {
            let Signal::Resize(viewport) = signal else {
                return;
            };
            if throttle {
                let Ok(mut core) = resize_core.try_borrow_mut() else {
                    tracing::trace!(message = "tracker.busy_skip", cause = "resize");
                    return;
                };
                let absorbed = core.coalescer.push(Event::Resize {
                    width: viewport.width,
                    height: viewport.height,
                });
                debug_assert!(absorbed.is_none());
            } else {
                TrackerCore::reposition(&resize_core, "resize");
            }
        }));

        if throttle {
            let frame_core = Rc::clone(&core);
            listeners.push(hub.listen(SignalKind::Frame, move |_| {
                let Ok(mut core) = frame_core.try_borrow_mut() else {
                    tracing::trace!(message = "tracker.busy_skip", cause = "frame");
                    return;
                };
                let flushed = core.coalescer.flush();
                drop(core);
                if flushed.is_some() {
                    TrackerCore::reposition(&frame_core, "frame");
                }
            }));
        }

        tracing::debug!(
            message = "tracker.attach",
            listeners = listeners.len(),
            throttle_resize = throttle
        );

        Attachment {
            core: Some(core),
            listeners,
        }
    }
}

struct TrackerCore {
    tracker: Tracker,
    coalescer: EventCoalescer,
    on_reposition: Rc<RefCell<dyn FnMut(Placed)>>,
    recomputes: u64,
}

impl TrackerCore {
    fn reposition(core: &Rc<RefCell<Self>>, cause: &'static str) -> Option<Placed> {
        let (tracker, callback) = {
            let Ok(mut this) = core.try_borrow_mut() else {
                tracing::trace!(message = "tracker.busy_skip", cause);
                return None;
            };
            this.recomputes += 1;
            (this.tracker.clone(), Rc::clone(&this.on_reposition))
        };
        // Host measurement runs unborrowed; it may emit on the hub.
        let placed = tracker.recompute();
        tracing::trace!(
            message = "tracker.reposition",
            cause,
            top = placed.position.top,
            left = placed.position.left,
            placement = %placed.placement
        );
        // The borrow on `core` is released, so the callback may detach.
        let Ok(mut callback) = callback.try_borrow_mut() else {
            return None;
        };
        callback(placed);
        Some(placed)
    }
}

/// Live subscription of a [`Tracker`] to a [`SignalHub`].
#[derive(Default)]
pub struct Attachment {
    core: Option<Rc<RefCell<TrackerCore>>>,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("attached", &self.is_attached())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Attachment {
    /// An attachment that was never attached. Detaching it is a no-op.
    #[must_use]
    pub fn detached() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.core.is_some()
    }

    /// Number of hub listeners held by this attachment.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of recomputes run through this attachment so far.
    #[must_use]
    pub fn recomputes(&self) -> u64 {
        self.core
            .as_ref()
            .and_then(|core| core.try_borrow().ok().map(|c| c.recomputes))
            .unwrap_or(0)
    }

    /// Recompute now and publish to `on_reposition`.
    ///
    /// Returns `None` when detached.
    pub fn refresh(&self) -> Option<Placed> {
        self.core
            .as_ref()
            .and_then(|core| TrackerCore::reposition(core, "refresh"))
    }

    /// Unsubscribe from every signal. Safe to call any number of times.
    pub fn detach(&mut self) {
        if self.core.is_none() {
            return;
        }
        let released = self.listeners.len();
        self.listeners.clear();
        self.core = None;
        tracing::debug!(message = "tracker.detach", listeners = released);
    }
}

impl Drop for Attachment {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tether_core::event::ScrollerId;
    use tether_core::geometry::{BoundingBox, Position, Size, Viewport};

    struct Surface {
        anchor: Cell<BoundingBox>,
        viewport: Cell<Viewport>,
        ancestors: Vec<ScrollerId>,
    }

    impl Measure for Surface {
        fn anchor_box(&self) -> BoundingBox {
            self.anchor.get()
        }
        fn panel_size(&self) -> Size {
            Size::new(120.0, 60.0)
        }
        fn viewport(&self) -> Viewport {
            self.viewport.get()
        }
        fn scroll_ancestors(&self) -> Vec<ScrollerId> {
            self.ancestors.clone()
        }
    }

    fn surface() -> Rc<Surface> {
        Rc::new(Surface {
            anchor: Cell::new(BoundingBox::new(100.0, 50.0, 40.0, 20.0)),
            viewport: Cell::new(Viewport::new(800.0, 600.0)),
            ancestors: vec![ScrollerId::ROOT, ScrollerId(7)],
        })
    }

    fn options(throttle_resize: bool) -> TrackOptions {
        TrackOptions {
            throttle_resize,
            ..TrackOptions::default()
        }
    }

    fn recorder() -> (Rc<RefCell<Vec<Placed>>>, impl FnMut(Placed) + 'static) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        (log, move |placed| sink.borrow_mut().push(placed))
    }

    #[test]
    fn recompute_places_with_fresh_measurements() {
        let s = surface();
        let tracker = Tracker::new(s.clone(), TrackOptions::default());
        assert_eq!(tracker.recompute().position, Position::new(128.0, 10.0));

        s.anchor.set(BoundingBox::new(100.0, 5.0, 40.0, 20.0));
        assert_eq!(tracker.recompute().position.left, 8.0);
    }

    #[test]
    fn scroll_from_ancestor_repositions_synchronously() {
        let s = surface();
        let hub = SignalHub::new();
        let tracker = Tracker::new(s.clone(), TrackOptions::default());
        let (log, sink) = recorder();
        let _att = tracker.attach(&hub, sink);

        s.anchor.set(BoundingBox::new(60.0, 50.0, 40.0, 20.0));
        hub.emit(&Signal::Scroll(ScrollerId(7)));
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(log.borrow()[0].position.top, 88.0);

        // Unrelated scroller is ignored.
        hub.emit(&Signal::Scroll(ScrollerId(99)));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn every_scroll_recomputes() {
        let hub = SignalHub::new();
        let tracker = Tracker::new(surface(), TrackOptions::default());
        let (log, sink) = recorder();
        let att = tracker.attach(&hub, sink);
        for _ in 0..5 {
            hub.emit(&Signal::Scroll(ScrollerId::ROOT));
        }
        assert_eq!(log.borrow().len(), 5);
        assert_eq!(att.recomputes(), 5);
    }

    #[test]
    fn unthrottled_resize_repositions_immediately() {
        let hub = SignalHub::new();
        let tracker = Tracker::new(surface(), options(false));
        let (log, sink) = recorder();
        let att = tracker.attach(&hub, sink);
        assert_eq!(att.listener_count(), 2);
        assert_eq!(hub.listener_count(SignalKind::Frame), 0);

        hub.emit(&Signal::Resize(Viewport::new(400.0, 300.0)));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn throttled_resize_waits_for_frame() {
        let s = surface();
        let hub = SignalHub::new();
        let tracker = Tracker::new(s.clone(), options(true));
        let (log, sink) = recorder();
        let _att = tracker.attach(&hub, sink);

        for w in [700.0, 500.0, 100.0] {
            s.viewport.set(Viewport::new(w, 600.0));
            hub.emit(&Signal::Resize(Viewport::new(w, 600.0)));
        }
        assert!(log.borrow().is_empty());

        hub.emit(&Signal::Frame);
        assert_eq!(log.borrow().len(), 1);
        // Only the last viewport is narrow enough to clamp the panel.
        assert_eq!(log.borrow()[0].position.left, 8.0);

        // Frame with nothing pending does nothing.
        hub.emit(&Signal::Frame);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn at_most_one_listener_per_kind() {
        let hub = SignalHub::new();
        let tracker = Tracker::new(surface(), options(true));
        let att = tracker.attach(&hub, |_| {});
        for kind in [SignalKind::Scroll, SignalKind::Resize, SignalKind::Frame] {
            assert_eq!(hub.listener_count(kind), 1);
        }
        drop(att);
        assert_eq!(hub.total_listeners(), 0);
    }

    #[test]
    fn detach_is_idempotent() {
        let hub = SignalHub::new();
        let tracker = Tracker::new(surface(), TrackOptions::default());
        let (log, sink) = recorder();
        let mut att = tracker.attach(&hub, sink);
        att.detach();
        att.detach();
        assert!(!att.is_attached());
        assert_eq!(hub.total_listeners(), 0);

        hub.emit(&Signal::Scroll(ScrollerId::ROOT));
        assert!(log.borrow().is_empty());
        assert_eq!(att.refresh(), None);
    }

    #[test]
    fn detach_before_attach_is_noop() {
        let mut att = Attachment::detached();
        att.detach();
        assert!(!att.is_attached());
        assert_eq!(att.listener_count(), 0);
    }

    #[test]
    fn refresh_publishes() {
        let hub = SignalHub::new();
        let tracker = Tracker::new(surface(), TrackOptions::default());
        let (log, sink) = recorder();
        let att = tracker.attach(&hub, sink);
        let placed = att.refresh();
        assert_eq!(placed.map(|p| p.position), Some(Position::new(128.0, 10.0)));
        assert_eq!(log.borrow().len(), 1);
    }

    /// Measures by flushing a pending layout, which emits a resize on the
    /// same hub the tracker listens to.
    struct FlushingSurface {
        hub: SignalHub,
        viewport: Viewport,
        flushes: Cell<usize>,
    }

    impl Measure for FlushingSurface {
        fn anchor_box(&self) -> BoundingBox {
            self.flushes.set(self.flushes.get() + 1);
            self.hub.emit(&Signal::Resize(self.viewport));
            BoundingBox::new(100.0, 50.0, 40.0, 20.0)
        }
        fn panel_size(&self) -> Size {
            Size::new(120.0, 60.0)
        }
        fn viewport(&self) -> Viewport {
            self.viewport
        }
    }

    #[test]
    fn measurement_may_emit_on_the_hub() {
        for throttle in [false, true] {
            let hub = SignalHub::new();
            let s = Rc::new(FlushingSurface {
                hub: hub.clone(),
                viewport: Viewport::new(800.0, 600.0),
                flushes: Cell::new(0),
            });
            let tracker = Tracker::new(s.clone(), options(throttle));
            let (log, sink) = recorder();
            let mut att = tracker.attach(&hub, sink);

            hub.emit(&Signal::Scroll(ScrollerId::ROOT));
            assert!(s.flushes.get() >= 1);
            assert!(!log.borrow().is_empty());
            assert!(
                log.borrow()
                    .iter()
                    .all(|p| p.position == Position::new(128.0, 10.0))
            );

            hub.emit(&Signal::Frame);
            assert_eq!(att.refresh().map(|p| p.position), Some(Position::new(128.0, 10.0)));
            att.detach();
            assert_eq!(hub.total_listeners(), 0);
        }
    }
}
